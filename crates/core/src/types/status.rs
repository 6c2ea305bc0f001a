//! Order status lifecycle.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Transitions are owned by the backend (`pending -> confirmed -> shipping ->
/// delivered`, or `pending -> cancelled`); the client only displays the
/// current value. A value outside the known set deserializes to
/// [`OrderStatus::Unrecognized`] and renders with the pending mapping, so a
/// newly introduced backend status never crashes the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipping,
    Delivered,
    Cancelled,
    /// Forward-compatibility arm for status values this client predates.
    #[serde(other)]
    Unrecognized,
}

impl OrderStatus {
    /// Human-readable label. Total over all variants; unrecognized values
    /// fall back to the pending label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending | Self::Unrecognized => "Awaiting confirmation",
            Self::Confirmed => "Confirmed",
            Self::Shipping => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Single-character marker for terminal rendering.
    #[must_use]
    pub const fn badge(&self) -> &'static str {
        match self {
            Self::Pending | Self::Unrecognized => "\u{23f3}", // hourglass
            Self::Confirmed => "\u{2713}",
            Self::Shipping => "\u{1f69a}",
            Self::Delivered => "\u{2714}",
            Self::Cancelled => "\u{2717}",
        }
    }

    /// Whether the order can no longer change state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipping => "shipping",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Unrecognized => "unrecognized",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OrderStatus {
    type Err = core::convert::Infallible;

    /// Total: unknown inputs map to [`Self::Unrecognized`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "shipping" => Self::Shipping,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            _ => Self::Unrecognized,
        })
    }
}
