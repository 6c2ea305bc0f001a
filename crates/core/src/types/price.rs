//! Decimal-safe price amounts.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A non-negative amount of money.
///
/// The store trades in a single currency (đồng), so `Price` carries only the
/// decimal amount; there is no currency dimension to mix up. The backend
/// serializes decimal columns as strings, which the `rust_decimal` serde
/// support handles transparently.
///
/// Arithmetic is exact decimal arithmetic - cart subtotals are a plain
/// [`Sum`] fold over line totals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total: this unit price multiplied by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Price {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl fmt::Display for Price {
    /// Formats with dot-grouped thousands and the đồng sign, e.g. `250.000 ₫`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalized = self.0.normalize();
        let text = normalized.abs().to_string();
        let (integer, fraction) = match text.split_once('.') {
            Some((i, frac)) => (i.to_owned(), Some(frac.to_owned())),
            None => (text, None),
        };

        if normalized.is_sign_negative() {
            write!(f, "-")?;
        }

        let digits: Vec<char> = integer.chars().collect();
        for (idx, digit) in digits.iter().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                write!(f, ".")?;
            }
            write!(f, "{digit}")?;
        }

        if let Some(frac) = fraction {
            write!(f, ",{frac}")?;
        }

        write!(f, " \u{20ab}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_is_exact() {
        let unit = Price::from(100_000);
        assert_eq!(unit.times(2), Price::from(200_000));
        assert_eq!(unit.times(0), Price::ZERO);
    }

    #[test]
    fn test_sum_folds_from_zero() {
        let total: Price = [Price::from(100_000).times(2), Price::from(50_000)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from(250_000));
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from(250_000).to_string(), "250.000 \u{20ab}");
        assert_eq!(Price::from(999).to_string(), "999 \u{20ab}");
        assert_eq!(Price::ZERO.to_string(), "0 \u{20ab}");
    }

    #[test]
    fn test_display_drops_insignificant_zeros() {
        let price = Price::new(Decimal::new(100_000_00, 2)); // "100000.00"
        assert_eq!(price.to_string(), "100.000 \u{20ab}");
    }
}
