//! Domain types for the storefront backend's REST interface.
//!
//! These map one-to-one onto the backend's camelCase JSON. Catalog data is
//! read-only from the client's perspective: a [`ProductRef`] is refreshed by
//! re-fetching, never patched in place.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use lotus_core::{CartLineId, CategoryId, OrderId, OrderStatus, Price, ProductId};

use crate::session::Identity;

// =============================================================================
// Auth
// =============================================================================

/// Response of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    /// Opaque bearer credential for authenticated calls.
    pub access_token: String,
    /// The identity the credential belongs to.
    pub user: Identity,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    /// Absent in the embedded form on product listings.
    #[serde(default)]
    pub id: Option<CategoryId>,
    pub category_name: String,
}

/// A product image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub image_url: String,
    #[serde(default)]
    pub is_thumbnail: bool,
    /// Only present on the product detail endpoint.
    #[serde(default)]
    pub sort_order: i32,
}

/// Read-only view of a catalog item.
///
/// `stock_quantity` is an upper bound on orderable quantity; the backend
/// enforces it on every cart mutation, the client only uses it to clamp
/// input before a call is issued.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub id: ProductId,
    pub product_name: String,
    pub price: Price,
    #[serde(default)]
    pub slug: String,
    /// Not included in the cart's embedded product form.
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
}

impl ProductRef {
    /// The image to show in listings: the flagged thumbnail, else the first.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|image| image.is_thumbnail)
            .or_else(|| self.images.first())
    }

    /// Whether any quantity can currently be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One product+quantity selection within the cart.
///
/// Identified by its own id, not the product id: the backend guarantees at
/// most one line per product and merges duplicate adds into the existing
/// line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: CartLineId,
    pub quantity: u32,
    pub product: ProductRef,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Envelope of `GET /carts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEnvelope {
    #[serde(default)]
    pub cart_items: Vec<CartLine>,
}

// =============================================================================
// Orders
// =============================================================================

/// A frozen snapshot of one ordered product.
///
/// Deliberately not a [`ProductRef`]: catalog prices may change after the
/// order is placed, these values may not.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_name: String,
    pub price: Price,
    pub quantity: u32,
}

impl OrderItem {
    /// Snapshot price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// An order as returned by the backend.
///
/// Immutable once created except for `status`, which the backend advances;
/// `total_amount` is backend-computed at submission time and displayed as
/// reported.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub phone: String,
    pub address: String,
    pub total_amount: Price,
    pub status: OrderStatus,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}
