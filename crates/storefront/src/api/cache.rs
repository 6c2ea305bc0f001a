//! Cached catalog values.

use super::types::{CategoryRef, ProductRef};

/// Values stored in the catalog cache.
///
/// Only read-only catalog data goes in here; cart and order responses are
/// never cached.
#[derive(Debug, Clone)]
pub(super) enum CacheValue {
    Product(Box<ProductRef>),
    Products(Vec<ProductRef>),
    Categories(Vec<CategoryRef>),
}
