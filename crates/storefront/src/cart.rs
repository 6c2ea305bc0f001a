//! The cart aggregate: (product, quantity) selections for the signed-in
//! identity.
//!
//! The backend owns merge and stock decisions, so the client follows a
//! strict mutate-then-reload protocol: every mutating call is followed by an
//! authoritative `GET /carts`, and no locally computed delta is ever
//! trusted. This trades one extra round trip per mutation for the guarantee
//! that client and server state cannot diverge - a late response simply
//! becomes the new authoritative state.

use tracing::instrument;

use lotus_core::{CartLineId, Price, ProductId};

use crate::api::{ApiClient, CartLine};
use crate::error::StoreError;
use crate::session::SessionStore;

/// The current identity's cart: an ordered collection of lines.
///
/// The subtotal is always recomputed from the lines, never cached
/// independently of them, so it cannot drift.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub(crate) fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The lines in backend order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines (not total quantity).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Derived subtotal: the sum of unit price times quantity over all
    /// lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

/// Cart operations for the signed-in identity.
///
/// Every operation requires an active session and fails with
/// [`StoreError::Unauthenticated`] without one - callers route back to
/// login. Mutations return the freshly reloaded cart.
#[derive(Debug, Clone)]
pub struct CartService {
    api: ApiClient,
    session: SessionStore,
}

impl CartService {
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Fetch the authoritative cart, replacing any caller-held view in full.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without an active session.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Cart, StoreError> {
        let token = self.session.bearer()?;
        let envelope = self.api.fetch_cart(&token).await?;
        Ok(Cart::from_lines(envelope.cart_items))
    }

    /// Add a product to the cart.
    ///
    /// The backend merges into an existing line for the same product or
    /// creates a new one; the returned cart is re-fetched rather than
    /// assumed, since the merge outcome and final quantity are
    /// backend-determined.
    ///
    /// # Errors
    ///
    /// Rejects `quantity < 1` locally; backend rejections (stock bound)
    /// carry the backend's message verbatim.
    #[instrument(skip(self))]
    pub async fn add_line(&self, product_id: ProductId, quantity: u32) -> Result<Cart, StoreError> {
        if quantity < 1 {
            return Err(StoreError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        let token = self.session.bearer()?;
        self.api.add_cart_item(&token, product_id, quantity).await?;
        self.load().await
    }

    /// Set the quantity of one line.
    ///
    /// Requests below 1 are rejected before any call is issued: decrement
    /// is disabled at quantity 1, and removing a line is a separate,
    /// explicit action. Quantities above stock are rejected by the backend
    /// and surfaced verbatim; the client does not guess a corrected value.
    ///
    /// # Errors
    ///
    /// `Validation` locally for `quantity < 1`, otherwise the backend's
    /// verdict.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<Cart, StoreError> {
        if quantity < 1 {
            return Err(StoreError::Validation(
                "quantity must be at least 1; remove the line instead".to_string(),
            ));
        }

        let token = self.session.bearer()?;
        self.api.update_cart_item(&token, line_id, quantity).await?;
        self.load().await
    }

    /// Delete one line. Irreversible; interactive callers confirm first.
    ///
    /// # Errors
    ///
    /// `NotFound` for a stale line reference.
    #[instrument(skip(self))]
    pub async fn remove_line(&self, line_id: CartLineId) -> Result<Cart, StoreError> {
        let token = self.session.bearer()?;
        self.api.remove_cart_item(&token, line_id).await?;
        self.load().await
    }

    /// Delete all lines. Used for the explicit "empty cart" action (which
    /// interactive callers confirm) and internally after a successful
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without an active session.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<Cart, StoreError> {
        let token = self.session.bearer()?;
        self.api.clear_cart(&token).await?;
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProductRef;

    fn line(id: i32, product_id: i32, name: &str, price: i64, quantity: u32) -> CartLine {
        let product: ProductRef = serde_json::from_value(serde_json::json!({
            "id": product_id,
            "productName": name,
            "price": price.to_string(),
            "slug": name.to_lowercase().replace(' ', "-"),
        }))
        .expect("valid product");

        CartLine {
            id: CartLineId::new(id),
            quantity,
            product,
        }
    }

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let cart = Cart::from_lines(vec![
            line(1, 10, "Product A", 100_000, 2),
            line(2, 11, "Product B", 50_000, 1),
        ]);

        assert_eq!(cart.subtotal(), Price::from(250_000));
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        assert_eq!(Cart::default().subtotal(), Price::ZERO);
        assert!(Cart::default().is_empty());
    }

    #[test]
    fn test_subtotal_tracks_lines_not_a_cache() {
        let full = Cart::from_lines(vec![line(1, 10, "Product A", 100_000, 2)]);
        assert_eq!(full.subtotal(), Price::from(200_000));

        // A reloaded cart with different lines yields a different subtotal;
        // nothing is carried over from the previous view.
        let reloaded = Cart::from_lines(vec![line(1, 10, "Product A", 100_000, 3)]);
        assert_eq!(reloaded.subtotal(), Price::from(300_000));
    }
}
