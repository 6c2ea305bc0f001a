//! Checkout: the one-shot transition from a non-empty cart to an order.
//!
//! `POST /orders` is not idempotent - a second submission after success
//! would create a second order - so checkout is modeled as an owned state
//! machine (`Idle -> Validating -> Submitting -> Completed`, failures
//! returning to `Idle`) instead of a bare function. The flow refuses to
//! start on an empty cart and refuses to submit twice.

use serde::Serialize;
use tracing::warn;

use lotus_core::Price;

use crate::api::Order;
use crate::cart::{Cart, CartService};
use crate::error::StoreError;
use crate::orders::OrderService;

/// Shipping details collected before submission.
///
/// Serializes directly as the `POST /orders` body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderDraft {
    pub phone: String,
    pub address: String,
    pub note: String,
}

impl OrderDraft {
    /// Local field checks; runs before any network call, so a validation
    /// failure never consumes a submission attempt.
    ///
    /// # Errors
    ///
    /// `Validation` when phone or address is missing. The note is optional.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.phone.trim().is_empty() {
            return Err(StoreError::Validation("phone is required".to_string()));
        }
        if self.address.trim().is_empty() {
            return Err(StoreError::Validation("address is required".to_string()));
        }
        Ok(())
    }
}

/// Where a checkout stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// Ready to accept a submission (also the state after a failure).
    Idle,
    /// Running local draft validation.
    Validating,
    /// The order call is in flight; further submissions are rejected.
    Submitting,
    /// An order was created; this flow is spent.
    Completed,
}

/// A single checkout attempt over the cart as loaded at entry.
///
/// The displayed subtotal is the entry snapshot's; the persisted order
/// total is computed by the backend at submission and may legitimately
/// differ if the cart changed in between. The client does not reconcile
/// the two.
#[derive(Debug)]
pub struct CheckoutFlow {
    cart_service: CartService,
    orders: OrderService,
    snapshot: Cart,
    state: CheckoutState,
}

impl CheckoutFlow {
    /// Enter checkout by reloading the authoritative cart.
    ///
    /// # Errors
    ///
    /// `EmptyCart` when the authoritative load returns zero lines - the
    /// caller routes back to the cart view rather than proceeding with
    /// stale data. `Unauthenticated` without a session.
    pub async fn begin(
        cart_service: CartService,
        orders: OrderService,
    ) -> Result<Self, StoreError> {
        let snapshot = cart_service.load().await?;
        if snapshot.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        Ok(Self {
            cart_service,
            orders,
            snapshot,
            state: CheckoutState::Idle,
        })
    }

    /// The cart as it stood at entry.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.snapshot
    }

    /// Live subtotal of the entry snapshot.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.snapshot.subtotal()
    }

    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    /// Submit the draft, converting the current authoritative cart into an
    /// order.
    ///
    /// On success the flow is `Completed`, the consumed cart view is
    /// dropped, and the cart is cleared best-effort. On failure the flow
    /// returns to `Idle` with the draft untouched so the caller can retry
    /// without re-entering shipping details.
    ///
    /// # Errors
    ///
    /// `SubmitInFlight` while a submission is pending, `AlreadyPlaced`
    /// after success, `Validation` for local field failures (no network
    /// call made), otherwise the backend's verdict.
    pub async fn submit(&mut self, draft: &OrderDraft) -> Result<Order, StoreError> {
        match self.state {
            CheckoutState::Submitting => return Err(StoreError::SubmitInFlight),
            CheckoutState::Completed => return Err(StoreError::AlreadyPlaced),
            CheckoutState::Idle | CheckoutState::Validating => {}
        }

        self.state = CheckoutState::Validating;
        if let Err(err) = draft.validate() {
            self.state = CheckoutState::Idle;
            return Err(err);
        }

        self.state = CheckoutState::Submitting;
        match self.orders.submit_order(draft).await {
            Ok(order) => {
                self.state = CheckoutState::Completed;
                // The cart is consumed; drop the local view and clear the
                // backend copy. The order already exists, so a failure here
                // is logged and left for the next authoritative load.
                self.snapshot = Cart::default();
                if let Err(err) = self.cart_service.clear().await {
                    warn!(error = %err, "could not clear cart after checkout");
                }
                Ok(order)
            }
            Err(err) => {
                self.state = CheckoutState::Idle;
                Err(err)
            }
        }
    }
}
