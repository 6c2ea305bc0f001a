//! Order submission and history.
//!
//! Orders are created exactly once from a cart at checkout and are
//! read-only afterwards from this client's perspective - the backend
//! advances `status` on its own and this module only reads it back.

use tracing::instrument;

use crate::api::{ApiClient, Order};
use crate::checkout::OrderDraft;
use crate::error::StoreError;
use crate::session::SessionStore;

/// Order operations for the signed-in identity.
#[derive(Debug, Clone)]
pub struct OrderService {
    api: ApiClient,
    session: SessionStore,
}

impl OrderService {
    #[must_use]
    pub const fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Submit the current cart as an order.
    ///
    /// Crate-private on purpose: `POST /orders` is not idempotent, so all
    /// submissions go through [`crate::checkout::CheckoutFlow`], which
    /// guards against duplicate attempts.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without an active session, or the
    /// backend's rejection verbatim.
    #[instrument(skip(self, draft))]
    pub(crate) async fn submit_order(&self, draft: &OrderDraft) -> Result<Order, StoreError> {
        let token = self.session.bearer()?;
        self.api
            .create_order(&token, &draft.phone, &draft.address, &draft.note)
            .await
    }

    /// Fetch all orders for the signed-in identity.
    ///
    /// The backend returns newest-first; the list is displayed in that
    /// order and never re-sorted here.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` without an active session.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        let token = self.session.bearer()?;
        self.api.list_orders(&token).await
    }
}
