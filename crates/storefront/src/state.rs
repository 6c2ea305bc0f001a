//! Shared client state.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::cart::CartService;
use crate::checkout::CheckoutFlow;
use crate::config::StorefrontConfig;
use crate::error::StoreError;
use crate::orders::OrderService;
use crate::session::SessionStore;

/// Client state shared across all commands.
///
/// Cheaply cloneable via `Arc`. Holds the backend client and the session
/// store; services are handed out as thin clones over both.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    session: SessionStore,
}

impl AppState {
    /// Create the client state from configuration.
    ///
    /// Does not touch the session file; call `session().restore()` once at
    /// startup and `session().logout()` to tear the session down.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StoreError> {
        let api = ApiClient::new(&config)?;
        let session = SessionStore::new(config.session_path.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                session,
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Cart operations bound to this state's session.
    #[must_use]
    pub fn cart(&self) -> CartService {
        CartService::new(self.inner.api.clone(), self.inner.session.clone())
    }

    /// Order operations bound to this state's session.
    #[must_use]
    pub fn orders(&self) -> OrderService {
        OrderService::new(self.inner.api.clone(), self.inner.session.clone())
    }

    /// Enter checkout over the authoritative cart.
    ///
    /// # Errors
    ///
    /// `EmptyCart` when there is nothing to check out, `Unauthenticated`
    /// without a session.
    pub async fn begin_checkout(&self) -> Result<CheckoutFlow, StoreError> {
        CheckoutFlow::begin(self.cart(), self.orders()).await
    }
}
