//! Unified error type for storefront client operations.
//!
//! Every failure returns control to an interactive state; nothing here is
//! fatal to the process. The variants map onto what the caller should do
//! next: redirect to login, fix local input, show the backend's message, or
//! offer a retry.

use thiserror::Error;

/// Errors surfaced by the storefront client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No valid session. Callers redirect to the login surface.
    #[error("not signed in")]
    Unauthenticated,

    /// Local field validation failed; no network call was made.
    #[error("{0}")]
    Validation(String),

    /// The backend refused a cart or order change (stock bound, merge
    /// conflict, malformed input). Carries the backend's message verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Stale reference: the product, line, or order no longer exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// Checkout was entered with zero cart lines. Callers route back to
    /// the cart view.
    #[error("cart is empty")]
    EmptyCart,

    /// A submission is already in flight for this checkout.
    #[error("order submission already in progress")]
    SubmitInFlight,

    /// This checkout already produced an order; submitting again would
    /// create a duplicate.
    #[error("order already placed for this checkout")]
    AlreadyPlaced,

    /// Backend failure (5xx or unclassified status). User-visible retry,
    /// never auto-retried.
    #[error("backend error ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Transport-level failure (connect, timeout, TLS).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend's response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Session persistence failed (read or write of the session file).
    #[error("session storage: {0}")]
    Storage(#[from] std::io::Error),
}
