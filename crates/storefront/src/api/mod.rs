//! REST client for the storefront backend.
//!
//! Uses `reqwest` for HTTP and caches catalog reads with `moka`
//! (5-minute TTL). The backend is the source of truth - no local sync,
//! direct API calls.
//!
//! # Endpoints
//!
//! - `POST /auth/login`, `POST /auth/register` - credential exchange
//! - `GET /products`, `GET /products/slug/:slug`, `GET /categories` - catalog
//! - `GET /carts` and the `/carts/items` mutations - cart state
//! - `POST /orders`, `GET /orders` - order submission and history
//!
//! Authenticated calls carry the bearer credential issued at login. A 401
//! on such a call surfaces as [`StoreError::Unauthenticated`] so callers
//! can route back to the login surface.

mod cache;
pub mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use lotus_core::{CartLineId, CategoryId, ProductId};

use crate::config::StorefrontConfig;
use crate::error::StoreError;

use cache::CacheValue;

/// Convenience for calls without a request body.
const NO_BODY: Option<&()> = None;

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddCartItemBody {
    product_id: ProductId,
    quantity: u32,
}

#[derive(Serialize)]
struct UpdateQuantityBody {
    quantity: u32,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    phone: &'a str,
    address: &'a str,
    note: &'a str,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend.
///
/// Provides typed access to auth, catalog, cart, and order endpoints.
/// Catalog responses are cached for 5 minutes; cart and order responses
/// never are.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    client: reqwest::Client,
    base: String,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base: config.api_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Execute a request and deserialize the response body.
    async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.execute_raw(method, path, token, query, body).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            StoreError::Parse(e)
        })
    }

    /// Execute a request where only success matters; the body is discarded.
    ///
    /// Cart mutations go through here: their outcome is read back with an
    /// authoritative `GET /carts`, not from the mutation response.
    async fn execute_ok<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
        body: Option<&B>,
    ) -> Result<(), StoreError>
    where
        B: Serialize + ?Sized,
    {
        self.execute_raw(method, path, token, &[], body).await?;
        Ok(())
    }

    async fn execute_raw<B>(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<String, StoreError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{path}", self.inner.base);
        let authenticated = token.is_some();

        let mut request = self.inner.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(failure(status, authenticated, &text));
        }

        Ok(text)
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Exchange credentials for a bearer token and identity.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection message on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, StoreError> {
        self.execute(
            Method::POST,
            "/auth/login",
            None,
            &[],
            Some(&CredentialsBody { email, password }),
        )
        .await
    }

    /// Create an account; on success the backend issues a session like login.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection message (e.g., email already taken).
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthPayload, StoreError> {
        self.execute(
            Method::POST,
            "/auth/register",
            None,
            &[],
            Some(&CredentialsBody { email, password }),
        )
        .await
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// Get the product list, optionally filtered by search text or category.
    ///
    /// Only the unfiltered listing is cached; filtered queries always hit
    /// the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(
        &self,
        search: Option<&str>,
        category: Option<CategoryId>,
    ) -> Result<Vec<ProductRef>, StoreError> {
        let unfiltered = search.is_none() && category.is_none();
        let cache_key = "products:all".to_string();

        if unfiltered
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut query = Vec::new();
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        if let Some(category) = category {
            query.push(("categoryId", category.to_string()));
        }

        let products: Vec<ProductRef> = self
            .execute(Method::GET, "/products", None, &query, NO_BODY)
            .await?;

        if unfiltered {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a product by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<ProductRef, StoreError> {
        let cache_key = format!("product:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: ProductRef = self
            .execute(
                Method::GET,
                &format!("/products/slug/{slug}"),
                None,
                &[],
                NO_BODY,
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get all product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<CategoryRef>, StoreError> {
        let cache_key = "categories:all".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<CategoryRef> = self
            .execute(Method::GET, "/categories", None, &[], NO_BODY)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Fetch the authoritative cart for the signed-in identity.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` on a 401, or an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn fetch_cart(&self, token: &SecretString) -> Result<CartEnvelope, StoreError> {
        self.execute(Method::GET, "/carts", Some(token), &[], NO_BODY)
            .await
    }

    /// Add a product to the cart; the backend merges into an existing line
    /// for the same product or creates a new one.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g., stock exceeded) verbatim.
    #[instrument(skip(self, token), fields(product_id = %product_id, quantity = quantity))]
    pub async fn add_cart_item(
        &self,
        token: &SecretString,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        self.execute_ok(
            Method::POST,
            "/carts/items",
            Some(token),
            Some(&AddCartItemBody {
                product_id,
                quantity,
            }),
        )
        .await
    }

    /// Set the quantity of one cart line.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection (e.g., stock exceeded) verbatim.
    #[instrument(skip(self, token), fields(line_id = %line_id, quantity = quantity))]
    pub async fn update_cart_item(
        &self,
        token: &SecretString,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<(), StoreError> {
        self.execute_ok(
            Method::PATCH,
            &format!("/carts/items/{line_id}"),
            Some(token),
            Some(&UpdateQuantityBody { quantity }),
        )
        .await
    }

    /// Delete one cart line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a stale line reference.
    #[instrument(skip(self, token), fields(line_id = %line_id))]
    pub async fn remove_cart_item(
        &self,
        token: &SecretString,
        line_id: CartLineId,
    ) -> Result<(), StoreError> {
        self.execute_ok(
            Method::DELETE,
            &format!("/carts/items/{line_id}"),
            Some(token),
            NO_BODY,
        )
        .await
    }

    /// Delete all cart lines for the signed-in identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &SecretString) -> Result<(), StoreError> {
        self.execute_ok(Method::DELETE, "/carts", Some(token), NO_BODY)
            .await
    }

    // =========================================================================
    // Order Methods (not cached)
    // =========================================================================

    /// Convert the current cart into an order. Not idempotent: a second
    /// call creates a second order, which is why callers go through the
    /// checkout state machine.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection verbatim (e.g., empty cart, stock
    /// changed since the cart was loaded).
    #[instrument(skip(self, token, phone, address, note))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        phone: &str,
        address: &str,
        note: &str,
    ) -> Result<Order, StoreError> {
        self.execute(
            Method::POST,
            "/orders",
            Some(token),
            &[],
            Some(&CreateOrderBody {
                phone,
                address,
                note,
            }),
        )
        .await
    }

    /// Fetch all orders for the signed-in identity, newest first (backend
    /// ordering, not re-sorted here).
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` on a 401, or an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn list_orders(&self, token: &SecretString) -> Result<Vec<Order>, StoreError> {
        self.execute(Method::GET, "/orders", Some(token), &[], NO_BODY)
            .await
    }
}

// =============================================================================
// Failure mapping
// =============================================================================

/// Map a non-success response onto the client error taxonomy.
fn failure(status: StatusCode, authenticated: bool, body: &str) -> StoreError {
    let message = extract_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });

    if status == StatusCode::UNAUTHORIZED && authenticated {
        StoreError::Unauthenticated
    } else if status == StatusCode::NOT_FOUND {
        StoreError::NotFound(message)
    } else if status.is_client_error() {
        StoreError::Rejected(message)
    } else {
        StoreError::Backend {
            status: status.as_u16(),
            message,
        }
    }
}

/// Pull the `message` field out of an error body.
///
/// The backend sends `{ "message": "..." }`, or an array of messages for
/// field-level validation failures.
fn extract_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: ErrorMessage,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorMessage {
        One(String),
        Many(Vec<String>),
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|parsed| match parsed.message {
            ErrorMessage::One(message) => message,
            ErrorMessage::Many(messages) => messages.join("; "),
        })
}
