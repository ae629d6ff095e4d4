//! Commerce API client.
//!
//! All catalog, checkout, and order data comes from the external commerce
//! service over plain REST. Catalog reads are cached with `moka` (5-minute
//! TTL); checkout and order calls always go to the wire. There is no retry
//! policy and no backoff — a failed call surfaces to the caller, who notifies
//! the user and abandons the operation.

mod cache;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use brightbasket_core::{
    ApiEnvelope, Category, CategoryId, Order, OrderId, OrderStatus, Product, ProductId, UserId,
};

use cache::CacheValue;
use types::{CheckoutRequest, CheckoutSession, OrderRequest, OrderStatusUpdate};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
const CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when talking to the commerce API.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API.
    #[error("commerce API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not parse.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Client for the commerce API.
///
/// Cheaply cloneable; holds the `reqwest` client, the configured base URL,
/// and the catalog cache behind an `Arc`.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CommerceClient {
    /// Create a new commerce API client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CommerceClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a GET and decode the response body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<(&str, &str)>,
    ) -> Result<T, CommerceError> {
        let mut request = self.inner.client.get(self.url(path));
        if let Some((key, value)) = query {
            request = request.query(&[(key, value)]);
        }

        let response = request.send().await?;
        decode_response(path, response).await
    }

    // =========================================================================
    // Catalog reads (cached)
    // =========================================================================

    /// List products, optionally filtered by a search term.
    ///
    /// `GET /products[?search=]`
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        search: Option<&str>,
    ) -> Result<Arc<Vec<Product>>, CommerceError> {
        let cache_key = format!("products:{}", search.unwrap_or_default());
        if let Some(hit) = self.inner.cache.get(&cache_key).await
            && let Some(products) = hit.into_products()
        {
            return Ok(products);
        }

        let envelope: ApiEnvelope<Vec<Product>> = self
            .get_json("/products", search.map(|s| ("search", s)))
            .await?;
        let products = Arc::new(envelope.data);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// Fetch a single product by id.
    ///
    /// `GET /products/{id}`
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Arc<Product>, CommerceError> {
        let cache_key = format!("product:{id}");
        if let Some(hit) = self.inner.cache.get(&cache_key).await
            && let Some(product) = hit.into_product()
        {
            return Ok(product);
        }

        let envelope: ApiEnvelope<Product> =
            self.get_json(&format!("/products/{id}"), None).await?;
        let product = Arc::new(envelope.data);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Arc::clone(&product)))
            .await;
        Ok(product)
    }

    /// List all categories.
    ///
    /// `GET /categories`
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Arc<Vec<Category>>, CommerceError> {
        let cache_key = "categories".to_string();
        if let Some(hit) = self.inner.cache.get(&cache_key).await
            && let Some(categories) = hit.into_categories()
        {
            return Ok(categories);
        }

        let envelope: ApiEnvelope<Vec<Category>> = self.get_json("/categories", None).await?;
        let categories = Arc::new(envelope.data);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(Arc::clone(&categories)))
            .await;
        Ok(categories)
    }

    /// Fetch a category together with its products.
    ///
    /// `GET /categorybyproduct/{id}`
    #[instrument(skip(self))]
    pub async fn category_with_products(
        &self,
        id: &CategoryId,
    ) -> Result<Arc<(Category, Vec<Product>)>, CommerceError> {
        #[derive(serde::Deserialize)]
        struct CategoryProducts {
            category: Category,
            #[serde(default)]
            products: Vec<Product>,
        }

        let cache_key = format!("category_products:{id}");
        if let Some(hit) = self.inner.cache.get(&cache_key).await
            && let Some(pair) = hit.into_category_products()
        {
            return Ok(pair);
        }

        let body: CategoryProducts = self
            .get_json(&format!("/categorybyproduct/{id}"), None)
            .await?;
        let pair = Arc::new((body.category, body.products));

        self.inner
            .cache
            .insert(cache_key, CacheValue::CategoryProducts(Arc::clone(&pair)))
            .await;
        Ok(pair)
    }

    // =========================================================================
    // Checkout and orders (never cached)
    // =========================================================================

    /// Create a payment checkout session.
    ///
    /// `POST /api/checkout`
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/checkout"))
            .json(request)
            .send()
            .await?;
        decode_response("/api/checkout", response).await
    }

    /// Record an order after the payment redirect returns.
    ///
    /// `POST /api/order`
    #[instrument(skip(self, request), fields(user_id = %request.user_id, session_id = %request.session_id))]
    pub async fn create_order(&self, request: &OrderRequest) -> Result<Order, CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/order"))
            .json(request)
            .send()
            .await?;
        decode_response("/api/order", response).await
    }

    /// Fetch a single order.
    ///
    /// `GET /api/order/{id}`
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        self.get_json(&format!("/api/order/{id}"), None).await
    }

    /// List the orders belonging to a user.
    ///
    /// `GET /api/order/user/{userId}`
    #[instrument(skip(self))]
    pub async fn list_orders_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Order>, CommerceError> {
        self.get_json(&format!("/api/order/user/{user_id}"), None)
            .await
    }

    /// Update an order's status and read back the accepted state.
    ///
    /// `PUT /api/order/{id}` does not return the updated order, so the
    /// accepted value is re-fetched rather than assumed.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/api/order/{id}")))
            .json(&OrderStatusUpdate { status })
            .send()
            .await?;
        check_status(&format!("/api/order/{id}"), response).await?;

        self.get_order(id).await
    }
}

/// Map a non-success response to a `CommerceError` and drop the body.
async fn check_status(path: &str, response: reqwest::Response) -> Result<(), CommerceError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CommerceError::NotFound(path.to_string()));
    }
    if !status.is_success() {
        let body = truncated_body(response).await;
        tracing::error!(%status, path, body = %body, "commerce API returned non-success status");
        return Err(CommerceError::Status { status, body });
    }
    Ok(())
}

/// Decode a response body, with better diagnostics than `Response::json`.
async fn decode_response<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Result<T, CommerceError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CommerceError::NotFound(path.to_string()));
    }

    let body = response.text().await?;
    if !status.is_success() {
        tracing::error!(
            %status,
            path,
            body = %body.chars().take(500).collect::<String>(),
            "commerce API returned non-success status"
        );
        return Err(CommerceError::Status {
            status,
            body: body.chars().take(200).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            path,
            body = %body.chars().take(500).collect::<String>(),
            "failed to parse commerce API response"
        );
        CommerceError::Parse(e)
    })
}

/// Read at most 200 chars of an error body for logging.
async fn truncated_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .map(|body| body.chars().take(200).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = CommerceClient::new("https://api.shop.test/");
        assert_eq!(client.url("/products"), "https://api.shop.test/products");
    }

    #[test]
    fn test_error_display() {
        let err = CommerceError::NotFound("/products/p1".to_string());
        assert_eq!(err.to_string(), "Not found: /products/p1");

        let err = CommerceError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "commerce API returned 502 Bad Gateway: upstream down"
        );
    }
}
