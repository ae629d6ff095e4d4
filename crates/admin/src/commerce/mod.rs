//! Commerce API client for the admin console.
//!
//! Unlike the storefront's read-mostly client, this one carries the write
//! surface: order status updates and deletion, and product/category CRUD.
//! Nothing is cached — an admin who just changed a record must read their
//! own write on the next page load.

pub mod types;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use brightbasket_core::{
    ApiEnvelope, Category, CategoryId, Order, OrderId, OrderStatus, Product, ProductId,
};

use types::{CategoryInput, OrderStatusUpdate, ProductInput};

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

/// Client for the commerce API's admin surface.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CommerceClient {
    /// Create a new commerce API client.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(CommerceClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List every order in the store.
    ///
    /// `GET /api/order`
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, CommerceError> {
        let response = self.inner.client.get(self.url("/api/order")).send().await?;
        decode_response("/api/order", response).await
    }

    /// Fetch a single order.
    ///
    /// `GET /api/order/{id}`
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        let path = format!("/api/order/{id}");
        let response = self.inner.client.get(self.url(&path)).send().await?;
        decode_response(&path, response).await
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
        let path = format!("/api/order/{id}");
        let response = self
            .inner
            .client
            .put(self.url(&path))
            .json(&OrderStatusUpdate { status })
            .send()
            .await?;
        check_status(&path, response).await?;

        self.get_order(id).await
    }

    /// Delete an order outright.
    ///
    /// `DELETE /api/order/{id}`
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<(), CommerceError> {
        let path = format!("/api/order/{id}");
        let response = self.inner.client.delete(self.url(&path)).send().await?;
        check_status(&path, response).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products.
    ///
    /// `GET /products`
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CommerceError> {
        let response = self.inner.client.get(self.url("/products")).send().await?;
        let envelope: ApiEnvelope<Vec<Product>> = decode_response("/products", response).await?;
        Ok(envelope.data)
    }

    /// Fetch a single product.
    ///
    /// `GET /products/{id}`
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        let path = format!("/products/{id}");
        let response = self.inner.client.get(self.url(&path)).send().await?;
        let envelope: ApiEnvelope<Product> = decode_response(&path, response).await?;
        Ok(envelope.data)
    }

    /// Create a product.
    ///
    /// `POST /products`
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/products"))
            .json(input)
            .send()
            .await?;
        let envelope: ApiEnvelope<Product> = decode_response("/products", response).await?;
        Ok(envelope.data)
    }

    /// Update a product.
    ///
    /// `PUT /products/{id}`
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, CommerceError> {
        let path = format!("/products/{id}");
        let response = self
            .inner
            .client
            .put(self.url(&path))
            .json(input)
            .send()
            .await?;
        let envelope: ApiEnvelope<Product> = decode_response(&path, response).await?;
        Ok(envelope.data)
    }

    /// Delete a product.
    ///
    /// `DELETE /products/{id}`
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CommerceError> {
        let path = format!("/products/{id}");
        let response = self.inner.client.delete(self.url(&path)).send().await?;
        check_status(&path, response).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// `GET /categories`
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, CommerceError> {
        let response = self
            .inner
            .client
            .get(self.url("/categories"))
            .send()
            .await?;
        let envelope: ApiEnvelope<Vec<Category>> =
            decode_response("/categories", response).await?;
        Ok(envelope.data)
    }

    /// Create a category.
    ///
    /// `POST /categories`
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, CommerceError> {
        let response = self
            .inner
            .client
            .post(self.url("/categories"))
            .json(input)
            .send()
            .await?;
        let envelope: ApiEnvelope<Category> = decode_response("/categories", response).await?;
        Ok(envelope.data)
    }

    /// Update a category.
    ///
    /// `PUT /categories/{id}`
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, CommerceError> {
        let path = format!("/categories/{id}");
        let response = self
            .inner
            .client
            .put(self.url(&path))
            .json(input)
            .send()
            .await?;
        let envelope: ApiEnvelope<Category> = decode_response(&path, response).await?;
        Ok(envelope.data)
    }

    /// Delete a category.
    ///
    /// `DELETE /categories/{id}`
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), CommerceError> {
        let path = format!("/categories/{id}");
        let response = self.inner.client.delete(self.url(&path)).send().await?;
        check_status(&path, response).await
    }
}

/// Map a non-success response to a `CommerceError` and drop the body.
async fn check_status(path: &str, response: reqwest::Response) -> Result<(), CommerceError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CommerceError::NotFound(path.to_string()));
    }
    if !status.is_success() {
        let body: String = response
            .text()
            .await
            .map(|body| body.chars().take(200).collect())
            .unwrap_or_default();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = CommerceClient::new("https://api.shop.test/");
        assert_eq!(client.url("/api/order"), "https://api.shop.test/api/order");
    }
}
