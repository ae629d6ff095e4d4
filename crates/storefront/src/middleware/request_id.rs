//! Request ID middleware.
//!
//! Tags every response with an `x-request-id` header so storefront logs and
//! Sentry events can be correlated with a specific request.

use axum::{
    extract::Request,
    http::{HeaderValue, header::HeaderName},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Attach a request id to the request extensions and the response headers.
pub async fn set_request_id(mut request: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(X_REQUEST_ID.clone(), value);
    }
    response
}

/// The id assigned to the current request.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);
