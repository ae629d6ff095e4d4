//! HTTP route handlers for the admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Dashboard overview
//! GET  /health                   - Health check
//!
//! # Orders
//! GET  /orders                   - Order table (?q= filter, ?expand= row)
//! POST /orders/{id}/status       - Transition an order's status
//! POST /orders/{id}/delete       - Delete an order
//!
//! # Products
//! GET  /products                 - Product table (?q= filter)
//! GET  /products/new             - Create form
//! POST /products                 - Create
//! GET  /products/{id}/edit       - Edit form
//! POST /products/{id}            - Update
//! POST /products/{id}/delete     - Delete
//!
//! # Categories
//! GET  /categories               - Category table + create form
//! POST /categories               - Create
//! POST /categories/{id}          - Update
//! POST /categories/{id}/delete   - Delete
//!
//! # Auth
//! GET  /auth/sign-in             - Redirect to the identity provider
//! GET  /auth/callback            - Verify the returned session token
//! POST /auth/sign-out            - Drop the signed-in admin
//! ```
//!
//! Every non-auth route requires the admin role claim via
//! [`RequireAdminAuth`](crate::middleware::RequireAdminAuth).

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::middleware::auth::session_keys;
use crate::state::AppState;

/// One-shot notification surfaced on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
}

impl Flash {
    /// CSS class for the toast container.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.level {
            FlashLevel::Success => "toast-success",
            FlashLevel::Error => "toast-error",
        }
    }
}

/// Queue a success notification for the next page load.
pub async fn flash_success(session: &Session, message: impl Into<String>) {
    set_flash(session, FlashLevel::Success, message.into()).await;
}

/// Queue an error notification for the next page load.
pub async fn flash_error(session: &Session, message: impl Into<String>) {
    set_flash(session, FlashLevel::Error, message.into()).await;
}

async fn set_flash(session: &Session, level: FlashLevel, message: String) {
    let flash = Flash { level, message };
    if let Err(e) = session.insert(session_keys::FLASH, &flash).await {
        tracing::warn!(error = %e, "failed to queue flash message");
    }
}

/// Take the pending flash message, clearing the slot.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

/// Ambient page data injected explicitly into every console template.
pub struct PageContext {
    pub admin_name: String,
    pub flash: Option<Flash>,
}

impl PageContext {
    /// Assemble the context for a page render, consuming the pending flash.
    pub async fn load(session: &Session, admin_name: impl Into<String>) -> Self {
        Self {
            admin_name: admin_name.into(),
            flash: take_flash(session).await,
        }
    }
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}/status", post(orders::update_status))
        .route("/{id}/delete", post(orders::delete))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_form))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_form))
        .route("/{id}/delete", post(products::delete))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/{id}", post(categories::update))
        .route("/{id}/delete", post(categories::delete))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in))
        .route("/callback", get(auth::callback))
        .route("/sign-out", post(auth::sign_out))
}

/// Create all routes for the admin console.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/orders", order_routes())
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/auth", auth_routes())
}
