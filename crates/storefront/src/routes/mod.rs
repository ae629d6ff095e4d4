//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//! GET  /about                   - About page
//! POST /theme                   - Toggle light/dark theme cookie
//!
//! # Catalog
//! GET  /products                - Product listing (?search=)
//! GET  /products/{id}           - Product detail
//! GET  /categories              - Category listing
//! GET  /categories/{id}         - Category detail with products
//!
//! # Cart
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add item (form: product_id, quantity)
//! POST /cart/update             - Set quantity (0 removes)
//! POST /cart/remove             - Remove item
//! POST /cart/clear              - Empty the cart
//! GET  /cart/count              - Cart count badge fragment
//!
//! # Checkout
//! GET  /checkout                - Order summary + shipping address form
//! POST /checkout                - Create checkout session, redirect to gateway
//! GET  /checkout/success        - Payment returned; record the order
//! GET  /checkout/cancel         - Payment abandoned
//!
//! # Orders (requires auth)
//! GET  /orders                  - Order history
//! GET  /orders/{id}             - Order detail with status progress
//! POST /orders/{id}/cancel      - Cancel while still cancellable
//!
//! # Auth
//! GET  /auth/sign-in            - Redirect to the identity provider
//! GET  /auth/callback           - Verify the returned session token
//! POST /auth/sign-out           - Drop the signed-in user
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::middleware::Theme;
use crate::models::session::{self, CurrentUser, Flash};
use crate::state::AppState;

/// Ambient page data injected explicitly into every template.
///
/// Auth and theme state are read once per request at the composition root
/// and handed to templates as plain values — no template reaches into a
/// global.
pub struct PageContext {
    pub theme: Theme,
    pub user: Option<CurrentUser>,
    pub cart_count: u64,
    pub flash: Option<Flash>,
}

impl PageContext {
    /// Assemble the context for a page render, consuming the pending flash.
    pub async fn load(session: &Session, theme: Theme) -> Self {
        let user = session::current_user(session).await;
        let cart_count = session::load_cart(session).await.count();
        let flash = session::take_flash(session).await;

        Self {
            theme,
            user,
            cart_count,
            flash,
        }
    }
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(categories::index))
        .route("/categories/{id}", get(categories::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/success", get(checkout::success))
        .route("/cancel", get(checkout::cancel))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in))
        .route("/callback", get(auth::callback))
        .route("/sign-out", post(auth::sign_out))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/theme", post(pages::toggle_theme))
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/orders", order_routes())
        .nest("/auth", auth_routes())
}
