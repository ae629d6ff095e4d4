//! Cart route handlers.
//!
//! All mutations go through the core cart store, then persist the cart slot.
//! The confirmation flash is queued only after the slot write, so it can
//! never interfere with the state transition it reports.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use brightbasket_core::{Cart, CartLine, LineItem, ProductId, address};

use crate::filters;
use crate::middleware::Theme;
use crate::models::session::{self, flash_error, flash_success};
use crate::routes::PageContext;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub line_total: Decimal,
    pub quantity: u32,
    pub stock: u32,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            image: line.image.clone(),
            price: line.price,
            line_total: line.line_total(),
            quantity: line.quantity,
            stock: line.stock,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub free_shipping: bool,
    pub count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.total();
        let shipping = address::shipping_fee(subtotal);
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal,
            shipping,
            total: address::order_total(subtotal),
            free_shipping: shipping.is_zero(),
            count: cart.count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Where to send the shopper after a cart mutation: back to the page the
/// form was on, falling back to the cart page.
fn back_to(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| "/cart".to_string(), ToString::to_string)
}

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session, theme: Theme) -> CartShowTemplate {
    let cart = session::load_cart(&session).await;

    CartShowTemplate {
        ctx: PageContext::load(&session, theme).await,
        cart: CartView::from(&cart),
    }
}

/// Add an item to the cart.
///
/// The product is fetched from the catalog so the line carries an add-time
/// copy of price, name, image, and advisory stock. An absent or zero form
/// quantity is treated as one unit.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Redirect {
    let product_id = ProductId::new(form.product_id);
    let quantity = form
        .quantity
        .and_then(NonZeroU32::new)
        .unwrap_or(NonZeroU32::MIN);

    let product = match state.commerce().get_product(&product_id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::error!(error = %e, product_id = %product_id, "failed to fetch product for cart add");
            flash_error(&session, "Could not add that item to your cart.").await;
            return Redirect::to(&back_to(&headers));
        }
    };

    let item = LineItem {
        id: product.id.clone(),
        name: product.name.clone(),
        image: product.image.clone(),
        price: product.price,
        stock: product.stock,
    };

    let mut cart = session::load_cart(&session).await;
    cart.add(item, quantity);
    session::save_cart(&session, &cart).await;

    flash_success(
        &session,
        format!("{} {} added to cart", quantity, product.name),
    )
    .await;

    Redirect::to(&back_to(&headers))
}

/// Set a line's quantity; zero removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Redirect {
    let product_id = ProductId::new(form.product_id);

    let mut cart = session::load_cart(&session).await;
    cart.set_quantity(&product_id, form.quantity);
    session::save_cart(&session, &cart).await;

    Redirect::to("/cart")
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Redirect {
    let product_id = ProductId::new(form.product_id);

    let mut cart = session::load_cart(&session).await;
    cart.remove(&product_id);
    session::save_cart(&session, &cart).await;

    Redirect::to("/cart")
}

/// Empty the cart and drop its slot.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Redirect {
    session::clear_cart(&session).await;
    Redirect::to("/cart")
}

/// Cart count badge fragment.
#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    let count = session::load_cart(&session).await.count();
    CartCountTemplate { count }
}
