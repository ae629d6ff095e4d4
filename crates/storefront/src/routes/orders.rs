//! Customer order history and detail handlers.
//!
//! Orders are read from the commerce API on every view; nothing is cached
//! locally. Cancellation goes through the API and the page re-renders from
//! the freshly fetched server value, never from an assumed success.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use brightbasket_core::{Order, OrderId, OrderStatus, ShippingAddress};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAuth, Theme};
use crate::models::session::flash_error;
use crate::models::session::flash_success;
use crate::routes::PageContext;
use crate::state::AppState;

/// Order row data for the history template.
pub struct OrderRowView {
    pub id: String,
    pub date: String,
    pub total: Decimal,
    pub status: OrderStatus,
}

/// Order item display data.
pub struct OrderItemView {
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Full order display data for the detail template.
pub struct OrderDetailView {
    pub id: String,
    pub date: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItemView>,
    pub shipping_address: Option<ShippingAddress>,
    pub can_cancel: bool,
}

fn format_date(order: &Order) -> String {
    order
        .created_at
        .map_or_else(|| "N/A".to_string(), |at| at.format("%B %-d, %Y").to_string())
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            date: format_date(order),
            total: order.total,
            status: order.status,
        }
    }
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            date: format_date(order),
            total: order.total,
            status: order.status,
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    name: item.name.clone(),
                    image: item.image.clone(),
                    price: item.price,
                    quantity: item.quantity,
                    line_total: item.line_total(),
                })
                .collect(),
            shipping_address: order.shipping_address.clone(),
            can_cancel: order.status.can_cancel(),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub ctx: PageContext,
    pub orders: Vec<OrderRowView>,
    pub error: Option<String>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub ctx: PageContext,
    pub order: OrderDetailView,
}

/// Display the signed-in user's orders.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
    RequireAuth(user): RequireAuth,
) -> OrdersIndexTemplate {
    let (orders, error) = match state.commerce().list_orders_for_user(&user.id).await {
        Ok(orders) => (orders.iter().map(OrderRowView::from).collect(), None),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch order history");
            (Vec::new(), Some("Failed to load orders.".to_string()))
        }
    };

    OrdersIndexTemplate {
        ctx: PageContext::load(&session, theme).await,
        orders,
        error,
    }
}

/// Display a single order with its status progress.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<OrderShowTemplate> {
    let order_id = OrderId::new(id);
    let order = state.commerce().get_order(&order_id).await?;

    // Orders are visible to their owner only.
    if order.user_id != user.id {
        return Err(AppError::NotFound(format!("order {order_id}")));
    }

    Ok(OrderShowTemplate {
        ctx: PageContext::load(&session, theme).await,
        order: OrderDetailView::from(&order),
    })
}

/// Cancel an order that is still cancellable.
///
/// The gate mirrors the status table; the commerce API remains the
/// authority and its accepted value is what gets rendered next.
#[instrument(skip(state, session))]
pub async fn cancel(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let order_id = OrderId::new(id);
    let order = state.commerce().get_order(&order_id).await?;

    if order.user_id != user.id {
        return Err(AppError::NotFound(format!("order {order_id}")));
    }
    if !order.status.can_cancel() {
        flash_error(&session, "This order can no longer be cancelled.").await;
        return Ok(Redirect::to(&format!("/orders/{order_id}")));
    }

    match state
        .commerce()
        .update_order_status(&order_id, OrderStatus::Cancelled)
        .await
    {
        Ok(updated) => {
            tracing::info!(order_id = %updated.id, status = %updated.status, "order cancelled");
            flash_success(&session, "Order cancelled successfully").await;
        }
        Err(e) => {
            tracing::error!(error = %e, order_id = %order_id, "order cancellation failed");
            flash_error(&session, "Failed to cancel order").await;
        }
    }

    Ok(Redirect::to(&format!("/orders/{order_id}")))
}
