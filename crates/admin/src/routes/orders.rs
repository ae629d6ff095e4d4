//! Order management handlers.
//!
//! The transition buttons a row offers come from the status table in
//! `brightbasket-core`; the commerce API remains the authority. After a
//! successful PUT the order is re-fetched and the accepted value is what
//! renders — a failed update re-renders the untouched original row with an
//! error notification, never an assumed success.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use brightbasket_core::{Order, OrderId, OrderStatus, ShippingAddress};

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::{PageContext, flash_error, flash_success};
use crate::state::AppState;

/// Order row data for the management table.
pub struct OrderRowView {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub date: String,
    pub total: Decimal,
    pub status: OrderStatus,
    /// Statuses the admin may move this order to.
    pub actions: &'static [OrderStatus],
    pub expanded: bool,
    pub items: Vec<OrderItemView>,
    pub shipping_address: Option<ShippingAddress>,
}

/// Order item display data for the expanded row.
pub struct OrderItemView {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderRowView {
    fn new(order: &Order, expanded: bool) -> Self {
        Self {
            id: order.id.to_string(),
            user_id: order.user_id.to_string(),
            user_name: order.user_name.clone(),
            date: order
                .created_at
                .map_or_else(|| "N/A".to_string(), |at| at.format("%Y-%m-%d").to_string()),
            total: order.total,
            status: order.status,
            actions: order.status.transitions(),
            expanded,
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    name: item.name.clone(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            shipping_address: order.shipping_address.clone(),
        }
    }
}

/// Filter/expansion query parameters.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub q: Option<String>,
    pub expand: Option<String>,
}

/// Status transition form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Order management page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub ctx: PageContext,
    pub orders: Vec<OrderRowView>,
    pub q: String,
    pub error: Option<String>,
}

/// Case-insensitive substring match over id, user id, and status.
fn matches_filter(order: &Order, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    order.id.as_str().to_lowercase().contains(&needle)
        || order.user_id.as_str().to_lowercase().contains(&needle)
        || order.status.label().to_lowercase().contains(&needle)
}

/// Display the order management table.
#[instrument(skip(state, session, admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<OrdersQuery>,
) -> OrdersIndexTemplate {
    let q = query.q.unwrap_or_default();
    let expand = query.expand.unwrap_or_default();

    let (orders, error) = match state.commerce().list_orders().await {
        Ok(orders) => {
            let rows = orders
                .iter()
                .filter(|order| matches_filter(order, q.trim()))
                .map(|order| OrderRowView::new(order, order.id.as_str() == expand))
                .collect();
            (rows, None)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch orders");
            (Vec::new(), Some("Failed to fetch orders".to_string()))
        }
    };

    OrdersIndexTemplate {
        ctx: PageContext::load(&session, admin.name).await,
        orders,
        q,
        error,
    }
}

/// Transition an order to a new status.
///
/// The requested transition is validated against the status table before
/// anything reaches the wire; the table exists to keep the buttons honest,
/// and this guard keeps hand-crafted form posts honest too.
#[instrument(skip(state, session, _admin))]
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let order_id = OrderId::new(id);

    let Ok(next) = form.status.parse::<OrderStatus>() else {
        flash_error(&session, "Invalid status").await;
        return Ok(Redirect::to("/orders"));
    };

    let order = state.commerce().get_order(&order_id).await?;
    if !order.status.can_transition_to(next) {
        flash_error(
            &session,
            format!("{} orders cannot move to {next}", order.status),
        )
        .await;
        return Ok(Redirect::to("/orders"));
    }

    match state.commerce().update_order_status(&order_id, next).await {
        Ok(updated) => {
            tracing::info!(order_id = %updated.id, status = %updated.status, "order status updated");
            flash_success(
                &session,
                format!("Order {} is now {}", updated.id, updated.status),
            )
            .await;
        }
        Err(e) => {
            tracing::error!(error = %e, order_id = %order_id, "failed to update order status");
            flash_error(&session, "Failed to update order status").await;
        }
    }

    Ok(Redirect::to("/orders"))
}

/// Delete an order.
#[instrument(skip(state, session, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Redirect {
    let order_id = OrderId::new(id);

    match state.commerce().delete_order(&order_id).await {
        Ok(()) => {
            tracing::info!(order_id = %order_id, "order deleted");
            flash_success(&session, format!("Order {order_id} deleted")).await;
        }
        Err(e) => {
            tracing::error!(error = %e, order_id = %order_id, "failed to delete order");
            flash_error(&session, "Failed to delete order").await;
        }
    }

    Redirect::to("/orders")
}

#[cfg(test)]
mod tests {
    use super::*;
    use brightbasket_core::UserId;

    fn order(id: &str, user: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: UserId::new(user),
            user_name: "Riley".into(),
            total: Decimal::new(1000, 2),
            status,
            shipping_address: None,
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_filter_matches_id_user_and_status() {
        let o = order("ord_42", "user_7", OrderStatus::Shipped);
        assert!(matches_filter(&o, ""));
        assert!(matches_filter(&o, "ORD_42"));
        assert!(matches_filter(&o, "user_7"));
        assert!(matches_filter(&o, "ship"));
        assert!(!matches_filter(&o, "delivered"));
    }

    #[test]
    fn test_row_actions_follow_transition_table() {
        let row = OrderRowView::new(&order("o1", "u1", OrderStatus::Pending), false);
        assert_eq!(
            row.actions,
            &[OrderStatus::Processing, OrderStatus::Cancelled]
        );

        let row = OrderRowView::new(&order("o2", "u1", OrderStatus::Delivered), false);
        assert!(row.actions.is_empty());
    }
}
