//! Dashboard overview handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use brightbasket_core::{Order, OrderStatus, Product};

use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::PageContext;
use crate::state::AppState;

/// Number of recent orders shown on the dashboard.
const RECENT_ORDERS: usize = 5;

/// A low-stock product row.
pub struct LowStockView {
    pub id: String,
    pub name: String,
    pub stock: u32,
}

/// A recent order row.
pub struct RecentOrderView {
    pub id: String,
    pub user_name: String,
    pub total: Decimal,
    pub status: OrderStatus,
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub revenue: Decimal,
    pub order_count: usize,
    pub product_count: usize,
    pub category_count: usize,
    pub low_stock: Vec<LowStockView>,
    pub recent_orders: Vec<RecentOrderView>,
    pub error: Option<String>,
}

/// Revenue counts every order that wasn't cancelled or returned.
fn total_revenue(orders: &[Order]) -> Decimal {
    orders
        .iter()
        .filter(|o| !matches!(o.status, OrderStatus::Cancelled | OrderStatus::Returned))
        .map(|o| o.total)
        .sum()
}

fn low_stock_rows(products: &[Product]) -> Vec<LowStockView> {
    products
        .iter()
        .filter(|p| p.low_stock())
        .map(|p| LowStockView {
            id: p.id.to_string(),
            name: p.name.clone(),
            stock: p.stock,
        })
        .collect()
}

fn recent_order_rows(orders: &[Order]) -> Vec<RecentOrderView> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
        .into_iter()
        .take(RECENT_ORDERS)
        .map(|o| RecentOrderView {
            id: o.id.to_string(),
            user_name: o.user_name.clone(),
            total: o.total,
            status: o.status,
        })
        .collect()
}

/// Display the dashboard overview.
#[instrument(skip(state, session, admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> DashboardTemplate {
    let commerce = state.commerce();
    let (orders, products, categories) = tokio::join!(
        commerce.list_orders(),
        commerce.list_products(),
        commerce.list_categories(),
    );

    let mut error = None;
    let orders = orders.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch orders for dashboard");
        error = Some("Some dashboard data failed to load.".to_string());
        Vec::new()
    });
    let products = products.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch products for dashboard");
        error = Some("Some dashboard data failed to load.".to_string());
        Vec::new()
    });
    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch categories for dashboard");
        error = Some("Some dashboard data failed to load.".to_string());
        Vec::new()
    });

    DashboardTemplate {
        ctx: PageContext::load(&session, admin.name).await,
        revenue: total_revenue(&orders),
        order_count: orders.len(),
        product_count: products.len(),
        category_count: categories.len(),
        low_stock: low_stock_rows(&products),
        recent_orders: recent_order_rows(&orders),
        error,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use brightbasket_core::{OrderId, UserId};

    fn order(id: &str, total: Decimal, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: UserId::new("u1"),
            user_name: "Riley".into(),
            total,
            status,
            shipping_address: None,
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_revenue_excludes_cancelled_and_returned() {
        let orders = vec![
            order("1", Decimal::new(1000, 2), OrderStatus::Delivered),
            order("2", Decimal::new(2000, 2), OrderStatus::Pending),
            order("3", Decimal::new(5000, 2), OrderStatus::Cancelled),
            order("4", Decimal::new(700, 2), OrderStatus::Returned),
        ];

        assert_eq!(total_revenue(&orders), Decimal::new(3000, 2));
    }
}
