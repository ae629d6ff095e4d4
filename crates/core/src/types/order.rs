//! Order models received from the commerce API.
//!
//! Orders are created by the storefront after a successful payment redirect
//! and mutated only by the commerce API; this crate never changes an order's
//! status locally.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::ShippingAddress;
use super::id::{OrderId, ProductId, UserId};
use super::status::OrderStatus;

/// One line of an order, as recorded at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub id: Option<String>,
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    /// Unit price at purchase time.
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderItem {
    /// Price × quantity for this item.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// An order as returned by `GET /api/order/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(default)]
    pub user_name: String,
    pub total: Decimal,
    /// Normalized to `Pending` when the wire value is outside the known set.
    #[serde(deserialize_with = "lenient_status")]
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default, alias = "orderItems")]
    pub items: Vec<OrderItem>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Deserialize a status, mapping unknown wire values to `Pending` the way
/// the admin order list has always normalized them.
fn lenient_status<'de, D>(deserializer: D) -> Result<OrderStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}
