//! Request and response bodies for the commerce API's checkout and order
//! endpoints.
//!
//! The catalog endpoints use [`ApiEnvelope`](brightbasket_core::ApiEnvelope)
//! and the shared models from `brightbasket-core`; only the bodies specific
//! to checkout and order creation live here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use brightbasket_core::{
    CartLine, CheckoutSessionId, Email, OrderStatus, ShippingAddress, UserId,
};

/// Body of `POST /api/checkout`.
///
/// `amount` is in minor units (cents); the items carry display prices in
/// major units, mirroring what the cart holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,
    /// Total in minor units (e.g. cents for USD).
    pub amount: i64,
    /// Lowercase ISO 4217 code, as the gateway expects.
    pub currency: String,
    pub user_id: UserId,
    pub customer_email: Email,
    pub shipping_address: ShippingAddress,
}

/// Response of `POST /api/checkout`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub session_id: CheckoutSessionId,
}

/// Body of `POST /api/order`, sent once after the payment redirect returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<CartLine>,
    pub total: Decimal,
    pub user_id: UserId,
    pub user_name: String,
    pub session_id: CheckoutSessionId,
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
}

/// Body of `PUT /api/order/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use brightbasket_core::ProductId;

    #[test]
    fn test_checkout_request_wire_shape() {
        let request = CheckoutRequest {
            items: vec![CartLine {
                id: ProductId::new("p1"),
                name: "Mug".into(),
                image: String::new(),
                price: Decimal::new(999, 2),
                quantity: 2,
                stock: 10,
            }],
            amount: 1998,
            currency: "usd".into(),
            user_id: UserId::new("user_1"),
            customer_email: Email::parse("shopper@example.com").unwrap(),
            shipping_address: ShippingAddress::default(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["amount"], 1998);
        assert_eq!(json["currency"], "usd");
        assert_eq!(json["userId"], "user_1");
        assert_eq!(json["customerEmail"], "shopper@example.com");
        assert!(json["shippingAddress"].is_object());
    }

    #[test]
    fn test_order_request_sends_screaming_status() {
        let request = OrderRequest {
            items: Vec::new(),
            total: Decimal::new(1000, 2),
            user_id: UserId::new("user_1"),
            user_name: "Riley".into(),
            session_id: CheckoutSessionId::new("cs_1"),
            shipping_address: ShippingAddress::default(),
            status: OrderStatus::Pending,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["sessionId"], "cs_1");
    }
}
