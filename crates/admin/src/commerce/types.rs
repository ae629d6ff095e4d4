//! Request bodies for the commerce API's admin write surface.

use rust_decimal::Decimal;
use serde::Serialize;

use brightbasket_core::{CategoryId, OrderStatus};

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: u32,
    /// Image URL; hosting is external to this system.
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    pub rating: f64,
}

/// Body of `POST /categories` and `PUT /categories/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
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

    #[test]
    fn test_product_input_wire_shape() {
        let input = ProductInput {
            name: "Mug".into(),
            description: "Stoneware mug".into(),
            price: Decimal::new(899, 2),
            stock: 24,
            image: "https://img.example/mug.jpg".into(),
            category_id: Some(CategoryId::new("c1")),
            rating: 0.0,
        };

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["categoryId"], "c1");
        assert_eq!(json["price"], "8.99");
    }

    #[test]
    fn test_category_input_omits_absent_fields() {
        let input = CategoryInput {
            name: "Kitchen".into(),
            description: None,
            image: None,
        };

        let json = serde_json::to_string(&input).unwrap();
        assert!(!json.contains("description"));
        assert!(!json.contains("image"));
    }
}
