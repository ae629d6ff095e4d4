//! Catalog models received from the commerce API.
//!
//! These are wire-shaped: field names follow the API's camelCase JSON and
//! deserialization is tolerant of optional fields the backend sometimes
//! omits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// Stock level below which the admin dashboard flags a product.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Response envelope used by the catalog endpoints.
///
/// `GET /products` and friends wrap their payload as
/// `{ "success": bool, "message": ..., "data": ... }`; the order endpoints
/// return bare JSON and don't use this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub category: Option<Category>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether at least one unit is advertised as available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether the advertised stock is low enough to flag in the admin.
    #[must_use]
    pub const fn low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_from_api_json() {
        let json = r#"{
            "success": true,
            "data": [{
                "id": "p1",
                "name": "Walnut Cutting Board",
                "description": "End-grain walnut board",
                "price": "49.99",
                "rating": 4.5,
                "image": "https://img.example/p1.jpg",
                "stock": 3,
                "categoryId": "c1",
                "createdAt": "2025-03-01T12:00:00Z",
                "updatedAt": "2025-03-02T12:00:00Z"
            }]
        }"#;

        let envelope: ApiEnvelope<Vec<Product>> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        let product = envelope.data.first().unwrap();
        assert_eq!(product.price, Decimal::new(4999, 2));
        assert!(product.low_stock());
        assert!(product.in_stock());
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let json = r#"{"id": "p2", "name": "Mug", "price": "8.00"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.stock, 0);
        assert!(product.category_id.is_none());
        assert!(!product.in_stock());
    }
}
