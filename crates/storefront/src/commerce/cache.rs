//! Cache value wrapper for commerce catalog responses.
//!
//! A single moka cache holds the differently-shaped catalog payloads, so
//! values are wrapped in an enum. `Arc` keeps cloning out of the hot path
//! when a cached entry is handed to multiple requests.

use std::sync::Arc;

use brightbasket_core::{Category, Product};

/// A cached catalog response.
#[derive(Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
    Categories(Arc<Vec<Category>>),
    CategoryProducts(Arc<(Category, Vec<Product>)>),
}

impl CacheValue {
    /// Unwrap a product list, if that is what was cached under the key.
    pub fn into_products(self) -> Option<Arc<Vec<Product>>> {
        match self {
            Self::Products(products) => Some(products),
            _ => None,
        }
    }

    pub fn into_product(self) -> Option<Arc<Product>> {
        match self {
            Self::Product(product) => Some(product),
            _ => None,
        }
    }

    pub fn into_categories(self) -> Option<Arc<Vec<Category>>> {
        match self {
            Self::Categories(categories) => Some(categories),
            _ => None,
        }
    }

    pub fn into_category_products(self) -> Option<Arc<(Category, Vec<Product>)>> {
        match self {
            Self::CategoryProducts(pair) => Some(pair),
            _ => None,
        }
    }
}
