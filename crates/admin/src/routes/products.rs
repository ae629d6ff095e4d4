//! Product management handlers.
//!
//! Plain form CRUD proxied to the commerce API. Image hosting is external to
//! this system, so the form takes an image URL.

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

use brightbasket_core::{Category, CategoryId, Product, ProductId};

use crate::commerce::types::ProductInput;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::{PageContext, flash_error, flash_success};
use crate::state::AppState;

/// Product row data for the management table.
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub low_stock: bool,
    pub category: String,
}

impl ProductRowView {
    fn new(product: &Product, categories: &[Category]) -> Self {
        let category = product
            .category
            .as_ref()
            .map(|c| c.name.clone())
            .or_else(|| {
                product.category_id.as_ref().and_then(|id| {
                    categories
                        .iter()
                        .find(|c| &c.id == id)
                        .map(|c| c.name.clone())
                })
            })
            .unwrap_or_else(|| "—".to_string());

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price,
            stock: product.stock,
            low_stock: product.low_stock(),
            category,
        }
    }
}

/// Category choice for the product form's selector.
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Form state for create and edit.
pub struct ProductFormView {
    /// `None` for the create form, the product id for edit.
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: u32,
    pub image: String,
    pub categories: Vec<CategoryOption>,
}

impl ProductFormView {
    fn empty(categories: &[Category]) -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            price: String::new(),
            stock: 0,
            image: String::new(),
            categories: category_options(categories, None),
        }
    }

    fn for_product(product: &Product, categories: &[Category]) -> Self {
        Self {
            id: Some(product.id.to_string()),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            stock: product.stock,
            image: product.image.clone(),
            categories: category_options(categories, product.category_id.as_ref()),
        }
    }
}

fn category_options(categories: &[Category], current: Option<&CategoryId>) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|c| CategoryOption {
            id: c.id.to_string(),
            name: c.name.clone(),
            selected: Some(&c.id) == current,
        })
        .collect()
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
}

/// Product create/update form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: String,
    pub stock: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category_id: String,
}

impl ProductForm {
    /// Validate the form into a request body.
    fn into_input(self) -> std::result::Result<ProductInput, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let price: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| "Price must be a number".to_string())?;
        if price.is_sign_negative() {
            return Err("Price cannot be negative".to_string());
        }

        let category_id = (!self.category_id.trim().is_empty())
            .then(|| CategoryId::new(self.category_id.trim()));

        Ok(ProductInput {
            name,
            description: self.description.trim().to_string(),
            price,
            stock: self.stock,
            image: self.image.trim().to_string(),
            category_id,
            rating: 0.0,
        })
    }
}

/// Product management page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub ctx: PageContext,
    pub products: Vec<ProductRowView>,
    pub q: String,
    pub error: Option<String>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub ctx: PageContext,
    pub form: ProductFormView,
}

/// Display the product management table.
#[instrument(skip(state, session, admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<ProductsQuery>,
) -> ProductsIndexTemplate {
    let q = query.q.unwrap_or_default();
    let needle = q.trim().to_lowercase();

    let commerce = state.commerce();
    let (products, categories) = tokio::join!(commerce.list_products(), commerce.list_categories());
    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch categories for product table");
        Vec::new()
    });

    let (products, error) = match products {
        Ok(products) => {
            let rows = products
                .iter()
                .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
                .map(|p| ProductRowView::new(p, &categories))
                .collect();
            (rows, None)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch products");
            (Vec::new(), Some("Failed to fetch products".to_string()))
        }
    };

    ProductsIndexTemplate {
        ctx: PageContext::load(&session, admin.name).await,
        products,
        q,
        error,
    }
}

/// Display the create form.
#[instrument(skip(state, session, admin))]
pub async fn new_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> ProductFormTemplate {
    let categories = state.commerce().list_categories().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch categories for product form");
        Vec::new()
    });

    ProductFormTemplate {
        ctx: PageContext::load(&session, admin.name).await,
        form: ProductFormView::empty(&categories),
    }
}

/// Create a product.
#[instrument(skip(state, session, _admin, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Form(form): Form<ProductForm>,
) -> Redirect {
    let input = match form.into_input() {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to("/products/new");
        }
    };

    match state.commerce().create_product(&input).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product created");
            flash_success(&session, format!("Product \"{}\" created", product.name)).await;
            Redirect::to("/products")
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create product");
            flash_error(&session, "Failed to create product").await;
            Redirect::to("/products/new")
        }
    }
}

/// Display the edit form.
#[instrument(skip(state, session, admin))]
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let product_id = ProductId::new(id);

    let commerce = state.commerce();
    let (product, categories) =
        tokio::join!(commerce.get_product(&product_id), commerce.list_categories());
    let categories = categories.unwrap_or_default();
    let product = product?;

    Ok(ProductFormTemplate {
        ctx: PageContext::load(&session, admin.name).await,
        form: ProductFormView::for_product(&product, &categories),
    })
}

/// Update a product.
#[instrument(skip(state, session, _admin, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Redirect {
    let product_id = ProductId::new(id);

    let input = match form.into_input() {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to(&format!("/products/{product_id}/edit"));
        }
    };

    match state.commerce().update_product(&product_id, &input).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product updated");
            flash_success(&session, format!("Product \"{}\" updated", product.name)).await;
        }
        Err(e) => {
            tracing::error!(error = %e, product_id = %product_id, "failed to update product");
            flash_error(&session, "Failed to update product").await;
        }
    }

    Redirect::to("/products")
}

/// Delete a product.
#[instrument(skip(state, session, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Redirect {
    let product_id = ProductId::new(id);

    match state.commerce().delete_product(&product_id).await {
        Ok(()) => {
            tracing::info!(product_id = %product_id, "product deleted");
            flash_success(&session, "Product deleted").await;
        }
        Err(e) => {
            tracing::error!(error = %e, product_id = %product_id, "failed to delete product");
            flash_error(&session, "Failed to delete product").await;
        }
    }

    Redirect::to("/products")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(price: &str, name: &str) -> ProductForm {
        ProductForm {
            name: name.into(),
            description: "desc".into(),
            price: price.into(),
            stock: 3,
            image: String::new(),
            category_id: String::new(),
        }
    }

    #[test]
    fn test_form_parses_price() {
        let input = form("12.50", "Board").into_input().unwrap();
        assert_eq!(input.price, Decimal::new(1250, 2));
        assert!(input.category_id.is_none());
    }

    #[test]
    fn test_form_rejects_bad_price_and_empty_name() {
        assert!(form("twelve", "Board").into_input().is_err());
        assert!(form("-1", "Board").into_input().is_err());
        assert!(form("1.00", "  ").into_input().is_err());
    }
}
