//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use brightbasket_core::{CategoryId, Product, ProductId};

use crate::error::Result;
use crate::filters;
use crate::middleware::Theme;
use crate::routes::PageContext;
use crate::state::AppState;

/// Product card data for grid templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub rating: String,
    pub image: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price,
            rating: format!("{:.1}", product.rating),
            image: product.image.clone(),
            in_stock: product.in_stock(),
        }
    }
}

/// Product detail data for the show template.
pub struct ProductDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub rating: String,
    pub image: String,
    pub stock: u32,
    pub in_stock: bool,
    pub category: Option<CategoryLinkView>,
}

/// Category link shown on the product detail page.
pub struct CategoryLinkView {
    pub id: String,
    pub name: String,
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub ctx: PageContext,
    pub products: Vec<ProductCardView>,
    pub search: String,
    pub error: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub ctx: PageContext,
    pub product: ProductDetailView,
    pub related: Vec<ProductCardView>,
}

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
    Query(query): Query<SearchQuery>,
) -> ProductsIndexTemplate {
    let search = query.search.unwrap_or_default();
    let term = search.trim();
    let term = (!term.is_empty()).then_some(term);

    let (products, error) = match state.commerce().list_products(term).await {
        Ok(products) => (products.iter().map(ProductCardView::from).collect(), None),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch products");
            (
                Vec::new(),
                Some("Failed to load products. Please try again later.".to_string()),
            )
        }
    };

    ProductsIndexTemplate {
        ctx: PageContext::load(&session, theme).await,
        products,
        search,
        error,
    }
}

/// Display product detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate> {
    let product_id = ProductId::new(id);
    let product = state.commerce().get_product(&product_id).await?;

    // Related products from the same category; failures here only cost the
    // strip, not the page.
    let related = match &product.category_id {
        Some(category_id) => related_products(&state, category_id, &product_id).await,
        None => Vec::new(),
    };

    let category = product
        .category
        .as_ref()
        .map(|c| CategoryLinkView {
            id: c.id.to_string(),
            name: c.name.clone(),
        })
        .or_else(|| {
            product.category_id.as_ref().map(|id| CategoryLinkView {
                id: id.to_string(),
                name: "Category".to_string(),
            })
        });

    let view = ProductDetailView {
        id: product.id.to_string(),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price,
        rating: format!("{:.1}", product.rating),
        image: product.image.clone(),
        stock: product.stock,
        in_stock: product.in_stock(),
        category,
    };

    Ok(ProductShowTemplate {
        ctx: PageContext::load(&session, theme).await,
        product: view,
        related,
    })
}

async fn related_products(
    state: &AppState,
    category_id: &CategoryId,
    current: &ProductId,
) -> Vec<ProductCardView> {
    match state.commerce().category_with_products(category_id).await {
        Ok(pair) => pair
            .1
            .iter()
            .filter(|p| &p.id != current)
            .take(4)
            .map(ProductCardView::from)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch related products");
            Vec::new()
        }
    }
}
