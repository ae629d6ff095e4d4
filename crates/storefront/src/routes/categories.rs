//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use brightbasket_core::{Category, CategoryId};

use crate::error::Result;
use crate::filters;
use crate::middleware::Theme;
use crate::routes::PageContext;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Category card data for grid templates.
#[derive(Clone)]
pub struct CategoryCardView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
}

impl From<&Category> for CategoryCardView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            image: category.image.clone().unwrap_or_default(),
            description: category.description.clone().unwrap_or_default(),
        }
    }
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub ctx: PageContext,
    pub categories: Vec<CategoryCardView>,
    pub error: Option<String>,
}

/// Category detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub ctx: PageContext,
    pub category: CategoryCardView,
    pub products: Vec<ProductCardView>,
}

/// Display category listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
) -> CategoriesIndexTemplate {
    let (categories, error) = match state.commerce().list_categories().await {
        Ok(categories) => (
            categories.iter().map(CategoryCardView::from).collect(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch categories");
            (
                Vec::new(),
                Some("Failed to load categories. Please try again later.".to_string()),
            )
        }
    };

    CategoriesIndexTemplate {
        ctx: PageContext::load(&session, theme).await,
        categories,
        error,
    }
}

/// Display a category with its products.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
    Path(id): Path<String>,
) -> Result<CategoryShowTemplate> {
    let category_id = CategoryId::new(id);
    let pair = state.commerce().category_with_products(&category_id).await?;
    let (category, products) = (&pair.0, &pair.1);

    Ok(CategoryShowTemplate {
        ctx: PageContext::load(&session, theme).await,
        category: CategoryCardView::from(category),
        products: products.iter().map(ProductCardView::from).collect(),
    })
}
