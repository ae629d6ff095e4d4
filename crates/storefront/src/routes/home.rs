//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::Theme;
use crate::routes::PageContext;
use crate::routes::categories::CategoryCardView;
use crate::routes::products::ProductCardView;
use crate::state::AppState;

/// Number of featured products on the home page.
const FEATURED_COUNT: usize = 8;

/// Number of category tiles on the home page.
const CATEGORY_PREVIEW_COUNT: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub featured: Vec<ProductCardView>,
    pub categories: Vec<CategoryCardView>,
    pub error: Option<String>,
}

/// Display the home page: hero, featured products, category strip.
///
/// Featured products are the highest-rated catalog entries; a failed fetch
/// renders the page with a banner instead of failing the request.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
) -> HomeTemplate {
    let mut error = None;

    let featured = match state.commerce().list_products(None).await {
        Ok(products) => {
            let mut ranked: Vec<_> = products.iter().cloned().collect();
            ranked.sort_by(|a, b| {
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            ranked
                .iter()
                .take(FEATURED_COUNT)
                .map(ProductCardView::from)
                .collect()
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch featured products");
            error = Some("Failed to load featured products.".to_string());
            Vec::new()
        }
    };

    let categories = match state.commerce().list_categories().await {
        Ok(categories) => categories
            .iter()
            .take(CATEGORY_PREVIEW_COUNT)
            .map(CategoryCardView::from)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch categories");
            Vec::new()
        }
    };

    HomeTemplate {
        ctx: PageContext::load(&session, theme).await,
        featured,
        categories,
        error,
    }
}
