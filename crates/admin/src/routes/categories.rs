//! Category management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use brightbasket_core::{Category, CategoryId, Product};

use crate::commerce::types::CategoryInput;
use crate::middleware::RequireAdminAuth;
use crate::routes::{PageContext, flash_error, flash_success};
use crate::state::AppState;

/// Category row data for the management table.
pub struct CategoryRowView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub product_count: usize,
}

impl CategoryRowView {
    fn new(category: &Category, products: &[Product]) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            image: category.image.clone().unwrap_or_default(),
            product_count: products
                .iter()
                .filter(|p| p.category_id.as_ref() == Some(&category.id))
                .count(),
        }
    }
}

/// Category create/update form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
}

impl CategoryForm {
    fn into_input(self) -> Result<CategoryInput, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        Ok(CategoryInput {
            name,
            description: (!self.description.trim().is_empty())
                .then(|| self.description.trim().to_string()),
            image: (!self.image.trim().is_empty()).then(|| self.image.trim().to_string()),
        })
    }
}

/// Category management page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub ctx: PageContext,
    pub categories: Vec<CategoryRowView>,
    pub error: Option<String>,
}

/// Display the category table with its inline create form.
#[instrument(skip(state, session, admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> CategoriesIndexTemplate {
    let commerce = state.commerce();
    let (categories, products) = tokio::join!(commerce.list_categories(), commerce.list_products());
    let products = products.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to fetch products for category counts");
        Vec::new()
    });

    let (categories, error) = match categories {
        Ok(categories) => (
            categories
                .iter()
                .map(|c| CategoryRowView::new(c, &products))
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!(error = %e, "failed to fetch categories");
            (Vec::new(), Some("Failed to fetch categories".to_string()))
        }
    };

    CategoriesIndexTemplate {
        ctx: PageContext::load(&session, admin.name).await,
        categories,
        error,
    }
}

/// Create a category.
#[instrument(skip(state, session, _admin, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Form(form): Form<CategoryForm>,
) -> Redirect {
    let input = match form.into_input() {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to("/categories");
        }
    };

    match state.commerce().create_category(&input).await {
        Ok(category) => {
            tracing::info!(category_id = %category.id, "category created");
            flash_success(&session, format!("Category \"{}\" created", category.name)).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to create category");
            flash_error(&session, "Failed to create category").await;
        }
    }

    Redirect::to("/categories")
}

/// Update a category.
#[instrument(skip(state, session, _admin, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Redirect {
    let category_id = CategoryId::new(id);

    let input = match form.into_input() {
        Ok(input) => input,
        Err(message) => {
            flash_error(&session, message).await;
            return Redirect::to("/categories");
        }
    };

    match state.commerce().update_category(&category_id, &input).await {
        Ok(category) => {
            tracing::info!(category_id = %category.id, "category updated");
            flash_success(&session, format!("Category \"{}\" updated", category.name)).await;
        }
        Err(e) => {
            tracing::error!(error = %e, category_id = %category_id, "failed to update category");
            flash_error(&session, "Failed to update category").await;
        }
    }

    Redirect::to("/categories")
}

/// Delete a category.
#[instrument(skip(state, session, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Redirect {
    let category_id = CategoryId::new(id);

    match state.commerce().delete_category(&category_id).await {
        Ok(()) => {
            tracing::info!(category_id = %category_id, "category deleted");
            flash_success(&session, "Category deleted").await;
        }
        Err(e) => {
            tracing::error!(error = %e, category_id = %category_id, "failed to delete category");
            flash_error(&session, "Failed to delete category").await;
        }
    }

    Redirect::to("/categories")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_trims_and_drops_empty_optionals() {
        let input = CategoryForm {
            name: "  Kitchen  ".into(),
            description: "   ".into(),
            image: String::new(),
        }
        .into_input()
        .unwrap();

        assert_eq!(input.name, "Kitchen");
        assert!(input.description.is_none());
        assert!(input.image.is_none());
    }

    #[test]
    fn test_form_requires_name() {
        let result = CategoryForm {
            name: " ".into(),
            description: String::new(),
            image: String::new(),
        }
        .into_input();

        assert!(result.is_err());
    }
}
