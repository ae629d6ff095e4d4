//! Static pages and the theme toggle.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{HeaderMap, HeaderValue, header},
    response::{AppendHeaders, IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::Theme;
use crate::middleware::theme::THEME_COOKIE_NAME;
use crate::routes::PageContext;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub ctx: PageContext,
}

/// Display the about page.
#[instrument(skip(session))]
pub async fn about(session: Session, theme: Theme) -> AboutTemplate {
    AboutTemplate {
        ctx: PageContext::load(&session, theme).await,
    }
}

/// Toggle the theme cookie and return to the page the toggle was on.
#[instrument(skip(headers))]
pub async fn toggle_theme(theme: Theme, headers: HeaderMap) -> impl IntoResponse {
    let next = theme.toggled();
    let cookie = format!(
        "{THEME_COOKIE_NAME}={}; Path=/; Max-Age=31536000; SameSite=Lax",
        next.as_str()
    );

    let back = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("/")
        .to_string();

    (
        AppendHeaders([(
            header::SET_COOKIE,
            HeaderValue::from_str(&cookie)
                .unwrap_or_else(|_| HeaderValue::from_static("theme=light; Path=/")),
        )]),
        Redirect::to(&back),
    )
}
