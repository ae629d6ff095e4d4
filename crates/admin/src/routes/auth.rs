//! Auth routes bridging to the hosted identity provider.
//!
//! Identical flow to the storefront's, with one extra gate: the verified
//! profile must carry the admin role claim before a console session is
//! created. Failures render a standalone page rather than redirecting, so a
//! rejected account doesn't bounce between the console and the provider.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::auth::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Query parameters on the identity provider's callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub session_token: Option<String>,
}

/// Standalone sign-in failure page.
#[derive(Template, WebTemplate)]
#[template(path = "auth/denied.html")]
pub struct DeniedTemplate {
    pub message: &'static str,
}

/// Redirect to the identity provider's hosted sign-in page.
#[instrument(skip(state))]
pub async fn sign_in(State(state): State<AppState>) -> Redirect {
    let config = state.config();

    let url = match url::Url::parse_with_params(
        &config.identity.sign_in_url,
        &[(
            "redirect_url",
            format!("{}/auth/callback", config.base_url.trim_end_matches('/')),
        )],
    ) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::error!(error = %e, "invalid identity sign-in URL");
            return Redirect::to("/");
        }
    };

    Redirect::to(&url)
}

/// Verify the returned token and require the admin role claim.
#[instrument(skip(state, session, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(token) = query.session_token.filter(|t| !t.is_empty()) else {
        return DeniedTemplate {
            message: "Sign-in failed: the identity provider returned no session token.",
        }
        .into_response();
    };

    let profile = match state.identity().verify_session(&token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(error = %e, "session token verification failed");
            return DeniedTemplate {
                message: "Sign-in failed: the session token could not be verified.",
            }
            .into_response();
        }
    };

    let Some(admin) = CurrentAdmin::from_profile(profile) else {
        tracing::warn!("non-admin user attempted console sign-in");
        return DeniedTemplate {
            message: "This account does not have admin access.",
        }
        .into_response();
    };

    if let Err(e) = session.insert(session_keys::CURRENT_ADMIN, &admin).await {
        tracing::error!(error = %e, "failed to store admin in session");
        return DeniedTemplate {
            message: "Sign-in failed: the console session could not be created.",
        }
        .into_response();
    }

    tracing::info!(admin_id = %admin.id, "admin signed in");
    Redirect::to("/").into_response()
}

/// Drop the signed-in admin.
#[instrument(skip(session))]
pub async fn sign_out(session: Session) -> DeniedTemplate {
    if let Err(e) = session.remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN).await {
        tracing::warn!(error = %e, "failed to clear signed-in admin");
    }
    DeniedTemplate {
        message: "Signed out.",
    }
}
