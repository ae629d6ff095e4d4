//! Auth routes bridging to the hosted identity provider.
//!
//! The provider owns credentials and the sign-in UI. This module only
//! redirects out with a return URL, verifies the token the provider sends
//! back, and caches the resulting claims in the session.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::models::session::{CurrentUser, flash_error, flash_success, keys};
use crate::state::AppState;

/// Query parameters for the sign-in redirect.
#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    pub return_to: Option<String>,
}

/// Query parameters on the identity provider's callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub session_token: Option<String>,
    pub return_to: Option<String>,
}

/// Only same-site paths are honored as return targets.
fn safe_return_to(raw: Option<String>) -> String {
    match raw {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/".to_string(),
    }
}

/// Redirect to the identity provider's hosted sign-in page.
#[instrument(skip(state))]
pub async fn sign_in(
    State(state): State<AppState>,
    Query(query): Query<SignInQuery>,
) -> Redirect {
    let config = state.config();
    let return_to = safe_return_to(query.return_to);

    let url = match url::Url::parse_with_params(
        &config.identity.sign_in_url,
        &[
            (
                "redirect_url",
                format!("{}/auth/callback", config.base_url.trim_end_matches('/')),
            ),
            ("return_to", return_to),
        ],
    ) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::error!(error = %e, "invalid identity sign-in URL");
            return Redirect::to("/");
        }
    };

    Redirect::to(&url)
}

/// Verify the token handed back by the identity provider and cache the
/// claims in the session.
#[instrument(skip(state, session, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let Some(token) = query.session_token.filter(|t| !t.is_empty()) else {
        flash_error(&session, "Sign-in failed. Please try again.").await;
        return Redirect::to("/");
    };

    match state.identity().verify_session(&token).await {
        Ok(profile) => {
            let user = CurrentUser::from(profile);
            if let Err(e) = session.insert(keys::CURRENT_USER, &user).await {
                tracing::error!(error = %e, "failed to store signed-in user in session");
                flash_error(&session, "Sign-in failed. Please try again.").await;
                return Redirect::to("/");
            }
            tracing::info!(user_id = %user.id, "user signed in");
            Redirect::to(&safe_return_to(query.return_to))
        }
        Err(e) => {
            tracing::warn!(error = %e, "session token verification failed");
            flash_error(&session, "Sign-in failed. Please try again.").await;
            Redirect::to("/")
        }
    }
}

/// Drop the signed-in user; the cart stays.
#[instrument(skip(session))]
pub async fn sign_out(session: Session) -> Redirect {
    if let Err(e) = session.remove::<CurrentUser>(keys::CURRENT_USER).await {
        tracing::warn!(error = %e, "failed to clear signed-in user");
    }
    flash_success(&session, "Signed out").await;
    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_to_accepts_site_paths() {
        assert_eq!(safe_return_to(Some("/checkout".into())), "/checkout");
    }

    #[test]
    fn test_safe_return_to_rejects_offsite_targets() {
        assert_eq!(safe_return_to(Some("https://evil.test".into())), "/");
        assert_eq!(safe_return_to(Some("//evil.test".into())), "/");
        assert_eq!(safe_return_to(None), "/");
    }
}
