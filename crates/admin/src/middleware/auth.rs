//! Authentication middleware and extractors for the admin console.
//!
//! Sign-in happens on the identity provider's hosted page; the callback
//! route stores the verified claims in the session. These extractors gate
//! every console route on those claims carrying the admin role.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use brightbasket_core::{Email, UserId};

use crate::services::identity::{UserProfile, UserRole};

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the signed-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the one-shot notification shown on the next page load.
    pub const FLASH: &str = "flash";
}

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: Email,
    pub name: String,
}

impl CurrentAdmin {
    /// Build from a verified profile; `None` when the role claim is not
    /// admin.
    #[must_use]
    pub fn from_profile(profile: UserProfile) -> Option<Self> {
        (profile.role == UserRole::Admin).then(|| Self {
            id: profile.id,
            email: profile.email,
            name: if profile.first_name.is_empty() {
                "Admin".to_string()
            } else {
                profile.first_name
            },
        })
    }
}

/// Extractor that requires admin authentication.
///
/// If the admin is not logged in, returns a redirect to the sign-in flow
/// for HTML requests, or 401 Unauthorized for API requests.
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Error returned when admin authentication is required but absent.
pub enum AdminAuthRejection {
    /// Redirect to sign-in (for HTML requests).
    RedirectToSignIn,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn => Redirect::to("/auth/sign-in").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if parts.uri.path().starts_with("/api/") {
                    AdminAuthRejection::Unauthorized
                } else {
                    AdminAuthRejection::RedirectToSignIn
                }
            })?;

        Ok(Self(admin))
    }
}
