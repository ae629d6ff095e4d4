//! Theme extraction.
//!
//! The light/dark preference is ambient in the original UI; here it is an
//! explicit value read from a cookie at the composition root and passed into
//! templates, never a hidden global.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use serde::{Deserialize, Serialize};

/// Cookie carrying the theme preference.
pub const THEME_COOKIE_NAME: &str = "theme";

/// Light/dark display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Cookie/CSS value for this theme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The theme the toggle switches to.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn from_cookie_value(value: &str) -> Self {
        if value == "dark" { Self::Dark } else { Self::Light }
    }
}

impl<S> FromRequestParts<S> for Theme
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let theme = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|cookies| {
                cookies.split(';').find_map(|pair| {
                    let (name, value) = pair.trim().split_once('=')?;
                    (name == THEME_COOKIE_NAME).then(|| Self::from_cookie_value(value))
                })
            })
            .unwrap_or_default();

        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_parsing() {
        assert_eq!(Theme::from_cookie_value("dark"), Theme::Dark);
        assert_eq!(Theme::from_cookie_value("light"), Theme::Light);
        assert_eq!(Theme::from_cookie_value("purple"), Theme::Light);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
