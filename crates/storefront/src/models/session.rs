//! Session slots and their typed accessors.
//!
//! The session is the storefront's only local storage: a per-visitor
//! key-value store holding serialized records under fixed keys. Slots are
//! read when a page mounts and written by the single task handling the
//! request, so no locking discipline applies. The cart slot is written after
//! every cart mutation; a failed write is logged and otherwise ignored.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use brightbasket_core::{Cart, Email, ShippingAddress, UserId};

use crate::services::identity::{UserProfile, UserRole};

/// Session keys for persisted slots.
pub mod keys {
    /// Key for the serialized shopping cart.
    pub const CART: &str = "cart";

    /// Key for the shipping address staged between checkout and confirmation.
    pub const SHIPPING_ADDRESS: &str = "shipping_address";

    /// Key for the signed-in user's identity claims.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the one-shot notification shown on the next page load.
    pub const FLASH: &str = "flash";
}

/// Session-stored user identity.
///
/// Minimal claims kept from the identity provider's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Display name: first name, or "Guest" when the provider has none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            "Guest"
        } else {
            &self.first_name
        }
    }

    /// Whether the role claim grants admin access.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<UserProfile> for CurrentUser {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            first_name: profile.first_name,
            last_name: profile.last_name,
            role: profile.role,
        }
    }
}

/// One-shot notification surfaced as a toast on the next rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Error,
}

impl Flash {
    /// CSS class for the toast container.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self.level {
            FlashLevel::Success => "toast-success",
            FlashLevel::Error => "toast-error",
        }
    }
}

// =============================================================================
// Slot accessors
// =============================================================================

/// Load the cart slot, defaulting to an empty cart.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the cart slot.
///
/// Best-effort: a failed write leaves the in-memory cart authoritative for
/// the rest of the request and is only logged.
pub async fn save_cart(session: &Session, cart: &Cart) {
    if let Err(e) = session.insert(keys::CART, cart).await {
        tracing::warn!(error = %e, "failed to persist cart slot");
    }
}

/// Drop the cart slot entirely.
pub async fn clear_cart(session: &Session) {
    if let Err(e) = session.remove::<Cart>(keys::CART).await {
        tracing::warn!(error = %e, "failed to clear cart slot");
    }
}

/// Load the staged shipping address, if any.
pub async fn load_shipping_address(session: &Session) -> Option<ShippingAddress> {
    session
        .get::<ShippingAddress>(keys::SHIPPING_ADDRESS)
        .await
        .ok()
        .flatten()
}

/// Stage the shipping address for the confirmation step.
pub async fn save_shipping_address(session: &Session, address: &ShippingAddress) {
    if let Err(e) = session.insert(keys::SHIPPING_ADDRESS, address).await {
        tracing::warn!(error = %e, "failed to persist shipping address slot");
    }
}

/// Delete the staged shipping address.
pub async fn clear_shipping_address(session: &Session) {
    if let Err(e) = session.remove::<ShippingAddress>(keys::SHIPPING_ADDRESS).await {
        tracing::warn!(error = %e, "failed to clear shipping address slot");
    }
}

/// Get the signed-in user, if any.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Queue a success notification for the next page load.
///
/// Called after the state mutation it reports has fully completed, so a
/// failed flash write can never interfere with the cart update itself.
pub async fn flash_success(session: &Session, message: impl Into<String>) {
    set_flash(session, FlashLevel::Success, message.into()).await;
}

/// Queue an error notification for the next page load.
pub async fn flash_error(session: &Session, message: impl Into<String>) {
    set_flash(session, FlashLevel::Error, message.into()).await;
}

async fn set_flash(session: &Session, level: FlashLevel, message: String) {
    let flash = Flash { level, message };
    if let Err(e) = session.insert(keys::FLASH, &flash).await {
        tracing::warn!(error = %e, "failed to queue flash message");
    }
}

/// Take the pending flash message, clearing the slot.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    session.remove::<Flash>(keys::FLASH).await.ok().flatten()
}
