//! Checkout and payment-return handlers.
//!
//! The gateway hosts the actual payment page. This module stages the
//! shipping address, creates a checkout session through the commerce API,
//! redirects to the gateway, and records the order when the redirect
//! returns. Validation failures are rejected before any network call is
//! made.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use brightbasket_core::{CheckoutSessionId, OrderStatus, ShippingAddress};

use crate::commerce::types::{CheckoutRequest, OrderRequest};
use crate::filters;
use crate::middleware::{RequireAuth, Theme};
use crate::models::session::{self, flash_error};
use crate::routes::PageContext;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Seconds before the confirmation page redirects home. Cosmetic only.
const CONFIRMATION_REDIRECT_SECONDS: u8 = 3;

/// Countries offered by the shipping form.
const COUNTRIES: &[&str] = &[
    "United States",
    "Canada",
    "United Kingdom",
    "Australia",
    "Germany",
];

/// One `<option>` in the country selector.
pub struct CountryOption {
    pub name: &'static str,
    pub selected: bool,
}

fn country_options(current: &str) -> Vec<CountryOption> {
    COUNTRIES
        .iter()
        .map(|&name| CountryOption {
            name,
            selected: name == current,
        })
        .collect()
}

/// Shipping address form fields, mirroring [`ShippingAddress`].
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

impl From<AddressForm> for ShippingAddress {
    fn from(form: AddressForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            address1: form.address1,
            address2: (!form.address2.trim().is_empty()).then_some(form.address2),
            city: form.city,
            state: form.state,
            zip_code: form.zip_code,
            country: form.country,
        }
    }
}

/// Query parameters on the gateway's return redirect.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub session_id: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub ctx: PageContext,
    pub cart: CartView,
    pub address: ShippingAddress,
    pub countries: Vec<CountryOption>,
    pub payment_public_key: String,
}

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct SuccessTemplate {
    pub ctx: PageContext,
    pub address: Option<ShippingAddress>,
    pub error: Option<String>,
    pub redirect_seconds: u8,
}

/// Payment-abandoned page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/cancel.html")]
pub struct CancelTemplate {
    pub ctx: PageContext,
}

/// Display the checkout page: order summary plus shipping address form.
///
/// The address is prefilled from the staged slot when one exists, falling
/// back to the signed-in user's name.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
    RequireAuth(user): RequireAuth,
) -> CheckoutTemplate {
    let cart = session::load_cart(&session).await;

    let address = match session::load_shipping_address(&session).await {
        Some(address) => address,
        None => ShippingAddress {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            country: "United States".to_string(),
            ..ShippingAddress::default()
        },
    };

    CheckoutTemplate {
        ctx: PageContext::load(&session, theme).await,
        cart: CartView::from(&cart),
        countries: country_options(&address.country),
        address,
        payment_public_key: state.config().payment.public_key.clone(),
    }
}

/// Create a checkout session and redirect to the hosted payment page.
///
/// Guards run in order — signed-in (enforced by the extractor), non-empty
/// cart, complete address — and each rejection is surfaced as a flash and
/// abandons the operation before any network call.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<AddressForm>,
) -> Redirect {
    let cart = session::load_cart(&session).await;
    if cart.is_empty() {
        flash_error(&session, "Your cart is empty!").await;
        return Redirect::to("/cart");
    }

    let shipping_address = ShippingAddress::from(form);
    let missing = shipping_address.missing_required_fields();
    if !missing.is_empty() {
        flash_error(
            &session,
            format!("Please fill in: {}", missing.join(", ")),
        )
        .await;
        return Redirect::to("/checkout");
    }

    // Stage the address for the confirmation step before leaving the site.
    session::save_shipping_address(&session, &shipping_address).await;

    let Some(amount) = to_minor_units(cart.total()) else {
        tracing::error!(total = %cart.total(), "cart total not representable in minor units");
        flash_error(&session, "Payment failed. Please try again.").await;
        return Redirect::to("/checkout");
    };

    let request = CheckoutRequest {
        items: cart.lines().to_vec(),
        amount,
        currency: "usd".to_string(),
        user_id: user.id.clone(),
        customer_email: user.email.clone(),
        shipping_address,
    };

    match state.commerce().create_checkout(&request).await {
        Ok(checkout) => {
            let url = state
                .config()
                .payment
                .checkout_redirect(checkout.session_id.as_str());
            Redirect::to(&url)
        }
        Err(e) => {
            tracing::error!(error = %e, "checkout session creation failed");
            flash_error(&session, "Payment failed. Please try again.").await;
            Redirect::to("/checkout")
        }
    }
}

/// Record the order after the gateway redirects back.
///
/// Without a session id the visit is not a payment return and goes home.
/// The cleared cart slot doubles as the duplicate-order guard: a reload
/// after cleanup renders the confirmation without re-posting.
#[instrument(skip(state, session))]
pub async fn success(
    State(state): State<AppState>,
    session: Session,
    theme: Theme,
    RequireAuth(user): RequireAuth,
    Query(query): Query<SuccessQuery>,
) -> Result<SuccessTemplate, Redirect> {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return Err(Redirect::to("/"));
    };

    let cart = session::load_cart(&session).await;
    let staged_address = session::load_shipping_address(&session).await;

    // Already processed (or nothing to process): plain confirmation.
    let (Some(shipping_address), false) = (staged_address, cart.is_empty()) else {
        return Ok(SuccessTemplate {
            ctx: PageContext::load(&session, theme).await,
            address: None,
            error: None,
            redirect_seconds: CONFIRMATION_REDIRECT_SECONDS,
        });
    };

    let request = OrderRequest {
        items: cart.lines().to_vec(),
        total: cart.total(),
        user_id: user.id.clone(),
        user_name: user.display_name().to_string(),
        session_id: CheckoutSessionId::new(session_id),
        shipping_address: shipping_address.clone(),
        status: OrderStatus::Pending,
    };

    match state.commerce().create_order(&request).await {
        Ok(order) => {
            tracing::info!(order_id = %order.id, "order recorded after payment");
            session::clear_cart(&session).await;
            session::clear_shipping_address(&session).await;

            Ok(SuccessTemplate {
                ctx: PageContext::load(&session, theme).await,
                address: Some(shipping_address),
                error: None,
                redirect_seconds: CONFIRMATION_REDIRECT_SECONDS,
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "order creation failed after payment");
            Ok(SuccessTemplate {
                ctx: PageContext::load(&session, theme).await,
                address: None,
                error: Some(
                    "Failed to process your order. Please contact support.".to_string(),
                ),
                redirect_seconds: CONFIRMATION_REDIRECT_SECONDS,
            })
        }
    }
}

/// Payment-abandoned page; the cart is left intact.
#[instrument(skip(session))]
pub async fn cancel(session: Session, theme: Theme) -> CancelTemplate {
    CancelTemplate {
        ctx: PageContext::load(&session, theme).await,
    }
}

/// Convert a major-unit total to minor units (cents).
fn to_minor_units(total: Decimal) -> Option<i64> {
    (total * Decimal::ONE_HUNDRED).round().to_i64()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(Decimal::new(2498, 2)), Some(2498));
        assert_eq!(to_minor_units(Decimal::new(1000, 2)), Some(1000));
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_address_form_blank_address2_becomes_none() {
        let form = AddressForm {
            first_name: "A".into(),
            last_name: "B".into(),
            address1: "1 Road".into(),
            address2: "  ".into(),
            city: "Town".into(),
            state: "TS".into(),
            zip_code: "12345".into(),
            country: "United States".into(),
        };
        let address = ShippingAddress::from(form);
        assert!(address.address2.is_none());
        assert!(address.is_complete());
    }
}
