//! Shipping address staged between checkout and confirmation.
//!
//! The address is written to its session slot once at checkout, read once on
//! the confirmation page, then deleted. Only required-field presence is
//! checked locally; authoritative validation belongs to the commerce API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat shipping address record, wire-shaped for `POST /api/checkout`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

impl ShippingAddress {
    /// Names of required fields that are empty, in form order.
    ///
    /// Everything except `address2` is required.
    #[must_use]
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("street address", &self.address1),
            ("city", &self.city),
            ("state", &self.state),
            ("ZIP code", &self.zip_code),
            ("country", &self.country),
        ] {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        missing
    }

    /// Whether every required field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_required_fields().is_empty()
    }
}

/// Subtotal above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

/// Display-only shipping fee for a cart subtotal.
///
/// Authoritative totals are computed downstream at payment time.
#[must_use]
pub fn shipping_fee(subtotal: Decimal) -> Decimal {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Display-only order total: subtotal plus shipping fee.
#[must_use]
pub fn order_total(subtotal: Decimal) -> Decimal {
    subtotal + shipping_fee(subtotal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete_address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Riley".into(),
            last_name: "Okafor".into(),
            address1: "12 Orchard Lane".into(),
            address2: None,
            city: "Portland".into(),
            state: "OR".into(),
            zip_code: "97201".into(),
            country: "United States".into(),
        }
    }

    #[test]
    fn test_complete_address_has_no_missing_fields() {
        assert!(complete_address().is_complete());
    }

    #[test]
    fn test_address2_is_optional() {
        let mut address = complete_address();
        address.address2 = None;
        assert!(address.is_complete());
    }

    #[test]
    fn test_missing_fields_reported_in_form_order() {
        let mut address = complete_address();
        address.city = String::new();
        address.zip_code = "   ".into();
        assert_eq!(address.missing_required_fields(), vec!["city", "ZIP code"]);
    }

    #[test]
    fn test_shipping_free_above_threshold() {
        assert_eq!(shipping_fee(Decimal::new(5001, 2)), Decimal::ZERO);
        assert_eq!(order_total(Decimal::new(6000, 2)), Decimal::new(6000, 2));
    }

    #[test]
    fn test_flat_fee_at_or_below_threshold() {
        assert_eq!(shipping_fee(Decimal::new(5000, 2)), Decimal::new(599, 2));
        assert_eq!(order_total(Decimal::new(2498, 2)), Decimal::new(3097, 2));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_string(&complete_address()).unwrap();
        assert!(json.contains("\"firstName\""));
        assert!(json.contains("\"zipCode\""));
    }
}
