//! Order status and its display/transition lookup tables.
//!
//! Statuses arrive verbatim from the commerce API. The transition table only
//! constrains which action buttons the admin UI offers; the authoritative
//! transition is enforced server-side. A static lookup is enough here — this
//! is deliberately not a state machine.

use serde::{Deserialize, Serialize};

/// Order status as reported by the commerce API.
///
/// Unknown wire values deserialize as an error at the serde layer; callers
/// that must tolerate them fall back to [`OrderStatus::default`] (`Pending`),
/// matching how the admin order list normalizes bad data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    /// Admin-only terminal state.
    Returned,
}

impl OrderStatus {
    /// All statuses, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::Returned,
    ];

    /// Forward transitions offered to the admin from this status.
    #[must_use]
    pub const fn transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Processing, Self::Cancelled],
            Self::Processing => &[Self::Shipped, Self::Cancelled],
            Self::Shipped => &[Self::Delivered, Self::Cancelled],
            Self::Delivered | Self::Cancelled | Self::Returned => &[],
        }
    }

    /// Whether the admin UI may offer a transition to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.transitions().contains(&next)
    }

    /// Whether a customer may still cancel an order in this status.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Wire value, also used as the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Returned => "RETURNED",
        }
    }

    /// CSS badge class for status pills.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Pending => "badge-pending",
            Self::Processing => "badge-processing",
            Self::Shipped => "badge-shipped",
            Self::Delivered => "badge-delivered",
            Self::Cancelled => "badge-cancelled",
            Self::Returned => "badge-returned",
        }
    }

    /// Icon name for status display.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Pending | Self::Cancelled => "clock",
            Self::Processing => "package",
            Self::Shipped => "truck",
            Self::Delivered => "check-circle",
            Self::Returned => "rotate-ccw",
        }
    }

    /// Fill percentage for the order progress bar.
    #[must_use]
    pub const fn progress_percent(self) -> u8 {
        match self {
            Self::Pending => 25,
            Self::Processing => 50,
            Self::Shipped => 75,
            Self::Delivered => 100,
            Self::Cancelled | Self::Returned => 0,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PROCESSING" => Ok(Self::Processing),
            "SHIPPED" => Ok(Self::Shipped),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            "RETURNED" => Ok(Self::Returned),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_screaming_snake() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"PROCESSING\"");
        let back: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn test_unknown_wire_value_is_an_error() {
        // The original backend emitted "completed", which is outside the
        // status set; callers normalize it to Pending via unwrap_or_default.
        let result: Result<OrderStatus, _> = serde_json::from_str("\"completed\"");
        assert!(result.is_err());
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(
            OrderStatus::Pending.transitions(),
            &[OrderStatus::Processing, OrderStatus::Cancelled]
        );
        assert_eq!(
            OrderStatus::Processing.transitions(),
            &[OrderStatus::Shipped, OrderStatus::Cancelled]
        );
        assert_eq!(
            OrderStatus::Shipped.transitions(),
            &[OrderStatus::Delivered, OrderStatus::Cancelled]
        );
        assert!(OrderStatus::Delivered.transitions().is_empty());
        assert!(OrderStatus::Cancelled.transitions().is_empty());
        assert!(OrderStatus::Returned.transitions().is_empty());
    }

    #[test]
    fn test_can_transition_to() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_cancel_gate_matches_transition_table() {
        for status in OrderStatus::ALL {
            assert_eq!(
                status.can_cancel(),
                status.can_transition_to(OrderStatus::Cancelled)
            );
        }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(OrderStatus::Pending.progress_percent(), 25);
        assert_eq!(OrderStatus::Delivered.progress_percent(), 100);
        assert_eq!(OrderStatus::Cancelled.progress_percent(), 0);
    }

    #[test]
    fn test_from_str_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.label().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("completed".parse::<OrderStatus>().is_err());
    }
}
