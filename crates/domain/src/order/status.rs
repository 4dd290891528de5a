//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of a committed order.
///
/// Transitions:
/// ```text
/// Processing ──► Shipped ──► Delivered
///      │
///      └──► Cancelled
/// ```
///
/// Cancellation is the only buyer-initiated transition and is allowed
/// only from `Processing`. Ship and deliver are operator transitions;
/// skipping `Shipped` is discouraged but not structurally forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Payment verified, order committed, awaiting dispatch.
    #[default]
    Processing,

    /// Handed to the courier.
    Shipped,

    /// Received by the buyer (terminal).
    Delivered,

    /// Cancelled by the buyer while still processing (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the buyer can cancel in this status.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Processing)
    }

    /// Returns true if the order can be marked shipped.
    pub fn can_ship(&self) -> bool {
        matches!(self, OrderStatus::Processing)
    }

    /// Returns true if the order can be marked delivered.
    pub fn can_deliver(&self) -> bool {
        matches!(self, OrderStatus::Processing | OrderStatus::Shipped)
    }

    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
