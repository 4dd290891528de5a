//! Immutable orders and their status transitions.

mod status;

pub use status::OrderStatus;

use chrono::{DateTime, Utc};
use common::{AccountId, OrderId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::money::Money;
use crate::rates::CostBreakdown;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order is not in the expected status.
    #[error("Invalid status transition: cannot {action} from {current_status} status")]
    InvalidStatusTransition {
        current_status: OrderStatus,
        action: &'static str,
    },

    /// Cancellation requires a reason.
    #[error("Cancellation reason is required")]
    CancelReasonRequired,
}

/// One item of a committed order.
///
/// All fields are copied by value from the cart line at commit time;
/// nothing here references the live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Catalog identifier of the product.
    pub product_id: String,

    /// Product name at commit time.
    pub name: String,

    /// Image URL at commit time.
    pub image: Option<String>,

    /// Variant bought, if any.
    pub variant: Option<String>,

    /// Quantity bought.
    pub quantity: u32,

    /// Price per unit at commit time.
    pub unit_price: Money,
}

/// Shipping destination snapshot, captured at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient name.
    pub name: String,

    /// Contact email, used for the order confirmation.
    pub email: String,

    /// Contact phone number.
    pub phone: String,

    /// Street address.
    pub line1: String,

    /// City or town.
    pub city: String,

    /// Destination state/region, used for shipping-charge lookup.
    pub region: String,

    /// Postal code.
    pub postal_code: String,
}

/// Payment-proof triple returned by the client after completing
/// payment at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    /// Gateway-issued payment session identifier.
    pub session_id: String,

    /// Gateway-issued payment identifier.
    pub payment_id: String,

    /// HMAC signature over `session_id|payment_id`.
    pub signature: String,
}

/// A committed order. Immutable except for status transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,

    /// Buyer account.
    pub account_id: AccountId,

    /// Items copied by value from the cart at commit time.
    pub items: Vec<OrderItem>,

    /// Shipping destination snapshot.
    pub address: ShippingAddress,

    /// Payment proof validated by the signature verifier.
    pub payment: PaymentProof,

    /// Server-side cost breakdown recomputed at commit time. Client
    /// totals are never trusted.
    pub costs: CostBreakdown,

    /// Current status.
    pub status: OrderStatus,

    /// Reason recorded when the buyer cancels.
    pub cancellation_reason: Option<String>,

    /// Stamped when the order is marked delivered.
    pub delivered_at: Option<DateTime<Utc>>,

    /// Commit time.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds an order by snapshotting the given cart.
    ///
    /// Every cart line is copied by value into an [`OrderItem`]; the
    /// resulting order does not drift if the catalog changes later.
    pub fn from_cart(
        cart: &Cart,
        address: ShippingAddress,
        payment: PaymentProof,
        costs: CostBreakdown,
    ) -> Self {
        let items = cart
            .lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                image: line.image.clone(),
                variant: line.variant.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        Self {
            id: OrderId::new(),
            account_id: cart.account_id,
            items,
            address,
            payment,
            costs,
            status: OrderStatus::Processing,
            cancellation_reason: None,
            delivered_at: None,
            created_at: Utc::now(),
        }
    }

    /// Cancels the order. Buyer-initiated; only allowed while
    /// `Processing` and only with a non-empty reason.
    pub fn cancel(&mut self, reason: &str) -> Result<(), OrderError> {
        if !self.status.can_cancel() {
            return Err(OrderError::InvalidStatusTransition {
                current_status: self.status,
                action: "cancel",
            });
        }
        if reason.trim().is_empty() {
            return Err(OrderError::CancelReasonRequired);
        }

        self.status = OrderStatus::Cancelled;
        self.cancellation_reason = Some(reason.trim().to_string());
        Ok(())
    }

    /// Marks the order as shipped. Operator-initiated.
    pub fn mark_shipped(&mut self) -> Result<(), OrderError> {
        if !self.status.can_ship() {
            return Err(OrderError::InvalidStatusTransition {
                current_status: self.status,
                action: "ship",
            });
        }

        self.status = OrderStatus::Shipped;
        Ok(())
    }

    /// Marks the order as delivered, stamping the delivery time.
    /// Operator-initiated.
    pub fn mark_delivered(&mut self) -> Result<(), OrderError> {
        if !self.status.can_deliver() {
            return Err(OrderError::InvalidStatusTransition {
                current_status: self.status,
                action: "deliver",
            });
        }

        self.status = OrderStatus::Delivered;
        self.delivered_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartMutation;

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "Meena".to_string(),
            email: "meena@example.com".to_string(),
            phone: "9876543210".to_string(),
            line1: "12 Beach Rd".to_string(),
            city: "Chennai".to_string(),
            region: "Tamil Nadu".to_string(),
            postal_code: "600001".to_string(),
        }
    }

    fn payment() -> PaymentProof {
        PaymentProof {
            session_id: "sess_1".to_string(),
            payment_id: "pay_1".to_string(),
            signature: "deadbeef".to_string(),
        }
    }

    fn committed_order() -> Order {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(CartMutation::AddLine {
            product_id: "SOAP-NEEM".to_string(),
            name: "Neem Soap".to_string(),
            image: Some("https://cdn.example/neem.jpg".to_string()),
            variant: Some("250g".to_string()),
            unit_price: Money::from_paise(100),
            delta: 2,
        })
        .unwrap();

        let costs = crate::rates::compute_costs(cart.total, Some("Tamil Nadu"), None);
        Order::from_cart(&cart, address(), payment(), costs)
    }

    #[test]
    fn test_from_cart_copies_lines_by_value() {
        let order = committed_order();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Neem Soap");
        assert_eq!(order.items[0].variant.as_deref(), Some("250g"));
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].unit_price.paise(), 100);
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn test_cancel_from_processing_records_reason() {
        let mut order = committed_order();
        order.cancel("ordered by mistake").unwrap();

        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(
            order.cancellation_reason.as_deref(),
            Some("ordered by mistake")
        );
    }

    #[test]
    fn test_cancel_requires_reason() {
        let mut order = committed_order();
        let err = order.cancel("   ").unwrap_err();
        assert!(matches!(err, OrderError::CancelReasonRequired));
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn test_cancel_after_shipped_is_rejected() {
        let mut order = committed_order();
        order.mark_shipped().unwrap();

        let err = order.cancel("too late").unwrap_err();
        assert!(matches!(err, OrderError::InvalidStatusTransition { .. }));
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_ship_then_deliver_stamps_timestamp() {
        let mut order = committed_order();
        order.mark_shipped().unwrap();
        assert!(order.delivered_at.is_none());

        order.mark_delivered().unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.delivered_at.is_some());
    }

    #[test]
    fn test_terminal_statuses_reject_transitions() {
        let mut order = committed_order();
        order.cancel("changed my mind").unwrap();

        assert!(order.mark_shipped().is_err());
        assert!(order.mark_delivered().is_err());
        assert!(order.cancel("again").is_err());
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = committed_order();
        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
