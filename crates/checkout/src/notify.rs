//! Post-commit notification fan-out.
//!
//! After a successful commit three independent side effects run: a
//! confirmation email to the buyer, an alert email to the store
//! operator, and a real-time event for subscribed administrative
//! sessions. Each has a bounded timeout; a failure is logged and
//! counted, never propagated, and never blocks the other two.

use std::sync::Arc;
use std::time::Duration;

use domain::Order;

use crate::services::events::EventPublisher;
use crate::services::mailer::{Email, Mailer};

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Fans an order summary out to the buyer, the operator, and the
/// admin event channel.
pub struct NotificationFanout<M, E> {
    mailer: Arc<M>,
    publisher: Arc<E>,
    operator_email: String,
}

impl<M, E> Clone for NotificationFanout<M, E> {
    fn clone(&self) -> Self {
        Self {
            mailer: self.mailer.clone(),
            publisher: self.publisher.clone(),
            operator_email: self.operator_email.clone(),
        }
    }
}

impl<M, E> NotificationFanout<M, E>
where
    M: Mailer + 'static,
    E: EventPublisher + 'static,
{
    /// Creates a new fan-out.
    pub fn new(mailer: M, publisher: E, operator_email: impl Into<String>) -> Self {
        Self {
            mailer: Arc::new(mailer),
            publisher: Arc::new(publisher),
            operator_email: operator_email.into(),
        }
    }

    /// Runs all three notifications concurrently and returns when all
    /// have finished or timed out. The order committer spawns this so
    /// the checkout response never waits on it.
    pub async fn dispatch(self, order: Order) {
        let buyer_mail = self.send_logged(buyer_confirmation(&order), "buyer_email");
        let operator_mail =
            self.send_logged(operator_alert(&order, &self.operator_email), "operator_email");
        let event = self.publish_logged(&order);

        tokio::join!(buyer_mail, operator_mail, event);
    }

    async fn send_logged(&self, email: Email, kind: &'static str) {
        let result = tokio::time::timeout(NOTIFY_TIMEOUT, self.mailer.send(email)).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metrics::counter!("notification_failures_total", "kind" => kind).increment(1);
                tracing::warn!(kind, error = %e, "notification send failed");
            }
            Err(_) => {
                metrics::counter!("notification_failures_total", "kind" => kind).increment(1);
                tracing::warn!(kind, "notification send timed out");
            }
        }
    }

    async fn publish_logged(&self, order: &Order) {
        let payload = serde_json::json!({
            "order_id": order.id,
            "buyer": order.address.name,
            "total_paise": order.costs.total.paise(),
        });

        let result =
            tokio::time::timeout(NOTIFY_TIMEOUT, self.publisher.publish("order:placed", payload))
                .await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                metrics::counter!("notification_failures_total", "kind" => "admin_event")
                    .increment(1);
                tracing::warn!(error = %e, "order event publish failed");
            }
            Err(_) => {
                metrics::counter!("notification_failures_total", "kind" => "admin_event")
                    .increment(1);
                tracing::warn!("order event publish timed out");
            }
        }
    }
}

fn item_lines(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| {
            let variant = item
                .variant
                .as_deref()
                .map(|v| format!(" ({v})"))
                .unwrap_or_default();
            format!(
                "  {} x {}{} @ {}",
                item.quantity, item.name, variant, item.unit_price
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn buyer_confirmation(order: &Order) -> Email {
    let text = format!(
        "Hi {},\n\nThanks for your order!\n\n{}\n\nItems: {}\nTax: {}\nShipping: {}\nTotal: {}\n\nWe will email you again when it ships.\n",
        order.address.name,
        item_lines(order),
        order.costs.items,
        order.costs.tax,
        order.costs.shipping,
        order.costs.total,
    );

    Email {
        to: order.address.email.clone(),
        subject: format!("Your order {} is confirmed", order.id),
        text,
        html: None,
    }
}

fn operator_alert(order: &Order, operator_email: &str) -> Email {
    let text = format!(
        "New order {} from {} ({}, {}).\n\n{}\n\nTotal: {}\n",
        order.id,
        order.address.name,
        order.address.city,
        order.address.region,
        item_lines(order),
        order.costs.total,
    );

    Email {
        to: operator_email.to_string(),
        subject: format!("New order from {}", order.address.name),
        text,
        html: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AccountId;
    use domain::{compute_costs, Cart, CartMutation, Money, PaymentProof, ShippingAddress};

    use crate::services::events::RecordingPublisher;
    use crate::services::mailer::RecordingMailer;

    fn sample_order() -> Order {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(CartMutation::AddLine {
            product_id: "SOAP-NEEM".to_string(),
            name: "Neem Soap".to_string(),
            image: None,
            variant: Some("250g".to_string()),
            unit_price: Money::from_paise(100),
            delta: 2,
        })
        .unwrap();

        Order::from_cart(
            &cart,
            ShippingAddress {
                name: "Meena".to_string(),
                email: "meena@example.com".to_string(),
                phone: "9876543210".to_string(),
                line1: "12 Beach Rd".to_string(),
                city: "Chennai".to_string(),
                region: "Tamil Nadu".to_string(),
                postal_code: "600001".to_string(),
            },
            PaymentProof {
                session_id: "sess_1".to_string(),
                payment_id: "pay_1".to_string(),
                signature: "sig".to_string(),
            },
            compute_costs(cart.total, Some("Tamil Nadu"), None),
        )
    }

    #[tokio::test]
    async fn test_dispatch_sends_both_emails_and_event() {
        let mailer = RecordingMailer::new();
        let publisher = RecordingPublisher::new();
        let fanout =
            NotificationFanout::new(mailer.clone(), publisher.clone(), "shop@example.com");

        let order = sample_order();
        fanout.dispatch(order.clone()).await;

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        let recipients: Vec<&str> = sent.iter().map(|e| e.to.as_str()).collect();
        assert!(recipients.contains(&"meena@example.com"));
        assert!(recipients.contains(&"shop@example.com"));
        assert!(sent.iter().all(|e| e.text.contains("Neem Soap")));

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "order:placed");
        assert_eq!(published[0].1["buyer"], "Meena");
        assert_eq!(published[0].1["total_paise"], 200);
    }

    #[tokio::test]
    async fn test_mail_failure_does_not_block_event() {
        let mailer = RecordingMailer::new();
        mailer.set_fail_on_send(true);
        let publisher = RecordingPublisher::new();
        let fanout =
            NotificationFanout::new(mailer.clone(), publisher.clone(), "shop@example.com");

        fanout.dispatch(sample_order()).await;

        assert_eq!(mailer.sent_count(), 0);
        assert_eq!(publisher.published_count(), 1);
    }

    #[tokio::test]
    async fn test_event_failure_does_not_block_mail() {
        let mailer = RecordingMailer::new();
        let publisher = RecordingPublisher::new();
        publisher.set_fail_on_publish(true);
        let fanout =
            NotificationFanout::new(mailer.clone(), publisher.clone(), "shop@example.com");

        fanout.dispatch(sample_order()).await;

        assert_eq!(mailer.sent_count(), 2);
        assert_eq!(publisher.published_count(), 0);
    }
}
