//! Checkout service: quoting, payment verification, and order commit.

use common::{AccountId, OrderId};
use domain::{
    compute_costs, CostBreakdown, DomainError, Money, Order, PaymentProof, ShippingAddress,
};
use serde::Serialize;
use store::Store;

use crate::error::{CheckoutError, Result};
use crate::notify::NotificationFanout;
use crate::services::events::EventPublisher;
use crate::services::gateway::PaymentGateway;
use crate::services::mailer::Mailer;
use crate::signature::SignatureVerifier;

/// A gateway payment session handed to the client so it can complete
/// payment out-of-band.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSession {
    /// Gateway-issued session identifier.
    pub session_id: String,

    /// Amount the session was sized to, in minor units.
    pub amount: Money,

    /// ISO currency code.
    pub currency: String,
}

/// A quote: the payment session plus the cost breakdown it was priced
/// from, both needed by the client to render a confirmation screen.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    /// The gateway session to complete payment against.
    pub session: PaymentSession,

    /// Advisory cost breakdown. The commit re-derives costs from the
    /// then-current cart; this one is for display only.
    pub costs: CostBreakdown,
}

/// Drives the cart-to-order finalization pipeline.
///
/// Generic over the store and the external collaborators, mirroring
/// how they are swapped for in-memory implementations in tests.
pub struct CheckoutService<S, G, M, E> {
    store: S,
    gateway: G,
    verifier: SignatureVerifier,
    fanout: NotificationFanout<M, E>,
    currency: String,
}

impl<S, G, M, E> CheckoutService<S, G, M, E>
where
    S: Store,
    G: PaymentGateway,
    M: Mailer + 'static,
    E: EventPublisher + 'static,
{
    /// Creates a new checkout service.
    pub fn new(
        store: S,
        gateway: G,
        verifier: SignatureVerifier,
        fanout: NotificationFanout<M, E>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            verifier,
            fanout,
            currency: currency.into(),
        }
    }

    /// Creates a payment session sized to the account's current cart
    /// and destination region.
    ///
    /// The returned quote is advisory: the commit recomputes costs
    /// from the cart as it stands then.
    #[tracing::instrument(skip(self))]
    pub async fn create_session(
        &self,
        account_id: AccountId,
        region: Option<&str>,
    ) -> Result<Quote> {
        let cart = self.store.cart(account_id).await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let config = self.store.rate_config().await?;
        let costs = compute_costs(cart.total, region, config.as_ref());

        let gateway_order = self.gateway.create_order(costs.total, &self.currency).await?;
        metrics::counter!("checkout_sessions_total").increment(1);
        tracing::info!(
            session_id = %gateway_order.id,
            total = %costs.total,
            "payment session created"
        );

        Ok(Quote {
            session: PaymentSession {
                session_id: gateway_order.id,
                amount: costs.total,
                currency: self.currency.clone(),
            },
            costs,
        })
    }

    /// Verifies the payment proof and commits the order.
    ///
    /// On success exactly one order is persisted with status
    /// `Processing`, the cart is emptied in the same atomic region,
    /// and notifications are dispatched without blocking the response.
    /// On a signature mismatch the cart is untouched so the buyer can
    /// retry.
    #[tracing::instrument(skip(self, proof))]
    pub async fn commit_order(
        &self,
        account_id: AccountId,
        proof: PaymentProof,
        address: ShippingAddress,
    ) -> Result<Order> {
        if !self
            .verifier
            .verify(&proof.session_id, &proof.payment_id, &proof.signature)
        {
            metrics::counter!("checkout_signature_failures_total").increment(1);
            tracing::warn!(session_id = %proof.session_id, "payment signature rejected");
            return Err(CheckoutError::InvalidSignature);
        }

        let start = std::time::Instant::now();
        let config = self.store.rate_config().await?;
        let session_id = proof.session_id.clone();

        let order = self
            .store
            .commit_order(account_id, move |cart| {
                if cart.is_empty() {
                    return Err(DomainError::EmptyCart);
                }
                let costs = compute_costs(cart.total, Some(&address.region), config.as_ref());
                Ok(Order::from_cart(cart, address, proof, costs))
            })
            .await?;

        metrics::counter!("orders_committed_total").increment(1);
        metrics::histogram!("order_commit_duration_seconds")
            .record(start.elapsed().as_secs_f64());
        tracing::info!(order_id = %order.id, total = %order.costs.total, "order committed");

        // The quote is advisory; if the recomputed total drifted from
        // the amount the session was sized to, commit anyway and leave
        // a reconciliation trail for the operator. The order is already
        // persisted at this point, so a failed readback is logged the
        // same way and must not fail the checkout.
        match self.gateway.session_amount(&session_id).await {
            Ok(Some(charged)) if charged != order.costs.total => {
                metrics::counter!("checkout_amount_drift_total").increment(1);
                tracing::warn!(
                    order_id = %order.id,
                    charged = %charged,
                    committed = %order.costs.total,
                    "committed total differs from gateway session amount"
                );
            }
            Ok(_) => {}
            Err(e) => {
                metrics::counter!("checkout_amount_readback_failures_total").increment(1);
                tracing::warn!(
                    order_id = %order.id,
                    error = %e,
                    "gateway session amount readback failed"
                );
            }
        }

        // Best-effort; never holds up the checkout response.
        tokio::spawn(self.fanout.clone().dispatch(order.clone()));

        Ok(order)
    }

    /// Cancels an order on behalf of its owner. Allowed only while the
    /// order is still `Processing` and only with a non-empty reason.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        account_id: AccountId,
        order_id: OrderId,
        reason: &str,
    ) -> Result<Order> {
        let order = self
            .store
            .order(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound(order_id))?;

        // Other accounts' orders are indistinguishable from missing.
        if order.account_id != account_id {
            return Err(CheckoutError::OrderNotFound(order_id));
        }

        Ok(self
            .store
            .update_order(order_id, |o| o.cancel(reason).map_err(Into::into))
            .await?)
    }

    /// Marks an order shipped. Operator-initiated.
    #[tracing::instrument(skip(self))]
    pub async fn mark_shipped(&self, order_id: OrderId) -> Result<Order> {
        Ok(self
            .store
            .update_order(order_id, |o| o.mark_shipped().map_err(Into::into))
            .await?)
    }

    /// Marks an order delivered, stamping the delivery time.
    /// Operator-initiated.
    #[tracing::instrument(skip(self))]
    pub async fn mark_delivered(&self, order_id: OrderId) -> Result<Order> {
        Ok(self
            .store
            .update_order(order_id, |o| o.mark_delivered().map_err(Into::into))
            .await?)
    }
}
