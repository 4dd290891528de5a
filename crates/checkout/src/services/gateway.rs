//! Payment gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Money;

use crate::error::{CheckoutError, Result};

/// A gateway-side payment session, sized to a specific amount.
#[derive(Debug, Clone)]
pub struct GatewayOrder {
    /// The session ID assigned by the gateway.
    pub id: String,
}

/// Trait for the external payment gateway.
///
/// This system does not implement gateway internals, only the
/// request/response contract: create a session sized to an amount,
/// and (for reconciliation) read back the amount a session was
/// created with.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a gateway session for the given amount.
    async fn create_order(&self, amount: Money, currency: &str) -> Result<GatewayOrder>;

    /// Returns the amount a session was created with, if the gateway
    /// still knows it. Used only for drift logging at commit time.
    async fn session_amount(&self, session_id: &str) -> Result<Option<Money>>;
}

#[derive(Debug, Default)]
struct GatewayState {
    sessions: HashMap<String, (Money, String)>,
    next_id: u32,
    fail_on_create: bool,
    fail_on_readback: bool,
}

/// In-memory payment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory payment gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail the next create call.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Configures the gateway to fail session amount readbacks.
    pub fn set_fail_on_readback(&self, fail: bool) {
        self.state.write().unwrap().fail_on_readback = fail;
    }

    /// Returns the number of sessions created.
    pub fn session_count(&self) -> usize {
        self.state.read().unwrap().sessions.len()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_order(&self, amount: Money, currency: &str) -> Result<GatewayOrder> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(CheckoutError::Gateway(
                "simulated gateway outage".to_string(),
            ));
        }

        state.next_id += 1;
        let id = format!("session_{}", state.next_id);
        state
            .sessions
            .insert(id.clone(), (amount, currency.to_string()));

        Ok(GatewayOrder { id })
    }

    async fn session_amount(&self, session_id: &str) -> Result<Option<Money>> {
        let state = self.state.read().unwrap();

        if state.fail_on_readback {
            return Err(CheckoutError::Gateway(
                "simulated gateway readback failure".to_string(),
            ));
        }

        Ok(state.sessions.get(session_id).map(|(amount, _)| *amount))
    }
}
