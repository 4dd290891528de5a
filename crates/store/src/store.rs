//! The `Store` trait: document-style persistence for the checkout core.

use async_trait::async_trait;
use common::{AccountId, OrderId};
use domain::{Cart, CartMutation, DomainError, Order, RateConfig};

use crate::error::Result;

/// Persistence operations used by the checkout pipeline.
///
/// Closure-taking methods (`mutate_cart` via [`CartMutation`],
/// `commit_order`, `update_order`) execute domain logic inside the
/// implementation's atomic region. If the closure returns an error the
/// region is rolled back and nothing is persisted.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the account's cart. An account with no cart yet gets an
    /// empty cart, not an error.
    async fn cart(&self, account_id: AccountId) -> Result<Cart>;

    /// Applies a mutation to the account's cart atomically and returns
    /// the updated cart. Two concurrent mutations for the same account
    /// are serialized; neither update is lost.
    async fn mutate_cart(&self, account_id: AccountId, mutation: CartMutation) -> Result<Cart>;

    /// Commits an order: re-reads the account's *current* cart under
    /// the atomic region, passes it to `build`, persists the resulting
    /// order, and clears the cart. Order-persist and cart-clear both
    /// succeed or both roll back.
    async fn commit_order<F>(&self, account_id: AccountId, build: F) -> Result<Order>
    where
        F: FnOnce(&Cart) -> std::result::Result<Order, DomainError> + Send;

    /// Fetches an order by ID.
    async fn order(&self, order_id: OrderId) -> Result<Option<Order>>;

    /// Lists an account's orders, most recent first.
    async fn orders_for_account(&self, account_id: AccountId) -> Result<Vec<Order>>;

    /// Applies a status transition to a persisted order atomically and
    /// returns the updated order.
    async fn update_order<F>(&self, order_id: OrderId, apply: F) -> Result<Order>
    where
        F: FnOnce(&mut Order) -> std::result::Result<(), DomainError> + Send;

    /// Reads the singleton rate configuration, if one has been set.
    async fn rate_config(&self) -> Result<Option<RateConfig>>;

    /// Replaces the singleton rate configuration.
    async fn set_rate_config(&self, config: RateConfig) -> Result<()>;
}
