use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{AccountId, OrderId};
use domain::{Cart, CartMutation, DomainError, Order, RateConfig};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::Store;

#[derive(Default)]
struct MemoryState {
    carts: HashMap<AccountId, Cart>,
    orders: HashMap<OrderId, Order>,
    rates: Option<RateConfig>,
}

/// In-memory store implementation for testing and development.
///
/// A single `RwLock` guards all state: holding the write lock across a
/// read-modify-write serializes concurrent cart mutations for the same
/// account, and makes order-commit trivially atomic across the order
/// insert and the cart clear.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of persisted orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Clears all carts, orders, and configuration.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.carts.clear();
        state.orders.clear();
        state.rates = None;
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn cart(&self, account_id: AccountId) -> Result<Cart> {
        let state = self.state.read().await;
        Ok(state
            .carts
            .get(&account_id)
            .cloned()
            .unwrap_or_else(|| Cart::empty(account_id)))
    }

    async fn mutate_cart(&self, account_id: AccountId, mutation: CartMutation) -> Result<Cart> {
        let mut state = self.state.write().await;
        let cart = state
            .carts
            .entry(account_id)
            .or_insert_with(|| Cart::empty(account_id));

        cart.apply(mutation)
            .map_err(|e| StoreError::Domain(DomainError::Cart(e)))?;
        Ok(cart.clone())
    }

    async fn commit_order<F>(&self, account_id: AccountId, build: F) -> Result<Order>
    where
        F: FnOnce(&Cart) -> std::result::Result<Order, DomainError> + Send,
    {
        let mut state = self.state.write().await;
        let cart = state
            .carts
            .get(&account_id)
            .cloned()
            .unwrap_or_else(|| Cart::empty(account_id));

        let order = build(&cart).map_err(StoreError::Domain)?;

        state.orders.insert(order.id, order.clone());
        state.carts.insert(account_id, Cart::empty(account_id));
        Ok(order)
    }

    async fn order(&self, order_id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&order_id).cloned())
    }

    async fn orders_for_account(&self, account_id: AccountId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<_> = state
            .orders
            .values()
            .filter(|o| o.account_id == account_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order<F>(&self, order_id: OrderId, apply: F) -> Result<Order>
    where
        F: FnOnce(&mut Order) -> std::result::Result<(), DomainError> + Send,
    {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(&order_id)
            .ok_or(StoreError::OrderNotFound(order_id))?;

        let mut updated = order.clone();
        apply(&mut updated).map_err(StoreError::Domain)?;
        *order = updated.clone();
        Ok(updated)
    }

    async fn rate_config(&self) -> Result<Option<RateConfig>> {
        let state = self.state.read().await;
        Ok(state.rates.clone())
    }

    async fn set_rate_config(&self, config: RateConfig) -> Result<()> {
        let mut state = self.state.write().await;
        state.rates = Some(config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{compute_costs, Money, OrderStatus, PaymentProof, ShippingAddress};

    fn add_line(delta: i64) -> CartMutation {
        CartMutation::AddLine {
            product_id: "SOAP-NEEM".to_string(),
            name: "Neem Soap".to_string(),
            image: None,
            variant: Some("250g".to_string()),
            unit_price: Money::from_paise(100),
            delta,
        }
    }

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

    fn proof() -> PaymentProof {
        PaymentProof {
            session_id: "sess_1".to_string(),
            payment_id: "pay_1".to_string(),
            signature: "sig".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_cart_reads_as_empty() {
        let store = InMemoryStore::new();
        let cart = store.cart(AccountId::new()).await.unwrap();
        assert!(cart.is_empty());
        assert!(cart.total.is_zero());
    }

    #[tokio::test]
    async fn test_mutations_persist_across_reads() {
        let store = InMemoryStore::new();
        let account = AccountId::new();

        store.mutate_cart(account, add_line(2)).await.unwrap();
        let cart = store.cart(account).await.unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.total.paise(), 200);
    }

    #[tokio::test]
    async fn test_concurrent_adds_do_not_lose_updates() {
        let store = InMemoryStore::new();
        let account = AccountId::new();

        let (s1, s2) = (store.clone(), store.clone());
        let t1 = tokio::spawn(async move { s1.mutate_cart(account, add_line(1)).await });
        let t2 = tokio::spawn(async move { s2.mutate_cart(account, add_line(1)).await });
        t1.await.unwrap().unwrap();
        t2.await.unwrap().unwrap();

        let cart = store.cart(account).await.unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_commit_persists_order_and_clears_cart() {
        let store = InMemoryStore::new();
        let account = AccountId::new();
        store.mutate_cart(account, add_line(2)).await.unwrap();

        let order = store
            .commit_order(account, |cart| {
                let costs = compute_costs(cart.total, Some("Tamil Nadu"), None);
                Ok(Order::from_cart(cart, address(), proof(), costs))
            })
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(store.order_count().await, 1);
        assert!(store.cart(account).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_cart_intact() {
        let store = InMemoryStore::new();
        let account = AccountId::new();
        store.mutate_cart(account, add_line(2)).await.unwrap();

        let result = store
            .commit_order(account, |_| Err(DomainError::EmptyCart))
            .await;

        assert!(result.is_err());
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.cart(account).await.unwrap().lines.len(), 1);
    }

    #[tokio::test]
    async fn test_update_order_applies_transition() {
        let store = InMemoryStore::new();
        let account = AccountId::new();
        store.mutate_cart(account, add_line(1)).await.unwrap();

        let order = store
            .commit_order(account, |cart| {
                let costs = compute_costs(cart.total, None, None);
                Ok(Order::from_cart(cart, address(), proof(), costs))
            })
            .await
            .unwrap();

        let updated = store
            .update_order(order.id, |o| o.mark_shipped().map_err(Into::into))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_order_unchanged() {
        let store = InMemoryStore::new();
        let account = AccountId::new();
        store.mutate_cart(account, add_line(1)).await.unwrap();

        let order = store
            .commit_order(account, |cart| {
                let costs = compute_costs(cart.total, None, None);
                Ok(Order::from_cart(cart, address(), proof(), costs))
            })
            .await
            .unwrap();

        // Cancel with an empty reason is rejected by the domain.
        let result = store
            .update_order(order.id, |o| o.cancel("").map_err(Into::into))
            .await;
        assert!(result.is_err());

        let stored = store.order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Processing);
        assert!(stored.cancellation_reason.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_order_fails() {
        let store = InMemoryStore::new();
        let result = store.update_order(OrderId::new(), |_| Ok(())).await;
        assert!(matches!(result, Err(StoreError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn test_rate_config_roundtrip() {
        let store = InMemoryStore::new();
        assert!(store.rate_config().await.unwrap().is_none());

        let config = RateConfig {
            tax_percent: 5.0,
            default_shipping: Money::from_paise(60),
            overrides: vec![],
        };
        store.set_rate_config(config.clone()).await.unwrap();
        assert_eq!(store.rate_config().await.unwrap(), Some(config));
    }
}
