use async_trait::async_trait;
use common::{AccountId, OrderId};
use domain::{Cart, CartMutation, DomainError, Order, RateConfig};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::error::{Result, StoreError};
use crate::store::Store;

/// PostgreSQL-backed store implementation.
///
/// Carts, orders, and the rate configuration live in JSONB document
/// columns. Cart mutation and order commit lock the cart row with
/// `SELECT ... FOR UPDATE` so concurrent requests for the same account
/// serialize on the row instead of losing updates.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_cart(row: &PgRow) -> Result<Cart> {
        let doc: serde_json::Value = row.try_get("doc")?;
        Ok(serde_json::from_value(doc)?)
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let doc: serde_json::Value = row.try_get("doc")?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Locks the account's cart row, creating an empty one first if
    /// the account has never had a cart. Insert-then-lock ensures two
    /// concurrent first adds contend on the same row.
    async fn lock_cart(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        account_id: AccountId,
    ) -> Result<Cart> {
        let empty = serde_json::to_value(Cart::empty(account_id))?;
        sqlx::query(
            "INSERT INTO carts (account_id, doc) VALUES ($1, $2) ON CONFLICT (account_id) DO NOTHING",
        )
        .bind(account_id.as_uuid())
        .bind(empty)
        .execute(&mut **tx)
        .await?;

        let row = sqlx::query("SELECT doc FROM carts WHERE account_id = $1 FOR UPDATE")
            .bind(account_id.as_uuid())
            .fetch_one(&mut **tx)
            .await?;
        Self::row_to_cart(&row)
    }

    async fn write_cart(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        cart: &Cart,
    ) -> Result<()> {
        let doc = serde_json::to_value(cart)?;
        sqlx::query("UPDATE carts SET doc = $2, updated_at = now() WHERE account_id = $1")
            .bind(cart.account_id.as_uuid())
            .bind(doc)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn cart(&self, account_id: AccountId) -> Result<Cart> {
        let row = sqlx::query("SELECT doc FROM carts WHERE account_id = $1")
            .bind(account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::row_to_cart(&row),
            None => Ok(Cart::empty(account_id)),
        }
    }

    async fn mutate_cart(&self, account_id: AccountId, mutation: CartMutation) -> Result<Cart> {
        let mut tx = self.pool.begin().await?;

        let mut cart = self.lock_cart(&mut tx, account_id).await?;
        cart.apply(mutation)
            .map_err(|e| StoreError::Domain(DomainError::Cart(e)))?;

        Self::write_cart(&mut tx, &cart).await?;
        tx.commit().await?;
        Ok(cart)
    }

    async fn commit_order<F>(&self, account_id: AccountId, build: F) -> Result<Order>
    where
        F: FnOnce(&Cart) -> std::result::Result<Order, DomainError> + Send,
    {
        let mut tx = self.pool.begin().await?;

        // Lock and re-read the current cart; the quote-time snapshot
        // is never trusted here.
        let cart = self.lock_cart(&mut tx, account_id).await?;
        let order = build(&cart).map_err(StoreError::Domain)?;

        let doc = serde_json::to_value(&order)?;
        sqlx::query(
            r#"
            INSERT INTO orders (id, account_id, status, doc, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.account_id.as_uuid())
        .bind(order.status.as_str())
        .bind(doc)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        Self::write_cart(&mut tx, &Cart::empty(account_id)).await?;

        // Order insert and cart clear land together or not at all.
        tx.commit().await?;
        Ok(order)
    }

    async fn order(&self, order_id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT doc FROM orders WHERE id = $1")
            .bind(order_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| Self::row_to_order(&r)).transpose()
    }

    async fn orders_for_account(&self, account_id: AccountId) -> Result<Vec<Order>> {
        let rows =
            sqlx::query("SELECT doc FROM orders WHERE account_id = $1 ORDER BY created_at DESC")
                .bind(account_id.as_uuid())
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(Self::row_to_order).collect()
    }

    async fn update_order<F>(&self, order_id: OrderId, apply: F) -> Result<Order>
    where
        F: FnOnce(&mut Order) -> std::result::Result<(), DomainError> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT doc FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::OrderNotFound(order_id))?;

        let mut order = Self::row_to_order(&row)?;
        apply(&mut order).map_err(StoreError::Domain)?;

        let doc = serde_json::to_value(&order)?;
        sqlx::query("UPDATE orders SET doc = $2, status = $3 WHERE id = $1")
            .bind(order_id.as_uuid())
            .bind(doc)
            .bind(order.status.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    async fn rate_config(&self) -> Result<Option<RateConfig>> {
        let row = sqlx::query("SELECT doc FROM rate_config WHERE singleton")
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| {
            let doc: serde_json::Value = r.try_get("doc")?;
            Ok(serde_json::from_value(doc)?)
        })
        .transpose()
    }

    async fn set_rate_config(&self, config: RateConfig) -> Result<()> {
        let doc = serde_json::to_value(&config)?;
        sqlx::query(
            r#"
            INSERT INTO rate_config (singleton, doc) VALUES (TRUE, $1)
            ON CONFLICT (singleton) DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()
            "#,
        )
        .bind(doc)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
