//! Persistence layer for the checkout core.
//!
//! Carts, orders, and the singleton rate configuration are stored as
//! documents behind the [`Store`] trait. Two implementations are
//! provided: [`InMemoryStore`] for tests and development, and
//! [`PostgresStore`] backed by JSONB tables.
//!
//! Mutations run domain logic *inside* the store's atomic region
//! (a held write lock, or a transaction with a row lock), which is
//! what protects concurrent cart updates from the lost-update race
//! and makes order commit both-or-neither across "persist order" and
//! "clear cart".

mod error;
mod memory;
mod postgres;
mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use store::Store;
