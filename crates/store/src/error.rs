//! Store error types.

use common::OrderId;
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain logic rejected the mutation. The atomic region is rolled
    /// back; nothing was written.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
