//! Checkout error types.

use common::OrderId;
use domain::DomainError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; nothing to quote or commit.
    #[error("Cart is empty")]
    EmptyCart,

    /// The payment proof did not verify against the shared secret.
    /// The cart is left intact so the buyer can retry.
    #[error("Payment verification failed")]
    InvalidSignature,

    /// The catalog has no product with this ID.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found (or not visible to this account).
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The payment gateway rejected or failed the request.
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    /// Domain logic rejected the operation.
    #[error("Domain error: {0}")]
    Domain(DomainError),

    /// The store failed.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CheckoutError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Domain(DomainError::EmptyCart) => CheckoutError::EmptyCart,
            StoreError::Domain(d) => CheckoutError::Domain(d),
            StoreError::OrderNotFound(id) => CheckoutError::OrderNotFound(id),
            other => CheckoutError::Store(other),
        }
    }
}

impl From<DomainError> for CheckoutError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EmptyCart => CheckoutError::EmptyCart,
            other => CheckoutError::Domain(other),
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
