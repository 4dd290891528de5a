//! Domain error types.

use common::LineId;
use thiserror::Error;

use crate::order::OrderError;

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Remove targeted a line ID that is not in the cart.
    #[error("Cart line not found: {line_id}")]
    LineNotFound { line_id: LineId },

    /// Decrement targeted a (product, variant) pair with no line.
    #[error("No cart line for product {product_id} (variant {variant:?})")]
    NoSuchLine {
        product_id: String,
        variant: Option<String>,
    },

    /// Add would push the line quantity past what a line can hold.
    #[error("Quantity {quantity} exceeds the per-line maximum")]
    QuantityTooLarge { quantity: i64 },
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred while mutating a cart.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// An error occurred during an order status transition.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// An empty cart cannot be quoted or committed.
    #[error("Cart is empty")]
    EmptyCart,
}
