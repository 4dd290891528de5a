//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::{CartError, DomainError, OrderError};
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Checkout pipeline error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match &err {
        CheckoutError::EmptyCart | CheckoutError::InvalidSignature => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        CheckoutError::ProductNotFound(_) | CheckoutError::OrderNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        CheckoutError::Gateway(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
        CheckoutError::Domain(domain_err) => match domain_err {
            DomainError::Order(OrderError::InvalidStatusTransition { .. }) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            DomainError::Order(OrderError::CancelReasonRequired) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            DomainError::Cart(CartError::LineNotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            DomainError::Cart(
                CartError::NoSuchLine { .. } | CartError::QuantityTooLarge { .. },
            )
            | DomainError::EmptyCart => (StatusCode::BAD_REQUEST, err.to_string()),
        },
        CheckoutError::Store(store_err) => {
            tracing::error!(error = %store_err, "store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Checkout(err.into())
    }
}
