//! Route handlers.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod metrics;
pub mod orders;

use axum::http::HeaderMap;
use common::{AccountId, OrderId};

use crate::error::ApiError;

/// Extracts the buyer account from the `x-account-id` header.
pub(crate) fn account_id(headers: &HeaderMap) -> Result<AccountId, ApiError> {
    let value = headers
        .get("x-account-id")
        .ok_or_else(|| ApiError::BadRequest("Missing x-account-id header".to_string()))?;
    let value = value
        .to_str()
        .map_err(|_| ApiError::BadRequest("Invalid x-account-id header".to_string()))?;
    let uuid = uuid::Uuid::parse_str(value)
        .map_err(|e| ApiError::BadRequest(format!("Invalid x-account-id: {e}")))?;
    Ok(AccountId::from_uuid(uuid))
}

pub(crate) fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID format: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
