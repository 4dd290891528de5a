//! Cart endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use common::LineId;
use domain::Cart;
use serde::Deserialize;
use store::Store;

use crate::AppState;
use crate::error::ApiError;

use super::account_id;

#[derive(Deserialize)]
pub struct AddLineRequest {
    pub product_id: String,
    pub variant: Option<String>,
    /// Signed delta: positive adds, negative decrements; a line whose
    /// quantity drops to zero or below is removed.
    pub quantity: i64,
}

/// GET /cart — the account's cart (empty for a new account).
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Cart>, ApiError> {
    let account = account_id(&headers)?;
    Ok(Json(state.carts.get_cart(account).await?))
}

/// POST /cart/lines — add units of a (product, variant) pair.
#[tracing::instrument(skip(state, headers, req))]
pub async fn add_line<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<AddLineRequest>,
) -> Result<Json<Cart>, ApiError> {
    let account = account_id(&headers)?;
    if req.quantity == 0 {
        return Err(ApiError::BadRequest("quantity must be non-zero".to_string()));
    }

    let cart = state
        .carts
        .add_line(account, &req.product_id, req.variant.as_deref(), req.quantity)
        .await?;

    Ok(Json(cart))
}

/// DELETE /cart/lines/:id — remove a line by its identifier.
#[tracing::instrument(skip(state, headers))]
pub async fn remove_line<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Cart>, ApiError> {
    let account = account_id(&headers)?;
    let uuid = uuid::Uuid::parse_str(&id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid line ID format: {e}")))?;

    let cart = state
        .carts
        .remove_line(account, LineId::from_uuid(uuid))
        .await?;

    Ok(Json(cart))
}
