//! Order listing and lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use domain::Order;
use serde::Deserialize;
use store::Store;

use crate::AppState;
use crate::error::ApiError;

use super::{account_id, parse_order_id};

#[derive(Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

/// GET /orders — the account's orders, most recent first.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Order>>, ApiError> {
    let account = account_id(&headers)?;
    Ok(Json(state.store.orders_for_account(account).await?))
}

/// GET /orders/:id — load one of the account's orders.
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let account = account_id(&headers)?;
    let order_id = parse_order_id(&id)?;

    // Other accounts' orders are indistinguishable from missing.
    let order = state
        .store
        .order(order_id)
        .await?
        .filter(|o| o.account_id == account)
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order))
}

/// PUT /orders/:id/cancel — buyer cancels a processing order.
#[tracing::instrument(skip(state, headers, req))]
pub async fn cancel<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<Order>, ApiError> {
    let account = account_id(&headers)?;
    let order_id = parse_order_id(&id)?;

    let order = state
        .checkout
        .cancel_order(account, order_id, &req.reason)
        .await?;

    Ok(Json(order))
}

/// POST /orders/:id/ship — operator marks an order shipped.
#[tracing::instrument(skip(state))]
pub async fn ship<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id = parse_order_id(&id)?;
    Ok(Json(state.checkout.mark_shipped(order_id).await?))
}

/// POST /orders/:id/deliver — operator marks an order delivered.
#[tracing::instrument(skip(state))]
pub async fn deliver<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id = parse_order_id(&id)?;
    Ok(Json(state.checkout.mark_delivered(order_id).await?))
}
