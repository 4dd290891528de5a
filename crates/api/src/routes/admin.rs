//! Operator endpoints for the rate configuration.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::RateConfig;
use store::Store;

use crate::AppState;
use crate::error::ApiError;

/// GET /admin/rates — the current rate configuration, if set.
#[tracing::instrument(skip(state))]
pub async fn get_rates<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Option<RateConfig>>, ApiError> {
    Ok(Json(state.store.rate_config().await?))
}

/// PUT /admin/rates — replace the rate configuration.
#[tracing::instrument(skip(state, config))]
pub async fn set_rates<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(config): Json<RateConfig>,
) -> Result<StatusCode, ApiError> {
    state.store.set_rate_config(config).await?;
    tracing::info!("rate configuration updated");
    Ok(StatusCode::NO_CONTENT)
}
