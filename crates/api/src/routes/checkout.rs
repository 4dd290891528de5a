//! Checkout endpoints: payment session creation and verification.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use checkout::Quote;
use domain::{Order, PaymentProof, ShippingAddress};
use serde::Deserialize;
use store::Store;

use crate::AppState;
use crate::error::ApiError;

use super::account_id;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    /// Destination region for the shipping-charge quote. The committed
    /// order uses the shipping address region instead.
    pub region: Option<String>,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub session_id: String,
    pub payment_id: String,
    pub signature: String,
    pub shipping_address: ShippingAddress,
}

/// POST /checkout/session — create a payment session for the cart.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create_session<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<Quote>, ApiError> {
    let account = account_id(&headers)?;
    let quote = state
        .checkout
        .create_session(account, req.region.as_deref())
        .await?;

    Ok(Json(quote))
}

/// POST /checkout/verify — verify the payment proof and commit the
/// order. Returns 201 with the committed order.
#[tracing::instrument(skip(state, headers, req))]
pub async fn verify<S: Store + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<VerifyRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let account = account_id(&headers)?;
    let proof = PaymentProof {
        session_id: req.session_id,
        payment_id: req.payment_id,
        signature: req.signature,
    };

    let order = state
        .checkout
        .commit_order(account, proof, req.shipping_address)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}
