//! Axum route handlers for the usage quota.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::usage::{client_id_from_headers, Tier, UsageSnapshot};

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub tier: Tier,
}

/// GET /api/v1/usage
pub async fn handle_get_usage(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UsageSnapshot>, AppError> {
    let client_id = client_id_from_headers(&headers)?;
    let record = state.usage.load(client_id).await?;
    Ok(Json(UsageSnapshot::from(&record)))
}

/// POST /api/v1/usage/purchase
///
/// Called by the client after a successful checkout redirect.
pub async fn handle_purchase(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<UsageSnapshot>, AppError> {
    let client_id = client_id_from_headers(&headers)?;
    let record = state.usage.apply_purchase(client_id, request.tier).await?;
    info!(%client_id, tier = %record.tier, "Applied plan purchase");
    Ok(Json(UsageSnapshot::from(&record)))
}
