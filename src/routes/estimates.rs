//! Cost estimate endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::{CostEstimateRequest, CostEstimateResponse, StoredCostEstimate};
use crate::error::{ApiError, ApiResult};

/// Compute, persist and return an estimate.
///
/// POST /cost-estimate (also POST /api/calculate-costs)
pub async fn create_estimate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CostEstimateRequest>, JsonRejection>,
) -> ApiResult<Json<CostEstimateResponse>> {
    let Json(request) = payload?;
    let input = request.into_input()?;

    let cost_result = state.estimator.estimate(&input)?;
    let record = StoredCostEstimate::new(&input, &cost_result)?;
    state.store.insert(&record).await?;

    info!(
        estimate_id = %record.id,
        property_type = %input.property_type,
        total_cost = cost_result.total_cost,
        "Cost estimate created"
    );

    Ok(Json(CostEstimateResponse {
        estimate_id: record.id,
        cost_result,
    }))
}

/// GET /cost-estimates/:id
pub async fn get_estimate(
    State(state): State<Arc<AppState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<DataResponse<StoredCostEstimate>> {
    let Path(id) = id.map_err(|_| ApiError::bad_request("Estimate id must be a UUID"))?;

    state
        .store
        .get(id)
        .await?
        .map(DataResponse::new)
        .ok_or_else(|| ApiError::not_found(format!("Cost estimate {} not found", id)))
}
