//! Project feasibility study endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::{ProjectStudyCosts, ProjectStudyRequest};
use crate::error::ApiResult;
use crate::middleware::RequestIdExt;
use crate::services::ProjectStudyPlanner;

/// Cost section of a feasibility study.
///
/// POST /project-study/costs
pub async fn project_study_costs(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ProjectStudyRequest>, JsonRejection>,
) -> ApiResult<DataResponse<ProjectStudyCosts>> {
    let Json(request) = payload?;
    let input = request.into_input()?;

    let planner = ProjectStudyPlanner::new(
        &state.estimator,
        state.ai_client.as_ref(),
        state.cache.as_ref(),
    );
    let costs = planner.costs(&input, headers.request_id()).await;

    tracing::info!(
        project_name = %costs.project_name,
        split_source = ?costs.split_source,
        investment = costs.investment_amount,
        "Project study costs computed"
    );

    Ok(DataResponse::new(costs))
}
