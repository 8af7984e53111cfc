pub mod estimates;
pub mod health;
pub mod reference;
pub mod study;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Cost estimates
        .route("/cost-estimate", post(estimates::create_estimate))
        .route("/api/calculate-costs", post(estimates::create_estimate))
        .route("/cost-estimates/:id", get(estimates::get_estimate))
        // Reference tables
        .route("/reference/neighborhoods", get(reference::list_neighborhoods))
        .route("/reference/room-types", get(reference::list_room_types))
        .route("/reference/property-types", get(reference::list_property_types))
        // Feasibility study
        .route("/project-study/costs", post(study::project_study_costs))
}
