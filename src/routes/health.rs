use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub store: String,
    pub store_backend: &'static str,
    pub redis: String,
    pub ai_service: String,
}

fn label<E>(result: Option<Result<(), E>>) -> String {
    match result {
        Some(Ok(())) => "ok",
        Some(Err(_)) => "error",
        None => "disabled",
    }
    .to_string()
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let redis_check = async {
        match &state.cache {
            Some(cache) => Some(cache.health_check().await),
            None => None,
        }
    };
    let ai_check = async {
        match &state.ai_client {
            Some(client) => Some(client.health_check().await),
            None => None,
        }
    };

    let (store_result, redis_result, ai_result) =
        tokio::join!(state.store.health_check(), redis_check, ai_check);

    let optional_ok = |r: &Option<anyhow::Result<()>>| !matches!(r, Some(Err(_)));

    // The store is critical; Redis and the AI service only degrade
    let status = if store_result.is_err() {
        "unhealthy"
    } else if optional_ok(&redis_result) && optional_ok(&ai_result) {
        "healthy"
    } else {
        "degraded"
    };

    let status_code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                store: label(Some(store_result)),
                store_backend: state.store.backend(),
                redis: label(redis_result),
                ai_service: label(ai_result),
            },
        }),
    )
}
