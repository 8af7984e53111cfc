use anyhow::{Context, Result};
use std::sync::Arc;

use aqar_backend::{
    app, config, db, logging,
    services::{AiClient, EstimateStore, MemoryEstimateStore, PgEstimateStore, RedisCache},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting aqar backend"
    );

    let store: Arc<dyn EstimateStore> = match &settings.database_url {
        Some(url) => {
            let pool = db::create_pool(url, settings.database_max_connections).await?;
            Arc::new(PgEstimateStore::new(pool))
        }
        None => {
            tracing::warn!(
                capacity = settings.memory_store_capacity,
                "DATABASE_URL not set, recent estimates are kept in memory"
            );
            Arc::new(MemoryEstimateStore::with_capacity(
                settings.memory_store_capacity,
            ))
        }
    };

    // Redis is optional; a failed connection disables caching
    let cache = match &settings.redis_url {
        Some(url) => match RedisCache::new(url, settings.redis_cache_ttl_seconds).await {
            Ok(cache) => Some(cache),
            Err(e) => {
                tracing::warn!(error = %e, "Redis unavailable, AI reply caching disabled");
                None
            }
        },
        None => None,
    };

    let ai_client = match &settings.ai_api_key {
        Some(key) => Some(AiClient::new(
            &settings.ai_service_url,
            key,
            &settings.ai_model,
            settings.ai_service_timeout_seconds,
            settings.ai_max_retry_seconds,
        )?),
        None => {
            tracing::info!("AI_API_KEY not set, project studies use the fixed cost split");
            None
        }
    };

    if let Some(client) = ai_client.clone() {
        tokio::spawn(async move {
            match client.health_check().await {
                Ok(()) => tracing::info!("AI service is healthy"),
                Err(e) => tracing::warn!(error = %e, "AI service health check failed"),
            }
        });
    }

    let state = app::AppState::new(settings.clone(), store, cache, ai_client);
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server_addr))?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
