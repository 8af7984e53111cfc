//! Redis cache for AI-derived project cost splits.
//!
//! Cache failures never fail a request: reads degrade to a miss and write
//! errors are logged by the caller.

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    pub async fn new(redis_url: &str, default_ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        tracing::info!(ttl_secs = default_ttl_seconds, "Redis cache connected");

        Ok(Self {
            conn,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        })
    }

    #[instrument(skip(self), fields(cache_hit))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();

        let hit = match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => match serde_json::from_str(&data) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key = key, error = %e, "Failed to deserialize cached value");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                error!(key = key, error = %e, "Redis get error");
                None
            }
        };

        debug!(key = key, hit = hit.is_some(), "Cache lookup");
        tracing::Span::current().record("cache_hit", hit.is_some());
        hit
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    #[instrument(skip(self, value))]
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<()> {
        let mut conn = self.conn.clone();

        let data = serde_json::to_string(value).context("Failed to serialize value for cache")?;

        conn.set_ex::<_, _, ()>(key, data, ttl.as_secs())
            .await
            .context("Failed to set cache value")?;

        debug!(key = key, ttl_secs = ttl.as_secs(), "Cached value");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("Redis health check failed")?;
        Ok(())
    }
}

/// Cache key builders.
pub mod keys {
    /// AI cost split for a study, keyed by a fingerprint of its inputs.
    pub fn study_split(fingerprint: &str) -> String {
        format!("ai:study:split:{}", fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::keys;

    #[test]
    fn study_split_key_is_namespaced() {
        assert_eq!(keys::study_split("abc"), "ai:study:split:abc");
    }
}
