use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

use crate::estimator::EstimatorConfig;
use crate::services::estimate_store::DEFAULT_MEMORY_CAPACITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// JSON in production, pretty elsewhere, unless `LOG_FORMAT` says otherwise.
    pub fn resolve(env: &Environment, requested: Option<&str>) -> Self {
        match requested.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("json") => Self::Json,
            Some("pretty") => Self::Pretty,
            _ if env.is_prod() => Self::Json,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub log_format: LogFormat,
    pub server_addr: String,

    // Database (estimates are kept in memory when unset)
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Estimates retained by the in-memory store before the oldest is evicted
    pub memory_store_capacity: usize,

    // Redis (AI reply caching is disabled when unset)
    pub redis_url: Option<String>,
    pub redis_cache_ttl_seconds: u64,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // AI Service (disabled when no API key is set)
    pub ai_service_url: String,
    pub ai_api_key: Option<String>,
    pub ai_model: String,
    pub ai_service_timeout_seconds: u64,
    pub ai_max_retry_seconds: u64,

    // Estimator
    pub estimator: EstimatorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: Environment::Dev,
            log_format: LogFormat::Pretty,
            server_addr: "0.0.0.0:8080".to_string(),
            database_url: None,
            database_max_connections: 10,
            memory_store_capacity: DEFAULT_MEMORY_CAPACITY,
            redis_url: None,
            redis_cache_ttl_seconds: 3600,
            cors_allow_origins: vec!["http://localhost:5173".to_string()],
            ai_service_url: "https://api.openai.com".to_string(),
            ai_api_key: None,
            ai_model: "gpt-4o".to_string(),
            ai_service_timeout_seconds: 120,
            ai_max_retry_seconds: 30,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let log_format = LogFormat::resolve(&env, optional_var("LOG_FORMAT").as_deref());
        let server_addr = env::var("SERVER_ADDR").unwrap_or(defaults.server_addr);

        // Database
        let database_url = optional_var("DATABASE_URL");
        let database_max_connections =
            parsed_var("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections)?;
        let memory_store_capacity =
            parsed_var("MEMORY_STORE_CAPACITY", defaults.memory_store_capacity)?;
        if memory_store_capacity == 0 {
            bail!("MEMORY_STORE_CAPACITY must be at least 1");
        }

        // Redis
        let redis_url = optional_var("REDIS_URL");
        let redis_cache_ttl_seconds =
            parsed_var("REDIS_CACHE_TTL_SECONDS", defaults.redis_cache_ttl_seconds)?;

        // CORS
        let cors_allow_origins = match env::var("CORS_ALLOW_ORIGINS") {
            Ok(origins) => origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => defaults.cors_allow_origins,
        };

        // AI Service
        let ai_service_url = env::var("AI_SERVICE_URL").unwrap_or(defaults.ai_service_url);
        url::Url::parse(&ai_service_url)
            .with_context(|| format!("AI_SERVICE_URL is not a valid URL: {}", ai_service_url))?;
        let ai_api_key = optional_var("AI_API_KEY");
        let ai_model = env::var("AI_MODEL").unwrap_or(defaults.ai_model);
        let ai_service_timeout_seconds =
            parsed_var("AI_SERVICE_TIMEOUT_SECONDS", defaults.ai_service_timeout_seconds)?;
        let ai_max_retry_seconds =
            parsed_var("AI_MAX_RETRY_SECONDS", defaults.ai_max_retry_seconds)?;

        // Estimator
        let estimator = EstimatorConfig {
            labor_rate: rate_var("LABOR_RATE", defaults.estimator.labor_rate)?,
            contingency_rate: rate_var("CONTINGENCY_RATE", defaults.estimator.contingency_rate)?,
            ..defaults.estimator
        };

        Ok(Settings {
            env,
            log_format,
            server_addr,
            database_url,
            database_max_connections,
            memory_store_capacity,
            redis_url,
            redis_cache_ttl_seconds,
            cors_allow_origins,
            ai_service_url,
            ai_api_key,
            ai_model,
            ai_service_timeout_seconds,
            ai_max_retry_seconds,
            estimator,
        })
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, raw)),
        None => Ok(default),
    }
}

fn rate_var(key: &str, default: f64) -> Result<f64> {
    let rate: f64 = parsed_var(key, default)?;
    validate_rate(key, rate)
}

fn validate_rate(key: &str, rate: f64) -> Result<f64> {
    if !rate.is_finite() || rate < 0.0 {
        bail!("{} must be a non-negative number, got {}", key, rate);
    }
    Ok(rate)
}
