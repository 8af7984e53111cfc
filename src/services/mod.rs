//! Service layer: persistence, Redis caching, the AI client and the
//! project study planner.

pub mod ai_client;
pub mod cache;
pub mod estimate_store;
pub mod project_study;
pub mod sanitize;

pub use ai_client::AiClient;
pub use cache::RedisCache;
pub use estimate_store::{EstimateStore, MemoryEstimateStore, PgEstimateStore};
pub use project_study::ProjectStudyPlanner;
