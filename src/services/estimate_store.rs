//! Persistence for computed cost estimates.
//!
//! PostgreSQL is used when `DATABASE_URL` is configured; otherwise the most
//! recent estimates are kept in process memory, up to a fixed capacity.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::StoredCostEstimate;
use crate::error::ApiResult;
use crate::estimator::CostBreakdown;

/// Storage backend for estimates.
pub trait EstimateStore: Send + Sync {
    fn insert<'a>(&'a self, estimate: &'a StoredCostEstimate) -> BoxFuture<'a, ApiResult<()>>;

    fn get(&self, id: Uuid) -> BoxFuture<'_, ApiResult<Option<StoredCostEstimate>>>;

    fn health_check(&self) -> BoxFuture<'_, anyhow::Result<()>>;

    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;
}

// =============================================================================
// PostgreSQL
// =============================================================================

#[derive(Clone)]
pub struct PgEstimateStore {
    pool: PgPool,
}

impl PgEstimateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CostEstimateRow {
    id: Uuid,
    land_area: f64,
    property_type: String,
    room_types: Json<Vec<String>>,
    neighborhood: String,
    finishing_level: String,
    has_basement: bool,
    parking_spaces: i32,
    structural_cost: Decimal,
    finishing_cost: Decimal,
    electrical_cost: Decimal,
    plumbing_cost: Decimal,
    hvac_cost: Decimal,
    landscaping_cost: Decimal,
    permits_cost: Decimal,
    contingency_cost: Decimal,
    total_cost: Decimal,
    cost_breakdown: Json<CostBreakdown>,
    created_at: DateTime<Utc>,
}

impl From<CostEstimateRow> for StoredCostEstimate {
    fn from(row: CostEstimateRow) -> Self {
        Self {
            id: row.id,
            land_area: row.land_area,
            property_type: row.property_type,
            room_types: row.room_types.0,
            neighborhood: row.neighborhood,
            finishing_level: row.finishing_level,
            has_basement: row.has_basement,
            parking_spaces: u32::try_from(row.parking_spaces).unwrap_or(0),
            structural_cost: row.structural_cost,
            finishing_cost: row.finishing_cost,
            electrical_cost: row.electrical_cost,
            plumbing_cost: row.plumbing_cost,
            hvac_cost: row.hvac_cost,
            landscaping_cost: row.landscaping_cost,
            permits_cost: row.permits_cost,
            contingency_cost: row.contingency_cost,
            total_cost: row.total_cost,
            cost_breakdown: row.cost_breakdown.0,
            created_at: row.created_at,
        }
    }
}

impl EstimateStore for PgEstimateStore {
    fn insert<'a>(&'a self, estimate: &'a StoredCostEstimate) -> BoxFuture<'a, ApiResult<()>> {
        async move {
            sqlx::query(
                r#"
                INSERT INTO cost_estimates (
                    id, land_area, property_type, room_types, neighborhood,
                    finishing_level, has_basement, parking_spaces,
                    structural_cost, finishing_cost, electrical_cost, plumbing_cost,
                    hvac_cost, landscaping_cost, permits_cost, contingency_cost,
                    total_cost, cost_breakdown, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
                "#,
            )
            .bind(estimate.id)
            .bind(estimate.land_area)
            .bind(&estimate.property_type)
            .bind(Json(&estimate.room_types))
            .bind(&estimate.neighborhood)
            .bind(&estimate.finishing_level)
            .bind(estimate.has_basement)
            .bind(i32::try_from(estimate.parking_spaces).unwrap_or(i32::MAX))
            .bind(estimate.structural_cost)
            .bind(estimate.finishing_cost)
            .bind(estimate.electrical_cost)
            .bind(estimate.plumbing_cost)
            .bind(estimate.hvac_cost)
            .bind(estimate.landscaping_cost)
            .bind(estimate.permits_cost)
            .bind(estimate.contingency_cost)
            .bind(estimate.total_cost)
            .bind(Json(&estimate.cost_breakdown))
            .bind(estimate.created_at)
            .execute(&self.pool)
            .await?;

            debug!(estimate_id = %estimate.id, "Cost estimate stored");
            Ok(())
        }
        .boxed()
    }

    fn get(&self, id: Uuid) -> BoxFuture<'_, ApiResult<Option<StoredCostEstimate>>> {
        async move {
            let row = sqlx::query_as::<_, CostEstimateRow>(
                r#"
                SELECT id, land_area, property_type, room_types, neighborhood,
                       finishing_level, has_basement, parking_spaces,
                       structural_cost, finishing_cost, electrical_cost, plumbing_cost,
                       hvac_cost, landscaping_cost, permits_cost, contingency_cost,
                       total_cost, cost_breakdown, created_at
                FROM cost_estimates
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.map(StoredCostEstimate::from))
        }
        .boxed()
    }

    fn health_check(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        async move {
            sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
            Ok(())
        }
        .boxed()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Estimates kept when no capacity is configured.
pub const DEFAULT_MEMORY_CAPACITY: usize = 10_000;

/// Bounded in-process store. Once full, the oldest estimate is evicted.
pub struct MemoryEstimateStore {
    capacity: usize,
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    estimates: HashMap<Uuid, StoredCostEstimate>,
    /// Insertion order, oldest first
    order: VecDeque<Uuid>,
}

impl Default for MemoryEstimateStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }
}

impl MemoryEstimateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(MemoryInner::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.read().estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EstimateStore for MemoryEstimateStore {
    #[instrument(skip_all, fields(estimate_id = %estimate.id))]
    fn insert<'a>(&'a self, estimate: &'a StoredCostEstimate) -> BoxFuture<'a, ApiResult<()>> {
        let mut inner = self.inner.write();

        if inner
            .estimates
            .insert(estimate.id, estimate.clone())
            .is_none()
        {
            inner.order.push_back(estimate.id);
        }

        while inner.estimates.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.estimates.remove(&oldest);
            debug!(evicted = %oldest, "Memory store full, evicted oldest estimate");
        }
        drop(inner);

        debug!("Cost estimate stored in memory");
        futures::future::ready(Ok(())).boxed()
    }

    fn get(&self, id: Uuid) -> BoxFuture<'_, ApiResult<Option<StoredCostEstimate>>> {
        let found = self.inner.read().estimates.get(&id).cloned();
        futures::future::ready(Ok(found)).boxed()
    }

    fn health_check(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        futures::future::ready(Ok(())).boxed()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{estimate, CostCalculationInput};

    fn stored() -> StoredCostEstimate {
        let input = CostCalculationInput::new(600.0, "فلة", vec![], "النرجس");
        let result = estimate(&input).unwrap();
        StoredCostEstimate::new(&input, &result).unwrap()
    }

    #[tokio::test]
    async fn memory_store_round_trips_by_id() {
        let store = MemoryEstimateStore::new();
        let record = stored();

        store.insert(&record).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(record.id).await.unwrap(), Some(record));
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_evicts_oldest_when_full() {
        let store = MemoryEstimateStore::with_capacity(2);
        let first = stored();
        let second = stored();
        let third = stored();

        for record in [&first, &second, &third] {
            store.insert(record).await.unwrap();
        }

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(first.id).await.unwrap(), None);
        assert!(store.get(second.id).await.unwrap().is_some());
        assert!(store.get(third.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn reinserting_an_estimate_does_not_evict_others() {
        let store = MemoryEstimateStore::with_capacity(2);
        let first = stored();
        let second = stored();

        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();
        store.insert(&first).await.unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.get(second.id).await.unwrap().is_some());
    }

    #[test]
    fn zero_capacity_keeps_one_estimate() {
        assert_eq!(MemoryEstimateStore::with_capacity(0).capacity(), 1);
    }
}
