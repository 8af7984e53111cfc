//! Construction cost estimator.
//!
//! A pure, synchronous pricing model: a land parcel description goes in, an
//! itemized estimate in SAR comes out. No I/O and no shared mutable state,
//! so a single [`CostEstimator`] can be shared freely across request tasks.

pub mod engine;
pub mod model;
pub mod tables;

use thiserror::Error;

pub use engine::{estimate, CostEstimator};
pub use model::{
    AppliedFactors, CostBreakdown, CostCalculationInput, CostEstimateResult, FinishingLevel,
    ProjectDetails, PropertyCategory, QualityTier,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Room-count and indicator thresholds used to infer the quality tier.
///
/// The defaults are tuning constants carried over from the pricing sheets
/// rather than a documented business rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub luxury_indicator_count: usize,
    pub luxury_room_count: usize,
    pub standard_indicator_count: usize,
    pub standard_room_count: usize,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            luxury_indicator_count: 3,
            luxury_room_count: 12,
            standard_indicator_count: 1,
            standard_room_count: 8,
        }
    }
}

/// Tunable rates for the estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Share of material costs charged as labor
    pub labor_rate: f64,
    /// Reserve added on top of the subtotal
    pub contingency_rate: f64,
    pub tiers: TierThresholds,
}

impl EstimatorConfig {
    pub const DEFAULT_LABOR_RATE: f64 = 0.30;
    pub const DEFAULT_CONTINGENCY_RATE: f64 = 0.10;
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            labor_rate: Self::DEFAULT_LABOR_RATE,
            contingency_rate: Self::DEFAULT_CONTINGENCY_RATE,
            tiers: TierThresholds::default(),
        }
    }
}
