//! Request and result types for the cost estimator.
//!
//! Field names serialize as camelCase to match the contract the web client
//! already speaks.

use serde::{Deserialize, Serialize};

/// Residential or commercial pricing row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    Residential,
    Commercial,
}

impl std::fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Residential => write!(f, "residential"),
            Self::Commercial => write!(f, "commercial"),
        }
    }
}

/// Quality tier inferred from the requested rooms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Basic,
    Standard,
    Luxury,
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Standard => write!(f, "standard"),
            Self::Luxury => write!(f, "luxury"),
        }
    }
}

/// Requested finishing level.
///
/// Accepts the English names and the Arabic labels used by the forms
/// (عادي, متوسط, فاخر). Anything else is kept verbatim and priced like
/// `Standard`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FinishingLevel {
    Economy,
    #[default]
    Standard,
    Luxury,
    Other(String),
}

impl FinishingLevel {
    /// Multiplier applied to the finishing component only.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Economy => 0.8,
            Self::Standard => 1.0,
            Self::Luxury => 1.4,
            Self::Other(_) => 1.0,
        }
    }
}

impl From<&str> for FinishingLevel {
    fn from(s: &str) -> Self {
        match s.trim() {
            "economy" | "عادي" => Self::Economy,
            "standard" | "متوسط" => Self::Standard,
            "luxury" | "فاخر" => Self::Luxury,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FinishingLevel {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<FinishingLevel> for String {
    fn from(level: FinishingLevel) -> Self {
        level.to_string()
    }
}

impl std::fmt::Display for FinishingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Economy => write!(f, "economy"),
            Self::Standard => write!(f, "standard"),
            Self::Luxury => write!(f, "luxury"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A project description to be priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCalculationInput {
    /// Land parcel area in m²
    pub land_area: f64,
    pub property_type: String,
    #[serde(default)]
    pub room_types: Vec<String>,
    pub neighborhood: String,
    #[serde(default)]
    pub finishing_level: FinishingLevel,
    #[serde(default)]
    pub has_basement: bool,
    #[serde(default)]
    pub parking_spaces: u32,
}

impl CostCalculationInput {
    pub fn new(
        land_area: f64,
        property_type: impl Into<String>,
        room_types: Vec<String>,
        neighborhood: impl Into<String>,
    ) -> Self {
        Self {
            land_area,
            property_type: property_type.into(),
            room_types,
            neighborhood: neighborhood.into(),
            finishing_level: FinishingLevel::default(),
            has_basement: false,
            parking_spaces: 0,
        }
    }

    pub fn with_finishing_level(mut self, level: impl Into<FinishingLevel>) -> Self {
        self.finishing_level = level.into();
        self
    }

    pub fn with_basement(mut self, has_basement: bool) -> Self {
        self.has_basement = has_basement;
        self
    }

    pub fn with_parking_spaces(mut self, parking_spaces: u32) -> Self {
        self.parking_spaces = parking_spaces;
        self
    }
}

/// Line items. Structure and finishing are split by fixed shares; the
/// rest mirror the corresponding sub-totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub foundation: f64,
    pub structure: f64,
    pub roofing: f64,
    pub walls: f64,
    pub flooring: f64,
    pub electrical: f64,
    pub plumbing: f64,
    pub hvac: f64,
    pub finishes: f64,
    pub landscaping: f64,
    pub basement: f64,
    pub parking: f64,
    pub permits: f64,
    pub labor: f64,
    pub contingency: f64,
}

impl CostBreakdown {
    /// Sum of all line items. Reconciles to the estimate's total cost.
    pub fn total(&self) -> f64 {
        self.foundation
            + self.structure
            + self.roofing
            + self.walls
            + self.flooring
            + self.finishes
            + self.electrical
            + self.plumbing
            + self.hvac
            + self.basement
            + self.landscaping
            + self.parking
            + self.permits
            + self.labor
            + self.contingency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    /// Constructed area in m², always a whole number
    pub building_area: f64,
    /// Length of the submitted room list, before any fallback
    pub room_count: usize,
    pub complexity: QualityTier,
    /// `"<tier> (<category>)"`, e.g. `"luxury (residential)"`
    pub quality_level: String,
}

/// Factors the estimator resolved from the reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFactors {
    pub category: PropertyCategory,
    pub coverage_ratio: f64,
    pub neighborhood_multiplier: f64,
    pub complexity_multiplier: f64,
    pub finishing_multiplier: f64,
}

/// Fully itemized estimate in SAR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateResult {
    /// Structure plus basement
    pub structural_cost: f64,
    pub finishing_cost: f64,
    pub electrical_cost: f64,
    pub plumbing_cost: f64,
    pub hvac_cost: f64,
    pub landscaping_cost: f64,
    pub permits_cost: f64,
    pub contingency_cost: f64,
    pub total_cost: f64,
    pub cost_breakdown: CostBreakdown,
    pub cost_per_square_meter: f64,
    pub project_details: ProjectDetails,
    pub factors: AppliedFactors,
}
