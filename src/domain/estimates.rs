//! Cost estimate request, response and stored-record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::estimator::{
    CostBreakdown, CostCalculationInput, CostEstimateResult, EstimateError, FinishingLevel,
};

/// Raw body of a cost estimate request.
///
/// Everything is optional here so that missing or mistyped fields produce a
/// field-specific 400 instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateRequest {
    #[serde(default)]
    pub land_area: Option<serde_json::Value>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub room_types: Option<serde_json::Value>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub finishing_level: Option<String>,
    #[serde(default)]
    pub has_basement: Option<bool>,
    #[serde(default)]
    pub parking_spaces: Option<u32>,
}

impl CostEstimateRequest {
    /// Validate and convert into estimator input.
    pub fn into_input(self) -> Result<CostCalculationInput, EstimateError> {
        let land_area = parse_positive_number("landArea", self.land_area.as_ref())?;
        let property_type = required_text("propertyType", self.property_type)?;
        let neighborhood = required_text("neighborhood", self.neighborhood)?;
        let room_types = parse_room_types(self.room_types)?;

        Ok(CostCalculationInput {
            land_area,
            property_type,
            room_types,
            neighborhood,
            finishing_level: self
                .finishing_level
                .map(FinishingLevel::from)
                .unwrap_or_default(),
            has_basement: self.has_basement.unwrap_or(false),
            parking_spaces: self.parking_spaces.unwrap_or(0),
        })
    }
}

/// Numbers and numeric strings are both accepted.
pub(crate) fn parse_positive_number(
    field: &str,
    value: Option<&serde_json::Value>,
) -> Result<f64, EstimateError> {
    let number = match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match number {
        Some(a) if a.is_finite() && a > 0.0 => Ok(a),
        Some(a) => Err(EstimateError::InvalidInput(format!(
            "{} must be greater than zero, got {}",
            field, a
        ))),
        None => Err(EstimateError::InvalidInput(format!(
            "{} is required and must be a number",
            field
        ))),
    }
}

pub(crate) fn required_text(field: &str, value: Option<String>) -> Result<String, EstimateError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(EstimateError::InvalidInput(format!("{} is required", field))),
    }
}

fn parse_room_types(value: Option<serde_json::Value>) -> Result<Vec<String>, EstimateError> {
    let Some(serde_json::Value::Array(items)) = value else {
        return Err(EstimateError::InvalidInput(
            "roomTypes is required and must be a list".to_string(),
        ));
    };

    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::String(s) => Ok(s),
            other => Err(EstimateError::InvalidInput(format!(
                "roomTypes must contain only strings, got {}",
                other
            ))),
        })
        .collect()
}

/// Response for a computed estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateResponse {
    pub estimate_id: Uuid,
    pub cost_result: CostEstimateResult,
}

/// A persisted estimate: the request fields plus the rounded sub-totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCostEstimate {
    pub id: Uuid,
    pub land_area: f64,
    pub property_type: String,
    pub room_types: Vec<String>,
    pub neighborhood: String,
    pub finishing_level: String,
    pub has_basement: bool,
    pub parking_spaces: u32,
    pub structural_cost: Decimal,
    pub finishing_cost: Decimal,
    pub electrical_cost: Decimal,
    pub plumbing_cost: Decimal,
    pub hvac_cost: Decimal,
    pub landscaping_cost: Decimal,
    pub permits_cost: Decimal,
    pub contingency_cost: Decimal,
    pub total_cost: Decimal,
    pub cost_breakdown: CostBreakdown,
    pub created_at: DateTime<Utc>,
}

impl StoredCostEstimate {
    pub fn new(
        input: &CostCalculationInput,
        result: &CostEstimateResult,
    ) -> Result<Self, EstimateError> {
        Ok(Self {
            id: Uuid::new_v4(),
            land_area: input.land_area,
            property_type: input.property_type.clone(),
            room_types: input.room_types.clone(),
            neighborhood: input.neighborhood.clone(),
            finishing_level: input.finishing_level.to_string(),
            has_basement: input.has_basement,
            parking_spaces: input.parking_spaces,
            structural_cost: money(result.structural_cost)?,
            finishing_cost: money(result.finishing_cost)?,
            electrical_cost: money(result.electrical_cost)?,
            plumbing_cost: money(result.plumbing_cost)?,
            hvac_cost: money(result.hvac_cost)?,
            landscaping_cost: money(result.landscaping_cost)?,
            permits_cost: money(result.permits_cost)?,
            contingency_cost: money(result.contingency_cost)?,
            total_cost: money(result.total_cost)?,
            cost_breakdown: result.cost_breakdown,
            created_at: Utc::now(),
        })
    }
}

/// SAR amount rounded to halalas.
pub fn money(amount: f64) -> Result<Decimal, EstimateError> {
    Decimal::from_f64_retain(amount)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| {
            EstimateError::InvalidInput(format!("amount {} cannot be stored", amount))
        })
}
