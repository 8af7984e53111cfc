//! Project feasibility study: the cost section.
//!
//! The estimator supplies real construction figures; the project-level split
//! either comes back from the AI service or falls back to fixed market shares.

use serde::{Deserialize, Serialize};

use super::estimates::{parse_positive_number, required_text};
use crate::estimator::{CostCalculationInput, CostEstimateResult, EstimateError, FinishingLevel};

/// Investment assumed when no construction estimate is available (SAR).
pub const DEFAULT_INVESTMENT: f64 = 5_000_000.0;

/// Expected revenue as a multiple of the investment.
pub const REVENUE_MULTIPLE: f64 = 1.65;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStudyRequest {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub total_area: Option<serde_json::Value>,
    #[serde(default)]
    pub finishing_level: Option<String>,
    #[serde(default)]
    pub has_basement: Option<bool>,
    #[serde(default)]
    pub parking_spaces: Option<u32>,
}

/// Validated study parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectStudyInput {
    pub project_name: String,
    pub project_type: String,
    pub location: String,
    pub total_area: f64,
    pub finishing_level: FinishingLevel,
    pub has_basement: bool,
    pub parking_spaces: u32,
}

impl ProjectStudyRequest {
    pub fn into_input(self) -> Result<ProjectStudyInput, EstimateError> {
        Ok(ProjectStudyInput {
            project_name: required_text("projectName", self.project_name)?,
            project_type: required_text("projectType", self.project_type)?,
            location: required_text("location", self.location)?,
            total_area: parse_positive_number("totalArea", self.total_area.as_ref())?,
            finishing_level: FinishingLevel::from(required_text(
                "finishingLevel",
                self.finishing_level,
            )?),
            has_basement: self.has_basement.unwrap_or(false),
            parking_spaces: self.parking_spaces.unwrap_or(0),
        })
    }
}

impl ProjectStudyInput {
    /// Representative rooms for a project type.
    pub fn room_preset(&self) -> Vec<String> {
        let rooms: &[&str] = match self.project_type.as_str() {
            "residential_complex" => &["غرفة نوم", "صالة", "مطبخ"],
            "commercial_mall" => &["محل تجاري", "مطعم"],
            _ => &["مكتب", "قاعة اجتماعات"],
        };
        rooms.iter().map(|r| r.to_string()).collect()
    }

    /// Estimator input with the location used as the neighborhood.
    pub fn to_cost_input(&self) -> CostCalculationInput {
        CostCalculationInput::new(
            self.total_area,
            self.project_type.clone(),
            self.room_preset(),
            self.location.clone(),
        )
        .with_finishing_level(self.finishing_level.clone())
        .with_basement(self.has_basement)
        .with_parking_spaces(self.parking_spaces)
    }
}

/// Project-level cost split in SAR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCostSplit {
    pub land_cost: f64,
    pub construction_cost: f64,
    pub infrastructure_cost: f64,
    pub permits_and_licenses: f64,
    pub marketing_cost: f64,
    pub contingency: f64,
    pub total_project_cost: f64,
}

impl ProjectCostSplit {
    /// Fixed market shares of the investment.
    pub fn fallback(investment: f64) -> Self {
        Self {
            land_cost: investment * 0.25,
            construction_cost: investment * 0.50,
            infrastructure_cost: investment * 0.12,
            permits_and_licenses: investment * 0.04,
            marketing_cost: investment * 0.06,
            contingency: investment * 0.03,
            total_project_cost: investment,
        }
    }

    pub fn components_total(&self) -> f64 {
        self.land_cost
            + self.construction_cost
            + self.infrastructure_cost
            + self.permits_and_licenses
            + self.marketing_cost
            + self.contingency
    }

    /// A split is usable when every figure is finite and non-negative and
    /// the total is positive.
    pub fn is_plausible(&self) -> bool {
        let figures = [
            self.land_cost,
            self.construction_cost,
            self.infrastructure_cost,
            self.permits_and_licenses,
            self.marketing_cost,
            self.contingency,
            self.total_project_cost,
        ];
        figures.iter().all(|v| v.is_finite() && *v >= 0.0) && self.total_project_cost > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProjection {
    pub total_cost: f64,
    pub expected_revenue: f64,
    pub break_even_months: u32,
    /// Percent of revenue
    pub profit_margin: f64,
}

impl FinancialProjection {
    pub fn from_investment(total_cost: f64) -> Self {
        let expected_revenue = total_cost * REVENUE_MULTIPLE;
        let profit = expected_revenue - total_cost;
        let break_even_months = ((total_cost / profit) * 12.0).floor() as u32;
        let profit_margin = profit / expected_revenue * 100.0;

        Self {
            total_cost,
            expected_revenue,
            break_even_months,
            profit_margin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostDataSource {
    /// Figures computed by the estimator
    Engine,
    /// Estimator unavailable; default investment used
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStudyCosts {
    pub project_name: String,
    pub project_type: String,
    pub location: String,
    pub cost_estimate: Option<CostEstimateResult>,
    pub investment_amount: f64,
    pub cost_data_source: CostDataSource,
    pub cost_split: ProjectCostSplit,
    pub split_source: SplitSource,
    pub financial_projection: FinancialProjection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_split_sums_to_investment() {
        let split = ProjectCostSplit::fallback(DEFAULT_INVESTMENT);
        assert!((split.components_total() - DEFAULT_INVESTMENT).abs() < 1e-6);
        assert_eq!(split.land_cost, 1_250_000.0);
        assert_eq!(split.construction_cost, 2_500_000.0);
        assert!(split.is_plausible());
    }

    #[test]
    fn projection_uses_fixed_revenue_multiple() {
        let projection = FinancialProjection::from_investment(1_000_000.0);
        assert!((projection.expected_revenue - 1_650_000.0).abs() < 1e-6);
        assert_eq!(projection.break_even_months, 18);
        assert!((projection.profit_margin - 39.3939).abs() < 1e-3);
    }

    #[test]
    fn room_presets_follow_project_type() {
        let mut input: ProjectStudyInput = serde_json::from_value::<ProjectStudyRequest>(json!({
            "projectName": "مجمع النخيل",
            "projectType": "residential_complex",
            "location": "الملقا",
            "totalArea": 5000,
            "finishingLevel": "فاخر"
        }))
        .unwrap()
        .into_input()
        .unwrap();

        assert_eq!(input.room_preset().len(), 3);
        input.project_type = "commercial_mall".into();
        assert_eq!(input.room_preset(), vec!["محل تجاري", "مطعم"]);
        input.project_type = "office".into();
        assert_eq!(input.room_preset(), vec!["مكتب", "قاعة اجتماعات"]);

        let cost_input = input.to_cost_input();
        assert_eq!(cost_input.neighborhood, "الملقا");
        assert_eq!(cost_input.finishing_level, FinishingLevel::Luxury);
    }

    #[test]
    fn study_requires_core_fields() {
        let request: ProjectStudyRequest = serde_json::from_value(json!({
            "projectName": "برج",
            "location": "العليا",
            "totalArea": 1000,
            "finishingLevel": "متوسط"
        }))
        .unwrap();
        assert!(request.into_input().is_err());
    }

    #[test]
    fn implausible_splits_are_rejected() {
        let mut split = ProjectCostSplit::fallback(1_000.0);
        split.marketing_cost = -1.0;
        assert!(!split.is_plausible());
        split = ProjectCostSplit::fallback(0.0);
        assert!(!split.is_plausible());
    }
}
