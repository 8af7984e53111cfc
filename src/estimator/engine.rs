//! The estimation pipeline.

use tracing::{debug, instrument};

use super::model::{
    AppliedFactors, CostBreakdown, CostCalculationInput, CostEstimateResult, ProjectDetails,
    PropertyCategory, QualityTier,
};
use super::tables::{self, BaseUnitCosts};
use super::{EstimateError, EstimatorConfig, TierThresholds};

/// Cost estimator bound to a set of rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostEstimator {
    config: EstimatorConfig,
}

/// Estimate with the default rates.
pub fn estimate(input: &CostCalculationInput) -> Result<CostEstimateResult, EstimateError> {
    CostEstimator::default().estimate(input)
}

impl CostEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Price a project.
    ///
    /// Fails only when the land area is not a positive finite number. Every
    /// table miss falls back to a neutral default.
    #[instrument(
        level = "debug",
        skip_all,
        fields(property_type = %input.property_type, land_area = input.land_area)
    )]
    pub fn estimate(
        &self,
        input: &CostCalculationInput,
    ) -> Result<CostEstimateResult, EstimateError> {
        validate(input)?;

        let category = tables::property_category(&input.property_type);
        let tier = quality_tier(&input.property_type, &input.room_types, &self.config.tiers);
        let coverage_ratio = tables::coverage_ratio(&input.property_type);
        let building_area = (input.land_area * coverage_ratio).floor();

        let unit = tables::base_unit_costs(category, tier);
        let finishing_multiplier = input.finishing_level.multiplier();
        let neighborhood_multiplier = tables::neighborhood_multiplier(&input.neighborhood);
        let complexity_multiplier = complexity_multiplier(&input.room_types);

        let base = BaseAmounts::compute(
            &unit,
            building_area,
            neighborhood_multiplier,
            complexity_multiplier,
            finishing_multiplier,
        );

        let basement = if input.has_basement {
            building_area * tables::BASEMENT_COST_PER_SQM * neighborhood_multiplier
        } else {
            0.0
        };
        let parking = f64::from(input.parking_spaces) * tables::PARKING_COST_PER_SPACE;
        let landscaping = match category {
            PropertyCategory::Residential => {
                input.land_area * tables::RESIDENTIAL_LANDSCAPING_PER_SQM * neighborhood_multiplier
            }
            PropertyCategory::Commercial => {
                building_area
                    * tables::COMMERCIAL_LANDSCAPED_SHARE
                    * tables::COMMERCIAL_LANDSCAPING_PER_SQM
            }
        };

        let material_costs = base.structure
            + base.finishing
            + base.electrical
            + base.plumbing
            + base.hvac
            + basement;
        let labor = material_costs * self.config.labor_rate;
        let subtotal = material_costs + landscaping + base.permits + labor + parking;
        let contingency = subtotal * self.config.contingency_rate;
        let total_cost = subtotal + contingency;
        if !total_cost.is_finite() {
            return Err(EstimateError::InvalidInput(
                "estimate is out of range for the given rates".to_string(),
            ));
        }

        let cost_per_square_meter = if building_area > 0.0 {
            total_cost / building_area
        } else {
            0.0
        };

        let cost_breakdown = CostBreakdown {
            foundation: base.structure * tables::FOUNDATION_SHARE,
            structure: base.structure * tables::FRAME_SHARE,
            roofing: base.structure * tables::ROOFING_SHARE,
            walls: base.finishing * tables::WALLS_SHARE,
            flooring: base.finishing * tables::FLOORING_SHARE,
            electrical: base.electrical,
            plumbing: base.plumbing,
            hvac: base.hvac,
            finishes: base.finishing * tables::FINISHES_SHARE,
            landscaping,
            basement,
            parking,
            permits: base.permits,
            labor,
            contingency,
        };

        debug!(
            %category,
            %tier,
            building_area,
            total_cost,
            "Construction cost estimated"
        );

        Ok(CostEstimateResult {
            structural_cost: base.structure + basement,
            finishing_cost: base.finishing,
            electrical_cost: base.electrical,
            plumbing_cost: base.plumbing,
            hvac_cost: base.hvac,
            landscaping_cost: landscaping,
            permits_cost: base.permits,
            contingency_cost: contingency,
            total_cost,
            cost_breakdown,
            cost_per_square_meter,
            project_details: ProjectDetails {
                building_area,
                room_count: input.room_types.len(),
                complexity: tier,
                quality_level: format!("{} ({})", tier, category),
            },
            factors: AppliedFactors {
                category,
                coverage_ratio,
                neighborhood_multiplier,
                complexity_multiplier,
                finishing_multiplier,
            },
        })
    }
}

/// Area-driven amounts before basement, parking, labor and contingency.
struct BaseAmounts {
    structure: f64,
    finishing: f64,
    electrical: f64,
    plumbing: f64,
    hvac: f64,
    permits: f64,
}

impl BaseAmounts {
    fn compute(
        unit: &BaseUnitCosts,
        building_area: f64,
        neighborhood: f64,
        complexity: f64,
        finishing_level: f64,
    ) -> Self {
        Self {
            structure: unit.structure * building_area * neighborhood,
            finishing: unit.finishing * building_area * neighborhood * complexity * finishing_level,
            electrical: unit.electrical * building_area * neighborhood,
            plumbing: unit.plumbing * building_area * neighborhood,
            hvac: unit.hvac * building_area * neighborhood,
            // Permit fees are not location-adjusted
            permits: unit.permits * building_area,
        }
    }
}

fn validate(input: &CostCalculationInput) -> Result<(), EstimateError> {
    if !input.land_area.is_finite() {
        return Err(EstimateError::InvalidInput(
            "landArea must be a finite number".to_string(),
        ));
    }
    if input.land_area <= 0.0 {
        return Err(EstimateError::InvalidInput(format!(
            "landArea must be greater than zero, got {}",
            input.land_area
        )));
    }
    if input.land_area > tables::MAX_LAND_AREA {
        return Err(EstimateError::InvalidInput(format!(
            "landArea must not exceed {} m², got {}",
            tables::MAX_LAND_AREA,
            input.land_area
        )));
    }
    Ok(())
}

/// Infer the quality tier from the property type and requested rooms.
pub fn quality_tier(
    property_type: &str,
    room_types: &[String],
    thresholds: &TierThresholds,
) -> QualityTier {
    let luxury_count = room_types
        .iter()
        .filter(|room| tables::is_luxury_indicator(room))
        .count();
    let room_count = room_types.len();

    if luxury_count >= thresholds.luxury_indicator_count
        || tables::is_penthouse(property_type)
        || room_count >= thresholds.luxury_room_count
    {
        QualityTier::Luxury
    } else if luxury_count >= thresholds.standard_indicator_count
        || room_count >= thresholds.standard_room_count
    {
        QualityTier::Standard
    } else {
        QualityTier::Basic
    }
}

/// Average room complexity, clamped. An empty list is priced as the
/// default bedroom and living room pair.
pub fn complexity_multiplier(room_types: &[String]) -> f64 {
    let factors: Vec<f64> = if room_types.is_empty() {
        tables::DEFAULT_ROOM_SET
            .iter()
            .map(|room| tables::room_complexity(room))
            .collect()
    } else {
        room_types
            .iter()
            .map(|room| tables::room_complexity(room))
            .collect()
    };

    let average = factors.iter().sum::<f64>() / factors.len() as f64;
    average.clamp(
        tables::MIN_COMPLEXITY_MULTIPLIER,
        tables::MAX_COMPLEXITY_MULTIPLIER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::FinishingLevel;

    fn rooms(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    fn villa_in_olaya() -> CostCalculationInput {
        CostCalculationInput::new(
            400.0,
            "فلة",
            rooms(&["مطبخ رئيسي", "صالة المعيشة"]),
            "العليا",
        )
        .with_finishing_level("متوسط")
    }

    #[test]
    fn villa_in_olaya_matches_hand_computed_figures() {
        let result = estimate(&villa_in_olaya()).unwrap();

        assert_eq!(result.project_details.building_area, 260.0);
        assert_eq!(result.project_details.complexity, QualityTier::Basic);
        assert_eq!(result.project_details.quality_level, "basic (residential)");
        assert_eq!(result.project_details.room_count, 2);

        // residential/basic row, 1.25 location premium, complexity (1.8 + 1.2) / 2
        assert_close(result.structural_cost, 308_750.0);
        assert_close(result.finishing_cost, 341_250.0);
        assert_close(result.electrical_cost, 58_500.0);
        assert_close(result.plumbing_cost, 45_500.0);
        assert_close(result.hvac_cost, 78_000.0);
        assert_close(result.permits_cost, 15_600.0);
        assert_close(result.landscaping_cost, 40_000.0);
        assert_close(result.cost_breakdown.labor, 249_600.0);
        assert_close(result.contingency_cost, 113_720.0);
        assert_close(result.total_cost, 1_250_920.0);
        assert_close(result.cost_per_square_meter, 1_250_920.0 / 260.0);
    }

    #[test]
    fn breakdown_reconciles_with_total() {
        let input = villa_in_olaya()
            .with_basement(true)
            .with_parking_spaces(3);
        let result = estimate(&input).unwrap();

        assert_close(result.cost_breakdown.total(), result.total_cost);
        assert_close(
            result.cost_breakdown.foundation
                + result.cost_breakdown.structure
                + result.cost_breakdown.roofing
                + result.cost_breakdown.basement,
            result.structural_cost,
        );
        assert_close(result.cost_breakdown.parking, 24_000.0);
    }

    #[test]
    fn rejects_non_positive_or_non_finite_land_area() {
        for land_area in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let mut input = villa_in_olaya();
            input.land_area = land_area;
            assert!(matches!(
                estimate(&input),
                Err(EstimateError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn tiny_parcel_reports_zero_cost_per_square_meter() {
        let mut input = villa_in_olaya();
        input.land_area = 1.0;
        let result = estimate(&input).unwrap();

        assert_eq!(result.project_details.building_area, 0.0);
        assert_eq!(result.cost_per_square_meter, 0.0);
        assert!(result.total_cost > 0.0);
    }

    #[test]
    fn land_area_is_capped() {
        let mut input = villa_in_olaya();

        input.land_area = tables::MAX_LAND_AREA;
        let largest = estimate(&input).unwrap();
        assert!(largest.total_cost.is_finite());
        assert!(largest.cost_per_square_meter.is_finite());

        for land_area in [tables::MAX_LAND_AREA + 1.0, 1e9, 1e306] {
            input.land_area = land_area;
            assert!(matches!(
                estimate(&input),
                Err(EstimateError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn overflowing_rates_are_rejected() {
        let estimator = CostEstimator::new(EstimatorConfig {
            labor_rate: f64::MAX,
            ..EstimatorConfig::default()
        });
        let mut input = villa_in_olaya();
        input.land_area = tables::MAX_LAND_AREA;

        assert!(matches!(
            estimator.estimate(&input),
            Err(EstimateError::InvalidInput(_))
        ));
    }

    #[test]
    fn quality_tier_thresholds() {
        let t = TierThresholds::default();

        assert_eq!(quality_tier("فلة", &[], &t), QualityTier::Basic);
        assert_eq!(
            quality_tier("فلة", &rooms(&["مجلس الرجال"]), &t),
            QualityTier::Standard
        );
        assert_eq!(
            quality_tier("فلة", &rooms(&["مجلس الرجال", "مجلس النساء", "فناء داخلي"]), &t),
            QualityTier::Luxury
        );
        assert_eq!(quality_tier("بنت هاوس", &[], &t), QualityTier::Luxury);

        let eight: Vec<String> = (0..8).map(|i| format!("غرفة {i}")).collect();
        let twelve: Vec<String> = (0..12).map(|i| format!("غرفة {i}")).collect();
        assert_eq!(quality_tier("فلة", &eight[..7], &t), QualityTier::Basic);
        assert_eq!(quality_tier("فلة", &eight, &t), QualityTier::Standard);
        assert_eq!(quality_tier("فلة", &twelve[..11], &t), QualityTier::Standard);
        assert_eq!(quality_tier("فلة", &twelve, &t), QualityTier::Luxury);
    }

    #[test]
    fn complexity_is_averaged_and_clamped() {
        assert_close(complexity_multiplier(&[]), 1.0);
        assert_close(complexity_multiplier(&rooms(&["مصاعد", "نظام مكافحة الحريق"])), 2.0);
        assert_close(complexity_multiplier(&rooms(&["مواقف السيارات", "حديقة خارجية"])), 0.8);
        assert_close(complexity_multiplier(&rooms(&["مطبخ رئيسي", "مخزن"])), 1.3);
    }

    #[test]
    fn empty_room_list_keeps_true_room_count() {
        let mut input = villa_in_olaya();
        input.room_types.clear();
        let empty = estimate(&input).unwrap();

        input.room_types = rooms(&tables::DEFAULT_ROOM_SET);
        let substituted = estimate(&input).unwrap();

        assert_eq!(empty.project_details.room_count, 0);
        assert_eq!(empty.finishing_cost, substituted.finishing_cost);
    }

    #[test]
    fn commercial_landscaping_uses_building_area() {
        let input = CostCalculationInput::new(1000.0, "مبنى مكتبي", vec![], "الملز");
        let result = estimate(&input).unwrap();

        assert_eq!(result.factors.category, PropertyCategory::Commercial);
        assert_eq!(result.project_details.building_area, 800.0);
        assert_close(result.landscaping_cost, 800.0 * 0.1 * 150.0);
        assert_eq!(result.project_details.quality_level, "basic (commercial)");
    }

    #[test]
    fn unknown_property_type_is_commercial_with_default_coverage() {
        let input = CostCalculationInput::new(1000.0, "residential_complex", vec![], "الوادي");
        let result = estimate(&input).unwrap();

        assert_eq!(result.factors.category, PropertyCategory::Commercial);
        assert_eq!(result.factors.coverage_ratio, 0.65);
        assert_eq!(result.project_details.building_area, 650.0);
    }

    #[test]
    fn finishing_level_only_scales_finishing() {
        let economy = estimate(&villa_in_olaya().with_finishing_level(FinishingLevel::Economy)).unwrap();
        let luxury = estimate(&villa_in_olaya().with_finishing_level(FinishingLevel::Luxury)).unwrap();
        let unknown = estimate(&villa_in_olaya().with_finishing_level("ممتاز جدا")).unwrap();
        let standard = estimate(&villa_in_olaya()).unwrap();

        assert_close(economy.finishing_cost, standard.finishing_cost * 0.8);
        assert_close(luxury.finishing_cost, standard.finishing_cost * 1.4);
        assert_eq!(unknown.finishing_cost, standard.finishing_cost);
        assert_eq!(economy.structural_cost, luxury.structural_cost);
    }

    #[test]
    fn configured_rates_replace_defaults() {
        let estimator = CostEstimator::new(EstimatorConfig {
            labor_rate: 0.0,
            contingency_rate: 0.0,
            ..EstimatorConfig::default()
        });
        let result = estimator.estimate(&villa_in_olaya()).unwrap();

        assert_eq!(result.cost_breakdown.labor, 0.0);
        assert_eq!(result.contingency_cost, 0.0);
        assert_close(result.total_cost, 832_000.0 + 40_000.0 + 15_600.0);
    }
}
