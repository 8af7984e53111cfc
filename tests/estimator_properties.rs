use aqar_backend::domain::money;
use aqar_backend::estimator::{estimate, tables, CostCalculationInput, CostEstimateResult};
use proptest::prelude::*;

const UNKNOWN_NEIGHBORHOOD: &str = "حي غير مدرج";

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

fn property_type() -> impl Strategy<Value = String> {
    let mut labels: Vec<String> = tables::PROPERTY_TYPES
        .iter()
        .map(|info| info.label.to_string())
        .collect();
    labels.push("مستودع".to_string());
    prop::sample::select(labels)
}

fn room_types() -> impl Strategy<Value = Vec<String>> {
    let names: Vec<String> = tables::ROOM_COMPLEXITY
        .iter()
        .map(|(name, _)| name.to_string())
        .chain(std::iter::once("غرفة غير معروفة".to_string()))
        .collect();
    prop::collection::vec(prop::sample::select(names), 0..14)
}

fn neighborhood() -> impl Strategy<Value = String> {
    let names: Vec<String> = tables::NEIGHBORHOOD_MULTIPLIERS
        .iter()
        .map(|(name, _)| name.to_string())
        .chain(std::iter::once(UNKNOWN_NEIGHBORHOOD.to_string()))
        .collect();
    prop::sample::select(names)
}

fn premium_neighborhood() -> impl Strategy<Value = String> {
    let names: Vec<String> = tables::NEIGHBORHOOD_MULTIPLIERS
        .iter()
        .filter(|(_, multiplier)| *multiplier > 1.0)
        .map(|(name, _)| name.to_string())
        .collect();
    prop::sample::select(names)
}

fn finishing_level() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "economy".to_string(),
        "standard".to_string(),
        "luxury".to_string(),
        "فاخر".to_string(),
        "ممتاز جدا".to_string(),
    ])
}

prop_compose! {
    fn any_input()(
        land_area in 10.0f64..50_000.0,
        property_type in property_type(),
        room_types in room_types(),
        neighborhood in neighborhood(),
        finishing_level in finishing_level(),
        has_basement in any::<bool>(),
        parking_spaces in 0u32..40,
    ) -> CostCalculationInput {
        CostCalculationInput::new(land_area, property_type, room_types, neighborhood)
            .with_finishing_level(finishing_level)
            .with_basement(has_basement)
            .with_parking_spaces(parking_spaces)
    }
}

fn run(input: &CostCalculationInput) -> CostEstimateResult {
    estimate(input).unwrap()
}

proptest! {
    #[test]
    fn amounts_stay_finite_up_to_max_land_area(
        input in any_input(),
        land_area in 1.0f64..=tables::MAX_LAND_AREA,
    ) {
        let mut input = input;
        input.land_area = land_area;
        let r = run(&input);

        prop_assert!(r.total_cost.is_finite());
        prop_assert!(r.cost_per_square_meter.is_finite());
        prop_assert!(money(r.total_cost).is_ok());
    }

    #[test]
    fn land_area_above_max_is_rejected(
        input in any_input(),
        excess in 1.0f64..1e300,
    ) {
        let mut input = input;
        input.land_area = tables::MAX_LAND_AREA + excess;
        prop_assert!(estimate(&input).is_err());
    }

    #[test]
    fn total_reconciles_with_components(input in any_input()) {
        let r = run(&input);
        let b = &r.cost_breakdown;

        let materials = r.structural_cost + r.finishing_cost + r.electrical_cost
            + r.plumbing_cost + r.hvac_cost;
        let subtotal = materials + r.landscaping_cost + r.permits_cost + b.labor + b.parking;

        prop_assert!(close(b.labor, materials * 0.30));
        prop_assert!(close(r.contingency_cost, subtotal * 0.10));
        prop_assert!(close(r.total_cost, subtotal + r.contingency_cost));
    }

    #[test]
    fn breakdown_sums_to_total(input in any_input()) {
        let r = run(&input);
        prop_assert!(close(r.cost_breakdown.total(), r.total_cost),
            "breakdown {} vs total {}", r.cost_breakdown.total(), r.total_cost);
    }

    #[test]
    fn all_amounts_are_non_negative(input in any_input()) {
        let r = run(&input);
        for amount in [
            r.structural_cost, r.finishing_cost, r.electrical_cost, r.plumbing_cost,
            r.hvac_cost, r.landscaping_cost, r.permits_cost, r.contingency_cost,
            r.total_cost, r.cost_per_square_meter,
        ] {
            prop_assert!(amount.is_finite() && amount >= 0.0);
        }
    }

    #[test]
    fn total_is_monotone_in_land_area(input in any_input(), extra in 0.0f64..10_000.0) {
        let smaller = run(&input);
        let mut larger_input = input.clone();
        larger_input.land_area += extra;
        let larger = run(&larger_input);

        prop_assert!(larger.total_cost >= smaller.total_cost);
    }

    #[test]
    fn premium_neighborhood_raises_structural_cost(
        input in any_input(),
        premium in premium_neighborhood(),
    ) {
        let mut plain = input.clone();
        plain.neighborhood = UNKNOWN_NEIGHBORHOOD.to_string();
        let mut located = input;
        located.neighborhood = premium;

        let plain = run(&plain);
        let located = run(&located);

        prop_assert_eq!(plain.factors.neighborhood_multiplier, 1.0);
        prop_assert!(located.structural_cost > plain.structural_cost);
    }

    #[test]
    fn estimation_is_idempotent(input in any_input()) {
        prop_assert_eq!(run(&input), run(&input));
    }

    #[test]
    fn basement_adds_area_priced_amount(input in any_input()) {
        let without = run(&input.clone().with_basement(false));
        let with = run(&input.with_basement(true));

        let expected = with.project_details.building_area
            * tables::BASEMENT_COST_PER_SQM
            * with.factors.neighborhood_multiplier;
        prop_assert!(close(with.structural_cost - without.structural_cost, expected));
        prop_assert!(close(with.cost_breakdown.basement, expected));
    }

    #[test]
    fn empty_rooms_price_like_default_set(input in any_input()) {
        let mut empty = input.clone();
        empty.room_types = Vec::new();
        let mut defaults = input;
        defaults.room_types = tables::DEFAULT_ROOM_SET.iter().map(|r| r.to_string()).collect();

        let empty = run(&empty);
        let defaults = run(&defaults);

        prop_assert!(close(empty.finishing_cost, defaults.finishing_cost));
        prop_assert_eq!(empty.project_details.room_count, 0);
    }
}
