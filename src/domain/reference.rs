//! Read-only views of the estimator's reference tables.

use serde::Serialize;

use crate::estimator::tables;
use crate::estimator::PropertyCategory;

#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodEntry {
    pub name: &'static str,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeEntry {
    pub name: &'static str,
    pub complexity: f64,
    pub luxury_indicator: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTypeEntry {
    pub label: &'static str,
    pub alias: &'static str,
    pub category: PropertyCategory,
    pub coverage_ratio: f64,
}

pub fn neighborhoods() -> Vec<NeighborhoodEntry> {
    tables::NEIGHBORHOOD_MULTIPLIERS
        .iter()
        .map(|&(name, multiplier)| NeighborhoodEntry { name, multiplier })
        .collect()
}

pub fn room_types() -> Vec<RoomTypeEntry> {
    tables::ROOM_COMPLEXITY
        .iter()
        .map(|&(name, complexity)| RoomTypeEntry {
            name,
            complexity,
            luxury_indicator: tables::is_luxury_indicator(name),
        })
        .collect()
}

pub fn property_types() -> Vec<PropertyTypeEntry> {
    tables::PROPERTY_TYPES
        .iter()
        .map(|info| PropertyTypeEntry {
            label: info.label,
            alias: info.alias,
            category: info.category,
            coverage_ratio: info.coverage_ratio,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_cover_the_tables() {
        assert_eq!(neighborhoods().len(), tables::NEIGHBORHOOD_MULTIPLIERS.len());
        assert_eq!(property_types().len(), tables::PROPERTY_TYPES.len());

        let rooms = room_types();
        let majlis = rooms.iter().find(|r| r.name == "مجلس الرجال").unwrap();
        assert!(majlis.luxury_indicator);
        assert!(rooms.iter().any(|r| !r.luxury_indicator));
    }
}
