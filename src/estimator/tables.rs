//! Reference pricing data for the Saudi construction market (2025 figures).
//!
//! All tables are immutable and exposed through total lookup functions: a
//! key that is not in a table resolves to the documented default instead of
//! failing, because labels arrive as free-text Arabic from client forms.

use super::model::{PropertyCategory, QualityTier};

/// Multiplier applied when a neighborhood is not listed.
pub const DEFAULT_NEIGHBORHOOD_MULTIPLIER: f64 = 1.0;

/// Complexity factor applied when a room type is not listed.
pub const DEFAULT_ROOM_COMPLEXITY: f64 = 1.0;

/// Coverage ratio applied when a property type is not listed.
pub const DEFAULT_COVERAGE_RATIO: f64 = 0.65;

/// Largest parcel accepted, in m² (10 km²).
pub const MAX_LAND_AREA: f64 = 10_000_000.0;

/// Rooms substituted for an empty room list when averaging complexity.
pub const DEFAULT_ROOM_SET: [&str; 2] = ["غرفة نوم", "صالة"];

/// Averaged room complexity is clamped into this range.
pub const MIN_COMPLEXITY_MULTIPLIER: f64 = 0.8;
pub const MAX_COMPLEXITY_MULTIPLIER: f64 = 2.0;

/// SAR per m² of building area for a basement level.
pub const BASEMENT_COST_PER_SQM: f64 = 400.0;

/// SAR per parking space.
pub const PARKING_COST_PER_SPACE: f64 = 8000.0;

/// SAR per m² of land for residential landscaping.
pub const RESIDENTIAL_LANDSCAPING_PER_SQM: f64 = 80.0;

/// Commercial sites landscape this share of the building area.
pub const COMMERCIAL_LANDSCAPED_SHARE: f64 = 0.1;

/// SAR per landscaped m² on commercial sites.
pub const COMMERCIAL_LANDSCAPING_PER_SQM: f64 = 150.0;

// Structure split
pub const FOUNDATION_SHARE: f64 = 0.25;
pub const FRAME_SHARE: f64 = 0.60;
pub const ROOFING_SHARE: f64 = 0.15;

// Finishing split
pub const WALLS_SHARE: f64 = 0.40;
pub const FLOORING_SHARE: f64 = 0.35;
pub const FINISHES_SHARE: f64 = 0.25;

/// Per-m² unit costs (SAR) for one category and quality tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseUnitCosts {
    pub structure: f64,
    pub finishing: f64,
    pub electrical: f64,
    pub plumbing: f64,
    pub hvac: f64,
    pub permits: f64,
}

const RESIDENTIAL_BASIC: BaseUnitCosts = BaseUnitCosts {
    structure: 950.0,
    finishing: 700.0,
    electrical: 180.0,
    plumbing: 140.0,
    hvac: 240.0,
    permits: 60.0,
};

const RESIDENTIAL_STANDARD: BaseUnitCosts = BaseUnitCosts {
    structure: 1200.0,
    finishing: 950.0,
    electrical: 230.0,
    plumbing: 180.0,
    hvac: 300.0,
    permits: 70.0,
};

const RESIDENTIAL_LUXURY: BaseUnitCosts = BaseUnitCosts {
    structure: 1600.0,
    finishing: 1400.0,
    electrical: 350.0,
    plumbing: 250.0,
    hvac: 400.0,
    permits: 80.0,
};

const COMMERCIAL_BASIC: BaseUnitCosts = BaseUnitCosts {
    structure: 1400.0,
    finishing: 950.0,
    electrical: 300.0,
    plumbing: 220.0,
    hvac: 350.0,
    permits: 120.0,
};

const COMMERCIAL_STANDARD: BaseUnitCosts = BaseUnitCosts {
    structure: 1750.0,
    finishing: 1200.0,
    electrical: 400.0,
    plumbing: 270.0,
    hvac: 480.0,
    permits: 140.0,
};

const COMMERCIAL_LUXURY: BaseUnitCosts = BaseUnitCosts {
    structure: 2300.0,
    finishing: 1700.0,
    electrical: 600.0,
    plumbing: 350.0,
    hvac: 700.0,
    permits: 180.0,
};

/// Unit costs for a (category, tier) pair.
pub fn base_unit_costs(category: PropertyCategory, tier: QualityTier) -> BaseUnitCosts {
    match (category, tier) {
        (PropertyCategory::Residential, QualityTier::Basic) => RESIDENTIAL_BASIC,
        (PropertyCategory::Residential, QualityTier::Standard) => RESIDENTIAL_STANDARD,
        (PropertyCategory::Residential, QualityTier::Luxury) => RESIDENTIAL_LUXURY,
        (PropertyCategory::Commercial, QualityTier::Basic) => COMMERCIAL_BASIC,
        (PropertyCategory::Commercial, QualityTier::Standard) => COMMERCIAL_STANDARD,
        (PropertyCategory::Commercial, QualityTier::Luxury) => COMMERCIAL_LUXURY,
    }
}

// =============================================================================
// Property types
// =============================================================================

/// A known property type with its category and building coverage ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyTypeInfo {
    /// Arabic label as submitted by the client forms
    pub label: &'static str,
    /// ASCII alias accepted in API calls
    pub alias: &'static str,
    pub category: PropertyCategory,
    pub coverage_ratio: f64,
}

const fn residential(label: &'static str, alias: &'static str, ratio: f64) -> PropertyTypeInfo {
    PropertyTypeInfo {
        label,
        alias,
        category: PropertyCategory::Residential,
        coverage_ratio: ratio,
    }
}

const fn commercial(label: &'static str, alias: &'static str, ratio: f64) -> PropertyTypeInfo {
    PropertyTypeInfo {
        label,
        alias,
        category: PropertyCategory::Commercial,
        coverage_ratio: ratio,
    }
}

/// Label of the single most premium housing type, always priced as luxury.
pub const PENTHOUSE_LABEL: &str = "بنت هاوس";

pub static PROPERTY_TYPES: &[PropertyTypeInfo] = &[
    residential("فلة", "villa", 0.65),
    residential("عمارة سكنية", "residential_building", 0.75),
    residential("شقة", "apartment", 0.85),
    residential("مجمع سكني مغلق", "gated_compound", 0.60),
    residential("تاون هاوس", "townhouse", 0.70),
    residential(PENTHOUSE_LABEL, "penthouse", 0.80),
    residential("أدوار", "floors_unit", 0.70),
    residential("مزرعة", "farm", 0.40),
    residential("استراحة", "resthouse", 0.50),
    residential("شالية", "chalet", 0.55),
    commercial("أبراج", "towers", 0.80),
    commercial("مراكز تجارية", "shopping_center", 0.85),
    commercial("ستريب مول", "strip_mall", 0.90),
    commercial("مستشفيات", "hospital", 0.75),
    commercial("سكن عمال", "worker_housing", 0.80),
    commercial("مبنى مكتبي", "office_building", 0.80),
    commercial("مبنى درايف ثرو", "drive_thru", 0.70),
];

/// Find a property type by its Arabic label or ASCII alias.
pub fn property_type(label: &str) -> Option<&'static PropertyTypeInfo> {
    let label = label.trim();
    PROPERTY_TYPES
        .iter()
        .find(|info| info.label == label || info.alias.eq_ignore_ascii_case(label))
}

/// Unlisted property types are treated as commercial.
pub fn property_category(label: &str) -> PropertyCategory {
    property_type(label)
        .map(|info| info.category)
        .unwrap_or(PropertyCategory::Commercial)
}

pub fn coverage_ratio(label: &str) -> f64 {
    property_type(label)
        .map(|info| info.coverage_ratio)
        .unwrap_or(DEFAULT_COVERAGE_RATIO)
}

pub fn is_penthouse(label: &str) -> bool {
    property_type(label).is_some_and(|info| info.label == PENTHOUSE_LABEL)
}

// =============================================================================
// Neighborhoods
// =============================================================================

/// Location premium per Riyadh neighborhood.
pub static NEIGHBORHOOD_MULTIPLIERS: &[(&str, f64)] = &[
    // Premium
    ("العليا", 1.25),
    ("الملقا", 1.20),
    ("النرجس", 1.15),
    ("الياسمين", 1.15),
    ("قرطبة", 1.10),
    ("الصحافة", 1.10),
    ("الربوة", 1.08),
    // Standard
    ("الوادي", 1.00),
    ("المرقب", 1.00),
    ("الروضة", 0.95),
    ("الفيحاء", 0.95),
    ("الملز", 0.90),
    ("المنفوحة", 0.85),
    ("الدرعية", 0.90),
];

/// Exact-match lookup; unlisted neighborhoods are neutral.
pub fn neighborhood_multiplier(neighborhood: &str) -> f64 {
    NEIGHBORHOOD_MULTIPLIERS
        .iter()
        .find(|(name, _)| *name == neighborhood)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(DEFAULT_NEIGHBORHOOD_MULTIPLIER)
}

// =============================================================================
// Rooms
// =============================================================================

/// Relative finishing intensity per named space.
pub static ROOM_COMPLEXITY: &[(&str, f64)] = &[
    // Basic rooms
    ("غرف نوم الأطفال", 1.0),
    ("غرفة الضيوف", 1.0),
    ("مخزن", 0.8),
    ("مدخل رئيسي", 0.9),
    // Standard
    ("صالة المعيشة", 1.2),
    ("غرفة نوم رئيسية", 1.3),
    ("غرفة الطعام", 1.1),
    ("مكتب منزلي", 1.1),
    // High complexity
    ("مطبخ رئيسي", 1.8),
    ("حمام رئيسي", 1.6),
    ("حمامات إضافية", 1.4),
    ("مجلس الرجال", 1.4),
    ("مجلس النساء", 1.4),
    // Utility and outdoor
    ("غرفة الخادمة", 1.1),
    ("غرفة الغسيل", 1.3),
    ("فناء داخلي", 0.7),
    ("حديقة خارجية", 0.6),
    ("مواقف السيارات", 0.5),
    ("ملحق خارجي", 0.8),
    ("درج داخلي", 1.2),
    // Commercial spaces
    ("منطقة الاستقبال", 1.5),
    ("صالات العرض", 1.3),
    ("مكاتب إدارية", 1.2),
    ("قاعات الاجتماعات", 1.4),
    ("منطقة الخدمات", 1.1),
    ("حمامات عامة", 1.6),
    ("حمامات ذوي الاحتياجات الخاصة", 1.8),
    ("مخارج الطوارئ", 1.0),
    ("غرف التكييف", 2.0),
    ("غرفة الكهرباء", 2.2),
    ("منطقة التحميل", 0.8),
    ("أنظمة الإنذار", 1.5),
    ("كاميرات المراقبة", 1.3),
    ("نظام مكافحة الحريق", 2.5),
    ("مصاعد", 3.0),
    ("سلالم الطوارئ", 1.2),
    ("منطقة الأمن", 1.4),
    ("مطعم/كافيتيريا", 1.8),
    ("مسجد/مصلى", 1.3),
];

/// Rooms whose presence pushes a project toward a higher quality tier.
pub static LUXURY_INDICATORS: &[&str] = &[
    "مجلس الرجال",
    "مجلس النساء",
    "فناء داخلي",
    "حديقة خارجية",
    "غرفة الخادمة",
    "ملحق خارجي",
    "مطعم/كافيتيريا",
    "مسجد/مصلى",
];

pub fn room_complexity(room: &str) -> f64 {
    ROOM_COMPLEXITY
        .iter()
        .find(|(name, _)| *name == room)
        .map(|(_, factor)| *factor)
        .unwrap_or(DEFAULT_ROOM_COMPLEXITY)
}

pub fn is_luxury_indicator(room: &str) -> bool {
    LUXURY_INDICATORS.contains(&room)
}
