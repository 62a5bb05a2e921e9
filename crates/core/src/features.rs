//! Feature encoding for the demand regressors.
//!
//! Each request variant maps to a fixed [`FeatureLayout`]. The column order
//! is the order the regressor was fit with and must never change without
//! re-exporting the model artifact.

use serde::Serialize;

use crate::history::HistoryStore;
use crate::request::{Category, DayType, GeoPredictionRequest, PredictionRequest};

// ---------------------------------------------------------------------------
// Layouts
// ---------------------------------------------------------------------------

/// Column names for the zone-variant regressor.
pub const ZONE_FEATURES: &[&str] = &[
    "month",
    "hour",
    "day_type",
    "weather_condition",
    "temperature",
    "location_zone",
    "lag_1",
    "lag_24",
];

/// Column names for the geo-variant regressor.
pub const GEO_FEATURES: &[&str] = &[
    "year",
    "month",
    "day_of_week",
    "hour",
    "temperature",
    "humidity",
    "wind_speed",
    "weather_encoded",
    "latitude",
    "longitude",
    "distance_km",
];

/// Which regressor a feature vector is shaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    Zone,
    Geo,
}

impl FeatureLayout {
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::Zone => ZONE_FEATURES,
            Self::Geo => GEO_FEATURES,
        }
    }

    /// Number of columns in this layout.
    pub fn width(self) -> usize {
        self.names().len()
    }
}

// ---------------------------------------------------------------------------
// Encoding tables
// ---------------------------------------------------------------------------

/// Weather label to ordinal. Fog shares Cloudy's code, Snow shares Rainy's.
pub const WEATHER_CODES: &[(&str, u8)] = &[
    ("Clear", 0),
    ("Cloudy", 1),
    ("Rainy", 2),
    ("Fog", 1),
    ("Snow", 2),
];

/// Location zone label to ordinal, as used when the model was fit.
pub const ZONE_CODES: &[(&str, u8)] = &[
    ("Central", 0),
    ("Suburb", 1),
    ("IT Park", 2),
    ("Airport", 3),
    ("Mall", 4),
    ("University", 5),
    ("Hospital", 6),
    ("Stadium", 7),
    ("Industrial", 8),
    ("Residential", 9),
];

/// Look up a label in an encoding table. Unknown labels encode as 0.
pub fn lookup_code(table: &[(&str, u8)], label: &str) -> u8 {
    table
        .iter()
        .find(|(name, _)| *name == label)
        .map_or(0, |(_, code)| *code)
}

/// Weekday encodes as 0; Weekend and Holiday both encode as 1.
pub fn encode_day_type(day_type: DayType) -> u8 {
    match day_type {
        DayType::Weekday => 0,
        DayType::Weekend | DayType::Holiday => 1,
    }
}

// ---------------------------------------------------------------------------
// Feature vector
// ---------------------------------------------------------------------------

/// An ordered numeric row ready for a regressor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    layout: FeatureLayout,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column, if the layout has it.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.layout
            .names()
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i])
    }
}

/// Encode a zone-variant request, resolving `lag_1` and `lag_24` from history.
pub fn encode(request: &PredictionRequest, history: &HistoryStore) -> FeatureVector {
    let values = vec![
        f64::from(request.month()),
        f64::from(request.hour()),
        f64::from(encode_day_type(request.day_type())),
        f64::from(lookup_code(WEATHER_CODES, request.weather_condition().label())),
        request.temperature(),
        f64::from(lookup_code(ZONE_CODES, request.location_zone().label())),
        history.lag(1),
        history.lag(24),
    ];
    FeatureVector {
        layout: FeatureLayout::Zone,
        values,
    }
}

/// Encode a geo-variant request. This layout carries no lag features.
pub fn encode_geo(request: &GeoPredictionRequest) -> FeatureVector {
    let values = vec![
        f64::from(request.year()),
        f64::from(request.month()),
        f64::from(request.day_of_week()),
        f64::from(request.hour()),
        request.temperature(),
        request.humidity(),
        request.wind_speed(),
        f64::from(lookup_code(WEATHER_CODES, request.weather_condition().label())),
        request.latitude(),
        request.longitude(),
        request.distance_km(),
    ];
    FeatureVector {
        layout: FeatureLayout::Geo,
        values,
    }
}
