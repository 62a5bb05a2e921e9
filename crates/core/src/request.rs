//! Prediction request types and domain validation.
//!
//! Payloads arrive as `Raw*` structs (deserialized, unchecked). Converting
//! them with `TryFrom` runs the `validator` range rules, a finiteness check on
//! every float, and the categorical lookups, then reports every violated field
//! at once. The validated types
//! have private fields and cannot be built any other way.

use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::types::InputSummary;

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

/// A closed set of labelled values accepted on a request.
pub trait Category: Sized + Copy + 'static {
    /// Every accepted value, in declaration order.
    const ALL: &'static [Self];

    /// The wire label for this value.
    fn label(self) -> &'static str;

    /// Look up a value by its exact wire label.
    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    /// Comma-separated list of accepted labels, for error messages.
    fn accepted_labels() -> String {
        Self::ALL
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Kind of day the request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayType {
    Weekday,
    Weekend,
    Holiday,
}

impl Category for DayType {
    const ALL: &'static [Self] = &[Self::Weekday, Self::Weekend, Self::Holiday];

    fn label(self) -> &'static str {
        match self {
            Self::Weekday => "Weekday",
            Self::Weekend => "Weekend",
            Self::Holiday => "Holiday",
        }
    }
}

impl DayType {
    /// Day type for a zero-based day of week (0 = Monday).
    pub fn from_day_of_week(day_of_week: u8) -> Self {
        if day_of_week < 5 {
            Self::Weekday
        } else {
            Self::Weekend
        }
    }
}

/// Observed weather at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Cloudy,
    Rainy,
    Fog,
    Snow,
}

impl Category for Weather {
    const ALL: &'static [Self] = &[Self::Clear, Self::Cloudy, Self::Rainy, Self::Fog, Self::Snow];

    fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
            Self::Fog => "Fog",
            Self::Snow => "Snow",
        }
    }
}

/// Administrative pickup area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationZone {
    Central,
    Suburb,
    #[serde(rename = "IT Park")]
    ItPark,
    Airport,
    Mall,
    University,
    Hospital,
    Stadium,
    Industrial,
    Residential,
}

impl Category for LocationZone {
    const ALL: &'static [Self] = &[
        Self::Central,
        Self::Suburb,
        Self::ItPark,
        Self::Airport,
        Self::Mall,
        Self::University,
        Self::Hospital,
        Self::Stadium,
        Self::Industrial,
        Self::Residential,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Central => "Central",
            Self::Suburb => "Suburb",
            Self::ItPark => "IT Park",
            Self::Airport => "Airport",
            Self::Mall => "Mall",
            Self::University => "University",
            Self::Hospital => "Hospital",
            Self::Stadium => "Stadium",
            Self::Industrial => "Industrial",
            Self::Residential => "Residential",
        }
    }
}

// ---------------------------------------------------------------------------
// Zone variant
// ---------------------------------------------------------------------------

/// Unchecked zone-variant payload as received from a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RawPredictionRequest {
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub month: i32,
    #[validate(range(min = 0, max = 23, message = "hour must be between 0 and 23"))]
    pub hour: i32,
    #[validate(range(
        min = -50.0,
        max = 60.0,
        message = "temperature must be between -50 and 60"
    ))]
    pub temperature: f64,
    pub day_type: String,
    pub weather_condition: String,
    pub location_zone: String,
}

/// A validated zone-variant prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    month: u8,
    hour: u8,
    temperature: f64,
    day_type: DayType,
    weather_condition: Weather,
    location_zone: LocationZone,
}

impl PredictionRequest {
    /// Build a request from typed values, enforcing the numeric ranges.
    pub fn new(
        month: i32,
        hour: i32,
        temperature: f64,
        day_type: DayType,
        weather_condition: Weather,
        location_zone: LocationZone,
    ) -> Result<Self, CoreError> {
        Self::try_from(RawPredictionRequest {
            month,
            hour,
            temperature,
            day_type: day_type.label().to_string(),
            weather_condition: weather_condition.label().to_string(),
            location_zone: location_zone.label().to_string(),
        })
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn day_type(&self) -> DayType {
        self.day_type
    }

    pub fn weather_condition(&self) -> Weather {
        self.weather_condition
    }

    pub fn location_zone(&self) -> LocationZone {
        self.location_zone
    }

    /// Human-readable echo of the submitted fields.
    pub fn input_summary(&self) -> InputSummary {
        let mut summary = InputSummary::new();
        summary.insert("Month".into(), json!(self.month));
        summary.insert("Hour".into(), json!(self.hour));
        summary.insert("Day Type".into(), json!(self.day_type.label()));
        summary.insert("Temperature (°C)".into(), json!(self.temperature));
        summary.insert(
            "Weather Condition".into(),
            json!(self.weather_condition.label()),
        );
        summary.insert("Location Zone".into(), json!(self.location_zone.label()));
        summary
    }
}

impl TryFrom<RawPredictionRequest> for PredictionRequest {
    type Error = CoreError;

    fn try_from(raw: RawPredictionRequest) -> Result<Self, Self::Error> {
        let mut problems = range_violations(raw.validate());
        require_finite(&[("temperature", raw.temperature)], &mut problems);
        let day_type = parse_category::<DayType>(&raw.day_type, "day_type", &mut problems);
        let weather = parse_category::<Weather>(
            &raw.weather_condition,
            "weather_condition",
            &mut problems,
        );
        let zone =
            parse_category::<LocationZone>(&raw.location_zone, "location_zone", &mut problems);

        match (day_type, weather, zone) {
            (Some(day_type), Some(weather_condition), Some(location_zone))
                if problems.is_empty() =>
            {
                Ok(Self {
                    month: raw.month as u8,
                    hour: raw.hour as u8,
                    temperature: raw.temperature,
                    day_type,
                    weather_condition,
                    location_zone,
                })
            }
            _ => Err(CoreError::Validation(problems.join("; "))),
        }
    }
}

// ---------------------------------------------------------------------------
// Geo variant
// ---------------------------------------------------------------------------

/// Unchecked geo-variant payload: coordinates and richer weather instead of
/// an administrative zone.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RawGeoPredictionRequest {
    #[validate(range(min = 1970, max = 2100, message = "year must be between 1970 and 2100"))]
    pub year: i32,
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub month: i32,
    #[validate(range(min = 0, max = 6, message = "day_of_week must be between 0 and 6"))]
    pub day_of_week: i32,
    #[validate(range(min = 0, max = 23, message = "hour must be between 0 and 23"))]
    pub hour: i32,
    #[validate(range(
        min = -50.0,
        max = 60.0,
        message = "temperature must be between -50 and 60"
    ))]
    pub temperature: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "humidity must be between 0 and 100"))]
    pub humidity: f64,
    #[validate(range(min = 0.0, max = 200.0, message = "wind_speed must be between 0 and 200"))]
    pub wind_speed: f64,
    pub weather_condition: String,
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    #[validate(range(
        min = 0.0,
        max = 1000.0,
        message = "distance_km must be between 0 and 1000"
    ))]
    pub distance_km: f64,
}

/// A validated geo-variant prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPredictionRequest {
    year: i32,
    month: u8,
    day_of_week: u8,
    hour: u8,
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    weather_condition: Weather,
    latitude: f64,
    longitude: f64,
    distance_km: f64,
}

impl GeoPredictionRequest {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    pub fn weather_condition(&self) -> Weather {
        self.weather_condition
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Weekday for Monday..Friday, Weekend otherwise.
    pub fn day_type(&self) -> DayType {
        DayType::from_day_of_week(self.day_of_week)
    }

    pub fn input_summary(&self) -> InputSummary {
        let mut summary = InputSummary::new();
        summary.insert("Year".into(), json!(self.year));
        summary.insert("Month".into(), json!(self.month));
        summary.insert("Day of Week".into(), json!(self.day_of_week));
        summary.insert("Hour".into(), json!(self.hour));
        summary.insert("Temperature (°C)".into(), json!(self.temperature));
        summary.insert("Humidity (%)".into(), json!(self.humidity));
        summary.insert("Wind Speed (km/h)".into(), json!(self.wind_speed));
        summary.insert(
            "Weather Condition".into(),
            json!(self.weather_condition.label()),
        );
        summary.insert("Latitude".into(), json!(self.latitude));
        summary.insert("Longitude".into(), json!(self.longitude));
        summary.insert("Distance (km)".into(), json!(self.distance_km));
        summary
    }
}

impl TryFrom<RawGeoPredictionRequest> for GeoPredictionRequest {
    type Error = CoreError;

    fn try_from(raw: RawGeoPredictionRequest) -> Result<Self, Self::Error> {
        let mut problems = range_violations(raw.validate());
        require_finite(
            &[
                ("temperature", raw.temperature),
                ("humidity", raw.humidity),
                ("wind_speed", raw.wind_speed),
                ("latitude", raw.latitude),
                ("longitude", raw.longitude),
                ("distance_km", raw.distance_km),
            ],
            &mut problems,
        );
        let weather = parse_category::<Weather>(
            &raw.weather_condition,
            "weather_condition",
            &mut problems,
        );

        match weather {
            Some(weather_condition) if problems.is_empty() => Ok(Self {
                year: raw.year,
                month: raw.month as u8,
                day_of_week: raw.day_of_week as u8,
                hour: raw.hour as u8,
                temperature: raw.temperature,
                humidity: raw.humidity,
                wind_speed: raw.wind_speed,
                weather_condition,
                latitude: raw.latitude,
                longitude: raw.longitude,
                distance_km: raw.distance_km,
            }),
            _ => Err(CoreError::Validation(problems.join("; "))),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Flatten `validator` output into sorted, field-level messages.
fn range_violations(result: Result<(), ValidationErrors>) -> Vec<String> {
    let Err(errors) = result else {
        return Vec::new();
    };

    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is out of range"),
            })
        })
        .collect();
    messages.sort();
    messages
}

/// `validator` range checks let NaN through, so reject it (and infinities)
/// explicitly.
fn require_finite(fields: &[(&str, f64)], problems: &mut Vec<String>) {
    for (field, value) in fields {
        if !value.is_finite() {
            problems.push(format!("{field} must be a finite number"));
        }
    }
}

fn parse_category<C: Category>(value: &str, field: &str, problems: &mut Vec<String>) -> Option<C> {
    let parsed = C::from_label(value);
    if parsed.is_none() {
        problems.push(format!(
            "{field} must be one of {}, got '{value}'",
            C::accepted_labels()
        ));
    }
    parsed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
