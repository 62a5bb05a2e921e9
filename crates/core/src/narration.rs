//! Rule-based, human-readable demand analysis.
//!
//! [`RULES`] is evaluated in full and in declaration order: every matching
//! rule contributes its sentence, not just the first one.

use crate::request::{
    Category, DayType, GeoPredictionRequest, LocationZone, PredictionRequest, Weather,
};
use crate::zoning::ZoneLabel;

/// Sentence used when no rule matches.
pub const DEFAULT_MESSAGE: &str =
    "Demand is shaped by the interplay of time, weather, and zone activity.";

/// The facts rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrationContext {
    pub hour: u8,
    pub day_type: DayType,
    pub weather: Weather,
    /// Administrative zone, when the request carried one.
    pub location_zone: Option<LocationZone>,
    /// Name of the area quoted in the closing sentence.
    pub area: &'static str,
}

impl From<&PredictionRequest> for NarrationContext {
    fn from(req: &PredictionRequest) -> Self {
        Self {
            hour: req.hour(),
            day_type: req.day_type(),
            weather: req.weather_condition(),
            location_zone: Some(req.location_zone()),
            area: req.location_zone().label(),
        }
    }
}

impl NarrationContext {
    /// Context for a geo request, quoting the classified zone as the area.
    pub fn for_geo(req: &GeoPredictionRequest, zone: ZoneLabel) -> Self {
        Self {
            hour: req.hour(),
            day_type: req.day_type(),
            weather: req.weather_condition(),
            location_zone: None,
            area: zone.label(),
        }
    }

    fn in_zone(&self, zone: LocationZone) -> bool {
        self.location_zone == Some(zone)
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// A predicate paired with the sentence it contributes.
pub struct NarrationRule {
    pub name: &'static str,
    pub applies: fn(&NarrationContext) -> bool,
    pub message: &'static str,
}

fn it_park_weekend(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::ItPark) && c.day_type == DayType::Weekend
}

fn it_park_weekday(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::ItPark) && c.day_type != DayType::Weekend
}

fn airport_morning(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::Airport) && (5..=10).contains(&c.hour)
}

fn airport_evening(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::Airport) && (18..=22).contains(&c.hour)
}

fn airport_steady(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::Airport) && !airport_morning(c) && !airport_evening(c)
}

fn central_business_hours(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::Central) && (8..=20).contains(&c.hour)
}

fn central_late_night(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::Central) && !central_business_hours(c)
}

fn rainy(c: &NarrationContext) -> bool {
    c.weather == Weather::Rainy
}

fn rush_hour(c: &NarrationContext) -> bool {
    (8..=10).contains(&c.hour) || (17..=20).contains(&c.hour)
}

fn suburb_weekend(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::Suburb) && c.day_type == DayType::Weekend
}

fn mall_weekend(c: &NarrationContext) -> bool {
    c.in_zone(LocationZone::Mall) && c.day_type == DayType::Weekend
}

pub const RULES: &[NarrationRule] = &[
    NarrationRule {
        name: "it_park_weekend",
        applies: it_park_weekend,
        message: "Leisure and late-evening trips increase demand variability in IT Park on weekends.",
    },
    NarrationRule {
        name: "it_park_weekday",
        applies: it_park_weekday,
        message: "Office commute significantly drives demand peaks in IT Park on weekdays.",
    },
    NarrationRule {
        name: "airport_morning",
        applies: airport_morning,
        message: "Morning flight schedules boost early demand at the Airport.",
    },
    NarrationRule {
        name: "airport_evening",
        applies: airport_evening,
        message: "Evening arrivals and departures create high demand at the Airport.",
    },
    NarrationRule {
        name: "airport_steady",
        applies: airport_steady,
        message: "Airport demand is steady due to continuous flight operations.",
    },
    NarrationRule {
        name: "central_business_hours",
        applies: central_business_hours,
        message: "Central zone sees high activity during business and shopping hours.",
    },
    NarrationRule {
        name: "central_late_night",
        applies: central_late_night,
        message: "Late-night demand in Central is driven by nightlife and events.",
    },
    NarrationRule {
        name: "rainy",
        applies: rainy,
        message: "Rainy weather typically increases ride demand as people avoid walking or biking.",
    },
    NarrationRule {
        name: "rush_hour",
        applies: rush_hour,
        message: "This is a rush hour period, so demand is expected to spike.",
    },
    NarrationRule {
        name: "suburb_weekend",
        applies: suburb_weekend,
        message: "Suburban leisure trips and family outings can increase weekend demand.",
    },
    NarrationRule {
        name: "mall_weekend",
        applies: mall_weekend,
        message: "Weekend shopping and entertainment drive up demand near malls.",
    },
];

/// Names of the rules matching `ctx`, in declaration order.
pub fn matching_rules(ctx: &NarrationContext) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|r| (r.applies)(ctx))
        .map(|r| r.name)
        .collect()
}

/// Build the analysis text for an estimate.
pub fn narrate(ctx: &NarrationContext, estimate: f64) -> String {
    let mut sentences: Vec<&str> = RULES
        .iter()
        .filter(|r| (r.applies)(ctx))
        .map(|r| r.message)
        .collect();
    if sentences.is_empty() {
        sentences.push(DEFAULT_MESSAGE);
    }

    format!(
        "{} This area ({}) currently shows demand of {}.",
        sentences.join(" "),
        ctx.area,
        format_demand(estimate)
    )
}

/// Whole numbers keep one decimal place (`42.0`), others print as-is.
fn format_demand(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(hour: u8, day_type: DayType, weather: Weather, zone: LocationZone) -> NarrationContext {
        let req = PredictionRequest::new(6, i32::from(hour), 20.0, day_type, weather, zone).unwrap();
        NarrationContext::from(&req)
    }

    // -- rule ordering --

    #[test]
    fn it_park_rainy_rush_hour_concatenates_in_order() {
        let c = ctx(9, DayType::Weekday, Weather::Rainy, LocationZone::ItPark);
        assert_eq!(matching_rules(&c), ["it_park_weekday", "rainy", "rush_hour"]);

        let text = narrate(&c, 41.24);
        assert_eq!(
            text,
            "Office commute significantly drives demand peaks in IT Park on weekdays. \
             Rainy weather typically increases ride demand as people avoid walking or biking. \
             This is a rush hour period, so demand is expected to spike. \
             This area (IT Park) currently shows demand of 41.24."
        );
    }

    #[test]
    fn default_sentence_when_nothing_matches() {
        let c = ctx(14, DayType::Weekday, Weather::Clear, LocationZone::Hospital);
        assert!(matching_rules(&c).is_empty());
        assert_eq!(
            narrate(&c, 12.0),
            format!("{DEFAULT_MESSAGE} This area (Hospital) currently shows demand of 12.0.")
        );
    }

    // -- zone rules --

    #[test]
    fn holiday_in_it_park_uses_weekday_sentence() {
        let c = ctx(14, DayType::Holiday, Weather::Clear, LocationZone::ItPark);
        assert_eq!(matching_rules(&c), ["it_park_weekday"]);
    }

    #[test]
    fn airport_time_windows() {
        let rules = |h| matching_rules(&ctx(h, DayType::Weekday, Weather::Clear, LocationZone::Airport));
        assert_eq!(rules(5), ["airport_morning"]);
        assert_eq!(rules(10), ["airport_morning", "rush_hour"]);
        assert_eq!(rules(11), ["airport_steady"]);
        assert_eq!(rules(18), ["airport_evening", "rush_hour"]);
        assert_eq!(rules(22), ["airport_evening"]);
        assert_eq!(rules(23), ["airport_steady"]);
        assert_eq!(rules(4), ["airport_steady"]);
    }

    #[test]
    fn central_business_and_late_night() {
        let rules = |h| matching_rules(&ctx(h, DayType::Weekday, Weather::Clear, LocationZone::Central));
        assert_eq!(rules(8), ["central_business_hours", "rush_hour"]);
        assert_eq!(rules(20), ["central_business_hours", "rush_hour"]);
        assert_eq!(rules(21), ["central_late_night"]);
        assert_eq!(rules(2), ["central_late_night"]);
    }

    #[test]
    fn weekend_only_rules_ignore_holidays() {
        let suburb = ctx(13, DayType::Weekend, Weather::Clear, LocationZone::Suburb);
        assert_eq!(matching_rules(&suburb), ["suburb_weekend"]);
        let mall = ctx(13, DayType::Weekend, Weather::Clear, LocationZone::Mall);
        assert_eq!(matching_rules(&mall), ["mall_weekend"]);
        let mall_holiday = ctx(13, DayType::Holiday, Weather::Clear, LocationZone::Mall);
        assert!(matching_rules(&mall_holiday).is_empty());
    }

    #[test]
    fn rush_hour_boundaries() {
        let rules = |h| matching_rules(&ctx(h, DayType::Weekday, Weather::Cloudy, LocationZone::Stadium));
        assert!(rules(7).is_empty());
        assert_eq!(rules(8), ["rush_hour"]);
        assert!(rules(11).is_empty());
        assert!(rules(16).is_empty());
        assert_eq!(rules(17), ["rush_hour"]);
        assert_eq!(rules(20), ["rush_hour"]);
        assert!(rules(21).is_empty());
    }

    // -- geo context --

    #[test]
    fn geo_context_skips_zone_rules_and_quotes_label() {
        let req = GeoPredictionRequest::try_from(crate::request::RawGeoPredictionRequest {
            year: 2024,
            month: 7,
            day_of_week: 6,
            hour: 9,
            temperature: 30.0,
            humidity: 40.0,
            wind_speed: 5.0,
            weather_condition: "Rainy".into(),
            latitude: 12.9,
            longitude: 77.6,
            distance_km: 2.0,
        })
        .unwrap();
        let c = NarrationContext::for_geo(&req, ZoneLabel::High);
        assert_eq!(c.day_type, DayType::Weekend);
        assert_eq!(matching_rules(&c), ["rainy", "rush_hour"]);
        assert!(narrate(&c, 55.5).ends_with("This area (High Demand Zone) currently shows demand of 55.5."));
    }

    // -- determinism / formatting --

    #[test]
    fn identical_inputs_give_identical_text() {
        let c = ctx(19, DayType::Weekend, Weather::Rainy, LocationZone::Mall);
        assert_eq!(narrate(&c, 33.33), narrate(&c, 33.33));
    }

    #[test]
    fn demand_formatting_matches_display_convention() {
        assert_eq!(format_demand(42.0), "42.0");
        assert_eq!(format_demand(42.5), "42.5");
        assert_eq!(format_demand(0.07), "0.07");
        assert_eq!(format_demand(-3.0), "-3.0");
    }
}
