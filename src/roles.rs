//! Role identifiers for the planning crew.
//!
//! Roles are a closed set. Each role maps to exactly one research or
//! assembly responsibility, one task template, and an explicit list of
//! capability names it may use. Graph construction, scheduling, and report
//! aggregation all iterate roles in the canonical order defined here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a crew role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    /// Researches flights, trains, and local transit.
    TransportPlanner,
    /// Researches hotels and local stays.
    AccommodationFinder,
    /// Researches history, culture, and attractions.
    LocalGuide,
    /// Researches restaurants and food experiences.
    DiningExpert,
    /// Researches weather and packing guidance.
    WeatherAdvisor,
    /// Assembles the final report. Always force-included in a run.
    ReportCompiler,
    /// Scores the compiled report against a rubric.
    ReportEvaluator,
}

/// All roles in canonical execution order: research roles first, then the
/// compiler, then the evaluator.
pub const CANONICAL_ORDER: [RoleId; 7] = [
    RoleId::TransportPlanner,
    RoleId::AccommodationFinder,
    RoleId::LocalGuide,
    RoleId::DiningExpert,
    RoleId::WeatherAdvisor,
    RoleId::ReportCompiler,
    RoleId::ReportEvaluator,
];

/// Error returned when parsing an unknown role identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role identifier '{0}'")]
pub struct ParseRoleError(pub String);

impl RoleId {
    /// Stable snake_case identifier, used in config files, task ids, and
    /// section matching.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleId::TransportPlanner => "transport_planner",
            RoleId::AccommodationFinder => "accommodation_finder",
            RoleId::LocalGuide => "local_guide",
            RoleId::DiningExpert => "dining_expert",
            RoleId::WeatherAdvisor => "weather_advisor",
            RoleId::ReportCompiler => "report_compiler",
            RoleId::ReportEvaluator => "report_evaluator",
        }
    }

    /// Position in [`CANONICAL_ORDER`].
    pub fn canonical_index(&self) -> usize {
        CANONICAL_ORDER
            .iter()
            .position(|r| r == self)
            .unwrap_or(CANONICAL_ORDER.len())
    }

    /// Whether this role produces a research task (as opposed to assembling
    /// or evaluating the report).
    pub fn is_research(&self) -> bool {
        !matches!(self, RoleId::ReportCompiler | RoleId::ReportEvaluator)
    }

    /// Capability names this role may bind. Absent or unavailable providers
    /// are silently excluded at bind time.
    pub fn required_capabilities(&self) -> &'static [&'static str] {
        match self {
            RoleId::TransportPlanner => &[
                "flight_search",
                "public_transport",
                "city_code_lookup",
                "web_search",
            ],
            RoleId::AccommodationFinder => &["hotel_search", "poi_search", "web_search"],
            RoleId::LocalGuide => &[
                "historical_info",
                "cultural_customs",
                "fun_facts",
                "poi_search",
                "web_search",
            ],
            RoleId::DiningExpert => &[
                "restaurant_search",
                "culinary_experience",
                "food_specialties",
            ],
            RoleId::WeatherAdvisor => &[
                "weather_forecast",
                "clothing_recommendation",
                "web_search",
            ],
            RoleId::ReportCompiler => &[],
            RoleId::ReportEvaluator => &[],
        }
    }

    /// The evaluator reviews every specialist's ground truth and therefore
    /// binds all available capabilities instead of a fixed subset.
    pub fn binds_all_capabilities(&self) -> bool {
        matches!(self, RoleId::ReportEvaluator)
    }

    /// Default active set for a planning run: every role except the
    /// evaluator, which is opt-in.
    pub fn default_active() -> Vec<RoleId> {
        CANONICAL_ORDER
            .iter()
            .copied()
            .filter(|r| *r != RoleId::ReportEvaluator)
            .collect()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleId {
    type Err = ParseRoleError;

    /// Accepts the canonical identifier, a short alias, or the legacy
    /// identifiers older config files used for dining and weather.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transport_planner" | "transport" | "flight" => Ok(RoleId::TransportPlanner),
            "accommodation_finder" | "accommodation" | "hotel" => Ok(RoleId::AccommodationFinder),
            "local_guide" | "local" | "guide" => Ok(RoleId::LocalGuide),
            "dining_expert" | "yelp_dining_expert" | "dining" | "food" => Ok(RoleId::DiningExpert),
            "weather_advisor" | "packing_and_weather_advisor" | "weather" | "packing" => {
                Ok(RoleId::WeatherAdvisor)
            }
            "report_compiler" | "compiler" => Ok(RoleId::ReportCompiler),
            "report_evaluator" | "evaluator" => Ok(RoleId::ReportEvaluator),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_research_first() {
        let research: Vec<RoleId> = CANONICAL_ORDER
            .iter()
            .copied()
            .filter(RoleId::is_research)
            .collect();
        assert_eq!(research.len(), 5);
        assert_eq!(research[0], RoleId::TransportPlanner);
        assert_eq!(research[4], RoleId::WeatherAdvisor);
        assert_eq!(CANONICAL_ORDER[5], RoleId::ReportCompiler);
        assert_eq!(CANONICAL_ORDER[6], RoleId::ReportEvaluator);
    }

    #[test]
    fn test_canonical_index_matches_order() {
        for (i, role) in CANONICAL_ORDER.iter().enumerate() {
            assert_eq!(role.canonical_index(), i);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("transport".parse::<RoleId>().unwrap(), RoleId::TransportPlanner);
        assert_eq!("compiler".parse::<RoleId>().unwrap(), RoleId::ReportCompiler);
        assert_eq!(
            "yelp_dining_expert".parse::<RoleId>().unwrap(),
            RoleId::DiningExpert
        );
        assert_eq!(
            "packing_and_weather_advisor".parse::<RoleId>().unwrap(),
            RoleId::WeatherAdvisor
        );
        assert!("concierge".parse::<RoleId>().is_err());
    }

    #[test]
    fn test_default_active_excludes_evaluator() {
        let active = RoleId::default_active();
        assert_eq!(active.len(), 6);
        assert!(!active.contains(&RoleId::ReportEvaluator));
        assert!(active.contains(&RoleId::ReportCompiler));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&RoleId::DiningExpert).unwrap();
        assert_eq!(json, "\"dining_expert\"");
        let parsed: RoleId = serde_json::from_str("\"weather_advisor\"").unwrap();
        assert_eq!(parsed, RoleId::WeatherAdvisor);
    }

    #[test]
    fn test_capability_table() {
        assert!(RoleId::TransportPlanner
            .required_capabilities()
            .contains(&"flight_search"));
        assert!(RoleId::ReportCompiler.required_capabilities().is_empty());
        assert!(RoleId::ReportEvaluator.binds_all_capabilities());
    }
}
