//! Trip request input model.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roles::RoleId;

/// Budget tier for the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Budget {
    Budget,
    Moderate,
    Luxury,
}

impl Budget {
    /// Price-tier string understood by restaurant-search providers
    /// ("1" cheapest through "4" most expensive).
    pub fn price_tier(&self) -> &'static str {
        match self {
            Budget::Budget => "1,2",
            Budget::Moderate => "2,3",
            Budget::Luxury => "3,4",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Budget => "Budget",
            Budget::Moderate => "Moderate",
            Budget::Luxury => "Luxury",
        }
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::Moderate
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown budget label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown budget '{0}' (expected Budget, Moderate, or Luxury)")]
pub struct ParseBudgetError(pub String);

impl FromStr for Budget {
    type Err = ParseBudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" | "low" => Ok(Budget::Budget),
            "moderate" | "mid" | "medium" => Ok(Budget::Moderate),
            "luxury" | "high" => Ok(Budget::Luxury),
            other => Err(ParseBudgetError(other.to_string())),
        }
    }
}

/// Validation errors for a trip request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripError {
    #[error("end date {end} must be after start date {start}")]
    DateOrder { start: NaiveDate, end: NaiveDate },

    #[error("travelers must be a positive number")]
    NoTravelers,

    #[error("required trip field '{0}' is empty")]
    MissingField(&'static str),
}

/// Immutable input describing one planning run.
///
/// Created once per run, validated up front, then shared read-only. Role
/// templates pull their `{placeholder}` values from [`TripRequest::params`]
/// at dispatch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub starting_point: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Budget,
    pub travelers: u32,
    pub interests: Vec<String>,
    pub accommodation_preference: String,
    pub travel_style: String,
    pub special_requests: String,
    /// Requested roles. The compiler is force-included whatever this holds;
    /// see [`TripRequest::effective_roles`].
    pub active_roles: Vec<RoleId>,
}

impl TripRequest {
    pub fn new(
        starting_point: impl Into<String>,
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            starting_point: starting_point.into(),
            destination: destination.into(),
            start_date,
            end_date,
            budget: Budget::default(),
            travelers: 1,
            interests: Vec::new(),
            accommodation_preference: "Hotel".to_string(),
            travel_style: "Balanced".to_string(),
            special_requests: String::new(),
            active_roles: RoleId::default_active(),
        }
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_travelers(mut self, travelers: u32) -> Self {
        self.travelers = travelers;
        self
    }

    pub fn with_interests(mut self, interests: Vec<String>) -> Self {
        self.interests = interests;
        self
    }

    pub fn with_accommodation_preference(mut self, preference: impl Into<String>) -> Self {
        self.accommodation_preference = preference.into();
        self
    }

    pub fn with_travel_style(mut self, style: impl Into<String>) -> Self {
        self.travel_style = style.into();
        self
    }

    pub fn with_special_requests(mut self, requests: impl Into<String>) -> Self {
        self.special_requests = requests.into();
        self
    }

    pub fn with_active_roles(mut self, roles: Vec<RoleId>) -> Self {
        self.active_roles = roles;
        self
    }

    /// Validate the request before a run.
    pub fn validate(&self) -> Result<(), TripError> {
        if self.starting_point.trim().is_empty() {
            return Err(TripError::MissingField("starting_point"));
        }
        if self.destination.trim().is_empty() {
            return Err(TripError::MissingField("destination"));
        }
        if self.end_date <= self.start_date {
            return Err(TripError::DateOrder {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.travelers == 0 {
            return Err(TripError::NoTravelers);
        }
        Ok(())
    }

    /// Active roles with duplicates removed (first occurrence wins) and the
    /// compiler force-included.
    pub fn effective_roles(&self) -> Vec<RoleId> {
        let mut roles: Vec<RoleId> = Vec::new();
        for role in &self.active_roles {
            if !roles.contains(role) {
                roles.push(*role);
            }
        }
        if !roles.contains(&RoleId::ReportCompiler) {
            roles.push(RoleId::ReportCompiler);
        }
        roles
    }

    /// Placeholder values for template interpolation at dispatch time.
    pub fn params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert("starting_point".to_string(), self.starting_point.clone());
        params.insert("destination".to_string(), self.destination.clone());
        params.insert(
            "start_date".to_string(),
            self.start_date.format("%Y-%m-%d").to_string(),
        );
        params.insert(
            "end_date".to_string(),
            self.end_date.format("%Y-%m-%d").to_string(),
        );
        params.insert("budget".to_string(), self.budget.to_string());
        params.insert("travelers".to_string(), self.travelers.to_string());
        params.insert("interests".to_string(), self.interests.join(", "));
        params.insert(
            "accommodation".to_string(),
            self.accommodation_preference.clone(),
        );
        params.insert("travel_style".to_string(), self.travel_style.clone());
        params.insert(
            "special_requests".to_string(),
            self.special_requests.clone(),
        );
        params.insert("price_tier".to_string(), self.budget.price_tier().to_string());
        params
    }

    /// Keyword parameters handed to capability providers bound to `role`.
    pub fn capability_params(&self, role: RoleId) -> HashMap<String, serde_json::Value> {
        let mut params = HashMap::new();
        params.insert(
            "location".to_string(),
            serde_json::Value::String(self.destination.clone()),
        );
        params.insert(
            "origin".to_string(),
            serde_json::Value::String(self.starting_point.clone()),
        );
        params.insert(
            "destination".to_string(),
            serde_json::Value::String(self.destination.clone()),
        );
        params.insert(
            "start_date".to_string(),
            serde_json::Value::String(self.start_date.format("%Y-%m-%d").to_string()),
        );
        params.insert(
            "end_date".to_string(),
            serde_json::Value::String(self.end_date.format("%Y-%m-%d").to_string()),
        );
        params.insert(
            "travelers".to_string(),
            serde_json::Value::from(self.travelers),
        );
        if role == RoleId::DiningExpert {
            params.insert(
                "price".to_string(),
                serde_json::Value::String(self.budget.price_tier().to_string()),
            );
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> TripRequest {
        TripRequest::new(
            "New York, USA",
            "Paris, France",
            date("2025-06-01"),
            date("2025-06-08"),
        )
    }

    #[test]
    fn test_validate_ok() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_date_order() {
        let trip = TripRequest::new("A", "B", date("2025-06-08"), date("2025-06-01"));
        assert!(matches!(trip.validate(), Err(TripError::DateOrder { .. })));

        let same_day = TripRequest::new("A", "B", date("2025-06-01"), date("2025-06-01"));
        assert!(same_day.validate().is_err());
    }

    #[test]
    fn test_validate_travelers() {
        let trip = sample().with_travelers(0);
        assert_eq!(trip.validate(), Err(TripError::NoTravelers));
    }

    #[test]
    fn test_validate_missing_destination() {
        let trip = TripRequest::new("A", "  ", date("2025-06-01"), date("2025-06-02"));
        assert_eq!(trip.validate(), Err(TripError::MissingField("destination")));
    }

    #[test]
    fn test_price_tier() {
        assert_eq!(Budget::Budget.price_tier(), "1,2");
        assert_eq!(Budget::Moderate.price_tier(), "2,3");
        assert_eq!(Budget::Luxury.price_tier(), "3,4");
    }

    #[test]
    fn test_budget_parse() {
        assert_eq!("luxury".parse::<Budget>().unwrap(), Budget::Luxury);
        assert_eq!("Moderate".parse::<Budget>().unwrap(), Budget::Moderate);
        assert!("lavish".parse::<Budget>().is_err());
    }

    #[test]
    fn test_effective_roles_forces_compiler() {
        let trip = sample().with_active_roles(vec![RoleId::TransportPlanner]);
        let roles = trip.effective_roles();
        assert_eq!(roles, vec![RoleId::TransportPlanner, RoleId::ReportCompiler]);
    }

    #[test]
    fn test_effective_roles_dedupes() {
        let trip = sample().with_active_roles(vec![
            RoleId::DiningExpert,
            RoleId::DiningExpert,
            RoleId::ReportCompiler,
        ]);
        assert_eq!(
            trip.effective_roles(),
            vec![RoleId::DiningExpert, RoleId::ReportCompiler]
        );
    }

    #[test]
    fn test_params_cover_template_placeholders() {
        let trip = sample()
            .with_budget(Budget::Luxury)
            .with_interests(vec!["art".to_string(), "food".to_string()]);
        let params = trip.params();
        for key in [
            "starting_point",
            "destination",
            "start_date",
            "end_date",
            "budget",
            "travelers",
            "interests",
            "accommodation",
            "travel_style",
            "special_requests",
            "price_tier",
        ] {
            assert!(params.contains_key(key), "missing param {key}");
        }
        assert_eq!(params["interests"], "art, food");
        assert_eq!(params["budget"], "Luxury");
        assert_eq!(params["price_tier"], "3,4");
    }

    #[test]
    fn test_capability_params_price_only_for_dining() {
        let trip = sample().with_budget(Budget::Budget);
        assert!(trip
            .capability_params(RoleId::DiningExpert)
            .contains_key("price"));
        assert!(!trip
            .capability_params(RoleId::TransportPlanner)
            .contains_key("price"));
    }
}
