//! Holiday plan domain model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::activity::Activity;

/// A holiday plan owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayPlan {
    pub id: i64,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user_email: String,
    pub status: PlanStatus,

    #[serde(default)]
    pub activities: Vec<Activity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub weather_optimization_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_weather_update: Option<NaiveDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_calendar_event_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<NaiveDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<NaiveDateTime>,
}

impl HolidayPlan {
    /// Number of calendar days covered by the plan, both ends inclusive
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Lifecycle status of a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    /// Being put together, not yet committed to
    Draft,

    /// Committed to by the owner
    Confirmed,

    /// The trip is happening
    InProgress,

    /// The trip is over
    Completed,

    /// Called off
    Cancelled,
}

impl PlanStatus {
    /// Wire representation (e.g. `IN_PROGRESS`), as used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "DRAFT",
            PlanStatus::Confirmed => "CONFIRMED",
            PlanStatus::InProgress => "IN_PROGRESS",
            PlanStatus::Completed => "COMPLETED",
            PlanStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanStatus::Draft => write!(f, "Draft"),
            PlanStatus::Confirmed => write!(f, "Confirmed"),
            PlanStatus::InProgress => write!(f, "In progress"),
            PlanStatus::Completed => write!(f, "Completed"),
            PlanStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "DRAFT" => Ok(PlanStatus::Draft),
            "CONFIRMED" => Ok(PlanStatus::Confirmed),
            "IN_PROGRESS" => Ok(PlanStatus::InProgress),
            "COMPLETED" => Ok(PlanStatus::Completed),
            "CANCELLED" => Ok(PlanStatus::Cancelled),
            other => Err(format!("unknown plan status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": 42,
            "title": "Lisbon long weekend",
            "destination": "Lisbon",
            "startDate": "2025-06-12",
            "endDate": "2025-06-15",
            "userEmail": "a@b.com",
            "status": "IN_PROGRESS",
            "weatherOptimizationEnabled": true,
            "createdDate": "2025-05-01T09:30:00"
        })
    }

    #[test]
    fn test_plan_deserializes_camel_case() {
        let plan: HolidayPlan = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(plan.id, 42);
        assert_eq!(plan.status, PlanStatus::InProgress);
        assert!(plan.weather_optimization_enabled);
        assert!(plan.activities.is_empty());
        assert_eq!(plan.duration_days(), 4);
    }

    #[test]
    fn test_plan_omits_absent_optionals() {
        let plan: HolidayPlan = serde_json::from_value(sample_json()).unwrap();
        let value = serde_json::to_value(&plan).unwrap();
        assert!(value.get("notes").is_none());
        assert_eq!(value["status"], "IN_PROGRESS");
        assert_eq!(value["startDate"], "2025-06-12");
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("in-progress".parse::<PlanStatus>().unwrap(), PlanStatus::InProgress);
        assert_eq!("CANCELLED".parse::<PlanStatus>().unwrap(), PlanStatus::Cancelled);
        assert!("archived".parse::<PlanStatus>().is_err());
        assert_eq!(PlanStatus::InProgress.to_string(), "In progress");
        assert_eq!(PlanStatus::InProgress.as_str(), "IN_PROGRESS");
    }
}
