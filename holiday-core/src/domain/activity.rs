//! Activity domain model
//!
//! An activity is a single scheduled item inside a holiday plan.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A scheduled activity within a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub time_slot: TimeSlot,
    pub location: String,

    // Weather constraints used by the server-side optimiser
    #[serde(default)]
    pub weather_dependent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_weather: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_humidity: Option<f64>,
    #[serde(default)]
    pub avoid_rain: bool,

    #[serde(default)]
    pub priority_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
    #[serde(default)]
    pub booking_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Set when the optimiser moved this activity
    #[serde(default)]
    pub ai_optimized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<NaiveDateTime>,
}

/// Category of an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Sightseeing,
    Museum,
    Restaurant,
    Shopping,
    OutdoorActivity,
    Entertainment,
    Transportation,
    Accommodation,
    Cultural,
    Sports,
    Relaxation,
    Adventure,
    Nightlife,
    Historical,
    Religious,
    Nature,
    FoodExperience,
    WaterActivity,
    MountainActivity,
    CityTour,
    Other,
}

impl ActivityType {
    /// Whether the activity usually happens outdoors
    pub fn is_outdoor(&self) -> bool {
        matches!(
            self,
            ActivityType::OutdoorActivity
                | ActivityType::Sightseeing
                | ActivityType::Sports
                | ActivityType::Adventure
                | ActivityType::Nature
                | ActivityType::WaterActivity
                | ActivityType::MountainActivity
                | ActivityType::CityTour
        )
    }
}

/// Part of the day an activity is scheduled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
    FullDay,
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeSlot::Morning => write!(f, "Morning"),
            TimeSlot::Afternoon => write!(f, "Afternoon"),
            TimeSlot::Evening => write!(f, "Evening"),
            TimeSlot::Night => write!(f, "Night"),
            TimeSlot::FullDay => write!(f, "Full day"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_field_is_renamed() {
        let activity: Activity = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Tram 28",
            "date": "2025-06-13",
            "startTime": "09:00:00",
            "type": "CITY_TOUR",
            "timeSlot": "MORNING",
            "location": "Martim Moniz",
            "weatherDependent": true,
            "priorityLevel": 3
        }))
        .unwrap();

        assert_eq!(activity.activity_type, ActivityType::CityTour);
        assert_eq!(activity.time_slot, TimeSlot::Morning);
        assert!(activity.activity_type.is_outdoor());
        assert!(!activity.avoid_rain);

        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["type"], "CITY_TOUR");
        assert!(value.get("activityType").is_none());
    }
}
