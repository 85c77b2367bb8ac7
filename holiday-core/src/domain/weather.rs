//! Weather domain model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One weather observation or forecast point for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub city: String,
    pub country: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_hour: Option<u8>,

    pub temperature_celsius: f64,
    pub feels_like_celsius: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity_percent: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_degrees: Option<f64>,
    pub cloudiness_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,

    pub weather_main: String,
    pub weather_description: String,
    pub weather_icon: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_1h_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_3h_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow_1h_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow_3h_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset_time: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_quality_index: Option<u16>,

    pub forecast_type: ForecastType,
    pub data_source: String,

    /// Server-computed scores, 0-100
    #[serde(default)]
    pub ai_comfort_score: f64,
    #[serde(default)]
    pub outdoor_activity_score: f64,
    #[serde(default)]
    pub indoor_activity_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<NaiveDateTime>,
}

impl WeatherData {
    /// Whether any rain or snow is recorded for the data point
    pub fn has_precipitation(&self) -> bool {
        [self.rain_1h_mm, self.rain_3h_mm, self.snow_1h_mm, self.snow_3h_mm]
            .iter()
            .flatten()
            .any(|mm| *mm > 0.0)
    }
}

/// Kind of weather record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForecastType {
    Current,
    Hourly,
    Daily,
    Historical,
}

/// An alert raised by the server for weather that affects planned activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub severity: AlertSeverity,
    pub timestamp: String,
    #[serde(default)]
    pub affected_activities: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}
