//! Optimisation, statistics, cost and reporting payloads

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::activity::{Activity, ActivityType, TimeSlot};

/// Outcome of a weather optimisation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub message: String,
    pub optimized_activities: u32,
    pub plan_id: i64,
}

/// Aggregated figures for a single plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayPlanStatistics {
    pub total_activities: u32,
    pub total_days: u32,
    #[serde(default)]
    pub total_estimated_cost: f64,
    #[serde(default)]
    pub total_estimated_duration_minutes: u64,
    #[serde(default)]
    pub activities_by_type: HashMap<ActivityType, u32>,
    #[serde(default)]
    pub activities_by_time_slot: HashMap<TimeSlot, u32>,
    #[serde(default)]
    pub weather_dependent_activities: u32,
    #[serde(default)]
    pub ai_optimized_activities: u32,
}

/// Costs of a plan grouped by category and by day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub total_cost: f64,
    #[serde(default)]
    pub by_category: HashMap<String, f64>,
    #[serde(default)]
    pub by_date: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetUpdate {
    pub budget: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLimit {
    pub max_budget: f64,
}

/// Activities kept and dropped to fit a budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOptimization {
    #[serde(default)]
    pub optimized_activities: Vec<Activity>,
    #[serde(default)]
    pub removed_activities: Vec<Activity>,
    pub total_cost: f64,
}

/// Suggestions for a plan; non-activity entries are free-form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub restaurants: Vec<serde_json::Value>,
    #[serde(default)]
    pub accommodations: Vec<serde_json::Value>,
    #[serde(default)]
    pub transportation: Vec<serde_json::Value>,
}

/// Per-user usage figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStatistics {
    pub total_plans: u32,
    pub total_activities: u32,
    pub total_destinations: u32,
    #[serde(default)]
    pub average_plan_duration: f64,
    #[serde(default)]
    pub most_visited_destinations: Vec<String>,
}

/// Report flavours offered by the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Summary,
    Detailed,
    Cost,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub report_type: ReportType,
}
