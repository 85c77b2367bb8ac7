use holiday_core::domain::plan::HolidayPlan;
use holiday_core::domain::weather::{WeatherAlert, WeatherData};
use holiday_core::dto::insights::{
    BudgetLimit, BudgetOptimization, BudgetUpdate, CostBreakdown, HolidayPlanStatistics,
    OptimizationResult, Recommendations, ReportQuery, ReportType, UsageStatistics,
};
use tracing::info;

use super::HolidayPlanService;
use crate::error::Result;

impl HolidayPlanService {
    // =============================================================================
    // Optimisation
    // =============================================================================

    /// Reschedule a plan's activities around the weather forecast
    pub async fn optimize_plan(&self, plan_id: i64) -> Result<OptimizationResult> {
        let result: OptimizationResult = self
            .api
            .post_empty(&self.plan_path(plan_id, "/optimize"))
            .await?;
        info!(
            "Optimized plan {}: {} activities moved",
            plan_id, result.optimized_activities
        );
        Ok(result)
    }

    /// Drop the lowest-priority activities until the plan fits `max_budget`
    pub async fn optimize_for_budget(&self, plan_id: i64, max_budget: f64) -> Result<BudgetOptimization> {
        self.api
            .post(
                &self.plan_path(plan_id, "/optimize-budget"),
                &BudgetLimit { max_budget },
            )
            .await
    }

    // =============================================================================
    // Statistics & Weather
    // =============================================================================

    pub async fn get_plan_statistics(&self, plan_id: i64) -> Result<HolidayPlanStatistics> {
        self.api.get(&self.plan_path(plan_id, "/statistics")).await
    }

    pub async fn get_weather_forecast(&self, plan_id: i64) -> Result<Vec<WeatherData>> {
        self.api
            .get(&self.plan_path(plan_id, "/weather-forecast"))
            .await
    }

    pub async fn get_weather_alerts(&self, plan_id: i64) -> Result<Vec<WeatherAlert>> {
        self.api.get(&self.plan_path(plan_id, "/weather-alerts")).await
    }

    pub async fn get_recommendations(&self, plan_id: i64) -> Result<Recommendations> {
        self.api
            .get(&self.plan_path(plan_id, "/recommendations"))
            .await
    }

    // =============================================================================
    // Costs & Reports
    // =============================================================================

    pub async fn get_cost_breakdown(&self, plan_id: i64) -> Result<CostBreakdown> {
        self.api
            .get(&self.plan_path(plan_id, "/cost-breakdown"))
            .await
    }

    pub async fn update_budget(&self, plan_id: i64, budget: f64) -> Result<HolidayPlan> {
        self.api
            .put(&self.plan_path(plan_id, "/budget"), &BudgetUpdate { budget })
            .await
    }

    /// Generate a report; its layout depends on `report_type`
    pub async fn generate_report(
        &self,
        plan_id: i64,
        report_type: ReportType,
    ) -> Result<serde_json::Value> {
        self.api
            .get_with_query(
                &self.plan_path(plan_id, "/report"),
                &ReportQuery { report_type },
            )
            .await
    }

    pub async fn get_usage_statistics(&self, user_email: &str) -> Result<UsageStatistics> {
        self.api
            .get(&self.path(&format!("/user/{}/statistics", Self::segment(user_email))))
            .await
    }
}
