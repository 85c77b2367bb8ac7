//! Holiday plan service
//!
//! Maps named plan operations onto `/api/holidays` endpoints through an
//! [`ApiClient`]. Methods shape paths and payloads and return the decoded
//! response unchanged; errors come back exactly as the pipeline produced them.
//! The only exceptions are the `safe_*` helpers, which swallow errors, and
//! the `get_cached_*` helpers, which go through the client cache.

mod activities;
mod insights;
mod plans;
mod sharing;

use std::borrow::Cow;
use std::time::Duration;

use holiday_core::domain::activity::Activity;
use holiday_core::domain::plan::HolidayPlan;
use holiday_core::dto::insights::OptimizationResult;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ApiClient;
use crate::error::Result;

/// Root of every plan endpoint
pub const BASE_PATH: &str = "/api/holidays";

const PLAN_CACHE_TTL: Duration = Duration::from_secs(300);
const ACTIVITIES_CACHE_TTL: Duration = Duration::from_secs(180);

/// Facade over the holiday plan endpoints
#[derive(Debug, Clone)]
pub struct HolidayPlanService {
    api: ApiClient,
}

impl HolidayPlanService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// The underlying client
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}{}", BASE_PATH, suffix)
    }

    fn plan_path(&self, plan_id: i64, suffix: &str) -> String {
        format!("{}/{}{}", BASE_PATH, plan_id, suffix)
    }

    /// Percent-encode a caller-supplied value for use as one path segment
    fn segment(value: &str) -> Cow<'_, str> {
        urlencoding::encode(value)
    }

    // =============================================================================
    // Caching Helpers
    // =============================================================================

    /// Get a plan, served from the cache for up to five minutes
    pub async fn get_cached_plan(&self, plan_id: i64) -> Result<HolidayPlan> {
        self.api
            .get_cached(
                &format!("plan_{}", plan_id),
                || self.get_plan_by_id(plan_id),
                PLAN_CACHE_TTL,
            )
            .await
    }

    /// Get a plan's activities, served from the cache for up to three minutes
    pub async fn get_cached_activities(&self, plan_id: i64) -> Result<Vec<Activity>> {
        self.api
            .get_cached(
                &format!("activities_{}", plan_id),
                || self.get_plan_activities(plan_id),
                ACTIVITIES_CACHE_TTL,
            )
            .await
    }

    // =============================================================================
    // Error-Swallowing Helpers
    // =============================================================================

    /// Get a plan, or `None` if the call failed for any reason
    ///
    /// The failure is only logged: callers cannot tell a missing plan from an
    /// outage or an expired session. Use [`Self::get_plan_by_id`] when the
    /// difference matters.
    pub async fn safe_get_plan(&self, plan_id: i64) -> Option<HolidayPlan> {
        match self.get_plan_by_id(plan_id).await {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!("Error fetching plan {}: {}", plan_id, e);
                None
            }
        }
    }

    /// Optimize a plan, or `None` if the call failed for any reason
    ///
    /// Same trade-off as [`Self::safe_get_plan`].
    pub async fn safe_optimize_plan(&self, plan_id: i64) -> Option<OptimizationResult> {
        match self.optimize_plan(plan_id).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Error optimizing plan {}: {}", plan_id, e);
                None
            }
        }
    }

    // =============================================================================
    // Real-time Updates
    // =============================================================================

    /// Follow server-pushed updates for a plan
    ///
    /// Each event's data is decoded as JSON and passed to `callback`;
    /// undecodable messages are logged and skipped. Abort the returned task to
    /// unsubscribe. The task ends when the server closes the stream.
    pub async fn subscribe_to_updates<F>(
        &self,
        plan_id: i64,
        mut callback: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnMut(serde_json::Value) + Send + 'static,
    {
        let mut stream = self
            .api
            .create_event_source(&self.plan_path(plan_id, "/updates"))
            .await?;

        Ok(tokio::spawn(async move {
            while let Some(event) = stream.next_event().await {
                match event {
                    Ok(event) => match serde_json::from_str(&event.data) {
                        Ok(update) => callback(update),
                        Err(e) => warn!("Error parsing update for plan {}: {}", plan_id, e),
                    },
                    Err(e) => {
                        warn!("Update stream for plan {} failed: {}", plan_id, e);
                        break;
                    }
                }
            }

            debug!("Update stream for plan {} closed", plan_id);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_escapes_path_delimiters() {
        assert_eq!(HolidayPlanService::segment("a@b.com"), "a%40b.com");
        assert_eq!(HolidayPlanService::segment("x/y?z#w"), "x%2Fy%3Fz%23w");
        assert_eq!(HolidayPlanService::segment("plain-id_1.0"), "plain-id_1.0");
    }
}
