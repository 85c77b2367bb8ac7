use chrono::NaiveDate;
use holiday_core::domain::activity::Activity;
use holiday_core::dto::activity::{
    ActivityPatch, BulkUpdateActivities, CreateActivity, DuplicateActivities, NewComment,
};
use serde::Serialize;
use serde::de::IgnoredAny;

use super::HolidayPlanService;
use crate::error::Result;

/// Query for bulk deletes: ids joined by commas
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivityIds {
    activity_ids: String,
}

impl ActivityIds {
    fn new(ids: &[i64]) -> Self {
        let activity_ids = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Self { activity_ids }
    }
}

impl HolidayPlanService {
    fn activity_path(&self, plan_id: i64, activity_id: i64, suffix: &str) -> String {
        self.plan_path(plan_id, &format!("/activities/{}{}", activity_id, suffix))
    }

    // =============================================================================
    // Activities
    // =============================================================================

    pub async fn get_plan_activities(&self, plan_id: i64) -> Result<Vec<Activity>> {
        self.api.get(&self.plan_path(plan_id, "/activities")).await
    }

    /// Activities scheduled on one day of a plan
    pub async fn get_activities_for_date(&self, plan_id: i64, date: NaiveDate) -> Result<Vec<Activity>> {
        self.api
            .get(&self.plan_path(plan_id, &format!("/activities/date/{}", date)))
            .await
    }

    pub async fn add_activity(&self, plan_id: i64, activity: &CreateActivity) -> Result<Activity> {
        self.api
            .post(&self.plan_path(plan_id, "/activities"), activity)
            .await
    }

    pub async fn update_activity(
        &self,
        plan_id: i64,
        activity_id: i64,
        patch: &ActivityPatch,
    ) -> Result<Activity> {
        self.api
            .put(&self.activity_path(plan_id, activity_id, ""), patch)
            .await
    }

    pub async fn delete_activity(&self, plan_id: i64, activity_id: i64) -> Result<()> {
        self.api
            .delete::<IgnoredAny>(&self.activity_path(plan_id, activity_id, ""))
            .await
            .map(drop)
    }

    // =============================================================================
    // Bulk Operations
    // =============================================================================

    /// Update several activities at once; every patch must carry its `id`
    pub async fn bulk_update_activities(
        &self,
        plan_id: i64,
        activities: Vec<ActivityPatch>,
    ) -> Result<Vec<Activity>> {
        let body = BulkUpdateActivities { activities };
        self.api
            .put(&self.plan_path(plan_id, "/activities/bulk"), &body)
            .await
    }

    /// Delete several activities at once
    ///
    /// The ids travel as a single comma-separated `activityIds` query
    /// parameter.
    pub async fn bulk_delete_activities(&self, plan_id: i64, activity_ids: &[i64]) -> Result<()> {
        self.api
            .delete_with_query::<IgnoredAny, _>(
                &self.plan_path(plan_id, "/activities/bulk"),
                &ActivityIds::new(activity_ids),
            )
            .await
            .map(drop)
    }

    /// Copy activities onto another day of the same plan
    pub async fn duplicate_activities(
        &self,
        plan_id: i64,
        activity_ids: Vec<i64>,
        target_date: NaiveDate,
    ) -> Result<Vec<Activity>> {
        let body = DuplicateActivities {
            activity_ids,
            target_date,
        };
        self.api
            .post(&self.plan_path(plan_id, "/duplicate-activities"), &body)
            .await
    }

    pub async fn get_alternative_activities(
        &self,
        plan_id: i64,
        activity_id: i64,
    ) -> Result<Vec<Activity>> {
        self.api
            .get(&self.activity_path(plan_id, activity_id, "/alternatives"))
            .await
    }

    // =============================================================================
    // Comments
    // =============================================================================

    pub async fn add_comment(
        &self,
        plan_id: i64,
        activity_id: i64,
        comment: &str,
    ) -> Result<serde_json::Value> {
        let body = NewComment {
            comment: comment.to_string(),
        };
        self.api
            .post(&self.activity_path(plan_id, activity_id, "/comments"), &body)
            .await
    }

    /// Comments are free-form; their shape is up to the server
    pub async fn get_comments(&self, plan_id: i64, activity_id: i64) -> Result<Vec<serde_json::Value>> {
        self.api
            .get(&self.activity_path(plan_id, activity_id, "/comments"))
            .await
    }
}
