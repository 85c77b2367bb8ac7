use holiday_core::domain::plan::HolidayPlan;
use holiday_core::dto::plan::{ClonePlanRequest, UpdateHolidayPlan};
use holiday_core::dto::sharing::{
    AddCollaborator, CalendarRemoval, CalendarSyncResult, Collaborator, CollaboratorRole,
    ReminderResult, SavedTemplate, SaveTemplateRequest, SharePlanRequest, ShareResult,
    TemplateQuery, TemplateSummary,
};
use serde::de::IgnoredAny;
use tracing::info;

use super::HolidayPlanService;
use crate::error::Result;

impl HolidayPlanService {
    // =============================================================================
    // Sharing
    // =============================================================================

    /// Copy a plan into `user_email`'s account
    pub async fn clone_plan(
        &self,
        plan_id: i64,
        user_email: &str,
        new_title: Option<&str>,
    ) -> Result<HolidayPlan> {
        let body = ClonePlanRequest {
            user_email: user_email.to_string(),
            new_title: new_title.map(str::to_string),
        };
        self.api.post(&self.plan_path(plan_id, "/clone"), &body).await
    }

    /// Email a plan to someone
    pub async fn share_plan(
        &self,
        plan_id: i64,
        recipient_email: &str,
        message: Option<&str>,
    ) -> Result<ShareResult> {
        let body = SharePlanRequest {
            recipient_email: recipient_email.to_string(),
            message: message.map(str::to_string),
        };
        let result: ShareResult = self.api.post(&self.plan_path(plan_id, "/share"), &body).await?;
        info!("Shared plan {} with {}", plan_id, result.recipient);
        Ok(result)
    }

    pub async fn send_reminder(&self, plan_id: i64) -> Result<ReminderResult> {
        self.api
            .post_empty(&self.plan_path(plan_id, "/send-reminder"))
            .await
    }

    // =============================================================================
    // Collaborators
    // =============================================================================

    pub async fn add_collaborator(
        &self,
        plan_id: i64,
        email: &str,
        role: CollaboratorRole,
    ) -> Result<()> {
        let body = AddCollaborator {
            email: email.to_string(),
            role,
        };
        self.api
            .post::<IgnoredAny, _>(&self.plan_path(plan_id, "/collaborators"), &body)
            .await
            .map(drop)
    }

    pub async fn remove_collaborator(&self, plan_id: i64, email: &str) -> Result<()> {
        self.api
            .delete::<IgnoredAny>(&self.plan_path(plan_id, &format!("/collaborators/{}", Self::segment(email))))
            .await
            .map(drop)
    }

    pub async fn get_collaborators(&self, plan_id: i64) -> Result<Vec<Collaborator>> {
        self.api.get(&self.plan_path(plan_id, "/collaborators")).await
    }

    // =============================================================================
    // Templates
    // =============================================================================

    pub async fn save_as_template(&self, plan_id: i64, template_name: &str) -> Result<SavedTemplate> {
        let body = SaveTemplateRequest {
            template_name: template_name.to_string(),
        };
        self.api
            .post(&self.plan_path(plan_id, "/save-template"), &body)
            .await
    }

    /// Templates visible to `user_email`, or all public ones
    pub async fn get_templates(&self, user_email: Option<&str>) -> Result<Vec<TemplateSummary>> {
        let query = TemplateQuery {
            user_email: user_email.map(str::to_string),
        };
        self.api.get_with_query(&self.path("/templates"), &query).await
    }

    /// Start a new plan from a template, overriding the fields set in `overrides`
    pub async fn create_from_template(
        &self,
        template_id: &str,
        overrides: &UpdateHolidayPlan,
    ) -> Result<HolidayPlan> {
        self.api
            .post(&self.path(&format!("/from-template/{}", Self::segment(template_id))), overrides)
            .await
    }

    // =============================================================================
    // Calendar
    // =============================================================================

    pub async fn sync_with_calendar(&self, plan_id: i64) -> Result<CalendarSyncResult> {
        self.api
            .post_empty(&self.plan_path(plan_id, "/sync-calendar"))
            .await
    }

    pub async fn remove_from_calendar(&self, plan_id: i64) -> Result<CalendarRemoval> {
        self.api.delete(&self.plan_path(plan_id, "/calendar")).await
    }
}
