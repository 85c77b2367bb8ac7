use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use holiday_core::domain::plan::{HolidayPlan, PlanStatus};
use holiday_core::dto::plan::{
    CreateHolidayPlan, ExcelUpload, ExportFormat, ExportRequest, ExportResult, PlanValidation,
    UpdateHolidayPlan,
};
use holiday_core::dto::query::{FilterOptions, PagedResponse, PaginationOptions, PlanQuery};
use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::info;

use super::HolidayPlanService;
use crate::error::{ClientError, Result};
use crate::transfer::{UploadFile, download_name, save_download};

const DEFAULT_UPCOMING_DAYS: u32 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DateRangeQuery<'a> {
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct UpcomingQuery {
    days: u32,
}

impl HolidayPlanService {
    // =============================================================================
    // Plan CRUD
    // =============================================================================

    /// List plans, one page at a time
    ///
    /// # Arguments
    /// * `filters` - Only non-empty filters are sent
    /// * `pagination` - Page index, page size and optional sort order
    pub async fn get_all_plans(
        &self,
        filters: FilterOptions,
        pagination: &PaginationOptions,
    ) -> Result<PagedResponse<HolidayPlan>> {
        let query = PlanQuery::new(None, filters, pagination);
        self.api.get_with_query(&self.path(""), &query).await
    }

    pub async fn get_plan_by_id(&self, plan_id: i64) -> Result<HolidayPlan> {
        self.api.get(&self.plan_path(plan_id, "")).await
    }

    pub async fn create_plan(&self, plan: &CreateHolidayPlan) -> Result<HolidayPlan> {
        let created: HolidayPlan = self.api.post(&self.path(""), plan).await?;
        info!("Created plan {} ({})", created.id, created.title);
        Ok(created)
    }

    /// Replace the fields set in `update`
    pub async fn update_plan(&self, plan_id: i64, update: &UpdateHolidayPlan) -> Result<HolidayPlan> {
        self.api.put(&self.plan_path(plan_id, ""), update).await
    }

    pub async fn delete_plan(&self, plan_id: i64) -> Result<()> {
        self.api
            .delete::<IgnoredAny>(&self.plan_path(plan_id, ""))
            .await
            .map(drop)
    }

    /// Ask the server whether a plan form would be accepted
    pub async fn validate_plan(&self, plan: &CreateHolidayPlan) -> Result<PlanValidation> {
        self.api.post(&self.path("/validate"), plan).await
    }

    // =============================================================================
    // Search
    // =============================================================================

    /// Full-text search over plans, combined with the usual filters
    pub async fn search_plans(
        &self,
        q: &str,
        filters: FilterOptions,
        pagination: &PaginationOptions,
    ) -> Result<PagedResponse<HolidayPlan>> {
        let query = PlanQuery::new(Some(q), filters, pagination);
        self.api.get_with_query(&self.path("/search"), &query).await
    }

    /// Plans overlapping `start..=end`, optionally for one user
    pub async fn get_plans_for_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        user_email: Option<&str>,
    ) -> Result<Vec<HolidayPlan>> {
        let query = DateRangeQuery {
            start_date,
            end_date,
            user_email,
        };
        self.api.get_with_query(&self.path("/date-range"), &query).await
    }

    // =============================================================================
    // Status & Notes
    // =============================================================================

    pub async fn update_plan_status(&self, plan_id: i64, status: PlanStatus) -> Result<HolidayPlan> {
        self.update_plan(plan_id, &UpdateHolidayPlan::status(status)).await
    }

    pub async fn confirm_plan(&self, plan_id: i64) -> Result<HolidayPlan> {
        self.update_plan_status(plan_id, PlanStatus::Confirmed).await
    }

    pub async fn start_plan(&self, plan_id: i64) -> Result<HolidayPlan> {
        self.update_plan_status(plan_id, PlanStatus::InProgress).await
    }

    pub async fn complete_plan(&self, plan_id: i64) -> Result<HolidayPlan> {
        self.update_plan_status(plan_id, PlanStatus::Completed).await
    }

    pub async fn cancel_plan(&self, plan_id: i64) -> Result<HolidayPlan> {
        self.update_plan_status(plan_id, PlanStatus::Cancelled).await
    }

    pub async fn update_plan_notes(&self, plan_id: i64, notes: &str) -> Result<HolidayPlan> {
        self.update_plan(plan_id, &UpdateHolidayPlan::notes(notes)).await
    }

    // =============================================================================
    // Spreadsheets & Exports
    // =============================================================================

    /// Create a plan from a spreadsheet
    ///
    /// # Arguments
    /// * `file` - The spreadsheet, sent as the `file` part
    /// * `form` - Owner and destination, sent as text parts
    pub async fn upload_excel_file(&self, file: UploadFile, form: &ExcelUpload) -> Result<HolidayPlan> {
        self.api
            .upload_file(&self.path("/upload"), file, Some(form))
            .await
    }

    /// Render a plan as a document; the content comes back base64 encoded
    pub async fn export_plan(&self, plan_id: i64, format: ExportFormat) -> Result<ExportResult> {
        self.api
            .post(&self.plan_path(plan_id, "/export"), &ExportRequest { format })
            .await
    }

    /// Export a plan and save the decoded document into `dest_dir`
    ///
    /// The file is named after the server's suggested file name.
    ///
    /// # Returns
    /// The path of the saved file
    pub async fn save_export(
        &self,
        plan_id: i64,
        format: ExportFormat,
        dest_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let export = self.export_plan(plan_id, format).await?;

        let data = STANDARD
            .decode(export.data.as_bytes())
            .map_err(|e| ClientError::Parse(format!("invalid export payload: {}", e)))?;

        let dest_dir = dest_dir.as_ref();
        let target = dest_dir.join(download_name(Some(&export.filename)));
        let saved = save_download(dest_dir, &target, &data)?;

        info!("Saved export of plan {} to {}", plan_id, saved.display());
        Ok(saved)
    }

    // =============================================================================
    // User Queries
    // =============================================================================

    /// A user's plans starting within `days` days (30 when `None`)
    pub async fn get_upcoming_holidays(
        &self,
        user_email: &str,
        days: Option<u32>,
    ) -> Result<Vec<HolidayPlan>> {
        let query = UpcomingQuery {
            days: days.unwrap_or(DEFAULT_UPCOMING_DAYS),
        };
        self.api
            .get_with_query(&self.path(&format!("/user/{}/upcoming", Self::segment(user_email))), &query)
            .await
    }

    pub async fn get_user_destinations(&self, user_email: &str) -> Result<Vec<String>> {
        self.api
            .get(&self.path(&format!("/user/{}/destinations", Self::segment(user_email))))
            .await
    }

    pub async fn get_popular_destinations(&self) -> Result<Vec<String>> {
        self.api.get(&self.path("/destinations")).await
    }
}
