//! Backend access.
//!
//! Every network call the portal makes goes through [`ApiClient`]. Calls
//! return the backend's `{ success, data, message }` envelope; transport
//! failures and non-2xx responses come back as `Err`.

mod http;

pub use http::HttpApiClient;

use async_trait::async_trait;
use shared_types::{
    Ack, Announcement, AnnouncementQuery, ApiResponse, AppError, Criterion, CriteriaQuery,
    DepartmentProgress, DepartmentQuery, DownloadedFile, FileQuery, LecturerStats, QaOverview,
    RawUser, ReminderRequest, ReviewFileRequest, Standard, StandardQuery, SubmissionRecord,
    SystemConfig, TimelineEntry, UpdateFileRequest, UploadRequest,
};

pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

#[async_trait]
pub trait ApiClient: Send + Sync {
    // Identity
    async fn get_me(&self) -> ApiResult<RawUser>;

    // Lecturer files
    async fn get_files(&self, query: &FileQuery) -> ApiResult<Vec<SubmissionRecord>>;
    async fn upload_files(&self, request: &UploadRequest) -> Result<Ack, AppError>;
    async fn update_file(&self, id: &str, patch: &UpdateFileRequest) -> Result<Ack, AppError>;
    async fn delete_file(&self, id: &str) -> Result<Ack, AppError>;
    /// Raw file body; `file_name` is what the caller wants it saved as.
    async fn download_file(&self, id: &str, file_name: &str) -> Result<DownloadedFile, AppError>;

    // Reference data
    async fn get_announcements(&self, query: &AnnouncementQuery) -> ApiResult<Vec<Announcement>>;
    async fn get_system_config(&self) -> ApiResult<SystemConfig>;
    async fn get_standards(&self, query: &StandardQuery) -> ApiResult<Vec<Standard>>;
    async fn get_criteria(&self, query: &CriteriaQuery) -> ApiResult<Vec<Criterion>>;
    async fn get_criteria_by_standard(
        &self,
        standard_id: &str,
        query: &CriteriaQuery,
    ) -> ApiResult<Vec<Criterion>>;

    // Department head
    async fn get_department_progress(&self, query: &DepartmentQuery)
        -> ApiResult<DepartmentProgress>;
    async fn get_department_qa_overview(&self, query: &DepartmentQuery) -> ApiResult<QaOverview>;
    async fn get_department_timeline(&self, query: &DepartmentQuery)
        -> ApiResult<Vec<TimelineEntry>>;
    async fn get_department_head_files(&self, query: &FileQuery)
        -> ApiResult<Vec<SubmissionRecord>>;
    async fn get_lecturer_submission_stats(
        &self,
        query: &DepartmentQuery,
    ) -> ApiResult<Vec<LecturerStats>>;
    async fn review_department_file(
        &self,
        id: &str,
        review: &ReviewFileRequest,
    ) -> Result<Ack, AppError>;
    async fn send_reminder_to_lecturers(&self, reminder: &ReminderRequest)
        -> Result<Ack, AppError>;
}

/// Collapse a fetch result into its data, logging and dropping failures.
///
/// Data-fetch errors never propagate: the affected section renders its
/// empty state instead.
pub(crate) fn settle<T>(dataset: &'static str, result: ApiResult<T>) -> Option<T> {
    match result.and_then(ApiResponse::into_data) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(dataset, kind = %e.kind, error = %e.message, "fetch failed");
            None
        }
    }
}

/// Collapse a mutation result into success or the error that stopped it.
pub(crate) fn acknowledge(action: &'static str, result: Result<Ack, AppError>) -> Result<(), AppError> {
    result.and_then(Ack::into_ack).map_err(|e| {
        tracing::warn!(action, kind = %e.kind, error = %e.message, "mutation failed");
        e
    })
}

/// Check a request body before it goes out.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
