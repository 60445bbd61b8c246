//! In-process [`ApiClient`] double for controller tests.

use async_trait::async_trait;
use shared_types::{
    Ack, Announcement, AnnouncementQuery, ApiResponse, AppError, Criterion, CriteriaQuery,
    DepartmentProgress, DepartmentQuery, DownloadedFile, FileQuery, LecturerStats, QaOverview,
    RawUser, ReminderRequest, ReviewFileRequest, Standard, StandardQuery, SubmissionRecord,
    SubmissionStatus, SystemConfig, TimelineEntry, UpdateFileRequest, UploadRequest,
};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::{ApiClient, ApiResult};

type Slot<T> = Mutex<Option<ApiResult<T>>>;
type AckSlot = Mutex<Option<Result<Ack, AppError>>>;

fn answer<T: Clone>(slot: &Slot<T>, default: impl FnOnce() -> T) -> ApiResult<T> {
    slot.lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| Ok(ApiResponse::ok(default())))
}

fn ack(slot: &AckSlot) -> Result<Ack, AppError> {
    slot.lock()
        .unwrap()
        .clone()
        .unwrap_or_else(|| Ok(ApiResponse::ok(serde_json::Value::Null)))
}

pub fn record(id: &str, status: &str) -> SubmissionRecord {
    SubmissionRecord::new(
        id,
        format!("{}.pdf", id),
        SubmissionStatus::from(status),
        chrono::Utc::now(),
    )
}

/// Every endpoint answers with an empty success unless told otherwise.
#[derive(Default)]
pub struct MockApi {
    pub me: Slot<RawUser>,
    pub files: Slot<Vec<SubmissionRecord>>,
    pub department_files: Slot<Vec<SubmissionRecord>>,
    pub announcements: Slot<Vec<Announcement>>,
    pub system_config: Slot<SystemConfig>,
    pub standards: Slot<Vec<Standard>>,
    pub criteria: Slot<Vec<Criterion>>,
    pub progress: Slot<DepartmentProgress>,
    pub qa_overview: Slot<QaOverview>,
    pub timeline: Slot<Vec<TimelineEntry>>,
    pub lecturer_stats: Slot<Vec<LecturerStats>>,
    pub upload: AckSlot,
    pub update: AckSlot,
    pub delete: AckSlot,
    pub review: AckSlot,
    pub reminder: AckSlot,
    pub download: Mutex<Option<Result<DownloadedFile, AppError>>>,
    pub uploads: Mutex<Vec<UploadRequest>>,
    pub updates: Mutex<Vec<(String, UpdateFileRequest)>>,
    pub reviews: Mutex<Vec<(String, ReviewFileRequest)>>,
    pub reminders: Mutex<Vec<ReminderRequest>>,
    calls: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(':').next() == Some(name))
            .count()
    }

    /// Make every call sleep first, to exercise unmount races.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn set_me(&self, result: ApiResult<RawUser>) {
        *self.me.lock().unwrap() = Some(result);
    }

    pub fn set_files(&self, records: Vec<SubmissionRecord>) {
        *self.files.lock().unwrap() = Some(Ok(ApiResponse::ok(records)));
    }

    pub fn set_department_files(&self, result: ApiResult<Vec<SubmissionRecord>>) {
        *self.department_files.lock().unwrap() = Some(result);
    }

    pub fn set_system_config(&self, config: SystemConfig) {
        *self.system_config.lock().unwrap() = Some(Ok(ApiResponse::ok(config)));
    }

    async fn enter(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ApiClient for MockApi {
    async fn get_me(&self) -> ApiResult<RawUser> {
        self.enter("get_me".into()).await;
        answer(&self.me, RawUser::default)
    }

    async fn get_files(&self, _query: &FileQuery) -> ApiResult<Vec<SubmissionRecord>> {
        self.enter("get_files".into()).await;
        answer(&self.files, Vec::new)
    }

    async fn upload_files(&self, request: &UploadRequest) -> Result<Ack, AppError> {
        self.enter("upload_files".into()).await;
        self.uploads.lock().unwrap().push(request.clone());
        ack(&self.upload)
    }

    async fn update_file(&self, id: &str, patch: &UpdateFileRequest) -> Result<Ack, AppError> {
        self.enter(format!("update_file:{}", id)).await;
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), patch.clone()));
        ack(&self.update)
    }

    async fn delete_file(&self, id: &str) -> Result<Ack, AppError> {
        self.enter(format!("delete_file:{}", id)).await;
        ack(&self.delete)
    }

    async fn download_file(&self, id: &str, file_name: &str) -> Result<DownloadedFile, AppError> {
        self.enter(format!("download_file:{}", id)).await;
        self.download.lock().unwrap().clone().unwrap_or_else(|| {
            Ok(DownloadedFile {
                file_name: file_name.to_string(),
                content_type: "application/pdf".to_string(),
                bytes: b"%PDF".to_vec(),
            })
        })
    }

    async fn get_announcements(&self, _query: &AnnouncementQuery) -> ApiResult<Vec<Announcement>> {
        self.enter("get_announcements".into()).await;
        answer(&self.announcements, Vec::new)
    }

    async fn get_system_config(&self) -> ApiResult<SystemConfig> {
        self.enter("get_system_config".into()).await;
        answer(&self.system_config, SystemConfig::default)
    }

    async fn get_standards(&self, _query: &StandardQuery) -> ApiResult<Vec<Standard>> {
        self.enter("get_standards".into()).await;
        answer(&self.standards, Vec::new)
    }

    async fn get_criteria(&self, _query: &CriteriaQuery) -> ApiResult<Vec<Criterion>> {
        self.enter("get_criteria".into()).await;
        answer(&self.criteria, Vec::new)
    }

    async fn get_criteria_by_standard(
        &self,
        standard_id: &str,
        _query: &CriteriaQuery,
    ) -> ApiResult<Vec<Criterion>> {
        self.enter(format!("get_criteria_by_standard:{}", standard_id))
            .await;
        answer(&self.criteria, Vec::new)
    }

    async fn get_department_progress(
        &self,
        _query: &DepartmentQuery,
    ) -> ApiResult<DepartmentProgress> {
        self.enter("get_department_progress".into()).await;
        answer(&self.progress, DepartmentProgress::default)
    }

    async fn get_department_qa_overview(&self, _query: &DepartmentQuery) -> ApiResult<QaOverview> {
        self.enter("get_department_qa_overview".into()).await;
        answer(&self.qa_overview, QaOverview::default)
    }

    async fn get_department_timeline(
        &self,
        _query: &DepartmentQuery,
    ) -> ApiResult<Vec<TimelineEntry>> {
        self.enter("get_department_timeline".into()).await;
        answer(&self.timeline, Vec::new)
    }

    async fn get_department_head_files(
        &self,
        _query: &FileQuery,
    ) -> ApiResult<Vec<SubmissionRecord>> {
        self.enter("get_department_head_files".into()).await;
        answer(&self.department_files, Vec::new)
    }

    async fn get_lecturer_submission_stats(
        &self,
        _query: &DepartmentQuery,
    ) -> ApiResult<Vec<LecturerStats>> {
        self.enter("get_lecturer_submission_stats".into()).await;
        answer(&self.lecturer_stats, Vec::new)
    }

    async fn review_department_file(
        &self,
        id: &str,
        review: &ReviewFileRequest,
    ) -> Result<Ack, AppError> {
        self.enter(format!("review_department_file:{}", id)).await;
        self.reviews
            .lock()
            .unwrap()
            .push((id.to_string(), review.clone()));
        ack(&self.review)
    }

    async fn send_reminder_to_lecturers(
        &self,
        reminder: &ReminderRequest,
    ) -> Result<Ack, AppError> {
        self.enter("send_reminder_to_lecturers".into()).await;
        self.reminders.lock().unwrap().push(reminder.clone());
        ack(&self.reminder)
    }
}
