use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{
    Ack, Announcement, AnnouncementQuery, ApiResponse, ApiSettings, AppError, Criterion,
    CriteriaQuery, DepartmentProgress, DepartmentQuery, DownloadedFile, FileQuery, LecturerStats,
    QaOverview, RawUser, ReminderRequest, ReviewFileRequest, Standard, StandardQuery,
    SubmissionRecord, SystemConfig, TimelineEntry, UpdateFileRequest, UploadFile, UploadRequest,
};
use std::time::Duration;

use super::{ApiClient, ApiResult};
use crate::session::Session;

/// [`ApiClient`] speaking JSON over HTTP to the QA backend.
///
/// The bearer token is read from the session on every request, so signing
/// in or out takes effect without rebuilding the client.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpApiClient {
    pub fn new(settings: &ApiSettings, session: Session) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, "backend returned an error");
        Err(AppError::from_status(status.as_u16(), error_message(&body)))
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        let body = response.text().await.map_err(transport_error)?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.json(self.client.get(self.url(path)).query(query)).await
    }
}

/// Message carried by an error body: the envelope's `message`, else
/// whatever a serialized `AppError` says, else a generic notice.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Ack>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| AppError::friendly_message(body))
}

/// Escape a backend id for use as one path segment.
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_connect() || e.is_timeout() {
        AppError::network(format!("Backend unreachable: {}", e))
    } else if e.is_decode() || e.is_body() {
        AppError::decode(format!("Malformed response body: {}", e))
    } else if e.is_request() {
        AppError::network(format!("Request failed: {}", e))
    } else {
        AppError::internal(format!("HTTP client error: {}", e))
    }
}

fn file_part(file: &UploadFile) -> Result<multipart::Part, AppError> {
    let content_type = match &file.content_type {
        Some(ct) => ct.clone(),
        None => mime_guess::from_path(&file.file_name)
            .first_or_octet_stream()
            .to_string(),
    };
    multipart::Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&content_type)
        .map_err(|e| AppError::bad_request(format!("Invalid content type {}: {}", content_type, e)))
}

fn upload_form(request: &UploadRequest) -> Result<multipart::Form, AppError> {
    let mut form = multipart::Form::new();
    for file in &request.files {
        form = form.part("files", file_part(file)?);
    }
    for (name, value) in request.metadata.form_fields() {
        form = form.text(name, value);
    }
    Ok(form)
}

#[async_trait]
impl ApiClient for HttpApiClient {
    #[tracing::instrument(skip(self))]
    async fn get_me(&self) -> ApiResult<RawUser> {
        self.json(self.client.get(self.url("/auth/me"))).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_files(&self, query: &FileQuery) -> ApiResult<Vec<SubmissionRecord>> {
        self.get("/files", query).await
    }

    #[tracing::instrument(skip(self, request), fields(files = request.files.len()))]
    async fn upload_files(&self, request: &UploadRequest) -> Result<Ack, AppError> {
        let form = upload_form(request)?;
        let ack = self
            .json(self.client.post(self.url("/files/upload")).multipart(form))
            .await?;
        tracing::info!(files = request.files.len(), "Files uploaded");
        Ok(ack)
    }

    #[tracing::instrument(skip(self, patch))]
    async fn update_file(&self, id: &str, patch: &UpdateFileRequest) -> Result<Ack, AppError> {
        let url = self.url(&format!("/files/{}", segment(id)));
        self.json(self.client.put(url).json(patch)).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_file(&self, id: &str) -> Result<Ack, AppError> {
        let url = self.url(&format!("/files/{}", segment(id)));
        self.json(self.client.delete(url)).await
    }

    #[tracing::instrument(skip(self))]
    async fn download_file(&self, id: &str, file_name: &str) -> Result<DownloadedFile, AppError> {
        let url = self.url(&format!("/files/{}/download", segment(id)));
        let response = self.send(self.client.get(url)).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(file_name)
                    .first_or_octet_stream()
                    .to_string()
            });
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(DownloadedFile {
            file_name: file_name.to_string(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn get_announcements(&self, query: &AnnouncementQuery) -> ApiResult<Vec<Announcement>> {
        self.get("/announcements", query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_system_config(&self) -> ApiResult<SystemConfig> {
        self.json(self.client.get(self.url("/system-config"))).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_standards(&self, query: &StandardQuery) -> ApiResult<Vec<Standard>> {
        self.get("/standards", query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_criteria(&self, query: &CriteriaQuery) -> ApiResult<Vec<Criterion>> {
        self.get("/criteria", query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_criteria_by_standard(
        &self,
        standard_id: &str,
        query: &CriteriaQuery,
    ) -> ApiResult<Vec<Criterion>> {
        self.get(&format!("/standards/{}/criteria", segment(standard_id)), query)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_department_progress(
        &self,
        query: &DepartmentQuery,
    ) -> ApiResult<DepartmentProgress> {
        self.get("/department-head/progress", query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_department_qa_overview(&self, query: &DepartmentQuery) -> ApiResult<QaOverview> {
        self.get("/department-head/qa-overview", query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_department_timeline(
        &self,
        query: &DepartmentQuery,
    ) -> ApiResult<Vec<TimelineEntry>> {
        self.get("/department-head/timeline", query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_department_head_files(
        &self,
        query: &FileQuery,
    ) -> ApiResult<Vec<SubmissionRecord>> {
        self.get("/department-head/files", query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_lecturer_submission_stats(
        &self,
        query: &DepartmentQuery,
    ) -> ApiResult<Vec<LecturerStats>> {
        self.get("/department-head/lecturer-stats", query).await
    }

    #[tracing::instrument(skip(self, review))]
    async fn review_department_file(
        &self,
        id: &str,
        review: &ReviewFileRequest,
    ) -> Result<Ack, AppError> {
        let url = self.url(&format!("/department-head/files/{}/review", segment(id)));
        let ack: Ack = self.json(self.client.put(url).json(review)).await?;
        tracing::info!(id, status = %review.submission_status.as_str(), "File reviewed");
        Ok(ack)
    }

    #[tracing::instrument(skip(self, reminder))]
    async fn send_reminder_to_lecturers(
        &self,
        reminder: &ReminderRequest,
    ) -> Result<Ack, AppError> {
        self.json(
            self.client
                .post(self.url("/department-head/reminders"))
                .json(reminder),
        )
        .await
    }
}
