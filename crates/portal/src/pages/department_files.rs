use chrono::NaiveDate;
use shared_types::{
    ApiResponse, CsvExport, FileQuery, FilterProfile, ReviewFileRequest, SubmissionStatus, Tab,
};
use std::sync::Arc;

use super::FileBrowser;
use crate::api::{acknowledge, ApiClient, ValidateRequest};
use crate::mount::MountScope;
use crate::notice::Notice;

/// Outcome of the last department list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loaded,
    Failed,
    /// The backend could not be reached at all. Offers a manual retry.
    BackendUnreachable,
}

impl LoadState {
    /// Message shown in place of the list, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LoadState::Idle | LoadState::Loaded => None,
            LoadState::Failed => Some("Không thể tải danh sách hồ sơ. Vui lòng thử lại."),
            LoadState::BackendUnreachable => Some(
                "Không thể kết nối tới máy chủ. Vui lòng kiểm tra backend đã được khởi động và thử lại.",
            ),
        }
    }

    pub fn can_retry(&self) -> bool {
        matches!(self, LoadState::Failed | LoadState::BackendUnreachable)
    }
}

/// Department head's view of every file submitted in their department.
pub struct DepartmentFilesPage {
    api: Arc<dyn ApiClient>,
    scope: MountScope,
    query: FileQuery,
    browser: FileBrowser,
    state: LoadState,
}

impl DepartmentFilesPage {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            scope: MountScope::new(),
            query: FileQuery::default(),
            browser: FileBrowser::new(FilterProfile::DEPARTMENT_HEAD),
            state: LoadState::Idle,
        }
    }

    pub fn with_query(mut self, query: FileQuery) -> Self {
        self.query = query;
        self
    }

    /// Fetch the list. Unlike other pages, an unreachable backend is told
    /// apart from other failures.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) -> LoadState {
        let api = Arc::clone(&self.api);
        let Some(result) = self.scope.run(api.get_department_head_files(&self.query)).await else {
            return self.state;
        };
        self.state = match result.and_then(ApiResponse::into_data) {
            Ok(records) => {
                self.browser.replace(records);
                LoadState::Loaded
            }
            Err(e) if e.is_network() => {
                tracing::error!(error = %e.message, "backend unreachable");
                self.browser.clear_records();
                LoadState::BackendUnreachable
            }
            Err(e) => {
                tracing::warn!(kind = %e.kind, error = %e.message, "department files fetch failed");
                self.browser.clear_records();
                LoadState::Failed
            }
        };
        self.state
    }

    pub async fn retry(&mut self) -> LoadState {
        self.load().await
    }

    /// Record a review decision, then re-fetch the list.
    #[tracing::instrument(skip(self, notes))]
    pub async fn review(
        &mut self,
        id: &str,
        status: SubmissionStatus,
        notes: Option<String>,
    ) -> Notice {
        let review = ReviewFileRequest::new(status, notes);
        if let Err(e) = review.validate_request() {
            tracing::warn!(fields = ?e.field_errors, "review rejected before sending");
            return Notice::InvalidReview;
        }
        let api = Arc::clone(&self.api);
        match acknowledge("review", api.review_department_file(id, &review).await) {
            Ok(()) => {
                self.load().await;
                Notice::Reviewed
            }
            Err(_) => Notice::ReviewFailed,
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.browser.set_tab(tab);
    }

    pub fn export_csv(&self, date: NaiveDate) -> CsvExport {
        self.browser.export_csv(date)
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn browser(&self) -> &FileBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut FileBrowser {
        &mut self.browser
    }
}
