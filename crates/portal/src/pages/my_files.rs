use chrono::NaiveDate;
use shared_types::{
    Criterion, CriteriaQuery, CsvExport, DownloadedFile, FileQuery, FilterProfile, Standard,
    StandardQuery, SystemConfig, UpdateFileRequest, UploadRequest,
};
use std::sync::Arc;

use super::FileBrowser;
use crate::api::{acknowledge, settle, ApiClient};
use crate::mount::MountScope;
use crate::notice::Notice;

/// The lecturer's own evidence files: upload, edit, delete, download and
/// export.
pub struct MyFilesPage {
    api: Arc<dyn ApiClient>,
    scope: MountScope,
    query: FileQuery,
    browser: FileBrowser,
    system_config: SystemConfig,
    standards: Vec<Standard>,
    criteria: Vec<Criterion>,
    loading: bool,
}

impl MyFilesPage {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            scope: MountScope::new(),
            query: FileQuery::default(),
            browser: FileBrowser::new(FilterProfile::LECTURER),
            system_config: SystemConfig::default(),
            standards: Vec::new(),
            criteria: Vec::new(),
            loading: false,
        }
    }

    /// Server-side scope of the listing (year, semester, status).
    pub fn with_query(mut self, query: FileQuery) -> Self {
        self.query = query;
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) {
        self.loading = true;
        let api = Arc::clone(&self.api);
        let standard_query = StandardQuery { active: Some(true) };
        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    api.get_files(&self.query),
                    api.get_system_config(),
                    api.get_standards(&standard_query),
                )
            })
            .await;
        self.loading = false;
        let Some((files, config, standards)) = fetched else {
            return;
        };
        self.browser
            .replace(settle("files", files).unwrap_or_default());
        self.system_config = settle("system_config", config).unwrap_or_default();
        self.standards = settle("standards", standards).unwrap_or_default();
    }

    /// Re-fetch only the file list, after a mutation.
    async fn refresh(&mut self) {
        let api = Arc::clone(&self.api);
        if let Some(files) = self.scope.run(api.get_files(&self.query)).await {
            self.browser
                .replace(settle("files", files).unwrap_or_default());
        }
    }

    /// Criteria of one standard, for the upload form's second picker.
    pub async fn load_criteria(&mut self, standard_id: &str) {
        let api = Arc::clone(&self.api);
        let query = CriteriaQuery {
            standard_id: Some(standard_id.to_string()),
            active: Some(true),
        };
        if let Some(result) = self
            .scope
            .run(api.get_criteria_by_standard(standard_id, &query))
            .await
        {
            self.criteria = settle("criteria", result).unwrap_or_default();
        }
    }

    /// Validate against the backend's upload limits, then send.
    #[tracing::instrument(skip(self, request), fields(files = request.files.len()))]
    pub async fn upload(&mut self, request: UploadRequest) -> Notice {
        let checked = self.system_config.check_upload(
            request
                .files
                .iter()
                .map(|f| (f.file_name.as_str(), f.size(), f.content_type.as_deref())),
        );
        if let Err(violation) = checked {
            tracing::debug!(?violation, "upload rejected client-side");
            return Notice::from(violation);
        }

        let api = Arc::clone(&self.api);
        match acknowledge("upload", api.upload_files(&request).await) {
            Ok(()) => {
                self.refresh().await;
                Notice::Uploaded
            }
            Err(_) => Notice::UploadFailed,
        }
    }

    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&mut self, id: &str, patch: UpdateFileRequest) -> Notice {
        let api = Arc::clone(&self.api);
        match acknowledge("update", api.update_file(id, &patch).await) {
            Ok(()) => {
                self.refresh().await;
                Notice::Updated
            }
            Err(_) => Notice::UpdateFailed,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&mut self, id: &str) -> Notice {
        let api = Arc::clone(&self.api);
        match acknowledge("delete", api.delete_file(id).await) {
            Ok(()) => {
                self.refresh().await;
                Notice::Deleted
            }
            Err(_) => Notice::DeleteFailed,
        }
    }

    /// Fetch a file's bytes, saved under its original name.
    pub async fn download(&self, id: &str) -> Result<DownloadedFile, Notice> {
        let record = self.browser.find(id).ok_or(Notice::FileNotFound)?;
        self.api
            .download_file(&record.id, &record.original_name)
            .await
            .map_err(|e| {
                tracing::warn!(id, error = %e, "download failed");
                Notice::DownloadFailed
            })
    }

    pub fn export_csv(&self, date: NaiveDate) -> CsvExport {
        self.browser.export_csv(date)
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    pub fn scope(&self) -> &MountScope {
        &self.scope
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn browser(&self) -> &FileBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut FileBrowser {
        &mut self.browser
    }

    pub fn system_config(&self) -> &SystemConfig {
        &self.system_config
    }

    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }
}
