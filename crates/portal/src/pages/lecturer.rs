use shared_types::{
    Announcement, AnnouncementQuery, FileQuery, FilterProfile, Standard, StandardQuery,
    SubmissionRecord, SystemConfig, Tab, User,
};
use std::sync::Arc;

use super::FileBrowser;
use crate::api::{settle, ApiClient};
use crate::mount::MountScope;
use crate::session::{Session, TabKey};

const ANNOUNCEMENT_LIMIT: u32 = 5;

/// Headline counters above the lecturer's file list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LecturerSummary {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    /// Rejected or sent back for revision.
    pub returned: usize,
}

impl LecturerSummary {
    pub fn of(records: &[SubmissionRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            if r.submission_status == shared_types::SubmissionStatus::Approved {
                acc.approved += 1;
            } else if r.submission_status.is_pending() {
                acc.pending += 1;
            } else if r.submission_status.is_returned() {
                acc.returned += 1;
            }
            acc
        })
    }
}

pub struct LecturerDashboard {
    api: Arc<dyn ApiClient>,
    session: Session,
    scope: MountScope,
    user: User,
    browser: FileBrowser,
    announcements: Vec<Announcement>,
    system_config: SystemConfig,
    standards: Vec<Standard>,
    loading: bool,
}

impl LecturerDashboard {
    /// Mount the dashboard, restoring the last selected tab.
    pub fn new(api: Arc<dyn ApiClient>, session: Session, user: User) -> Self {
        let tab = session
            .active_tab(TabKey::Lecturer)
            .map(|raw| Tab::from_str_or_default(&raw))
            .filter(|tab| Tab::LECTURER.contains(tab))
            .unwrap_or_default();
        Self {
            api,
            session,
            scope: MountScope::new(),
            user,
            browser: FileBrowser::new(FilterProfile::LECTURER).with_tab(tab),
            announcements: Vec::new(),
            system_config: SystemConfig::default(),
            standards: Vec::new(),
            loading: false,
        }
    }

    /// Fetch files, announcements, upload limits and standards in parallel.
    ///
    /// A failed dataset leaves its section empty; the others still load.
    #[tracing::instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn load(&mut self) {
        self.loading = true;
        let api = Arc::clone(&self.api);
        let files_query = FileQuery::default();
        let announcement_query = AnnouncementQuery {
            limit: Some(ANNOUNCEMENT_LIMIT),
            active: Some(true),
        };
        let standard_query = StandardQuery { active: Some(true) };

        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    api.get_files(&files_query),
                    api.get_announcements(&announcement_query),
                    api.get_system_config(),
                    api.get_standards(&standard_query),
                )
            })
            .await;

        self.loading = false;
        let Some((files, announcements, config, standards)) = fetched else {
            tracing::debug!("lecturer dashboard unmounted during load");
            return;
        };

        self.browser
            .replace(settle("files", files).unwrap_or_default());
        self.announcements = settle("announcements", announcements).unwrap_or_default();
        self.system_config = settle("system_config", config).unwrap_or_default();
        self.standards = settle("standards", standards).unwrap_or_default();
    }

    /// Switch tab and remember it across reloads.
    pub fn select_tab(&mut self, tab: Tab) {
        self.browser.set_tab(tab);
        self.session.set_active_tab(TabKey::Lecturer, tab.as_str());
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    pub fn scope(&self) -> &MountScope {
        &self.scope
    }

    pub fn user(&self) -> &User {
        &self.user
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

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    pub fn system_config(&self) -> &SystemConfig {
        &self.system_config
    }

    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    pub fn summary(&self) -> LecturerSummary {
        LecturerSummary::of(self.browser.records())
    }
}
