use shared_types::{
    Announcement, AnnouncementQuery, DepartmentProgress, DepartmentQuery, Standard,
    StandardQuery, User,
};
use std::sync::Arc;

use super::Section;
use crate::api::{settle, ApiClient};
use crate::mount::MountScope;
use crate::session::{Session, TabKey};

/// Quality-assurance manager's overview.
pub struct ManagerDashboard {
    api: Arc<dyn ApiClient>,
    session: Session,
    scope: MountScope,
    user: User,
    section: Section,
    progress: DepartmentProgress,
    standards: Vec<Standard>,
    announcements: Vec<Announcement>,
    loading: bool,
}

impl ManagerDashboard {
    pub fn new(api: Arc<dyn ApiClient>, session: Session, user: User) -> Self {
        let section = Section::restore(&session);
        Self {
            api,
            session,
            scope: MountScope::new(),
            user,
            section,
            progress: DepartmentProgress::default(),
            standards: Vec::new(),
            announcements: Vec::new(),
            loading: false,
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn load(&mut self) {
        self.loading = true;
        let api = Arc::clone(&self.api);
        let progress_query = DepartmentQuery::default();
        let announcement_query = AnnouncementQuery {
            limit: Some(5),
            active: Some(true),
        };
        let standard_query = StandardQuery::default();
        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    api.get_department_progress(&progress_query),
                    api.get_standards(&standard_query),
                    api.get_announcements(&announcement_query),
                )
            })
            .await;
        self.loading = false;
        let Some((progress, standards, announcements)) = fetched else {
            return;
        };
        self.progress = settle("progress", progress).unwrap_or_default();
        self.standards = settle("standards", standards).unwrap_or_default();
        self.announcements = settle("announcements", announcements).unwrap_or_default();
    }

    pub fn select_section(&mut self, section: Section) {
        self.section = section;
        self.session.set_active_tab(TabKey::Dashboard, section.as_str());
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn progress(&self) -> &DepartmentProgress {
        &self.progress
    }

    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }
}
