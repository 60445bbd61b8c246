use shared_types::{
    Announcement, AnnouncementQuery, CriteriaQuery, Criterion, Standard, StandardQuery,
    SystemConfig, User,
};
use std::sync::Arc;

use super::Section;
use crate::api::{settle, ApiClient};
use crate::mount::MountScope;
use crate::session::{Session, TabKey};

/// System administrator's dashboard over upload limits and the QA catalogue.
pub struct AdminDashboard {
    api: Arc<dyn ApiClient>,
    session: Session,
    scope: MountScope,
    user: User,
    section: Section,
    system_config: SystemConfig,
    standards: Vec<Standard>,
    criteria: Vec<Criterion>,
    announcements: Vec<Announcement>,
    loading: bool,
}

impl AdminDashboard {
    pub fn new(api: Arc<dyn ApiClient>, session: Session, user: User) -> Self {
        let section = Section::restore(&session);
        Self {
            api,
            session,
            scope: MountScope::new(),
            user,
            section,
            system_config: SystemConfig::default(),
            standards: Vec::new(),
            criteria: Vec::new(),
            announcements: Vec::new(),
            loading: false,
        }
    }

    #[tracing::instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn load(&mut self) {
        self.loading = true;
        let api = Arc::clone(&self.api);
        let announcement_query = AnnouncementQuery::default();
        let standard_query = StandardQuery::default();
        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    api.get_system_config(),
                    api.get_standards(&standard_query),
                    api.get_announcements(&announcement_query),
                )
            })
            .await;
        self.loading = false;
        let Some((config, standards, announcements)) = fetched else {
            return;
        };
        self.system_config = settle("system_config", config).unwrap_or_default();
        self.standards = settle("standards", standards).unwrap_or_default();
        self.announcements = settle("announcements", announcements).unwrap_or_default();
    }

    /// Criteria catalogue, optionally narrowed to one standard.
    pub async fn load_criteria(&mut self, standard_id: Option<&str>) {
        let query = CriteriaQuery {
            standard_id: standard_id.map(str::to_string),
            ..Default::default()
        };
        let api = Arc::clone(&self.api);
        if let Some(result) = self.scope.run(api.get_criteria(&query)).await {
            self.criteria = settle("criteria", result).unwrap_or_default();
        }
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

    pub fn system_config(&self) -> &SystemConfig {
        &self.system_config
    }

    pub fn standards(&self) -> &[Standard] {
        &self.standards
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }
}
