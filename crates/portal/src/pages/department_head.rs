use shared_types::{
    lecturers_without_submissions, Announcement, AnnouncementQuery, DepartmentProgress,
    DepartmentQuery, LecturerStats, QaOverview, ReminderRequest, TimelineEntry, User,
};
use std::sync::Arc;

use super::Section;
use crate::api::{acknowledge, settle, ApiClient, ValidateRequest};
use crate::mount::MountScope;
use crate::notice::Notice;
use crate::session::{Session, TabKey};

/// Department head's landing page: progress, QA coverage, per-lecturer
/// counters and reminders.
pub struct DepartmentHeadDashboard {
    api: Arc<dyn ApiClient>,
    session: Session,
    scope: MountScope,
    user: User,
    query: DepartmentQuery,
    section: Section,
    progress: DepartmentProgress,
    qa_overview: QaOverview,
    timeline: Vec<TimelineEntry>,
    lecturer_stats: Vec<LecturerStats>,
    announcements: Vec<Announcement>,
    loading: bool,
}

impl DepartmentHeadDashboard {
    pub fn new(api: Arc<dyn ApiClient>, session: Session, user: User) -> Self {
        let section = Section::restore(&session);
        Self {
            api,
            session,
            scope: MountScope::new(),
            user,
            query: DepartmentQuery::default(),
            section,
            progress: DepartmentProgress::default(),
            qa_overview: QaOverview::default(),
            timeline: Vec::new(),
            lecturer_stats: Vec::new(),
            announcements: Vec::new(),
            loading: false,
        }
    }

    /// Limit statistics to one academic year / semester.
    pub fn with_query(mut self, query: DepartmentQuery) -> Self {
        self.query = query;
        self
    }

    #[tracing::instrument(skip(self), fields(user_id = %self.user.id))]
    pub async fn load(&mut self) {
        self.loading = true;
        let api = Arc::clone(&self.api);
        let announcement_query = AnnouncementQuery {
            limit: Some(5),
            active: Some(true),
        };
        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    api.get_department_progress(&self.query),
                    api.get_department_qa_overview(&self.query),
                    api.get_department_timeline(&self.query),
                    api.get_lecturer_submission_stats(&self.query),
                    api.get_announcements(&announcement_query),
                )
            })
            .await;
        self.loading = false;
        let Some((progress, overview, timeline, stats, announcements)) = fetched else {
            return;
        };
        self.progress = settle("progress", progress).unwrap_or_default();
        self.qa_overview = settle("qa_overview", overview).unwrap_or_default();
        self.timeline = settle("timeline", timeline).unwrap_or_default();
        self.lecturer_stats = settle("lecturer_stats", stats).unwrap_or_default();
        self.announcements = settle("announcements", announcements).unwrap_or_default();
    }

    /// Refresh only the per-lecturer counters.
    async fn refresh_stats(&mut self) {
        let api = Arc::clone(&self.api);
        if let Some(stats) = self
            .scope
            .run(api.get_lecturer_submission_stats(&self.query))
            .await
        {
            self.lecturer_stats = settle("lecturer_stats", stats).unwrap_or_default();
        }
    }

    #[tracing::instrument(skip(self, reminder), fields(reminder_type = ?reminder.reminder_type))]
    pub async fn send_reminder(&mut self, reminder: ReminderRequest) -> Notice {
        if let Err(e) = reminder.validate_request() {
            tracing::warn!(fields = ?e.field_errors, "reminder rejected before sending");
            return Notice::InvalidReminder;
        }
        let api = Arc::clone(&self.api);
        match acknowledge("reminder", api.send_reminder_to_lecturers(&reminder).await) {
            Ok(()) => {
                self.refresh_stats().await;
                Notice::ReminderSent
            }
            Err(_) => Notice::ReminderFailed,
        }
    }

    pub fn select_section(&mut self, section: Section) {
        self.section = section;
        self.session.set_active_tab(TabKey::Dashboard, section.as_str());
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

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn progress(&self) -> &DepartmentProgress {
        &self.progress
    }

    pub fn qa_overview(&self) -> &QaOverview {
        &self.qa_overview
    }

    pub fn timeline(&self) -> &[TimelineEntry] {
        &self.timeline
    }

    pub fn lecturer_stats(&self) -> &[LecturerStats] {
        &self.lecturer_stats
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Candidates for a "not submitted" reminder.
    pub fn idle_lecturers(&self) -> Vec<&LecturerStats> {
        lecturers_without_submissions(&self.lecturer_stats)
    }
}
