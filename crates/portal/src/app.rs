use shared_types::{AppError, Dashboard, PortalConfig};
use std::sync::Arc;

use crate::api::{ApiClient, HttpApiClient};
use crate::pages::{
    AdminDashboard, DepartmentFilesPage, DepartmentHeadDashboard, LecturerDashboard,
    ManagerDashboard, MyFilesPage,
};
use crate::role::{landing, Landing};
use crate::session::{ensure_session, Session};
use crate::store::FileStore;

/// What the entry route renders after the session gate.
pub enum PortalView {
    Redirect { to: String },
    Admin(AdminDashboard),
    Manager(ManagerDashboard),
    DepartmentHead(DepartmentHeadDashboard),
    Lecturer(LecturerDashboard),
}

impl PortalView {
    pub fn dashboard(&self) -> Option<Dashboard> {
        match self {
            PortalView::Redirect { .. } => None,
            PortalView::Admin(_) => Some(Dashboard::Admin),
            PortalView::Manager(_) => Some(Dashboard::Manager),
            PortalView::DepartmentHead(_) => Some(Dashboard::DepartmentHead),
            PortalView::Lecturer(_) => Some(Dashboard::Lecturer),
        }
    }
}

/// Application root: owns the session and the API client for the
/// lifetime of the app.
#[derive(Clone)]
pub struct Portal {
    api: Arc<dyn ApiClient>,
    session: Session,
}

impl Portal {
    pub fn new(api: Arc<dyn ApiClient>, session: Session) -> Self {
        Self { api, session }
    }

    /// Wire a file-backed session and the HTTP client from config.
    pub fn from_config(config: &PortalConfig) -> Result<Self, AppError> {
        let store = Arc::new(FileStore::open(&config.session.store_path));
        let session = Session::new(store).with_login_path(config.session.login_path.clone());
        let api = HttpApiClient::new(&config.api, session.clone())?;
        tracing::info!(base_url = %api.base_url(), "portal initialized");
        Ok(Self::new(Arc::new(api), session))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> Arc<dyn ApiClient> {
        Arc::clone(&self.api)
    }

    /// Store the token handed back by the login flow.
    pub fn sign_in(&self, token: &str) {
        self.session.set_token(token);
    }

    /// Forget the token and every remembered tab.
    pub fn logout(&self) {
        self.session.clear();
        tracing::info!("signed out");
    }

    /// Run the session gate, then mount and load the dashboard for the
    /// user's role.
    #[tracing::instrument(skip(self))]
    pub async fn open(&self) -> PortalView {
        let outcome = ensure_session(&self.session, &*self.api).await;
        let (user, dashboard) = match landing(outcome) {
            Landing::Login { to } => return PortalView::Redirect { to },
            Landing::Dashboard { user, dashboard } => (user, dashboard),
        };

        let api = self.api();
        let session = self.session.clone();
        match dashboard {
            Dashboard::Admin => {
                let mut page = AdminDashboard::new(api, session, user);
                page.load().await;
                PortalView::Admin(page)
            }
            Dashboard::Manager => {
                let mut page = ManagerDashboard::new(api, session, user);
                page.load().await;
                PortalView::Manager(page)
            }
            Dashboard::DepartmentHead => {
                let mut page = DepartmentHeadDashboard::new(api, session, user);
                page.load().await;
                PortalView::DepartmentHead(page)
            }
            Dashboard::Lecturer => {
                let mut page = LecturerDashboard::new(api, session, user);
                page.load().await;
                PortalView::Lecturer(page)
            }
        }
    }

    /// The lecturer's file management page, unloaded.
    pub fn my_files(&self) -> MyFilesPage {
        MyFilesPage::new(self.api())
    }

    /// The department head's file review page, unloaded.
    pub fn department_files(&self) -> DepartmentFilesPage {
        DepartmentFilesPage::new(self.api())
    }
}
