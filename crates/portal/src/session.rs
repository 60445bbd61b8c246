use shared_types::{ApiResponse, User};
use std::fmt;
use std::sync::Arc;

use crate::api::ApiClient;
use crate::store::SessionStore;

pub const TOKEN_KEY: &str = "token";

/// Which dashboard's last-selected tab to remember.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKey {
    /// Department head, manager and admin dashboards.
    Dashboard,
    Lecturer,
}

impl TabKey {
    pub const ALL: [TabKey; 2] = [TabKey::Dashboard, TabKey::Lecturer];

    pub fn as_str(&self) -> &'static str {
        match self {
            TabKey::Dashboard => "dashboardActiveTab",
            TabKey::Lecturer => "lecturerDashboardActiveTab",
        }
    }
}

/// Typed view over the persisted key/value store.
///
/// Created once at app start and handed to everything that needs the
/// token or a remembered tab. Cheap to clone.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    login_path: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.token().is_some())
            .field("login_path", &self.login_path)
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            login_path: crate::config::config().session.login_path.clone(),
        }
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// The bearer token, if one is stored and not blank.
    pub fn token(&self) -> Option<String> {
        self.store
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn clear_token(&self) {
        self.store.remove(TOKEN_KEY);
    }

    pub fn active_tab(&self, key: TabKey) -> Option<String> {
        self.store.get(key.as_str())
    }

    pub fn set_active_tab(&self, key: TabKey, tab: &str) {
        self.store.set(key.as_str(), tab);
    }

    /// Logout: forget the token and every remembered tab.
    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        for key in TabKey::ALL {
            self.store.remove(key.as_str());
        }
    }
}

/// Result of the gate that guards every protected page.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Authenticated(User),
    /// Send the user to the login entry point. No error text is shown.
    Redirect { to: String },
}

impl SessionOutcome {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionOutcome::Authenticated(user) => Some(user),
            SessionOutcome::Redirect { .. } => None,
        }
    }
}

/// Verify the stored token and resolve the signed-in user.
///
/// A missing token redirects without touching the network. Any failure of
/// the "who am I" call redirects the same way; an explicit 401 also drops
/// the stale token.
#[tracing::instrument(skip_all)]
pub async fn ensure_session(session: &Session, api: &dyn ApiClient) -> SessionOutcome {
    let redirect = || SessionOutcome::Redirect {
        to: session.login_path().to_string(),
    };

    if session.token().is_none() {
        tracing::debug!("no session token, redirecting to login");
        return redirect();
    }

    match api.get_me().await.and_then(ApiResponse::into_data) {
        Ok(raw) => {
            let user = User::from(raw);
            tracing::debug!(user_id = %user.id, role = %user.role.as_str(), "session verified");
            SessionOutcome::Authenticated(user)
        }
        Err(e) => {
            if e.is_unauthorized() {
                session.clear_token();
            }
            tracing::info!(kind = %e.kind, error = %e.message, "session check failed, redirecting to login");
            redirect()
        }
    }
}
