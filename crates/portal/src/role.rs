use shared_types::{Dashboard, User};

use crate::session::SessionOutcome;

/// Where the session gate sends the user next.
#[derive(Debug, Clone, PartialEq)]
pub enum Landing {
    Dashboard { user: User, dashboard: Dashboard },
    Login { to: String },
}

/// Dashboard variant for an authenticated user.
///
/// Unknown roles land on the lecturer dashboard; see [`UserRole::dashboard`].
///
/// [`UserRole::dashboard`]: shared_types::UserRole::dashboard
pub fn resolve_dashboard(user: &User) -> Dashboard {
    user.dashboard()
}

/// Turn a gate outcome into a landing. An unauthenticated outcome never
/// reaches a dashboard.
pub fn landing(outcome: SessionOutcome) -> Landing {
    match outcome {
        SessionOutcome::Authenticated(user) => {
            let dashboard = resolve_dashboard(&user);
            if let shared_types::UserRole::Unrecognized(raw) = &user.role {
                tracing::warn!(user_id = %user.id, role = %raw, "unrecognized role, using lecturer dashboard");
            }
            Landing::Dashboard { user, dashboard }
        }
        SessionOutcome::Redirect { to } => Landing::Login { to },
    }
}
