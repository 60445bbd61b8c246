//! One controller per screen.
//!
//! Controllers own their fetched data and a [`MountScope`](crate::MountScope);
//! a presentation layer reads from them and forwards user actions.

mod admin;
mod browser;
mod department_files;
mod department_head;
mod lecturer;
mod manager;
mod my_files;

pub use admin::AdminDashboard;
pub use browser::FileBrowser;
pub use department_files::{DepartmentFilesPage, LoadState};
pub use department_head::DepartmentHeadDashboard;
pub use lecturer::{LecturerDashboard, LecturerSummary};
pub use manager::ManagerDashboard;
pub use my_files::MyFilesPage;

use crate::session::{Session, TabKey};

/// Panel selected on the admin, manager and department-head dashboards.
/// Remembered under `dashboardActiveTab`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Overview,
    Files,
    Lecturers,
    Standards,
    Announcements,
    Settings,
}

impl Section {
    /// Unknown values open the overview.
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "files" => Section::Files,
            "lecturers" => Section::Lecturers,
            "standards" => Section::Standards,
            "announcements" => Section::Announcements,
            "settings" => Section::Settings,
            _ => Section::Overview,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Files => "files",
            Section::Lecturers => "lecturers",
            Section::Standards => "standards",
            Section::Announcements => "announcements",
            Section::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Overview => "Tổng quan",
            Section::Files => "Hồ sơ minh chứng",
            Section::Lecturers => "Giảng viên",
            Section::Standards => "Tiêu chuẩn",
            Section::Announcements => "Thông báo",
            Section::Settings => "Cấu hình",
        }
    }

    pub(crate) fn restore(session: &Session) -> Self {
        session
            .active_tab(TabKey::Dashboard)
            .map(|raw| Self::from_str_or_default(&raw))
            .unwrap_or_default()
    }
}
