use serde::{Deserialize, Serialize};

/// Role used when the backend reports neither `role` nor `roles`.
pub const DEFAULT_ROLE: &str = "lecturer";

/// Academic role controlling which dashboard a user lands on.
///
/// - `Admin`: system configuration, standards, announcements.
/// - `Manager`: cross-department quality-assurance overview.
/// - `DepartmentHead`: reviews and approves the department's submissions.
/// - `Lecturer`: submits and manages their own evidence files.
/// - `Unrecognized`: any role string this client does not know. Treated as
///   the least-privileged role rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UserRole {
    Admin,
    Manager,
    DepartmentHead,
    #[default]
    Lecturer,
    Unrecognized(String),
}

impl UserRole {
    /// Parse a backend role string. Never fails.
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "admin" => UserRole::Admin,
            "manager" => UserRole::Manager,
            "department_head" => UserRole::DepartmentHead,
            "lecturer" => UserRole::Lecturer,
            other => UserRole::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::DepartmentHead => "department_head",
            UserRole::Lecturer => "lecturer",
            UserRole::Unrecognized(raw) => raw,
        }
    }

    /// Dashboard variant for this role.
    pub fn dashboard(&self) -> Dashboard {
        match self {
            UserRole::Admin => Dashboard::Admin,
            UserRole::Manager => Dashboard::Manager,
            UserRole::DepartmentHead => Dashboard::DepartmentHead,
            UserRole::Lecturer => Dashboard::Lecturer,
            // Fail open to the least-privileged view.
            UserRole::Unrecognized(_) => Dashboard::Lecturer,
        }
    }

    /// Vietnamese display name.
    pub fn label(&self) -> &str {
        match self {
            UserRole::Admin => "Quản trị viên",
            UserRole::Manager => "Cán bộ quản lý",
            UserRole::DepartmentHead => "Trưởng khoa",
            UserRole::Lecturer => "Giảng viên",
            UserRole::Unrecognized(raw) => raw,
        }
    }
}

/// The four dashboard variants a signed-in user can be routed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Dashboard {
    Admin,
    Manager,
    DepartmentHead,
    Lecturer,
}

/// Department reference as populated by the backend (`{code, name}`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentRef {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// User exactly as the "who am I" endpoint returns it.
///
/// Older accounts carry a single `role`, newer ones a `roles` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default, deserialize_with = "crate::common::null_as_default", alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::common::null_as_default", alias = "fullName")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default, alias = "departmentId")]
    pub department: Option<DepartmentRef>,
}

impl RawUser {
    /// First entry of `roles` when non-empty, else `role`, else the default.
    pub fn effective_role(&self) -> &str {
        match self.roles.as_deref() {
            Some([first, ..]) => first.as_str(),
            _ => self.role.as_deref().unwrap_or(DEFAULT_ROLE),
        }
    }
}

/// Canonical signed-in user. Components only ever see this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentRef>,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        let role = UserRole::from_str_or_default(raw.effective_role());
        Self {
            id: raw.id,
            name: raw.name,
            email: raw.email,
            role,
            department: raw.department,
        }
    }
}

impl User {
    pub fn dashboard(&self) -> Dashboard {
        self.role.dashboard()
    }
}
