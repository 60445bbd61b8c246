use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{DepartmentRef, PersonRef};

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

/// Notice broadcast to users on their dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub content: String,
    /// "low", "normal", "high" or "urgent".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub target_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<PersonRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Announcement {
    pub fn is_urgent(&self) -> bool {
        matches!(self.priority.as_deref(), Some("high") | Some("urgent"))
    }
}

// ---------------------------------------------------------------------------
// System configuration
// ---------------------------------------------------------------------------

/// Upload limits published by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    /// Bytes per file.
    #[serde(default = "default_max_file_size", deserialize_with = "max_file_size_or_default")]
    pub max_file_size: u64,
    #[serde(
        default = "default_max_file_per_upload",
        deserialize_with = "max_file_per_upload_or_default"
    )]
    pub max_file_per_upload: usize,
    /// Extensions (`pdf`, `.docx`) or MIME types (`application/pdf`).
    /// Empty means anything goes.
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub allowed_file_types: Vec<String>,
}

fn default_max_file_size() -> u64 {
    50 * 1024 * 1024
}

fn default_max_file_per_upload() -> usize {
    10
}

fn max_file_size_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Option::<u64>::deserialize(d).map(|v| v.unwrap_or_else(default_max_file_size))
}

fn max_file_per_upload_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    Option::<usize>::deserialize(d).map(|v| v.unwrap_or_else(default_max_file_per_upload))
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            max_file_per_upload: default_max_file_per_upload(),
            allowed_file_types: Vec::new(),
        }
    }
}

/// Why a batch of files may not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadViolation {
    NoFiles,
    TooManyFiles { max: usize },
    FileTooLarge { file_name: String, max: u64 },
    TypeNotAllowed { file_name: String },
}

fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

impl SystemConfig {
    /// Whether a file with this name and content type is accepted.
    pub fn allows_type(&self, file_name: &str, content_type: Option<&str>) -> bool {
        if self.allowed_file_types.is_empty() {
            return true;
        }
        let ext = extension_of(file_name);
        self.allowed_file_types.iter().any(|allowed| {
            let allowed = allowed.trim().to_lowercase();
            if allowed.contains('/') {
                content_type.is_some_and(|ct| ct.to_lowercase() == allowed)
            } else {
                ext.as_deref() == Some(allowed.trim_start_matches('.'))
            }
        })
    }

    /// Check a batch of `(file name, size in bytes, content type)` before upload.
    pub fn check_upload<'a, I>(&self, files: I) -> Result<(), UploadViolation>
    where
        I: IntoIterator<Item = (&'a str, u64, Option<&'a str>)>,
    {
        let files: Vec<_> = files.into_iter().collect();
        if files.is_empty() {
            return Err(UploadViolation::NoFiles);
        }
        if files.len() > self.max_file_per_upload {
            return Err(UploadViolation::TooManyFiles {
                max: self.max_file_per_upload,
            });
        }
        for (file_name, size, content_type) in files {
            if size > self.max_file_size {
                return Err(UploadViolation::FileTooLarge {
                    file_name: file_name.to_string(),
                    max: self.max_file_size,
                });
            }
            if !self.allows_type(file_name, content_type) {
                return Err(UploadViolation::TypeNotAllowed {
                    file_name: file_name.to_string(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Standards and criteria
// ---------------------------------------------------------------------------

/// Quality-assurance standard (e.g. "TC3").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standard {
    #[serde(alias = "_id")]
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Criterion within a standard (e.g. "TC3.2").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    #[serde(alias = "_id")]
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default, alias = "standard", skip_serializing_if = "Option::is_none")]
    pub standard_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Department statistics
// ---------------------------------------------------------------------------

/// Department-wide submission progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DepartmentProgress {
    pub department: Option<DepartmentRef>,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub total_lecturers: u32,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub lecturers_submitted: u32,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub total_files: u32,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub approved_files: u32,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub pending_files: u32,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub rejected_files: u32,
    /// Percentage 0-100.
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub completion_rate: f64,
}

/// Evidence coverage of one QA standard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StandardCoverage {
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub code: String,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub file_count: u32,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub approved_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QaOverview {
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub standards: Vec<StandardCoverage>,
    #[serde(deserialize_with = "crate::common::null_as_default")]
    pub total_files: u32,
}

impl QaOverview {
    /// Standards with no evidence at all.
    pub fn uncovered(&self) -> impl Iterator<Item = &StandardCoverage> {
        self.standards.iter().filter(|s| s.file_count == 0)
    }
}

/// Submissions per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub submitted: u32,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub approved: u32,
}

/// Per-lecturer submission counters for the department head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerStats {
    #[serde(alias = "_id", alias = "lecturerId")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub total_files: u32,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub approved_files: u32,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub pending_files: u32,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub rejected_files: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_submission_at: Option<DateTime<Utc>>,
}

/// Lecturers that have not submitted anything yet, in input order.
pub fn lecturers_without_submissions(stats: &[LecturerStats]) -> Vec<&LecturerStats> {
    stats.iter().filter(|s| s.total_files == 0).collect()
}
