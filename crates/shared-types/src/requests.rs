use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "validation")]
use validator::{Validate, ValidationError};

use crate::{ActivityType, Semester, SubmissionStatus};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query string for file listings. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qa_standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Scope for department-head statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Partial update of a file's classification. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qa_standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_status: Option<SubmissionStatus>,
}

/// Department head's decision on a submitted file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct ReviewFileRequest {
    #[cfg_attr(
        feature = "validation",
        validate(custom(function = "review_outcome"))
    )]
    pub submission_status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

impl ReviewFileRequest {
    pub fn new(submission_status: SubmissionStatus, review_notes: Option<String>) -> Self {
        Self {
            submission_status,
            review_notes: review_notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// A review moves a file to under_review, approved, rejected or
/// revision_required; nothing else.
#[cfg(feature = "validation")]
fn review_outcome(status: &SubmissionStatus) -> Result<(), ValidationError> {
    match status {
        SubmissionStatus::UnderReview
        | SubmissionStatus::Approved
        | SubmissionStatus::Rejected
        | SubmissionStatus::RevisionRequired => Ok(()),
        _ => Err(ValidationError::new("review_outcome")
            .with_message("Trạng thái không phải kết quả duyệt".into())),
    }
}

/// Audience of a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderType {
    /// Every lecturer in the department.
    All,
    /// Lecturers with no submission in the current period.
    NotSubmitted,
    /// Only the lecturers listed in `lecturer_ids`.
    Specific,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "validation", derive(Validate))]
#[cfg_attr(
    feature = "validation",
    validate(schema(function = "specific_needs_lecturers"))
)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub reminder_type: ReminderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lecturer_ids: Option<Vec<String>>,
    #[cfg_attr(feature = "validation", validate(custom(function = "not_blank")))]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[cfg(feature = "validation")]
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Nội dung là bắt buộc".into()));
    }
    Ok(())
}

#[cfg(feature = "validation")]
fn specific_needs_lecturers(request: &ReminderRequest) -> Result<(), ValidationError> {
    let missing = request.lecturer_ids.as_ref().map_or(true, |ids| ids.is_empty());
    if request.reminder_type == ReminderType::Specific && missing {
        return Err(ValidationError::new("lecturer_ids")
            .with_message("Chọn ít nhất một giảng viên".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Upload / download payloads
// ---------------------------------------------------------------------------

/// One file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    /// Guessed from the file name when absent.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Classification sent alongside uploaded files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadMetadata {
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub qa_standard: Option<String>,
    pub criteria: Option<String>,
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub academic_year: Option<String>,
    pub semester: Option<Semester>,
    /// `draft` keeps the file private; `submitted` sends it for review.
    pub submission_status: Option<SubmissionStatus>,
}

impl UploadMetadata {
    /// Multipart text fields, in a stable order. Empty values are skipped.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let mut push = |name: &'static str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
                fields.push((name, v));
            }
        };
        push(
            "tags",
            (!self.tags.is_empty()).then(|| self.tags.join(",")),
        );
        push("description", self.description.clone());
        push("qaStandard", self.qa_standard.clone());
        push("criteria", self.criteria.clone());
        push("courseCode", self.course_code.clone());
        push("courseName", self.course_name.clone());
        push(
            "activityType",
            self.activity_type.as_ref().map(|a| a.as_str().to_string()),
        );
        push("academicYear", self.academic_year.clone());
        push(
            "semester",
            self.semester.as_ref().map(|s| s.as_str().to_string()),
        );
        push(
            "submissionStatus",
            self.submission_status.as_ref().map(|s| s.as_str().to_string()),
        );
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
    pub metadata: UploadMetadata,
}

/// File body fetched for saving on the user's machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
