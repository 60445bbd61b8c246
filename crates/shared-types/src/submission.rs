use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{non_blank, DepartmentRef};

/// Rendered in place of any absent optional field.
pub const PLACEHOLDER: &str = "-";

// ---------------------------------------------------------------------------
// Submission status
// ---------------------------------------------------------------------------

/// Workflow state of a submission.
///
/// Values outside the six known states are kept verbatim in `Other` and
/// displayed as the raw string; they are never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    RevisionRequired,
    Other(String),
}

/// Colour family a status badge is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTone {
    Neutral,
    Info,
    Warning,
    Success,
    Danger,
    Caution,
}

/// Shared status vocabulary: `(wire value, label, alternate label)`.
///
/// Two statuses are worded differently across screens; the alternate wording
/// is kept here next to the primary one until product settles on one.
pub const STATUS_LABELS: &[(&str, &str, Option<&str>)] = &[
    ("draft", "Nháp", None),
    ("submitted", "Đã nộp", None),
    ("under_review", "Đang duyệt", Some("Đang xét")),
    ("approved", "Đã duyệt", None),
    ("rejected", "Từ chối", None),
    ("revision_required", "Yêu cầu chỉnh sửa", Some("Yêu cầu sửa")),
];

impl SubmissionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SubmissionStatus::Draft => "draft",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::UnderReview => "under_review",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::RevisionRequired => "revision_required",
            SubmissionStatus::Other(raw) => raw,
        }
    }

    fn vocabulary(&self) -> Option<&'static (&'static str, &'static str, Option<&'static str>)> {
        let key = self.as_str();
        STATUS_LABELS.iter().find(|(wire, _, _)| *wire == key)
    }

    /// Vietnamese label; the raw value for unknown statuses.
    pub fn label(&self) -> &str {
        match self.vocabulary() {
            Some((_, label, _)) => *label,
            None => self.as_str(),
        }
    }

    /// Second wording seen for the same status, if any.
    pub fn alternate_label(&self) -> Option<&'static str> {
        self.vocabulary().and_then(|(_, _, alt)| *alt)
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            SubmissionStatus::Draft => StatusTone::Neutral,
            SubmissionStatus::Submitted => StatusTone::Info,
            SubmissionStatus::UnderReview => StatusTone::Warning,
            SubmissionStatus::Approved => StatusTone::Success,
            SubmissionStatus::Rejected => StatusTone::Danger,
            SubmissionStatus::RevisionRequired => StatusTone::Caution,
            SubmissionStatus::Other(_) => StatusTone::Neutral,
        }
    }

    /// Not yet decided: draft, submitted or under review.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Draft | SubmissionStatus::Submitted | SubmissionStatus::UnderReview
        )
    }

    /// Sent back to the lecturer: rejected or revision required.
    pub fn is_returned(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Rejected | SubmissionStatus::RevisionRequired
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SubmissionStatus::Other(_))
    }
}

impl From<String> for SubmissionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "draft" => SubmissionStatus::Draft,
            "submitted" => SubmissionStatus::Submitted,
            "under_review" => SubmissionStatus::UnderReview,
            "approved" => SubmissionStatus::Approved,
            "rejected" => SubmissionStatus::Rejected,
            "revision_required" => SubmissionStatus::RevisionRequired,
            _ => SubmissionStatus::Other(value),
        }
    }
}

impl From<&str> for SubmissionStatus {
    fn from(value: &str) -> Self {
        SubmissionStatus::from(value.to_string())
    }
}

impl From<SubmissionStatus> for String {
    fn from(status: SubmissionStatus) -> Self {
        match status {
            SubmissionStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Activity type
// ---------------------------------------------------------------------------

/// Kind of academic activity a piece of evidence documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    Teaching,
    Research,
    Seminar,
    BusinessCooperation,
    StudentActivity,
    Conference,
    Publication,
    Project,
    Other,
    Unrecognized(String),
}

impl ActivityType {
    pub const ALL: [ActivityType; 9] = [
        ActivityType::Teaching,
        ActivityType::Research,
        ActivityType::Seminar,
        ActivityType::BusinessCooperation,
        ActivityType::StudentActivity,
        ActivityType::Conference,
        ActivityType::Publication,
        ActivityType::Project,
        ActivityType::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Teaching => "teaching",
            ActivityType::Research => "research",
            ActivityType::Seminar => "seminar",
            ActivityType::BusinessCooperation => "business_cooperation",
            ActivityType::StudentActivity => "student_activity",
            ActivityType::Conference => "conference",
            ActivityType::Publication => "publication",
            ActivityType::Project => "project",
            ActivityType::Other => "other",
            ActivityType::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ActivityType::Teaching => "Giảng dạy",
            ActivityType::Research => "Nghiên cứu khoa học",
            ActivityType::Seminar => "Seminar",
            ActivityType::BusinessCooperation => "Hợp tác doanh nghiệp",
            ActivityType::StudentActivity => "Hoạt động sinh viên",
            ActivityType::Conference => "Hội thảo",
            ActivityType::Publication => "Công bố khoa học",
            ActivityType::Project => "Dự án",
            ActivityType::Other => "Khác",
            ActivityType::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for ActivityType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "teaching" => ActivityType::Teaching,
            "research" => ActivityType::Research,
            "seminar" => ActivityType::Seminar,
            "business_cooperation" => ActivityType::BusinessCooperation,
            "student_activity" => ActivityType::StudentActivity,
            "conference" => ActivityType::Conference,
            "publication" => ActivityType::Publication,
            "project" => ActivityType::Project,
            "other" => ActivityType::Other,
            _ => ActivityType::Unrecognized(value),
        }
    }
}

impl From<ActivityType> for String {
    fn from(activity: ActivityType) -> Self {
        match activity {
            ActivityType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Semester
// ---------------------------------------------------------------------------

/// Academic term. `FULL_YEAR` covers evidence spanning the whole year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Semester {
    Hk1,
    Hk2,
    Hk3,
    FullYear,
    Unrecognized(String),
}

impl Semester {
    pub fn as_str(&self) -> &str {
        match self {
            Semester::Hk1 => "HK1",
            Semester::Hk2 => "HK2",
            Semester::Hk3 => "HK3",
            Semester::FullYear => "FULL_YEAR",
            Semester::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Semester::Hk1 => "Học kỳ 1",
            Semester::Hk2 => "Học kỳ 2",
            Semester::Hk3 => "Học kỳ hè",
            Semester::FullYear => "Cả năm",
            Semester::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Semester {
    fn from(value: String) -> Self {
        match value.as_str() {
            "HK1" => Semester::Hk1,
            "HK2" => Semester::Hk2,
            "HK3" => Semester::Hk3,
            "FULL_YEAR" => Semester::FullYear,
            _ => Semester::Unrecognized(value),
        }
    }
}

impl From<Semester> for String {
    fn from(semester: Semester) -> Self {
        match semester {
            Semester::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission record
// ---------------------------------------------------------------------------

/// Populated uploader reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploader {
    #[serde(default, deserialize_with = "crate::common::null_as_default", alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::common::null_as_default", alias = "fullName")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub email: String,
}

/// Reviewer/approver: either a bare name or a populated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonRef {
    Name(String),
    Populated(Uploader),
}

impl PersonRef {
    pub fn name(&self) -> &str {
        match self {
            PersonRef::Name(name) => name,
            PersonRef::Populated(user) => &user.name,
        }
    }
}

/// An uploaded evidence file as the client sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub original_name: String,
    /// Size in bytes.
    pub length: u64,
    pub content_type: String,
    #[serde(default, alias = "uploadedBy", skip_serializing_if = "Option::is_none")]
    pub uploader: Option<Uploader>,
    /// Only populated in department-head listings.
    #[serde(default, rename = "departmentId", skip_serializing_if = "Option::is_none")]
    pub department: Option<DepartmentRef>,
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qa_standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<ActivityType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
    pub submission_status: SubmissionStatus,
    /// Legacy flag derived by the backend from the status.
    #[serde(default, deserialize_with = "crate::common::null_as_default")]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<PersonRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<PersonRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Minimal record carrying only the always-present fields.
    pub fn new(
        id: impl Into<String>,
        original_name: impl Into<String>,
        submission_status: SubmissionStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            original_name: original_name.into(),
            length: 0,
            content_type: "application/octet-stream".to_string(),
            uploader: None,
            department: None,
            tags: Vec::new(),
            description: None,
            qa_standard: None,
            course_code: None,
            course_name: None,
            activity_type: None,
            academic_year: None,
            semester: None,
            submission_status,
            approved: false,
            review_notes: None,
            reviewed_by: None,
            approved_by: None,
            reviewed_at: None,
            created_at,
        }
    }

    /// QA standard code, if set to something other than whitespace.
    pub fn qa_standard_code(&self) -> Option<&str> {
        non_blank(self.qa_standard.as_deref())
    }

    pub fn uploader_name(&self) -> &str {
        self.uploader
            .as_ref()
            .map(|u| u.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(PLACEHOLDER)
    }

    pub fn reviewer_name(&self) -> &str {
        self.reviewed_by
            .as_ref()
            .or(self.approved_by.as_ref())
            .map(PersonRef::name)
            .unwrap_or(PLACEHOLDER)
    }

    pub fn size_label(&self) -> String {
        format_file_size(self.length)
    }
}

/// Render a byte count as "512 B", "1.5 KB", "2.0 MB".
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else {
        format!("{:.1} GB", b / GB)
    }
}

/// Display an optional text field, falling back to the placeholder.
pub fn or_placeholder(value: Option<&str>) -> &str {
    non_blank(value).unwrap_or(PLACEHOLDER)
}
