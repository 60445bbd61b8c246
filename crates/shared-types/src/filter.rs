//! Client-side narrowing of submission lists.
//!
//! Every predicate is conjunctive: a record stays visible only if it passes
//! the category tab and every non-empty search field. The functions here
//! borrow their input and return references into it, so the source list is
//! never reordered or mutated.

use serde::{Deserialize, Serialize};

use crate::SubmissionRecord;

/// Tag fragments that mark a submission as research (NCKH) evidence.
pub const RESEARCH_TAG_MARKERS: [&str; 4] = ["nckh", "nghiên cứu", "seminar", "hội thảo"];

// ---------------------------------------------------------------------------
// Category tabs
// ---------------------------------------------------------------------------

/// Category tab shown above a submission list.
///
/// `Submitted` and `Rejected` only appear on department-head screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    All,
    Qa,
    Nckh,
    Approved,
    Pending,
    Submitted,
    Rejected,
}

impl Tab {
    /// Tabs offered on lecturer screens, in display order.
    pub const LECTURER: [Tab; 5] = [Tab::All, Tab::Qa, Tab::Nckh, Tab::Approved, Tab::Pending];

    /// Tabs offered on the department-head file list, in display order.
    pub const DEPARTMENT_HEAD: [Tab; 4] = [Tab::All, Tab::Submitted, Tab::Approved, Tab::Rejected];

    /// Parse a persisted tab key. Unknown values mean no narrowing.
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "qa" => Tab::Qa,
            "nckh" => Tab::Nckh,
            "approved" => Tab::Approved,
            "pending" => Tab::Pending,
            "submitted" => Tab::Submitted,
            "rejected" => Tab::Rejected,
            _ => Tab::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::All => "all",
            Tab::Qa => "qa",
            Tab::Nckh => "nckh",
            Tab::Approved => "approved",
            Tab::Pending => "pending",
            Tab::Submitted => "submitted",
            Tab::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::All => "Tất cả",
            Tab::Qa => "Minh chứng QA",
            Tab::Nckh => "NCKH",
            Tab::Approved => "Đã duyệt",
            Tab::Pending => "Chờ duyệt",
            Tab::Submitted => "Cần duyệt",
            Tab::Rejected => "Bị trả lại",
        }
    }

    /// Whether `record` belongs to this category.
    pub fn admits(&self, record: &SubmissionRecord) -> bool {
        let status = &record.submission_status;
        match self {
            Tab::All => true,
            Tab::Qa => record.qa_standard_code().is_some(),
            Tab::Nckh => has_research_tag(record),
            Tab::Approved => status.as_str() == "approved",
            Tab::Pending => status.is_pending(),
            Tab::Submitted => matches!(status.as_str(), "submitted" | "under_review"),
            Tab::Rejected => status.is_returned(),
        }
    }
}

fn has_research_tag(record: &SubmissionRecord) -> bool {
    record.tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        RESEARCH_TAG_MARKERS.iter().any(|marker| tag.contains(marker))
    })
}

// ---------------------------------------------------------------------------
// Search fields
// ---------------------------------------------------------------------------

/// Structured search form. An empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub keyword: String,
    pub activity_type: String,
    pub qa_standard: String,
    pub course_code: String,
    pub course_name: String,
    pub academic_year: String,
    pub semester: String,
    pub submission_status: String,
}

impl SearchFilters {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of fields currently constraining the result.
    pub fn active_count(&self) -> usize {
        [
            &self.keyword,
            &self.activity_type,
            &self.qa_standard,
            &self.course_code,
            &self.course_name,
            &self.academic_year,
            &self.semester,
            &self.submission_status,
        ]
        .iter()
        .filter(|value| !value.is_empty())
        .count()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Which search fields a record shape supports.
///
/// Fields a profile does not support are ignored even when filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterProfile {
    /// Course code and course name are searchable.
    pub course_fields: bool,
    /// The keyword also matches the uploader's name and email.
    pub keyword_matches_uploader: bool,
}

impl FilterProfile {
    /// Lecturer views: own files, course fields present, no uploader column.
    pub const LECTURER: FilterProfile = FilterProfile {
        course_fields: true,
        keyword_matches_uploader: false,
    };

    /// Department-head views: every lecturer's files, no course columns.
    pub const DEPARTMENT_HEAD: FilterProfile = FilterProfile {
        course_fields: false,
        keyword_matches_uploader: true,
    };
}

impl Default for FilterProfile {
    fn default() -> Self {
        FilterProfile::LECTURER
    }
}

fn contains_ci(haystack: Option<&str>, needle_lower: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle_lower))
}

fn equals(value: Option<&str>, expected: &str) -> bool {
    value == Some(expected)
}

fn keyword_matches(profile: &FilterProfile, record: &SubmissionRecord, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    if contains_ci(Some(record.original_name.as_str()), &needle)
        || contains_ci(record.description.as_deref(), &needle)
        || record.tags.iter().any(|tag| contains_ci(Some(tag.as_str()), &needle))
    {
        return true;
    }
    profile.keyword_matches_uploader
        && record.uploader.as_ref().is_some_and(|u| {
            contains_ci(Some(u.name.as_str()), &needle) || contains_ci(Some(u.email.as_str()), &needle)
        })
}

fn search_admits(profile: &FilterProfile, record: &SubmissionRecord, search: &SearchFilters) -> bool {
    if !search.keyword.is_empty() && !keyword_matches(profile, record, &search.keyword) {
        return false;
    }
    if !search.activity_type.is_empty()
        && !equals(
            record.activity_type.as_ref().map(|a| a.as_str()),
            &search.activity_type,
        )
    {
        return false;
    }
    if !search.qa_standard.is_empty()
        && !contains_ci(record.qa_standard.as_deref(), &search.qa_standard.to_lowercase())
    {
        return false;
    }
    if profile.course_fields {
        if !search.course_code.is_empty()
            && !contains_ci(record.course_code.as_deref(), &search.course_code.to_lowercase())
        {
            return false;
        }
        if !search.course_name.is_empty()
            && !contains_ci(record.course_name.as_deref(), &search.course_name.to_lowercase())
        {
            return false;
        }
    }
    if !search.academic_year.is_empty()
        && !equals(record.academic_year.as_deref(), &search.academic_year)
    {
        return false;
    }
    if !search.semester.is_empty()
        && !equals(record.semester.as_ref().map(|s| s.as_str()), &search.semester)
    {
        return false;
    }
    if !search.submission_status.is_empty()
        && record.submission_status.as_str() != search.submission_status
    {
        return false;
    }
    true
}

/// Narrow `records` by tab and search fields using the lecturer profile.
pub fn apply_filters<'a>(
    records: &'a [SubmissionRecord],
    tab: Tab,
    search: &SearchFilters,
) -> Vec<&'a SubmissionRecord> {
    apply_filters_with(&FilterProfile::LECTURER, records, tab, search)
}

/// Narrow `records` by tab and search fields for the given record shape.
///
/// Relative order of the surviving records is preserved.
pub fn apply_filters_with<'a>(
    profile: &FilterProfile,
    records: &'a [SubmissionRecord],
    tab: Tab,
    search: &SearchFilters,
) -> Vec<&'a SubmissionRecord> {
    records
        .iter()
        .filter(|record| tab.admits(record))
        .filter(|record| search_admits(profile, record, search))
        .collect()
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Ephemeral filter state of one submission list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub tab: Tab,
    pub search: SearchFilters,
}

impl FilterState {
    pub fn with_tab(tab: Tab) -> Self {
        Self {
            tab,
            search: SearchFilters::default(),
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Clear every search field and return to the `All` tab.
    pub fn reset(&mut self) {
        self.search.clear();
        self.tab = Tab::All;
    }

    pub fn is_filtering(&self) -> bool {
        self.tab != Tab::All || !self.search.is_empty()
    }

    /// Active search fields, not counting the tab.
    pub fn active_filter_count(&self) -> usize {
        self.search.active_count()
    }

    pub fn apply<'a>(
        &self,
        profile: &FilterProfile,
        records: &'a [SubmissionRecord],
    ) -> Vec<&'a SubmissionRecord> {
        apply_filters_with(profile, records, self.tab, &self.search)
    }
}

/// Per-tab record counts for tab badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabCounts {
    pub all: usize,
    pub qa: usize,
    pub nckh: usize,
    pub approved: usize,
    pub pending: usize,
    pub submitted: usize,
    pub rejected: usize,
}

impl TabCounts {
    pub fn get(&self, tab: Tab) -> usize {
        match tab {
            Tab::All => self.all,
            Tab::Qa => self.qa,
            Tab::Nckh => self.nckh,
            Tab::Approved => self.approved,
            Tab::Pending => self.pending,
            Tab::Submitted => self.submitted,
            Tab::Rejected => self.rejected,
        }
    }
}

pub fn count_by_tab(records: &[SubmissionRecord]) -> TabCounts {
    let count = |tab: Tab| records.iter().filter(|r| tab.admits(r)).count();
    TabCounts {
        all: records.len(),
        qa: count(Tab::Qa),
        nckh: count(Tab::Nckh),
        approved: count(Tab::Approved),
        pending: count(Tab::Pending),
        submitted: count(Tab::Submitted),
        rejected: count(Tab::Rejected),
    }
}
