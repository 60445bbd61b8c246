use chrono::NaiveDate;
use shared_types::{
    count_by_tab, export_to_csv, CsvExport, FilterProfile, FilterState, SearchFilters,
    SubmissionRecord, Tab, TabCounts,
};

/// A fetched submission list plus the filters the user has applied to it.
///
/// Shared by every file view; the profile decides which search fields the
/// current record shape honours.
#[derive(Debug, Clone)]
pub struct FileBrowser {
    records: Vec<SubmissionRecord>,
    filter: FilterState,
    profile: FilterProfile,
}

impl FileBrowser {
    pub fn new(profile: FilterProfile) -> Self {
        Self {
            records: Vec::new(),
            filter: FilterState::default(),
            profile,
        }
    }

    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.filter.set_tab(tab);
        self
    }

    /// Swap in a fresh fetch. Filters are kept.
    pub fn replace(&mut self, records: Vec<SubmissionRecord>) {
        self.records = records;
    }

    pub fn clear_records(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[SubmissionRecord] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&SubmissionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn profile(&self) -> FilterProfile {
        self.profile
    }

    pub fn tab(&self) -> Tab {
        self.filter.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.filter.set_tab(tab);
    }

    pub fn search(&self) -> &SearchFilters {
        &self.filter.search
    }

    pub fn set_search(&mut self, search: SearchFilters) {
        self.filter.search = search;
    }

    pub fn search_mut(&mut self) -> &mut SearchFilters {
        &mut self.filter.search
    }

    /// "Clear filters": empty every field and go back to `All`.
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    /// Records passing the current tab and search, in fetch order.
    pub fn visible(&self) -> Vec<&SubmissionRecord> {
        self.filter.apply(&self.profile, &self.records)
    }

    pub fn tab_counts(&self) -> TabCounts {
        count_by_tab(&self.records)
    }

    /// CSV of exactly what is visible right now.
    pub fn export_csv(&self, date: NaiveDate) -> CsvExport {
        export_to_csv(self.visible(), date)
    }

    pub fn export_csv_today(&self) -> CsvExport {
        self.export_csv(chrono::Local::now().date_naive())
    }
}
