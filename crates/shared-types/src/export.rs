//! CSV export of a submission list.
//!
//! Fields are joined with a bare comma and are NOT quoted or escaped. A value
//! that itself contains a comma, quote or newline shifts the columns of its
//! row. Only use this for backend-controlled values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::submission::{or_placeholder, PLACEHOLDER};
use crate::SubmissionRecord;

/// Byte-order mark so spreadsheet tools detect UTF-8.
pub const UTF8_BOM: &str = "\u{FEFF}";

pub const CSV_HEADERS: [&str; 7] = [
    "STT",
    "Tên file",
    "Tiêu chuẩn QA",
    "Năm học",
    "Học kỳ",
    "Trạng thái",
    "Ghi chú",
];

pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// A ready-to-save CSV document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvExport {
    pub filename: String,
    pub content_type: String,
    pub content: String,
}

impl CsvExport {
    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// `danh-sach-ho-so-YYYY-MM-DD.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("danh-sach-ho-so-{}.csv", date.format("%Y-%m-%d"))
}

fn csv_row(index: usize, record: &SubmissionRecord) -> String {
    let fields = [
        (index + 1).to_string(),
        record.original_name.clone(),
        or_placeholder(record.qa_standard.as_deref()).to_string(),
        or_placeholder(record.academic_year.as_deref()).to_string(),
        record
            .semester
            .as_ref()
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        record.submission_status.label().to_string(),
        or_placeholder(record.review_notes.as_deref()).to_string(),
    ];
    fields.join(",")
}

/// Serialize `records` in their given order, numbering rows from 1.
pub fn export_to_csv<'a, I>(records: I, date: NaiveDate) -> CsvExport
where
    I: IntoIterator<Item = &'a SubmissionRecord>,
{
    let mut lines = vec![CSV_HEADERS.join(",")];
    lines.extend(
        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| csv_row(index, record)),
    );

    CsvExport {
        filename: export_filename(date),
        content_type: CSV_CONTENT_TYPE.to_string(),
        content: format!("{}{}", UTF8_BOM, lines.join("\n")),
    }
}
