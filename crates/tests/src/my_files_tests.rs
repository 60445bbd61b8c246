use chrono::NaiveDate;
use portal::Notice;
use pretty_assertions::assert_eq;
use shared_types::{
    SearchFilters, Semester, SubmissionStatus, Tab, UpdateFileRequest, UploadFile,
    UploadMetadata, UploadRequest, UTF8_BOM,
};

use crate::common;

async fn loaded_page(backend: &common::TestBackend) -> portal::pages::MyFilesPage {
    let (_, portal) = common::portal(&backend.base_url, Some(common::LECTURER_TOKEN));
    let mut page = portal.my_files();
    page.load().await;
    page
}

#[tokio::test]
async fn test_upload_sends_multipart_and_refetches() {
    let backend = common::spawn_backend(common::seeded()).await;
    let mut page = loaded_page(&backend).await;
    assert_eq!(page.browser().records().len(), 4);

    let request = UploadRequest {
        files: vec![
            UploadFile::new("Minh chứng TC3.pdf", b"%PDF-1.4".to_vec()),
            UploadFile::new("Phụ lục.docx", vec![0; 64]),
        ],
        metadata: UploadMetadata {
            tags: vec!["giảng dạy".into(), "TC3".into()],
            qa_standard: Some("TC3".into()),
            semester: Some(Semester::Hk2),
            submission_status: Some(SubmissionStatus::Submitted),
            ..Default::default()
        },
    };

    let notice = page.upload(request).await;

    assert_eq!(notice, Notice::Uploaded);
    assert_eq!(page.browser().records().len(), 6);

    let state = backend.state.lock().await;
    let seen = &state.uploads[0];
    assert_eq!(seen.file_names, vec!["Minh chứng TC3.pdf", "Phụ lục.docx"]);
    assert_eq!(seen.content_types[0], "application/pdf");
    assert_eq!(
        seen.content_types[1],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(seen.fields["tags"], "giảng dạy,TC3");
    assert_eq!(seen.fields["semester"], "HK2");
    assert_eq!(seen.fields["submissionStatus"], "submitted");
    assert!(!seen.fields.contains_key("description"));
}

#[tokio::test]
async fn test_upload_limits_come_from_system_config() {
    let backend = common::spawn_backend(common::seeded()).await;
    let mut page = loaded_page(&backend).await;

    let too_many = UploadRequest {
        files: (0..4)
            .map(|i| UploadFile::new(format!("{}.pdf", i), vec![1]))
            .collect(),
        ..Default::default()
    };
    assert_eq!(page.upload(too_many).await, Notice::TooManyFiles { max: 3 });

    let wrong_type = UploadRequest {
        files: vec![UploadFile::new("setup.exe", vec![1])],
        ..Default::default()
    };
    assert_eq!(
        page.upload(wrong_type).await,
        Notice::FileTypeNotAllowed {
            file_name: "setup.exe".into()
        }
    );

    assert_eq!(backend.request_count("POST /api/files/upload").await, 0);
}

#[tokio::test]
async fn test_update_then_delete() {
    let backend = common::spawn_backend(common::seeded()).await;
    let mut page = loaded_page(&backend).await;

    let patch = UpdateFileRequest {
        qa_standard: Some("TC4".into()),
        description: Some("Đã bổ sung".into()),
        ..Default::default()
    };
    assert_eq!(page.update("f3", patch).await, Notice::Updated);
    let updated = page.browser().find("f3").unwrap();
    assert_eq!(updated.qa_standard.as_deref(), Some("TC4"));

    assert_eq!(page.delete("f3").await, Notice::Deleted);
    assert!(page.browser().find("f3").is_none());
    assert_eq!(page.browser().records().len(), 3);
}

#[tokio::test]
async fn test_mutation_on_missing_file_fails_with_alert() {
    let backend = common::spawn_backend(common::seeded()).await;
    let mut page = loaded_page(&backend).await;
    let before = backend.request_count("GET /api/files").await;

    assert_eq!(page.delete("nope").await, Notice::DeleteFailed);
    assert_eq!(
        page.update("nope", UpdateFileRequest::default()).await,
        Notice::UpdateFailed
    );
    assert_eq!(backend.request_count("GET /api/files").await, before);
}

#[tokio::test]
async fn test_download_returns_bytes_under_original_name() {
    let backend = common::spawn_backend(common::seeded()).await;
    let page = loaded_page(&backend).await;

    let file = page.download("f1").await.unwrap();

    assert_eq!(file.file_name, "Đề cương IT001.pdf");
    assert_eq!(file.content_type, "application/pdf");
    assert_eq!(file.bytes, b"%PDF-1.4 f1".to_vec());
}

#[tokio::test]
async fn test_criteria_by_standard() {
    let backend = common::spawn_backend(common::seeded()).await;
    let mut page = loaded_page(&backend).await;

    page.load_criteria("s3").await;

    let codes: Vec<&str> = page.criteria().iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["TC3.1", "TC3.2"]);
    assert_eq!(page.criteria()[0].standard_id.as_deref(), Some("s3"));
    assert_eq!(
        backend
            .request_count("GET /api/standards/s3/criteria")
            .await,
        1
    );
}

#[tokio::test]
async fn test_csv_export_of_filtered_list() {
    let backend = common::spawn_backend(common::seeded()).await;
    let mut page = loaded_page(&backend).await;
    page.browser_mut().set_tab(Tab::Nckh);
    page.browser_mut().set_search(SearchFilters::keyword("báo"));

    let export = page.export_csv(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());

    assert_eq!(export.filename, "danh-sach-ho-so-2025-06-30.csv");
    let lines: Vec<&str> = export.content.trim_start_matches(UTF8_BOM).lines().collect();
    assert_eq!(
        lines,
        vec![
            "STT,Tên file,Tiêu chuẩn QA,Năm học,Học kỳ,Trạng thái,Ghi chú",
            "1,Bài báo hội thảo.pdf,-,2024-2025,HK2,Đã nộp,-",
            "2,Báo cáo NCKH.pdf,TC5,2023-2024,FULL_YEAR,Yêu cầu chỉnh sửa,Bổ sung số liệu",
        ]
    );
}
