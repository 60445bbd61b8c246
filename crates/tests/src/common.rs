use axum::{
    extract::{Multipart, OriginalUri, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use portal::api::HttpApiClient;
use portal::{MemoryStore, Portal, Session, SessionStore};
use serde_json::{json, Value};
use shared_types::ApiSettings;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const LECTURER_TOKEN: &str = "token-lecturer";
pub const HEAD_TOKEN: &str = "token-head";
pub const MANAGER_TOKEN: &str = "token-manager";
pub const ADMIN_TOKEN: &str = "token-admin";
pub const AUDITOR_TOKEN: &str = "token-auditor";

pub const LOGIN_PATH: &str = "/login";

/// A multipart upload as the mock backend received it.
#[derive(Debug, Clone, Default)]
pub struct SeenUpload {
    pub file_names: Vec<String>,
    pub content_types: Vec<String>,
    pub fields: HashMap<String, String>,
}

/// In-memory data behind the mock QA backend.
#[derive(Default)]
pub struct BackendState {
    /// Bearer token -> user as `/auth/me` returns it.
    pub users: HashMap<String, Value>,
    pub files: Vec<Value>,
    pub department_files: Vec<Value>,
    pub lecturer_stats: Vec<Value>,
    pub system_config: Value,
    /// `"METHOD /api/path?query"` for every request, in arrival order.
    pub requests: Vec<String>,
    pub uploads: Vec<SeenUpload>,
    pub reviews: Vec<(String, Value)>,
    pub reminders: Vec<Value>,
    /// Answer `GET /department-head/files` with this status instead.
    pub department_files_status: Option<StatusCode>,
}

pub type Shared = Arc<Mutex<BackendState>>;

pub struct TestBackend {
    pub base_url: String,
    pub state: Shared,
}

impl TestBackend {
    pub async fn requests(&self) -> Vec<String> {
        self.state.lock().await.requests.clone()
    }

    pub async fn request_count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn lecturer_files() -> Vec<Value> {
    vec![
        json!({
            "_id": "f1",
            "originalName": "Đề cương IT001.pdf",
            "length": 204800,
            "contentType": "application/pdf",
            "uploadedBy": {"_id": "gv01", "fullName": "Nguyễn Văn An", "email": "an@khoa.edu.vn"},
            "tags": ["giảng dạy"],
            "qaStandard": "TC3",
            "courseCode": "IT001",
            "courseName": "Nhập môn lập trình",
            "activityType": "teaching",
            "academicYear": "2024-2025",
            "semester": "HK1",
            "submissionStatus": "approved",
            "approved": true,
            "createdAt": "2025-01-10T08:00:00Z"
        }),
        json!({
            "_id": "f2",
            "originalName": "Bài báo hội thảo.pdf",
            "length": 1048576,
            "contentType": "application/pdf",
            "tags": ["Hội thảo quốc gia"],
            "qaStandard": "   ",
            "activityType": "conference",
            "academicYear": "2024-2025",
            "semester": "HK2",
            "submissionStatus": "submitted",
            "createdAt": "2025-02-01T08:00:00Z"
        }),
        json!({
            "_id": "f3",
            "originalName": "Kế hoạch giảng dạy.docx",
            "length": 5120,
            "contentType": "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "submissionStatus": "draft",
            "createdAt": "2025-02-03T08:00:00Z"
        }),
        json!({
            "_id": "f4",
            "originalName": "Báo cáo NCKH.pdf",
            "length": 30720,
            "contentType": "application/pdf",
            "tags": ["NCKH"],
            "qaStandard": "TC5",
            "academicYear": "2023-2024",
            "semester": "FULL_YEAR",
            "submissionStatus": "revision_required",
            "reviewNotes": "Bổ sung số liệu",
            "reviewedBy": "Trần Thị Bình",
            "createdAt": "2024-11-20T08:00:00Z"
        }),
    ]
}

pub fn department_files() -> Vec<Value> {
    let department = json!({"_id": "d1", "code": "CNTT", "name": "Công nghệ thông tin"});
    vec![
        json!({
            "_id": "d-f1",
            "originalName": "Minh chứng TC1.pdf",
            "length": 1000,
            "contentType": "application/pdf",
            "uploadedBy": {"_id": "gv01", "fullName": "Nguyễn Văn An", "email": "an@khoa.edu.vn"},
            "departmentId": department,
            "qaStandard": "TC1",
            "submissionStatus": "submitted",
            "createdAt": "2025-03-01T08:00:00Z"
        }),
        json!({
            "_id": "d-f2",
            "originalName": "Seminar khoa.pdf",
            "length": 2000,
            "contentType": "application/pdf",
            "uploadedBy": {"_id": "gv02", "fullName": "Lê Văn Cường", "email": "cuong@khoa.edu.vn"},
            "departmentId": department,
            "tags": ["seminar"],
            "submissionStatus": "under_review",
            "createdAt": "2025-03-02T08:00:00Z"
        }),
        json!({
            "_id": "d-f3",
            "originalName": "Đề thi cuối kỳ.pdf",
            "length": 3000,
            "contentType": "application/pdf",
            "uploadedBy": {"_id": "gv01", "fullName": "Nguyễn Văn An", "email": "an@khoa.edu.vn"},
            "departmentId": department,
            "submissionStatus": "approved",
            "createdAt": "2025-03-03T08:00:00Z"
        }),
    ]
}

/// Backend with one user per role and a few files of each kind.
pub fn seeded() -> BackendState {
    let mut users = HashMap::new();
    users.insert(
        LECTURER_TOKEN.to_string(),
        json!({"_id": "gv01", "fullName": "Nguyễn Văn An", "email": "an@khoa.edu.vn", "role": "lecturer"}),
    );
    users.insert(
        HEAD_TOKEN.to_string(),
        json!({
            "_id": "tk01",
            "name": "Trần Thị Bình",
            "email": "binh@khoa.edu.vn",
            "role": "lecturer",
            "roles": ["department_head", "lecturer"],
            "departmentId": {"_id": "d1", "code": "CNTT", "name": "Công nghệ thông tin"}
        }),
    );
    users.insert(
        MANAGER_TOKEN.to_string(),
        json!({"_id": "ql01", "name": "Phạm Quản Lý", "email": "ql@truong.edu.vn", "roles": ["manager"]}),
    );
    users.insert(
        ADMIN_TOKEN.to_string(),
        json!({"_id": "ad01", "name": "Admin", "email": "admin@truong.edu.vn", "role": "admin"}),
    );
    users.insert(
        AUDITOR_TOKEN.to_string(),
        json!({"_id": "kt01", "name": "Kiểm định", "email": "kd@truong.edu.vn", "role": "auditor"}),
    );

    BackendState {
        users,
        files: lecturer_files(),
        department_files: department_files(),
        lecturer_stats: vec![
            json!({"lecturerId": "gv01", "name": "Nguyễn Văn An", "totalFiles": 2, "approvedFiles": 1}),
            json!({"lecturerId": "gv02", "name": "Lê Văn Cường", "totalFiles": 1}),
            json!({"lecturerId": "gv03", "name": "Đỗ Thị Dung", "totalFiles": 0}),
        ],
        system_config: json!({
            "maxFileSize": 1048576,
            "maxFilePerUpload": 3,
            "allowedFileTypes": ["pdf", "docx"]
        }),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Mock backend
// ---------------------------------------------------------------------------

fn ok(data: Value) -> Json<Value> {
    Json(json!({"success": true, "data": data}))
}

fn ack() -> Json<Value> {
    Json(json!({"success": true, "message": "OK"}))
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn position(records: &[Value], id: &str) -> Option<usize> {
    records.iter().position(|r| r["_id"] == id)
}

/// Log every request and reject unknown bearer tokens with 401.
async fn require_bearer(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    let line = match uri.query() {
        Some(query) => format!("{} {}?{}", request.method(), uri.path(), query),
        None => format!("{} {}", request.method(), uri.path()),
    };
    let known = {
        let mut s = state.lock().await;
        s.requests.push(line);
        bearer(request.headers()).is_some_and(|token| s.users.contains_key(&token))
    };
    if !known {
        return failure(StatusCode::UNAUTHORIZED, "Token không hợp lệ hoặc đã hết hạn");
    }
    next.run(request).await
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let s = state.lock().await;
    match bearer(&headers).and_then(|t| s.users.get(&t).cloned()) {
        Some(user) => ok(user).into_response(),
        None => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

async fn list_files(State(state): State<Shared>) -> Json<Value> {
    ok(Value::Array(state.lock().await.files.clone()))
}

async fn upload_files(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut seen = SeenUpload::default();
    let mut bodies = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "files" {
            seen.file_names
                .push(field.file_name().unwrap_or_default().to_string());
            seen.content_types
                .push(field.content_type().unwrap_or_default().to_string());
            bodies.push(field.bytes().await.map(|b| b.len()).unwrap_or_default());
        } else {
            let value = field.text().await.unwrap_or_default();
            seen.fields.insert(name, value);
        }
    }
    if seen.file_names.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Không có file");
    }

    let mut s = state.lock().await;
    for (file_name, length) in seen.file_names.iter().zip(bodies) {
        s.files.push(json!({
            "_id": uuid::Uuid::new_v4().to_string(),
            "originalName": file_name,
            "length": length,
            "contentType": "application/pdf",
            "qaStandard": seen.fields.get("qaStandard"),
            "submissionStatus": seen.fields.get("submissionStatus").map(String::as_str).unwrap_or("draft"),
            "createdAt": chrono::Utc::now().to_rfc3339(),
        }));
    }
    s.uploads.push(seen);
    ack().into_response()
}

async fn update_file(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Response {
    let mut s = state.lock().await;
    let Some(index) = position(&s.files, &id) else {
        return failure(StatusCode::NOT_FOUND, "Không tìm thấy file");
    };
    if let (Some(target), Some(changes)) = (s.files[index].as_object_mut(), patch.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    ack().into_response()
}

async fn delete_file(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = state.lock().await;
    match position(&s.files, &id) {
        Some(index) => {
            s.files.remove(index);
            ack().into_response()
        }
        None => failure(StatusCode::NOT_FOUND, "Không tìm thấy file"),
    }
}

async fn download_file(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let s = state.lock().await;
    if position(&s.files, &id).is_none() {
        return failure(StatusCode::NOT_FOUND, "Không tìm thấy file");
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        format!("%PDF-1.4 {}", id).into_bytes(),
    )
        .into_response()
}

async fn announcements() -> Json<Value> {
    ok(json!([
        {"_id": "a1", "title": "Hạn nộp minh chứng HK2", "content": "Trước 30/06", "priority": "urgent"},
        {"_id": "a2", "title": "Tập huấn kiểm định", "priority": "normal"}
    ]))
}

async fn system_config(State(state): State<Shared>) -> Json<Value> {
    ok(state.lock().await.system_config.clone())
}

async fn standards() -> Json<Value> {
    ok(json!([
        {"_id": "s1", "code": "TC1", "name": "Tầm nhìn, sứ mạng", "order": 1},
        {"_id": "s3", "code": "TC3", "name": "Chương trình dạy học", "order": 3}
    ]))
}

async fn criteria(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let standard = params.get("standardId").cloned().unwrap_or_default();
    ok(json!([{"_id": "c1", "code": "TC3.1", "name": "Mục tiêu", "standardId": standard}]))
}

async fn criteria_by_standard(Path(id): Path<String>) -> Json<Value> {
    ok(json!([
        {"_id": format!("{}-c1", id), "code": "TC3.1", "name": "Mục tiêu", "standard": id},
        {"_id": format!("{}-c2", id), "code": "TC3.2", "name": "Cấu trúc", "standard": id}
    ]))
}

async fn department_progress() -> Json<Value> {
    ok(json!({
        "department": {"_id": "d1", "code": "CNTT", "name": "Công nghệ thông tin"},
        "totalLecturers": 3,
        "lecturersSubmitted": 2,
        "totalFiles": 3,
        "approvedFiles": 1,
        "pendingFiles": 2,
        "completionRate": 66.7
    }))
}

async fn qa_overview() -> Json<Value> {
    ok(json!({
        "standards": [
            {"code": "TC1", "name": "Tầm nhìn, sứ mạng", "fileCount": 1, "approvedCount": 0},
            {"code": "TC2", "name": "Quản trị", "fileCount": 0}
        ],
        "totalFiles": 1
    }))
}

async fn timeline() -> Json<Value> {
    ok(json!([
        {"date": "2025-03-01", "submitted": 1},
        {"date": "2025-03-02", "submitted": 1, "approved": 1}
    ]))
}

async fn list_department_files(State(state): State<Shared>) -> Response {
    let s = state.lock().await;
    match s.department_files_status {
        Some(status) => failure(status, "Lỗi máy chủ"),
        None => ok(Value::Array(s.department_files.clone())).into_response(),
    }
}

async fn lecturer_stats(State(state): State<Shared>) -> Json<Value> {
    ok(Value::Array(state.lock().await.lecturer_stats.clone()))
}

async fn review_file(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().await;
    let Some(index) = position(&s.department_files, &id) else {
        return failure(StatusCode::NOT_FOUND, "Không tìm thấy file");
    };
    let record = &mut s.department_files[index];
    record["submissionStatus"] = body["submissionStatus"].clone();
    if let Some(notes) = body.get("reviewNotes") {
        record["reviewNotes"] = notes.clone();
    }
    s.reviews.push((id, body));
    ack().into_response()
}

async fn send_reminders(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state.lock().await.reminders.push(body);
    ack()
}

pub fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/auth/me", get(me))
        .route("/files", get(list_files))
        .route("/files/upload", post(upload_files))
        .route("/files/{id}", put(update_file).delete(delete_file))
        .route("/files/{id}/download", get(download_file))
        .route("/announcements", get(announcements))
        .route("/system-config", get(system_config))
        .route("/standards", get(standards))
        .route("/standards/{id}/criteria", get(criteria_by_standard))
        .route("/criteria", get(criteria))
        .route("/department-head/progress", get(department_progress))
        .route("/department-head/qa-overview", get(qa_overview))
        .route("/department-head/timeline", get(timeline))
        .route("/department-head/files", get(list_department_files))
        .route("/department-head/lecturer-stats", get(lecturer_stats))
        .route("/department-head/files/{id}/review", put(review_file))
        .route("/department-head/reminders", post(send_reminders))
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state);
    Router::new().nest("/api", api)
}

/// Serve the mock backend on an ephemeral localhost port.
pub async fn spawn_backend(state: BackendState) -> TestBackend {
    portal::telemetry::init_tracing();
    let shared = Arc::new(Mutex::new(state));
    let app = router(shared.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend crashed");
    });
    TestBackend {
        base_url: format!("http://{}/api", addr),
        state: shared,
    }
}

/// A base URL on which nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    format!("http://{}/api", addr)
}

// ---------------------------------------------------------------------------
// Client side
// ---------------------------------------------------------------------------

pub fn session(token: Option<&str>) -> (Arc<MemoryStore>, Session) {
    let store = Arc::new(MemoryStore::new());
    if let Some(token) = token {
        store.set("token", token);
    }
    let session = Session::new(store.clone()).with_login_path(LOGIN_PATH);
    (store, session)
}

pub fn client(base_url: &str, session: &Session) -> Arc<HttpApiClient> {
    let settings = ApiSettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    };
    Arc::new(HttpApiClient::new(&settings, session.clone()).expect("Failed to build client"))
}

/// Portal wired to `base_url` with an in-memory session holding `token`.
pub fn portal(base_url: &str, token: Option<&str>) -> (Arc<MemoryStore>, Portal) {
    let (store, session) = session(token);
    let api = client(base_url, &session);
    (store, Portal::new(api, session))
}
