use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    ValidationError,
    Unauthorized,
    Forbidden,
    /// The request never produced an HTTP response (connect refused, timeout).
    Network,
    /// The backend answered but reported failure.
    Backend,
    /// The response body was not the expected envelope.
    Decode,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::NotFound => write!(f, "NotFound"),
            AppErrorKind::BadRequest => write!(f, "BadRequest"),
            AppErrorKind::ValidationError => write!(f, "ValidationError"),
            AppErrorKind::Unauthorized => write!(f, "Unauthorized"),
            AppErrorKind::Forbidden => write!(f, "Forbidden"),
            AppErrorKind::Network => write!(f, "Network"),
            AppErrorKind::Backend => write!(f, "Backend"),
            AppErrorKind::Decode => write!(f, "Decode"),
            AppErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// Structured error shared by the API client and the page controllers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
}

impl AppError {
    fn of(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::of(AppErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::of(AppErrorKind::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::of(AppErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::of(AppErrorKind::Forbidden, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::of(AppErrorKind::Network, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::of(AppErrorKind::Backend, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::of(AppErrorKind::Decode, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::of(AppErrorKind::InternalError, message)
    }

    /// Map an HTTP status code from the backend onto an error kind.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            400 => AppErrorKind::BadRequest,
            401 => AppErrorKind::Unauthorized,
            403 => AppErrorKind::Forbidden,
            404 => AppErrorKind::NotFound,
            422 => AppErrorKind::ValidationError,
            _ => AppErrorKind::Backend,
        };
        Self::of(kind, message)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == AppErrorKind::Unauthorized
    }

    /// True when the backend could not be reached at all.
    pub fn is_network(&self) -> bool {
        self.kind == AppErrorKind::Network
    }

    /// Parse an AppError from a serialized payload, tolerating a text prefix
    /// or suffix around the embedded JSON object.
    pub fn from_payload(payload: &str) -> Option<Self> {
        if let Ok(err) = serde_json::from_str::<Self>(payload) {
            return Some(err);
        }
        let start = payload.find('{')?;
        let end = payload.rfind('}')?;
        if end > start {
            serde_json::from_str(&payload[start..=end]).ok()
        } else {
            None
        }
    }

    /// Extract a user-facing message from a serialized payload.
    ///
    /// Falls back to a generic message if parsing fails.
    pub fn friendly_message(payload: &str) -> String {
        if let Some(app_error) = Self::from_payload(payload) {
            app_error.message
        } else {
            "Đã xảy ra lỗi. Vui lòng thử lại.".to_string()
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "validation")]
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        AppError::validation("Validation failed", field_errors)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::decode(err.to_string())
    }
}
