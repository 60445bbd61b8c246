use serde::{Deserialize, Deserializer, Serialize};

use crate::AppError;

/// Response envelope returned by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Unwrap the payload of a successful response.
    ///
    /// `success: false` becomes a `Backend` error carrying the backend's
    /// message; a successful response without `data` is a `Decode` error.
    pub fn into_data(self) -> Result<T, AppError> {
        if !self.success {
            return Err(AppError::backend(
                self.message.unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AppError::decode("Response reported success but carried no data"))
    }

    /// Check a mutation response that carries no meaningful payload.
    pub fn into_ack(self) -> Result<(), AppError> {
        if self.success {
            Ok(())
        } else {
            Err(AppError::backend(
                self.message.unwrap_or_else(|| "Request was not successful".to_string()),
            ))
        }
    }
}

/// Payload-less acknowledgement for mutations.
pub type Ack = ApiResponse<serde_json::Value>;

/// Treat an absent JSON string or a blank one as "unset".
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Treat an explicit JSON `null` like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
