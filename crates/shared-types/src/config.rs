use serde::{Deserialize, Serialize};

/// Backend connection settings (`[api]` in `config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client-side session settings (`[session]` in `config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    /// JSON file holding the persisted key/value store.
    pub store_path: String,
    /// Where unauthenticated users are sent.
    pub login_path: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            store_path: ".qa-portal/session.json".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

/// Top-level config file structure matching `config.toml`.
///
/// Every field has a default so a missing or partial file still yields a
/// usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PortalConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
}
