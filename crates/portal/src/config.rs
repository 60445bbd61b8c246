use shared_types::PortalConfig;
use std::sync::OnceLock;

static CONFIG: OnceLock<PortalConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

pub const ENV_API_URL: &str = "QA_PORTAL_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "QA_PORTAL_TIMEOUT_SECS";
pub const ENV_SESSION_PATH: &str = "QA_PORTAL_SESSION_PATH";
pub const ENV_LOGIN_PATH: &str = "QA_PORTAL_LOGIN_PATH";

/// Read `config.toml` and the environment (including `.env`), then store
/// the result in the global `OnceLock`. Only the first call has effect.
///
/// A missing or unparseable file falls back to defaults.
pub fn load_config() -> &'static PortalConfig {
    CONFIG.get_or_init(|| {
        let _ = dotenvy::dotenv();
        let mut config = match std::fs::read_to_string(CONFIG_PATH) {
            Ok(contents) => parse_config(&contents),
            Err(e) => {
                tracing::info!(path = CONFIG_PATH, error = %e, "config file not found, using defaults");
                PortalConfig::default()
            }
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        tracing::debug!(?config, "portal config loaded");
        config
    })
}

/// The loaded config, or defaults if `load_config()` hasn't run yet.
pub fn config() -> &'static PortalConfig {
    static DEFAULT: OnceLock<PortalConfig> = OnceLock::new();
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(PortalConfig::default))
}

/// Parse the TOML text, falling back to defaults on error.
pub fn parse_config(contents: &str) -> PortalConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(path = CONFIG_PATH, error = %e, "failed to parse config, using defaults");
        PortalConfig::default()
    })
}

/// Overlay environment values on top of the file config. Blank values and
/// unparseable timeouts are ignored.
pub fn apply_env_overrides<F>(config: &mut PortalConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_API_URL) {
        config.api.base_url = url;
    }
    if let Some(raw) = get(ENV_TIMEOUT_SECS) {
        match raw.trim().parse() {
            Ok(secs) => config.api.timeout_secs = secs,
            Err(_) => tracing::warn!(value = %raw, "ignoring invalid {ENV_TIMEOUT_SECS}"),
        }
    }
    if let Some(path) = get(ENV_SESSION_PATH) {
        config.session.store_path = path;
    }
    if let Some(path) = get(ENV_LOGIN_PATH) {
        config.session.login_path = path;
    }
}
