//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name
pub const APP_NAME: &str = "API Explorer";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under the home directory holding config and operations
pub const CONFIG_DIR_NAME: &str = ".api-explorer";

/// Environment variable overriding the config directory
pub const HOME_ENV_VAR: &str = "API_EXPLORER_HOME";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log file name, relative to the config directory
pub const DEFAULT_LOG_FILE: &str = "api-explorer.log";

/// Shown instead of the body when the request never reached the server
pub const TRANSPORT_FAILURE_ADVISORY: &str = "Failure while contacting API. Some possible causes are connection problems or cross-origin resource sharing protection. Please check javascript domains registered against APIKey / OAuth2 registration.";

/// Status text for codes without a canonical reason phrase
pub const UNKNOWN_STATUS_TEXT: &str = "Unknown";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const CONTENT_TYPE_MULTIPART: &str = "multipart/form-data";
