use std::path::PathBuf;

/// Client configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// Override via environment variables (a `.env` file is honored when the
/// binary loads one).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL including the path prefix (default:
    /// `http://localhost:5000/api`).
    pub api_url: String,
    /// Where the bearer token and user object are persisted.
    pub session_file: PathBuf,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

/// Default API base URL for local development.
const DEFAULT_API_URL: &str = "http://localhost:5000/api";

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                      |
    /// |--------------------------------|------------------------------|
    /// | `DEVMART_API_URL`              | `http://localhost:5000/api`  |
    /// | `DEVMART_SESSION_FILE`         | `$HOME/.devmart/session.json`|
    /// | `DEVMART_REQUEST_TIMEOUT_SECS` | `30`                         |
    pub fn from_env() -> Self {
        let api_url = std::env::var("DEVMART_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let session_file = std::env::var("DEVMART_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        let request_timeout_secs: u64 = std::env::var("DEVMART_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("DEVMART_REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            session_file,
            request_timeout_secs,
        }
    }
}

/// `$HOME/.devmart/session.json`, falling back to the working directory
/// when `HOME` is unset.
fn default_session_file() -> PathBuf {
    let base = std::env::var("HOME").map(PathBuf::from).unwrap_or_default();
    base.join(".devmart").join("session.json")
}
