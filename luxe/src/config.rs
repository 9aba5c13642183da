use std::path::PathBuf;
use std::time::Duration;

use crate::error::{LuxeError, Result};

/// Environment variable holding the backend base URL (without `/api`).
pub const BACKEND_URL_ENV: &str = "SHOPLUXE_BACKEND_URL";
/// Environment variable overriding the client home directory.
pub const HOME_ENV: &str = "SHOPLUXE_HOME";
/// Environment variable selecting [`CatalogFailureMode`] (`silent` / `surface`).
pub const CATALOG_ERRORS_ENV: &str = "SHOPLUXE_CATALOG_ERRORS";

const SESSION_FILE: &str = "session.json";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How a failed catalog fetch is presented to the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogFailureMode {
    /// Log the failure and render an empty listing.
    #[default]
    Silent,
    /// Log the failure and render a distinct error view.
    Surface,
}

impl std::str::FromStr for CatalogFailureMode {
    type Err = LuxeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "surface" => Ok(Self::Surface),
            other => Err(LuxeError::Config(format!(
                "unknown catalog failure mode: {other}"
            ))),
        }
    }
}

/// Configuration for the storefront client.
#[derive(Debug, Clone)]
pub struct LuxeConfig {
    /// Backend base URL (e.g. `https://shop.example.com`); `/api` is appended.
    pub api_base_url: String,
    /// Where the session token is persisted.
    pub session_path: PathBuf,
    pub catalog_failure: CatalogFailureMode,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl LuxeConfig {
    /// Config with defaults for everything but the backend URL.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            session_path: luxe_home().join(SESSION_FILE),
            catalog_failure: CatalogFailureMode::default(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build from `SHOPLUXE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `LuxeError::Config` if the backend URL is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(BACKEND_URL_ENV)
            .map_err(|_| LuxeError::Config(format!("{BACKEND_URL_ENV} is not set")))?;
        let mut config = Self::new(url);
        if let Ok(mode) = std::env::var(CATALOG_ERRORS_ENV) {
            config.catalog_failure = mode.parse()?;
        }
        Ok(config)
    }

    /// `<base>/api`, validated and without a trailing slash.
    pub fn api_url(&self) -> Result<String> {
        let parsed = url::Url::parse(self.api_base_url.trim())?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(LuxeError::Config(format!(
                "unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }
        Ok(format!("{}/api", parsed.as_str().trim_end_matches('/')))
    }
}

/// Client home directory.
///
/// `SHOPLUXE_HOME` if set, otherwise `~/.config/shopluxe`, falling back to
/// the working directory when no home directory can be determined.
pub fn luxe_home() -> PathBuf {
    if let Ok(home) = std::env::var(HOME_ENV) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .map(|h| h.join(".config").join("shopluxe"))
        .unwrap_or_else(|| PathBuf::from(".shopluxe"))
}
