use anyhow::{anyhow, Result};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_OUTPUT_PATH: &str = "assets/app.json";
pub const DEFAULT_APP_ID: &str = "com.elfilibustero.toolkit";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_COUNTRY: &str = "us";
/// Upper bound on the reviews requested per run.
pub const REVIEW_COUNT: usize = 5;
pub const DEFAULT_PROVIDER_URL: &str = "http://127.0.0.1:8787";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Everything a single snapshot run needs to know.
#[derive(Debug, Clone)]
pub struct SnapshotSettings {
    pub app_id: String,
    pub lang: String,
    pub country: String,
    pub provider_url: String,
    pub request_timeout: Option<Duration>,
    pub output_path: PathBuf,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            lang: DEFAULT_LANG.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl SnapshotSettings {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("app id", &self.app_id)?;
        require_non_empty("lang", &self.lang)?;
        require_non_empty("country", &self.country)?;
        if normalize_provider_url(Some(&self.provider_url)).is_none() {
            return Err(anyhow!(
                "provider URL must be an absolute http(s) URL (value: {})",
                self.provider_url
            ));
        }
        Ok(())
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{} must not be empty", name));
    }
    Ok(())
}

pub fn resolve_output_path(cli_value: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_value {
        return path;
    }

    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

/// Returns the trimmed URL without trailing slashes when it is an absolute
/// http(s) URL with a host.
pub fn normalize_provider_url(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(trimmed.to_string())
}
