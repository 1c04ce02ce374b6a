use crate::config::{resolve_output_path, SnapshotSettings};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "app-snapshot")]
#[command(about = "Fetch app metadata and recent reviews into a JSON snapshot")]
pub struct Cli {
    /// Destination file for the snapshot (defaults to assets/app.json)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
    /// Application identifier to look up
    #[arg(long)]
    pub app_id: Option<String>,
    /// Language code passed to the provider
    #[arg(long)]
    pub lang: Option<String>,
    /// Country code passed to the provider
    #[arg(long)]
    pub country: Option<String>,
    /// Base URL of the app data provider API
    #[arg(long, value_name = "URL")]
    pub provider_url: Option<String>,
    /// Request timeout in seconds (0 disables the timeout)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn into_settings(self) -> SnapshotSettings {
        let defaults = SnapshotSettings::default();
        SnapshotSettings {
            app_id: self.app_id.unwrap_or(defaults.app_id),
            lang: self.lang.unwrap_or(defaults.lang),
            country: self.country.unwrap_or(defaults.country),
            provider_url: self.provider_url.unwrap_or(defaults.provider_url),
            request_timeout: match self.timeout_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.request_timeout,
            },
            output_path: resolve_output_path(self.output),
        }
    }
}
