use anyhow::{Context, Result};
use app_snapshot::{
    cli::Cli, commands::generate_snapshot, config::normalize_provider_url,
    provider::HttpProvider,
};
use clap::Parser;
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut settings = Cli::parse().into_settings();
    settings.validate()?;
    if let Some(normalized) = normalize_provider_url(Some(&settings.provider_url)) {
        settings.provider_url = normalized;
    }

    info!(
        "Generating app snapshot for {} from {}",
        settings.app_id, settings.provider_url
    );
    let provider = HttpProvider::new(&settings.provider_url, settings.request_timeout)
        .context("failed to set up provider client")?;
    let written = generate_snapshot::run(&provider, &settings).await?;

    println!("App snapshot written to {}", written.display());
    Ok(())
}
