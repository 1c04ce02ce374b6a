use crate::config::{SnapshotSettings, REVIEW_COUNT};
use crate::encoder::serialize;
use crate::error::SnapshotError;
use crate::fetcher::{fetch_app_details, fetch_recent_reviews};
use crate::provider::AppDataProvider;
use crate::snapshot::{build, write};
use log::info;
use std::path::PathBuf;

/// Fetches app details and the newest reviews, then writes the combined
/// snapshot to `settings.output_path`. Nothing is written unless every
/// earlier step succeeded.
pub async fn run<P: AppDataProvider + ?Sized>(
    provider: &P,
    settings: &SnapshotSettings,
) -> Result<PathBuf, SnapshotError> {
    info!(
        "Fetching app details for {} ({}/{})",
        settings.app_id, settings.lang, settings.country
    );
    let app_details = fetch_app_details(
        provider,
        &settings.app_id,
        &settings.lang,
        &settings.country,
    )
    .await
    .map_err(SnapshotError::FetchAppDetails)?;

    info!(
        "Fetching {} newest review(s) for {}",
        REVIEW_COUNT, settings.app_id
    );
    let reviews = fetch_recent_reviews(
        provider,
        &settings.app_id,
        &settings.lang,
        &settings.country,
        REVIEW_COUNT,
    )
    .await
    .map_err(SnapshotError::FetchReviews)?;

    let snapshot = build(app_details, reviews);
    let text = serialize(&snapshot)?;

    info!(
        "Writing app snapshot to {}",
        settings.output_path.display()
    );
    write(&settings.output_path, &text)?;
    info!(
        "App snapshot successfully written to {}",
        settings.output_path.display()
    );

    Ok(settings.output_path.clone())
}
