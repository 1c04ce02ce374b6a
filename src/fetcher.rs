use crate::error::ProviderError;
use crate::models::{
    AppDetails, ProviderValue, RawRecord, RealInstalls, ReviewEntry, ReviewSort, Sourced,
    Timestamp,
};
use crate::provider::AppDataProvider;
use log::{debug, info, warn};

pub async fn fetch_app_details<P: AppDataProvider + ?Sized>(
    provider: &P,
    app_id: &str,
    lang: &str,
    country: &str,
) -> Result<AppDetails, ProviderError> {
    let raw = provider.get_app(app_id, lang, country).await?;
    Ok(extract_app_details(&raw))
}

/// Requests the `count` newest reviews. The continuation token is dropped and
/// anything past `count` is cut off.
pub async fn fetch_recent_reviews<P: AppDataProvider + ?Sized>(
    provider: &P,
    app_id: &str,
    lang: &str,
    country: &str,
    count: usize,
) -> Result<Vec<ReviewEntry>, ProviderError> {
    let page = provider
        .get_reviews(app_id, lang, country, ReviewSort::Newest, count)
        .await?;

    let mut reviews = page.reviews;
    if reviews.len() > count {
        warn!(
            "Provider returned {} reviews for {} (requested {}); keeping the newest {}",
            reviews.len(),
            app_id,
            count,
            count
        );
        reviews.truncate(count);
    }
    info!("Fetched {} review(s) for {}", reviews.len(), app_id);

    Ok(reviews.into_iter().map(ReviewEntry::new).collect())
}

pub fn extract_app_details(raw: &RawRecord) -> AppDetails {
    AppDetails {
        title: field(raw, "title", as_text),
        description: field(raw, "description", as_text),
        version: field(raw, "version", as_text),
        score: field(raw, "score", as_score),
        real_installs: field(raw, "realInstalls", as_real_installs),
        installs: field(raw, "installs", as_text),
        released: field(raw, "released", as_text),
        last_updated_on: field(raw, "lastUpdatedOn", as_timestamp),
    }
}

/// Absent and null keys map to `None`; a present value of another shape is
/// kept as sourced.
fn field<T>(
    raw: &RawRecord,
    key: &str,
    extract: fn(&ProviderValue) -> Option<T>,
) -> Option<Sourced<T>> {
    let value = raw.get(key).filter(|value| !value.is_null())?;
    match extract(value) {
        Some(typed) => Some(Sourced::Typed(typed)),
        None => {
            debug!(
                "Keeping app field {} as provided ({} value)",
                key,
                value.type_name()
            );
            Some(Sourced::Other(value.clone()))
        }
    }
}

fn as_text(value: &ProviderValue) -> Option<String> {
    match value {
        ProviderValue::Text(text) => Some(text.clone()),
        _ => None,
    }
}

fn as_score(value: &ProviderValue) -> Option<f64> {
    match value {
        ProviderValue::Float(score) => Some(*score),
        ProviderValue::Integer(score) => Some(*score as f64),
        _ => None,
    }
}

fn as_real_installs(value: &ProviderValue) -> Option<RealInstalls> {
    match value {
        ProviderValue::Integer(count) => Some(RealInstalls::Count(*count)),
        ProviderValue::Text(label) => Some(RealInstalls::Label(label.clone())),
        _ => None,
    }
}

fn as_timestamp(value: &ProviderValue) -> Option<Timestamp> {
    match value {
        ProviderValue::Timestamp(timestamp) => Some(timestamp.clone()),
        _ => None,
    }
}
