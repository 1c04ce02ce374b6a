use crate::error::ProviderError;
use crate::models::{ProviderValue, RawRecord, ReviewSort, Timestamp};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// Keys whose values the provider sends as dates. Integer epochs under these
/// keys become `Timestamp`; textual dates are already text and stay verbatim.
const TEMPORAL_KEYS: [&str; 3] = ["lastUpdatedOn", "at", "repliedAt"];

#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    pub reviews: Vec<RawRecord>,
    pub continuation_token: Option<String>,
}

/// The two lookups a snapshot run needs from a store-like data source.
#[async_trait]
pub trait AppDataProvider: Send + Sync {
    async fn get_app(
        &self,
        app_id: &str,
        lang: &str,
        country: &str,
    ) -> Result<RawRecord, ProviderError>;

    async fn get_reviews(
        &self,
        app_id: &str,
        lang: &str,
        country: &str,
        sort: ReviewSort,
        count: usize,
    ) -> Result<ReviewPage, ProviderError>;
}

pub struct HttpProvider {
    http: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ReviewPayload {
    #[serde(default)]
    reviews: Vec<Value>,
    #[serde(default, rename = "continuationToken")]
    continuation_token: Option<String>,
}

impl HttpProvider {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|err| {
            ProviderError::Unavailable(format!("failed to build HTTP client: {err}"))
        })?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ProviderError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            ProviderError::Unavailable(format!("invalid provider URL {base_url}: {err}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Unavailable(format!(
                "provider URL {base_url} cannot be used as a base"
            )));
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(
        &self,
        app_id: &str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Value, ProviderError> {
        let display_url = url.to_string();
        debug!("GET {} {:?}", display_url, query);
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                url: display_url.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::AppNotFound {
                app_id: app_id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                url: display_url,
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ProviderError::Decode {
                url: display_url,
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl AppDataProvider for HttpProvider {
    async fn get_app(
        &self,
        app_id: &str,
        lang: &str,
        country: &str,
    ) -> Result<RawRecord, ProviderError> {
        let url = self.endpoint(&["apps", app_id]);
        let display_url = url.to_string();
        let query = [("lang", lang.to_string()), ("country", country.to_string())];

        match self.get_json(app_id, url, &query).await? {
            Value::Object(fields) => Ok(decode_record(fields)),
            other => Err(ProviderError::Decode {
                url: display_url,
                reason: format!("expected a JSON object, got {}", json_type_name(&other)),
            }),
        }
    }

    async fn get_reviews(
        &self,
        app_id: &str,
        lang: &str,
        country: &str,
        sort: ReviewSort,
        count: usize,
    ) -> Result<ReviewPage, ProviderError> {
        let url = self.endpoint(&["apps", app_id, "reviews"]);
        let display_url = url.to_string();
        let query = [
            ("lang", lang.to_string()),
            ("country", country.to_string()),
            ("sort", sort.as_str().to_string()),
            ("count", count.to_string()),
        ];

        let body = self.get_json(app_id, url, &query).await?;
        let payload: ReviewPayload =
            serde_json::from_value(body).map_err(|err| ProviderError::Decode {
                url: display_url.clone(),
                reason: err.to_string(),
            })?;

        let reviews = payload
            .reviews
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(fields) => Ok(decode_record(fields)),
                other => Err(ProviderError::Decode {
                    url: display_url.clone(),
                    reason: format!(
                        "review {} is {}, expected a JSON object",
                        index,
                        json_type_name(&other)
                    ),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReviewPage {
            reviews,
            continuation_token: payload.continuation_token,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn decode_record(fields: Map<String, Value>) -> RawRecord {
    fields
        .into_iter()
        .map(|(key, value)| {
            let decoded = decode_field(&key, value);
            (key, decoded)
        })
        .collect()
}

fn decode_field(key: &str, value: Value) -> ProviderValue {
    if TEMPORAL_KEYS.contains(&key) {
        if let Some(timestamp) = value.as_i64().and_then(Timestamp::from_unix_seconds) {
            return ProviderValue::Timestamp(timestamp);
        }
    }
    decode_value(value)
}

pub fn decode_value(value: Value) -> ProviderValue {
    match value {
        Value::Null => ProviderValue::Null,
        Value::Bool(flag) => ProviderValue::Bool(flag),
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(integer), _) => ProviderValue::Integer(integer),
            (None, Some(float)) => ProviderValue::Float(float),
            (None, None) => ProviderValue::Text(number.to_string()),
        },
        Value::String(text) => ProviderValue::Text(text),
        Value::Array(items) => {
            ProviderValue::Sequence(items.into_iter().map(decode_value).collect())
        }
        Value::Object(fields) => ProviderValue::Mapping(decode_record(fields)),
    }
}
