// Open-Meteo air-quality client implementation
use crate::application::air_quality_client::{AirQualityClient, FetchError};
use crate::domain::query::QueryParams;
use crate::domain::reading::{CurrentSection, DecodedResponse, HourlySection, LocationMetadata};
use crate::domain::variables::VariableRequest;
use crate::infrastructure::config::ApiSettings;
use crate::infrastructure::response_cache::ResponseCache;
use crate::infrastructure::retry::RetryPolicy;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_INTERVAL_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    cache: Option<ResponseCache>,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    elevation: f64,
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    timezone_abbreviation: String,
    #[serde(default)]
    current: Option<CurrentData>,
    #[serde(default)]
    hourly: Option<HourlyData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    time: i64,
    #[serde(flatten)]
    values: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct HourlyData {
    time: Vec<i64>,
    #[serde(flatten)]
    values: HashMap<String, Value>,
}

impl OpenMeteoClient {
    pub fn new(
        api: &ApiSettings,
        cache: Option<ResponseCache>,
        retry: RetryPolicy,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            cache,
            retry,
        })
    }

    fn build_query_url(&self, params: &QueryParams) -> String {
        let query = params
            .query_pairs()
            .into_iter()
            .chain(std::iter::once(("timeformat", "unixtime".to_string())))
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.base_url, query)
    }

    /// One GET attempt; only 2xx bodies come back as `Ok`
    async fn execute_request(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(FetchError::ServiceUnavailable(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        if !status.is_success() {
            let reason = error_reason(&body).unwrap_or_else(|| format!("HTTP {status}"));
            return Err(FetchError::RequestFailed(reason));
        }

        Ok(body)
    }

    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(url).await {
                tracing::debug!("Cache hit for {}", url);
                return Ok(body);
            }
            tracing::debug!("Cache miss for {}", url);
        }

        let body = self.retry.run(|| self.execute_request(url)).await?;

        if let Some(cache) = &self.cache {
            cache.put(url, &body).await;
        }

        Ok(body)
    }
}

#[async_trait]
impl AirQualityClient for OpenMeteoClient {
    async fn fetch(&self, params: &QueryParams) -> Result<DecodedResponse, FetchError> {
        let url = self.build_query_url(params);
        tracing::debug!("Requesting {}", url);

        let body = self.fetch_body(&url).await?;
        decode_response(&body, &params.current, &params.hourly)
    }
}

fn error_reason(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("reason")?.as_str().map(str::to_string)
}

/// Decode a JSON body into positional sections ordered like the request.
/// Multi-location answers are arrays; only the first location is kept.
pub fn decode_response(
    body: &str,
    current_names: &VariableRequest,
    hourly_names: &VariableRequest,
) -> Result<DecodedResponse, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::ParseError(e.to_string()))?;

    let first = match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::ParseError("Response contains no locations".to_string()))?,
        other => other,
    };

    if first.get("error").and_then(Value::as_bool) == Some(true) {
        let reason = first
            .get("reason")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(FetchError::RequestFailed(reason.to_string()));
    }

    let api: ApiResponse =
        serde_json::from_value(first).map_err(|e| FetchError::ParseError(e.to_string()))?;

    let current = api
        .current
        .map(|data| decode_current(data, current_names))
        .transpose()?;
    let hourly = api
        .hourly
        .map(|data| decode_hourly(data, hourly_names))
        .transpose()?;

    Ok(DecodedResponse {
        location: LocationMetadata {
            latitude: api.latitude,
            longitude: api.longitude,
            elevation: api.elevation,
            timezone: api.timezone,
            timezone_abbreviation: api.timezone_abbreviation,
            utc_offset_seconds: api.utc_offset_seconds,
        },
        current,
        hourly,
    })
}

fn decode_current(
    mut data: CurrentData,
    names: &VariableRequest,
) -> Result<CurrentSection, FetchError> {
    let values = names
        .iter()
        .map(|name| {
            let value = data.values.remove(name).ok_or_else(|| {
                FetchError::ParseError(format!("current variable '{name}' missing from response"))
            })?;
            to_scalar(name, &value)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CurrentSection::new(data.time, values))
}

fn decode_hourly(
    mut data: HourlyData,
    names: &VariableRequest,
) -> Result<HourlySection, FetchError> {
    let (start, end, interval) = hourly_axis(&data.time)?;

    let arrays = names
        .iter()
        .map(|name| {
            let value = data.values.remove(name).ok_or_else(|| {
                FetchError::ParseError(format!("hourly variable '{name}' missing from response"))
            })?;
            let items = value.as_array().ok_or_else(|| {
                FetchError::ParseError(format!("hourly variable '{name}' is not an array"))
            })?;
            items
                .iter()
                .map(|item| to_scalar(name, item))
                .collect::<Result<Vec<f64>, FetchError>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HourlySection::new(start, end, interval, arrays))
}

/// (start, end, interval) recovered from an explicit, regular timestamp list
fn hourly_axis(times: &[i64]) -> Result<(i64, i64, i64), FetchError> {
    let (first, last) = match (times.first(), times.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok((0, 0, DEFAULT_INTERVAL_SECS)),
    };

    let interval = match times {
        [_, second, ..] => second - first,
        _ => DEFAULT_INTERVAL_SECS,
    };
    if interval <= 0 || times.windows(2).any(|w| w[1] - w[0] != interval) {
        return Err(FetchError::ParseError(
            "hourly time axis is not evenly spaced".to_string(),
        ));
    }

    Ok((first, last + interval, interval))
}

/// Numbers pass through; `null` becomes the NaN missing-data sentinel
fn to_scalar(name: &str, value: &Value) -> Result<f64, FetchError> {
    match value {
        Value::Null => Ok(f64::NAN),
        other => other.as_f64().ok_or_else(|| {
            FetchError::ParseError(format!("variable '{name}' has non-numeric value {other}"))
        }),
    }
}
