use crate::domain::query::QueryParams;
use crate::domain::variables::VariableRequest;
use crate::infrastructure::response_cache::CacheSettings;
use crate::infrastructure::retry::RetryPolicy;
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// The fixed request literals. Order within `current` and `hourly` decides
/// which decoded value belongs to which name.
#[derive(Debug, Deserialize, Clone)]
pub struct QueryConfig {
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    #[serde(default = "default_current")]
    pub current: Vec<String>,
    #[serde(default = "default_hourly")]
    pub hourly: Vec<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_start_date")]
    pub start_date: String,
    #[serde(default = "default_end_date")]
    pub end_date: String,
}

fn default_latitude() -> f64 {
    50.0461
}

fn default_longitude() -> f64 {
    1.4208
}

const HOURLY_VARIABLES: [&str; 10] = [
    "pm10",
    "pm2_5",
    "carbon_monoxide",
    "nitrogen_dioxide",
    "sulphur_dioxide",
    "ozone",
    "dust",
    "uv_index",
    "uv_index_clear_sky",
    "ammonia",
];

fn default_current() -> Vec<String> {
    std::iter::once("european_aqi")
        .chain(HOURLY_VARIABLES)
        .map(String::from)
        .collect()
}

fn default_hourly() -> Vec<String> {
    HOURLY_VARIABLES.iter().map(|s| s.to_string()).collect()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_start_date() -> String {
    "2024-01-01".to_string()
}

fn default_end_date() -> String {
    "2024-05-15".to_string()
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            current: default_current(),
            hourly: default_hourly(),
            timezone: default_timezone(),
            start_date: default_start_date(),
            end_date: default_end_date(),
        }
    }
}

impl TryFrom<&QueryConfig> for QueryParams {
    type Error = anyhow::Error;

    fn try_from(config: &QueryConfig) -> anyhow::Result<Self> {
        Ok(Self {
            latitude: config.latitude,
            longitude: config.longitude,
            current: VariableRequest::new(config.current.iter().cloned()),
            hourly: VariableRequest::new(config.hourly.iter().cloned()),
            timezone: config.timezone.clone(),
            start_date: parse_date("start_date", &config.start_date)?,
            end_date: parse_date("end_date", &config.end_date)?,
        })
    }
}

fn parse_date(key: &str, value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid {key} '{value}', expected YYYY-MM-DD"))
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/air_quality")
}

/// Load settings from `path` (any format the config crate knows). A missing
/// file falls back to the built-in defaults.
pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}
