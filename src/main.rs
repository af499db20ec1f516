// Main entry point - Dependency wiring and report output
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::report_service::AirQualityReportService;
use crate::domain::query::QueryParams;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::open_meteo_client::OpenMeteoClient;
use crate::infrastructure::response_cache::ResponseCache;
use crate::presentation::report::{configure_polars_display, render_report};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    configure_polars_display();

    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_app_config()?;
    let params = QueryParams::try_from(&config.query)?;

    let cache = match ResponseCache::from_settings(&config.cache) {
        Ok(cache) => Some(cache),
        Err(e) => {
            tracing::warn!(
                "Response cache at {} unavailable, continuing without it: {}",
                config.cache.dir.display(),
                e
            );
            None
        }
    };

    let client = OpenMeteoClient::new(&config.api, cache, config.retry.clone())?;
    let service = AirQualityReportService::new(Arc::new(client));

    let report = service.build_report(&params).await?;
    print!("{}", render_report(&report));

    Ok(())
}
