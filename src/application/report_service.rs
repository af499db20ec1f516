// Report service - Use case for fetching and assembling an air-quality report
use crate::application::air_quality_client::AirQualityClient;
use crate::application::table_assembler::assemble_response;
use crate::domain::query::QueryParams;
use crate::domain::reading::{CurrentReading, LocationMetadata};
use crate::domain::table::AssembledTable;
use anyhow::Context;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AirQualityReport {
    pub location: LocationMetadata,
    pub current: Option<CurrentReading>,
    pub hourly: Option<AssembledTable>,
}

#[derive(Clone)]
pub struct AirQualityReportService {
    client: Arc<dyn AirQualityClient>,
}

impl AirQualityReportService {
    pub fn new(client: Arc<dyn AirQualityClient>) -> Self {
        Self { client }
    }

    pub async fn build_report(&self, params: &QueryParams) -> anyhow::Result<AirQualityReport> {
        tracing::info!(
            latitude = params.latitude,
            longitude = params.longitude,
            start_date = %params.start_date,
            end_date = %params.end_date,
            "Fetching air-quality data"
        );

        let response = self
            .client
            .fetch(params)
            .await
            .context("Failed to fetch air-quality data")?;

        let (current, hourly) = assemble_response(&response, &params.current, &params.hourly)
            .context("Failed to assemble air-quality response")?;

        tracing::info!(
            current_variables = current.as_ref().map_or(0, |c| c.values.len()),
            hourly_rows = hourly.as_ref().map_or(0, AssembledTable::row_count),
            "Assembled air-quality report"
        );

        Ok(AirQualityReport {
            location: response.location,
            current,
            hourly,
        })
    }
}
