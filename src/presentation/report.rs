// Plain-text rendering of an air-quality report
use crate::application::report_service::AirQualityReport;
use std::env;

/// Every column, and head/tail rows only for long tables.
/// Values already present in the environment win.
pub fn configure_polars_display() {
    for (key, value) in [("POLARS_FMT_MAX_COLS", "-1"), ("POLARS_FMT_MAX_ROWS", "10")] {
        if env::var_os(key).is_none() {
            // SAFETY: runs first thing in `main`, before any other thread exists
            unsafe { env::set_var(key, value) };
        }
    }
}

pub fn render_report(report: &AirQualityReport) -> String {
    let location = &report.location;
    let mut lines = vec![
        format!(
            "Coordinates {}°N {}°E",
            format_float(location.latitude),
            format_float(location.longitude)
        ),
        format!("Elevation {} m asl", format_float(location.elevation)),
        format!(
            "Timezone {} {}",
            location.timezone, location.timezone_abbreviation
        ),
        format!(
            "Timezone difference to GMT+0 {} s",
            location.utc_offset_seconds
        ),
    ];

    if let Some(current) = &report.current {
        lines.push(format!("Current time {}", current.time));
        lines.extend(
            current
                .values
                .iter()
                .map(|(name, value)| format!("Current {} {}", name, format_float(*value))),
        );
    }

    if let Some(hourly) = &report.hourly {
        lines.push(hourly.frame().to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Whole numbers keep one decimal so every float reads as a float
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::{CurrentReading, LocationMetadata};
    use crate::domain::table::{AssembledTable, TimeAxis};

    fn table(rows: i64) -> AssembledTable {
        let dates = TimeAxis::new(1_704_067_200, 1_704_067_200 + rows * 3600, 3600)
            .timestamps()
            .unwrap();
        let mut table = AssembledTable::new(&dates).unwrap();
        table
            .push_column("pm10", (0..rows).map(|i| i as f64 + 0.5).collect())
            .unwrap();
        table
            .push_column("dust", (0..rows).map(|_| f64::NAN).collect())
            .unwrap();
        table
    }

    fn report(hourly: Option<AssembledTable>) -> AirQualityReport {
        AirQualityReport {
            location: LocationMetadata {
                latitude: 50.04,
                longitude: 1.42,
                elevation: 12.0,
                timezone: "Europe/Berlin".to_string(),
                timezone_abbreviation: "CET".to_string(),
                utc_offset_seconds: 3600,
            },
            current: Some(CurrentReading::new(
                1_704_067_200,
                vec![("european_aqi".to_string(), 35.0), ("pm10".to_string(), 12.5)],
            )),
            hourly,
        }
    }

    #[test]
    fn test_report_header_and_current_lines() {
        let text = render_report(&report(None));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Coordinates 50.04°N 1.42°E",
                "Elevation 12.0 m asl",
                "Timezone Europe/Berlin CET",
                "Timezone difference to GMT+0 3600 s",
                "Current time 1704067200",
                "Current european_aqi 35.0",
                "Current pm10 12.5",
            ]
        );
    }

    #[test]
    fn test_floats_print_alike() {
        assert_eq!(format_float(12.0), "12.0");
        assert_eq!(format_float(-0.5), "-0.5");
        assert_eq!(format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_report_ends_with_frame() {
        let hourly = table(2);
        let frame = hourly.frame().to_string();
        let text = render_report(&report(Some(hourly)));

        assert!(text.ends_with(&format!("{frame}\n")));
        assert!(frame.contains("shape: (2, 3)"));
        assert!(frame.contains("datetime[ms, UTC]"));
        assert!(frame.contains("2024-01-01 01:00:00"));
        assert!(frame.contains("pm10"));
        assert!(frame.contains("NaN"));
    }

    #[test]
    fn test_long_frame_is_elided() {
        let frame = table(100).frame().to_string();

        assert!(frame.contains("shape: (100, 3)"));
        assert!(frame.contains('…'));
        // row 50 sits in the elided middle
        assert!(!frame.contains("2024-01-03 02:00:00"));
    }

    #[test]
    fn test_empty_frame_keeps_columns() {
        let frame = table(0).frame().to_string();

        assert!(frame.contains("shape: (0, 3)"));
        assert!(frame.contains("dust"));
    }
}
