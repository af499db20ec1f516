// Decoded API response and current reading domain models

/// Location metadata echoed back by the API
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMetadata {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub utc_offset_seconds: i32,
}

/// Single-timestamp snapshot; values carry no names, only positions.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSection {
    time: i64,
    values: Vec<f64>,
}

impl CurrentSection {
    pub fn new(time: i64, values: Vec<f64>) -> Self {
        Self { time, values }
    }

    /// Seconds since epoch, UTC
    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Fixed-interval series; every array shares the axis given by
/// (`time`, `time_end`, `interval`).
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySection {
    time: i64,
    time_end: i64,
    interval: i64,
    arrays: Vec<Vec<f64>>,
}

impl HourlySection {
    pub fn new(time: i64, time_end: i64, interval: i64, arrays: Vec<Vec<f64>>) -> Self {
        Self {
            time,
            time_end,
            interval,
            arrays,
        }
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn time_end(&self) -> i64 {
        self.time_end
    }

    pub fn interval(&self) -> i64 {
        self.interval
    }

    pub fn array_at(&self, index: usize) -> Option<&[f64]> {
        self.arrays.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }
}

/// Everything the fetch collaborator hands back for one location
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedResponse {
    pub location: LocationMetadata,
    pub current: Option<CurrentSection>,
    pub hourly: Option<HourlySection>,
}

/// Current values bound to their variable names, in request order
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReading {
    pub time: i64,
    pub values: Vec<(String, f64)>,
}

impl CurrentReading {
    pub fn new(time: i64, values: Vec<(String, f64)>) -> Self {
        Self { time, values }
    }
}
