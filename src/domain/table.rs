// Time axis and assembled table domain models
use chrono::{DateTime, Utc};
use polars::prelude::{Column, DataFrame, DataType, PolarsError, TimeUnit};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("{section} section has {values} values for {names} requested variables")]
    VariableCountMismatch {
        section: &'static str,
        names: usize,
        values: usize,
    },

    #[error("{0} variables were requested but the response has no {0} section")]
    MissingSection(&'static str),

    #[error("column '{column}' has {actual} values but the time axis has {expected} timestamps")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("time axis interval must be positive, got {0}s")]
    InvalidInterval(i64),

    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),

    #[error("time axis of {0} timestamps cannot be allocated")]
    AxisTooLarge(usize),

    #[error("table frame error: {0}")]
    Frame(String),
}

impl From<PolarsError> for AssemblyError {
    fn from(err: PolarsError) -> Self {
        AssemblyError::Frame(err.to_string())
    }
}

/// Axis descriptor: (start, end, interval) in seconds since epoch, UTC.
/// Expands left-inclusive, right-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    pub start: i64,
    pub end: i64,
    pub interval: i64,
}

impl TimeAxis {
    pub fn new(start: i64, end: i64, interval: i64) -> Self {
        Self {
            start,
            end,
            interval,
        }
    }

    /// Number of timestamps: ceil((end - start) / interval), zero when end <= start
    pub fn len(&self) -> Result<usize, AssemblyError> {
        if self.interval <= 0 {
            return Err(AssemblyError::InvalidInterval(self.interval));
        }
        if self.end <= self.start {
            return Ok(0);
        }

        let span = i128::from(self.end) - i128::from(self.start);
        let interval = i128::from(self.interval);
        let count = (span + interval - 1) / interval;
        usize::try_from(count).map_err(|_| AssemblyError::TimestampOutOfRange(self.end))
    }

    pub fn timestamps(&self) -> Result<Vec<DateTime<Utc>>, AssemblyError> {
        let len = self.len()?;
        let Some(last_index) = len.checked_sub(1) else {
            return Ok(Vec::new());
        };

        // Both ends must be representable before anything is allocated
        let last = i128::from(self.start) + last_index as i128 * i128::from(self.interval);
        let last = i64::try_from(last).unwrap_or(i64::MAX);
        for bound in [self.start, last] {
            DateTime::from_timestamp(bound, 0).ok_or(AssemblyError::TimestampOutOfRange(bound))?;
        }

        let mut timestamps = Vec::new();
        timestamps
            .try_reserve_exact(len)
            .map_err(|_| AssemblyError::AxisTooLarge(len))?;

        let mut t = self.start;
        for _ in 0..len {
            let stamp =
                DateTime::from_timestamp(t, 0).ok_or(AssemblyError::TimestampOutOfRange(t))?;
            timestamps.push(stamp);
            t = t.saturating_add(self.interval);
        }

        Ok(timestamps)
    }
}

/// Row-per-timestamp frame. Column order is "date" (UTC datetime) first,
/// then f64 value columns in insertion order. Names are unique.
#[derive(Debug, Clone)]
pub struct AssembledTable {
    frame: DataFrame,
}

impl AssembledTable {
    pub const DATE_COLUMN: &'static str = "date";

    pub fn new(dates: &[DateTime<Utc>]) -> Result<Self, AssemblyError> {
        let millis: Vec<i64> = dates.iter().map(DateTime::timestamp_millis).collect();
        let date = Column::new(Self::DATE_COLUMN.into(), millis).cast(&DataType::Datetime(
            TimeUnit::Milliseconds,
            Some("UTC".into()),
        ))?;

        Ok(Self {
            frame: DataFrame::new(vec![date])?,
        })
    }

    /// Append a value column. Its length must match the date column exactly.
    pub fn push_column(&mut self, name: &str, values: Vec<f64>) -> Result<(), AssemblyError> {
        // `with_column` would silently replace an existing column
        if self.frame.column(name).is_ok() {
            return Err(AssemblyError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.frame.height() {
            return Err(AssemblyError::LengthMismatch {
                column: name.to_string(),
                expected: self.frame.height(),
                actual: values.len(),
            });
        }

        self.frame.with_column(Column::new(name.into(), values))?;
        Ok(())
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }
}
