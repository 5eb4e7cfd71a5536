//! Time-indexed sensor tables loaded from CSV.
//!
//! A [`SensorFrame`] is the "wide" layout produced by pivoting a time-series
//! query: one row per timestamp, one column per field. Frames are the data
//! source for the indicator engine; [`SensorFrame::env_sample`] and
//! [`SensorFrame::motion_sample`] reduce a frame to the latest valid values.
//!
//! Recognized columns:
//!
//! | Column | Meaning |
//! |--------|---------|
//! | `_time`, `time` | Row timestamp |
//! | `device_id` | Device tag |
//! | `result`, `table`, `_start`, `_stop`, `_measurement`, unnamed | Ignored |
//! | anything else | Numeric field |
//!
//! # Example
//!
//! ```
//! use cubo_core::SensorFrame;
//!
//! let csv = "_time,temperature,humidity\n\
//!            2024-05-01T12:00:00Z,21.0,40\n\
//!            2024-05-01T12:01:00Z,21.5,\n";
//! let frame = SensorFrame::from_reader(csv.as_bytes()).unwrap();
//!
//! let env = frame.env_sample();
//! assert_eq!(env.temperature, Some(21.5));
//! assert_eq!(env.humidity, Some(40.0));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use time::{Duration, OffsetDateTime};
use time::PrimitiveDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use cubo_types::{Acceleration, EnvSample, MotionSample, Tilt};

use crate::error::{Error, Result};

/// Well-known field names.
pub mod fields {
    pub const TEMPERATURE: &str = "temperature";
    pub const HUMIDITY: &str = "humidity";
    pub const ACCEL_X: &str = "accel_x";
    pub const ACCEL_Y: &str = "accel_y";
    pub const ACCEL_Z: &str = "accel_z";
    pub const PITCH: &str = "pitch";
    pub const ROLL: &str = "roll";
}

const TIME_COLUMNS: [&str; 2] = ["_time", "time"];
const DEVICE_COLUMN: &str = "device_id";
const IGNORED_COLUMNS: [&str; 5] = ["result", "table", "_start", "_stop", "_measurement"];

#[derive(Debug, Clone, Copy)]
enum ColumnRole {
    Time,
    Device,
    Ignored,
    Value(usize),
}

#[derive(Debug, Clone, PartialEq)]
struct Row {
    time: Option<OffsetDateTime>,
    device: Option<String>,
    values: Vec<Option<f64>>,
}

/// A wide table of sensor readings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorFrame {
    columns: Vec<String>,
    rows: Vec<Row>,
    has_device_column: bool,
}

impl SensorFrame {
    /// Load a frame from a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let frame = Self::from_reader(file)?;
        tracing::debug!(
            path = %path.display(),
            rows = frame.len(),
            columns = frame.columns.len(),
            "loaded sensor frame"
        );
        Ok(frame)
    }

    /// Load a frame from any CSV source.
    ///
    /// Lines starting with `#` (Influx annotations) are skipped. Rows are
    /// sorted by timestamp when timestamps are present.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(Error::MissingHeader);
        }

        let mut columns = Vec::new();
        let mut has_device_column = false;
        let roles: Vec<ColumnRole> = headers
            .iter()
            .map(|name| {
                if TIME_COLUMNS.contains(&name) {
                    ColumnRole::Time
                } else if name == DEVICE_COLUMN {
                    has_device_column = true;
                    ColumnRole::Device
                } else if name.is_empty() || IGNORED_COLUMNS.contains(&name) {
                    ColumnRole::Ignored
                } else {
                    columns.push(name.to_string());
                    ColumnRole::Value(columns.len() - 1)
                }
            })
            .collect();

        let mut rows = Vec::new();
        for (index, record) in rdr.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 2);

            let mut row = Row {
                time: None,
                device: None,
                values: vec![None; columns.len()],
            };

            for (role, cell) in roles.iter().zip(record.iter()) {
                match *role {
                    ColumnRole::Time if !cell.is_empty() => {
                        row.time = Some(parse_timestamp(cell).ok_or_else(|| {
                            Error::InvalidTimestamp {
                                line,
                                value: cell.to_string(),
                            }
                        })?);
                    }
                    ColumnRole::Device if !cell.is_empty() => {
                        row.device = Some(cell.to_string());
                    }
                    ColumnRole::Value(i) => {
                        row.values[i] = parse_cell(cell).map_err(|_| Error::InvalidValue {
                            line,
                            column: columns[i].clone(),
                            value: cell.to_string(),
                        })?;
                    }
                    _ => {}
                }
            }
            rows.push(row);
        }

        if rows.iter().any(|r| r.time.is_some()) {
            rows.sort_by_key(|r| r.time);
        }

        Ok(Self {
            columns,
            rows,
            has_device_column,
        })
    }

    /// Numeric column names in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// True when the source had a `device_id` column.
    pub fn has_device_column(&self) -> bool {
        self.has_device_column
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Present values of a column, in row order.
    pub fn values(&self, name: &str) -> Vec<f64> {
        match self.column_index(name) {
            Some(i) => self.rows.iter().filter_map(|r| r.values[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Last present value of a column.
    ///
    /// `None` when the column is absent or has no values.
    pub fn last_value(&self, name: &str) -> Option<f64> {
        let i = self.column_index(name)?;
        self.rows.iter().rev().find_map(|r| r.values[i])
    }

    /// Timestamp of the newest row.
    pub fn latest_time(&self) -> Option<OffsetDateTime> {
        self.rows.iter().filter_map(|r| r.time).max()
    }

    /// Sorted distinct device ids.
    pub fn devices(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|r| r.device.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keep the rows matching `filter`.
    ///
    /// A device filter on a frame without a `device_id` column is ignored.
    /// Rows without a timestamp never match a time bound.
    pub fn filter(&self, filter: &FrameFilter) -> SensorFrame {
        let device = match &filter.device {
            Some(d) if !self.has_device_column => {
                tracing::warn!(device = %d, "frame has no device_id column; device filter ignored");
                None
            }
            other => other.as_deref(),
        };

        let rows = self
            .rows
            .iter()
            .filter(|r| {
                if let Some(d) = device
                    && r.device.as_deref() != Some(d)
                {
                    return false;
                }
                if filter.since.is_some() || filter.until.is_some() {
                    let Some(t) = r.time else {
                        return false;
                    };
                    if let Some(since) = filter.since
                        && t < since
                    {
                        return false;
                    }
                    if let Some(until) = filter.until
                        && t > until
                    {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        SensorFrame {
            columns: self.columns.clone(),
            rows,
            has_device_column: self.has_device_column,
        }
    }

    /// Average rows into fixed time windows aligned to the Unix epoch.
    ///
    /// Each device gets its own series, and each window becomes one row
    /// stamped with the window's end. A column's value is the mean of its
    /// present cells in that window, or missing when it has none. Windows
    /// with no rows are not emitted, and rows without a timestamp are
    /// dropped. A non-positive `window` returns the frame unchanged.
    pub fn aggregate(&self, window: Duration) -> SensorFrame {
        let width = window.whole_nanoseconds();
        if width <= 0 {
            return self.clone();
        }

        // (window index, device) -> per-column (sum, count), latest row time
        let mut buckets: BTreeMap<(i128, Option<String>), (Vec<(f64, u32)>, OffsetDateTime)> =
            BTreeMap::new();
        for row in &self.rows {
            let Some(t) = row.time else {
                continue;
            };
            let index = t.unix_timestamp_nanos().div_euclid(width);
            let (sums, last) = buckets
                .entry((index, row.device.clone()))
                .or_insert_with(|| (vec![(0.0, 0); self.columns.len()], t));
            for (acc, value) in sums.iter_mut().zip(&row.values) {
                if let Some(v) = value {
                    acc.0 += v;
                    acc.1 += 1;
                }
            }
            *last = (*last).max(t);
        }

        let mut rows: Vec<Row> = buckets
            .into_iter()
            .map(|((index, device), (sums, last))| {
                let end = index
                    .checked_add(1)
                    .and_then(|i| i.checked_mul(width))
                    .and_then(|ns| OffsetDateTime::from_unix_timestamp_nanos(ns).ok())
                    .unwrap_or(last);
                Row {
                    time: Some(end),
                    device,
                    values: sums
                        .into_iter()
                        .map(|(sum, count)| (count > 0).then(|| sum / f64::from(count)))
                        .collect(),
                }
            })
            .collect();
        rows.sort_by_key(|r| r.time);

        tracing::debug!(
            window_secs = window.whole_seconds(),
            rows_in = self.rows.len(),
            rows_out = rows.len(),
            "aggregated frame"
        );

        SensorFrame {
            columns: self.columns.clone(),
            rows,
            has_device_column: self.has_device_column,
        }
    }

    /// Latest temperature and humidity.
    pub fn env_sample(&self) -> EnvSample {
        EnvSample::new(
            self.last_value(fields::TEMPERATURE),
            self.last_value(fields::HUMIDITY),
        )
    }

    /// Latest acceleration and, when both angle columns exist, orientation.
    ///
    /// Each axis takes its own last value, so components may come from
    /// different rows when cells are missing.
    pub fn motion_sample(&self) -> MotionSample {
        let acceleration = match (
            self.last_value(fields::ACCEL_X),
            self.last_value(fields::ACCEL_Y),
            self.last_value(fields::ACCEL_Z),
        ) {
            (Some(x), Some(y), Some(z)) => Some(Acceleration::new(x, y, z)),
            _ => None,
        };

        let tilt = (self.has_column(fields::PITCH) && self.has_column(fields::ROLL)).then(|| Tilt {
            pitch: self.last_value(fields::PITCH),
            roll: self.last_value(fields::ROLL),
        });

        MotionSample { acceleration, tilt }
    }
}

/// Row filter for [`SensorFrame::filter`].
///
/// # Example
///
/// ```
/// use cubo_core::FrameFilter;
///
/// let filter = FrameFilter::new().device("cubo-01");
/// assert_eq!(filter.device.as_deref(), Some("cubo-01"));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameFilter {
    /// Keep only rows tagged with this device.
    pub device: Option<String>,
    /// Keep rows at or after this time.
    pub since: Option<OffsetDateTime>,
    /// Keep rows at or before this time.
    pub until: Option<OffsetDateTime>,
}

impl FrameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, device_id: &str) -> Self {
        self.device = Some(device_id.to_string());
        self
    }

    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// True when the filter keeps every row.
    pub fn is_empty(&self) -> bool {
        self.device.is_none() && self.since.is_none() && self.until.is_none()
    }
}

fn parse_cell(cell: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    if cell.is_empty() {
        return Ok(None);
    }
    let value: f64 = cell.parse()?;
    Ok((!value.is_nan()).then_some(value))
}

/// Parse a timestamp as written by time-series exports.
///
/// Accepts RFC3339, the same with a space instead of `T` (pandas style),
/// a naive `YYYY-MM-DD HH:MM:SS[.fff]` taken as UTC, and a bare
/// `YYYY-MM-DD` taken as UTC midnight.
pub fn parse_timestamp(s: &str) -> Option<OffsetDateTime> {
    let s = s.trim();
    if let Ok(t) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(t);
    }

    let with_t = s.replacen(' ', "T", 1);
    if let Ok(t) = OffsetDateTime::parse(&with_t, &Rfc3339) {
        return Some(t);
    }

    let naive = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    if let Ok(t) = PrimitiveDateTime::parse(s, naive) {
        return Some(t.assume_utc());
    }

    let date = format_description!("[year]-[month]-[day]");
    time::Date::parse(s, date)
        .ok()
        .map(|d| d.midnight().assume_utc())
}
