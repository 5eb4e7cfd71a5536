//! Descriptive statistics for sensor frames.
//!
//! Follows the usual `describe()` conventions: sample standard deviation
//! (n - 1) and quartiles by linear interpolation between order statistics.

use serde::Serialize;

use crate::frame::SensorFrame;

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    /// Number of present values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnStats {
    /// Summarize a set of values.
    pub fn from_values(column: &str, values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                column: column.to_string(),
                count,
                mean: None,
                std: None,
                min: None,
                p25: None,
                median: None,
                p75: None,
                max: None,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (count > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        });

        Self {
            column: column.to_string(),
            count,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            p25: Some(quantile(&sorted, 0.25)),
            median: Some(quantile(&sorted, 0.5)),
            p75: Some(quantile(&sorted, 0.75)),
            max: sorted.last().copied(),
        }
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Summarize every numeric column of a frame, in header order.
pub fn describe(frame: &SensorFrame) -> Vec<ColumnStats> {
    frame
        .columns()
        .iter()
        .map(|c| ColumnStats::from_values(c, &frame.values(c)))
        .collect()
}
