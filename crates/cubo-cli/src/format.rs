//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::Result;
use cubo_core::{Alert, AlertKind, ColumnStats, Evaluation, Indicators, Thresholds};
use owo_colors::OwoColorize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::cli::StyleMode;
use crate::style::{self, MISSING};
use crate::util::format_time;

/// Message shown when no alert fires.
pub const NOMINAL_MESSAGE: &str = "Conditions within configured ranges.";

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            no_header: false,
            compact: false,
            style: StyleMode::Rich,
        }
    }
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        let effective_no_color = no_color || style == StyleMode::Plain;
        Self {
            no_color: effective_no_color,
            no_header: false,
            compact: false,
            style,
        }
    }

    /// Check if rich styling is enabled.
    pub fn is_rich(&self) -> bool {
        self.style == StyleMode::Rich
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// Escape a string for CSV output.
/// Wraps the value in quotes if it contains commas, quotes, or newlines.
/// Double quotes are escaped by doubling them.
#[must_use]
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ============================================================================
// Indicator values
// ============================================================================

fn fixed(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.*}", decimals, v))
}

/// Temperature with one decimal, or a dash.
pub fn fmt_temperature(value: Option<f64>) -> String {
    fixed(value, 1)
}

/// Humidity with one decimal, or a dash.
pub fn fmt_humidity(value: Option<f64>) -> String {
    fixed(value, 1)
}

/// Acceleration magnitude with two decimals, or a dash.
pub fn fmt_accel(value: Option<f64>) -> String {
    fixed(value, 2)
}

/// `pitch° / roll°` rounded to whole degrees, or a dash when neither exists.
pub fn fmt_tilt(pitch: Option<f64>, roll: Option<f64>) -> String {
    if pitch.is_none() && roll.is_none() {
        return MISSING.to_string();
    }
    let angle = |a: Option<f64>| a.map_or_else(|| MISSING.to_string(), |v| format!("{:.0}°", v));
    format!("{} / {}", angle(pitch), angle(roll))
}

/// Append `unit` only when there is a value to qualify.
fn with_unit(value: Option<f64>, text: String, unit: &str) -> String {
    if value.is_some() {
        text + unit
    } else {
        text
    }
}

fn has_alert(alerts: &[Alert], kinds: &[AlertKind]) -> bool {
    alerts.iter().any(|a| kinds.contains(&a.kind))
}

// ============================================================================
// Evaluation (check command)
// ============================================================================

/// Human-readable readout followed by alerts or the all-clear message.
#[must_use]
pub fn format_evaluation_text(
    eval: &Evaluation,
    latest: Option<OffsetDateTime>,
    opts: &FormatOptions,
) -> String {
    let ind = &eval.indicators;
    let alerts = &eval.alerts;
    let mut output = String::new();

    if opts.is_rich() {
        output.push_str(&style::format_title("Cubo readout", opts.no_color));
        output.push_str("\n\n");
    }

    let kv = |key: &str, value: String, unit: &str| -> String {
        let unit = if value == MISSING { "" } else { unit };
        if opts.no_color {
            format!("  {:>11}:  {}{}\n", key, value, unit)
        } else {
            format!("  {:>11}:  {}{}\n", key.dimmed(), value, unit)
        }
    };

    let temp = style::format_value_colored(
        &fmt_temperature(ind.temperature),
        has_alert(alerts, &[AlertKind::HighTemperature, AlertKind::LowTemperature]),
        opts.no_color,
    );
    output.push_str(&kv("Temperature", temp, " °C"));

    let hum = style::format_value_colored(
        &fmt_humidity(ind.humidity),
        has_alert(alerts, &[AlertKind::HighHumidity, AlertKind::LowHumidity]),
        opts.no_color,
    );
    output.push_str(&kv("Humidity", hum, " %"));

    let accel = style::format_value_colored(
        &fmt_accel(ind.accel_mag),
        has_alert(alerts, &[AlertKind::Vibration]),
        opts.no_color,
    );
    output.push_str(&kv("|a|", accel, " g"));

    let tilt = style::format_value_colored(
        &fmt_tilt(ind.pitch, ind.roll),
        has_alert(alerts, &[AlertKind::PitchTilt, AlertKind::RollTilt]),
        opts.no_color,
    );
    output.push_str(&kv("Pitch/Roll", tilt, ""));

    if let Some(t) = latest {
        output.push_str(&kv("Updated", format_time(t), ""));
    }

    output.push('\n');
    if alerts.is_empty() {
        output.push_str(&style::format_success(NOMINAL_MESSAGE, opts.no_color));
        output.push('\n');
    } else {
        for alert in alerts {
            let (title, detail) = alert.as_pair();
            output.push_str(&style::format_alert(title, detail, opts.no_color));
            output.push('\n');
        }
    }

    output
}

#[derive(Serialize)]
struct EvaluationJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    nominal: bool,
    indicators: &'a Indicators,
    alerts: &'a [Alert],
    thresholds: &'a Thresholds,
}

/// JSON document with indicators, alerts and the thresholds that produced them.
pub fn format_evaluation_json(
    eval: &Evaluation,
    latest: Option<OffsetDateTime>,
    thresholds: &Thresholds,
    opts: &FormatOptions,
) -> Result<String> {
    let json = EvaluationJson {
        timestamp: latest.map(format_time),
        nominal: eval.is_nominal(),
        indicators: &eval.indicators,
        alerts: &eval.alerts,
        thresholds,
    };
    opts.as_json(&json)
}

/// CSV header shared by `check` and `watch`.
#[must_use]
pub fn format_evaluation_csv_header() -> String {
    "timestamp,temperature,humidity,accel_mag,pitch,roll,alerts\n".to_string()
}

/// One CSV row. Missing values are empty cells; alerts are `;`-separated.
#[must_use]
pub fn format_evaluation_csv_line(eval: &Evaluation, latest: Option<OffsetDateTime>) -> String {
    let ind = &eval.indicators;
    let cell = |v: Option<f64>, decimals: usize| {
        v.map(|v| format!("{:.*}", decimals, v)).unwrap_or_default()
    };
    let alerts = eval
        .alerts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "{},{},{},{},{},{},{}\n",
        latest.map(format_time).unwrap_or_default(),
        cell(ind.temperature, 1),
        cell(ind.humidity, 1),
        cell(ind.accel_mag, 3),
        cell(ind.pitch, 1),
        cell(ind.roll, 1),
        csv_escape(&alerts)
    )
}

#[must_use]
pub fn format_evaluation_csv(
    eval: &Evaluation,
    latest: Option<OffsetDateTime>,
    opts: &FormatOptions,
) -> String {
    let mut output = String::new();
    if !opts.no_header {
        output.push_str(&format_evaluation_csv_header());
    }
    output.push_str(&format_evaluation_csv_line(eval, latest));
    output
}

// ============================================================================
// Watch
// ============================================================================

/// One-line summary for `watch`, with trend arrows against the previous refresh.
#[must_use]
pub fn format_watch_line(
    eval: &Evaluation,
    previous: Option<&Indicators>,
    opts: &FormatOptions,
) -> String {
    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
    watch_line_at(&timestamp, eval, previous, opts)
}

fn watch_line_at(
    timestamp: &str,
    eval: &Evaluation,
    previous: Option<&Indicators>,
    opts: &FormatOptions,
) -> String {
    let ind = &eval.indicators;
    let trend = |current: Option<f64>, prev: Option<f64>, tolerance: f64| -> String {
        match (current, prev) {
            (Some(c), Some(p)) => {
                format!(" {}", style::trend_indicator(c, p, tolerance, opts.no_color))
            }
            _ => String::new(),
        }
    };

    let mut parts = vec![format!("[{}]", timestamp)];

    parts.push(format!(
        "T {}{}",
        with_unit(ind.temperature, fmt_temperature(ind.temperature), "°C"),
        trend(ind.temperature, previous.and_then(|p| p.temperature), 0.5)
    ));
    parts.push(format!(
        "H {}{}",
        with_unit(ind.humidity, fmt_humidity(ind.humidity), "%"),
        trend(ind.humidity, previous.and_then(|p| p.humidity), 1.0)
    ));
    parts.push(format!(
        "|a| {}{}",
        with_unit(ind.accel_mag, fmt_accel(ind.accel_mag), " g"),
        trend(ind.accel_mag, previous.and_then(|p| p.accel_mag), 0.05)
    ));
    parts.push(format!("tilt {}", fmt_tilt(ind.pitch, ind.roll)));

    if eval.alerts.is_empty() {
        parts.push(if opts.no_color {
            "[OK]".to_string()
        } else {
            format!("{}", "[OK]".green())
        });
    } else {
        let titles = eval
            .alerts
            .iter()
            .map(|a| a.title())
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(if opts.no_color {
            format!("[!!] {}", titles)
        } else {
            format!("{} {}", "[!!]".red(), titles)
        });
    }

    parts.join("  ") + "\n"
}

// ============================================================================
// Statistics
// ============================================================================

/// Descriptive statistics as a table, one row per column.
#[must_use]
pub fn format_stats_text(stats: &[ColumnStats], rows: usize, opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    if stats.is_empty() {
        return "No numeric columns found.\n".to_string();
    }

    let mut output = format!("Statistics ({} rows):\n\n", rows);

    let mut builder = Builder::default();
    builder.push_record([
        "Column", "Count", "Mean", "Std", "Min", "25%", "50%", "75%", "Max",
    ]);
    for s in stats {
        builder.push_record([
            s.column.clone(),
            s.count.to_string(),
            fixed(s.mean, 2),
            fixed(s.std, 2),
            fixed(s.min, 2),
            fixed(s.p25, 2),
            fixed(s.median, 2),
            fixed(s.p75, 2),
            fixed(s.max, 2),
        ]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    output.push_str(&table.to_string());
    output.push('\n');

    // Wide tables wrap badly on narrow terminals
    if style::terminal_width() < 80 {
        output.push_str("(Use --format csv or --format json for full precision)\n");
    }

    output
}

#[must_use]
pub fn format_stats_csv(stats: &[ColumnStats], opts: &FormatOptions) -> String {
    let cell = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    let mut output = String::new();
    if !opts.no_header {
        output.push_str("column,count,mean,std,min,p25,median,p75,max\n");
    }
    for s in stats {
        output.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            csv_escape(&s.column),
            s.count,
            cell(s.mean),
            cell(s.std),
            cell(s.min),
            cell(s.p25),
            cell(s.median),
            cell(s.p75),
            cell(s.max)
        ));
    }
    output
}

pub fn format_stats_json(stats: &[ColumnStats], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&stats)
}

// ============================================================================
// Devices
// ============================================================================

/// Device ids found in one CSV file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceListing {
    pub file: String,
    pub rows: usize,
    /// False when the file has no `device_id` column at all.
    pub tagged: bool,
    pub devices: Vec<String>,
}

#[must_use]
pub fn format_devices_text(listings: &[DeviceListing], opts: &FormatOptions) -> String {
    use tabled::builder::Builder;

    let mut builder = Builder::default();
    builder.push_record(["File", "Rows", "Devices"]);
    for l in listings {
        let devices = if !l.tagged {
            "(no device_id column)".to_string()
        } else if l.devices.is_empty() {
            "(none)".to_string()
        } else {
            l.devices.join(", ")
        };
        builder.push_record([l.file.clone(), l.rows.to_string(), devices]);
    }

    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    table.to_string() + "\n"
}

#[must_use]
pub fn format_devices_csv(listings: &[DeviceListing], opts: &FormatOptions) -> String {
    let mut output = String::new();
    if !opts.no_header {
        output.push_str("file,device_id\n");
    }
    for l in listings {
        for d in &l.devices {
            output.push_str(&format!("{},{}\n", csv_escape(&l.file), csv_escape(d)));
        }
    }
    output
}

pub fn format_devices_json(listings: &[DeviceListing], opts: &FormatOptions) -> Result<String> {
    opts.as_json(&listings)
}
