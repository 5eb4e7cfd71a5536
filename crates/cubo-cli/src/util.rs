//! Utility functions for CLI operations.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cubo_core::{EnvSample, FrameFilter, MotionSample, SensorFrame, Tilt};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use crate::cli::{SampleArgs, SourceArgs};

/// Require at least one data source, with a helpful error message.
pub fn require_source(source: &SourceArgs, sample: &SampleArgs) -> Result<()> {
    if source.env_file.is_none() && source.motion_file.is_none() && sample.is_empty() {
        bail!(
            "No input specified. Use --env-file and/or --motion-file (or set CUBO_ENV_FILE / \
             CUBO_MOTION_FILE), or pass values such as --temperature and --accel.\n\
             Run 'cubo config set env-file <PATH>' to store a default."
        );
    }
    Ok(())
}

/// Parse a `--since`/`--until` value.
///
/// Accepts RFC3339, `YYYY-MM-DD` (start of day, UTC), or a relative offset
/// into the past such as `-30m`, `12h` or `7d`.
pub fn parse_datetime(s: &str) -> Result<OffsetDateTime> {
    parse_datetime_at(s, OffsetDateTime::now_utc())
}

fn parse_datetime_at(s: &str, now: OffsetDateTime) -> Result<OffsetDateTime> {
    let s = s.trim();

    if let Some((amount, unit_secs)) = split_span(s.strip_prefix('-').unwrap_or(s)) {
        let Some(t) = amount
            .checked_mul(unit_secs)
            .and_then(|secs| now.checked_sub(Duration::seconds(secs)))
        else {
            bail!("Relative range '{}' is out of range", s);
        };
        return Ok(t);
    }

    // Try RFC3339 first (e.g., "2024-01-15T10:30:00Z")
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt);
    }

    // Same forms as CSV timestamps, including YYYY-MM-DD
    if let Some(dt) = cubo_core::parse_timestamp(s) {
        return Ok(dt);
    }

    bail!(
        "Invalid date format '{}'. Use RFC3339 (e.g., 2024-01-15T10:30:00Z), YYYY-MM-DD, \
         or a relative range like -30m, -12h, -7d",
        s
    )
}

/// Parse a `--window` value such as `10s`, `1m` or `15m`.
pub fn parse_window(s: &str) -> Result<Duration> {
    let s = s.trim();
    let Some((amount, unit_secs)) = split_span(s) else {
        bail!(
            "Invalid window '{}'. Use a duration like 10s, 30s, 1m, 5m or 15m",
            s
        );
    };
    match amount.checked_mul(unit_secs) {
        Some(0) => bail!("Window '{}' must be longer than zero", s),
        Some(secs) => Ok(Duration::seconds(secs)),
        None => bail!("Window '{}' is out of range", s),
    }
}

/// Split `<n><unit>` into the count and the unit's length in seconds.
///
/// Units are s, m, h, d and w. Negative counts are not a span.
fn split_span(s: &str) -> Option<(i64, i64)> {
    let unit = s.chars().last()?;
    let unit_secs = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        'w' => 604_800,
        _ => return None,
    };
    let amount: i64 = s[..s.len() - unit.len_utf8()].parse().ok()?;
    (amount >= 0).then_some((amount, unit_secs))
}

/// Build a row filter from the device and time arguments.
pub fn build_filter(
    device: Option<&str>,
    since: Option<&str>,
    until: Option<&str>,
) -> Result<FrameFilter> {
    // Parse date filters upfront to fail fast
    let since = since.map(parse_datetime).transpose()?;
    let until = until.map(parse_datetime).transpose()?;
    if let (Some(s), Some(u)) = (since, until)
        && s > u
    {
        bail!("--since must not be later than --until");
    }

    let mut filter = FrameFilter::new();
    if let Some(d) = device {
        filter = filter.device(d);
    }
    if let Some(s) = since {
        filter = filter.since(s);
    }
    if let Some(u) = until {
        filter = filter.until(u);
    }
    Ok(filter)
}

/// Which rows to read: a filter, then optional window averaging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub filter: FrameFilter,
    pub window: Option<Duration>,
}

impl Selection {
    /// Parse the selection arguments once, before any file is read.
    pub fn parse(
        device: Option<&str>,
        since: Option<&str>,
        until: Option<&str>,
        window: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            filter: build_filter(device, since, until)?,
            window: window.map(parse_window).transpose()?,
        })
    }

    pub fn from_source(source: &SourceArgs) -> Result<Self> {
        Self::parse(
            source.device.as_deref(),
            source.since.as_deref(),
            source.until.as_deref(),
            source.window.as_deref(),
        )
    }
}

/// Load a CSV file and apply a selection.
pub fn load_frame(path: &Path, selection: &Selection) -> Result<SensorFrame> {
    let mut frame = SensorFrame::from_path(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = frame.len(), "loaded frame");
    if !selection.filter.is_empty() {
        frame = frame.filter(&selection.filter);
        tracing::debug!(rows = frame.len(), "rows after filter");
    }
    if let Some(window) = selection.window {
        frame = frame.aggregate(window);
    }
    Ok(frame)
}

/// Latest samples read from the configured sources.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub env: EnvSample,
    pub motion: MotionSample,
    /// Timestamp of the newest row across both files.
    pub latest: Option<OffsetDateTime>,
}

/// Read the latest environmental and motion samples.
///
/// A missing source yields an empty sample rather than an error.
pub fn load_inputs(source: &SourceArgs, selection: &Selection) -> Result<Inputs> {
    let mut inputs = Inputs::default();
    if let Some(path) = &source.env_file {
        let frame = load_frame(path, selection)?;
        if frame.is_empty() {
            tracing::warn!(path = %path.display(), "no environmental rows match");
        }
        inputs.env = frame.env_sample();
        inputs.latest = frame.latest_time();
    }
    if let Some(path) = &source.motion_file {
        let frame = load_frame(path, selection)?;
        if frame.is_empty() {
            tracing::warn!(path = %path.display(), "no motion rows match");
        }
        inputs.motion = frame.motion_sample();
        inputs.latest = inputs.latest.max(frame.latest_time());
    }
    Ok(inputs)
}

/// Overlay values given on the command line onto loaded samples.
///
/// `--pitch` or `--roll` replaces any angles from the file, so the other
/// angle is only kept when it came from the file too.
pub fn apply_sample_overrides(inputs: &mut Inputs, sample: &SampleArgs) {
    if let Some(t) = sample.temperature {
        inputs.env.temperature = Some(t);
    }
    if let Some(h) = sample.humidity {
        inputs.env.humidity = Some(h);
    }
    if let Some(a) = sample.accel {
        inputs.motion.acceleration = Some(a);
    }
    if sample.pitch.is_some() || sample.roll.is_some() {
        let existing = inputs.motion.tilt.unwrap_or_default();
        inputs.motion.tilt = Some(Tilt {
            pitch: sample.pitch.or(existing.pitch),
            roll: sample.roll.or(existing.roll),
        });
    }
}

/// Format a timestamp for display.
pub fn format_time(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_else(|_| t.to_string())
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Append output to a file, or write to stdout.
///
/// Used by `watch`, where every refresh adds to the same destination.
pub fn append_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => write_output(None, content)?,
    }
    Ok(())
}
