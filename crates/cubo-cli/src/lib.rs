//! Command-line monitor for Cubo IoT sensors.
//!
//! The `cubo` binary reads CSV exports from an environmental sensor (DHT22:
//! temperature, humidity) and a motion sensor (MPU6050: acceleration,
//! optional pitch/roll), computes comfort and vibration indicators, and
//! reports threshold alerts.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `check` | Evaluate the latest readings once |
//! | `watch` | Re-read the files and re-evaluate on an interval |
//! | `stats` | Descriptive statistics for each numeric column |
//! | `devices` | List the device ids present in CSV files |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Output Formats
//!
//! - **Text** (default): Human-readable colored output
//! - **JSON**: Indicators, alerts and effective thresholds
//! - **CSV**: One row per evaluation, suitable for appending
//!
//! # Configuration
//!
//! The CLI stores configuration in `~/.config/cubo/config.toml` (or platform
//! equivalent, overridable with `CUBO_CONFIG`). Options include default data
//! files, device filter, output format, watch interval and a `[thresholds]`
//! table.
//!
//! # Environment Variables
//!
//! - `CUBO_ENV_FILE`, `CUBO_MOTION_FILE`: Default data files
//! - `CUBO_DEVICE`: Default device_id filter
//! - `CUBO_STYLE`: Output style (minimal, rich, plain)
//! - `NO_COLOR`: Disable colored output when set
//!
//! # Examples
//!
//! Check the last 12 hours of one device:
//! ```bash
//! cubo check --env-file dht22.csv --motion-file mpu6050.csv --device cubo-01 --since -12h
//! ```
//!
//! Evaluate hand-entered values against the strict preset:
//! ```bash
//! cubo check --preset strict --temperature 27.1 --accel 0.02,-0.01,1.01
//! ```
//!
//! Average one-minute windows before taking the latest values:
//! ```bash
//! cubo check --env-file dht22.csv --window 1m
//! ```
//!
//! Watch continuously, appending CSV rows to a file:
//! ```bash
//! cubo watch --format csv --interval 30 --output cubo.csv
//! ```

// This crate is primarily a binary CLI application.
// The command implementations live behind main.rs.

// Re-export core dependencies for convenience
pub use cubo_core;
pub use cubo_types;
