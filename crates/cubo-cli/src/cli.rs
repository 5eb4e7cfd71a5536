//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cubo_core::{Acceleration, ThresholdKey, Thresholds};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse a format name as stored in the config file.
    pub fn from_config(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Standard styling with colors
    Minimal,
    /// Rich styling with tables and titles (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

/// Named threshold presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// 18-28 °C, 30-70 %, 1.20 g, 25°
    Default,
    /// 20-26 °C, 35-60 %, 1.10 g, 15°
    Strict,
    /// 10-35 °C, 20-80 %, 1.50 g, 40°
    Relaxed,
}

impl Preset {
    pub fn thresholds(self) -> Thresholds {
        match self {
            Preset::Default => Thresholds::default(),
            Preset::Strict => Thresholds::strict(),
            Preset::Relaxed => Thresholds::relaxed(),
        }
    }
}

/// Where sensor data comes from and which rows to use
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// Environmental CSV (temperature, humidity), or use CUBO_ENV_FILE env var
    #[arg(short, long, env = "CUBO_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Motion CSV (accel_x, accel_y, accel_z, optional pitch/roll), or use CUBO_MOTION_FILE env var
    #[arg(short, long, env = "CUBO_MOTION_FILE")]
    pub motion_file: Option<PathBuf>,

    /// Only use rows tagged with this device_id, or use CUBO_DEVICE env var
    #[arg(short, long, env = "CUBO_DEVICE")]
    pub device: Option<String>,

    /// Only use rows at or after this time (RFC3339, YYYY-MM-DD, or relative like -12h)
    #[arg(long, allow_hyphen_values = true)]
    pub since: Option<String>,

    /// Only use rows at or before this time (RFC3339, YYYY-MM-DD, or relative like -1h)
    #[arg(long, allow_hyphen_values = true)]
    pub until: Option<String>,

    /// Average rows into windows of this length first (e.g., 10s, 30s, 1m, 5m, 15m)
    #[arg(short, long)]
    pub window: Option<String>,
}

/// Threshold overrides (flags > --preset > config file > defaults)
#[derive(Debug, Clone, Default, Args)]
pub struct ThresholdArgs {
    /// Start from a named preset instead of the configured thresholds
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Minimum temperature in °C
    #[arg(long, allow_hyphen_values = true)]
    pub temp_low: Option<f64>,

    /// Maximum temperature in °C
    #[arg(long, allow_hyphen_values = true)]
    pub temp_high: Option<f64>,

    /// Minimum relative humidity in %
    #[arg(long)]
    pub hum_low: Option<f64>,

    /// Maximum relative humidity in %
    #[arg(long)]
    pub hum_high: Option<f64>,

    /// Maximum acceleration magnitude in g
    #[arg(long)]
    pub accel_g: Option<f64>,

    /// Maximum absolute pitch/roll in degrees
    #[arg(long)]
    pub tilt_deg: Option<f64>,
}

impl ThresholdArgs {
    /// Explicit per-field overrides.
    pub fn overrides(&self) -> Vec<(ThresholdKey, f64)> {
        [
            (ThresholdKey::TempLow, self.temp_low),
            (ThresholdKey::TempHigh, self.temp_high),
            (ThresholdKey::HumLow, self.hum_low),
            (ThresholdKey::HumHigh, self.hum_high),
            (ThresholdKey::AccelG, self.accel_g),
            (ThresholdKey::TiltDeg, self.tilt_deg),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
    }
}

/// Sample values given directly on the command line (override file data)
#[derive(Debug, Clone, Default, Args)]
pub struct SampleArgs {
    /// Temperature in °C
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: Option<f64>,

    /// Relative humidity in %
    #[arg(long)]
    pub humidity: Option<f64>,

    /// Acceleration as x,y,z in g
    #[arg(long, allow_hyphen_values = true)]
    pub accel: Option<Acceleration>,

    /// Precomputed pitch in degrees (disables derivation from acceleration)
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<f64>,

    /// Precomputed roll in degrees (disables derivation from acceleration)
    #[arg(long, allow_hyphen_values = true)]
    pub roll: Option<f64>,
}

impl SampleArgs {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.accel.is_none()
            && self.pitch.is_none()
            && self.roll.is_none()
    }
}

/// Reusable output format arguments
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Output format (defaults to the configured format, then text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

#[derive(Parser)]
#[command(name = "cubo")]
#[command(author, version, about = "Comfort and vibration monitor for Cubo IoT sensors", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (minimal, rich, plain)
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "rich",
        env = "CUBO_STYLE"
    )]
    pub style: StyleMode,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate the latest readings once and report indicators and alerts
    Check {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        #[command(flatten)]
        sample: SampleArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Exit with status 2 when any alert fires
        #[arg(long)]
        fail_on_alert: bool,
    },

    /// Re-read the data files and re-evaluate on a fixed interval
    Watch {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Refresh interval in seconds (defaults to the configured interval, then 15)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Number of refreshes before exiting (0 for unlimited)
        #[arg(short = 'n', long, default_value = "0")]
        count: u32,
    },

    /// Descriptive statistics for every numeric column of a CSV file
    Stats {
        /// CSV file to summarize
        file: PathBuf,

        /// Only use rows tagged with this device_id
        #[arg(short, long)]
        device: Option<String>,

        /// Only use rows at or after this time
        #[arg(long, allow_hyphen_values = true)]
        since: Option<String>,

        /// Only use rows at or before this time
        #[arg(long, allow_hyphen_values = true)]
        until: Option<String>,

        /// Average rows into windows of this length first (e.g., 1m)
        #[arg(short, long)]
        window: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the device ids present in one or more CSV files
    Devices {
        /// CSV files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Default environmental CSV path
    EnvFile,
    /// Default motion CSV path
    MotionFile,
    /// Default device_id filter
    Device,
    /// Default output format
    Format,
    /// Default watch interval in seconds
    Interval,
    /// Disable colored output
    NoColor,
    /// Minimum temperature in °C
    TempLow,
    /// Maximum temperature in °C
    TempHigh,
    /// Minimum relative humidity in %
    HumLow,
    /// Maximum relative humidity in %
    HumHigh,
    /// Maximum acceleration magnitude in g
    AccelG,
    /// Maximum absolute tilt in degrees
    TiltDeg,
}

impl ConfigKey {
    /// The key as typed on the command line, e.g. `temp-high`.
    pub fn name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default()
    }

    /// The threshold field behind this key, if any.
    pub fn threshold_key(self) -> Option<ThresholdKey> {
        match self {
            ConfigKey::TempLow => Some(ThresholdKey::TempLow),
            ConfigKey::TempHigh => Some(ThresholdKey::TempHigh),
            ConfigKey::HumLow => Some(ThresholdKey::HumLow),
            ConfigKey::HumHigh => Some(ThresholdKey::HumHigh),
            ConfigKey::AccelG => Some(ThresholdKey::AccelG),
            ConfigKey::TiltDeg => Some(ThresholdKey::TiltDeg),
            _ => None,
        }
    }
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Unset (remove) a configuration value
    Unset {
        /// Configuration key to remove
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_overrides() {
        let cli = Cli::try_parse_from([
            "cubo",
            "check",
            "--env-file",
            "dht22.csv",
            "--temp-high",
            "30",
            "--accel",
            "0,0,1",
            "--since",
            "-12h",
            "-w",
            "5m",
        ])
        .unwrap();
        match cli.command {
            Commands::Check {
                source,
                thresholds,
                sample,
                ..
            } => {
                assert_eq!(source.env_file, Some(PathBuf::from("dht22.csv")));
                assert_eq!(source.since.as_deref(), Some("-12h"));
                assert_eq!(source.window.as_deref(), Some("5m"));
                assert_eq!(thresholds.overrides(), vec![(ThresholdKey::TempHigh, 30.0)]);
                assert_eq!(sample.accel, Some(Acceleration::new(0.0, 0.0, 1.0)));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_negative_temperature_values() {
        let cli = Cli::try_parse_from(["cubo", "check", "--temperature", "-5.5", "--temp-low", "-10"])
            .unwrap();
        match cli.command {
            Commands::Check {
                sample, thresholds, ..
            } => {
                assert_eq!(sample.temperature, Some(-5.5));
                assert_eq!(thresholds.temp_low, Some(-10.0));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_bad_accel_rejected() {
        assert!(Cli::try_parse_from(["cubo", "check", "--accel", "1,2"]).is_err());
    }

    #[test]
    fn test_config_key_names() {
        let key = <ConfigKey as ValueEnum>::from_str("tilt-deg", false).unwrap();
        assert_eq!(key.threshold_key(), Some(ThresholdKey::TiltDeg));
        let key = <ConfigKey as ValueEnum>::from_str("env-file", false).unwrap();
        assert_eq!(key.threshold_key(), None);
        assert_eq!(ConfigKey::NoColor.name(), "no-color");
    }

    #[test]
    fn test_output_format_from_config() {
        assert_eq!(OutputFormat::from_config("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_config("CSV"), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_config("yaml"), None);
    }

    #[test]
    fn test_preset_thresholds() {
        assert_eq!(Preset::Strict.thresholds(), Thresholds::strict());
        assert_eq!(Preset::Default.thresholds(), Thresholds::default());
    }
}
