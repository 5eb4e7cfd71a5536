//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cubo_core::util::format_bound;
use cubo_core::{ThresholdKey, Thresholds};
use serde::{Deserialize, Serialize};

use crate::cli::{ConfigKey, OutputFormat, SourceArgs, ThresholdArgs};

/// Refresh interval used by `watch` when neither flag nor config sets one.
pub const DEFAULT_INTERVAL_SECS: u64 = 15;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "CUBO_CONFIG";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default environmental (DHT22) CSV
    #[serde(default)]
    pub env_file: Option<PathBuf>,

    /// Default motion (MPU6050) CSV
    #[serde(default)]
    pub motion_file: Option<PathBuf>,

    /// Default device_id filter
    #[serde(default)]
    pub device: Option<String>,

    /// Default output format
    #[serde(default)]
    pub format: Option<String>,

    /// Watch refresh interval in seconds
    #[serde(default)]
    pub interval: Option<u64>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Alert thresholds; missing fields take the built-in defaults
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cubo")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Current value of a key, as displayed by `config get`.
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        if let Some(tk) = key.threshold_key() {
            return Some(format_bound(self.thresholds.get(tk)));
        }
        match key {
            ConfigKey::EnvFile => self.env_file.as_ref().map(|p| p.display().to_string()),
            ConfigKey::MotionFile => self.motion_file.as_ref().map(|p| p.display().to_string()),
            ConfigKey::Device => self.device.clone(),
            ConfigKey::Format => self.format.clone(),
            ConfigKey::Interval => self.interval.map(|i| i.to_string()),
            ConfigKey::NoColor => Some(self.no_color.to_string()),
            _ => None,
        }
    }

    /// Parse and store a value. Threshold changes are validated as a whole.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        if let Some(tk) = key.threshold_key() {
            let parsed: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid number for {}: {}", tk, value))?;
            let updated = self.thresholds.with(tk, parsed);
            updated.validate()?;
            self.thresholds = updated;
            return Ok(());
        }
        match key {
            ConfigKey::EnvFile => self.env_file = Some(PathBuf::from(value)),
            ConfigKey::MotionFile => self.motion_file = Some(PathBuf::from(value)),
            ConfigKey::Device => self.device = Some(value.to_string()),
            ConfigKey::Format => {
                let format = OutputFormat::from_config(value)
                    .with_context(|| format!("Invalid format: {} (use text, json or csv)", value))?;
                self.format = Some(format_name(format).to_string());
            }
            ConfigKey::Interval => {
                let secs: u64 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid interval: {}", value))?;
                if secs == 0 {
                    bail!("Interval must be at least 1 second");
                }
                self.interval = Some(secs);
            }
            ConfigKey::NoColor => {
                self.no_color = parse_bool(value)
                    .with_context(|| format!("Invalid boolean: {} (use true or false)", value))?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Reset a key to its default.
    pub fn unset(&mut self, key: ConfigKey) {
        if let Some(tk) = key.threshold_key() {
            self.thresholds.set(tk, Thresholds::default().get(tk));
            return;
        }
        match key {
            ConfigKey::EnvFile => self.env_file = None,
            ConfigKey::MotionFile => self.motion_file = None,
            ConfigKey::Device => self.device = None,
            ConfigKey::Format => self.format = None,
            ConfigKey::Interval => self.interval = None,
            ConfigKey::NoColor => self.no_color = false,
            _ => {}
        }
    }
}

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Resolve thresholds: explicit flags override `--preset`, which replaces the
/// configured thresholds, which default to the built-in values.
pub fn resolve_thresholds(args: &ThresholdArgs, config: &Config) -> Result<Thresholds> {
    let mut thresholds = match args.preset {
        Some(preset) => preset.thresholds(),
        None => config.thresholds,
    };
    for (key, value) in args.overrides() {
        thresholds.set(key, value);
    }
    thresholds.validate().context("Invalid thresholds")?;
    Ok(thresholds)
}

/// Resolve output format from `--json`, `--format`, then config.
pub fn resolve_format(json: bool, requested: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if json {
        return OutputFormat::Json;
    }
    requested
        .or_else(|| config.format.as_deref().and_then(OutputFormat::from_config))
        .unwrap_or_default()
}

/// Resolve the watch interval from the flag, then config, then the default.
pub fn resolve_interval(requested: Option<u64>, config: &Config) -> u64 {
    requested
        .or(config.interval)
        .unwrap_or(DEFAULT_INTERVAL_SECS)
        .max(1)
}

/// Fill unset source arguments from the configured defaults.
pub fn resolve_source(mut source: SourceArgs, config: &Config) -> SourceArgs {
    source.env_file = source.env_file.or_else(|| config.env_file.clone());
    source.motion_file = source.motion_file.or_else(|| config.motion_file.clone());
    source.device = source.device.or_else(|| config.device.clone());
    source
}

/// Keys shown by `config show`, in display order.
pub fn display_entries(config: &Config) -> Vec<(String, String)> {
    let mut entries = vec![
        ("env-file".to_string(), config.get(ConfigKey::EnvFile)),
        ("motion-file".to_string(), config.get(ConfigKey::MotionFile)),
        ("device".to_string(), config.get(ConfigKey::Device)),
        ("format".to_string(), config.get(ConfigKey::Format)),
        ("interval".to_string(), config.get(ConfigKey::Interval)),
        ("no-color".to_string(), config.get(ConfigKey::NoColor)),
    ];
    for key in ThresholdKey::ALL {
        entries.push((
            key.as_str().replace('_', "-"),
            Some(format!("{} {}", format_bound(config.thresholds.get(key)), key.unit())),
        ));
    }
    entries
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_else(|| "(not set)".to_string())))
        .collect()
}
