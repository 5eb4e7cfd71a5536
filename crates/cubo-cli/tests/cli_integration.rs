//! CLI Integration Tests
//!
//! These tests run the `cubo` binary against CSV fixtures written to a
//! temporary directory. Each run gets its own config file via `CUBO_CONFIG`
//! so the user's configuration is never read or modified.
//!
//! ```
//! cargo test --package cubo-cli --test cli_integration
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const DHT22: &str = "\
_time,device_id,temperature,humidity
2024-05-01T10:00:00Z,cubo-01,21.0,45.0
2024-05-01T10:00:00Z,cubo-02,17.0,25.0
2024-05-01T11:00:00Z,cubo-01,30.0,50.0
";

const MPU6050: &str = "\
_time,device_id,accel_x,accel_y,accel_z
2024-05-01T10:00:00Z,cubo-01,0.0,0.0,1.0
2024-05-01T10:00:00Z,cubo-02,0.7,0.0,0.7
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dht22.csv"), DHT22).unwrap();
        std::fs::write(dir.path().join("mpu6050.csv"), MPU6050).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn dht(&self) -> String {
        self.path("dht22.csv").display().to_string()
    }

    fn mpu(&self) -> String {
        self.path("mpu6050.csv").display().to_string()
    }

    fn config_path(&self) -> PathBuf {
        self.path("config.toml")
    }

    /// Run cubo with an isolated environment.
    fn run(&self, args: &[&str]) -> Output {
        run_with_config(&self.config_path(), args)
    }
}

fn run_with_config(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cubo"))
        .args(args)
        .env("CUBO_CONFIG", config)
        .env_remove("CUBO_ENV_FILE")
        .env_remove("CUBO_MOTION_FILE")
        .env_remove("CUBO_DEVICE")
        .env_remove("CUBO_STYLE")
        .env_remove("NO_COLOR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run cubo binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_lists_commands() {
    let fx = Fixture::new();
    let output = fx.run(&["--help"]);
    assert!(output.status.success());

    let out = stdout(&output);
    for cmd in ["check", "watch", "stats", "devices", "config", "completions"] {
        assert!(out.contains(cmd), "help should list {}", cmd);
    }
}

#[test]
fn test_version() {
    let fx = Fixture::new();
    let output = fx.run(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("cubo"));
}

#[test]
fn test_completions_bash() {
    let fx = Fixture::new();
    let output = fx.run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("cubo"));
}

// =============================================================================
// Check
// =============================================================================

#[test]
fn test_check_text_reports_alerts() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "--style", "plain", "check", "-e", &fx.dht(), "-m", &fx.mpu(), "-d", "cubo-01",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Temperature:  30.0 °C"));
    assert!(out.contains("|a|:  1.00 g"));
    assert!(out.contains("[!!] High temperature: 30.0 °C > 28.0 °C"));
    assert!(!out.contains("Conditions within configured ranges."));
}

#[test]
fn test_check_json_second_device() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "--json", "check", "-e", &fx.dht(), "-m", &fx.mpu(), "-d", "cubo-02",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let kinds: Vec<&str> = v["alerts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["low_temperature", "low_humidity", "pitch_tilt"]);
    assert_eq!(v["nominal"], false);
    assert_eq!(v["timestamp"], "2024-05-01T10:00:00Z");
}

#[test]
fn test_check_nominal_with_time_window() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "--style",
        "plain",
        "check",
        "-e",
        &fx.dht(),
        "-d",
        "cubo-01",
        "--until",
        "2024-05-01T10:30:00Z",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Temperature:  21.0 °C"));
    assert!(out.contains("|a|:  —"));
    assert!(out.contains("[OK] Conditions within configured ranges."));
}

#[test]
fn test_check_manual_values_and_overrides() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "check",
        "--format",
        "csv",
        "--temperature",
        "29.5",
        "--accel",
        "0,0,1",
        "--temp-high",
        "30",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "timestamp,temperature,humidity,accel_mag,pitch,roll,alerts");
    assert_eq!(lines[1], ",29.5,,1.000,0.0,0.0,");
}

#[test]
fn test_check_fail_on_alert_exit_code() {
    let fx = Fixture::new();
    let output = fx.run(&["check", "--temperature", "35", "--fail-on-alert"]);
    assert_eq!(output.status.code(), Some(2));

    let output = fx.run(&["check", "--temperature", "22", "--fail-on-alert"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_check_preset_strict() {
    let fx = Fixture::new();
    let output = fx.run(&["--json", "check", "--preset", "strict", "--humidity", "65"]);
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(v["alerts"][0]["detail"], "65.0% > 60.0%");
    assert_eq!(v["thresholds"]["hum_high"], 60.0);
}

#[test]
fn test_check_window_averages_latest_values() {
    let fx = Fixture::new();
    // One day window folds both cubo-01 rows: mean 25.5 °C is within range
    let output = fx.run(&[
        "--json", "check", "-e", &fx.dht(), "-d", "cubo-01", "--window", "1d",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(v["indicators"]["temperature"], 25.5);
    assert_eq!(v["nominal"], true);
    assert_eq!(v["timestamp"], "2024-05-02T00:00:00Z");
}

#[test]
fn test_check_relative_range_out_of_range_fails() {
    let fx = Fixture::new();
    let output = fx.run(&["check", "-e", &fx.dht(), "--since", "-99999999d"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("is out of range"));
}

#[test]
fn test_check_without_input_fails() {
    let fx = Fixture::new();
    let output = fx.run(&["check"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No input specified"));
}

#[test]
fn test_check_invalid_thresholds_fail() {
    let fx = Fixture::new();
    let output = fx.run(&["check", "--temperature", "20", "--temp-low", "40"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid thresholds"));
}

#[test]
fn test_check_missing_file_fails() {
    let fx = Fixture::new();
    let missing = fx.path("missing.csv").display().to_string();
    let output = fx.run(&["check", "-e", &missing]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing.csv"));
}

#[test]
fn test_check_output_to_file() {
    let fx = Fixture::new();
    let out_path = fx.path("result.json");
    let out = out_path.display().to_string();
    let output = fx.run(&["--json", "-o", &out, "check", "--humidity", "50"]);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(v["nominal"], true);
}

// =============================================================================
// Watch
// =============================================================================

#[test]
fn test_watch_single_refresh_csv() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "watch", "-e", &fx.dht(), "-d", "cubo-01", "-n", "1", "--format", "csv",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("2024-05-01T11:00:00Z,30.0,50.0,"));
    assert!(stderr(&output).contains("Completed 1 refreshes."));
}

#[test]
fn test_watch_rejects_bad_range_before_looping() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "watch", "-e", &fx.dht(), "--since", "2024-02-01", "--until", "2024-01-01", "--count",
        "1", "--interval", "1",
    ]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("--since must not be later than --until"));
    assert!(!err.contains("Retrying"));
}

#[test]
fn test_watch_json_appends_one_object_per_line() {
    let fx = Fixture::new();
    let out_path = fx.path("watch.ndjson");
    let out = out_path.display().to_string();
    let output = fx.run(&[
        "--json", "-o", &out, "watch", "-e", &fx.dht(), "-d", "cubo-01", "-n", "2", "-i", "1",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let content = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let v: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(v["timestamp"], "2024-05-01T11:00:00Z");
    }
}

#[test]
fn test_watch_requires_files() {
    let fx = Fixture::new();
    let output = fx.run(&["watch", "-n", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Nothing to watch"));
}

// =============================================================================
// Stats and Devices
// =============================================================================

#[test]
fn test_stats_csv() {
    let fx = Fixture::new();
    let output = fx.run(&["stats", &fx.dht(), "--format", "csv", "--device", "cubo-01"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "column,count,mean,std,min,p25,median,p75,max");
    assert!(lines[1].starts_with("temperature,2,25.5,"));
    assert!(lines[2].starts_with("humidity,2,47.5,"));
}

#[test]
fn test_stats_with_window() {
    let fx = Fixture::new();
    let output = fx.run(&[
        "stats", &fx.dht(), "--format", "csv", "--device", "cubo-01", "--window", "1h",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.lines().nth(1).unwrap().starts_with("temperature,2,25.5,"));

    let output = fx.run(&["stats", &fx.dht(), "--window", "0s"]);
    assert!(!output.status.success());
}

#[test]
fn test_devices_json() {
    let fx = Fixture::new();
    let output = fx.run(&["--json", "devices", &fx.dht(), &fx.mpu()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(v[0]["devices"], serde_json::json!(["cubo-01", "cubo-02"]));
    assert_eq!(v[1]["rows"], 2);
}

// =============================================================================
// Config Commands
// =============================================================================

#[test]
fn test_config_path_honors_env() {
    let fx = Fixture::new();
    let output = fx.run(&["config", "path"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), fx.config_path().display().to_string());
}

#[test]
fn test_config_set_get_and_use() {
    let fx = Fixture::new();

    let output = fx.run(&["config", "set", "temp-high", "35"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let output = fx.run(&["config", "set", "env-file", &fx.dht()]);
    assert!(output.status.success());

    let output = fx.run(&["config", "get", "temp-high"]);
    assert_eq!(stdout(&output).trim(), "35.0");

    // 30 °C is fine once the configured bound is 35
    let output = fx.run(&["--json", "check", "--device", "cubo-01"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(v["nominal"], true);

    // An explicit flag still wins
    let output = fx.run(&["--json", "check", "--device", "cubo-01", "--temp-high", "28"]);
    let v: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(v["alerts"][0]["kind"], "high_temperature");
}

#[test]
fn test_config_set_rejects_inverted_bounds() {
    let fx = Fixture::new();
    let output = fx.run(&["config", "set", "hum-low", "90"]);
    assert!(!output.status.success());
    assert!(!fx.config_path().exists());
}

#[test]
fn test_config_init_and_show() {
    let fx = Fixture::new();
    let output = fx.run(&["config", "init"]);
    assert!(output.status.success());
    assert!(fx.config_path().exists());

    let output = fx.run(&["--style", "plain", "config", "show"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("temp-high  28.0 °C"));
    assert!(out.contains("env-file  (not set)"));
}
