//! Core library for Cubo IoT sensor indicators.
//!
//! This crate turns the latest readings of an environmental sensor (DHT22:
//! temperature, humidity) and a motion sensor (MPU6050: 3-axis acceleration,
//! optional pitch/roll) into scalar indicators and threshold alerts.
//!
//! # Features
//!
//! - **Indicator engine**: pure [`evaluate`] over optional inputs
//! - **Thresholds**: defaults, presets and validation
//! - **Sensor frames**: wide CSV exports with last-value extraction,
//!   time/device filtering and windowed averaging
//! - **Statistics**: per-column descriptive summaries
//!
//! # Quick Start
//!
//! ```
//! use cubo_core::{SensorFrame, Thresholds, evaluate};
//!
//! let dht = SensorFrame::from_reader("temperature,humidity\n30.0,50.0\n".as_bytes()).unwrap();
//! let mpu = SensorFrame::from_reader("accel_x,accel_y,accel_z\n0,0,1.0\n".as_bytes()).unwrap();
//!
//! let result = evaluate(&dht.env_sample(), &mpu.motion_sample(), &Thresholds::default());
//! for alert in &result.alerts {
//!     println!("{}: {}", alert.title(), alert.detail);
//! }
//! assert_eq!(result.indicators.pitch, Some(0.0));
//! ```

pub mod error;
pub mod frame;
pub mod indicators;
pub mod stats;
pub mod thresholds;
pub mod util;

pub use error::{Error, Result};
pub use frame::{FrameFilter, SensorFrame, fields, parse_timestamp};
pub use indicators::{Evaluation, evaluate, magnitude, pitch_deg, roll_deg};
pub use stats::{ColumnStats, describe};
pub use thresholds::{ThresholdError, ThresholdKey, Thresholds};

// Re-export from cubo-types
pub use cubo_types::{
    Acceleration, Alert, AlertKind, EnvSample, Indicators, MotionSample, ParseError, Tilt,
};
