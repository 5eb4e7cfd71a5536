//! Alert thresholds for environmental and motion readings.
//!
//! A [`Thresholds`] record is passed explicitly to every evaluation. It is
//! plain data: the engine never validates it, configuration loading does.
//!
//! # Example
//!
//! ```
//! use cubo_core::{ThresholdKey, Thresholds};
//!
//! let mut thresholds = Thresholds::default();
//! assert_eq!(thresholds.temp_high, 28.0);
//!
//! thresholds.set(ThresholdKey::TempHigh, 30.0);
//! assert!(thresholds.validate().is_ok());
//!
//! thresholds.set(ThresholdKey::TempLow, 35.0);
//! assert!(thresholds.validate().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bounds whose violation raises an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum comfortable temperature in °C.
    pub temp_low: f64,
    /// Maximum comfortable temperature in °C.
    pub temp_high: f64,
    /// Minimum relative humidity in %.
    pub hum_low: f64,
    /// Maximum relative humidity in %.
    pub hum_high: f64,
    /// Maximum acceleration magnitude in g.
    pub accel_g: f64,
    /// Maximum absolute pitch or roll in degrees.
    pub tilt_deg: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_low: 18.0,
            temp_high: 28.0,
            hum_low: 30.0,
            hum_high: 70.0,
            accel_g: 1.20,
            tilt_deg: 25.0,
        }
    }
}

impl Thresholds {
    /// Tight comfort band for occupied rooms and sensitive equipment.
    pub fn strict() -> Self {
        Self {
            temp_low: 20.0,
            temp_high: 26.0,
            hum_low: 35.0,
            hum_high: 60.0,
            accel_g: 1.10,
            tilt_deg: 15.0,
        }
    }

    /// Wide band for warehouses, vehicles and outdoor enclosures.
    pub fn relaxed() -> Self {
        Self {
            temp_low: 10.0,
            temp_high: 35.0,
            hum_low: 20.0,
            hum_high: 80.0,
            accel_g: 1.50,
            tilt_deg: 40.0,
        }
    }

    /// Read a bound by key.
    pub fn get(&self, key: ThresholdKey) -> f64 {
        match key {
            ThresholdKey::TempLow => self.temp_low,
            ThresholdKey::TempHigh => self.temp_high,
            ThresholdKey::HumLow => self.hum_low,
            ThresholdKey::HumHigh => self.hum_high,
            ThresholdKey::AccelG => self.accel_g,
            ThresholdKey::TiltDeg => self.tilt_deg,
        }
    }

    /// Overwrite a bound by key.
    pub fn set(&mut self, key: ThresholdKey, value: f64) {
        let slot = match key {
            ThresholdKey::TempLow => &mut self.temp_low,
            ThresholdKey::TempHigh => &mut self.temp_high,
            ThresholdKey::HumLow => &mut self.hum_low,
            ThresholdKey::HumHigh => &mut self.hum_high,
            ThresholdKey::AccelG => &mut self.accel_g,
            ThresholdKey::TiltDeg => &mut self.tilt_deg,
        };
        *slot = value;
    }

    /// Builder-style variant of [`Thresholds::set`].
    #[must_use]
    pub fn with(mut self, key: ThresholdKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Check that the record describes sensible, non-empty bands.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for key in ThresholdKey::ALL {
            let value = self.get(key);
            if !value.is_finite() {
                return Err(ThresholdError::NotFinite { key, value });
            }
        }

        check_order(ThresholdKey::TempLow, ThresholdKey::TempHigh, self)?;
        check_order(ThresholdKey::HumLow, ThresholdKey::HumHigh, self)?;

        check_range(ThresholdKey::HumLow, self.hum_low, 0.0, 100.0)?;
        check_range(ThresholdKey::HumHigh, self.hum_high, 0.0, 100.0)?;
        check_range(ThresholdKey::AccelG, self.accel_g, 0.0, f64::MAX)?;
        check_range(ThresholdKey::TiltDeg, self.tilt_deg, 0.0, 180.0)?;

        Ok(())
    }
}

fn check_order(low: ThresholdKey, high: ThresholdKey, t: &Thresholds) -> Result<(), ThresholdError> {
    let (low_value, high_value) = (t.get(low), t.get(high));
    if low_value > high_value {
        return Err(ThresholdError::Inverted {
            low,
            high,
            low_value,
            high_value,
        });
    }
    Ok(())
}

fn check_range(key: ThresholdKey, value: f64, min: f64, max: f64) -> Result<(), ThresholdError> {
    if value < min || value > max {
        return Err(ThresholdError::OutOfRange {
            key,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Name of a single threshold field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdKey {
    TempLow,
    TempHigh,
    HumLow,
    HumHigh,
    AccelG,
    TiltDeg,
}

impl ThresholdKey {
    /// All keys in declaration order.
    pub const ALL: [ThresholdKey; 6] = [
        ThresholdKey::TempLow,
        ThresholdKey::TempHigh,
        ThresholdKey::HumLow,
        ThresholdKey::HumHigh,
        ThresholdKey::AccelG,
        ThresholdKey::TiltDeg,
    ];

    /// Field name as it appears in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdKey::TempLow => "temp_low",
            ThresholdKey::TempHigh => "temp_high",
            ThresholdKey::HumLow => "hum_low",
            ThresholdKey::HumHigh => "hum_high",
            ThresholdKey::AccelG => "accel_g",
            ThresholdKey::TiltDeg => "tilt_deg",
        }
    }

    /// Unit suffix used when displaying the bound.
    pub fn unit(&self) -> &'static str {
        match self {
            ThresholdKey::TempLow | ThresholdKey::TempHigh => "°C",
            ThresholdKey::HumLow | ThresholdKey::HumHigh => "%",
            ThresholdKey::AccelG => "g",
            ThresholdKey::TiltDeg => "°",
        }
    }
}

impl fmt::Display for ThresholdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThresholdKey {
    type Err = ThresholdError;

    /// Accepts `temp_low` as well as the CLI spelling `temp-low`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ThresholdKey::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| ThresholdError::UnknownKey(s.to_string()))
    }
}

/// Reasons a [`Thresholds`] record is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ThresholdError {
    #[error("{key} must be a finite number, got {value}")]
    NotFinite { key: ThresholdKey, value: f64 },

    #[error("{low} ({low_value}) must not exceed {high} ({high_value})")]
    Inverted {
        low: ThresholdKey,
        high: ThresholdKey,
        low_value: f64,
        high_value: f64,
    },

    #[error("{key} = {value} is outside the valid range {min}..={max}")]
    OutOfRange {
        key: ThresholdKey,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown threshold '{0}'")]
    UnknownKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.temp_low, 18.0);
        assert_eq!(t.temp_high, 28.0);
        assert_eq!(t.hum_low, 30.0);
        assert_eq!(t.hum_high, 70.0);
        assert_eq!(t.accel_g, 1.20);
        assert_eq!(t.tilt_deg, 25.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(Thresholds::strict().validate().is_ok());
        assert!(Thresholds::relaxed().validate().is_ok());
    }

    #[test]
    fn test_strict_is_narrower_than_relaxed() {
        let s = Thresholds::strict();
        let r = Thresholds::relaxed();
        assert!(s.temp_low > r.temp_low);
        assert!(s.temp_high < r.temp_high);
        assert!(s.accel_g < r.accel_g);
        assert!(s.tilt_deg < r.tilt_deg);
    }

    #[test]
    fn test_get_set_every_key() {
        let mut t = Thresholds::default();
        for (i, key) in ThresholdKey::ALL.into_iter().enumerate() {
            t.set(key, i as f64);
            assert_eq!(t.get(key), i as f64);
        }
    }

    #[test]
    fn test_inverted_temperature_rejected() {
        let t = Thresholds::default().with(ThresholdKey::TempLow, 40.0);
        let err = t.validate().unwrap_err();
        assert!(matches!(
            err,
            ThresholdError::Inverted {
                low: ThresholdKey::TempLow,
                ..
            }
        ));
        assert!(err.to_string().contains("temp_low (40) must not exceed temp_high (28)"));
    }

    #[test]
    fn test_equal_bounds_allowed() {
        let t = Thresholds::default()
            .with(ThresholdKey::HumLow, 50.0)
            .with(ThresholdKey::HumHigh, 50.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_humidity_above_100_rejected() {
        let t = Thresholds::default().with(ThresholdKey::HumHigh, 120.0);
        assert!(matches!(
            t.validate(),
            Err(ThresholdError::OutOfRange {
                key: ThresholdKey::HumHigh,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_accel_rejected() {
        let t = Thresholds::default().with(ThresholdKey::AccelG, -0.1);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let t = Thresholds::default().with(ThresholdKey::TiltDeg, f64::NAN);
        assert!(matches!(
            t.validate(),
            Err(ThresholdError::NotFinite {
                key: ThresholdKey::TiltDeg,
                ..
            })
        ));
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!("temp_low".parse::<ThresholdKey>().unwrap(), ThresholdKey::TempLow);
        assert_eq!("tilt-deg".parse::<ThresholdKey>().unwrap(), ThresholdKey::TiltDeg);
        assert_eq!("ACCEL_G".parse::<ThresholdKey>().unwrap(), ThresholdKey::AccelG);
        assert!("pressure".parse::<ThresholdKey>().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let t: Thresholds = toml::from_str("temp_high = 30.5\n").unwrap();
        assert_eq!(t.temp_high, 30.5);
        assert_eq!(t.temp_low, 18.0);
        assert_eq!(t.tilt_deg, 25.0);
    }
}
