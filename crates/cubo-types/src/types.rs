//! Core types for Cubo sensor data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Three-axis acceleration in g-units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Acceleration {
    /// Create an acceleration vector from its components.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The same vector pointing the other way.
    #[must_use]
    pub fn negated(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl FromStr for Acceleration {
    type Err = ParseError;

    /// Parse `"x,y,z"` (whitespace around components is ignored).
    ///
    /// ```
    /// use cubo_types::Acceleration;
    ///
    /// let a: Acceleration = "0, 0, 1.0".parse().unwrap();
    /// assert_eq!(a, Acceleration::new(0.0, 0.0, 1.0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ParseError::WrongComponentCount(parts.len()));
        }
        let mut values = [0.0_f64; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidData(format!("'{}' is not a number", part)))?;
        }
        Ok(Self::new(values[0], values[1], values[2]))
    }
}

/// Orientation angles computed upstream, in degrees.
///
/// Either angle may be missing even when the pair was supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tilt {
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
}

/// Latest environmental reading (DHT22-style sensor).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvSample {
    /// Temperature in °C.
    pub temperature: Option<f64>,
    /// Relative humidity in %.
    pub humidity: Option<f64>,
}

impl EnvSample {
    #[must_use]
    pub fn new(temperature: Option<f64>, humidity: Option<f64>) -> Self {
        Self {
            temperature,
            humidity,
        }
    }

    /// True when neither field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none()
    }
}

/// Latest motion reading (MPU6050-style sensor).
///
/// `tilt` is `None` when no orientation was supplied upstream; in that case
/// pitch and roll are derived from `acceleration`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotionSample {
    pub acceleration: Option<Acceleration>,
    pub tilt: Option<Tilt>,
}

impl MotionSample {
    /// A sample carrying only raw acceleration.
    #[must_use]
    pub fn from_acceleration(acceleration: Acceleration) -> Self {
        Self {
            acceleration: Some(acceleration),
            tilt: None,
        }
    }

    /// Attach precomputed orientation angles.
    #[must_use]
    pub fn with_tilt(mut self, pitch: Option<f64>, roll: Option<f64>) -> Self {
        self.tilt = Some(Tilt { pitch, roll });
        self
    }

    /// True when there is nothing to evaluate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.acceleration.is_none() && self.tilt.is_none()
    }
}

/// Scalar metrics produced by one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Indicators {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    /// Euclidean norm of the acceleration vector in g.
    pub accel_mag: Option<f64>,
    pub pitch: Option<f64>,
    pub roll: Option<f64>,
}

/// The kind of threshold violation behind an [`Alert`].
///
/// Variants are declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum AlertKind {
    HighTemperature,
    LowTemperature,
    HighHumidity,
    LowHumidity,
    Vibration,
    PitchTilt,
    RollTilt,
}

impl AlertKind {
    /// Human-readable alert title.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::HighTemperature => "High temperature",
            AlertKind::LowTemperature => "Low temperature",
            AlertKind::HighHumidity => "High humidity",
            AlertKind::LowHumidity => "Low humidity",
            AlertKind::Vibration => "Vibration/movement",
            AlertKind::PitchTilt => "Abnormal tilt (pitch)",
            AlertKind::RollTilt => "Abnormal tilt (roll)",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A single threshold violation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alert {
    pub kind: AlertKind,
    /// Detail line, e.g. `"30.0 °C > 28.0 °C"`.
    pub detail: String,
    /// The reading that crossed the bound.
    pub value: f64,
    /// The bound that was crossed.
    pub limit: f64,
}

impl Alert {
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// The `(title, detail)` pair shown to users.
    #[must_use]
    pub fn as_pair(&self) -> (&'static str, &str) {
        (self.title(), &self.detail)
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.detail)
    }
}
