//! Indicator engine: derive metrics from the latest samples and raise alerts.
//!
//! [`evaluate`] is a pure function. It reads only its arguments, keeps no
//! state between calls, and never fails: a missing input skips the checks
//! that depend on it.
//!
//! Checks run in a fixed order (temperature, humidity, acceleration, pitch,
//! roll), which is also the order of the returned alerts.
//!
//! Tilt derivation assumes a quasi-static sensor, i.e. the measured vector
//! is gravity alone:
//!
//! - `pitch = atan2(x, sqrt(y² + z²))`
//! - `roll  = atan2(y, sqrt(x² + z²))`
//!
//! # Example
//!
//! ```
//! use cubo_core::{Thresholds, evaluate};
//! use cubo_types::{Acceleration, EnvSample, MotionSample};
//!
//! let env = EnvSample::new(Some(30.0), Some(50.0));
//! let motion = MotionSample::from_acceleration(Acceleration::new(0.0, 0.0, 1.0));
//!
//! let result = evaluate(&env, &motion, &Thresholds::default());
//! assert_eq!(result.indicators.accel_mag, Some(1.0));
//! assert_eq!(result.alerts.len(), 1);
//! assert_eq!(result.alerts[0].as_pair(), ("High temperature", "30.0 °C > 28.0 °C"));
//! ```

use serde::Serialize;

use cubo_types::{Acceleration, Alert, AlertKind, EnvSample, Indicators, MotionSample};

use crate::thresholds::Thresholds;
use crate::util::format_bound;

/// Output of one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub indicators: Indicators,
    /// Violations in check order; empty when everything is within bounds.
    pub alerts: Vec<Alert>,
}

impl Evaluation {
    /// True when no threshold was crossed.
    pub fn is_nominal(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// Evaluate the latest environmental and motion samples against thresholds.
pub fn evaluate(env: &EnvSample, motion: &MotionSample, thresholds: &Thresholds) -> Evaluation {
    let mut alerts = Vec::new();

    if let Some(t) = env.temperature {
        if t > thresholds.temp_high {
            alerts.push(alert(
                AlertKind::HighTemperature,
                t,
                thresholds.temp_high,
                format!("{:.1} °C > {} °C", t, format_bound(thresholds.temp_high)),
            ));
        } else if t < thresholds.temp_low {
            alerts.push(alert(
                AlertKind::LowTemperature,
                t,
                thresholds.temp_low,
                format!("{:.1} °C < {} °C", t, format_bound(thresholds.temp_low)),
            ));
        }
    }

    if let Some(h) = env.humidity {
        if h > thresholds.hum_high {
            alerts.push(alert(
                AlertKind::HighHumidity,
                h,
                thresholds.hum_high,
                format!("{:.1}% > {}%", h, format_bound(thresholds.hum_high)),
            ));
        } else if h < thresholds.hum_low {
            alerts.push(alert(
                AlertKind::LowHumidity,
                h,
                thresholds.hum_low,
                format!("{:.1}% < {}%", h, format_bound(thresholds.hum_low)),
            ));
        }
    }

    let accel_mag = motion.acceleration.map(magnitude);
    if let Some(mag) = accel_mag
        && mag > thresholds.accel_g
    {
        alerts.push(alert(
            AlertKind::Vibration,
            mag,
            thresholds.accel_g,
            format!("|a|={:.2} g > {} g", mag, format_bound(thresholds.accel_g)),
        ));
    }

    let (pitch, roll) = match motion.tilt {
        Some(tilt) => (tilt.pitch, tilt.roll),
        None => match motion.acceleration {
            Some(a) => (Some(pitch_deg(a)), Some(roll_deg(a))),
            None => (None, None),
        },
    };

    for (kind, angle) in [(AlertKind::PitchTilt, pitch), (AlertKind::RollTilt, roll)] {
        if let Some(angle) = angle
            && angle.abs() > thresholds.tilt_deg
        {
            alerts.push(alert(
                kind,
                angle,
                thresholds.tilt_deg,
                format!("{:.1}° > {}°", angle, format_bound(thresholds.tilt_deg)),
            ));
        }
    }

    tracing::trace!(alerts = alerts.len(), "evaluated indicators");

    Evaluation {
        indicators: Indicators {
            temperature: env.temperature,
            humidity: env.humidity,
            accel_mag,
            pitch,
            roll,
        },
        alerts,
    }
}

fn alert(kind: AlertKind, value: f64, limit: f64, detail: String) -> Alert {
    Alert {
        kind,
        detail,
        value,
        limit,
    }
}

/// Euclidean norm of the acceleration vector.
pub fn magnitude(a: Acceleration) -> f64 {
    (a.x * a.x + a.y * a.y + a.z * a.z).sqrt()
}

/// Static pitch estimate in degrees.
pub fn pitch_deg(a: Acceleration) -> f64 {
    a.x.atan2((a.y * a.y + a.z * a.z).sqrt()).to_degrees()
}

/// Static roll estimate in degrees.
pub fn roll_deg(a: Acceleration) -> f64 {
    a.y.atan2((a.x * a.x + a.z * a.z).sqrt()).to_degrees()
}
