//! Platform-agnostic types for Cubo sensor indicators.
//!
//! This crate holds the plain data model shared by the indicator engine
//! (cubo-core) and its front ends (cubo-cli).
//!
//! # Features
//!
//! - Environmental and motion samples with independently optional fields
//! - Indicator and alert output records
//! - Error types for parsing textual values
//!
//! # Example
//!
//! ```
//! use cubo_types::{Acceleration, EnvSample, MotionSample};
//!
//! let env = EnvSample::new(Some(22.5), None);
//! let motion = MotionSample::from_acceleration(Acceleration::new(0.0, 0.0, 1.0));
//! assert!(!env.is_empty());
//! assert!(motion.tilt.is_none());
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{Acceleration, Alert, AlertKind, EnvSample, Indicators, MotionSample, Tilt};

#[cfg(test)]
mod tests {
    use super::*;

    // --- Acceleration parsing tests ---

    #[test]
    fn test_parse_acceleration_plain() {
        let a: Acceleration = "0.1,-0.2,0.98".parse().unwrap();
        assert_eq!(a, Acceleration::new(0.1, -0.2, 0.98));
    }

    #[test]
    fn test_parse_acceleration_with_spaces() {
        let a: Acceleration = " 1 , 2 , 3 ".parse().unwrap();
        assert_eq!(a, Acceleration::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_parse_acceleration_wrong_count() {
        let err = "1,2".parse::<Acceleration>().unwrap_err();
        assert_eq!(err, ParseError::WrongComponentCount(2));
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn test_parse_acceleration_not_a_number() {
        let err = "1,abc,3".parse::<Acceleration>().unwrap_err();
        assert!(matches!(err, ParseError::InvalidData(_)));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_acceleration_negated() {
        let a = Acceleration::new(0.5, -1.0, 2.0).negated();
        assert_eq!(a, Acceleration::new(-0.5, 1.0, -2.0));
    }

    // --- Sample tests ---

    #[test]
    fn test_env_sample_empty() {
        assert!(EnvSample::default().is_empty());
        assert!(!EnvSample::new(None, Some(40.0)).is_empty());
    }

    #[test]
    fn test_motion_sample_with_tilt() {
        let m = MotionSample::default().with_tilt(Some(10.0), None);
        assert!(!m.is_empty());
        assert_eq!(
            m.tilt,
            Some(Tilt {
                pitch: Some(10.0),
                roll: None
            })
        );
        assert!(m.acceleration.is_none());
    }

    // --- AlertKind tests ---

    #[test]
    fn test_alert_kind_titles() {
        assert_eq!(AlertKind::HighTemperature.title(), "High temperature");
        assert_eq!(AlertKind::LowHumidity.title(), "Low humidity");
        assert_eq!(AlertKind::Vibration.title(), "Vibration/movement");
        assert_eq!(AlertKind::PitchTilt.title(), "Abnormal tilt (pitch)");
        assert_eq!(AlertKind::RollTilt.to_string(), "Abnormal tilt (roll)");
    }

    #[test]
    fn test_alert_kind_order_follows_check_sequence() {
        assert!(AlertKind::HighTemperature < AlertKind::HighHumidity);
        assert!(AlertKind::LowHumidity < AlertKind::Vibration);
        assert!(AlertKind::Vibration < AlertKind::PitchTilt);
        assert!(AlertKind::PitchTilt < AlertKind::RollTilt);
    }

    #[test]
    fn test_alert_pair_and_display() {
        let alert = Alert {
            kind: AlertKind::HighTemperature,
            detail: "30.0 °C > 28.0 °C".to_string(),
            value: 30.0,
            limit: 28.0,
        };
        assert_eq!(alert.as_pair(), ("High temperature", "30.0 °C > 28.0 °C"));
        assert_eq!(alert.to_string(), "High temperature: 30.0 °C > 28.0 °C");
    }

    // --- Serialization tests ---

    #[test]
    fn test_alert_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&AlertKind::HighTemperature).unwrap(),
            "\"high_temperature\""
        );
        assert_eq!(
            serde_json::to_string(&AlertKind::PitchTilt).unwrap(),
            "\"pitch_tilt\""
        );
    }

    #[test]
    fn test_indicators_serialization_keeps_nulls() {
        let indicators = Indicators {
            temperature: Some(21.5),
            ..Default::default()
        };
        let json = serde_json::to_string(&indicators).unwrap();
        assert!(json.contains("\"temperature\":21.5"));
        assert!(json.contains("\"accel_mag\":null"));
    }

    #[test]
    fn test_motion_sample_deserialization() {
        let json = r#"{"acceleration":{"x":0.0,"y":0.0,"z":1.0},"tilt":null}"#;
        let m: MotionSample = serde_json::from_str(json).unwrap();
        assert_eq!(m.acceleration, Some(Acceleration::new(0.0, 0.0, 1.0)));
        assert!(m.tilt.is_none());
    }
}
