//! Utility functions for cubo-core.

/// Format a configured bound the way a float literal reads.
///
/// Whole numbers keep one decimal (`28.0`), anything else uses the shortest
/// representation that round-trips (`1.2`, `0.05`).
///
/// ```
/// use cubo_core::util::format_bound;
///
/// assert_eq!(format_bound(28.0), "28.0");
/// assert_eq!(format_bound(1.2), "1.2");
/// ```
#[must_use]
pub fn format_bound(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
