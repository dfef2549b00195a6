//! Time representation
//!
//! Every record carries a `Timestamp` in milliseconds since the Unix epoch.
//! Rates (drift velocity, timeline derivatives) are expressed per hour.

/// Milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Milliseconds in one hour
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Elapsed time between two timestamps in hours
///
/// Negative when `to` precedes `from`.
///
/// # Examples
///
/// ```
/// use credo_domain::time::elapsed_hours;
///
/// assert_eq!(elapsed_hours(0, 7_200_000), 2.0);
/// ```
pub fn elapsed_hours(from: Timestamp, to: Timestamp) -> f64 {
    (to as f64 - from as f64) / MS_PER_HOUR
}
