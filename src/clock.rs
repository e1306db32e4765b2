//! Simulation day context.
//!
//! All clock math flows through an explicit [`DayContext`] value rather than
//! process-wide state, so tests can run with independent day starts.

use chrono::{Duration, NaiveTime};

/// The wall-clock start of a dispatch day.
///
/// A vehicle's clock is derived from this value: day start, plus its
/// dispatch delay at the depot, plus driving time for its accumulated
/// mileage. Travel time is rounded to whole seconds.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_dispatch::clock::DayContext;
///
/// let ctx = DayContext::new(NaiveTime::from_hms_opt(8, 0, 0).expect("valid"));
/// // 9 miles at 18 mph is half an hour of driving.
/// let t = ctx.time_at(0, 9.0, 18.0);
/// assert_eq!(t, NaiveTime::from_hms_opt(8, 30, 0).expect("valid"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayContext {
    day_start: NaiveTime,
}

impl DayContext {
    /// Creates a day context starting at the given wall-clock time.
    pub fn new(day_start: NaiveTime) -> Self {
        Self { day_start }
    }

    /// The wall-clock time the day starts.
    pub fn day_start(&self) -> NaiveTime {
        self.day_start
    }

    /// The wall-clock time after a depot delay of `delay_minutes` and
    /// `miles` of driving at `speed_mph`.
    ///
    /// Monotonically non-decreasing in `miles` for a fixed speed.
    pub fn time_at(&self, delay_minutes: i64, miles: f64, speed_mph: f64) -> NaiveTime {
        debug_assert!(speed_mph > 0.0);
        let travel_secs = (miles / speed_mph * 3600.0).round() as i64;
        self.day_start + Duration::minutes(delay_minutes) + Duration::seconds(travel_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eight_am() -> DayContext {
        DayContext::new(NaiveTime::from_hms_opt(8, 0, 0).expect("valid"))
    }

    #[test]
    fn test_no_delay_no_miles() {
        let ctx = eight_am();
        assert_eq!(ctx.time_at(0, 0.0, 18.0), ctx.day_start());
    }

    #[test]
    fn test_dispatch_delay() {
        let ctx = eight_am();
        assert_eq!(
            ctx.time_at(65, 0.0, 18.0),
            NaiveTime::from_hms_opt(9, 5, 0).expect("valid")
        );
    }

    #[test]
    fn test_travel_time() {
        let ctx = eight_am();
        // 18 miles at 18 mph = 1 hour
        assert_eq!(
            ctx.time_at(0, 18.0, 18.0),
            NaiveTime::from_hms_opt(9, 0, 0).expect("valid")
        );
    }

    #[test]
    fn test_monotonic_in_miles() {
        let ctx = eight_am();
        let mut prev = ctx.time_at(0, 0.0, 18.0);
        for tenths in 1..200 {
            let t = ctx.time_at(0, tenths as f64 / 10.0, 18.0);
            assert!(t >= prev);
            prev = t;
        }
    }
}
