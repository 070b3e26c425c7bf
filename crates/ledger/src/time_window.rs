//! Symbolic time frame → absolute cutoff instant.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use tally_core::{Clock, DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeFrame {
    Hours,
    Days,
}

impl TimeFrame {
    /// `interval` units of this granularity.
    pub fn span(self, interval: i64) -> Option<TimeDelta> {
        match self {
            TimeFrame::Hours => TimeDelta::try_hours(interval),
            TimeFrame::Days => TimeDelta::try_days(interval),
        }
    }

    /// `now − interval` units. A negative interval yields a cutoff in the future.
    pub fn apply(self, interval: i64, now: DateTime<Utc>) -> DomainResult<DateTime<Utc>> {
        self.span(interval)
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| DomainError::invalid_field("interval", "Interval is out of range"))
    }
}

impl core::str::FromStr for TimeFrame {
    type Err = DomainError;

    /// Case-sensitive, matching the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOURS" => Ok(TimeFrame::Hours),
            "DAYS" => Ok(TimeFrame::Days),
            _ => Err(DomainError::invalid_field(
                "timeFrame",
                "Time frame must be one of HOURS, DAYS",
            )),
        }
    }
}

/// Resolves cutoffs against an injected clock, reading it on every call.
#[derive(Debug, Clone)]
pub struct TimeWindowResolver<C> {
    clock: C,
}

impl<C: Clock> TimeWindowResolver<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn cutoff(&self, frame: TimeFrame, interval: i64) -> DomainResult<DateTime<Utc>> {
        frame.apply(interval, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tally_core::{FixedClock, SystemClock};
    use std::sync::Arc;

    #[test]
    fn days_cutoff_lies_between_neighbouring_days() {
        let resolver = TimeWindowResolver::new(SystemClock);
        let now = Utc::now();
        let cutoff = resolver.cutoff(TimeFrame::Days, 11).unwrap();

        assert!(now - Duration::days(10) > cutoff);
        assert!(now - Duration::days(12) < cutoff);
    }

    #[test]
    fn one_hour_cutoff_is_within_the_last_61_minutes() {
        let resolver = TimeWindowResolver::new(SystemClock);
        let cutoff = resolver.cutoff(TimeFrame::Hours, 1).unwrap();
        let now = Utc::now();

        assert!(now > cutoff);
        assert!(now - Duration::minutes(61) < cutoff);
    }

    #[test]
    fn negative_interval_points_into_the_future() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let cutoff = TimeFrame::Days.apply(-2, now).unwrap();
        assert_eq!(cutoff, now + Duration::days(2));
    }

    #[test]
    fn clock_is_read_on_every_call() {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let clock = Arc::new(FixedClock::new(start));
        let resolver = TimeWindowResolver::new(clock.clone());

        let first = resolver.cutoff(TimeFrame::Hours, 3).unwrap();
        clock.advance(Duration::hours(1));
        let second = resolver.cutoff(TimeFrame::Hours, 3).unwrap();

        assert_eq!(first, start - Duration::hours(3));
        assert_eq!(second - first, Duration::hours(1));
    }

    #[test]
    fn huge_interval_is_a_validation_error() {
        let err = TimeFrame::Days.apply(i64::MAX, Utc::now()).unwrap_err();
        assert_eq!(err.messages(), vec!["Interval is out of range"]);
    }

    #[test]
    fn parses_wire_names_only() {
        assert_eq!("HOURS".parse::<TimeFrame>().unwrap(), TimeFrame::Hours);
        assert_eq!("DAYS".parse::<TimeFrame>().unwrap(), TimeFrame::Days);
        assert!("days".parse::<TimeFrame>().is_err());
    }
}
