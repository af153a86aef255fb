//! Time source for the engine.
//!
//! Services never read the system clock directly; they receive "now" from a
//! [`Clock`] held in the application state so jobs and tests can pin the date.

use std::sync::RwLock;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Supplies the office-local current time.
pub trait Clock: Send + Sync {
    /// Current office-local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current office-local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock shifted to the office timezone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Creates a clock for the given office timezone.
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// A clock that returns a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<NaiveDateTime>,
}

impl FixedClock {
    /// Creates a clock pinned at `now`.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Creates a clock pinned at 10:00 on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_hms_opt(10, 0, 0).unwrap_or_default())
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.write() {
            *guard = now;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
            .read()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_can_be_moved() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let clock = FixedClock::at_date(date);
        assert_eq!(clock.today(), date);

        let later = NaiveDate::from_ymd_opt(2026, 3, 3)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_system_clock_applies_offset() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let clock = SystemClock::new(ist);
        let utc = Utc::now().naive_utc();
        let diff = clock.now() - utc;
        assert!((diff.num_minutes() - 330).abs() <= 1);
    }
}
