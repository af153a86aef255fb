//! Service length and anniversary dates.

use chrono::{Datelike, NaiveDate};

/// Whole years from `from` to `on`.
///
/// One year is subtracted when the anniversary has not yet been reached in
/// `on`'s year. Never negative.
pub fn completed_years(from: NaiveDate, on: NaiveDate) -> i32 {
    let mut years = on.year() - from.year();
    if (on.month(), on.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years.max(0)
}

/// Whether `today` is an anniversary of `date` (same month and day).
///
/// Dates on 29 February are celebrated on 28 February in common years.
pub fn is_anniversary(date: NaiveDate, today: NaiveDate) -> bool {
    if date.month() == 2 && date.day() == 29 && !today.leap_year() {
        return today.month() == 2 && today.day() == 28;
    }
    date.month() == today.month() && date.day() == today.day()
}
