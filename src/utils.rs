use chrono::{DateTime, Datelike as _, Days, FixedOffset, NaiveDate, Weekday};
use rust_decimal::Decimal;

use crate::consts::SECONDS_PER_HOUR;

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts Monday to Friday dates in `[start, end]`.
pub fn count_working_days(mut start: NaiveDate, end: NaiveDate) -> i64 {
    let mut working_days = 0;

    while start <= end {
        if !is_weekend(start) {
            working_days += 1;
        }

        let Some(next) = start.checked_add_days(Days::new(1)) else {
            break
        };
        start = next;
    }

    working_days
}

/// Elapsed hours between two instants, negative when `end` precedes `start`.
pub fn hours_between(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> Decimal {
    let seconds = end.signed_duration_since(*start).num_seconds();

    Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
}
