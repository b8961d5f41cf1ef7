
use chrono::{Days, NaiveDate};


/// This is the standard way of converting a date to a string in tabtally.
pub fn date_to_day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns `count` calendar days ending with `last` (inclusive), newest first.
pub fn days_back_from(last: NaiveDate, count: u64) -> Vec<NaiveDate> {
    (0..count)
        .filter_map(|offset| last.checked_sub_days(Days::new(offset)))
        .collect()
}
