//! Date helper functions

use chrono::NaiveDate;

/// Format a date in long en-US form (like "January 15, 2025")
pub fn long_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format a date in ISO form
pub fn iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
