//! Useful functions for parsing and accounting.

use crate::{Date, Decimal, Error, Source};
use chrono::Datelike;

/// Parses a [`Decimal`](crate::Decimal) from a [`&str`], stripping thousands
/// separators first.
pub fn parse_decimal(num_str: &str, src: &Source) -> Result<Decimal, Error> {
    num_str
        .replace(',', "")
        .parse::<Decimal>()
        .map_err(|_| Error::syntax(format!("Invalid number: {}.", num_str), src.clone()))
}

/// Adds `num_months` to `date`, clamping the day to the length of the
/// target month.
pub fn date_add_months(date: Date, num_months: i32) -> Date {
    let total = date.year() * 12 + date.month0() as i32 + num_months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    Date::from_ymd_opt(year, month, day).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        Date::from_ymd_opt(year + 1, 1, 1)
    } else {
        Date::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|date| date.pred_opt())
        .map(|date| date.day())
        .unwrap_or(28)
}

/// The first day of the month containing `date`.
pub fn month_start(date: Date) -> Date {
    Date::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// The last day of the month containing `date`.
pub fn month_end(date: Date) -> Date {
    Date::from_ymd_opt(date.year(), date.month(), days_in_month(date.year(), date.month()))
        .unwrap_or(date)
}

/// The inclusive first/last day pair of the month containing `date`.
pub fn month_bounds(date: Date) -> (Date, Date) {
    (month_start(date), month_end(date))
}
