//! Day-precise dates read from the timestamp column of the export
//!
//! Timestamps are written `M/DD/YY h:mm AM|PM` (e.g. `1/02/24 3:04 PM`).
//! The layout is checked by a small grammar, then the numbers are range-checked.
//! Only the calendar day survives: the time of day is validated and dropped.

use chrono::{Days, NaiveDate};
use pest::Parser;
use pest_derive::*;

use crate::lib::error::DateDefect;

/// Pest-generated parser
#[derive(Parser)]
#[grammar = "lib/timestamp.pest"]
struct TimestampParser;

type Pair<'i> = pest::iterators::Pair<'i, Rule>;

/// Number of calendar days covered by a week, both ends included
pub const WEEK_SPAN: u64 = 7;

/// Two-digit years at or above this pivot belong to the 1900s
const CENTURY_PIVOT: i32 = 69;

/// Extract the calendar date of a timestamp
pub fn parse_timestamp(text: &str) -> Result<NaiveDate, DateDefect> {
    let pairs = TimestampParser::parse(Rule::timestamp, text).map_err(|_| DateDefect::Layout)?;
    let mut month = 0;
    let mut day = 0;
    let mut year = 0;
    let mut hour = 0;
    let mut minute = 0;
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::month => month = digits(&pair),
            Rule::day => day = digits(&pair),
            Rule::year => year = digits(&pair) as i32,
            Rule::hour => hour = digits(&pair),
            Rule::minute => minute = digits(&pair),
            _ => (),
        }
    }
    if !(1..=12).contains(&month) {
        return Err(DateDefect::Month(month));
    }
    if hour > 12 {
        return Err(DateDefect::Hour(hour));
    }
    if minute > 59 {
        return Err(DateDefect::Minute(minute));
    }
    let year = if year >= CENTURY_PIVOT { 1900 + year } else { 2000 + year };
    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateDefect::Day(day))
}

// the grammar only lets ASCII digits through, at most two of them
fn digits(pair: &Pair) -> u32 {
    pair.as_str()
        .bytes()
        .fold(0, |n, b| n * 10 + u32::from(b - b'0'))
}

/// Last day of the week that starts on `start`
///
/// `None` only at the very end of the representable calendar.
pub fn end_of_week(start: NaiveDate) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(WEEK_SPAN - 1))
}
