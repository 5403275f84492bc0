use chrono::NaiveDate;
use log::debug;

use crate::lib::{
    date,
    entry::{self, DailyTotals},
    error::{Error, Result},
};

/// Average daily intake over one window of at most 7 calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSummary {
    start: NaiveDate,
    end: NaiveDate,
    total: i64,
    days: usize,
}

impl WeekSummary {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    /// Number of dates with data inside the window
    pub fn days(&self) -> usize {
        self.days
    }

    /// Truncates toward zero, as integer division does
    pub fn average(&self) -> i64 {
        self.total / self.days as i64
    }
}

/// A collection of disjoint ordered week summaries
///
/// Windows are data-driven: each one starts on the first date not yet
/// consumed by the previous one, and always spans 7 calendar days.
/// When the data has gaps, windows drift away from Monday-to-Sunday weeks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    items: Vec<WeekSummary>,
}

impl Calendar {
    /// Construct from per-day totals
    pub fn weekly(totals: &DailyTotals) -> Result<Self> {
        Self::from_days(&totals.days())
    }

    /// Construct from an _increasing_ sequence of (date, calories)
    pub fn from_days(days: &[(NaiveDate, i64)]) -> Result<Self> {
        let mut items = Vec::new();
        let mut idx = 0;
        while idx < days.len() {
            let start = days[idx].0;
            let end = date::end_of_week(start).ok_or(Error::DateArithmetic(start))?;
            let window = days[idx..]
                .iter()
                .take_while(|(d, _)| *d <= end)
                .collect::<Vec<_>>();
            // the start date always falls in its own window
            let week = WeekSummary {
                start,
                end,
                total: entry::sum_calories(
                    window.iter().map(|(_, c)| *c),
                    &format!("the week starting {}", start),
                )?,
                days: window.len(),
            };
            debug!(
                "week {}..{}: {} days, {} calories",
                week.start, week.end, week.days, week.total
            );
            idx += week.days;
            items.push(week);
        }
        Ok(Self { items })
    }

    pub fn contents(&self) -> &[WeekSummary] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
