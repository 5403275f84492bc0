//! Rows of the export and the typed records extracted from them

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::lib::{
    date,
    error::{Error, Result},
};

/// Prefix of the positional keys assigned when no headers are supplied
pub const HEADER_PREFIX: &str = "header";

/// Positional key of column `idx`
pub fn positional_key(idx: usize) -> String {
    format!("{}{}", HEADER_PREFIX, idx)
}

/// One line of the CSV, as ordered (key, value) pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Row keyed `header0`, `header1`, ... in column order
    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            fields: values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (positional_key(i), v.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingField {
            field: key.to_string(),
            row: self.to_string(),
        })
    }

    fn calories(&self, key: &str) -> Result<i64> {
        let value = self.require(key)?;
        value.parse::<i64>().map_err(|source| Error::MalformedNumber {
            field: key.to_string(),
            value: value.to_string(),
            row: self.to_string(),
            source,
        })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", k, v)?;
        }
        Ok(())
    }
}

/// Keys under which the normalizer looks for each field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Columns {
    pub timestamp: String,
    pub item: String,
    pub calories: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            timestamp: positional_key(0),
            item: positional_key(1),
            calories: positional_key(2),
        }
    }
}

/// A dated calorie entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: NaiveDate,
    pub item: String,
    pub calories: i64,
}

impl Entry {
    /// Validate the timestamp and calorie fields of a row
    ///
    /// The item name is kept when present but not required.
    pub fn from_row(row: &Row, cols: &Columns) -> Result<Self> {
        let timestamp = row.require(&cols.timestamp)?;
        row.require(&cols.calories)?;
        let date = date::parse_timestamp(timestamp).map_err(|reason| Error::MalformedDate {
            value: timestamp.to_string(),
            reason,
            row: row.to_string(),
        })?;
        let calories = row.calories(&cols.calories)?;
        Ok(Self {
            date,
            item: row.get(&cols.item).unwrap_or_default().to_string(),
            calories,
        })
    }
}

/// An undated food item, all that calorie sources need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodItem {
    pub name: String,
    pub calories: i64,
}

impl FoodItem {
    pub fn new<S: ToString>(name: S, calories: i64) -> Self {
        Self {
            name: name.to_string(),
            calories,
        }
    }

    pub fn from_row(row: &Row, cols: &Columns) -> Result<Self> {
        let name = row.require(&cols.item)?;
        let calories = row.calories(&cols.calories)?;
        Ok(Self::new(name, calories))
    }
}

/// Normalize a whole batch, the first bad row aborts it
pub fn entries(rows: &[Row], cols: &Columns) -> Result<Vec<Entry>> {
    rows.iter().map(|row| Entry::from_row(row, cols)).collect()
}

/// Same as `entries`, for the undated view
pub fn food_items(rows: &[Row], cols: &Columns) -> Result<Vec<FoodItem>> {
    rows.iter().map(|row| FoodItem::from_row(row, cols)).collect()
}

/// Calories summed per calendar day, in ascending date order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyTotals {
    days: BTreeMap<NaiveDate, i64>,
}

impl DailyTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, date: NaiveDate, calories: i64) -> Result<()> {
        let total = self.days.entry(date).or_insert(0);
        *total = total
            .checked_add(calories)
            .ok_or_else(|| Error::Overflow(format!("the total of {}", date)))?;
        Ok(())
    }

    pub fn from_entries(entries: &[Entry]) -> Result<Self> {
        let mut totals = Self::new();
        for entry in entries {
            totals.add(entry.date, entry.calories)?;
        }
        Ok(totals)
    }

    pub fn get(&self, date: NaiveDate) -> Option<i64> {
        self.days.get(&date).copied()
    }

    /// Distinct dates, strictly increasing
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.keys().copied().collect()
    }

    /// (date, calories) pairs, strictly increasing in date
    pub fn days(&self) -> Vec<(NaiveDate, i64)> {
        self.days.iter().map(|(d, c)| (*d, *c)).collect()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }
}

/// Sum of calorie counts, `what` names the sum in the error
pub fn sum_calories<I>(values: I, what: &str) -> Result<i64>
where
    I: IntoIterator<Item = i64>,
{
    values
        .into_iter()
        .try_fold(0i64, |acc, c| acc.checked_add(c))
        .ok_or_else(|| Error::Overflow(what.to_string()))
}
