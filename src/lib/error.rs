//! Everything that can go wrong between reading the CSV and printing a table
//!
//! All errors are fatal to the command that raised them: there is no partial
//! output, the first bad row or clause aborts the run.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing field '{field}'")]
    MissingField { field: String, row: String },

    #[error("Malformed date '{value}': {reason}")]
    MalformedDate {
        value: String,
        reason: DateDefect,
        row: String,
    },

    #[error("Malformed number '{value}' in field '{field}'")]
    MalformedNumber {
        field: String,
        value: String,
        row: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Cannot compute the end of the week starting {0}")]
    DateArithmetic(NaiveDate),

    #[error("At least two calorie sources are required, found {0}")]
    InsufficientCategories(usize),

    #[error("Malformed source clause '{clause}': {defect}")]
    MalformedClause { clause: String, defect: ClauseDefect },

    #[error("Empty source name in clause '{0}'")]
    EmptyCategoryName(String),

    #[error("No sub tags in clause '{0}'")]
    NoSubTags(String),

    #[error("Source '{0}' was specified more than once")]
    DuplicateCategoryName(String),

    #[error("Total calories are zero, percentages are undefined")]
    DivisionByZero,

    #[error("Calorie arithmetic overflows while computing {0}")]
    Overflow(String),

    #[error("Could not access '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read CSV")]
    Csv(#[from] csv::Error),

    #[error("Line {line} has {columns} columns but only {headers} headers were given")]
    HeaderCount {
        line: usize,
        columns: usize,
        headers: usize,
    },

    #[error("Invalid configuration file '{}'", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not save chart to '{}'", path.display())]
    Chart {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ways in which a timestamp can fail to describe a date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateDefect {
    #[error("does not match the layout M/DD/YY h:mm AM|PM")]
    Layout,
    #[error("month {0} is out of range")]
    Month(u32),
    #[error("hour {0} is out of range")]
    Hour(u32),
    #[error("minute {0} is out of range")]
    Minute(u32),
    #[error("day {0} does not exist in that month")]
    Day(u32),
}

/// Ways in which a `name(sub,...)` clause can be badly bracketed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClauseDefect {
    #[error("exactly one opening and one closing bracket are required")]
    BracketCount,
    #[error("the clause does not end with a closing bracket")]
    Unterminated,
}

impl Error {
    /// Extra lines of context worth showing below the label
    pub fn context(&self) -> Vec<String> {
        use Error::*;
        match self {
            MissingField { row, .. } | MalformedDate { row, .. } => {
                vec![format!("in row {}", row)]
            }
            MalformedNumber { row, source, .. } => {
                vec![format!("in row {}", row), source.to_string()]
            }
            Io { source, .. } | Chart { source, .. } => vec![source.to_string()],
            Csv(e) => vec![e.to_string()],
            Config { source, .. } => vec![source.to_string()],
            _ => Vec::new(),
        }
    }

    /// What message to show to help fix the error
    pub fn fix_hint(&self) -> String {
        use Error::*;
        match self {
            MissingField { .. } => "every row needs a timestamp, an item name and a calorie count".to_string(),
            MalformedDate { .. } => "timestamps look like '1/02/24 3:04 PM'".to_string(),
            MalformedNumber { .. } => "calorie counts must be whole numbers".to_string(),
            DateArithmetic(_) => "dates must stay within the supported calendar range".to_string(),
            InsufficientCategories(_) | MalformedClause { .. } | EmptyCategoryName(_) | NoSubTags(_) => {
                "sample format: homemade(homemade);ordered(eatfit,ordered,dominos);milk-and-cereal(milk)".to_string()
            }
            DuplicateCategoryName(name) => format!("merge the sub tags of '{}' into a single clause", name),
            DivisionByZero => "the CSV must contain at least one nonzero calorie count".to_string(),
            Overflow(_) => "look for corrupted calorie counts, no real intake gets this large".to_string(),
            Io { .. } => "check that the path exists, or add a CSV with 'addcsv'".to_string(),
            Csv(_) => "every line must have the same number of comma-separated columns".to_string(),
            HeaderCount { columns, .. } => format!("supply {} comma-separated header names", columns),
            Config { .. } => "fix or remove the configuration file".to_string(),
            Chart { .. } => "choose a writable location for the chart".to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn labels_carry_context() {
        let err = Error::MalformedClause {
            clause: "b z".to_string(),
            defect: ClauseDefect::BracketCount,
        };
        assert_eq!(
            err.to_string(),
            "Malformed source clause 'b z': exactly one opening and one closing bracket are required"
        );
        let err = Error::MissingField {
            field: "header2".to_string(),
            row: "header0=\"x\"".to_string(),
        };
        assert_eq!(err.context(), vec!["in row header0=\"x\"".to_string()]);
    }

    #[test]
    fn duplicate_hint_names_source() {
        let hint = Error::DuplicateCategoryName("home".to_string()).fix_hint();
        assert!(hint.contains("'home'"));
    }
}
