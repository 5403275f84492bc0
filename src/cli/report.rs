//! Pretty-printing facility for error messages
//!
//! ```txt
//! --> Error: Malformed number '3OO' in field 'header2'
//!  |  in row header0="1/02/24 3:04 PM", header1="Dal", header2="3OO"
//!  |  invalid digit found in string
//!  |      ? hint: calorie counts must be whole numbers
//! ```

use std::fmt;

use crate::lib::error::Error;

/// Report for a single error
///
/// All messages (`label` passed with `new`, arguments of `text`
/// and `hint`) should fit in a single line.
#[must_use]
#[derive(Debug)]
pub struct Report {
    label: String,
    items: Vec<Item>,
}

/// Kinds of items that can be added to a report
#[derive(Debug)]
enum Item {
    /// important message
    Text(String),
    /// recommendations for fixes
    Hint(String),
}

impl Report {
    pub fn new<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Add an important note
    pub fn text<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    /// Add a hint on how to fix
    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }
}

impl From<&Error> for Report {
    fn from(err: &Error) -> Self {
        let mut report = Self::new(err);
        for line in err.context() {
            report.text(line);
        }
        report.hint(err.fix_hint());
        report
    }
}

const RED: &str = "\x1b[0;91;1m";
const BLUE: &str = "\x1b[0;96;1m";
const WHITE: &str = "\x1b[0;1m";
const NONE: &str = "\x1b[0m";

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}--> Error:{} {}{}", RED, WHITE, self.label, NONE)?;
        for item in &self.items {
            match item {
                Item::Text(txt) => {
                    writeln!(f, " {}|  {}{}{}", RED, WHITE, txt, NONE)?;
                }
                Item::Hint(txt) => {
                    writeln!(f, " {}|      {}? hint: {}{}", RED, BLUE, NONE, txt)?;
                }
            }
        }
        Ok(())
    }
}
