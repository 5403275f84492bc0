//! Settings shared by all commands, and the per-command configurations built from them
//!
//! ```toml
//! current_csv = "calorie_counter.csv"
//! tags = "homemade(homemade);ordered(eatfit,ordered,dominos)"
//! headers = "when,what,kcal"
//!
//! [columns]
//! timestamp = "when"
//! item = "what"
//! calories = "kcal"
//! ```
//!
//! `headers` renames the columns of the file, so `[columns]` has to name
//! the same headers: left at its `header0..header2` default, no row
//! would find its fields.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

use crate::lib::{
    entry::Columns,
    error::{Error, Result},
};

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG: &str = "calorie-insights.toml";

/// Where `addcsv` stores the CSV that later commands fall back to
pub const DEFAULT_CURRENT_CSV: &str = "calorie_counter.csv";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub current_csv: PathBuf,
    pub headers: Option<String>,
    pub tags: Option<String>,
    pub columns: Columns,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            current_csv: PathBuf::from(DEFAULT_CURRENT_CSV),
            headers: None,
            tags: None,
            columns: Columns::default(),
        }
    }
}

/// Which CSV to read and how to interpret its columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    pub csv: PathBuf,
    pub headers: Option<String>,
    pub columns: Columns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyConfig {
    pub input: InputConfig,
    pub svg: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcesConfig {
    pub input: InputConfig,
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCsvConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Settings {
    /// Read settings from an explicitly requested file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    /// Read `DEFAULT_CONFIG` if it exists, defaults otherwise
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG);
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(path, &contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no '{}', using default settings", DEFAULT_CONFIG);
                Ok(Self::default())
            }
            Err(source) => Err(Error::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(path: &Path, contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded settings from '{}': {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Custom headers that `columns` does not refer to
    fn headers_without_columns(&self) -> bool {
        self.headers.is_some() && self.columns == Columns::default()
    }

    /// `csv` overrides the current CSV
    pub fn input(&self, csv: Option<&str>) -> InputConfig {
        if self.headers_without_columns() {
            warn!(
                "headers {:?} are set but [columns] still names '{}', '{}' and '{}'",
                self.headers.as_deref().unwrap_or_default(),
                self.columns.timestamp,
                self.columns.item,
                self.columns.calories
            );
        }
        InputConfig {
            csv: csv
                .map(PathBuf::from)
                .unwrap_or_else(|| self.current_csv.clone()),
            headers: self.headers.clone(),
            columns: self.columns.clone(),
        }
    }

    pub fn weekly(&self, csv: Option<&str>, svg: Option<&str>) -> WeeklyConfig {
        WeeklyConfig {
            input: self.input(csv),
            svg: svg.map(PathBuf::from),
        }
    }

    /// Without `tags` or a configured default the specification is empty,
    /// which fails validation later on
    pub fn sources(&self, csv: Option<&str>, tags: Option<&str>) -> SourcesConfig {
        SourcesConfig {
            input: self.input(csv),
            tags: tags
                .map(String::from)
                .or_else(|| self.tags.clone())
                .unwrap_or_default(),
        }
    }

    pub fn add_csv(&self, source: &str) -> AddCsvConfig {
        AddCsvConfig {
            source: PathBuf::from(source),
            destination: self.current_csv.clone(),
        }
    }
}
