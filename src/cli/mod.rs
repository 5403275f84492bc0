//! Commands and their rendering
//!
//! Each command takes its own configuration explicitly and either returns
//! its result or the first error encountered.

pub mod plot;
pub mod report;
pub mod table;

use std::fs;

use log::{info, warn};

use crate::lib::{
    category::{CategoryShare, TagSpec},
    entry::{self, DailyTotals},
    error::{Error, Result},
    summary::Calendar,
};
use crate::load::{
    self,
    config::{AddCsvConfig, SourcesConfig, WeeklyConfig},
};
use plot::Plotter;
use table::Table;

/// Weekly averages of the configured CSV
pub fn weekly_average(cfg: &WeeklyConfig) -> Result<Calendar> {
    let rows = load::read_file(&cfg.input.csv, cfg.input.headers.as_deref())?;
    let entries = entry::entries(&rows, &cfg.input.columns)?;
    if let Some(e) = entries.iter().find(|e| e.calories < 0) {
        warn!("negative calorie count {} on {} ({:?})", e.calories, e.date, e.item);
    }
    let totals = DailyTotals::from_entries(&entries)?;
    let cal = Calendar::weekly(&totals)?;
    info!("{} days of data in {} weeks", totals.len(), cal.contents().len());
    Ok(cal)
}

/// Calorie sources of the configured CSV
///
/// The tag specification is validated before the CSV is read.
pub fn calorie_sources(cfg: &SourcesConfig) -> Result<Vec<CategoryShare>> {
    let spec = TagSpec::parse(&cfg.tags)?;
    let rows = load::read_file(&cfg.input.csv, cfg.input.headers.as_deref())?;
    let items = entry::food_items(&rows, &cfg.input.columns)?;
    let shares = spec.attribute(&items)?;
    info!("attributed {} items to {} sources", items.len(), shares.len());
    Ok(shares)
}

/// Make a CSV the current one, returns the number of bytes copied
pub fn add_csv(cfg: &AddCsvConfig) -> Result<usize> {
    let contents = fs::read(&cfg.source).map_err(|source| Error::Io {
        path: cfg.source.clone(),
        source,
    })?;
    fs::write(&cfg.destination, &contents).map_err(|source| Error::Io {
        path: cfg.destination.clone(),
        source,
    })?;
    info!(
        "added '{}' as '{}'",
        cfg.source.display(),
        cfg.destination.display()
    );
    Ok(contents.len())
}

pub fn print_weekly(cal: &Calendar, cfg: &WeeklyConfig) -> Result<()> {
    if cal.is_empty() {
        warn!("'{}' contains no entries", cfg.input.csv.display());
    }
    println!("{}", Table::weekly(cal.contents()).with_title("Weekly average calories"));
    let plotter = Plotter::from(cal.contents());
    println!("{}", plotter.sparkline());
    if let Some(file) = &cfg.svg {
        plotter.save_svg(file)?;
        info!("saved chart to '{}'", file.display());
    }
    Ok(())
}

pub fn print_sources(shares: &[CategoryShare]) {
    println!("{}", Table::sources(shares));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::entry::Columns;
    use crate::load::config::InputConfig;
    use std::path::PathBuf;

    const EXPORT: &str = "\
1/01/24 8:15 AM,Homemade Dal,300
1/01/24 1:30 PM,Dominos Pizza,700
1/03/24 9:00 PM,Homemade Roti,200
1/10/24 9:00 PM,Milk,300
";

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "calorie-insights-{}-{}.csv",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    fn input(csv: PathBuf) -> InputConfig {
        InputConfig {
            csv,
            headers: None,
            columns: Columns::default(),
        }
    }

    #[test]
    fn weekly_from_file() {
        let csv = scratch("weekly", EXPORT);
        let cal = weekly_average(&WeeklyConfig {
            input: input(csv.clone()),
            svg: None,
        })
        .unwrap();
        fs::remove_file(&csv).unwrap();
        let weeks = cal.contents();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].average(), 600);
        assert_eq!(weeks[0].days(), 2);
        assert_eq!(weeks[1].average(), 300);
    }

    #[test]
    fn sources_from_file() {
        let csv = scratch("sources", EXPORT);
        let shares = calorie_sources(&SourcesConfig {
            input: input(csv.clone()),
            tags: "home(homemade);order(dominos,eatfit)".to_string(),
        })
        .unwrap();
        fs::remove_file(&csv).unwrap();
        let pct = shares.iter().map(|s| s.percentage).collect::<Vec<_>>();
        assert_eq!(pct, vec![33, 46]);
    }

    #[test]
    fn tags_checked_before_reading() {
        let cfg = SourcesConfig {
            input: input(PathBuf::from("no/such/export.csv")),
            tags: "home(homemade)".to_string(),
        };
        assert!(matches!(calorie_sources(&cfg), Err(Error::InsufficientCategories(1))));
    }

    #[test]
    fn bad_row_aborts_weekly() {
        let csv = scratch("bad", "1/01/24 8:15 AM,Dal,300\n1/02/24 8:15,Dal,300\n");
        let res = weekly_average(&WeeklyConfig {
            input: input(csv.clone()),
            svg: None,
        });
        fs::remove_file(&csv).unwrap();
        assert!(matches!(res, Err(Error::MalformedDate { .. })));
    }

    #[test]
    fn add_then_use() {
        let source = scratch("add-source", EXPORT);
        let destination = source.with_extension("current.csv");
        let copied = add_csv(&AddCsvConfig {
            source: source.clone(),
            destination: destination.clone(),
        })
        .unwrap();
        assert_eq!(copied, EXPORT.len());
        let cal = weekly_average(&WeeklyConfig {
            input: input(destination.clone()),
            svg: None,
        })
        .unwrap();
        assert_eq!(cal.contents().len(), 2);
        fs::remove_file(&source).unwrap();
        fs::remove_file(&destination).unwrap();
    }

    #[test]
    fn add_missing_source() {
        let cfg = AddCsvConfig {
            source: PathBuf::from("no/such/export.csv"),
            destination: std::env::temp_dir().join("calorie-insights-unused.csv"),
        };
        match add_csv(&cfg) {
            Err(Error::Io { path, .. }) => assert_eq!(path, cfg.source),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
