mod cli;
mod lib;
mod load;

use std::path::Path;

use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};

use cli::report::Report;
use lib::error::Result;
use load::config::Settings;

fn command_usage<'a, 'b>() -> App<'a, 'b> {
    let csv = Arg::with_name("csv")
        .short("f")
        .long("csv")
        .takes_value(true)
        .help("The path to the CSV to use (optional if a CSV has already been added)");

    App::new("calorie-insights")
        .version(crate_version!())
        .about("Get insights from a calorie counter CSV")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .help("Settings file (defaults to calorie-insights.toml if present)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log per-row and per-week details"),
        )
        .subcommand(
            SubCommand::with_name("addcsv")
                .about("Add a calorie CSV for analysis")
                .arg(
                    Arg::with_name("csv")
                        .short("f")
                        .long("csv")
                        .takes_value(true)
                        .required(true)
                        .help("The path to the CSV to be added"),
                ),
        )
        .subcommand(
            SubCommand::with_name("weeklyavg")
                .about("Get weekly average calories from a calorie CSV")
                .arg(csv.clone())
                .arg(
                    Arg::with_name("svg")
                        .long("svg")
                        .takes_value(true)
                        .help("Also draw the weekly averages to this SVG file"),
                ),
        )
        .subcommand(
            SubCommand::with_name("sources")
                .about("Get percentages of calories from various sources")
                .arg(csv)
                .arg(
                    Arg::with_name("tags")
                        .short("t")
                        .long("tags")
                        .takes_value(true)
                        .help(
                            "The tags indicating calorie sources, matched against food item names; \
                             eg. \"homemade(homemade);ordered(eatfit,ordered,dominos);milk-and-cereal(milk)\"",
                        ),
                ),
        )
}

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let settings = match matches.value_of("config") {
        Some(path) => Settings::load(Path::new(path))?,
        None => Settings::load_default()?,
    };
    match matches.subcommand() {
        ("addcsv", Some(sub)) => {
            cli::add_csv(&settings.add_csv(sub.value_of("csv").unwrap_or_default()))?;
        }
        ("weeklyavg", Some(sub)) => {
            let cfg = settings.weekly(sub.value_of("csv"), sub.value_of("svg"));
            let cal = cli::weekly_average(&cfg)?;
            cli::print_weekly(&cal, &cfg)?;
        }
        ("sources", Some(sub)) => {
            let cfg = settings.sources(sub.value_of("csv"), sub.value_of("tags"));
            cli::print_sources(&cli::calorie_sources(&cfg)?);
        }
        _ => unreachable!("clap requires a subcommand"),
    }
    Ok(())
}

fn main() {
    let matches = command_usage().get_matches();
    init_logging(matches.is_present("verbose"));
    if let Err(err) = run(&matches) {
        eprint!("{}", Report::from(&err));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let m = command_usage()
            .get_matches_from_safe(vec!["calorie-insights", "sources", "-f", "x.csv", "-t", "a(x);b(y)"])
            .unwrap();
        let (name, sub) = m.subcommand();
        assert_eq!(name, "sources");
        let sub = sub.unwrap();
        assert_eq!(sub.value_of("csv"), Some("x.csv"));
        assert_eq!(sub.value_of("tags"), Some("a(x);b(y)"));
    }

    #[test]
    fn addcsv_requires_path() {
        assert!(command_usage()
            .get_matches_from_safe(vec!["calorie-insights", "addcsv"])
            .is_err());
    }

    #[test]
    fn global_flags_before_subcommand() {
        let m = command_usage()
            .get_matches_from_safe(vec!["calorie-insights", "-v", "--config", "c.toml", "weeklyavg", "--svg", "w.svg"])
            .unwrap();
        assert!(m.is_present("verbose"));
        assert_eq!(m.value_of("config"), Some("c.toml"));
        let sub = m.subcommand_matches("weeklyavg").unwrap();
        assert_eq!(sub.value_of("svg"), Some("w.svg"));
        assert_eq!(sub.value_of("csv"), None);
    }
}
