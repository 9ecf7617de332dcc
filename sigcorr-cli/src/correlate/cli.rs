use clap::{Arg, ArgAction, Command, value_parser};

use crate::consts::PKG_NAME;

pub const FILES: &str = "files";
pub const WINDOW: &str = "window";
pub const METRIC: &str = "type";
pub const OUTPUT: &str = "output";
pub const THREADS: &str = "threads";
pub const PRECISION: &str = "precision";
pub const CONFIG: &str = "config";
pub const PROGRESS: &str = "progress";
pub const VERBOSE: &str = "verbose";

///
/// Flags left unset fall back to the config file, then to the built-in defaults.
///
pub fn create_correlate_cli() -> Command {
    Command::new(PKG_NAME)
        .about("Correlate genome signal tracks (bigWig, bedGraph, wiggle) pairwise over fixed-size bins.")
        .arg(
            Arg::new(FILES)
                .required(true)
                .num_args(1..)
                .value_name("FILES")
                .help("Track files to correlate (at least 2)"),
        )
        .arg(
            Arg::new(WINDOW)
                .short('w')
                .long("window")
                .value_name("BP")
                .value_parser(value_parser!(u32).range(1..))
                .help("Window size in base pairs [default: 100]"),
        )
        .arg(
            Arg::new(METRIC)
                .short('t')
                .long("type")
                .value_name("METRIC")
                .help("Correlation metric: pearson or spearman [default: pearson]"),
        )
        .arg(
            Arg::new(OUTPUT)
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("Write the matrix to this file instead of stdout"),
        )
        .arg(
            Arg::new(THREADS)
                .short('p')
                .long("threads")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Worker threads for the pairwise loop [default: 1]"),
        )
        .arg(
            Arg::new(PRECISION)
                .long("precision")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Decimal places in the output table"),
        )
        .arg(
            Arg::new(CONFIG)
                .long("config")
                .value_name("TOML")
                .help("Load settings from a TOML file; flags override it"),
        )
        .arg(
            Arg::new(PROGRESS)
                .long("progress")
                .action(ArgAction::SetTrue)
                .help("Show a progress bar over track pairs"),
        )
        .arg(
            Arg::new(VERBOSE)
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Raise the log level (-v info, -vv debug)"),
        )
}
