use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use sigcorr_core::SignalTrack;
use sigcorr_correlate::{CorrelateConfig, CorrelationMatrix};
use sigcorr_io::open_track;

use super::cli::{CONFIG, FILES, METRIC, OUTPUT, PRECISION, PROGRESS, THREADS, WINDOW};

///
/// Install the log backend. `RUST_LOG` wins over `-v` when set.
///
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

///
/// Merge the optional config file with any flags given on the command line.
///
pub fn resolve_config(matches: &ArgMatches) -> Result<CorrelateConfig> {
    let mut config = match matches.get_one::<String>(CONFIG) {
        Some(path) => CorrelateConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config file {}", path))?,
        None => CorrelateConfig::default(),
    };

    if let Some(window) = matches.get_one::<u32>(WINDOW) {
        config.window_size = *window;
    }
    if let Some(metric) = matches.get_one::<String>(METRIC) {
        config.metric = metric.clone();
    }
    if let Some(threads) = matches.get_one::<usize>(THREADS) {
        config.threads = *threads;
    }
    if let Some(precision) = matches.get_one::<usize>(PRECISION) {
        config.precision = Some(*precision);
    }
    if matches.get_flag(PROGRESS) {
        config.progress = true;
    }

    config.validate()?;
    Ok(config)
}

pub fn run_correlate(matches: &ArgMatches) -> Result<()> {
    let config = resolve_config(matches)?;

    let files: Vec<&String> = matches
        .get_many::<String>(FILES)
        .context("at least two track files are required")?
        .collect();

    let mut tracks: Vec<Box<dyn SignalTrack + Send>> = Vec::with_capacity(files.len());
    for file in files {
        let track = open_track(file).with_context(|| format!("Failed to open track {}", file))?;
        tracks.push(track);
    }
    log::info!("Opened {} tracks", tracks.len());

    let matrix = sigcorr_correlate::correlate(&mut tracks, &config)?;

    match matches.get_one::<String>(OUTPUT) {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create output file {}", path))?;
            write_matrix(&matrix, &config, BufWriter::new(file))?;
        }
        None => write_matrix(&matrix, &config, io::stdout().lock())?,
    }

    Ok(())
}

fn write_matrix<W: Write>(matrix: &CorrelationMatrix, config: &CorrelateConfig, mut writer: W) -> Result<()> {
    config
        .formatter()
        .write(matrix, &mut writer)
        .context("Failed to write correlation matrix")?;
    writer.flush()?;
    Ok(())
}
