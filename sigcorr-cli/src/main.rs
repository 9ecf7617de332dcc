mod correlate;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "sigcorr";
    pub const BIN_NAME: &str = "sigcorr";
}

fn build_parser() -> Command {
    correlate::cli::create_correlate_cli()
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    correlate::handlers::init_logging(matches.get_count(correlate::cli::VERBOSE));
    correlate::handlers::run_correlate(&matches)?;

    Ok(())
}
