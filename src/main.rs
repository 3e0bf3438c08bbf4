use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use trackmap::cli::Opts;
use trackmap::{logging, Config, Driver, HttpTileSource, Renderer, Result, TrackReader};

fn run(opts: Opts) -> Result<bool> {
    let mut config = Config::load(opts.config.as_deref())?;
    if opts.output.is_some() {
        config.output_dir = opts.output;
    }

    let output_dir = config.output_dir.clone().unwrap_or_else(|| opts.dir.clone());
    info!("Reading tracks from {}, figures go to {}", opts.dir.display(), output_dir.display());

    let reader = TrackReader::new(config.region, config.preview_rows);
    let source = HttpTileSource::new(&config.tiles)?;
    let renderer = Renderer::new(source, &config, output_dir)?;
    let driver = Driver::new(reader, renderer, &config.extension);

    let report = driver.run(&opts.dir)?;
    Ok(report.is_success())
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    logging::init(opts.verbose);

    match run(opts) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
