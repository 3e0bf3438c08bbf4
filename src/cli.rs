//! Command-line options

use std::path::PathBuf;

use clap::{crate_description, crate_name, crate_version, Parser};

#[derive(Debug, Parser)]
#[command(name = crate_name!(), about = crate_description!(), version = crate_version!())]
pub struct Opts {
    /// Directory holding the CSV tracks
    #[arg(default_value = ".")]
    pub dir: PathBuf,
    /// JSON configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Where to write the figures (default: the input directory)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    /// More logging, repeat for even more
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
