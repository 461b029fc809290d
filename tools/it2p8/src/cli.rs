//! CLI definitions using clap

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "it2p8")]
#[command(about = "Convert an Impulse Tracker module into PICO-8 sfx and music")]
#[command(version)]
pub struct Cli {
    /// Input IT module
    pub input: Option<PathBuf>,

    /// Output .p8 file (default: input file name with .p8, in the current directory)
    pub output: Option<PathBuf>,

    /// Conversion settings (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
