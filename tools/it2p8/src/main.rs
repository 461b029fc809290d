//! it2p8 - Impulse Tracker to PICO-8 converter
//!
//! Reads an .it module and writes a .p8 cartridge holding its patterns as
//! `__sfx__` and `__music__` data.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use p8_music::ConvertConfig;
use std::path::{Path, PathBuf};

mod cli;

use cli::Cli;

/// Cartridge file extension
const P8_EXT: &str = "p8";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(input) = cli.input else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let output = cli.output.unwrap_or_else(|| default_output_path(&input));
    let config = load_config(cli.config.as_deref())?;

    tracing::info!("Converting {:?} -> {:?}", input, output);
    convert_file(&input, &output, &config)?;
    tracing::info!("Done!");

    Ok(())
}

/// Input file name with the cartridge extension, in the current directory
fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "out".into());
    name.push(".");
    name.push(P8_EXT);
    PathBuf::from(name)
}

/// Load conversion settings, or defaults when no file is given
fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    let Some(path) = path else {
        return Ok(ConvertConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config {:?}", path))
}

/// Convert one module; the output is only written once conversion succeeded
fn convert_file(input: &Path, output: &Path, config: &ConvertConfig) -> Result<()> {
    if !input.exists() {
        bail!("File not found: {:?}", input);
    }

    let data = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let module =
        it_decode::parse_it(&data).with_context(|| format!("Failed to parse {:?}", input))?;

    tracing::debug!(
        orders = module.order_list.len(),
        patterns = module.patterns.len(),
        speed = module.speed,
        tempo = module.tempo,
        has_message = module.message.is_some(),
        "parsed module"
    );

    let cart = p8_music::convert(&module, config)
        .with_context(|| format!("Failed to convert {:?}", input))?;

    std::fs::write(output, cart).with_context(|| format!("Failed to write {:?}", output))?;
    Ok(())
}
