use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use shiftquill::config::Config;
use shiftquill::file::loader::{load_document, load_document_from_stdin};
use shiftquill::file::saver::{save_document, serialize_document};
use shiftquill::Shiftr;

/// shiftquill - Restructure JSON documents with a declarative shift spec
#[derive(Parser)]
#[command(name = "shiftquill")]
#[command(version)]
#[command(about = "Restructure JSON documents with a declarative shift spec", long_about = None)]
struct Cli {
    /// Shift spec (JSON or YAML, optionally gzipped)
    spec: PathBuf,

    /// Input document (omit to read from stdin)
    input: Option<PathBuf>,

    /// Config file (default: ~/.config/shiftquill/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write compact JSON instead of pretty-printing
    #[arg(long)]
    compact: bool,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log skipped writes and spec details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over --verbose when set
    let default_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    // CLI flag overrides config
    if cli.compact {
        config.pretty = false;
    }

    let spec = load_document(&cli.spec)
        .with_context(|| format!("Failed to load spec {}", cli.spec.display()))?;
    let shiftr = Shiftr::from_config(&spec, &config)
        .with_context(|| format!("Invalid spec {}", cli.spec.display()))?;

    let input = match &cli.input {
        Some(path) => load_document(path)
            .with_context(|| format!("Failed to load input {}", path.display()))?,
        None => {
            if io::stdin().is_terminal() {
                anyhow::bail!("No input file given and nothing piped on stdin");
            }
            load_document_from_stdin()?
        }
    };

    let output = shiftr.transform(&input).context("Transform failed")?;

    match &cli.output {
        Some(path) => save_document(path, &output, &config)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let text = serialize_document(&output, &config)?;
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
