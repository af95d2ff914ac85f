use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use digen::{declarations::Declarations, generate};
use tracing_subscriber::EnvFilter;

/// Generates dependency resolvers from analyzer declarations
#[derive(Parser, Debug)]
#[command(name = "digen")]
#[command(version)]
pub struct Cli {
    /// Declaration documents produced by the analyzer, merged in the given order
    #[arg(required = true)]
    pub declarations: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the generated code to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log what the generator does to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = digen_config::provider::maybe_load(cli.config.as_deref())
        .context("Could not load config")?;

    let mut declarations = Declarations::default();
    for path in &cli.declarations {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let parsed = Declarations::from_json(&contents)
            .with_context(|| format!("Could not parse declarations in {}", path.display()))?;
        declarations.merge(parsed);
    }

    let code = generate(&declarations, &config)?;

    match &cli.output {
        Some(path) => std::fs::write(path, code)
            .with_context(|| format!("Could not write {}", path.display()))?,
        None => print!("{code}"),
    }

    Ok(())
}
