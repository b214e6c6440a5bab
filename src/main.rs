use anyhow::{Context, Result};
use clap::Parser;
use popclean::{clean_with, CleanConfig, MissingYearPolicy, DEFAULT_INPUT, DEFAULT_OUTPUT};
use std::{fs, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Clean the messy population dataset into a tidy CSV"
)]
struct Args {
    /// CSV file to clean.
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Destination; a `.parquet` extension writes Parquet instead of CSV.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// YAML file overriding the default cleaning rules.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for the year imputation draws.
    #[arg(long)]
    seed: Option<u64>,
    /// Drop rows whose income group or gender is still missing at the end.
    #[arg(long)]
    drop_unlabelled: bool,
    /// Missing years: `impute` keeps the row and draws a year, `drop` removes it.
    #[arg(long, value_parser = parse_policy)]
    missing_year: Option<MissingYearPolicy>,
    /// Write the run report as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn parse_policy(s: &str) -> Result<MissingYearPolicy, String> {
    MissingYearPolicy::from_str(s).ok_or_else(|| format!("expected `impute` or `drop`, got `{s}`"))
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // ─── 2) assemble config ──────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => CleanConfig::from_yaml_file(path)?,
        None => CleanConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.drop_unlabelled {
        config.drop_unlabelled_rows = true;
    }
    if let Some(policy) = args.missing_year {
        config.missing_year = policy;
    }

    // ─── 3) clean ────────────────────────────────────────────────────
    let report = clean_with(&args.input, &args.output, &config)?;

    // ─── 4) optional report ──────────────────────────────────────────
    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report).context("serializing report")?;
        fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    }

    Ok(())
}
