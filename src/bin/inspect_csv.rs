//! Exploratory look at one or more CSV files: head, info, describe,
//! distinct counts, null counts and duplicate rows.
//!
//! Usage:
//!   inspect_csv [FILES...] [--head N]
//!
//! With no files, inspects the raw population dataset and the reference
//! datapoints file from the working directory.

use anyhow::Result;
use clap::Parser;
use popclean::{eda, load_csv, DEFAULT_INPUT};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const REFERENCE_DATAPOINTS: &str =
    "ddf--datapoints--population--by--income_groups--age--gender--year.csv";

#[derive(Parser)]
#[command(author, version, about = "Print an exploratory profile of CSV files")]
struct Args {
    /// CSV files to inspect.
    #[arg(default_values_t = [DEFAULT_INPUT.to_string(), REFERENCE_DATAPOINTS.to_string()])]
    files: Vec<String>,
    /// Rows shown in the head preview.
    #[arg(long, default_value_t = 5)]
    head: usize,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut failed = 0;

    for file in &args.files {
        let path = PathBuf::from(file);
        let batch = match load_csv(&path) {
            Ok(b) => b,
            Err(e) => {
                error!(path = %path.display(), "cannot load: {:#}", e);
                failed += 1;
                continue;
            }
        };
        let profile = eda::profile(&batch, args.head)?;
        eda::print_profile(file, &profile);
        info!(path = %path.display(), rows = profile.rows, "inspected");
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files could not be loaded", failed, args.files.len());
    }
    Ok(())
}
