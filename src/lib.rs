//! # popclean
//!
//! Cleaning and exploratory inspection for a tabular population dataset.
//!
//! A CSV file is loaded into an Arrow [`RecordBatch`](arrow::record_batch::RecordBatch),
//! pushed through a fixed sequence of cleaning rules and written back out.
//!
//! ```no_run
//! use popclean::{clean_with, CleanConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = CleanConfig {
//!     seed: Some(7),
//!     ..CleanConfig::default()
//! };
//! let report = clean_with("messy_population_data.csv", "cleaned.csv", &config)?;
//! println!("{} -> {} rows", report.rows_loaded, report.rows_written);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod eda;
pub mod process;

pub use config::{CleanConfig, MissingYearPolicy};
pub use eda::{profile, TableProfile};
pub use process::pipeline::{clean, clean_batch, clean_with, CleanReport};
pub use process::{load_csv, write_table};

/// Default input file used by the `popclean` binary.
pub const DEFAULT_INPUT: &str = "messy_population_data.csv";
/// Default output file used by the `popclean` binary.
pub const DEFAULT_OUTPUT: &str = "cleaned_population_data.csv";
