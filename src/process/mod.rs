// src/process/mod.rs
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, info};

pub mod columns;
pub mod convert;
pub mod dedup;
pub mod filter;
pub mod impute;
pub mod pipeline;
pub mod raw_table;
pub mod schema;
pub mod stats;
pub mod trimming;
pub mod utils;
pub mod write;

pub use raw_table::RawTable;
pub use write::write_table;

/// Read a headed CSV into a [`RawTable`] without interpreting any cell.
///
/// Rows with a different field count than the header are an error, as is
/// invalid UTF-8.
pub fn read_raw_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("Failed to read CSV header of {}", path.display()))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| {
            format!("CSV parse error in {} at record {}", path.display(), idx)
        })?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    debug!(columns = headers.len(), rows = rows.len(), "read raw csv");

    Ok(RawTable { headers, rows })
}

/// Load a CSV file into a typed Arrow batch.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    let raw = read_raw_csv(&path)?;
    let schema = schema::infer_schema(&raw);
    let batch = convert::convert_to_final_types(&raw, schema)
        .with_context(|| format!("Failed to type columns of {}", path.as_ref().display()))?;
    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded table"
    );
    Ok(batch)
}
