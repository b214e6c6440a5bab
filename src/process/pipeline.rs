use crate::config::CleanConfig;
use crate::process::{
    dedup::drop_duplicates,
    filter::{drop_null_rows, filter_year, replace_sentinel},
    impute::{fill_with_median, fill_with_normal, MedianFill, NormalFill},
    load_csv,
    trimming::normalize_labels,
    write::write_table,
};
use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Row and value counts for one cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanReport {
    pub rows_loaded: usize,
    pub duplicates_removed: usize,
    pub sentinels_cleared: usize,
    pub labels_corrected: usize,
    pub rows_out_of_range: usize,
    pub rows_missing_year_dropped: usize,
    pub median_fills: Vec<MedianFill>,
    pub year_fill: Option<NormalFill>,
    pub unlabelled_rows_dropped: usize,
    pub rows_written: usize,
    pub seed: Option<u64>,
}

/// Clean `input` into `output` with the default configuration.
pub fn clean<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<()> {
    clean_with(input, output, &CleanConfig::default()).map(|_| ())
}

/// Load, clean and write, returning what each step did.
#[tracing::instrument(
    level = "info",
    skip(input, output, config),
    fields(input = %input.as_ref().display(), output = %output.as_ref().display())
)]
pub fn clean_with<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &CleanConfig,
) -> Result<CleanReport> {
    let start = Instant::now();
    let batch = load_csv(&input)?;
    let (cleaned, report) = clean_batch(batch, config)?;
    write_table(&cleaned, &output)
        .with_context(|| format!("writing cleaned table to {}", output.as_ref().display()))?;
    info!(
        rows_in = report.rows_loaded,
        rows_out = report.rows_written,
        elapsed = ?start.elapsed(),
        "clean finished"
    );
    Ok(report)
}

/// Run the fixed rule sequence over an in-memory table.
pub fn clean_batch(batch: RecordBatch, config: &CleanConfig) -> Result<(RecordBatch, CleanReport)> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut report = CleanReport {
        rows_loaded: batch.num_rows(),
        seed: config.seed,
        ..CleanReport::default()
    };

    // ─── 1) exact duplicates ─────────────────────────────────────────
    let (batch, removed) = drop_duplicates(&batch)?;
    report.duplicates_removed = removed;
    info!(removed, "dropped duplicate rows");

    // ─── 2) gender sentinel → null ───────────────────────────────────
    let (batch, cleared) =
        replace_sentinel(&batch, &config.gender_column, config.gender_sentinel)?;
    report.sentinels_cleared = cleared;
    info!(column = %config.gender_column, cleared, "cleared gender sentinel");

    // ─── 3) income labels ────────────────────────────────────────────
    let (batch, corrected) =
        normalize_labels(&batch, &config.label_column, &config.label_corrections)?;
    report.labels_corrected = corrected;
    info!(column = %config.label_column, corrected, "normalized labels");

    // ─── 4) year bound ───────────────────────────────────────────────
    let (batch, outcome) = filter_year(
        &batch,
        &config.year_column,
        config.max_year,
        config.missing_year,
    )?;
    report.rows_out_of_range = outcome.out_of_range;
    report.rows_missing_year_dropped = outcome.missing_dropped;
    info!(
        max_year = config.max_year,
        out_of_range = outcome.out_of_range,
        missing_dropped = outcome.missing_dropped,
        policy = config.missing_year.as_str(),
        "applied year bound"
    );

    // ─── 5) median imputation ────────────────────────────────────────
    let mut batch = batch;
    for column in &config.median_columns {
        let (next, fill) = fill_with_median(&batch, column)?;
        info!(column = %column, filled = fill.filled, median = ?fill.median, "median imputation");
        report.median_fills.push(fill);
        batch = next;
    }

    // ─── 6) year imputation ──────────────────────────────────────────
    let (batch, fill) = fill_with_normal(&batch, &config.year_column, &mut rng)?;
    info!(
        filled = fill.filled,
        mean = ?fill.mean,
        std_dev = ?fill.std_dev,
        "year imputation"
    );
    report.year_fill = Some(fill);

    // ─── 7) label completeness ───────────────────────────────────────
    let batch = if config.drop_unlabelled_rows {
        let (next, dropped) = drop_null_rows(
            &batch,
            &[config.label_column.as_str(), config.gender_column.as_str()],
        )?;
        report.unlabelled_rows_dropped = dropped;
        info!(dropped, "dropped rows with missing labels");
        next
    } else {
        debug!("rows with missing labels retained");
        batch
    };

    report.rows_written = batch.num_rows();
    Ok((batch, report))
}
