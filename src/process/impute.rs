use crate::process::columns::{column_index, numeric_column, replace_column};
use crate::process::stats;
use anyhow::{anyhow, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array},
    record_batch::RecordBatch,
};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// What a median fill did to one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianFill {
    pub column: String,
    pub filled: usize,
    pub median: Option<f64>,
}

/// What the normal-draw fill did to one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalFill {
    pub column: String,
    pub filled: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

/// Replace nulls in `column` with the median of its present values.
/// A column without nulls is returned untouched; one without any present
/// value stays null.
pub fn fill_with_median(batch: &RecordBatch, column: &str) -> Result<(RecordBatch, MedianFill)> {
    let idx = column_index(batch, column)?;
    let values = numeric_column(batch, column)?;
    let median = stats::median(&values);
    let missing = values.null_count();

    let mut fill = MedianFill {
        column: column.to_string(),
        filled: 0,
        median,
    };
    if missing == 0 {
        return Ok((batch.clone(), fill));
    }
    let Some(m) = median else {
        warn!(column, missing, "no observed values; median fill skipped");
        return Ok((batch.clone(), fill));
    };

    let filled: Float64Array = values.iter().map(|v| Some(v.unwrap_or(m))).collect();
    fill.filled = missing;
    debug!(column, median = m, filled = missing, "median fill");
    let out = replace_column(batch, idx, Arc::new(filled) as ArrayRef)?;
    Ok((out, fill))
}

/// Replace each null in `column` with an independent draw from a normal
/// distribution fitted to the present values (mean, sample std).
///
/// With a single observed value the spread is taken as zero, so every draw
/// is that value.
pub fn fill_with_normal<R: Rng + ?Sized>(
    batch: &RecordBatch,
    column: &str,
    rng: &mut R,
) -> Result<(RecordBatch, NormalFill)> {
    let idx = column_index(batch, column)?;
    let values = numeric_column(batch, column)?;
    let observed = stats::observed(&values);
    let mean = stats::mean(&observed);
    let std_dev = stats::sample_std(&observed);
    let missing = values.null_count();

    let mut fill = NormalFill {
        column: column.to_string(),
        filled: 0,
        mean,
        std_dev,
    };
    if missing == 0 {
        return Ok((batch.clone(), fill));
    }
    let Some(mu) = mean else {
        warn!(column, missing, "no observed values; normal fill skipped");
        return Ok((batch.clone(), fill));
    };
    let sigma = std_dev.unwrap_or_else(|| {
        warn!(column, "fewer than two observed values; drawing with zero spread");
        0.0
    });

    let normal = Normal::new(mu, sigma)
        .map_err(|e| anyhow!("normal({}, {}) for column `{}`: {}", mu, sigma, column, e))?;
    let filled: Float64Array = values
        .iter()
        .map(|v| Some(v.unwrap_or_else(|| normal.sample(rng))))
        .collect();
    fill.filled = missing;
    debug!(column, mean = mu, std_dev = sigma, filled = missing, "normal fill");

    let out = replace_column(batch, idx, Arc::new(filled) as ArrayRef)?;
    Ok((out, fill))
}
