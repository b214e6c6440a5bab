//! Exploratory profile of a loaded table: the first rows, column types,
//! descriptive statistics, distinct and null counts, repeated rows.

use crate::process::{dedup::duplicate_mask, stats};
use anyhow::{Context, Result};
use arrow::{
    array::{Array, ArrayRef, Float64Array},
    compute::cast,
    datatypes::DataType,
    record_batch::RecordBatch,
    util::display::array_value_to_string,
};
use serde::Serialize;
use std::collections::HashSet;

pub mod render;

pub use render::{print_profile, render_profile};

/// Shown for a null cell in the head preview.
pub const NULL_DISPLAY: &str = "NaN";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
}

/// `describe()`-style summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub rows: usize,
    pub headers: Vec<String>,
    pub head: Vec<Vec<String>>,
    pub info: Vec<ColumnInfo>,
    pub describe: Vec<NumericSummary>,
    /// Distinct non-null values per column, in column order.
    pub nunique: Vec<(String, usize)>,
    /// Nulls per column, in column order.
    pub null_counts: Vec<(String, usize)>,
    /// Rows repeating an earlier row.
    pub duplicated: usize,
}

/// Profile `batch`, previewing its first `head_rows` rows.
pub fn profile(batch: &RecordBatch, head_rows: usize) -> Result<TableProfile> {
    let schema = batch.schema();
    let headers: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();

    let shown = head_rows.min(batch.num_rows());
    let mut head = Vec::with_capacity(shown);
    for row in 0..shown {
        let cells = batch
            .columns()
            .iter()
            .map(|col| display_cell(col, row))
            .collect::<Result<Vec<_>>>()?;
        head.push(cells);
    }

    let mut info = Vec::with_capacity(headers.len());
    let mut describe = Vec::new();
    let mut nunique = Vec::with_capacity(headers.len());
    let mut null_counts = Vec::with_capacity(headers.len());

    for (field, col) in schema.fields().iter().zip(batch.columns()) {
        let name = field.name().clone();
        info.push(ColumnInfo {
            name: name.clone(),
            dtype: format!("{:?}", field.data_type()),
            non_null: col.len() - col.null_count(),
        });
        if matches!(field.data_type(), DataType::Int64 | DataType::Float64) {
            describe.push(summarize(&name, col)?);
        }
        nunique.push((name.clone(), distinct_count(col)?));
        null_counts.push((name, col.null_count()));
    }

    let duplicated = duplicate_mask(batch)?.true_count();

    Ok(TableProfile {
        rows: batch.num_rows(),
        headers,
        head,
        info,
        describe,
        nunique,
        null_counts,
        duplicated,
    })
}

fn display_cell(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(NULL_DISPLAY.to_string());
    }
    array_value_to_string(col, row).context("formatting cell")
}

fn summarize(name: &str, col: &ArrayRef) -> Result<NumericSummary> {
    let floats = cast(col, &DataType::Float64)
        .with_context(|| format!("casting column `{}` for describe", name))?;
    let floats = floats
        .as_any()
        .downcast_ref::<Float64Array>()
        .context("Float64 cast produced another array type")?;

    let values = stats::observed(floats);
    let sorted = stats::sorted_observed(floats);
    Ok(NumericSummary {
        name: name.to_string(),
        count: values.len(),
        mean: stats::mean(&values),
        std: stats::sample_std(&values),
        min: sorted.first().copied(),
        q25: stats::quantile(&sorted, 0.25),
        q50: stats::quantile(&sorted, 0.5),
        q75: stats::quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    })
}

fn distinct_count(col: &ArrayRef) -> Result<usize> {
    let mut seen = HashSet::new();
    for row in 0..col.len() {
        if col.is_valid(row) {
            seen.insert(array_value_to_string(col, row).context("formatting cell")?);
        }
    }
    Ok(seen.len())
}
