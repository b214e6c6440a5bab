use crate::process::columns::{column_index, replace_column, string_column};
use crate::process::utils::fold_label;
use anyhow::Result;
use arrow::{
    array::{ArrayRef, StringArray},
    record_batch::RecordBatch,
};
use std::{collections::BTreeMap, sync::Arc};

/// Trim, lowercase, then map a known typo onto its canonical label.
/// Applying it to its own output changes nothing.
pub fn normalize_label(raw: &str, corrections: &BTreeMap<String, String>) -> String {
    let folded = fold_label(raw);
    match corrections.get(&folded) {
        Some(canonical) => canonical.clone(),
        None => folded,
    }
}

/// Normalize every present value of the label column. Returns the new batch
/// and how many values the correction table rewrote.
pub fn normalize_labels(
    batch: &RecordBatch,
    column: &str,
    corrections: &BTreeMap<String, String>,
) -> Result<(RecordBatch, usize)> {
    let idx = column_index(batch, column)?;
    let labels = string_column(batch, column)?;

    let mut corrected = 0;
    let normalized: StringArray = labels
        .iter()
        .map(|opt| {
            opt.map(|raw| {
                if corrections.contains_key(&fold_label(raw)) {
                    corrected += 1;
                }
                normalize_label(raw, corrections)
            })
        })
        .collect();

    let out = replace_column(batch, idx, Arc::new(normalized) as ArrayRef)?;
    Ok((out, corrected))
}
