use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, BooleanArray, Float64Array},
    compute::{filter_record_batch, not},
    datatypes::Float64Type,
    record_batch::RecordBatch,
    row::{RowConverter, SortField},
};
use std::{collections::HashSet, sync::Arc};

/// `-0.0` and `0.0` differ bitwise, so the row encoding would keep them apart.
fn fold_signed_zero(col: &ArrayRef) -> ArrayRef {
    match col.as_any().downcast_ref::<Float64Array>() {
        Some(floats) if floats.values().iter().any(|v| *v == 0.0 && v.is_sign_negative()) => {
            Arc::new(floats.unary::<_, Float64Type>(|v| if v == 0.0 { 0.0 } else { v }))
        }
        _ => Arc::clone(col),
    }
}

/// `true` for every row equal, across all columns, to an earlier row.
/// Nulls compare equal to nulls, and `-0.0` equals `0.0`.
pub fn duplicate_mask(batch: &RecordBatch) -> Result<BooleanArray> {
    if batch.num_columns() == 0 {
        return Ok(BooleanArray::from(vec![false; batch.num_rows()]));
    }

    let fields: Vec<SortField> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields).context("creating row converter")?;
    let columns: Vec<ArrayRef> = batch.columns().iter().map(fold_signed_zero).collect();
    let rows = converter
        .convert_columns(&columns)
        .context("encoding rows for duplicate detection")?;

    let mut seen = HashSet::with_capacity(rows.num_rows());
    let flags: Vec<bool> = rows.iter().map(|row| !seen.insert(row)).collect();
    Ok(BooleanArray::from(flags))
}

/// Keep the first occurrence of every distinct row, in order. Returns the
/// deduplicated batch and how many rows were removed.
pub fn drop_duplicates(batch: &RecordBatch) -> Result<(RecordBatch, usize)> {
    let dupes = duplicate_mask(batch)?;
    let removed = dupes.true_count();
    if removed == 0 {
        return Ok((batch.clone(), 0));
    }
    let keep = not(&dupes).context("inverting duplicate mask")?;
    let out = filter_record_batch(batch, &keep).context("filtering duplicate rows")?;
    Ok((out, removed))
}
