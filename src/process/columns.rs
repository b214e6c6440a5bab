use anyhow::{bail, Context, Result};
use arrow::{
    array::{new_null_array, Array, ArrayRef, Float64Array, StringArray},
    compute::cast,
    datatypes::{DataType, Field, FieldRef, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;

/// Position of `name` in the batch, or an error naming the column.
pub fn column_index(batch: &RecordBatch, name: &str) -> Result<usize> {
    match batch.schema().index_of(name) {
        Ok(idx) => Ok(idx),
        Err(_) => bail!("column `{}` not found in table", name),
    }
}

/// Column `name` as floats. Integer columns are widened; text is an error.
pub fn numeric_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let idx = column_index(batch, name)?;
    let col = batch.column(idx);
    match col.data_type() {
        DataType::Float64 | DataType::Int64 => {
            let floats = cast(col, &DataType::Float64)
                .with_context(|| format!("casting column `{}` to Float64", name))?;
            Ok(floats
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("Float64 cast produced another array type")?
                .clone())
        }
        other => bail!("column `{}` is not numeric (found {:?})", name, other),
    }
}

/// Column `name` as strings. A column with no present value counts as an
/// all-null string column whatever its inferred type.
pub fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let idx = column_index(batch, name)?;
    let col = batch.column(idx);
    if let Some(sarr) = col.as_any().downcast_ref::<StringArray>() {
        return Ok(sarr.clone());
    }
    if col.null_count() == col.len() {
        let nulls = new_null_array(&DataType::Utf8, col.len());
        return Ok(nulls
            .as_any()
            .downcast_ref::<StringArray>()
            .context("null Utf8 array has unexpected type")?
            .clone());
    }
    bail!(
        "column `{}` is not a string column (found {:?})",
        name,
        col.data_type()
    )
}

/// Swap column `idx` for `array`, updating the field type to match.
pub fn replace_column(batch: &RecordBatch, idx: usize, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let name = fields[idx].name().clone();
    fields[idx] = Arc::new(Field::new(name, array.data_type().clone(), true));

    let mut cols: Vec<ArrayRef> = batch.columns().to_vec();
    cols[idx] = array;

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), cols, &options)
        .context("rebuilding batch with replaced column")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;

    fn batch() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            ("year", Arc::new(Int64Array::from(vec![2001, 2002])) as ArrayRef),
            (
                "income_groups",
                Arc::new(StringArray::from(vec![Some("a"), None])) as ArrayRef,
            ),
            (
                "empty",
                Arc::new(Float64Array::from(vec![None, None])) as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn widens_integers_to_floats() -> Result<()> {
        let years = numeric_column(&batch(), "year")?;
        assert_eq!(years.value(1), 2002.0);
        Ok(())
    }

    #[test]
    fn text_is_not_numeric() {
        let err = numeric_column(&batch(), "income_groups").unwrap_err();
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn missing_column_is_named() {
        let err = numeric_column(&batch(), "population").unwrap_err();
        assert!(err.to_string().contains("`population`"));
    }

    #[test]
    fn all_null_column_reads_as_strings() -> Result<()> {
        let s = string_column(&batch(), "empty")?;
        assert_eq!(s.len(), 2);
        assert_eq!(s.null_count(), 2);
        assert!(string_column(&batch(), "year").is_err());
        Ok(())
    }

    #[test]
    fn replacing_updates_field_type() -> Result<()> {
        let b = batch();
        let floats = Arc::new(Float64Array::from(vec![1.5, 2.5])) as ArrayRef;
        let out = replace_column(&b, 0, floats)?;
        assert_eq!(out.schema().field(0).name(), "year");
        assert_eq!(out.schema().field(0).data_type(), &DataType::Float64);
        assert_eq!(out.num_rows(), 2);
        Ok(())
    }
}
