use crate::process::raw_table::RawTable;
use crate::process::utils::is_missing;
use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{ArrayRef, Float64Builder, Int64Builder, StringBuilder},
    datatypes::{DataType, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;

/// Build a typed batch from raw string rows according to `schema`.
pub fn convert_to_final_types(table: &RawTable, schema: Schema) -> Result<RecordBatch> {
    let n = table.rows.len();
    let mut out: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for (i, fld) in schema.fields().iter().enumerate() {
        let col: ArrayRef = match fld.data_type() {
            DataType::Int64 => {
                let mut b = Int64Builder::with_capacity(n);
                for cell in table.column_cells(i) {
                    if is_missing(cell) {
                        b.append_null();
                    } else {
                        let v = cell.trim().parse::<i64>().with_context(|| {
                            format!("column `{}`: {:?} is not an integer", fld.name(), cell)
                        })?;
                        b.append_value(v);
                    }
                }
                Arc::new(b.finish())
            }
            DataType::Float64 => {
                let mut b = Float64Builder::with_capacity(n);
                for cell in table.column_cells(i) {
                    if is_missing(cell) {
                        b.append_null();
                    } else {
                        let v = cell.trim().parse::<f64>().with_context(|| {
                            format!("column `{}`: {:?} is not a number", fld.name(), cell)
                        })?;
                        b.append_value(v);
                    }
                }
                Arc::new(b.finish())
            }
            DataType::Utf8 => {
                let mut b = StringBuilder::with_capacity(n, n * 8);
                for cell in table.column_cells(i) {
                    if is_missing(cell) {
                        b.append_null();
                    } else {
                        b.append_value(cell);
                    }
                }
                Arc::new(b.finish())
            }
            other => {
                return Err(anyhow!(
                    "column `{}` has unsupported type {:?}",
                    fld.name(),
                    other
                ))
            }
        };
        out.push(col);
    }

    // keep the row count even for a header-only table with no columns
    let options = RecordBatchOptions::new().with_row_count(Some(n));
    RecordBatch::try_new_with_options(Arc::new(schema), out, &options)
        .context("building typed record batch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::schema::infer_schema;
    use arrow::array::{Array, Float64Array, Int64Array, StringArray};

    #[test]
    fn converts_cells_and_nulls() -> Result<()> {
        let table = RawTable {
            headers: vec!["year".into(), "age".into(), "income_groups".into()],
            rows: vec![
                vec!["2001".into(), "30.5".into(), " High_Income ".into()],
                vec!["2002".into(), "".into(), "NaN".into()],
            ],
        };
        let batch = convert_to_final_types(&table, infer_schema(&table))?;
        assert_eq!(batch.num_rows(), 2);

        let year = batch.column(0).as_any().downcast_ref::<Int64Array>().unwrap();
        assert_eq!(year.value(1), 2002);

        let age = batch.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(age.value(0), 30.5);
        assert!(age.is_null(1));

        let labels = batch.column(2).as_any().downcast_ref::<StringArray>().unwrap();
        // strings load verbatim; trimming is a cleaning step
        assert_eq!(labels.value(0), " High_Income ");
        assert!(labels.is_null(1));
        Ok(())
    }

    #[test]
    fn rejects_cells_that_do_not_fit_the_schema() {
        let table = RawTable {
            headers: vec!["year".into()],
            rows: vec![vec!["soon".into()]],
        };
        let schema = Schema::new(vec![arrow::datatypes::Field::new(
            "year",
            DataType::Float64,
            true,
        )]);
        assert!(convert_to_final_types(&table, schema).is_err());
    }
}
