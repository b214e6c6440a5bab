use crate::config::MissingYearPolicy;
use crate::process::columns::{column_index, numeric_column, replace_column};
use anyhow::{Context, Result};
use arrow::{
    array::{Array, ArrayRef, BooleanArray, Float64Array},
    compute::filter_record_batch,
    datatypes::DataType,
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::warn;

/// Null out every occurrence of `sentinel` in a numeric column.
///
/// A column holding no sentinel is returned untouched, so an integer column
/// only becomes floating point when something was actually cleared. Text
/// columns can never equal a number and are left alone.
pub fn replace_sentinel(
    batch: &RecordBatch,
    column: &str,
    sentinel: f64,
) -> Result<(RecordBatch, usize)> {
    let idx = column_index(batch, column)?;
    if batch.column(idx).data_type() == &DataType::Utf8 {
        warn!(column, "text column cannot hold a numeric sentinel; left as is");
        return Ok((batch.clone(), 0));
    }

    let values = numeric_column(batch, column)?;
    let hits = values.iter().flatten().filter(|v| *v == sentinel).count();
    if hits == 0 {
        return Ok((batch.clone(), 0));
    }

    let cleared: Float64Array = values
        .iter()
        .map(|opt| opt.filter(|v| *v != sentinel))
        .collect();
    let out = replace_column(batch, idx, Arc::new(cleared) as ArrayRef)?;
    Ok((out, hits))
}

/// Rows removed by [`filter_year`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct YearFilterOutcome {
    pub out_of_range: usize,
    pub missing_dropped: usize,
}

/// Drop rows whose year exceeds `max_year`. Missing years are kept or
/// dropped according to `policy`.
pub fn filter_year(
    batch: &RecordBatch,
    column: &str,
    max_year: f64,
    policy: MissingYearPolicy,
) -> Result<(RecordBatch, YearFilterOutcome)> {
    let years = numeric_column(batch, column)?;

    let mut outcome = YearFilterOutcome::default();
    let keep: Vec<bool> = years
        .iter()
        .map(|opt| match opt {
            Some(y) if y > max_year => {
                outcome.out_of_range += 1;
                false
            }
            Some(_) => true,
            None => match policy {
                MissingYearPolicy::Impute => true,
                MissingYearPolicy::Drop => {
                    outcome.missing_dropped += 1;
                    false
                }
            },
        })
        .collect();

    if outcome.out_of_range + outcome.missing_dropped == 0 {
        return Ok((batch.clone(), outcome));
    }
    let out = filter_record_batch(batch, &BooleanArray::from(keep))
        .context("filtering rows by year")?;
    Ok((out, outcome))
}

/// Drop every row with a null in any of `columns`.
pub fn drop_null_rows(batch: &RecordBatch, columns: &[&str]) -> Result<(RecordBatch, usize)> {
    let mut keep = vec![true; batch.num_rows()];
    for name in columns {
        let col = batch.column(column_index(batch, name)?);
        for (row, flag) in keep.iter_mut().enumerate() {
            if col.is_null(row) {
                *flag = false;
            }
        }
    }

    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped == 0 {
        return Ok((batch.clone(), 0));
    }
    let out = filter_record_batch(batch, &BooleanArray::from(keep))
        .context("dropping rows with missing labels")?;
    Ok((out, dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};

    fn batch() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            (
                "gender",
                Arc::new(Float64Array::from(vec![
                    Some(1.0),
                    Some(3.0),
                    Some(2.0),
                    None,
                ])) as ArrayRef,
            ),
            (
                "year",
                Arc::new(Float64Array::from(vec![
                    Some(2001.0),
                    Some(2200.0),
                    None,
                    Some(2089.0),
                ])) as ArrayRef,
            ),
            (
                "income_groups",
                Arc::new(StringArray::from(vec![Some("a"), Some("b"), None, Some("c")]))
                    as ArrayRef,
            ),
        ])
        .unwrap()
    }

    #[test]
    fn sentinel_becomes_null_and_row_stays() -> Result<()> {
        let (out, hits) = replace_sentinel(&batch(), "gender", 3.0)?;
        assert_eq!(hits, 1);
        assert_eq!(out.num_rows(), 4);
        let gender = out.column(0).as_any().downcast_ref::<Float64Array>().unwrap();
        assert!(gender.is_null(1));
        assert_eq!(gender.value(2), 2.0);
        assert!(gender.iter().flatten().all(|g| g != 3.0));
        Ok(())
    }

    #[test]
    fn integer_column_without_sentinel_keeps_its_type() -> Result<()> {
        let b = RecordBatch::try_from_iter(vec![(
            "gender",
            Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
        )])?;
        let (out, hits) = replace_sentinel(&b, "gender", 3.0)?;
        assert_eq!(hits, 0);
        assert_eq!(out.schema().field(0).data_type(), &DataType::Int64);

        let b = RecordBatch::try_from_iter(vec![(
            "gender",
            Arc::new(Int64Array::from(vec![1, 3])) as ArrayRef,
        )])?;
        let (out, hits) = replace_sentinel(&b, "gender", 3.0)?;
        assert_eq!(hits, 1);
        assert_eq!(out.schema().field(0).data_type(), &DataType::Float64);
        Ok(())
    }

    #[test]
    fn year_bound_keeps_missing_for_imputation() -> Result<()> {
        let (out, outcome) = filter_year(&batch(), "year", 2089.0, MissingYearPolicy::Impute)?;
        assert_eq!(outcome.out_of_range, 1);
        assert_eq!(outcome.missing_dropped, 0);
        assert_eq!(out.num_rows(), 3);
        let years = numeric_column(&out, "year")?;
        assert!(years.iter().flatten().all(|y| y <= 2089.0));
        assert_eq!(years.null_count(), 1);
        Ok(())
    }

    #[test]
    fn year_bound_can_drop_missing() -> Result<()> {
        let (out, outcome) = filter_year(&batch(), "year", 2089.0, MissingYearPolicy::Drop)?;
        assert_eq!(outcome.out_of_range, 1);
        assert_eq!(outcome.missing_dropped, 1);
        assert_eq!(out.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn text_year_column_is_an_error() -> Result<()> {
        let b = RecordBatch::try_from_iter(vec![(
            "year",
            Arc::new(StringArray::from(vec!["2001"])) as ArrayRef,
        )])?;
        assert!(filter_year(&b, "year", 2089.0, MissingYearPolicy::Impute).is_err());
        Ok(())
    }

    #[test]
    fn drops_rows_missing_any_label() -> Result<()> {
        let (out, dropped) = drop_null_rows(&batch(), &["income_groups", "gender"])?;
        assert_eq!(dropped, 2);
        assert_eq!(out.num_rows(), 2);
        Ok(())
    }
}
