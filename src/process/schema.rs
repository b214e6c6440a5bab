use crate::process::raw_table::RawTable;
use crate::process::utils::{infer_arrow_dtype_from_str, is_missing, widen};
use arrow::datatypes::{DataType, Field, Schema};
use tracing::debug;

/// Derive a column schema from every cell of the raw table.
///
/// Integer columns only stay `Int64` when no cell is missing, since a null
/// forces the column to floating point. A column with no present cell at all
/// is `Float64`.
pub fn infer_schema(table: &RawTable) -> Schema {
    let fields: Vec<Field> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut dtype: Option<DataType> = None;
            let mut saw_missing = false;
            for cell in table.column_cells(i) {
                if is_missing(cell) {
                    saw_missing = true;
                    continue;
                }
                let ty = infer_arrow_dtype_from_str(cell);
                dtype = Some(match dtype {
                    Some(prev) => widen(&prev, &ty),
                    None => ty,
                });
                if dtype == Some(DataType::Utf8) {
                    break;
                }
            }
            let dtype = match dtype {
                None => DataType::Float64,
                Some(DataType::Int64) if saw_missing => DataType::Float64,
                Some(t) => t,
            };
            debug!(column = %name, ?dtype, "inferred column type");
            Field::new(name, dtype, true)
        })
        .collect();

    Schema::new(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn infers_int_float_and_string_columns() {
        let t = table(
            &["year", "gender", "income_groups", "empty"],
            &[&["2001", "1.0", "high_income", ""], &["2002", "3.0", "low", "NaN"]],
        );
        let schema = infer_schema(&t);
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(schema.field(2).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(3).data_type(), &DataType::Float64);
    }

    #[test]
    fn missing_cell_turns_integers_into_floats() {
        let t = table(&["age"], &[&["31"], &[""], &["40"]]);
        assert_eq!(infer_schema(&t).field(0).data_type(), &DataType::Float64);
    }

    #[test]
    fn any_text_cell_makes_a_string_column() {
        let t = table(&["year"], &[&["2001"], &["unknown"], &["2003"]]);
        assert_eq!(infer_schema(&t).field(0).data_type(), &DataType::Utf8);
    }
}
