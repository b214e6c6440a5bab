use arrow::datatypes::DataType;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cell spellings a dataframe reader treats as "no value".
static NA_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
        "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
    ]
    .into_iter()
    .collect()
});

/// True when a raw CSV cell should load as a null.
pub fn is_missing(raw: &str) -> bool {
    NA_TOKENS.contains(raw)
}

/// Trim whitespace + lowercase, the first half of label normalization.
pub fn fold_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Narrowest Arrow type that can hold one present cell.
pub fn infer_arrow_dtype_from_str(s: &str) -> DataType {
    let s = s.trim();
    if s.parse::<i64>().is_ok() {
        DataType::Int64
    } else if s.parse::<f64>().is_ok() {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

/// Widen two inferred cell types into a column type.
pub fn widen(a: &DataType, b: &DataType) -> DataType {
    match (a, b) {
        (DataType::Utf8, _) | (_, DataType::Utf8) => DataType::Utf8,
        (DataType::Float64, _) | (_, DataType::Float64) => DataType::Float64,
        _ => DataType::Int64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_tokens_are_missing() {
        for raw in ["", "NaN", "NA", "null", "<NA>", "#N/A"] {
            assert!(is_missing(raw), "{raw:?} should be missing");
        }
        assert!(!is_missing("0"));
        assert!(!is_missing(" "));
        assert!(!is_missing("high_income"));
    }

    #[test]
    fn infers_narrowest_type() {
        assert_eq!(infer_arrow_dtype_from_str("2001"), DataType::Int64);
        assert_eq!(infer_arrow_dtype_from_str(" 3.0 "), DataType::Float64);
        assert_eq!(infer_arrow_dtype_from_str("1e3"), DataType::Float64);
        assert_eq!(infer_arrow_dtype_from_str("low_income"), DataType::Utf8);
    }

    #[test]
    fn widening_prefers_strings_then_floats() {
        assert_eq!(widen(&DataType::Int64, &DataType::Float64), DataType::Float64);
        assert_eq!(widen(&DataType::Float64, &DataType::Utf8), DataType::Utf8);
        assert_eq!(widen(&DataType::Int64, &DataType::Int64), DataType::Int64);
    }

    #[test]
    fn folds_case_and_whitespace() {
        assert_eq!(fold_label("  High_Income_Typo \t"), "high_income_typo");
    }
}
