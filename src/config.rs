use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

/// What happens to rows whose year is missing when the year bound is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingYearPolicy {
    /// Keep the row; the year is filled by the normal draw later on.
    #[default]
    Impute,
    /// Drop the row together with the out-of-range years.
    Drop,
}

impl MissingYearPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            MissingYearPolicy::Impute => "impute",
            MissingYearPolicy::Drop => "drop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "impute" => Some(MissingYearPolicy::Impute),
            "drop" => Some(MissingYearPolicy::Drop),
            _ => None,
        }
    }
}

/// Knobs for the cleaning pipeline. Every field has a default, so a YAML
/// file only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub gender_column: String,
    /// Gender code treated as unknown and replaced by a null.
    pub gender_sentinel: f64,
    pub label_column: String,
    /// Exact-match corrections applied after trimming and lowercasing.
    pub label_corrections: BTreeMap<String, String>,
    pub year_column: String,
    /// Rows with a present year above this bound are removed.
    pub max_year: f64,
    pub missing_year: MissingYearPolicy,
    /// Numeric columns filled with their median, in this order.
    pub median_columns: Vec<String>,
    /// Seed for the year imputation draws. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Drop rows where the label or gender column is still null at the end.
    pub drop_unlabelled_rows: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        let label_corrections = [
            ("high_income_typo", "high_income"),
            ("upper_middle_income_typo", "upper_middle_income"),
            ("lower_middle_income_typo", "lower_middle_income"),
            ("low_income_typo", "low_income"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            gender_column: "gender".into(),
            gender_sentinel: 3.0,
            label_column: "income_groups".into(),
            label_corrections,
            year_column: "year".into(),
            max_year: 2089.0,
            missing_year: MissingYearPolicy::Impute,
            median_columns: vec!["population".into(), "age".into()],
            seed: None,
            drop_unlabelled_rows: false,
        }
    }
}

impl CleanConfig {
    /// Read a YAML config file. Missing fields fall back to the defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("invalid clean config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_carry_the_four_typo_corrections() {
        let cfg = CleanConfig::default();
        assert_eq!(cfg.label_corrections.len(), 4);
        assert_eq!(
            cfg.label_corrections.get("upper_middle_income_typo").map(String::as_str),
            Some("upper_middle_income")
        );
        assert_eq!(cfg.max_year, 2089.0);
        assert_eq!(cfg.median_columns, vec!["population", "age"]);
        assert!(!cfg.drop_unlabelled_rows);
    }

    #[test]
    fn partial_yaml_keeps_defaults() -> Result<()> {
        let cfg = CleanConfig::from_yaml_str("seed: 42\nmissing_year: drop\n")?;
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.missing_year, MissingYearPolicy::Drop);
        assert_eq!(cfg.gender_column, "gender");
        assert_eq!(cfg.label_corrections.len(), 4);
        Ok(())
    }

    #[test]
    fn empty_yaml_is_default() -> Result<()> {
        assert_eq!(CleanConfig::from_yaml_str("  \n")?, CleanConfig::default());
        Ok(())
    }

    #[test]
    fn reads_config_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "max_year: 2050\ndrop_unlabelled_rows: true")?;
        let cfg = CleanConfig::from_yaml_file(tmp.path())?;
        assert_eq!(cfg.max_year, 2050.0);
        assert!(cfg.drop_unlabelled_rows);
        Ok(())
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(CleanConfig::from_yaml_str("missing_year: guess").is_err());
        assert_eq!(MissingYearPolicy::from_str(" Drop "), Some(MissingYearPolicy::Drop));
        assert_eq!(MissingYearPolicy::from_str("guess"), None);
    }
}
