//! Indicator CSV Loader Module
//! Reads the semicolon-delimited indicator table with Polars and checks its shape.

use log::{debug, info};
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use thiserror::Error;

pub const COL_LABEL: &str = "label";
pub const COL_YEAR: &str = "jaar";
pub const COL_VALUE: &str = "waarde";
pub const COL_REGION: &str = "statnaam";

/// Columns every indicator table must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_LABEL, COL_YEAR, COL_VALUE, COL_REGION];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("The '{0}' column does not exist in the data")]
    MissingColumn(String),
    #[error("No valid indicators found in the 'label' column")]
    NoIndicators,
}

/// CSV dialect of the indicator file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub separator: u8,
    pub decimal_comma: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            separator: b';',
            decimal_comma: false,
        }
    }
}

/// Loads indicator tables from disk.
pub struct IndicatorLoader;

impl IndicatorLoader {
    /// Load a CSV file using Polars.
    pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<IndicatorTable, LoaderError> {
        info!("Reading indicator table {}", path.display());

        let df = LazyCsvReader::new(path)
            .with_separator(options.separator)
            .with_decimal_comma(options.decimal_comma)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        debug!("Read {} rows, columns {:?}", df.height(), df.get_column_names());
        IndicatorTable::from_dataframe(df)
    }
}

/// Validated indicator snapshot with normalized column types.
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    df: DataFrame,
}

impl IndicatorTable {
    /// Check the required columns and cast them to their working types.
    ///
    /// Casts are non-strict: cells that do not parse become null.
    pub fn from_dataframe(df: DataFrame) -> Result<Self, LoaderError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|required| !names.iter().any(|n| n == *required))
        {
            return Err(LoaderError::MissingColumn(missing.to_string()));
        }

        let df = df
            .lazy()
            .with_columns([
                col(COL_LABEL).cast(DataType::String),
                col(COL_REGION).cast(DataType::String),
                col(COL_YEAR).cast(DataType::Int64),
                col(COL_VALUE).cast(DataType::Float64),
            ])
            .collect()?;

        Ok(Self { df })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Distinct indicator labels in order of first appearance, nulls and blanks dropped.
    pub fn indicator_options(&self) -> Vec<String> {
        let Ok(labels) = self.df.column(COL_LABEL).and_then(|c| c.str()) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        labels
            .into_iter()
            .flatten()
            .filter(|label| !label.trim().is_empty())
            .filter(|label| seen.insert(*label))
            .map(str::to_string)
            .collect()
    }

    /// Indicator options, or `NoIndicators` if there are none.
    pub fn require_indicators(&self) -> Result<Vec<String>, LoaderError> {
        let options = self.indicator_options();
        if options.is_empty() {
            Err(LoaderError::NoIndicators)
        } else {
            Ok(options)
        }
    }

    /// Sorted distinct municipality names.
    pub fn regions(&self) -> Vec<String> {
        self.df
            .column(COL_REGION)
            .and_then(|c| c.str())
            .map(|regions| {
                regions
                    .into_iter()
                    .flatten()
                    .map(str::to_string)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_semicolon_delimited_file() {
        let file = write_csv(
            "label;jaar;waarde;statnaam\n\
             Werkloosheid;2021;4.1;Groningen\n\
             Werkloosheid;2022;3.8;Groningen\n\
             Overgewicht;2022;51.0;Assen\n",
        );
        let table = IndicatorLoader::load_csv(file.path(), &CsvOptions::default()).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.indicator_options(), vec!["Werkloosheid", "Overgewicht"]);
        assert_eq!(table.regions(), vec!["Assen", "Groningen"]);
        assert_eq!(
            table.dataframe().column(COL_YEAR).unwrap().dtype(),
            &DataType::Int64
        );
    }

    #[test]
    fn decimal_comma_values_parse() {
        let file = write_csv(
            "label;jaar;waarde;statnaam\n\
             Werkloosheid;2021;4,5;Groningen\n",
        );
        let options = CsvOptions {
            separator: b';',
            decimal_comma: true,
        };
        let table = IndicatorLoader::load_csv(file.path(), &options).unwrap();
        let values = table.dataframe().column(COL_VALUE).unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(4.5));
    }

    #[test]
    fn missing_label_column_is_reported() {
        let file = write_csv("indicator;jaar;waarde;statnaam\nX;2021;1;Assen\n");
        let err = IndicatorLoader::load_csv(file.path(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "label"));
    }

    #[test]
    fn options_skip_nulls_and_blanks() {
        let df = df!(
            "label" => [Some("A"), None, Some(" "), Some("B"), Some("A")],
            "jaar" => [2020i64, 2020, 2020, 2020, 2021],
            "waarde" => [1.0, 2.0, 3.0, 4.0, 5.0],
            "statnaam" => ["X", "X", "X", "X", "X"],
        )
        .unwrap();
        let table = IndicatorTable::from_dataframe(df).unwrap();
        assert_eq!(table.indicator_options(), vec!["A", "B"]);
    }

    #[test]
    fn no_indicators_is_an_error() {
        let df = df!(
            "label" => [None::<&str>, None],
            "jaar" => [2020i64, 2021],
            "waarde" => [1.0, 2.0],
            "statnaam" => ["X", "Y"],
        )
        .unwrap();
        let table = IndicatorTable::from_dataframe(df).unwrap();
        assert!(matches!(
            table.require_indicators(),
            Err(LoaderError::NoIndicators)
        ));
    }

    #[test]
    fn unparseable_years_become_null() {
        let df = df!(
            "label" => ["A", "A"],
            "jaar" => ["2021", "onbekend"],
            "waarde" => ["1.5", "x"],
            "statnaam" => ["X", "Y"],
        )
        .unwrap();
        let table = IndicatorTable::from_dataframe(df).unwrap();
        let years = table.dataframe().column(COL_YEAR).unwrap().i64().unwrap();
        assert_eq!(years.get(0), Some(2021));
        assert_eq!(years.get(1), None);
        let values = table.dataframe().column(COL_VALUE).unwrap().f64().unwrap();
        assert_eq!(values.get(1), None);
    }
}
