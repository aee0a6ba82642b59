//! CSV Data Loader Module
//! Reads CSV files into a polars DataFrame and answers column questions.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// Rows sampled when inferring column types.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Whether a polars dtype holds plain numbers.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Holds the DataFrame of the most recently loaded CSV file.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file. Malformed cells become nulls instead of failing the load.
    pub fn load_csv(&mut self, file_path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let file_path = file_path.as_ref();
        log::info!("Loading CSV {}", file_path.display());

        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        if df.width() == 0 {
            return Err(LoaderError::NoData);
        }
        log::info!("Loaded {} rows x {} columns", df.height(), df.width());

        self.file_path = Some(file_path.to_path_buf());
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Names of columns that can drive x, y or radius.
    pub fn get_numeric_columns(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Distinct non-null values of a column, in first-seen order.
    pub fn get_unique_values(&self, column: &str) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.column(column)
            .ok()
            .and_then(|col| col.as_materialized_series().unique_stable().ok())
            .map(|series| {
                (0..series.len())
                    .filter_map(|i| {
                        let val = series.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Install a DataFrame loaded elsewhere (the viewer loads on a worker thread).
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: Option<PathBuf>) {
        self.df = Some(df);
        self.file_path = file_path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_columns_and_types() {
        let file = write_csv("name,region,income,life\nA,Asia,100.5,60\nB,Europe,2000,75\nC,Asia,,70\n");
        let mut loader = DataLoader::new();
        loader.load_csv(file.path()).unwrap();

        assert_eq!(loader.get_row_count(), 3);
        assert_eq!(loader.get_columns(), vec!["name", "region", "income", "life"]);
        assert_eq!(loader.get_numeric_columns(), vec!["income", "life"]);
        assert_eq!(loader.get_unique_values("region"), vec!["Asia", "Europe"]);
        assert_eq!(loader.get_file_path().map(|p| p.as_path()), Some(file.path()));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut loader = DataLoader::new();
        assert!(loader.load_csv("/definitely/not/here.csv").is_err());
        assert!(loader.get_dataframe().is_none());
        assert!(loader.get_columns().is_empty());
    }
}
