//! Data Processor Module
//! Turns a DataFrame into chart records and splits them into animation frames.

use crate::charts::scene::js_number;
use crate::data::loader::is_numeric_dtype;
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unknown column '{0}'")]
    MissingColumn(String),
}

/// Label of the single frame produced when no frame column is chosen.
pub const ALL_FRAME: &str = "all";

/// One CSV cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Numeric value of the cell; text is parsed, anything unparseable is NaN.
    pub fn as_number(&self) -> f64 {
        match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            Cell::Null => f64::NAN,
        }
    }

    /// Text value of the cell; a missing value reads as `undefined`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Number(v) => js_number(*v),
            Cell::Text(s) => s.clone(),
            Cell::Null => "undefined".to_string(),
        }
    }
}

/// One CSV row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub cells: Vec<Cell>,
}

impl Record {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, column: usize) -> &Cell {
        self.cells.get(column).unwrap_or(&Cell::Null)
    }

    pub fn number(&self, column: usize) -> f64 {
        self.cell(column).as_number()
    }

    pub fn text(&self, column: usize) -> String {
        self.cell(column).as_text()
    }
}

/// Column names of a record set, with which ones hold numbers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    names: Vec<String>,
    numeric: Vec<bool>,
}

impl Schema {
    pub fn new(columns: Vec<(String, bool)>) -> Self {
        let (names, numeric) = columns.into_iter().unzip();
        Self { names, numeric }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Column index, or `MissingColumn` naming the column.
    pub fn require(&self, name: &str) -> Result<usize, ProcessorError> {
        self.index_of(name)
            .ok_or_else(|| ProcessorError::MissingColumn(name.to_string()))
    }

    pub fn is_numeric(&self, column: usize) -> bool {
        self.numeric.get(column).copied().unwrap_or(false)
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.names
            .iter()
            .zip(&self.numeric)
            .filter(|(_, numeric)| **numeric)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Records sharing one value of the frame column.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub label: String,
    pub records: Vec<Record>,
}

pub struct DataProcessor;

impl DataProcessor {
    /// Convert every row of `df` into a record, keeping row order.
    pub fn to_records(df: &DataFrame) -> Result<(Schema, Vec<Record>), ProcessorError> {
        let columns = df.get_columns();

        let cells: Vec<Vec<Cell>> = columns
            .par_iter()
            .map(Self::column_cells)
            .collect::<Result<_, _>>()?;

        let schema = Schema::new(
            columns
                .iter()
                .map(|col| (col.name().to_string(), is_numeric_dtype(col.dtype())))
                .collect(),
        );

        let records = (0..df.height())
            .into_par_iter()
            .map(|row| Record::new(cells.iter().map(|col| col[row].clone()).collect()))
            .collect();

        Ok((schema, records))
    }

    fn column_cells(column: &Column) -> Result<Vec<Cell>, ProcessorError> {
        if is_numeric_dtype(column.dtype()) {
            let values = column.cast(&DataType::Float64)?;
            Ok(values
                .f64()?
                .into_iter()
                .map(|v| v.map_or(Cell::Null, Cell::Number))
                .collect())
        } else {
            let values = column.cast(&DataType::String)?;
            Ok(values
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|v| v.map_or(Cell::Null, |s| Cell::Text(s.to_string())))
                .collect())
        }
    }

    /// Group records by the text of `frame_col`.
    ///
    /// Frames are sorted numerically when every label parses as a number and
    /// lexicographically otherwise. Records keep their relative order.
    pub fn split_frames(
        schema: &Schema,
        records: &[Record],
        frame_col: Option<&str>,
    ) -> Result<Vec<Frame>, ProcessorError> {
        let Some(frame_col) = frame_col else {
            return Ok(vec![Frame {
                label: ALL_FRAME.to_string(),
                records: records.to_vec(),
            }]);
        };
        let column = schema.require(frame_col)?;

        let mut order: HashMap<String, usize> = HashMap::new();
        let mut frames: Vec<Frame> = Vec::new();
        for record in records {
            let label = record.text(column);
            let slot = *order.entry(label.clone()).or_insert_with(|| {
                frames.push(Frame {
                    label,
                    records: Vec::new(),
                });
                frames.len() - 1
            });
            frames[slot].records.push(record.clone());
        }

        let numeric: Option<Vec<f64>> = frames
            .iter()
            .map(|f| f.label.trim().parse::<f64>().ok())
            .collect();
        match numeric {
            Some(_) => frames.sort_by(|a, b| {
                let a: f64 = a.label.trim().parse().unwrap_or(f64::NAN);
                let b: f64 = b.label.trim().parse().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }),
            None => frames.sort_by(|a, b| a.label.cmp(&b.label)),
        }

        log::debug!("Split {} records into {} frames by '{}'", records.len(), frames.len(), frame_col);
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_df() -> DataFrame {
        df![
            "name" => ["A", "B", "A", "B", "C"],
            "year" => [1810i64, 1810, 1800, 1800, 1900],
            "income" => [Some(1.5), Some(2.0), None, Some(4.0), Some(8.0)],
        ]
        .unwrap()
    }

    #[test]
    fn converts_rows_in_order() {
        let (schema, records) = DataProcessor::to_records(&frame_df()).unwrap();

        assert_eq!(schema.names(), &["name", "year", "income"]);
        assert_eq!(schema.numeric_columns(), vec!["year", "income"]);
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].cells[0], Cell::Text("A".into()));
        assert_eq!(records[0].number(1), 1810.0);
        assert_eq!(records[2].cells[2], Cell::Null);
        assert!(records[2].number(2).is_nan());
        assert_eq!(records[4].text(2), "8");
    }

    #[test]
    fn cells_follow_loose_number_rules() {
        assert_eq!(Cell::Text(" 12.5 ".into()).as_number(), 12.5);
        assert!(Cell::Text("abc".into()).as_number().is_nan());
        assert_eq!(Cell::Null.as_text(), "undefined");
        assert_eq!(Cell::Number(0.5).as_text(), "0.5");
        assert_eq!(Record::default().cell(3), &Cell::Null);
    }

    #[test]
    fn frames_sort_numerically() {
        let (schema, records) = DataProcessor::to_records(&frame_df()).unwrap();
        let frames = DataProcessor::split_frames(&schema, &records, Some("year")).unwrap();

        let labels: Vec<_> = frames.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["1800", "1810", "1900"]);
        assert_eq!(frames[0].records.len(), 2);
        assert_eq!(frames[0].records[0].text(0), "A");
    }

    #[test]
    fn frames_fall_back_to_text_order() {
        let (schema, records) = DataProcessor::to_records(&frame_df()).unwrap();
        let frames = DataProcessor::split_frames(&schema, &records, Some("name")).unwrap();
        let labels: Vec<_> = frames.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
    }

    #[test]
    fn no_frame_column_gives_one_frame() {
        let (schema, records) = DataProcessor::to_records(&frame_df()).unwrap();
        let frames = DataProcessor::split_frames(&schema, &records, None).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].label, ALL_FRAME);
        assert_eq!(frames[0].records, records);

        let err = DataProcessor::split_frames(&schema, &records, Some("nope")).unwrap_err();
        assert!(matches!(err, ProcessorError::MissingColumn(c) if c == "nope"));
    }
}
