use std::path::Path;

use thiserror::Error;

use crate::data::parser::{self, HEADER_SCAN_ROWS};
use crate::processing::grain_size::{GrainSizePoint, InvalidInput, Sample};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot read workbook: {0}")]
    Excel(#[from] calamine::Error),

    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("no sheets found in workbook")]
    NoSheets,

    #[error("no data found after header detection")]
    NoData,
}

/// A loaded table: header names plus column-major string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    pub columns: Vec<String>,
    /// `column_data[col_idx][row_idx]`
    pub column_data: Vec<Vec<String>>,
    pub row_count: usize,
}

impl LoadedData {
    /// Build from row-major cells, using `header_row` as the column names.
    fn from_rows(all_rows: Vec<Vec<String>>, header_row: usize) -> Result<Self, LoadError> {
        if all_rows.is_empty() || header_row >= all_rows.len() {
            return Err(LoadError::NoData);
        }

        let columns: Vec<String> = all_rows[header_row]
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        let data_rows = &all_rows[header_row + 1..];
        let mut column_data: Vec<Vec<String>> = vec![Vec::with_capacity(data_rows.len()); columns.len()];
        for row in data_rows {
            for (col_idx, col) in column_data.iter_mut().enumerate() {
                col.push(row.get(col_idx).cloned().unwrap_or_default());
            }
        }

        Ok(Self {
            columns,
            column_data,
            row_count: data_rows.len(),
        })
    }

    /// Fraction of cells in a column that parse as finite numbers.
    pub fn numeric_fraction(&self, col: usize) -> f64 {
        self.column_data
            .get(col)
            .map(|cells| column_to_f64(cells).1)
            .unwrap_or(0.0)
    }
}

/// Load a CSV or Excel file and return the header and raw string cells.
pub fn load_file(path: &Path) -> Result<LoadedData, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let loaded = match ext.as_str() {
        "csv" => load_csv(path),
        "xls" | "xlsx" | "xlsm" | "ods" => load_excel(path),
        _ => Err(LoadError::UnsupportedFormat(ext)),
    }?;

    tracing::info!(
        "Loaded {:?}: {} columns, {} rows",
        path,
        loaded.columns.len(),
        loaded.row_count
    );
    Ok(loaded)
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "csv" | "xls" | "xlsx" | "xlsm" | "ods"))
        .unwrap_or(false)
}

fn load_csv(path: &Path) -> Result<LoadedData, LoadError> {
    let content = std::fs::read(path)?;
    parse_csv_text(&parser::decode_text(content))
}

/// Parse delimited text, detecting the header row.
pub fn parse_csv_text(text: &str) -> Result<LoadedData, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => all_rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(e) => tracing::warn!("Skipping malformed CSV record: {e}"),
        }
    }

    let header_row = parser::detect_header_row(&all_rows, HEADER_SCAN_ROWS);
    LoadedData::from_rows(all_rows, header_row)
}

fn load_excel(path: &Path) -> Result<LoadedData, LoadError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoSheets)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let all_rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    Data::String(s) => s.clone(),
                    Data::Float(f) => f.to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Bool(b) => b.to_string(),
                    Data::DateTime(dt) => dt.to_string(),
                    Data::DateTimeIso(s) => s.clone(),
                    Data::DurationIso(s) => s.clone(),
                    Data::Error(e) => format!("{e:?}"),
                })
                .collect()
        })
        .collect();

    let header_row = parser::detect_header_row(&all_rows, HEADER_SCAN_ROWS);
    LoadedData::from_rows(all_rows, header_row)
}

/// Extract numeric f64 values from a string column.
/// Returns (values, fraction_valid) where invalid entries become NaN.
pub fn column_to_f64(data: &[String]) -> (Vec<f64>, f64) {
    let mut values = Vec::with_capacity(data.len());
    let mut valid = 0usize;
    for s in data {
        match s.trim().parse::<f64>() {
            Ok(v) => {
                values.push(v);
                if v.is_finite() {
                    valid += 1;
                }
            }
            Err(_) => values.push(f64::NAN),
        }
    }
    let frac = if data.is_empty() { 0.0 } else { valid as f64 / data.len() as f64 };
    (values, frac)
}

/// Build a sample from two columns of a loaded table.
///
/// Rows where both cells are blank are skipped. Any other cell that is not a
/// number rejects the whole table; rows are reported 1-based, counting data
/// rows below the header.
pub fn sample_from_columns(
    loaded: &LoadedData,
    size_col: usize,
    weight_col: usize,
) -> Result<Sample, InvalidInput> {
    let empty = Vec::new();
    let sizes = loaded.column_data.get(size_col).unwrap_or(&empty);
    let weights = loaded.column_data.get(weight_col).unwrap_or(&empty);

    let mut points = Vec::with_capacity(loaded.row_count);
    for row in 0..loaded.row_count {
        let size = sizes.get(row).map(|s| s.trim()).unwrap_or("");
        let weight = weights.get(row).map(|s| s.trim()).unwrap_or("");
        if size.is_empty() && weight.is_empty() {
            continue;
        }
        points.push(GrainSizePoint::new(
            parse_cell(size, row + 1, "grain size")?,
            parse_cell(weight, row + 1, "weight")?,
        ));
    }

    Ok(Sample::new(points))
}

/// Parse one numeric cell, naming the row and field on failure.
pub fn parse_cell(cell: &str, row: usize, field: &str) -> Result<f64, InvalidInput> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput::Unparsable {
            row,
            message: format!("{field} is empty"),
        });
    }
    trimmed.parse::<f64>().map_err(|_| InvalidInput::Unparsable {
        row,
        message: format!("{field} {trimmed:?} is not a number"),
    })
}
