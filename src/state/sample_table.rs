use serde::{Deserialize, Serialize};

use crate::data::loader::{parse_cell, LoadedData};
use crate::processing::grain_size::{GrainSizePoint, InvalidInput, Sample};

/// One editable row of the manual-entry grid. Cells hold raw text so a
/// half-typed number never gets rewritten under the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRow {
    pub grain_size: String,
    pub weight_percent: String,
}

impl SampleRow {
    pub fn new(grain_size: impl Into<String>, weight_percent: impl Into<String>) -> Self {
        Self {
            grain_size: grain_size.into(),
            weight_percent: weight_percent.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.grain_size.trim().is_empty() && self.weight_percent.trim().is_empty()
    }
}

/// Manual-entry table for one sediment sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTable {
    pub rows: Vec<SampleRow>,
}

impl Default for SampleTable {
    /// A worked sieve analysis, one row per phi class from -1 to 4.
    fn default() -> Self {
        Self {
            rows: vec![
                SampleRow::new("2.0", "5"),
                SampleRow::new("1.0", "15"),
                SampleRow::new("0.5", "25"),
                SampleRow::new("0.25", "35"),
                SampleRow::new("0.125", "15"),
                SampleRow::new("0.0625", "5"),
            ],
        }
    }
}

impl SampleTable {
    pub fn add_row(&mut self) {
        self.rows.push(SampleRow::default());
    }

    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// Reset to the worked example.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Rows that carry data.
    pub fn filled_rows(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_blank()).count()
    }

    /// Parse the grid into a sample. Blank rows are skipped; any other bad
    /// cell is reported with its 1-based row number in the grid.
    pub fn to_sample(&self) -> Result<Sample, InvalidInput> {
        let mut points = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            points.push(GrainSizePoint::new(
                parse_cell(&row.grain_size, i + 1, "grain size")?,
                parse_cell(&row.weight_percent, i + 1, "weight")?,
            ));
        }
        Ok(Sample::new(points))
    }

    /// Copy two columns of a loaded file into the grid for review/editing.
    pub fn from_loaded(loaded: &LoadedData, size_col: usize, weight_col: usize) -> Self {
        let empty = Vec::new();
        let sizes = loaded.column_data.get(size_col).unwrap_or(&empty);
        let weights = loaded.column_data.get(weight_col).unwrap_or(&empty);
        let rows = (0..loaded.row_count)
            .map(|r| {
                SampleRow::new(
                    sizes.get(r).map(|s| s.trim()).unwrap_or(""),
                    weights.get(r).map(|s| s.trim()).unwrap_or(""),
                )
            })
            .filter(|row| !row.is_blank())
            .collect();
        Self { rows }
    }

    /// Grid contents from a computed sample.
    pub fn from_sample(sample: &Sample) -> Self {
        Self {
            rows: sample
                .points()
                .iter()
                .map(|p| SampleRow::new(p.grain_size_mm.to_string(), p.weight_percent.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv_text;
    use crate::processing::grain_size::compute_folk_ward;

    #[test]
    fn default_table_is_a_valid_sample() {
        let sample = SampleTable::default().to_sample().unwrap();
        assert_eq!(sample.len(), 6);
        assert!(compute_folk_ward(&sample).is_ok());
    }

    #[test]
    fn blank_rows_are_skipped() {
        let mut table = SampleTable::default();
        table.add_row();
        table.rows.insert(2, SampleRow::new("  ", ""));
        assert_eq!(table.filled_rows(), 6);
        assert_eq!(table.to_sample().unwrap().len(), 6);
    }

    #[test]
    fn bad_cell_names_its_row() {
        let mut table = SampleTable::default();
        table.rows[3].weight_percent = "35%".into();
        let err = table.to_sample().unwrap_err();
        assert_eq!(
            err.to_string(),
            "row 4: weight \"35%\" is not a number"
        );

        table.rows[3].weight_percent.clear();
        assert!(matches!(
            table.to_sample().unwrap_err(),
            InvalidInput::Unparsable { row: 4, .. }
        ));
    }

    #[test]
    fn clear_restores_example_and_remove_is_bounded() {
        let mut table = SampleTable { rows: Vec::new() };
        table.remove_row(3);
        assert!(table.rows.is_empty());
        table.add_row();
        table.clear();
        assert_eq!(table, SampleTable::default());
        table.remove_row(0);
        assert_eq!(table.rows[0], SampleRow::new("1.0", "15"));
    }

    #[test]
    fn copies_loaded_columns() {
        let loaded = parse_csv_text("Weight,Size\n40,1.0\n,\n60,0.5\n").unwrap();
        let table = SampleTable::from_loaded(&loaded, 1, 0);
        assert_eq!(
            table.rows,
            vec![SampleRow::new("1.0", "40"), SampleRow::new("0.5", "60")]
        );
    }

    #[test]
    fn round_trips_through_sample() {
        let sample = Sample::from_pairs([(0.5, 12.5), (0.25, 87.5)]);
        let table = SampleTable::from_sample(&sample);
        assert_eq!(table.to_sample().unwrap(), sample);
    }
}
