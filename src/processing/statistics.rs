/// Descriptive summary of one numeric input column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    /// Cells that were blank or not numbers.
    pub missing: usize,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub sum: f64,
}

impl ColumnSummary {
    /// Summarise the finite values of a column. `None` if there are none.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let missing = values.len() - count;
        vals.sort_by(f64::total_cmp);

        let min = vals[0];
        let max = vals[count - 1];
        let sum: f64 = vals.iter().sum();
        let mean = sum / count as f64;
        let median = if count % 2 == 0 {
            (vals[count / 2 - 1] + vals[count / 2]) / 2.0
        } else {
            vals[count / 2]
        };

        // Population variance.
        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            missing,
            min,
            max,
            range: max - min,
            mean,
            median,
            std_dev: variance.sqrt(),
            sum,
        })
    }

    /// (label, formatted value) rows for a summary grid.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Count", self.count.to_string()),
            ("Missing", self.missing.to_string()),
            ("Min", format!("{:.3}", self.min)),
            ("Max", format!("{:.3}", self.max)),
            ("Range", format!("{:.3}", self.range)),
            ("Mean", format!("{:.3}", self.mean)),
            ("Median", format!("{:.3}", self.median)),
            ("Std Dev", format!("{:.3}", self.std_dev)),
            ("Sum", format!("{:.3}", self.sum)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarises_weights() {
        let s = ColumnSummary::compute(&[5.0, 15.0, 25.0, 35.0, 15.0, 5.0]).unwrap();
        assert_eq!(s.count, 6);
        assert_eq!(s.missing, 0);
        assert_eq!(s.min, 5.0);
        assert_eq!(s.max, 35.0);
        assert_eq!(s.range, 30.0);
        assert_eq!(s.sum, 100.0);
        assert_eq!(s.median, 15.0);
        assert!((s.mean - 100.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn skips_non_finite_cells() {
        let s = ColumnSummary::compute(&[1.0, f64::NAN, 3.0, f64::INFINITY]).unwrap();
        assert_eq!(s.count, 2);
        assert_eq!(s.missing, 2);
        assert_eq!(s.median, 2.0);
        assert_eq!(s.std_dev, 1.0);
    }

    #[test]
    fn empty_column_has_no_summary() {
        assert!(ColumnSummary::compute(&[]).is_none());
        assert!(ColumnSummary::compute(&[f64::NAN]).is_none());
    }

    #[test]
    fn rows_are_formatted() {
        let s = ColumnSummary::compute(&[0.5, 0.25]).unwrap();
        let rows = s.rows();
        assert_eq!(rows[0], ("Count", "2".to_string()));
        assert_eq!(rows[5], ("Mean", "0.375".to_string()));
    }
}
