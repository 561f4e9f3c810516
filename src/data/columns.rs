use serde::{Deserialize, Serialize};

/// The two columns the grain-size analysis reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    GrainSize,
    WeightPercent,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::GrainSize, Field::WeightPercent];

    pub fn label(&self) -> &'static str {
        match self {
            Field::GrainSize => "Grain Size (mm)",
            Field::WeightPercent => "Weight (%)",
        }
    }
}

/// Header spellings accepted for each field.
///
/// Matching is exact after trimming and ASCII case-folding. There is no
/// substring or fuzzy matching: a header the table does not list stays
/// unresolved and the user picks the column by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAliases {
    pub grain_size: Vec<String>,
    pub weight_percent: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            grain_size: ["Grain Size (mm)", "Grain Size", "Size (mm)", "Size"]
                .into_iter()
                .map(String::from)
                .collect(),
            weight_percent: ["Weight (%)", "Weight %", "Weight", "Wt%"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Column indices resolved from a header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub grain_size: Option<usize>,
    pub weight_percent: Option<usize>,
}

impl ColumnAliases {
    pub fn aliases(&self, field: Field) -> &[String] {
        match field {
            Field::GrainSize => &self.grain_size,
            Field::WeightPercent => &self.weight_percent,
        }
    }

    pub fn aliases_mut(&mut self, field: Field) -> &mut Vec<String> {
        match field {
            Field::GrainSize => &mut self.grain_size,
            Field::WeightPercent => &mut self.weight_percent,
        }
    }

    /// Index of the first column whose header is an alias of `field`.
    ///
    /// Alias order is priority order: an earlier alias wins over a later one
    /// even if the later one appears further left in the header.
    pub fn find(&self, field: Field, columns: &[String]) -> Option<usize> {
        self.find_excluding(field, columns, None)
    }

    /// Like [`Self::find`], skipping the column `taken`.
    fn find_excluding(&self, field: Field, columns: &[String], taken: Option<usize>) -> Option<usize> {
        self.aliases(field).iter().find_map(|alias| {
            let alias = alias.trim();
            columns
                .iter()
                .enumerate()
                .position(|(i, c)| Some(i) != taken && c.trim().eq_ignore_ascii_case(alias))
        })
    }

    pub fn resolve(&self, columns: &[String]) -> ResolvedColumns {
        let grain_size = self.find(Field::GrainSize, columns);
        // Never map both fields onto the same column.
        let weight_percent = self.find_excluding(Field::WeightPercent, columns, grain_size);
        ResolvedColumns {
            grain_size,
            weight_percent,
        }
    }

    /// Parse a comma-separated alias list as edited in the UI.
    pub fn parse_list(text: &str) -> Vec<String> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn format_list(&self, field: Field) -> String {
        self.aliases(field).join(", ")
    }
}
