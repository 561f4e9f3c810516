use serde::{Deserialize, Serialize};

use crate::data::columns::ColumnAliases;
use crate::processing::grain_size::{compute_folk_ward, GrainSizeAnalysis, GrainSizeError};
use crate::processing::statistics::ColumnSummary;
use crate::state::sample_table::SampleTable;
use crate::state::theme::Theme;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extension used for saved projects.
pub const PROJECT_EXTENSION: &str = "ecogeo";

/// Where the sample comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Manual,
    Upload,
}

impl InputMode {
    pub fn label(&self) -> &'static str {
        match self {
            InputMode::Manual => "Manual Entry",
            InputMode::Upload => "Upload CSV/Excel",
        }
    }
}

/// Everything saved in a project file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    /// Specimen name, used for export file names.
    pub sample_name: String,
    pub input_mode: InputMode,
    /// Table being edited.
    pub table: SampleTable,
    /// Table the current analysis was computed from. Edits only take effect
    /// once applied.
    pub applied: SampleTable,
    pub aliases: ColumnAliases,
    pub show_percentile_guides: bool,
    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            sample_name: "Sample 1".to_string(),
            input_mode: InputMode::default(),
            table: SampleTable::default(),
            applied: SampleTable::default(),
            aliases: ColumnAliases::default(),
            show_percentile_guides: true,
            theme: Theme::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit the edited table.
    pub fn apply_table(&mut self) {
        self.applied = self.table.clone();
    }

    /// Reset both tables to the worked example.
    pub fn clear_table(&mut self) {
        self.table.clear();
        self.applied.clear();
    }

    /// Replace the table with imported rows and apply them.
    pub fn import_table(&mut self, table: SampleTable) {
        self.table = table;
        self.apply_table();
    }

    pub fn has_unapplied_edits(&self) -> bool {
        self.table != self.applied
    }

    /// Run the analysis on the applied table.
    pub fn analyze(&self) -> Result<GrainSizeAnalysis, GrainSizeError> {
        let sample = self.applied.to_sample()?;
        compute_folk_ward(&sample)
    }

    /// File-name stem derived from the sample name.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .sample_name
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        if stem.is_empty() {
            "grain_size".to_string()
        } else {
            stem
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Derived results shown by the panel. Rebuilt whenever the applied table
/// changes; never saved.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub analysis: Result<GrainSizeAnalysis, GrainSizeError>,
    pub size_summary: Option<ColumnSummary>,
    pub weight_summary: Option<ColumnSummary>,
}

impl AnalysisView {
    pub fn build(state: &AppState) -> Self {
        let (size_summary, weight_summary) = match state.applied.to_sample() {
            Ok(sample) => (
                ColumnSummary::compute(&sample.grain_sizes()),
                ColumnSummary::compute(&sample.weights()),
            ),
            Err(_) => (None, None),
        };
        let analysis = state.analyze();
        if let Err(e) = &analysis {
            tracing::warn!("Grain-size analysis failed: {e}");
        }
        Self {
            analysis,
            size_summary,
            weight_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::grain_size::InvalidInput;
    use crate::state::sample_table::SampleRow;

    #[test]
    fn default_state_analyzes() {
        let state = AppState::new();
        let analysis = state.analyze().unwrap();
        assert_eq!(analysis.distribution.len(), 6);
    }

    #[test]
    fn edits_apply_only_on_demand() {
        let mut state = AppState::new();
        state.table.rows[0].grain_size = "0".into();
        assert!(state.has_unapplied_edits());
        assert!(state.analyze().is_ok());

        state.apply_table();
        assert!(!state.has_unapplied_edits());
        assert!(matches!(
            state.analyze().unwrap_err(),
            GrainSizeError::InvalidInput(InvalidInput::NonPositiveGrainSize { row: 1, .. })
        ));

        state.clear_table();
        assert!(state.analyze().is_ok());
    }

    #[test]
    fn unparsable_cell_surfaces_as_invalid_input() {
        let mut state = AppState::new();
        state.import_table(SampleTable {
            rows: vec![SampleRow::new("1.0", "50"), SampleRow::new("abc", "50")],
        });
        assert!(matches!(
            state.analyze().unwrap_err(),
            GrainSizeError::InvalidInput(InvalidInput::Unparsable { row: 2, .. })
        ));
    }

    #[test]
    fn view_summarises_applied_table() {
        let view = AnalysisView::build(&AppState::new());
        assert!(view.analysis.is_ok());
        assert_eq!(view.weight_summary.unwrap().sum, 100.0);
        assert_eq!(view.size_summary.unwrap().max, 2.0);
    }

    #[test]
    fn view_keeps_summary_for_degenerate_sample() {
        let mut state = AppState::new();
        state.import_table(SampleTable {
            rows: vec![SampleRow::new("0.5", "50"), SampleRow::new("0.5", "50")],
        });
        let view = AnalysisView::build(&state);
        assert!(matches!(
            view.analysis,
            Err(GrainSizeError::DegenerateDistribution { .. })
        ));
        assert_eq!(view.size_summary.unwrap().range, 0.0);
    }

    #[test]
    fn project_json_round_trip() {
        let mut state = AppState::new();
        state.sample_name = "BH-3 / 12.4 m".into();
        state.theme = Theme::Dark;
        state.aliases.weight_percent.push("Mass %".into());
        let json = state.to_json().unwrap();
        assert_eq!(AppState::from_json(&json).unwrap(), state);
    }

    #[test]
    fn partial_project_uses_defaults() {
        let state = AppState::from_json(r#"{ "sample_name": "Dune crest" }"#).unwrap();
        assert_eq!(state.sample_name, "Dune crest");
        assert_eq!(state.table, SampleTable::default());
        assert_eq!(state.input_mode, InputMode::Manual);
    }

    #[test]
    fn file_stem_is_sanitised() {
        let mut state = AppState::new();
        state.sample_name = "BH-3 / 12.4 m".into();
        assert_eq!(state.file_stem(), "BH-3___12_4_m");
        state.sample_name = "  ".into();
        assert_eq!(state.file_stem(), "grain_size");
    }
}
