use crate::data::columns::{ColumnAliases, Field};
use crate::data::loader::LoadedData;

/// Minimum share of numeric cells for a column to be offered.
const NUMERIC_THRESHOLD: f64 = 0.5;

/// State for the column mapping dialog, created when a file has been loaded
/// and the user needs to confirm which columns hold grain size and weight.
pub struct ColumnMappingState {
    pub loaded_data: LoadedData,
    pub file_name: String,
    /// Indices into `usable_columns`.
    pub selected_size: usize,
    pub selected_weight: usize,
    pub usable_columns: Vec<usize>,
    /// Whether the alias table matched both fields.
    pub auto_resolved: bool,
}

impl ColumnMappingState {
    pub fn new(loaded_data: LoadedData, file_name: String, aliases: &ColumnAliases) -> Self {
        let usable_columns: Vec<usize> = (0..loaded_data.columns.len())
            .filter(|&i| loaded_data.numeric_fraction(i) >= NUMERIC_THRESHOLD)
            .collect();

        // Fall back to all columns if none pass the filter.
        let usable = if usable_columns.is_empty() {
            (0..loaded_data.columns.len()).collect()
        } else {
            usable_columns
        };

        let resolved = aliases.resolve(&loaded_data.columns);
        let position = |col: Option<usize>| col.and_then(|c| usable.iter().position(|&u| u == c));
        let size_pos = position(resolved.grain_size);
        let weight_pos = position(resolved.weight_percent);

        Self {
            auto_resolved: size_pos.is_some() && weight_pos.is_some(),
            selected_size: size_pos.unwrap_or(0),
            selected_weight: weight_pos.unwrap_or(if usable.len() > 1 { 1 } else { 0 }),
            usable_columns: usable,
            loaded_data,
            file_name,
        }
    }

    fn column_name(&self, usable_idx: usize) -> &str {
        self.usable_columns
            .get(usable_idx)
            .and_then(|&c| self.loaded_data.columns.get(c))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    /// The chosen (size, weight) column indices into the loaded data.
    pub fn selection(&self) -> Option<ColumnSelection> {
        let size_col = *self.usable_columns.get(self.selected_size)?;
        let weight_col = *self.usable_columns.get(self.selected_weight)?;
        if size_col == weight_col {
            return None;
        }
        Some(ColumnSelection { size_col, weight_col })
    }
}

/// The columns the user selected from the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub size_col: usize,
    pub weight_col: usize,
}

/// Result of the column mapping dialog interaction each frame.
pub enum DialogResult {
    Ok(ColumnSelection),
    Cancel,
}

fn column_selector(ui: &mut egui::Ui, id: &str, state_idx: &mut usize, names: &[String]) {
    let current = names.get(*state_idx).cloned().unwrap_or_default();
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(300.0)
        .show_ui(ui, |ui| {
            for (i, name) in names.iter().enumerate() {
                ui.selectable_value(state_idx, i, name);
            }
        });
}

/// Show the column mapping dialog as an egui window.
///
/// Returns `Some(DialogResult)` when the user presses OK or Cancel,
/// or `None` while the dialog is still open.
pub fn show_column_mapping_dialog(
    ctx: &egui::Context,
    state: &mut ColumnMappingState,
) -> Option<DialogResult> {
    let mut result = None;
    let names: Vec<String> = (0..state.usable_columns.len())
        .map(|i| state.column_name(i).to_string())
        .collect();

    egui::Window::new("Select Grain-Size Columns")
        .collapsible(false)
        .resizable(true)
        .default_width(440.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!(
                "{} has {} columns and {} rows.",
                state.file_name,
                state.loaded_data.columns.len(),
                state.loaded_data.row_count,
            )).weak());
            if !state.auto_resolved {
                ui.label(
                    egui::RichText::new("Headers did not match the alias table; pick the columns by hand.")
                        .weak(),
                );
            }

            ui.add_space(12.0);
            ui.label(egui::RichText::new(Field::GrainSize.label()).strong());
            column_selector(ui, "size_column_selector", &mut state.selected_size, &names);

            ui.add_space(8.0);
            ui.label(egui::RichText::new(Field::WeightPercent.label()).strong());
            column_selector(ui, "weight_column_selector", &mut state.selected_weight, &names);

            ui.add_space(16.0);
            let selection = state.selection();
            ui.horizontal(|ui| {
                let ok_btn = ui.add_enabled(
                    selection.is_some(),
                    egui::Button::new(egui::RichText::new("OK").strong())
                        .min_size(egui::vec2(100.0, 32.0)),
                );
                if ok_btn.clicked() {
                    if let Some(sel) = selection {
                        result = Some(DialogResult::Ok(sel));
                    }
                }

                if ui.add(egui::Button::new("Cancel").min_size(egui::vec2(100.0, 32.0))).clicked() {
                    result = Some(DialogResult::Cancel);
                }

                if selection.is_none() {
                    ui.label(egui::RichText::new("Choose two different columns").weak());
                }
            });
        });

    result
}
