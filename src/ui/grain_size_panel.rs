use egui_plot::{HLine, Legend, Line, LineStyle, Plot, PlotPoints, Points, VLine};

use crate::data::columns::{ColumnAliases, Field};
use crate::processing::classification::Descriptors;
use crate::processing::grain_size::{FolkWardStatistics, GrainSizeAnalysis, PhiPercentiles};
use crate::processing::statistics::ColumnSummary;
use crate::state::app_state::{AnalysisView, AppState, InputMode};
use crate::state::theme::Theme;

/// Actions that the panel can request from the parent.
pub enum PanelAction {
    None,
    /// The applied table changed; results must be rebuilt.
    Applied,
    OpenFile,
    ExportCsv,
    ExportImageSave,
    ExportImageClipboard,
}

/// Transient widget state owned by the app, not saved in projects.
#[derive(Default)]
pub struct PanelState {
    /// Screen rect of the plot (set each frame for screenshot cropping).
    pub last_plot_rect: Option<egui::Rect>,
    /// Alias lists as comma-separated text while being edited.
    alias_text: Option<[String; 2]>,
}

/// Helper to create a toolbar button with consistent min size.
fn toolbar_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(6.0);
    ui.label(egui::RichText::new(text).strong().size(16.0));
    ui.add_space(2.0);
}

/// Render the grain-size panel. Returns an action if the user asked for
/// something the parent owns (dialogs, exports, recomputation).
pub fn show_grain_size_panel(
    state: &mut AppState,
    panel: &mut PanelState,
    view: &AnalysisView,
    ui: &mut egui::Ui,
) -> PanelAction {
    let mut action = PanelAction::None;
    let theme = state.theme;

    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(10))
        .corner_radius(egui::CornerRadius::same(8))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Grain Size Analysis").heading());
                ui.label(egui::RichText::new("Folk & Ward method").weak());
            });
            ui.horizontal(|ui| {
                ui.label("Sample:");
                ui.add(egui::TextEdit::singleline(&mut state.sample_name).desired_width(240.0));
            });

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                for mode in [InputMode::Manual, InputMode::Upload] {
                    ui.selectable_value(&mut state.input_mode, mode, mode.label());
                }
            });
            ui.separator();

            let input_action = match state.input_mode {
                InputMode::Manual => show_manual_entry(state, ui),
                InputMode::Upload => show_upload(state, panel, ui),
            };
            if !matches!(input_action, PanelAction::None) {
                action = input_action;
            }

            ui.separator();
            section_heading(ui, "Data Summary");
            show_summary(ui, view.size_summary.as_ref(), view.weight_summary.as_ref());

            ui.separator();
            match &view.analysis {
                Ok(analysis) => {
                    let result_action = show_results(state, panel, analysis, &theme, ui);
                    if !matches!(result_action, PanelAction::None) {
                        action = result_action;
                    }
                }
                Err(e) => {
                    panel.last_plot_rect = None;
                    section_heading(ui, "Folk & Ward Parameters");
                    ui.colored_label(theme.error_color(), e.to_string());
                }
            }
        });

    action
}

fn show_manual_entry(state: &mut AppState, ui: &mut egui::Ui) -> PanelAction {
    use egui_extras::{Column, TableBuilder};

    let mut action = PanelAction::None;
    let mut remove_row: Option<usize> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .vscroll(true)
        .max_scroll_height(260.0)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(36.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::exact(30.0))
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong(Field::GrainSize.label());
            });
            header.col(|ui| {
                ui.strong(Field::WeightPercent.label());
            });
            header.col(|_| {});
        })
        .body(|mut body| {
            for (i, row) in state.table.rows.iter_mut().enumerate() {
                body.row(26.0, |mut table_row| {
                    table_row.col(|ui| {
                        ui.label(egui::RichText::new(format!("{}", i + 1)).weak());
                    });
                    table_row.col(|ui| {
                        ui.add(egui::TextEdit::singleline(&mut row.grain_size).desired_width(130.0));
                    });
                    table_row.col(|ui| {
                        ui.add(egui::TextEdit::singleline(&mut row.weight_percent).desired_width(130.0));
                    });
                    table_row.col(|ui| {
                        if ui.small_button("x").on_hover_text("Remove row").clicked() {
                            remove_row = Some(i);
                        }
                    });
                });
            }
        });

    if let Some(i) = remove_row {
        state.table.remove_row(i);
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        if toolbar_btn(ui, "+ Add Row").clicked() {
            state.table.add_row();
        }
        if toolbar_btn(ui, "Clear All").on_hover_text("Reset to the example sample").clicked() {
            state.clear_table();
            tracing::info!("Sample table cleared");
            action = PanelAction::Applied;
        }
        let pending = state.has_unapplied_edits();
        let apply = ui.add_enabled(
            pending,
            egui::Button::new(egui::RichText::new("Apply Data").strong()).min_size(egui::vec2(0.0, 26.0)),
        );
        if apply.clicked() {
            state.apply_table();
            tracing::info!("Applied {} rows", state.applied.filled_rows());
            action = PanelAction::Applied;
        }
        if pending {
            ui.label(egui::RichText::new("Unapplied edits").weak());
        }
    });

    action
}

fn show_upload(state: &mut AppState, panel: &mut PanelState, ui: &mut egui::Ui) -> PanelAction {
    let mut action = PanelAction::None;

    ui.horizontal(|ui| {
        if toolbar_btn(ui, "Choose File...").on_hover_text("Import CSV or Excel file").clicked() {
            action = PanelAction::OpenFile;
        }
        ui.label(egui::RichText::new("or drop a CSV / Excel file onto the window").weak());
    });
    ui.label(
        egui::RichText::new(format!(
            "Applied sample: {} rows",
            state.applied.filled_rows()
        ))
        .weak(),
    );

    egui::CollapsingHeader::new("Column Aliases")
        .default_open(false)
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new("Accepted header names, comma separated. Matching ignores case only.")
                    .weak(),
            );
            let text = panel.alias_text.get_or_insert_with(|| {
                [
                    state.aliases.format_list(Field::GrainSize),
                    state.aliases.format_list(Field::WeightPercent),
                ]
            });
            egui::Grid::new("alias_grid").num_columns(2).show(ui, |ui| {
                for (field, buf) in Field::ALL.iter().zip(text.iter_mut()) {
                    ui.label(field.label());
                    if ui.add(egui::TextEdit::singleline(buf).desired_width(320.0)).changed() {
                        *state.aliases.aliases_mut(*field) = ColumnAliases::parse_list(buf);
                    }
                    ui.end_row();
                }
            });
            if ui.small_button("Restore defaults").clicked() {
                state.aliases = ColumnAliases::default();
                panel.alias_text = None;
            }
        });

    action
}

/// Forget cached alias text, e.g. after a project load.
pub fn reset_panel_state(panel: &mut PanelState) {
    panel.alias_text = None;
    panel.last_plot_rect = None;
}

fn show_summary(ui: &mut egui::Ui, size: Option<&ColumnSummary>, weight: Option<&ColumnSummary>) {
    let (Some(size), Some(weight)) = (size, weight) else {
        ui.label(egui::RichText::new("No valid data applied.").weak());
        return;
    };

    egui::Grid::new("summary_grid")
        .num_columns(3)
        .striped(true)
        .spacing(egui::vec2(24.0, 4.0))
        .show(ui, |ui| {
            ui.label("");
            ui.strong(Field::GrainSize.label());
            ui.strong(Field::WeightPercent.label());
            ui.end_row();
            for ((label, s), (_, w)) in size.rows().into_iter().zip(weight.rows()) {
                ui.label(label);
                ui.monospace(s);
                ui.monospace(w);
                ui.end_row();
            }
        });
}

fn show_statistics(ui: &mut egui::Ui, stats: &FolkWardStatistics) {
    let d = Descriptors::describe(stats);
    egui::Grid::new("folk_ward_grid")
        .num_columns(3)
        .striped(true)
        .spacing(egui::vec2(24.0, 4.0))
        .show(ui, |ui| {
            ui.label("Mean (Mz)");
            ui.monospace(format!("{:.2}", stats.mean));
            ui.label(d.mean);
            ui.end_row();

            ui.label("Sorting (\u{03C3})");
            ui.monospace(format!("{:.2}", stats.sorting));
            ui.label(d.sorting);
            ui.end_row();

            ui.label("Skewness (Sk)");
            ui.monospace(format!("{:.2}", stats.skewness));
            ui.label(d.skewness);
            ui.end_row();

            ui.label("Kurtosis (Kg)");
            match (stats.kurtosis, d.kurtosis) {
                (Some(k), Some(class)) => {
                    ui.monospace(format!("{k:.2}"));
                    ui.label(class);
                }
                _ => {
                    ui.monospace("-");
                    ui.label(egui::RichText::new("phi25 = phi75").weak());
                }
            }
            ui.end_row();
        });

    ui.add_space(4.0);
    ui.horizontal_wrapped(|ui| {
        for (level, phi) in stats.percentiles.as_pairs() {
            ui.label(egui::RichText::new(format!("\u{03C6}{level}: {phi:.2}")).weak());
        }
    });
}

fn show_results(
    state: &mut AppState,
    panel: &mut PanelState,
    analysis: &GrainSizeAnalysis,
    theme: &Theme,
    ui: &mut egui::Ui,
) -> PanelAction {
    let mut action = PanelAction::None;

    section_heading(ui, "Folk & Ward Parameters");
    show_statistics(ui, &analysis.statistics);

    ui.add_space(6.0);
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        if toolbar_btn(ui, "Export CSV").on_hover_text("Save curve and statistics").clicked() {
            action = PanelAction::ExportCsv;
        }
        if toolbar_btn(ui, "Save PNG").on_hover_text("Save the plot as an image").clicked() {
            action = PanelAction::ExportImageSave;
        }
        if toolbar_btn(ui, "Copy Image").on_hover_text("Copy the plot to the clipboard").clicked() {
            action = PanelAction::ExportImageClipboard;
        }
        ui.separator();
        ui.checkbox(&mut state.show_percentile_guides, "Percentile guides");
    });

    section_heading(ui, "Cumulative Grain Size Distribution");
    let points = analysis.distribution.curve_points();
    let guides = if state.show_percentile_guides {
        Some(analysis.statistics.percentiles)
    } else {
        None
    };

    let response = Plot::new("cumulative_curve")
        .height(360.0)
        .legend(Legend::default())
        .x_axis_label("Phi scale (\u{03C6})")
        .y_axis_label("Cumulative weight (%)")
        .include_y(0.0)
        .include_y(100.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(theme.curve_color())
                    .width(2.0)
                    .name("Cumulative %"),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(theme.curve_color())
                    .radius(4.0),
            );
            if let Some(p) = guides {
                draw_percentile_guides(plot_ui, &p, theme);
            }
        })
        .response;

    panel.last_plot_rect = Some(response.rect);
    action
}

fn draw_percentile_guides(plot_ui: &mut egui_plot::PlotUi, p: &PhiPercentiles, theme: &Theme) {
    // Quartiles only feed kurtosis; guides mark the five Folk & Ward levels.
    for (level, phi) in p.as_pairs() {
        if level == 25.0 || level == 75.0 {
            continue;
        }
        plot_ui.hline(
            HLine::new(level)
                .color(theme.guide_color())
                .style(LineStyle::dashed_loose()),
        );
        plot_ui.vline(
            VLine::new(phi)
                .color(theme.guide_color())
                .style(LineStyle::dashed_loose()),
        );
    }
}
