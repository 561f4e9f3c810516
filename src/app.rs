use eframe::egui;
use crate::state::app_state::{AnalysisView, AppState, InputMode, PROJECT_EXTENSION, VERSION};
use crate::state::sample_table::SampleTable;
use crate::ui::column_mapping_dialog::{self, ColumnMappingState, ColumnSelection, DialogResult};
use crate::ui::grain_size_panel::{self, PanelAction, PanelState};
use crate::data::{export, loader};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// What to do when a screenshot arrives.
enum PendingScreenshot {
    SaveFile,
    Clipboard,
}

/// Pending async file load result.
struct PendingLoad {
    file_name: String,
    result: Arc<Mutex<Option<Result<loader::LoadedData, String>>>>,
}

/// The main EcoGeo Lab application.
pub struct EcoGeoApp {
    pub state: AppState,
    /// Results for `state.applied`; rebuilt by `refresh`.
    view: AnalysisView,
    panel: PanelState,
    /// Active column mapping dialog (shown after a file is loaded).
    column_mapping: Option<ColumnMappingState>,
    /// An error message shown in the footer until dismissed.
    pub error_message: Option<String>,
    /// Whether to show the About window.
    pub show_about: bool,
    /// Async file load in progress.
    pending_load: Option<PendingLoad>,
    /// Pending screenshot action (save file or clipboard).
    pending_screenshot: Option<PendingScreenshot>,
}

impl EcoGeoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let state = AppState::new();

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();

        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(15.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::proportional(14.5),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(22.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            egui::FontId::monospace(13.5),
        );

        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);

        ctx.set_style(style);
        ctx.set_visuals(state.theme.visuals());

        let view = AnalysisView::build(&state);
        Self {
            state,
            view,
            panel: PanelState::default(),
            column_mapping: None,
            error_message: None,
            show_about: false,
            pending_load: None,
            pending_screenshot: None,
        }
    }

    /// Recompute results after the applied table changed.
    fn refresh(&mut self) {
        self.view = AnalysisView::build(&self.state);
    }

    fn report_error(&mut self, message: String) {
        tracing::error!("{message}");
        self.error_message = Some(message);
    }

    /// Open a native file dialog and, on success, parse the file in the
    /// background.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Data Files", &["csv", "xls", "xlsx", "xlsm", "ods"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Parse a data file asynchronously so the UI stays responsive.
    fn load_file(&mut self, path: &Path) {
        let path_buf = path.to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result: Arc<Mutex<Option<Result<loader::LoadedData, String>>>> =
            Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let loaded = loader::load_file(&path_buf).map_err(|e| e.to_string());
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(loaded);
            }
        });

        self.pending_load = Some(PendingLoad { file_name, result });
    }

    /// Called when the user presses OK in the column mapping dialog.
    fn process_column_selection(&mut self, selection: ColumnSelection) {
        let Some(mapping) = self.column_mapping.take() else {
            return;
        };
        let loaded = &mapping.loaded_data;

        // Bad cells are imported as text so they can be fixed in the grid.
        let table = match loader::sample_from_columns(loaded, selection.size_col, selection.weight_col) {
            Ok(sample) => SampleTable::from_sample(&sample),
            Err(e) => {
                self.report_error(format!("{}: {e}", mapping.file_name));
                SampleTable::from_loaded(loaded, selection.size_col, selection.weight_col)
            }
        };
        tracing::info!(
            "Imported {} rows from {} (size: {:?}, weight: {:?})",
            table.rows.len(),
            mapping.file_name,
            loaded.columns.get(selection.size_col),
            loaded.columns.get(selection.weight_col),
        );

        self.state.import_table(table);
        self.refresh();
    }

    fn export_csv(&mut self) {
        let Ok(analysis) = &self.view.analysis else {
            return;
        };

        let filename = format!("{}_grain_size.csv", self.state.file_stem());
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&filename)
            .add_filter("CSV Files", &["csv"])
            .save_file()
        {
            if let Err(e) = export::save_analysis_csv(&path, analysis) {
                self.report_error(format!("Failed to export CSV: {e}"));
            }
        }
    }

    /// Save the current project state to a JSON file.
    fn save_project(&mut self) {
        let filename = format!("{}.{PROJECT_EXTENSION}", self.state.file_stem());
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&filename)
            .add_filter("EcoGeo Project", &[PROJECT_EXTENSION, "json"])
            .save_file()
        {
            let saved = self
                .state
                .to_json()
                .map_err(|e| format!("Failed to serialize project: {e}"))
                .and_then(|json| {
                    std::fs::write(&path, json).map_err(|e| format!("Failed to save project: {e}"))
                });
            match saved {
                Ok(()) => tracing::info!("Project saved to {:?}", path),
                Err(msg) => self.report_error(msg),
            }
        }
    }

    /// Load a project from a JSON file.
    fn load_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("EcoGeo Project", &[PROJECT_EXTENSION, "json"])
            .pick_file()
        {
            self.load_project_from(&path);
        }
    }

    fn load_project_from(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(json) => match AppState::from_json(&json) {
                Ok(loaded_state) => {
                    self.state = loaded_state;
                    grain_size_panel::reset_panel_state(&mut self.panel);
                    self.refresh();
                    tracing::info!("Project loaded from {:?}", path);
                }
                Err(e) => self.report_error(format!("Failed to parse project: {e}")),
            },
            Err(e) => self.report_error(format!("Failed to read file: {e}")),
        }
    }

    /// Handle a screenshot requested on a previous frame.
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.pending_screenshot.is_none() {
            return;
        }

        let mut screenshot_image: Option<Arc<egui::ColorImage>> = None;
        ctx.input(|i| {
            for event in &i.raw.events {
                if let egui::Event::Screenshot { image, .. } = event {
                    screenshot_image = Some(image.clone());
                }
            }
        });

        let Some(color_image) = screenshot_image else {
            return;
        };
        let Some(action) = self.pending_screenshot.take() else {
            return;
        };

        // Crop to just the plot.
        let crop = export::crop_screenshot(
            &color_image,
            self.panel.last_plot_rect,
            ctx.pixels_per_point(),
        );

        let outcome = match action {
            PendingScreenshot::SaveFile => {
                let filename = format!("{}_grain_size.png", self.state.file_stem());
                match rfd::FileDialog::new()
                    .set_file_name(&filename)
                    .add_filter("PNG Image", &["png"])
                    .save_file()
                {
                    Some(path) => export::save_png(&path, crop)
                        .map_err(|e| format!("Failed to save image: {e}")),
                    None => Ok(()),
                }
            }
            PendingScreenshot::Clipboard => export::copy_to_clipboard(crop)
                .map_err(|e| format!("Failed to copy to clipboard: {e}")),
        };

        if let Err(msg) = outcome {
            self.report_error(msg);
        }
    }

    fn poll_pending_load(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending_load else {
            return;
        };

        let finished = match pending.result.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => Some(Err("file loader thread panicked".to_string())),
        };

        match finished {
            Some(Ok(loaded_data)) => {
                let file_name = pending.file_name.clone();
                self.pending_load = None;
                self.column_mapping =
                    Some(ColumnMappingState::new(loaded_data, file_name, &self.state.aliases));
            }
            Some(Err(e)) => {
                let file_name = pending.file_name.clone();
                self.pending_load = None;
                self.report_error(format!("Failed to load {file_name}: {e}"));
            }
            None => {
                egui::Window::new("Loading")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading file...");
                        });
                    });
                ctx.request_repaint();
            }
        }
    }
}

impl eframe::App for EcoGeoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(self.state.theme.visuals());

        // ------------------------------------------------------------------
        // 0. Screenshot from previous frame
        // ------------------------------------------------------------------
        self.handle_screenshot(ctx);

        // ------------------------------------------------------------------
        // 1. Dropped files
        // ------------------------------------------------------------------
        let mut dropped_paths: Vec<PathBuf> = Vec::new();
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    if loader::is_supported(path) {
                        dropped_paths.push(path.clone());
                    }
                }
            }
        });
        // One file at a time; the mapping dialog is modal.
        if let Some(path) = dropped_paths.first() {
            self.state.input_mode = InputMode::Upload;
            self.load_file(path);
        }

        // ------------------------------------------------------------------
        // 2. Header
        // ------------------------------------------------------------------
        let mut save_project = false;
        let mut load_project = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let heading_response = ui.heading("EcoGeo Lab");
                heading_response.context_menu(|ui| {
                    if ui.button("About EcoGeo Lab").clicked() {
                        self.show_about = true;
                        ui.close_menu();
                    }
                });

                ui.separator();

                if ui.button("Save Project").clicked() {
                    save_project = true;
                }
                if ui.button("Load Project").clicked() {
                    load_project = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(self.state.theme.toggle_label()).clicked() {
                        self.state.theme = self.state.theme.toggle();
                    }

                    ui.separator();
                    ui.small(format!("v{VERSION}"));
                });
            });
        });

        if save_project {
            self.save_project();
        }
        if load_project {
            self.load_project();
        }

        // ------------------------------------------------------------------
        // 3. Footer with transient error
        // ------------------------------------------------------------------
        let error_color = self.state.theme.error_color();
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Sediment grain-size statistics").weak());
                if let Some(msg) = &self.error_message {
                    ui.separator();
                    ui.colored_label(error_color, msg);
                    if ui.small_button("dismiss").clicked() {
                        self.error_message = None;
                    }
                }
            });
        });

        // ------------------------------------------------------------------
        // 4. Central panel
        // ------------------------------------------------------------------
        let mut action = PanelAction::None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                action = grain_size_panel::show_grain_size_panel(
                    &mut self.state,
                    &mut self.panel,
                    &self.view,
                    ui,
                );
            });
        });

        match action {
            PanelAction::None => {}
            PanelAction::Applied => self.refresh(),
            PanelAction::OpenFile => self.open_file_dialog(),
            PanelAction::ExportCsv => self.export_csv(),
            PanelAction::ExportImageSave => {
                self.pending_screenshot = Some(PendingScreenshot::SaveFile);
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
            PanelAction::ExportImageClipboard => {
                self.pending_screenshot = Some(PendingScreenshot::Clipboard);
                ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            }
        }

        // ------------------------------------------------------------------
        // 5. Async file load
        // ------------------------------------------------------------------
        self.poll_pending_load(ctx);

        // ------------------------------------------------------------------
        // 6. Column mapping dialog
        // ------------------------------------------------------------------
        let mut selection_to_process = None;
        if let Some(ref mut mapping) = self.column_mapping {
            match column_mapping_dialog::show_column_mapping_dialog(ctx, mapping) {
                Some(DialogResult::Ok(selection)) => {
                    selection_to_process = Some(selection);
                }
                Some(DialogResult::Cancel) => {
                    self.column_mapping = None;
                }
                None => {} // dialog still open
            }
        }
        if let Some(selection) = selection_to_process {
            self.process_column_selection(selection);
        }

        // ------------------------------------------------------------------
        // 7. About window
        // ------------------------------------------------------------------
        if self.show_about {
            egui::Window::new("About EcoGeo Lab")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(340.0)
                .show(ctx, |ui| {
                    ui.heading("EcoGeo Lab");
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("Grain-size statistics for sediment samples.");
                    ui.add_space(10.0);
                    ui.label("  \u{2022} Phi-scale cumulative curve");
                    ui.label("  \u{2022} Folk & Ward mean, sorting, skewness, kurtosis");
                    ui.label("  \u{2022} Manual entry, CSV and Excel input");
                    ui.label("  \u{2022} CSV and PNG export");
                    ui.add_space(10.0);
                    ui.label("Right-click the title for this menu.");
                });
        }
    }
}
