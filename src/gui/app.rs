//! dotchart Viewer Application
//! Main window with control panel and live chart viewer.

use crate::charts::{svg, StaticChartRenderer};
use crate::config::ChartSettings;
use crate::data::DataLoader;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::playback::Playback;
use egui::SidePanel;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete {
        df: DataFrame,
        path: PathBuf,
        columns: Vec<String>,
        numeric_columns: Vec<String>,
    },
    Error(String),
}

/// Frame preparation result from background thread
enum PrepareResult {
    Progress(f32, String),
    Complete(Playback),
    Error(String),
}

/// Main application window.
pub struct DotChartApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Async frame preparation
    prepare_rx: Option<Receiver<PrepareResult>>,
    is_preparing: bool,
}

impl DotChartApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: ChartSettings,
        csv: Option<PathBuf>,
    ) -> Self {
        let mut app = Self {
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(settings),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
            prepare_rx: None,
            is_preparing: false,
        };
        if let Some(path) = csv {
            app.start_loading(path);
        }
        app
    }

    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_loading(path);
        }
    }

    /// Load a CSV file in a background thread.
    fn start_loading(&mut self, path: PathBuf) {
        self.chart_viewer.clear();
        self.control_panel.export_enabled = false;
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.set_progress(0.0, "Loading CSV file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(10.0, "Reading CSV file...".to_string()));

            let mut loader = DataLoader::new();
            if let Err(e) = loader.load_csv(&path) {
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
            let columns = loader.get_columns();
            let numeric_columns = loader.get_numeric_columns();
            if let Some(df) = loader.get_dataframe().cloned() {
                let _ = tx.send(LoadResult::Complete {
                    df,
                    path,
                    columns,
                    numeric_columns,
                });
            }
        });
    }

    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        while let Ok(result) = rx.try_recv() {
            match result {
                LoadResult::Progress(progress, status) => {
                    self.control_panel.set_progress(progress, &status);
                }
                LoadResult::Complete {
                    df,
                    path,
                    columns,
                    numeric_columns,
                } => {
                    let status = format!("Loaded {} rows, {} columns", df.height(), columns.len());
                    self.loader.set_dataframe(df, Some(path));
                    self.control_panel.update_columns(columns, numeric_columns);
                    self.control_panel.set_progress(0.0, &status);
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
                LoadResult::Error(error) => {
                    self.control_panel
                        .set_progress(0.0, &format!("Error: {}", error));
                    self.is_loading = false;
                    should_keep_receiver = false;
                }
            }
        }

        if should_keep_receiver {
            self.load_rx = Some(rx);
        }
    }

    /// Convert records and split frames in a background thread.
    fn start_preparing(&mut self) {
        let Some(df) = self.loader.get_dataframe().cloned() else {
            self.control_panel.set_progress(0.0, "No data loaded");
            return;
        };
        let settings = self.control_panel.settings.clone();

        let (tx, rx) = channel();
        self.prepare_rx = Some(rx);
        self.is_preparing = true;
        self.control_panel.set_progress(5.0, "Preparing frames...");

        thread::spawn(move || Self::run_preparation(tx, df, settings));
    }

    fn run_preparation(tx: Sender<PrepareResult>, df: DataFrame, settings: ChartSettings) {
        let _ = tx.send(PrepareResult::Progress(30.0, "Converting records...".to_string()));
        match Playback::from_dataframe(&df, &settings) {
            Ok(playback) => {
                let _ = tx.send(PrepareResult::Complete(playback));
            }
            Err(e) => {
                let _ = tx.send(PrepareResult::Error(e.to_string()));
            }
        }
    }

    fn check_prepare_results(&mut self) {
        let Some(rx) = self.prepare_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        while let Ok(result) = rx.try_recv() {
            match result {
                PrepareResult::Progress(progress, status) => {
                    self.control_panel.set_progress(progress, &status);
                }
                PrepareResult::Complete(playback) => {
                    let frames = playback.len();
                    self.chart_viewer.set_playback(playback);
                    self.control_panel.export_enabled = self.chart_viewer.has_chart();
                    self.control_panel
                        .set_progress(100.0, &format!("Chart ready: {} frames", frames));
                    self.is_preparing = false;
                    should_keep_receiver = false;
                }
                PrepareResult::Error(error) => {
                    self.control_panel
                        .set_progress(0.0, &format!("Error: {}", error));
                    self.is_preparing = false;
                    should_keep_receiver = false;
                }
            }
        }

        if should_keep_receiver {
            self.prepare_rx = Some(rx);
        }
    }

    fn export_file_name(&self, extension: &str) -> String {
        match self.chart_viewer.frame_label() {
            Some(label) => format!("dotchart_{}.{}", label, extension),
            None => format!("dotchart.{}", extension),
        }
    }

    /// Write the frame on screen as an animated SVG.
    fn handle_export_svg(&mut self) {
        let Some(transition) = self.chart_viewer.transition() else {
            self.control_panel.set_progress(0.0, "No chart to export");
            return;
        };
        let document = svg::render_transition(transition);

        let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .set_file_name(self.export_file_name("svg"))
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, document) {
            Ok(()) => self.finish_export(&path),
            Err(e) => self
                .control_panel
                .set_progress(0.0, &format!("Error: {}", e)),
        }
    }

    fn handle_export_png(&mut self) {
        let Some(scene) = self.chart_viewer.scene() else {
            self.control_panel.set_progress(0.0, "No chart to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(self.export_file_name("png"))
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::save_png(&scene, &path) {
            Ok(()) => self.finish_export(&path),
            Err(e) => self
                .control_panel
                .set_progress(0.0, &format!("Error: {}", e)),
        }
    }

    fn finish_export(&mut self, path: &Path) {
        self.control_panel
            .set_progress(100.0, &format!("Exported {}", path.display()));
        if self.control_panel.open_after_export {
            if let Err(e) = open::that(path) {
                log::warn!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    fn handle_save_settings(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(crate::cli::DEFAULT_SETTINGS_FILE)
            .save_file()
        else {
            return;
        };
        match self.control_panel.settings.save(&path) {
            Ok(()) => self
                .control_panel
                .set_progress(0.0, &format!("Saved settings to {}", path.display())),
            Err(e) => self
                .control_panel
                .set_progress(0.0, &format!("Error: {}", e)),
        }
    }

    fn handle_load_settings(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        match ChartSettings::load(&path) {
            Ok(settings) => {
                self.control_panel.settings = settings;
                let columns = self.loader.get_columns();
                let numeric = self.loader.get_numeric_columns();
                if !columns.is_empty() {
                    self.control_panel.update_columns(columns, numeric);
                }
                self.control_panel
                    .set_progress(0.0, &format!("Loaded settings from {}", path.display()));
            }
            Err(e) => self
                .control_panel
                .set_progress(0.0, &format!("Error: {}", e)),
        }
    }
}

impl eframe::App for DotChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();
        self.check_prepare_results();

        if self.is_loading || self.is_preparing {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Build => {
                            if !self.is_preparing {
                                self.start_preparing();
                            }
                        }
                        ControlPanelAction::ExportSvg => self.handle_export_svg(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::SaveSettings => self.handle_save_settings(),
                        ControlPanelAction::LoadSettings => self.handle_load_settings(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui);
        });
    }
}
