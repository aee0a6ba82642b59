//! Control Panel Widget
//! Left side panel with the data source, column mapping and chart settings.

use crate::charts::Ease;
use crate::config::ChartSettings;
use egui::{Color32, ComboBox, DragValue, RichText};
use std::path::PathBuf;

const LABEL_WIDTH: f32 = 90.0;
const COMBO_WIDTH: f32 = 170.0;

/// Left side control panel with file selection and chart controls.
pub struct ControlPanel {
    pub settings: ChartSettings,
    pub csv_path: Option<PathBuf>,
    pub columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub open_after_export: bool,
    pub progress: f32,
    pub status: String,
    pub build_enabled: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new(ChartSettings::default())
    }
}

impl ControlPanel {
    pub fn new(settings: ChartSettings) -> Self {
        Self {
            settings,
            csv_path: None,
            columns: Vec::new(),
            numeric_columns: Vec::new(),
            open_after_export: true,
            progress: 0.0,
            status: "Ready".to_string(),
            build_enabled: false,
            export_enabled: false,
        }
    }

    /// Update available columns after CSV load. Column choices that no longer
    /// exist are dropped; x and y fall back to the first numeric columns.
    pub fn update_columns(&mut self, columns: Vec<String>, numeric_columns: Vec<String>) {
        let c = &mut self.settings.columns;
        for slot in [&mut c.radius, &mut c.color, &mut c.key, &mut c.frame] {
            if slot.as_ref().is_some_and(|name| !columns.contains(name)) {
                *slot = None;
            }
        }
        for (slot, fallback) in [(&mut c.x, 0), (&mut c.y, 1)] {
            if !slot.as_ref().is_some_and(|name| numeric_columns.contains(name)) {
                *slot = numeric_columns.get(fallback).cloned();
            }
        }

        self.build_enabled = !numeric_columns.is_empty();
        self.columns = columns;
        self.numeric_columns = numeric_columns;
    }

    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("● dotchart")
                    .size(22.0)
                    .color(Color32::from_rgb(31, 119, 180)),
            );
            ui.label(RichText::new("Animated bubble charts").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();

        // ===== Data Source =====
        section(ui, "📁 Data Source");
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string());
                    let color = if name.is_some() { Color32::WHITE } else { Color32::GRAY };
                    let text = name.unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(text).size(12.0).color(color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        // ===== Columns =====
        section(ui, "🔧 Columns");
        let numeric = self.numeric_columns.clone();
        let all = self.columns.clone();
        let c = &mut self.settings.columns;
        column_picker(ui, "X:", "col_x", &mut c.x, &numeric, false);
        column_picker(ui, "Y:", "col_y", &mut c.y, &numeric, false);
        column_picker(ui, "Radius:", "col_r", &mut c.radius, &numeric, true);
        column_picker(ui, "Color:", "col_color", &mut c.color, &all, true);
        column_picker(ui, "Key:", "col_key", &mut c.key, &all, true);
        column_picker(ui, "Frame:", "col_frame", &mut c.frame, &all, true);

        // ===== Chart =====
        section(ui, "⚙️ Chart");
        let s = &mut self.settings;
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Size:"));
            ui.add(DragValue::new(&mut s.width).range(50.0..=4000.0).suffix(" px"));
            ui.label("×");
            ui.add(DragValue::new(&mut s.height).range(50.0..=4000.0).suffix(" px"));
        });
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Duration:"));
            ui.add(egui::Slider::new(&mut s.duration_ms, 0..=5000).suffix(" ms"));
        });
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Easing:"));
            ComboBox::from_id_salt("ease")
                .width(COMBO_WIDTH)
                .selected_text(s.ease.name())
                .show_ui(ui, |ui| {
                    for ease in Ease::ALL {
                        ui.selectable_value(&mut s.ease, ease, ease.name());
                    }
                });
        });
        domain_editor(ui, "X domain:", &mut s.x_domain);
        domain_editor(ui, "Y domain:", &mut s.y_domain);

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.build_enabled, |ui| {
                let button = egui::Button::new(RichText::new("▶ Build Chart").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Build;
                }
            });

            ui.add_space(8.0);
            ui.add_enabled_ui(self.export_enabled, |ui| {
                ui.horizontal(|ui| {
                    if ui.button("🖼 Export SVG").clicked() {
                        action = ControlPanelAction::ExportSvg;
                    }
                    if ui.button("🖼 Export PNG").clicked() {
                        action = ControlPanelAction::ExportPng;
                    }
                });
            });
            ui.checkbox(&mut self.open_after_export, "Open after export");

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("💾 Save Settings").clicked() {
                    action = ControlPanelAction::SaveSettings;
                }
                if ui.button("📄 Load Settings").clicked() {
                    action = ControlPanelAction::LoadSettings;
                }
            });
        });

        // ===== Progress =====
        section(ui, "📊 Progress");
        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );
        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.progress >= 100.0 {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

fn section(ui: &mut egui::Ui, title: &str) {
    ui.add_space(10.0);
    ui.label(RichText::new(title).size(14.0).strong());
    ui.add_space(5.0);
}

fn column_picker(
    ui: &mut egui::Ui,
    label: &str,
    id: &str,
    value: &mut Option<String>,
    columns: &[String],
    optional: bool,
) {
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        ComboBox::from_id_salt(id)
            .width(COMBO_WIDTH)
            .selected_text(value.as_deref().unwrap_or("(none)"))
            .show_ui(ui, |ui| {
                if optional {
                    ui.selectable_value(value, None, "(none)");
                }
                for col in columns {
                    ui.selectable_value(value, Some(col.clone()), col);
                }
            });
    });
}

/// Checkbox toggling a fixed domain, with min/max fields when fixed.
fn domain_editor(ui: &mut egui::Ui, label: &str, domain: &mut Option<[f64; 2]>) {
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        let mut fixed = domain.is_some();
        if ui.checkbox(&mut fixed, "fixed").changed() {
            *domain = fixed.then_some([0.0, 1.0]);
        }
        if let Some([lo, hi]) = domain {
            ui.add(DragValue::new(lo).speed(0.1));
            ui.label("–");
            ui.add(DragValue::new(hi).speed(0.1));
        }
    });
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    Build,
    ExportSvg,
    ExportPng,
    SaveSettings,
    LoadSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn columns_fall_back_to_numeric() {
        let mut panel = ControlPanel::default();
        panel.settings.columns.color = Some("gone".into());
        panel.settings.columns.key = Some("name".into());

        panel.update_columns(names(&["name", "income", "life"]), names(&["income", "life"]));

        let c = &panel.settings.columns;
        assert_eq!(c.x.as_deref(), Some("income"));
        assert_eq!(c.y.as_deref(), Some("life"));
        assert_eq!(c.color, None);
        assert_eq!(c.key.as_deref(), Some("name"));
        assert!(panel.build_enabled);
    }

    #[test]
    fn no_numeric_columns_disables_build() {
        let mut panel = ControlPanel::default();
        panel.update_columns(names(&["name"]), Vec::new());
        assert!(!panel.build_enabled);
        assert_eq!(panel.settings.columns.x, None);
    }
}
