//! Control Panel Widget
//! Left sidebar with the file upload control and the categorical filters.

use crate::data::{category_label, FilterColumn, FilterState};
use egui::{Color32, RichText, ScrollArea};

/// Status line shown under the upload control.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Ready,
    Success(String),
    Error(String),
}

impl Status {
    fn text_and_color(&self) -> (&str, Color32) {
        match self {
            Status::Ready => ("Ready", Color32::GRAY),
            Status::Success(msg) => (msg.as_str(), Color32::from_rgb(40, 167, 69)),
            Status::Error(msg) => (msg.as_str(), Color32::from_rgb(220, 53, 69)),
        }
    }
}

/// Left side panel with upload and filter controls.
pub struct ControlPanel {
    pub file_name: Option<String>,
    pub status: Status,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            file_name: None,
            status: Status::Ready,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Draw the control panel. `filters` is `None` until a file is loaded.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        filters: Option<(&[FilterColumn], &mut FilterState)>,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Upload Section =====
        ui.add_space(5.0);
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = self.file_name.as_deref().unwrap_or("No file selected");
                    ui.label(RichText::new(name).size(12.0).color(
                        if self.file_name.is_some() {
                            ui.visuals().text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Upload").clicked() {
                            action = ControlPanelAction::BrowseFile;
                        }
                    });
                });
            });

        ui.add_space(5.0);
        let (text, color) = self.status.text_and_color();
        ui.label(RichText::new(text).size(11.0).color(color));

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔎 Filters").size(14.0).strong());
        ui.add_space(5.0);

        let Some((columns, state)) = filters else {
            return action;
        };

        for column in columns {
            if Self::show_filter(ui, column, state) {
                action = ControlPanelAction::FiltersChanged;
            }
            ui.add_space(8.0);
        }

        action
    }

    /// Multi-select for one column. Returns true when the selection changed.
    fn show_filter(ui: &mut egui::Ui, column: &FilterColumn, state: &mut FilterState) -> bool {
        let selected = state.entry(column.column.clone()).or_default();
        let mut changed = false;

        egui::CollapsingHeader::new(column.label.as_str())
            .id_salt(&column.column)
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if ui.small_button("Select All").clicked() {
                        selected.extend(column.options.iter().cloned());
                        changed = true;
                    }
                    if ui.small_button("Clear All").clicked() {
                        selected.clear();
                        changed = true;
                    }
                });

                ui.label(
                    RichText::new(format!(
                        "{} of {} selected",
                        selected.len(),
                        column.options.len()
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );

                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(5.0)
                    .inner_margin(5.0)
                    .show(ui, |ui| {
                        ScrollArea::vertical()
                            .id_salt(format!("{}_options", column.column))
                            .max_height(180.0)
                            .show(ui, |ui| {
                                for option in &column.options {
                                    let mut checked = selected.contains(option);
                                    if ui.checkbox(&mut checked, category_label(option)).changed() {
                                        if checked {
                                            selected.insert(option.clone());
                                        } else {
                                            selected.remove(option);
                                        }
                                        changed = true;
                                    }
                                }
                            });
                    });
            });

        changed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseFile,
    FiltersChanged,
}
