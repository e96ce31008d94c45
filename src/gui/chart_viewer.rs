//! Chart Viewer Widget
//! Central scrollable area: key metrics, the two charts and the filtered table.

use crate::charts::ChartPlotter;
use crate::pipeline::{DashboardView, TablePreview};
use crate::stats::format_currency;
use egui::{Color32, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 320.0;
const TABLE_HEIGHT: f32 = 420.0;
const TABLE_ROW_HEIGHT: f32 = 18.0;
const CARD_ROUNDING: f32 = 8.0;

/// Actions triggered from the main area
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    None,
    DownloadCsv,
    SaveHistogramPng,
    SaveGroupMeansPng,
}

/// Draws everything derived from the current filter selection.
pub struct ChartViewer;

impl ChartViewer {
    /// Shown before any file has been uploaded.
    pub fn show_prompt(ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(Color32::from_rgb(219, 234, 254))
            .rounding(CARD_ROUNDING)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("ℹ Please upload a file to begin.")
                        .size(14.0)
                        .color(Color32::from_rgb(30, 64, 175)),
                );
            });
    }

    pub fn show(ui: &mut egui::Ui, view: &DashboardView) -> ViewerAction {
        let mut action = ViewerAction::None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // ===== Key Performance Indicators =====
                ui.label(RichText::new("📊 Key Performance Indicators").size(18.0).strong());
                ui.add_space(8.0);

                ui.columns(4, |cols| {
                    Self::metric_card(&mut cols[0], "Total Cars", view.summary.count.to_string());
                    if let Some(price) = &view.summary.price {
                        Self::metric_card(&mut cols[1], "Average Price", format_currency(price.mean));
                        Self::metric_card(&mut cols[2], "Max Price", format_currency(price.max));
                        Self::metric_card(&mut cols[3], "Min Price", format_currency(price.min));
                    }
                });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                // ===== Visual Analysis =====
                ui.label(RichText::new("📈 Visual Analysis").size(18.0).strong());
                ui.add_space(8.0);

                ui.columns(2, |cols| {
                    if let Some(histogram) = &view.histogram {
                        let ui = &mut cols[0];
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Price Distribution").size(14.0).strong());
                            if ui.small_button("💾 Save PNG").clicked() {
                                action = ViewerAction::SaveHistogramPng;
                            }
                        });
                        ChartPlotter::draw_histogram(ui, histogram, CHART_HEIGHT);
                        ui.label(
                            RichText::new(format!("{} priced cars", histogram.total()))
                                .size(11.0)
                                .color(Color32::GRAY),
                        );
                    }

                    if let Some(means) = &view.group_means {
                        let ui = &mut cols[1];
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Average Price by Brand").size(14.0).strong());
                            if ui.small_button("💾 Save PNG").clicked() {
                                action = ViewerAction::SaveGroupMeansPng;
                            }
                        });
                        ChartPlotter::draw_group_means(ui, means, CHART_HEIGHT);
                    }
                });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                // ===== Filtered Data =====
                ui.label(RichText::new("📄 Filtered Data").size(18.0).strong());
                ui.add_space(8.0);

                Self::draw_table(ui, &view.table);

                ui.add_space(10.0);
                let button = egui::Button::new(RichText::new("📥 Download Filtered Data").size(14.0))
                    .min_size(egui::vec2(220.0, 30.0));
                if ui.add(button).clicked() {
                    action = ViewerAction::DownloadCsv;
                }
                ui.add_space(20.0);
            });

        action
    }

    fn metric_card(ui: &mut egui::Ui, title: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(CARD_ROUNDING)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(12.0).color(Color32::GRAY));
                ui.label(RichText::new(value).size(24.0).strong());
            });
    }

    /// The whole filtered table in a striped grid. Only rows scrolled into
    /// view are laid out; row 0 is the header.
    fn draw_table(ui: &mut egui::Ui, table: &TablePreview) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let row_spacing = ui.spacing().item_spacing.y;
                ScrollArea::both()
                    .id_salt("filtered_table")
                    .max_height(TABLE_HEIGHT)
                    .auto_shrink([false, true])
                    .show_rows(ui, TABLE_ROW_HEIGHT, table.line_count(), |ui, visible| {
                        egui::Grid::new("filtered_table_grid")
                            .striped(true)
                            .min_col_width(60.0)
                            .min_row_height(TABLE_ROW_HEIGHT)
                            .spacing([12.0, row_spacing])
                            .show(ui, |ui| {
                                for index in visible {
                                    for cell in table.line(index).unwrap_or_default() {
                                        let text = RichText::new(cell).size(12.0);
                                        ui.label(if index == 0 { text.strong() } else { text });
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
