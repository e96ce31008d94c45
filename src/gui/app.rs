//! Car Sales Dashboard Main Application
//! Main window with the control panel sidebar and the dashboard area.

use crate::charts::ChartRenderer;
use crate::config::DashboardConfig;
use crate::data::{CsvExport, FilterState, LoaderError, Upload, ACCEPTED_EXTENSIONS};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, Status, ViewerAction};
use crate::pipeline::{DashboardView, Dataset};
use egui::{RichText, SidePanel};
use std::path::Path;

/// Size of saved chart images
const PNG_WIDTH: u32 = 1200;
const PNG_HEIGHT: u32 = 800;

/// Everything tied to one uploaded file; replaced on the next upload.
struct Session {
    dataset: Dataset,
    filters: FilterState,
    view: DashboardView,
}

impl Session {
    fn open(path: &Path, config: &DashboardConfig) -> Result<Self, LoaderError> {
        let upload = Upload::read(path)?;
        let dataset = Dataset::ingest(&upload, config)?;
        let filters = dataset.default_filters();
        let view = dataset.compute_view(&filters, config)?;
        Ok(Self {
            dataset,
            filters,
            view,
        })
    }
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    session: Option<Session>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            config,
            control_panel: ControlPanel::new(),
            session: None,
        }
    }

    /// Handle file selection: parse, clean and show the unfiltered view.
    fn handle_browse_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV or Excel", &ACCEPTED_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        self.control_panel.file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());

        match Session::open(&path, &self.config) {
            Ok(session) => {
                self.session = Some(session);
                self.control_panel
                    .set_status(Status::Success("File Uploaded Successfully ✅".to_string()));
            }
            Err(e) => {
                log::error!("Upload of {} failed: {}", path.display(), e);
                self.session = None;
                self.control_panel.set_status(Status::Error(format!("Error: {}", e)));
            }
        }
    }

    /// Recompute the view after a filter change. Options of later filters
    /// follow the earlier selections.
    fn handle_filters_changed(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };

        let refreshed = session.dataset.refresh_view(
            &mut session.filters,
            &session.view.filter_columns,
            &self.config,
        );
        match refreshed {
            Ok(view) => session.view = view,
            Err(e) => {
                log::error!("Filtering failed: {}", e);
                self.control_panel.set_status(Status::Error(format!("Error: {}", e)));
            }
        }
    }

    /// Encode the current filtered table and save it where the user chooses.
    fn handle_download_csv(&mut self) {
        let Some(session) = &self.session else {
            return;
        };

        let export = match CsvExport::from_dataframe(&session.view.filtered, &self.config) {
            Ok(export) => export,
            Err(e) => {
                log::error!("CSV export failed: {}", e);
                self.control_panel.set_status(Status::Error(format!("Error: {}", e)));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(&export.file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match export.write_to(&path) {
            Ok(()) => {
                log::info!(
                    "Exported {} rows ({}) to {}",
                    session.view.filtered.height(),
                    export.mime,
                    path.display()
                );
                self.control_panel.set_status(Status::Success(format!(
                    "Saved {}",
                    export.file_name
                )));
            }
            Err(e) => {
                log::error!("Writing {} failed: {}", path.display(), e);
                self.control_panel.set_status(Status::Error(format!("Error: {}", e)));
            }
        }
    }

    /// Render one chart to PNG and save it where the user chooses.
    fn handle_save_png(&mut self, action: &ViewerAction) {
        let Some(session) = &self.session else {
            return;
        };

        let (file_name, rendered) = match action {
            ViewerAction::SaveHistogramPng => match &session.view.histogram {
                Some(histogram) => (
                    "price_distribution.png",
                    ChartRenderer::histogram_png(histogram, PNG_WIDTH, PNG_HEIGHT),
                ),
                None => return,
            },
            ViewerAction::SaveGroupMeansPng => match &session.view.group_means {
                Some(means) => (
                    "average_price_by_brand.png",
                    ChartRenderer::group_means_png(means, PNG_WIDTH, PNG_HEIGHT),
                ),
                None => return,
            },
            _ => return,
        };

        let png = match rendered {
            Ok(png) => png,
            Err(e) => {
                log::error!("Rendering {} failed: {}", file_name, e);
                self.control_panel.set_status(Status::Error(format!("Render error: {}", e)));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, png) {
            Ok(()) => {
                log::info!("Saved chart to {}", path.display());
                self.control_panel
                    .set_status(Status::Success(format!("Saved {}", file_name)));
            }
            Err(e) => {
                log::error!("Writing {} failed: {}", path.display(), e);
                self.control_panel.set_status(Status::Error(format!("Error: {}", e)));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        let panel_action = SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .show(ui, |ui| {
                        let filters = self
                            .session
                            .as_mut()
                            .map(|s| (s.view.filter_columns.as_slice(), &mut s.filters));
                        self.control_panel.show(ui, filters)
                    })
                    .inner
            })
            .inner;

        match panel_action {
            ControlPanelAction::BrowseFile => self.handle_browse_file(),
            ControlPanelAction::FiltersChanged => self.handle_filters_changed(),
            ControlPanelAction::None => {}
        }

        // Central panel - Dashboard
        let viewer_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui.heading(RichText::new(format!("🚗 {}", self.config.title)).size(26.0));
                ui.label(RichText::new(&self.config.subtitle).size(13.0));
                ui.add_space(10.0);
                ui.separator();
                ui.add_space(10.0);

                match &self.session {
                    Some(session) => ChartViewer::show(ui, &session.view),
                    None => {
                        ChartViewer::show_prompt(ui);
                        ViewerAction::None
                    }
                }
            })
            .inner;

        match viewer_action {
            ViewerAction::DownloadCsv => self.handle_download_csv(),
            ViewerAction::SaveHistogramPng | ViewerAction::SaveGroupMeansPng => {
                self.handle_save_png(&viewer_action)
            }
            ViewerAction::None => {}
        }
    }
}
