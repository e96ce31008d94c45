//! Car Sales Analytics Dashboard - desktop entry point.

use car_sales_dashboard::config::{DashboardConfig, CONFIG_FILE_NAME};
use car_sales_dashboard::gui::DashboardApp;
use eframe::egui;
use std::path::Path;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE_NAME));
    let title = config.title.clone();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title(&title),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
