//! Top-level entry point for running the scatter plot as a native window.

use eframe::egui;

use crate::config::PlotConfig;
use crate::host::HostRequest;

use super::ScatterPlotApp;

/// Open a native window showing the plot fed by `requests`.
///
/// Blocks until the window is closed.
pub fn run_canvasplot(
    requests: std::sync::mpsc::Receiver<HostRequest>,
    config: PlotConfig,
) -> eframe::Result<()> {
    let title = format!("canvasplot: {}", config.options.plot_title);
    let size = egui::vec2(
        (config.geometry.outer_width() + 260.0) as f32,
        (config.geometry.outer_height() + 80.0) as f32,
    );
    let app = ScatterPlotApp::new(config, requests);
    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(size),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}
