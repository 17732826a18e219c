//! ComCAD viewer - splash screen, plan viewer and drawing canvas.

mod app;
mod canvas;
mod layers;
mod loading;
mod settings;
mod splash;
mod status;
mod theme;

use app::ComcadApp;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let initial_file: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("ComCAD V1_Equitelcom"),
        // Don't block when window is not visible
        vsync: false,
        ..Default::default()
    };

    eframe::run_native(
        "ComCAD",
        options,
        Box::new(move |cc| Ok(Box::new(ComcadApp::new(cc, initial_file)))),
    )
}
