// GUI-subsystem binary on Windows: no console window is allocated.
#![windows_subsystem = "windows"]

mod app;
mod components;

use app::SpriteFEApp;
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    // Initialize session log (overwrites previous session log)
    spritefe::logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([760.0, 580.0])
            .with_title("SpriteFE"),
        ..Default::default()
    };

    eframe::run_native(
        "SpriteFE",
        options,
        Box::new(|cc| Box::new(SpriteFEApp::new(cc))),
    )
}
