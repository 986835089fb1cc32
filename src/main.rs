// GUI-subsystem binary: no console window is ever allocated by Windows.
#![windows_subsystem = "windows"]

use eframe::egui;
use tablero::app::TableroApp;
use tablero::{i18n, logger};

fn main() -> Result<(), eframe::Error> {
    // Session log (overwrites the previous session's file)
    logger::init();

    // Translations, then pick the system language (English fallback)
    i18n::init();
    i18n::set_language(&i18n::detect_system_language());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([760.0, 520.0])
            .with_title("Tablero Creativo"),
        ..Default::default()
    };

    eframe::run_native(
        "Tablero",
        options,
        Box::new(|cc| Box::new(TableroApp::new(cc))),
    )
}
