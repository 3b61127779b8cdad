mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::SnapTrendsApp;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    // A .env file may set RUST_LOG and the SNAP_* variables.
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    log::info!("Starting with {config:?}");

    // A missing or broken default table is not fatal: the user can open
    // another one from the File menu.
    let mut state = AppState::new(config.default_state.clone());
    state.open(&config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SNAP Benefit Trends",
        options,
        Box::new(|_cc| Ok(Box::new(SnapTrendsApp::new(state)))),
    )
}
