//! Brede Welvaart - Broad prosperity dashboard for Dutch municipalities
//!
//! Shows indicator values per municipality as charts, a table and choropleth maps.

mod charts;
mod config;
mod data;
mod export;
mod format;
mod gui;
mod i18n;
mod logging;
mod map;
mod stats;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, DashboardConfig};
use eframe::egui;
use gui::DashboardApp;

fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    logging::init_logger(cli.verbose);

    let config = DashboardConfig::resolve(&cli).context("Failed to load configuration")?;
    logging::log_config_info(&config);

    let title = i18n::text(i18n::Key::AppTitle, config.language);

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(title),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Brede Welvaart",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
