// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::{anyhow, Context};
use eframe::egui::{ViewportBuilder, WindowLevel};
use pure_widget::{
    app::PetApp,
    artwork::Artwork,
    catalog::{Catalog, RECOGNIZED_EXTENSIONS},
    config::Config,
    volume,
};
use tracing::{error, info, warn};

const APP_TITLE: &str = "Pure";

fn initialize_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn run() -> anyhow::Result<()> {
    let config = Config::load().unwrap_or_else(|err| {
        warn!("Ignoring unreadable config: {err:#}");
        Config::default()
    });

    let catalog = Catalog::build(
        &config.assets.default_sound_dir,
        &config.assets.user_sound_dir,
        &RECOGNIZED_EXTENSIONS,
    )
    .context("Cannot start without the sound directories")?;
    let artwork = Artwork::open(&config.assets.image_dir)
        .context("Cannot start without the image directory")?;

    let level = if config.window.always_on_top {
        WindowLevel::AlwaysOnTop
    } else {
        WindowLevel::Normal
    };
    let mut viewport = ViewportBuilder::default()
        .with_title(APP_TITLE)
        .with_inner_size(volume::frame_size(false))
        .with_decorations(false)
        .with_resizable(false)
        .with_taskbar(false)
        .with_transparent(true)
        .with_window_level(level);
    if let Some(icon) = artwork.icon_data("icon_128.png") {
        viewport = viewport.with_icon(icon);
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    info!(tracks = catalog.len(), "Starting widget");
    eframe::run_native(
        APP_TITLE,
        native_options,
        Box::new(
            move |cc| -> std::result::Result<
                Box<dyn eframe::App>,
                Box<dyn std::error::Error + Send + Sync>,
            > { Ok(Box::new(PetApp::new(cc, config, catalog, artwork)?)) },
        ),
    )
    .map_err(|err| anyhow!("Event loop failed: {err}"))
}

fn main() -> anyhow::Result<()> {
    initialize_tracing();
    if let Err(err) = run() {
        error!("{err:#}");
        return Err(err);
    }
    Ok(())
}
