//! Entry point for the mlscope chart viewer.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use std::sync::Arc;

use eframe::egui;
use mlscope::api::HttpDataSource;
use mlscope::config::{self, AppSettings};
use mlscope::ui::{MIN_VIEWPORT_SIZE, MlScopeApp};
use mlscope::views::ViewController;
use mlscope::{cli, logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = match cli::parse_args(std::env::args().skip(1).collect()) {
        Ok(Some(options)) => options,
        Ok(None) => return Ok(()),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = logging::init() {
        eprintln!("File logging disabled: {err}");
        if let Err(err) = logging::init_stdout_only() {
            eprintln!("Logging disabled: {err}");
        }
    }

    let mut settings = config::load_or_init().unwrap_or_else(|err| {
        tracing::warn!("Using default settings: {err}");
        AppSettings::default()
    });
    if let Some(api) = options.api {
        settings.api.base_url = api;
    }
    tracing::info!(
        "Backend {} (ordering: {:?})",
        settings.api.base_url,
        settings.ordering
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("mlscope")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size(MIN_VIEWPORT_SIZE),
        ..Default::default()
    };

    let launch = HttpDataSource::new(&settings.api.base_url, &settings.api.http())
        .map(|source| {
            let mut controller = ViewController::new(Arc::new(source), &settings);
            controller.active = options.view.unwrap_or_default();
            controller
        })
        .map_err(|err| format!("Invalid backend URL '{}': {err}", settings.api.base_url));

    eframe::run_native(
        "mlscope",
        native_options,
        Box::new(move |cc| match launch {
            Ok(controller) => Ok(Box::new(MlScopeApp::new(&cc.egui_ctx, controller))),
            Err(message) => {
                tracing::error!("{message}");
                Ok(Box::new(LaunchError { message }))
            }
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start mlscope");
                ui.label(&self.message);
            });
        });
    }
}
