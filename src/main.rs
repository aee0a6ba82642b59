//! dotchart - Animated dot charts from CSV data
//!
//! Renders charts from the command line or opens the interactive viewer.

use anyhow::anyhow;
use clap::Parser;
use dotchart::cli::{Cli, Commands, ViewArgs};
use dotchart::commands;
use dotchart::gui::DotChartApp;
use dotchart::EXIT_ERROR;
use eframe::egui;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => run_viewer(ViewArgs::default()),
        Some(Commands::View(args)) => run_viewer(args),
        Some(Commands::Render(args)) => commands::run_render(&args),
        Some(Commands::Frames(args)) => commands::run_frames(&args),
        Some(Commands::Config(args)) => commands::run_config(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(EXIT_ERROR);
    }
}

/// `-v` enables info, `-vv` debug; `RUST_LOG` wins when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run_viewer(args: ViewArgs) -> anyhow::Result<()> {
    let settings = commands::load_settings(args.config.as_deref())?;
    let csv = args.csv;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("dotchart"),
        ..Default::default()
    };

    eframe::run_native(
        "dotchart",
        options,
        Box::new(move |cc| Ok(Box::new(DotChartApp::new(cc, settings, csv)))),
    )
    .map_err(|e| anyhow!("Viewer failed: {e}"))
}
