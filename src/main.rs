mod app;

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use log::{LevelFilter, debug, info};

use app::DataSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with `[{"name": ..., "change": ...}]` records; a bundled sample when absent.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for the initial bubble placement.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 820.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'info' instead.", args.log_level);
        LevelFilter::Info
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting bubble chart");
    debug!(args:?; "Parsed arguments");

    let source = match args.data {
        Some(path) => DataSource::File(path),
        None => DataSource::Sample,
    };
    let seed = args.seed;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width.max(320.0), args.height.max(240.0)]),
        ..Default::default()
    };

    eframe::run_native(
        "bubble chart",
        options,
        Box::new(move |cc| Ok(Box::new(app::BubbleChartApp::new(cc, source, seed)))),
    )
}
