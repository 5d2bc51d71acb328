mod app;
mod assets;
mod data;
mod error;
mod export;
mod processing;
mod state;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;

use app::{Startup, VoiGraphApp};
use clap::Parser;
use eframe::egui;

use crate::data::loader;
use crate::data::region::PlotRequest;
use crate::data::roi_mean::roi_mean;
use crate::error::{GrapherError, Result};
use crate::export::sink::DirectorySink;
use crate::processing::chart_data::format_chart_data;
use crate::state::session::GrapherSession;
use crate::state::settings::Settings;

/// Plot region-of-interest statistics as line or bar charts.
#[derive(Parser, Debug)]
#[command(name = "voigraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// VOI table to plot (CSV export, plain CSV table or JSON plot request)
    table: Option<PathBuf>,

    /// Image volume (JSON) to average per region
    #[arg(long, requires = "objectmap")]
    image: Option<PathBuf>,

    /// Object map (JSON) defining the regions
    #[arg(long, requires = "image")]
    objectmap: Option<PathBuf>,

    /// Extra width added to the viewer size when fitting the chart window
    #[arg(long, default_value = "0")]
    extra_width: f32,

    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the CSV export into this directory and exit
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Print the chart data as JSON and exit
    #[arg(long)]
    print_chart: bool,

    /// Show volumes instead of values (with --print-chart)
    #[arg(long)]
    volumes: bool,

    /// Print the offline cache manifest as JSON and exit
    #[arg(long)]
    print_manifest: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("voigraph: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.print_manifest {
        println!("{}", serde_json::to_string_pretty(&assets::cache_manifest())?);
        return Ok(());
    }

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let mut startup = Startup {
        extra_width: cli.extra_width,
        ..Startup::default()
    };
    if let Some(path) = &cli.table {
        startup.table = Some(loader::load_voi_table(path)?);
    }
    if let (Some(image), Some(objectmap)) = (&cli.image, &cli.objectmap) {
        startup.image = Some(loader::load_volume(image)?);
        startup.objectmap = Some(loader::load_label_map(objectmap)?);
    }

    if cli.print_chart || cli.export_dir.is_some() {
        let request = headless_request(&startup)?;
        if cli.print_chart {
            let chart = format_chart_data(
                &request.x,
                &request.y,
                request.counts(),
                cli.volumes,
                &settings.palette,
            )?;
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        if let Some(dir) = &cli.export_dir {
            let mut session = GrapherSession::new(settings.resize_debounce());
            session.plot(request, &settings.palette)?;
            let mut sink = DirectorySink::new(dir);
            if let Some(path) = session.export_csv(&mut sink, &settings.csv_file_name)? {
                println!("{}", path.display());
            }
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("VOI Grapher")
            .with_inner_size(settings.window_size)
            .with_min_inner_size([480.0, 360.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "VOI Grapher",
        options,
        Box::new(|cc| Ok(Box::new(VoiGraphApp::new(cc, settings, startup)))),
    )
    .map_err(|e| GrapherError::Gui(e.to_string()))
}

/// The data a non-interactive run works on: the table if given, else ROI means.
fn headless_request(startup: &Startup) -> Result<PlotRequest> {
    if let Some(table) = &startup.table {
        return Ok(table.clone());
    }
    match (&startup.image, &startup.objectmap) {
        (Some(image), Some(objectmap)) => Ok(PlotRequest::from(roi_mean(image, objectmap)?)),
        _ => Err(GrapherError::MissingInput(
            "a table or --image with --objectmap is required".into(),
        )),
    }
}
