//! Trajectory Viewer
//!
//! `serve` starts the dashboards; `run` and `view` are one-shot commands
//! that write a map page (and optionally GeoJSON and CSV) to disk.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use clap::{Args, Parser, Subcommand};
use hysplit_runner::{ControlFile, Direction, HysplitRunner, MetType};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use trajectory_viewer::config::ViewerConfig;
use trajectory_viewer::pipeline::{OutputPaths, PageSettings, Rendered};
use trajectory_viewer::state::AppState;

/// HYSPLIT trajectory viewer
#[derive(Parser, Debug)]
#[command(name = "trajectory-viewer")]
#[command(about = "Run HYSPLIT trajectories and view trajectory dumps on a map")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "VIEWER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the generator and viewer dashboards
    Serve {
        /// Listen address (overrides config)
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Run the model, then map its trajectory dump
    Run(RunArgs),

    /// Map an existing trajectory dump
    View {
        /// Trajectory dump file
        tdump: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Start date (YYYY-MM-DD, default today UTC)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Start hour, 0-23 (default current UTC hour)
    #[arg(long)]
    time: Option<u32>,

    #[arg(long, default_value_t = 40.0, allow_hyphen_values = true)]
    lat: f64,

    #[arg(long, default_value_t = -75.0, allow_hyphen_values = true)]
    lon: f64,

    /// Meters above ground
    #[arg(long, default_value_t = 500.0)]
    height: f64,

    /// Run length in hours
    #[arg(long, default_value_t = 24)]
    duration: u32,

    /// forward or backward
    #[arg(long, default_value = "backward")]
    direction: Direction,

    /// GFS, NAM or RAP
    #[arg(long, default_value = "GFS")]
    met: MetType,

    /// Model working directory (overrides config)
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Model executable (overrides config)
    #[arg(long)]
    exec: Option<PathBuf>,

    /// Kill the model after this many seconds (overrides config)
    #[arg(long)]
    timeout: Option<u64>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Map page to write
    #[arg(long, default_value = "trajectory_map.html")]
    html: PathBuf,

    /// Also write the overlay as GeoJSON
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Also write the records as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl OutputArgs {
    fn paths(&self) -> OutputPaths {
        OutputPaths {
            html: Some(self.html.clone()),
            geojson: self.geojson.clone(),
            csv: self.csv.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli);

    let config = ViewerConfig::load(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(async move {
        match cli.command {
            Command::Serve { listen } => serve(config, listen).await,
            Command::Run(args) => run(config, args).await,
            Command::View { tdump, output } => view(config, tdump, output),
        }
    })
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    match cli.command {
        Command::Serve { .. } => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .json()
            .init(),
        _ => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init(),
    }
}

async fn serve(mut config: ViewerConfig, listen: Option<String>) -> Result<()> {
    if let Some(listen) = listen {
        config.listen = listen;
    }

    // Initialize Prometheus metrics exporter
    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!(
        executable = ?config.hysplit.executable,
        working_dir = ?config.hysplit.working_dir,
        "Starting trajectory viewer"
    );

    let state = Arc::new(AppState::new(config, Some(prometheus)));
    trajectory_viewer::start_server(state).await
}

async fn run(mut config: ViewerConfig, args: RunArgs) -> Result<()> {
    if let Some(workdir) = args.workdir {
        config.hysplit.working_dir = workdir;
    }
    if let Some(exec) = args.exec {
        config.hysplit.executable = exec;
    }
    if args.timeout.is_some() {
        config.hysplit.timeout_secs = args.timeout;
    }

    let start = start_time(args.date, args.time, Utc::now().naive_utc())?;
    let control = ControlFile::from_datetime(
        start,
        args.lat,
        args.lon,
        args.height,
        args.duration,
        args.direction,
        args.met,
    );

    let run_id = Uuid::new_v4();
    info!(%run_id, start = %start, "Running model");

    let runner = HysplitRunner::new(config.hysplit.clone());
    let run = runner
        .run(&control)
        .await
        .with_context(|| format!("Model run {} failed", run_id))?;
    info!(%run_id, elapsed_ms = run.elapsed.as_millis() as u64, output = ?run.output_path, "Model finished");

    let rendered = Rendered::from_bytes(&run.tdump, &config.map.style)
        .with_context(|| format!("Failed to read model output {:?}", run.output_path))?;

    let page = PageSettings {
        title: format!(
            "{} trajectory from {:.2}, {:.2} at {}",
            direction_label(args.direction),
            args.lat,
            args.lon,
            start.format("%Y-%m-%d %H:00 UTC")
        ),
        center: (args.lat, args.lon),
        zoom: config.map.zoom,
    };
    rendered.write_outputs(&args.output.paths(), &page)
}

fn view(config: ViewerConfig, tdump: PathBuf, output: OutputArgs) -> Result<()> {
    let bytes =
        std::fs::read(&tdump).with_context(|| format!("Failed to read {:?}", tdump))?;
    let rendered = Rendered::from_bytes(&bytes, &config.map.style)
        .with_context(|| format!("Failed to parse {:?}", tdump))?;

    let page = PageSettings {
        title: format!("Trajectories: {}", tdump.display()),
        center: rendered.center(),
        zoom: config.map.zoom,
    };
    rendered.write_outputs(&output.paths(), &page)
}

fn start_time(date: Option<NaiveDate>, hour: Option<u32>, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let date = date.unwrap_or_else(|| now.date());
    let hour = hour.unwrap_or_else(|| now.hour());
    date.and_hms_opt(hour, 0, 0)
        .with_context(|| format!("Start hour {} is out of range", hour))
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "Forward",
        Direction::Backward => "Backward",
    }
}
