//! covidboard CLI
//!
//! Runs one of the two dashboards, or inspects the configured data.
//!
//! # Configuration
//!
//! `--config <file>`, else `<config_dir>/covidboard/config.toml`, else
//! `./covidboard.toml`, else built-in defaults. `COVIDBOARD_*` environment
//! variables override the file; `--host`/`--port` override both.
//! `RUST_LOG` takes precedence over the configured log level.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use covidboard::api::{serve, AppState};
use covidboard::config::{generate_default_config, Config, LoggingConfig, ServerConfig};
use covidboard::dashboard::cases::cases_dashboard;
use covidboard::dashboard::hospital::hospital_dashboard;
use covidboard::data::{date_label, load_admissions, load_boundaries, CasesDataset};
use covidboard::filters::AGGREGATE_REGION;

#[derive(Parser)]
#[command(name = "covidboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive COVID-19 cases, deaths and hospital admissions dashboards")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the cases & deaths dashboard
    Cases(ServeArgs),

    /// Serve the hospital admissions dashboard
    Hospital(ServeArgs),

    /// Load the datasets and print a summary
    Inspect {
        /// Also load the boundary document and report unmatched regions
        #[arg(long)]
        geo: bool,
    },

    /// Print a default configuration file
    InitConfig,
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    fn apply(&self, server: &ServerConfig) -> ServerConfig {
        ServerConfig::new(
            self.host.clone().unwrap_or_else(|| server.host.clone()),
            self.port.unwrap_or(server.port),
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig = cli.command {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => Config::load_default().context("Failed to load default config")?,
    };

    init_logging(&config.logging);
    tracing::info!("covidboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Data directory: {:?}", config.data.dir);

    match &cli.command {
        Commands::Cases(args) => run_cases(&config, args.apply(&config.cases)).await,
        Commands::Hospital(args) => run_hospital(&config, args.apply(&config.hospital)).await,
        Commands::Inspect { geo } => inspect(&config, *geo).await,
        Commands::InitConfig => Ok(()),
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "covidboard={},tower_http={}",
            logging.level, logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_cases(config: &Config, server: ServerConfig) -> anyhow::Result<()> {
    let data = CasesDataset::load(&config.data).context("Failed to load case tables")?;

    let source = match &config.geo.path {
        Some(path) => format!("{:?}", path),
        None => config.geo.url.clone(),
    };
    tracing::info!(source = %source, "Loading boundary document");
    let boundaries = load_boundaries(&config.geo)
        .await
        .with_context(|| format!("Failed to load boundary document from {}", source))?;

    let dashboard = cases_dashboard(&data, Arc::new(boundaries))
        .context("Failed to build cases dashboard")?;

    serve(AppState::new(dashboard, server)).await?;
    Ok(())
}

async fn run_hospital(config: &Config, server: ServerConfig) -> anyhow::Result<()> {
    let admissions = load_admissions(&config.data).context("Failed to load admissions table")?;

    let dashboard = hospital_dashboard(Arc::new(admissions))
        .context("Failed to build hospital dashboard")?;

    serve(AppState::new(dashboard, server)).await?;
    Ok(())
}

async fn inspect(config: &Config, with_geo: bool) -> anyhow::Result<()> {
    let data = CasesDataset::load(&config.data).context("Failed to load case tables")?;
    let admissions = load_admissions(&config.data).context("Failed to load admissions table")?;
    let boundaries = if with_geo {
        Some(
            load_boundaries(&config.geo)
                .await
                .context("Failed to load boundary document")?,
        )
    } else {
        None
    };

    println!(
        "{:<16} {:>6} {:>8}  {:<23}  {}",
        "TABLE", "ROWS", "REGIONS", "DATES", AGGREGATE_REGION
    );
    for table in data.tables() {
        let dates = table.unique_dates();
        let span = match (dates.first(), dates.last()) {
            (Some(first), Some(last)) => {
                format!("{} .. {}", date_label(*first), date_label(*last))
            }
            _ => "-".to_string(),
        };
        println!(
            "{:<16} {:>6} {:>8}  {:<23}  {}",
            table.name(),
            table.len(),
            table.regions().len(),
            span,
            if table.has_region(AGGREGATE_REGION) {
                "yes"
            } else {
                "no"
            }
        );
    }

    println!();
    println!(
        "admissions: {} rows, {} entities, value column {:?}",
        admissions.len(),
        admissions.entities().len(),
        admissions.value_column()
    );

    if let Some(boundaries) = boundaries {
        let unmatched: Vec<&str> = data
            .total_cases
            .regions()
            .iter()
            .map(String::as_str)
            .filter(|r| *r != AGGREGATE_REGION && !boundaries.contains(r))
            .collect();

        println!();
        println!(
            "boundaries: {} features, {} named",
            boundaries.feature_count(),
            boundaries.names().count()
        );
        println!("regions without a boundary ({}):", unmatched.len());
        for region in unmatched {
            println!("  {}", region);
        }
    }

    Ok(())
}
