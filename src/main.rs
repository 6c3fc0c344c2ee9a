mod config;
mod harvester;
mod merger;
mod model;
mod normalizer;
mod parser;
mod scraper;
mod storage;
mod utils;

use clap::Parser as _;
use config::{load_config, AppConfig};
use harvester::{build_product_database, HarvestOptions};
use parser::ControlPanelParser;
use scraper::{CatalogSource, ControlPanelSource, LocalCatalog, QcyClient};
use std::path::PathBuf;
use std::process::ExitCode;
use storage::JsonStorage;
use tracing::{error, info};

/// Dump the QCY product catalog merged with per-product control panel features.
#[derive(Debug, clap::Parser)]
#[command(version)]
struct Cli {
    /// Directory for products.json and products_raw.json
    #[arg(long, default_value = "scripts/output")]
    output_dir: PathBuf,

    /// Do not request control panels
    #[arg(long)]
    skip_panels: bool,

    /// Read the catalog from --local-path instead of the server
    #[arg(long)]
    local_only: bool,

    /// Catalog JSON used with --local-only
    #[arg(long, default_value = "tmp/resources/package_1/res/raw/qcy_earphone.json")]
    local_path: PathBuf,

    /// JSON config overriding API endpoint, headers and timeouts
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    match run(&cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = QcyClient::new(config.clone())?;
    let local = LocalCatalog::new(&cli.local_path);
    let catalog: &dyn CatalogSource = if cli.local_only { &local } else { &client };

    // Nothing is written when the catalog cannot be obtained
    let raw = catalog.fetch_catalog().await?;
    let storage = JsonStorage::new(&cli.output_dir)?;

    if catalog.is_remote() {
        let path = storage.save_raw(&raw)?;
        info!("Saved raw response to {}", path.display());
    }

    let panels: Option<&dyn ControlPanelSource> = if cli.skip_panels { None } else { Some(&client) };
    let options = HarvestOptions {
        panel_delay: config.panel_delay(),
        firmware_version: config.firmware_version.clone(),
    };

    let products = build_product_database(&raw, panels, &ControlPanelParser::new(), &options).await;

    let path = storage.save_products(&products)?;
    info!("Saved {} products to {}", products.len(), path.display());
    Ok(())
}
