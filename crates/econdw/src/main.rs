//! econdw binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! warehouse, and either runs an ingestion backfill or serves the read API.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use econdw::{AppConfig, expand_tilde};
use econdw_etl::{Resolver, RunReport};
use econdw_store_sqlite::SqliteStore;
use econdw_worldbank::WorldBankClient;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Macroeconomic indicator warehouse")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Backfill every year of each country's configured history.
  PopulateHistory,
  /// Store the most recent value of each (country, indicator) under one
  /// reference year.
  PopulateLatest {
    /// Year the values are filed under. Defaults to the configured reference
    /// year, then the window's max year.
    #[arg(long)]
    reference_year: Option<i32>,
  },
  /// Serve the dashboard and export API.
  Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = AppConfig::load(cli.config.clone())
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::PopulateHistory => {
      let report = ingest(&cfg, &store, None).await?;
      summarize(&report);
    }
    Command::PopulateLatest { reference_year } => {
      let reference = cfg.reference_year(reference_year)?;
      let report = ingest(&cfg, &store, Some(reference)).await?;
      summarize(&report);
    }
    Command::Serve => serve(&cfg, store).await?,
  }

  Ok(())
}

async fn ingest(
  cfg: &AppConfig,
  store: &SqliteStore,
  reference: Option<econdw_core::year::Year>,
) -> anyhow::Result<RunReport> {
  let client =
    WorldBankClient::new(cfg.client_config()).context("failed to build HTTP client")?;
  let catalog = cfg.catalog();
  let provider = cfg.source_spec();
  let resolver = Resolver::new(store, &client, &catalog, &provider, cfg.run_options()?);

  let report = match reference {
    None => resolver.run_historical().await,
    Some(year) => resolver.run_latest(year).await,
  }
  .context("backfill aborted")?;
  Ok(report)
}

fn summarize(report: &RunReport) {
  tracing::info!(
    run_id = %report.run_id,
    mode = %report.mode,
    written = report.facts_written(),
    "run complete",
  );
  for missing in &report.missing {
    tracing::info!(iso = %missing.iso, indicator = %missing.indicator, "no data in window");
  }
}

async fn serve(cfg: &AppConfig, store: SqliteStore) -> anyhow::Result<()> {
  let app = econdw::app(Arc::new(store), &cfg.dashboard.chart_country);
  let address = format!("{}:{}", cfg.server.host, cfg.server.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
