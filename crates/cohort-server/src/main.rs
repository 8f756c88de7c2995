//! Cohort server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), applies
//! `COHORT_*` environment overrides, and serves the engagement API over
//! HTTP with the scheduler cadence running alongside.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use cohort_api::ApiState;
use cohort_core::clock::SystemClock;
use cohort_engine::scheduler::{CancelHandle, FollowUpConfig};
use cohort_server::{LogNotifier, ServerConfig};
use cohort_store_mem::MemStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cohort engagement server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("COHORT"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let follow_up = FollowUpConfig {
    threshold_days: server_cfg.follow_up_threshold_days,
    max_follow_ups: server_cfg.max_follow_ups,
  };

  // Build application state over the in-process store.
  let state = ApiState::new(
    Arc::new(MemStore::new()),
    Arc::new(LogNotifier),
    Arc::new(SystemClock),
    follow_up,
  );

  // Scheduler cadence shares the pass gates with the manual job triggers.
  let cancel = CancelHandle::new();
  tokio::spawn(cohort_server::scheduler_cadence(
    state.scheduler(),
    state.follow_up_config(),
    Duration::from_secs(server_cfg.scheduler_interval_secs),
    cancel.clone(),
  ));

  let app = cohort_server::app(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  cancel.cancel();
  Ok(())
}
