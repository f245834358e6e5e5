//! `weft serve` — run the HTTP API.
//!
//! Configuration comes from a TOML file (default `weft.toml`, optional) and
//! `WEFT_`-prefixed environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use tokio::net::TcpListener;
use weft_api::AppState;

#[derive(Debug, Args)]
pub struct ServeArgs {
  /// Path to the server TOML configuration file.
  #[arg(long = "server-config", value_name = "FILE", default_value = "weft.toml")]
  pub config: PathBuf,
}

/// Runtime server configuration, deserialised from the config file and
/// environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeConfig {
  pub host:       String,
  pub port:       u16,
  /// Overrides the CLI-level store path when set.
  pub store_path: Option<PathBuf>,
}

pub async fn run(args: ServeArgs, default_store: PathBuf) -> Result<()> {
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 5530i64)?
    .add_source(config::File::from(args.config).required(false))
    .add_source(config::Environment::with_prefix("WEFT"))
    .build()
    .context("failed to read server config")?;
  let server_cfg: ServeConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServeConfig")?;

  let store_path = server_cfg.store_path.unwrap_or(default_store);
  let store = crate::open_store(&store_path).await?;

  let app = weft_api::api_router(AppState::new(store));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
