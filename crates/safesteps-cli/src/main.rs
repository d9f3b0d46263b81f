//! `safesteps`: an interactive shell over the SafeSteps app core.
//!
//! Reads `safesteps.toml` (or the path given with `--config`), opens the
//! SQLite store, and drives the app with simulated device adapters.
//!
//! # Usage
//!
//! ```
//! safesteps --data ~/.local/share/safesteps.db
//! SAFESTEPS_DENY_LOCATION=true safesteps
//! ```

mod command;
mod render;
mod settings;
mod shell;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use safesteps_app::{
  Adapters, App,
  sim::{Permission, Simulated, SimulatedAuth, SimulatedGeolocation, SimulatedRecognizer, SpeechLog},
};
use safesteps_core::{
  clock::{Clock, SystemClock},
  position::Position,
};
use safesteps_store_sqlite::SqliteStorage;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ShellConfig;

#[derive(Parser)]
#[command(name = "safesteps", version, about = "SafeSteps personal-safety shell")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "safesteps.toml")]
  config: PathBuf,

  /// SQLite file to use instead of the configured `storage_path`.
  #[arg(long, value_name = "FILE")]
  data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so they do not interleave with the shell's output.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let sources = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SAFESTEPS"))
    .build()
    .context("failed to read config file")?;

  let mut cfg: ShellConfig = sources
    .try_deserialize()
    .context("failed to deserialise ShellConfig")?;
  if let Some(data) = cli.data {
    cfg.storage_path = data;
  }

  let storage = if cfg.storage_path == Path::new(":memory:") {
    SqliteStorage::open_in_memory().await
  } else {
    SqliteStorage::open(expand_tilde(&cfg.storage_path)).await
  }
  .with_context(|| format!("failed to open store at {:?}", cfg.storage_path))?;

  let (app, events) = App::load(adapters(&cfg, storage))
    .await
    .context("failed to load app state")?;
  tracing::info!(store = ?cfg.storage_path, "safesteps ready");

  shell::run(app, events).await
}

fn adapters(cfg: &ShellConfig, storage: SqliteStorage) -> Adapters<Simulated<SqliteStorage>> {
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let origin = Position::new(cfg.origin_latitude, cfg.origin_longitude, clock.now_millis())
    .with_accuracy(cfg.origin_accuracy);
  let permission = if cfg.deny_location { Permission::Denied } else { Permission::Granted };

  Adapters {
    storage: Arc::new(storage),
    geolocation: SimulatedGeolocation::new(origin, clock.clone())
      .with_latency(cfg.location_latency())
      .with_interval(cfg.watch_interval())
      .with_permission(permission),
    auth: SimulatedAuth::new(cfg.auth_latency(), cfg.biometric_latency(), clock.clone()),
    recognizer: SimulatedRecognizer::random(cfg.recognition_latency()),
    speech: SpeechLog::default(),
    clock,
    locale: cfg.locale.clone(),
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
