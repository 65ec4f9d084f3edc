//! Aula portal auth server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens
//! the SQLite store, and serves the handshake endpoints over HTTP.
//!
//! # Provisioning
//!
//! Admin credentials are created once and never updated:
//!
//! ```text
//! cargo run -p aula-server --bin server -- --provision-admin admin@x.com
//! ```
//!
//! `--hash-password` prints a bare argon2 PHC string instead, for
//! seeding a database out of band.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use aula_core::password;
use aula_server::{
  AppState, ServerConfig, mail::HttpMailer, sessions::MemorySessions, sweep,
};
use aula_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Aula portal auth server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Insert an admin credential (password read from stdin) and exit.
  #[arg(long, value_name = "IDENTIFIER")]
  provision_admin: Option<String>,
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

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let hash = password::hash(&password).context("cannot hash password")?;
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AULA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;

  // Helper mode: provision an admin and exit.
  if let Some(identifier) = cli.provision_admin {
    let password = read_password()?;
    let hash = password::hash(&password).context("cannot hash password")?;
    store
      .provision_admin(&identifier, &hash)
      .await
      .context("provisioning failed")?;
    tracing::info!(%identifier, "admin provisioned");
    return Ok(());
  }

  // Flag the security-relevant degraded modes at startup.
  if server_cfg.mail.is_none() {
    tracing::warn!("mail is not configured; passcode delivery is degraded");
  }
  if server_cfg.allow_insecure_otp_fallback {
    tracing::warn!(
      "insecure OTP fallback enabled: passcodes will be returned in \
       login responses when mail delivery fails"
    );
  }

  // Build application state.
  let store = Arc::new(store);
  let sessions = Arc::new(MemorySessions::with_default_ttl());
  let mailer = Arc::new(HttpMailer::from_config(server_cfg.mail.clone()));

  // Periodically drop expired sessions and passcodes whose keys are
  // never presented again.
  sweep::spawn(
    Arc::clone(&sessions),
    Arc::clone(&store),
    sweep::DEFAULT_PERIOD,
  );

  let state = AppState::new(store, sessions, mailer, server_cfg.clone());

  let app = aula_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
