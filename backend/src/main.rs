//! Backend entry-point: loads settings and runs the comments server.

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use post_comments::inbound::http::health::HealthState;
use post_comments::server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args: Vec<OsString> = std::env::args_os().collect();
    let settings = AppSettings::load_from_iter(args)
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let config = ServerConfig::try_from(&settings).map_err(std::io::Error::other)?;
    if config.session_tokens.is_empty() {
        warn!("no session tokens configured; every WebSocket upgrade will be rejected");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &config)?;
    info!(bind_addr = %config.bind_addr, "post comments server listening");
    server.await
}
