//! Serve command - run the HTTP upload endpoint.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use passport_photo_adapters::{gateways, AzureCredentials};
use passport_photo_core::PhotoAnalyser;
use tokio::net::TcpListener;
use tracing::{debug, info};

use super::{parse_positive, GatewayArgs, RuleArgs};
use crate::config::AppConfig;
use crate::http;

/// Hardcoded server defaults.
mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 5050;
    pub const MAX_UPLOAD_MB: u64 = 16;
}

/// Arguments for `serve`.
#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long)]
    pub port: Option<u16>,

    /// Maximum upload size in megabytes
    #[arg(long, value_parser = parse_positive)]
    pub max_upload_mb: Option<u64>,

    #[command(flatten)]
    pub rules: RuleArgs,

    #[command(flatten)]
    pub gateway: GatewayArgs,
}

impl ServeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    #[must_use]
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.host.is_none() {
            args.host.clone_from(&config.server.host);
        }
        args.port = args.port.or(config.server.port);
        args.max_upload_mb = args.max_upload_mb.or(config.server.max_upload_mb);
        args
    }

    fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(defaults::HOST)
    }

    fn port(&self) -> u16 {
        self.port.unwrap_or(defaults::PORT)
    }

    /// Upload limit in bytes.
    fn max_upload_bytes(&self) -> usize {
        let mb = self.max_upload_mb.unwrap_or(defaults::MAX_UPLOAD_MB);
        usize::try_from(mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

/// Run the serve command. Blocks until Ctrl-C.
///
/// Expects `args` to have been processed through `with_config()` first.
///
/// # Errors
///
/// Returns an error if credentials are missing, thresholds are inconsistent,
/// the address cannot be bound or the server fails.
pub fn run(args: &ServeArgs, config: &AppConfig) -> Result<()> {
    let thresholds = args.rules.thresholds(&config.rules)?;
    let settings = args.gateway.settings(&config.gateway);
    let credentials = AzureCredentials::from_env()?;
    debug!(?credentials, "Credentials loaded");

    // Built before the runtime: the blocking HTTP client must not be created
    // or dropped on an async worker thread.
    let analyser = Arc::new(PhotoAnalyser::new(
        gateways(&credentials, settings).context("Failed to set up gateway clients")?,
        thresholds,
    ));
    let app = http::router(Arc::clone(&analyser), args.max_upload_bytes());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let addr = format!("{}:{}", args.host(), args.port());
    runtime.block_on(async {
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {addr}"))?;
        info!(
            "Listening on http://{} (max upload {} bytes)",
            listener.local_addr().context("Failed to read bound address")?,
            args.max_upload_bytes()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")
    })?;

    drop(runtime);
    drop(analyser);
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
