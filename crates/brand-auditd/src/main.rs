use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use brand_audit_core::{AuditConfig, AuditInvoker, METRICS};

mod routes;

#[derive(Parser)]
#[command(name = "brand-auditd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the brand audit pipeline over HTTP", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BRAND_AUDITD_BIND", default_value = "127.0.0.1:8787")]
    bind: SocketAddr,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    brand_audit_core::init_tracing(args.json_logs, level);

    let config = AuditConfig::from_env().context("Failed to load audit configuration")?;
    if !config.has_credential() {
        tracing::warn!("GEMINI_API_KEY is not set; audits will answer 500 CONFIGURATION ERROR");
    }
    tracing::info!(models = ?config.models, deadline_s = config.deadline.as_secs(), "audit config loaded");

    let invoker = AuditInvoker::gemini(config).context("Failed to create model client")?;
    let app = routes::router(routes::AppState {
        auditor: Arc::new(invoker),
    });

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    tracing::info!("brand-auditd listening on http://{}", args.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    METRICS.flush();
    tracing::info!("brand-auditd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
