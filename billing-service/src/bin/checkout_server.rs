use anyhow::Context;
use billing_service::{api, BillingService, BillingSettings};
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

/// DermCare checkout summary server
#[derive(Parser, Debug)]
#[command(name = "checkout-server")]
#[command(about = "Serves checkout charge summaries for dermatology encounters")]
struct Args {
    /// Settings file (YAML or TOML)
    #[arg(short, long, env = "CHECKOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address, overrides `server.bind_address`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = BillingSettings::load(args.config.as_deref())
        .context("failed to load billing settings")?;
    logger_redacted::init(&settings.logging).context("failed to initialize logging")?;

    let service =
        BillingService::from_settings(&settings).context("invalid billing configuration")?;
    let app = api::router(Arc::new(service));

    let bind_address = args.bind.unwrap_or_else(|| settings.server.bind_address.clone());
    let listener = TcpListener::bind(bind_address.as_str())
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!(address = %bind_address, "Checkout server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
