//! Upload server for the credit risk flag rules.
//!
//! Environment:
//! - `PORT`: listen port (default 5000)
//! - `RISK_RULES_PATH`: optional JSON rule config overriding the default thresholds

use anyhow::{Context, Result};
use credit_risk_flags::server::{router, AppState};
use credit_risk_flags::RuleConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("credit_risk_flags=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    let config = match std::env::var("RISK_RULES_PATH") {
        Ok(path) => {
            info!("Loading rule config from {}", path);
            RuleConfig::from_path(&path)
                .with_context(|| format!("failed to load rule config from {}", path))?
        }
        Err(_) => RuleConfig::default(),
    };

    info!(
        "Thresholds: min ISCR {}, min revenue {}, max borrowing/revenue {}",
        config.thresholds.min_iscr,
        config.thresholds.min_revenue,
        config.thresholds.max_borrowing_to_revenue
    );

    let app = router(Arc::new(AppState::new(config)));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting risk flag server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
