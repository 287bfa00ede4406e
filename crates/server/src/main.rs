use std::sync::Arc;

use basket_common::SystemClock;
use basket_server::config;
use basket_server::ledger::ActivityLedger;
use basket_server::metrics::MetricsRegistry;
use basket_server::monitor::{AbandonmentMonitor, MonitorTask};
use basket_server::rest::{self, AppState};
use basket_server::service::BasketService;
use basket_server::shutdown::wait_for_shutdown;
use basket_server::store::InMemoryBasketStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = config::load_from_env()?;
    tracing::info!(
        rest_addr = %config.rest_addr,
        monitor_enabled = config.monitor.enabled,
        period_s = config.monitor.period_seconds,
        threshold_s = config.monitor.abandonment_threshold_seconds,
        "basket service configured"
    );

    let registry = MetricsRegistry::new();
    let ledger = ActivityLedger::new();
    let clock = Arc::new(SystemClock);
    let baskets = BasketService::new(
        Arc::new(InMemoryBasketStore::new()),
        ledger.clone(),
        registry.clone(),
        clock.clone(),
    );

    let monitor = config.monitor.enabled.then(|| {
        MonitorTask {
            period: config.monitor.period(),
            monitor: AbandonmentMonitor::new(
                ledger,
                registry.clone(),
                clock,
                config.monitor.abandonment_threshold(),
            ),
        }
        .spawn()
    });

    let app = rest::router(AppState { baskets, registry });
    let listener = tokio::net::TcpListener::bind(config.rest_addr).await?;
    tracing::info!(addr = %config.rest_addr, "REST server starting");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    if let Some(handle) = monitor {
        handle.stop().await;
    }
    tracing::info!("basket service stopped");
    Ok(())
}
