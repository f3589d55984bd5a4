//! quake-sentinel binary entrypoint.
//! Wires config, the selected source adapter, the dedup store, and the
//! Telegram sink into the polling scheduler, then runs until ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quake_sentinel::config::{AppConfig, SourceKind};
use quake_sentinel::dedup::MemoryDedupStore;
use quake_sentinel::ingest::providers::{seismic_portal, tmd_bulletin};
use quake_sentinel::ingest::types::SourceProvider;
use quake_sentinel::notify::telegram::TelegramNotifier;
use quake_sentinel::scheduler::{PollScheduler, SchedulerCfg};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quake_sentinel=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// Install the Prometheus recorder; with an address configured, the
/// exporter serves `/metrics` on its own listener.
fn init_metrics(cfg: &AppConfig) -> Result<()> {
    let builder = PrometheusBuilder::new();
    match cfg.metrics_addr {
        Some(addr) => builder
            .with_http_listener(addr)
            .install()
            .context("prometheus: install exporter")?,
        None => {
            let _ = builder
                .install_recorder()
                .context("prometheus: install recorder")?;
        }
    }
    Ok(())
}

fn build_provider(cfg: &AppConfig) -> Box<dyn SourceProvider> {
    match cfg.source {
        SourceKind::SeismicPortal => {
            let url = cfg
                .feed_url
                .clone()
                .unwrap_or_else(|| seismic_portal::DEFAULT_URL.to_string());
            Box::new(seismic_portal::SeismicPortalProvider::from_url(
                url,
                cfg.bounding_box,
            ))
        }
        SourceKind::TmdBulletin => {
            let url = cfg
                .bulletin_url
                .clone()
                .unwrap_or_else(|| tmd_bulletin::DEFAULT_URL.to_string());
            Box::new(tmd_bulletin::TmdBulletinProvider::from_url(url))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load().context("loading configuration")?;
    init_metrics(&cfg)?;

    let provider = build_provider(&cfg);
    let notifier = TelegramNotifier::from_env();
    if !notifier.is_configured() {
        warn!("Telegram credentials missing (TELEGRAM_TOKEN/CHAT_ID); alerts will be dropped");
    }
    let store = Arc::new(MemoryDedupStore::new());

    let scheduler_cfg = SchedulerCfg {
        interval: Duration::from_secs(cfg.interval_secs()),
        dedup_ttl: Duration::from_secs(cfg.dedup_ttl_secs()),
    };
    info!(
        source = ?cfg.source,
        interval_secs = cfg.interval_secs(),
        min_magnitude = cfg.min_magnitude(),
        "starting poll loop"
    );

    let scheduler = PollScheduler::new(
        scheduler_cfg,
        provider,
        cfg.policy(),
        store,
        Box::new(notifier),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut handle = tokio::spawn(scheduler.run(shutdown_rx));

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown signal received, draining in-flight cycle");
    let _ = shutdown_tx.send(true);

    let grace = Duration::from_secs(cfg.shutdown_grace_secs());
    if tokio::time::timeout(grace, &mut handle).await.is_err() {
        warn!("grace period elapsed, abandoning in-flight cycle");
        handle.abort();
    }

    info!("stopped");
    Ok(())
}
