// src/ingest/mod.rs
pub mod providers;
pub mod types;

use std::time::Duration;

use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::dedup::DedupStore;
use crate::error::FetchError;
use crate::format::render_alert;
use crate::ingest::types::{RawRecord, SourceProvider};
use crate::normalize::{normalize, reference_offset};
use crate::notify::Notifier;
use crate::relevance::{is_relevant, RelevancePolicy};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_events_total", "Raw records fetched from sources.");
        describe_counter!(
            "ingest_dropped_total",
            "Records dropped by normalization (no identifier)."
        );
        describe_counter!(
            "ingest_irrelevant_total",
            "Events rejected by the relevance policy."
        );
        describe_counter!(
            "dedup_hits_total",
            "Events suppressed as already-notified duplicates."
        );
        describe_counter!("store_errors_total", "Dedup store failures.");
        describe_counter!("notify_sent_total", "Alerts delivered to the sink.");
        describe_counter!("notify_errors_total", "Alert sends that failed.");
        describe_counter!("fetch_errors_total", "Source fetches that failed.");
        describe_counter!("poll_cycles_total", "Poll cycles started.");
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last completed a batch."
        );
        describe_gauge!(
            "poll_cycle_state",
            "Scheduler state: 0 idle, 1 fetching, 2 processing."
        );
    });
}

/// Per-batch outcome counts, logged by the scheduler after every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub fetched: usize,
    /// Normalization failures (record skipped, siblings unaffected).
    pub dropped: usize,
    pub irrelevant: usize,
    pub duplicates: usize,
    pub notified: usize,
    pub store_errors: usize,
    pub send_errors: usize,
}

/// Process one fetched batch: normalize, filter, dedup-check, format,
/// notify. Never fails; every per-record error is counted in the stats and
/// the rest of the batch continues.
pub async fn process_batch(
    raw: Vec<RawRecord>,
    policy: &RelevancePolicy,
    store: &dyn DedupStore,
    notifier: &dyn Notifier,
    dedup_ttl: Duration,
) -> CycleStats {
    ensure_metrics_described();

    let fetched_at = Utc::now().with_timezone(&reference_offset());
    let mut stats = CycleStats {
        fetched: raw.len(),
        ..CycleStats::default()
    };
    counter!("ingest_events_total").increment(raw.len() as u64);

    for record in &raw {
        let event = match normalize(record, fetched_at) {
            Ok(ev) => ev,
            Err(e) => {
                stats.dropped += 1;
                counter!("ingest_dropped_total").increment(1);
                tracing::debug!(target: "ingest", error = %e, "record dropped");
                continue;
            }
        };

        if !is_relevant(&event, policy) {
            stats.irrelevant += 1;
            counter!("ingest_irrelevant_total").increment(1);
            continue;
        }

        match store.check_and_mark(&event.id, dedup_ttl).await {
            Ok(true) => {}
            Ok(false) => {
                stats.duplicates += 1;
                counter!("dedup_hits_total").increment(1);
                tracing::debug!(target: "ingest", id = %event.id, "duplicate suppressed");
                continue;
            }
            Err(e) => {
                // Not marked seen: the record stays eligible next cycle.
                stats.store_errors += 1;
                counter!("store_errors_total").increment(1);
                tracing::warn!(
                    target: "ingest",
                    error = %e,
                    id = %event.id,
                    "dedup store unavailable, skipping notification"
                );
                continue;
            }
        }

        let text = render_alert(&event, policy.center);
        match notifier.send(&text).await {
            Ok(()) => {
                stats.notified += 1;
                counter!("notify_sent_total").increment(1);
                tracing::info!(
                    target: "ingest",
                    id = %event.id,
                    region = %event.region,
                    magnitude = ?event.magnitude,
                    "alert sent"
                );
            }
            Err(e) => {
                stats.send_errors += 1;
                counter!("notify_errors_total").increment(1);
                tracing::warn!(
                    target: "ingest",
                    error = %e,
                    id = %event.id,
                    "notification failed, not retried"
                );
            }
        }
    }

    gauge!("pipeline_last_run_ts").set(Utc::now().timestamp().max(0) as f64);
    stats
}

/// Run one full cycle against a provider. A fetch failure aborts the cycle
/// (no partial processing); the caller logs it and waits for the next tick.
pub async fn run_cycle(
    provider: &dyn SourceProvider,
    policy: &RelevancePolicy,
    store: &dyn DedupStore,
    notifier: &dyn Notifier,
    dedup_ttl: Duration,
) -> Result<CycleStats, FetchError> {
    ensure_metrics_described();
    let raw = provider.fetch_latest().await?;
    Ok(process_batch(raw, policy, store, notifier, dedup_ttl).await)
}
