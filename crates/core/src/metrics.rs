//! Prometheus metrics for the failover fetcher.
//!
//! Registered into the server's registry at startup; see `register`.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

/// Attempts against individual mirrors by outcome.
pub static MIRROR_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "mirrortube_mirror_attempts_total",
            "Total attempts against individual mirrors",
        ),
        &["capability", "outcome"],
    )
    .unwrap()
});

/// Mirrors moved to the back of their queue.
pub static MIRROR_DEMOTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "mirrortube_mirror_demotions_total",
            "Total mirror demotions",
        ),
        &["capability"],
    )
    .unwrap()
});

/// Duration of a whole fetch across mirrors.
pub static FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "mirrortube_fetch_duration_seconds",
            "Duration of a failover fetch across all attempted mirrors",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 7.5, 10.0, 15.0]),
        &["capability", "result"], // "success", "exhausted", "no_mirrors"
    )
    .unwrap()
});

/// Register all core metrics with `registry`.
pub fn register(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(MIRROR_ATTEMPTS.clone()))?;
    registry.register(Box::new(MIRROR_DEMOTIONS.clone()))?;
    registry.register(Box::new(FETCH_DURATION.clone()))?;
    Ok(())
}
