use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
///
/// Only one recorder can be installed per process; a second call fails.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("rate_refresh_total").absolute(0);
    counter!("rate_refresh_failures_total").absolute(0);
    counter!("simulated_bets_total").absolute(0);
    counter!("duplicate_bet_references_total").absolute(0);
    counter!("unknown_outcome_total").absolute(0);

    gauge!("bch_usd_rate").set(0.0);

    // Histogram is lazily created on first record; force creation.
    histogram!("rate_fetch_latency_seconds").record(0.0);

    Ok(handle)
}

/// A handle backed by a recorder that is never installed globally. Renders
/// an empty payload; used where a real exporter is not wanted, such as tests.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
