// src/metrics.rs
use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("wxwatch_cycles_total", "Poll cycles started.");
        describe_counter!(
            "wxwatch_fetch_errors_total",
            "Cycles skipped on network failure."
        );
        describe_counter!(
            "wxwatch_parse_errors_total",
            "Feed documents rejected as malformed."
        );
        describe_counter!(
            "wxwatch_notifications_total",
            "Novel warnings handed to the notification boundary."
        );
        describe_gauge!(
            "wxwatch_last_cycle_ts",
            "Unix ts when the last poll cycle ran."
        );
    });
}

/// Install the Prometheus recorder when WXWATCH_METRICS_ADDR is set
/// (e.g. `127.0.0.1:9000`). Without it, metric macros stay no-ops.
pub fn init_from_env() {
    let Ok(addr) = std::env::var("WXWATCH_METRICS_ADDR") else {
        return;
    };
    let addr: std::net::SocketAddr = match addr.parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(error = %e, addr, "invalid WXWATCH_METRICS_ADDR, metrics disabled");
            return;
        }
    };
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        tracing::warn!(error = %e, "prometheus exporter install failed, metrics disabled");
        return;
    }
    ensure_metrics_described();
    tracing::info!(%addr, "prometheus exporter listening");
}
