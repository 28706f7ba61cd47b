//! wxwatch — Binary Entrypoint
//! Boots the background warning watcher: config, tracing, metrics, and the
//! poll loop with a ctrl-c shutdown signal.

use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wxwatch::{FtpFeedFetcher, NotifierMux, Watcher, POLL_INTERVAL};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wxwatch=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn poll_interval() -> Duration {
    std::env::var("WXWATCH_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(POLL_INTERVAL)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();
    wxwatch::metrics::init_from_env();

    let config = wxwatch::config::load_default()?;
    tracing::info!(
        state = %config.state,
        town = %config.town,
        file = config.feed_file(),
        "monitoring location"
    );

    let watcher = Watcher::new(config, FtpFeedFetcher::new(), NotifierMux::from_env())
        .with_interval(poll_interval());

    // Ctrl-c flips the shutdown flag; the loop observes it between cycles.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    watcher.run(shutdown_rx).await;
    Ok(())
}
