// src/watcher.rs
//! The poll loop: fetch → extract → dedupe → classify → notify, once per
//! fixed interval, forever, until told to stop.

use std::time::Duration;

use metrics::{counter, gauge};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::config::LocationConfig;
use crate::feed::{extract, FeedFetcher, FetchError};
use crate::metrics::ensure_metrics_described;
use crate::notify::Notifier;
use crate::severity::{classify, SeverityTier};
use crate::tracker::OccurrenceTracker;

/// Default start-to-start poll interval.
pub const POLL_INTERVAL: Duration = Duration::from_secs(300);

/// What one cycle did. Returned for logging and tests; every failure mode
/// is folded in here, a cycle never propagates an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No warning this cycle: file absent, document malformed, area summary
    /// missing, or the town not mentioned. Tracker reset.
    NoWarning,
    /// Same bulletin as last time; nothing announced.
    Unchanged,
    /// Novel bulletin announced at this severity.
    Notified(SeverityTier),
    /// Novel bulletin, but a cancellation: tracked, not announced.
    Suppressed,
    /// Transient network failure; tracker untouched, retry at next tick.
    SkippedNetwork,
}

pub struct Watcher<F, N> {
    config: LocationConfig,
    fetcher: F,
    notifier: N,
    tracker: OccurrenceTracker,
    interval: Duration,
}

impl<F: FeedFetcher, N: Notifier> Watcher<F, N> {
    pub fn new(config: LocationConfig, fetcher: F, notifier: N) -> Self {
        ensure_metrics_described();
        Self {
            config,
            fetcher,
            notifier,
            tracker: OccurrenceTracker::new(),
            interval: POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn last_notified(&self) -> Option<&str> {
        self.tracker.last_notified()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// One fetch → extract → observe → classify → notify pass.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        counter!("wxwatch_cycles_total").increment(1);
        gauge!("wxwatch_last_cycle_ts").set(chrono::Utc::now().timestamp() as f64);

        let file = self.config.feed_file();
        let current = match self.fetcher.fetch(file).await {
            Ok(doc) => match extract(&doc, &self.config.town) {
                Ok(occurrence) => occurrence,
                Err(e) => {
                    // Unparseable bulletin reads as "nothing issued".
                    tracing::warn!(error = %e, file, "feed parse failed");
                    counter!("wxwatch_parse_errors_total").increment(1);
                    None
                }
            },
            Err(FetchError::NotFound) => {
                // Normal quiet state: the server drops the file when no
                // warning is current.
                tracing::debug!(file, "no warning file on server");
                None
            }
            Err(FetchError::Network(e)) => {
                tracing::warn!(error = %e, file, "fetch failed, will retry at next tick");
                counter!("wxwatch_fetch_errors_total").increment(1);
                return CycleOutcome::SkippedNetwork;
            }
        };

        let Some(occurrence) = current else {
            self.tracker.observe(None);
            return CycleOutcome::NoWarning;
        };

        if !self.tracker.observe(Some(&occurrence)) {
            tracing::debug!(identity = %occurrence.identity, "warning unchanged");
            return CycleOutcome::Unchanged;
        }

        let severity = classify(&occurrence.title);
        if severity == SeverityTier::AllClear {
            tracing::info!(
                identity = %occurrence.identity,
                title = %occurrence.title,
                "cancellation bulletin, presentation suppressed"
            );
            return CycleOutcome::Suppressed;
        }

        // Exclusive presentation: the loop blocks here until the boundary
        // returns. A failing boundary must not bring the watcher down.
        if let Err(e) = self.notifier.notify(&occurrence, severity).await {
            tracing::warn!(error = ?e, "notification boundary failed");
        }
        counter!("wxwatch_notifications_total").increment(1);
        tracing::info!(
            identity = %occurrence.identity,
            title = %occurrence.title,
            %severity,
            "novel warning notified"
        );
        CycleOutcome::Notified(severity)
    }

    /// Run cycles at the fixed interval until `shutdown` flips to true.
    /// The signal is observed between cycles, never mid-fetch.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            state = %self.config.state,
            town = %self.config.town,
            file = self.config.feed_file(),
            interval_secs = self.interval.as_secs(),
            "watcher started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.run_cycle().await;
                    tracing::debug!(?outcome, "cycle complete");
                }
                changed = shutdown.changed() => {
                    // Err: sender dropped, no further signal can arrive.
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("shutdown signal observed, stopping watcher");
                        return;
                    }
                }
            }
        }
    }
}
