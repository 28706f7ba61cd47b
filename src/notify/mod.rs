// src/notify/mod.rs
pub mod discord;
pub mod slack;

use anyhow::Result;

use crate::feed::WarningOccurrence;
use crate::severity::SeverityTier;

/// Notification boundary. The watcher awaits a notifier to completion before
/// scheduling the next cycle: one presentation at a time, matching the
/// single-slot occurrence model.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, occurrence: &WarningOccurrence, severity: SeverityTier) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Operator-log channel; always on, so a headless deployment with no
/// webhooks configured still records every alert.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, occurrence: &WarningOccurrence, severity: SeverityTier) -> Result<()> {
        tracing::info!(
            target: "alert",
            severity = %severity,
            identity = %occurrence.identity,
            title = %occurrence.title,
            message = %occurrence.message,
            "weather warning"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Fan-out over the configured channels. Sends sequentially; a failing
/// channel is logged and does not block the others or fail the cycle.
pub struct NotifierMux {
    channels: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Build from the environment: log always, Discord when
    /// DISCORD_WEBHOOK_URL is set, Slack when SLACK_WEBHOOK_URL is set.
    pub fn from_env() -> Self {
        let mut channels: Vec<Box<dyn Notifier>> = vec![Box::new(LogNotifier)];
        if let Ok(url) = std::env::var("DISCORD_WEBHOOK_URL") {
            channels.push(Box::new(discord::DiscordNotifier::new(url)));
        }
        if std::env::var("SLACK_WEBHOOK_URL").is_ok() {
            channels.push(Box::new(slack::SlackNotifier::from_env()));
        }
        Self { channels }
    }
}

#[async_trait::async_trait]
impl Notifier for NotifierMux {
    async fn notify(&self, occurrence: &WarningOccurrence, severity: SeverityTier) -> Result<()> {
        for ch in &self.channels {
            if let Err(e) = ch.notify(occurrence, severity).await {
                tracing::warn!(channel = ch.name(), error = ?e, "notifier failed");
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mux"
    }
}
