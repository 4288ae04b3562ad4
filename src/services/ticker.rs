//! Ticker service: publishes the current time to a topic on a fixed interval.
//!
//! Feeds the `newMessage` subscription. The loop runs in a background task
//! between [start](Service::start) and [stop](Service::stop).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::services::manager::{Service, ServiceHealth};
use crate::services::pubsub::PubSub;

/// Configuration for the ticker service.
#[derive(Debug, Clone)]
pub struct TickerConfig {
    pub interval: Duration,
    pub topic: String,
}

impl From<&Config> for TickerConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval: config.tick_interval,
            topic: config.message_topic.clone(),
        }
    }
}

struct TickerRuntime {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct TickerService {
    pubsub: Arc<PubSub>,
    config: TickerConfig,
    runtime: parking_lot::Mutex<Option<TickerRuntime>>,
}

impl TickerService {
    pub fn new(pubsub: Arc<PubSub>, config: TickerConfig) -> Self {
        Self {
            pubsub,
            config,
            runtime: parking_lot::Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.runtime
            .lock()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }
}

#[async_trait]
impl Service for TickerService {
    fn name(&self) -> &str {
        "ticker"
    }

    async fn start(&self) -> Result<()> {
        let mut runtime = self.runtime.lock();
        if runtime.is_some() {
            return Ok(());
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(tick_loop(
            self.pubsub.clone(),
            self.config.clone(),
            cancel.clone(),
        ));
        *runtime = Some(TickerRuntime { cancel, handle });

        info!(
            service = "ticker",
            topic = %self.config.topic,
            interval_ms = self.config.interval.as_millis() as u64,
            "Ticker started"
        );
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let previous = self.runtime.lock().take();
        if let Some(runtime) = previous {
            runtime.cancel.cancel();
            let _ = runtime.handle.await;
            info!(service = "ticker", "Ticker stopped");
        }
        Ok(())
    }

    async fn health(&self) -> Result<ServiceHealth> {
        if self.is_running() {
            Ok(ServiceHealth::healthy())
        } else {
            Ok(ServiceHealth::degraded("ticker not running"))
        }
    }
}

async fn tick_loop(pubsub: Arc<PubSub>, config: TickerConfig, cancel: CancellationToken) {
    // First publish happens one interval after start.
    let mut interval = tokio::time::interval_at(Instant::now() + config.interval, config.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let delivered = pubsub.publish(&config.topic, render_timestamp(&Local::now()));
                debug!(service = "ticker", topic = %config.topic, delivered, "Tick published");
            }
        }
    }
}

/// Render a timestamp as text, e.g. `Mon Oct 19 2026 14:03:07 GMT+0200`.
///
/// Browser-style `Date` strings end with a ` (Zone Name)` suffix. That is left
/// off: chrono only knows the numeric offset for local and fixed-offset times.
pub fn render_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use futures::StreamExt;
    use tokio::time::timeout;

    use super::*;

    fn ticker(pubsub: &Arc<PubSub>, interval_ms: u64) -> TickerService {
        TickerService::new(
            pubsub.clone(),
            TickerConfig {
                interval: Duration::from_millis(interval_ms),
                topic: "clock".to_string(),
            },
        )
    }

    #[test]
    fn test_render_timestamp() {
        let at = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(render_timestamp(&at), "Tue Jan 01 2019 00:00:00 GMT+0000");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = offset.with_ymd_and_hms(2026, 10, 19, 14, 3, 7).unwrap();
        let rendered = render_timestamp(&at);
        assert_eq!(rendered, "Mon Oct 19 2026 14:03:07 GMT+0200");
        assert!(!rendered.contains('('), "no zone name suffix: {rendered}");
    }

    #[tokio::test]
    async fn test_publishes_on_interval_until_stopped() {
        let pubsub = Arc::new(PubSub::default());
        let service = ticker(&pubsub, 20);
        let mut sub = pubsub.subscribe("clock");

        service.start().await.unwrap();
        assert!(service.health().await.unwrap().is_healthy());

        let first = timeout(Duration::from_secs(2), sub.next()).await.unwrap();
        assert!(first.is_some_and(|m| m.contains("GMT")));
        let second = timeout(Duration::from_secs(2), sub.next()).await.unwrap();
        assert!(second.is_some());

        service.stop().await.unwrap();
        assert!(!service.is_running());
        assert!(!service.health().await.unwrap().is_healthy());

        // Drain anything published before the stop, then expect silence.
        while timeout(Duration::from_millis(5), sub.next()).await.is_ok() {}
        assert!(timeout(Duration::from_millis(100), sub.next()).await.is_err());
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_restartable() {
        let pubsub = Arc::new(PubSub::default());
        let service = ticker(&pubsub, 20);

        service.start().await.unwrap();
        service.start().await.unwrap();
        service.restart().await.unwrap();
        assert!(service.is_running());
        service.stop().await.unwrap();
        service.stop().await.unwrap();
        assert!(!service.is_running());
    }
}
