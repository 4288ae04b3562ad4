//! In-process publish/subscribe with fan-out delivery.
//!
//! Each topic is backed by a `tokio::sync::broadcast` channel, so every
//! subscriber gets its own copy of every message and publishing never waits on
//! consumers. A subscriber that falls more than `capacity` messages behind
//! skips the overwritten ones instead of stalling the publisher.

use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, warn};

/// Default number of buffered messages per topic.
pub const DEFAULT_CAPACITY: usize = 64;

/// Topic bus shared by the ticker (publisher) and the `newMessage`
/// subscription (consumers).
pub struct PubSub {
    capacity: usize,
    topics: RwLock<HashMap<String, broadcast::Sender<String>>>,
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PubSub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Publish `message` to every current subscriber of `topic`.
    ///
    /// Returns the number of subscribers the message was handed to. With no
    /// subscribers the message is dropped.
    pub fn publish(&self, topic: &str, message: impl Into<String>) -> usize {
        let sender = self.topics.read().get(topic).cloned();
        let Some(sender) = sender else {
            debug!(topic = %topic, "No subscribers, message dropped");
            return 0;
        };
        match sender.send(message.into()) {
            Ok(delivered) => delivered,
            Err(_) => {
                debug!(topic = %topic, "No subscribers, message dropped");
                0
            }
        }
    }

    /// Subscribe to `topic`. The subscription only sees messages published
    /// after this call; dropping it deregisters the subscriber.
    pub fn subscribe(&self, topic: &str) -> TopicSubscription {
        if let Some(sender) = self.topics.read().get(topic) {
            return TopicSubscription::new(topic, sender.subscribe());
        }

        let mut topics = self.topics.write();
        let sender = topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        TopicSubscription::new(topic, sender.subscribe())
    }

    /// Number of live subscribers of `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .get(topic)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Names of topics that have been subscribed to at least once.
    pub fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Stream of messages for one subscriber of one topic.
pub struct TopicSubscription {
    topic: String,
    inner: BroadcastStream<String>,
}

impl TopicSubscription {
    fn new(topic: &str, receiver: broadcast::Receiver<String>) -> Self {
        Self {
            topic: topic.to_string(),
            inner: BroadcastStream::new(receiver),
        }
    }
}

impl Stream for TopicSubscription {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(message))) => return Poll::Ready(Some(message)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(skipped)))) => {
                    warn!(topic = %self.topic, skipped, "Subscriber lagged, skipping messages");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
