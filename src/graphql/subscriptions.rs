//! GraphQL subscriptions for real-time updates
//!
//! Subscriptions are served over WebSocket and fed by the topic bus.

use std::sync::Arc;

use async_graphql::{Context, Result, Subscription};
use futures::{Stream, StreamExt};

use crate::services::pubsub::PubSub;

use super::schema::SchemaOptions;

#[derive(Default)]
pub struct SubscriptionRoot;

#[Subscription(name = "Subscription")]
impl SubscriptionRoot {
    /// Current server time as text, once per tick
    async fn new_message(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Option<String>>> {
        let pubsub = ctx.data::<Arc<PubSub>>()?;
        let options = ctx.data::<SchemaOptions>()?;
        Ok(pubsub.subscribe(&options.message_topic).map(Some))
    }
}
