//! Long-running services and external clients

pub mod graphql;
pub mod hello;
pub mod http_server;
pub mod manager;
pub mod pubsub;
pub mod ticker;

pub use graphql::{GraphqlService, GraphqlServiceConfig};
pub use hello::{HelloClient, HelloError};
pub use http_server::{HttpServerConfig, HttpServerService};
pub use manager::{
    HealthStatus, Service, ServiceHealth, ServicesManager, ServicesManagerBuilder,
};
pub use pubsub::{PubSub, TopicSubscription};
pub use ticker::{TickerConfig, TickerService};
