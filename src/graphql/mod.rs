//! GraphQL API with subscriptions for real-time updates
//!
//! Queries and mutations live in domain files under `queries/` and `mutations/`,
//! each a `#[derive(Default)]` struct with an `#[Object]` impl, merged into
//! `QueryRoot` / `MutationRoot` in `schema.rs`. Subscriptions are served over
//! WebSocket and fed by the topic bus.

pub mod context;
pub mod errors;
pub mod executor;
pub mod formatting;
pub mod mutations;
pub mod queries;
pub mod scalars;
mod schema;
mod subscriptions;
pub mod types;

pub use context::{ContextFactory, RequestContext, RequestContextExt};
pub use errors::{AppError, ErrorCode};
pub use executor::Executor;
pub use formatting::{MASKED_ERROR_MESSAGE, ResponseFormatting};
pub use scalars::{Date, DateRepr};
pub use schema::{
    BookshelfSchema, DECLARED_TYPES, MutationRoot, QueryRoot, SchemaError, SchemaOptions,
    build_schema, verify_sdl,
};
pub use subscriptions::SubscriptionRoot;
pub use types::{Book, Comment, Post};
