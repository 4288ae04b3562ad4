//! Per-operation context injected into every resolver.
//!
//! No identity is derived from the request: every operation gets the same
//! placeholder `auth_scope`.

use async_graphql::{Context, Result};

pub const PLACEHOLDER_AUTH_SCOPE: &str = "yayayayayay";

/// Data shared by all resolvers of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub auth_scope: String,
}

/// Builds a fresh [RequestContext] for each request or WebSocket connection.
#[derive(Debug, Clone)]
pub struct ContextFactory {
    auth_scope: String,
}

impl Default for ContextFactory {
    fn default() -> Self {
        Self {
            auth_scope: PLACEHOLDER_AUTH_SCOPE.to_string(),
        }
    }
}

impl ContextFactory {
    pub fn with_auth_scope(auth_scope: impl Into<String>) -> Self {
        Self {
            auth_scope: auth_scope.into(),
        }
    }

    pub fn create(&self) -> RequestContext {
        RequestContext {
            auth_scope: self.auth_scope.clone(),
        }
    }
}

/// Extension trait to get the [RequestContext] from a resolver context
pub trait RequestContextExt {
    fn request_context(&self) -> Result<&RequestContext>;
}

impl<'a> RequestContextExt for Context<'a> {
    fn request_context(&self) -> Result<&RequestContext> {
        self.data::<RequestContext>()
    }
}
