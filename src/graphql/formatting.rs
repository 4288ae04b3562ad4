//! Response formatting applied to every GraphQL response.
//!
//! Errors never reach clients as-is. Each one is logged in full and replaced
//! with a generic message; only its location and path are kept (plus the
//! `code` extension when enabled). The formatted response is logged at debug
//! level. Subscription stream items go through the same formatting.

use std::sync::Arc;

use async_graphql::extensions::{
    Extension, ExtensionContext, ExtensionFactory, NextRequest, NextSubscribe,
};
use async_graphql::{ErrorExtensionValues, Response, ServerError, Value};
use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::{debug, error};

use super::errors::ErrorCode;

pub const MASKED_ERROR_MESSAGE: &str = "Internal server error";

/// Extension factory installed on the schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatting {
    expose_error_codes: bool,
}

impl ResponseFormatting {
    pub fn new(expose_error_codes: bool) -> Self {
        Self { expose_error_codes }
    }

    /// Mask one error. The unmasked error is logged first.
    pub fn format_error(&self, err: ServerError) -> ServerError {
        error!(
            message = %err.message,
            error = %serde_json::to_string(&err).unwrap_or_default(),
            "GraphQL error"
        );

        let mut masked = ServerError::new(MASKED_ERROR_MESSAGE, None);
        masked.locations = err.locations;
        masked.path = err.path;
        if self.expose_error_codes {
            let code = err
                .extensions
                .as_ref()
                .and_then(|ext| ext.get("code"))
                .cloned()
                .unwrap_or_else(|| Value::from(ErrorCode::InternalServerError.as_str()));
            let mut extensions = ErrorExtensionValues::default();
            extensions.set("code", code);
            masked.extensions = Some(extensions);
        }
        masked
    }

    /// Mask all errors in `response` and log the result.
    pub fn format_response(&self, mut response: Response) -> Response {
        if !response.errors.is_empty() {
            response.errors = response
                .errors
                .into_iter()
                .map(|err| self.format_error(err))
                .collect();
        }
        debug!(
            response = %serde_json::to_string(&response).unwrap_or_default(),
            "formatResponse"
        );
        response
    }
}

impl ExtensionFactory for ResponseFormatting {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(ResponseFormattingExtension(*self))
    }
}

struct ResponseFormattingExtension(ResponseFormatting);

#[async_trait::async_trait]
impl Extension for ResponseFormattingExtension {
    async fn request(&self, ctx: &ExtensionContext<'_>, next: NextRequest<'_>) -> Response {
        let response = next.run(ctx).await;
        self.0.format_response(response)
    }

    fn subscribe<'s>(
        &self,
        ctx: &ExtensionContext<'_>,
        stream: BoxStream<'s, Response>,
        next: NextSubscribe<'_>,
    ) -> BoxStream<'s, Response> {
        let formatting = self.0;
        next.run(ctx, stream)
            .map(move |response| formatting.format_response(response))
            .boxed()
    }
}
