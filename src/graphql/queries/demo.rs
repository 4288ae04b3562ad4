//! Demonstration fields: an outbound HTTP call and two fields that always
//! fail, kept to exercise error formatting.

use super::prelude::*;
use crate::services::hello::HelloClient;

#[derive(Default)]
pub struct DemoQueries;

#[Object]
impl DemoQueries {
    /// Greeting fetched from the configured hello endpoint
    async fn hello(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        let client = ctx.data::<Arc<HelloClient>>()?;
        let greeting = client
            .fetch_greeting()
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(Some(greeting))
    }

    /// Declared without a resolver; always null
    async fn mocked_string(&self) -> Option<String> {
        None
    }

    /// Reads a file that does not exist
    async fn read_error(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        let options = ctx.data::<SchemaOptions>()?;
        tokio::fs::read_to_string(&options.read_error_path)
            .await
            .map_err(|e| AppError::from(e).extend())?;
        Ok(None)
    }

    /// Always fails with an authentication error
    async fn authentication_error(&self) -> Result<Option<String>> {
        Err(AppError::authentication("must authenticate").extend())
    }
}
