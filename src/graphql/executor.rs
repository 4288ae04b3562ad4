//! Runs operations against the schema with a fresh request context.

use async_graphql::{Data, Request, Response};
use futures::Stream;

use super::context::ContextFactory;
use super::schema::BookshelfSchema;

#[derive(Clone)]
pub struct Executor {
    schema: BookshelfSchema,
    contexts: ContextFactory,
}

impl Executor {
    pub fn new(schema: BookshelfSchema) -> Self {
        Self::with_contexts(schema, ContextFactory::default())
    }

    pub fn with_contexts(schema: BookshelfSchema, contexts: ContextFactory) -> Self {
        Self { schema, contexts }
    }

    pub fn schema(&self) -> &BookshelfSchema {
        &self.schema
    }

    /// Per-operation data for transports that attach it themselves
    pub fn request_data(&self) -> Data {
        let mut data = Data::default();
        data.insert(self.contexts.create());
        data
    }

    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        let request = request.into().data(self.contexts.create());
        self.schema.execute(request).await
    }

    pub fn execute_stream(
        &self,
        request: Request,
    ) -> impl Stream<Item = Response> + Send + Unpin + use<> {
        self.schema
            .execute_stream(request.data(self.contexts.create()))
    }
}
