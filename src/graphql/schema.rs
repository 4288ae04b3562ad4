//! GraphQL schema definition with queries, mutations, and subscriptions

use std::path::PathBuf;
use std::sync::Arc;

use async_graphql::extensions::Tracing;
use async_graphql::{MergedObject, Schema};

use crate::config::{Config, DEFAULT_MESSAGE_TOPIC, DEFAULT_READ_ERROR_PATH};
use crate::services::hello::HelloClient;
use crate::services::pubsub::PubSub;

use super::formatting::ResponseFormatting;
use super::mutations::DemoMutations;
use super::queries::{BookQueries, CommentQueries, DemoQueries};
use super::subscriptions::SubscriptionRoot;
use super::types::Post;

/// The GraphQL schema type
pub type BookshelfSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

#[derive(MergedObject, Default)]
#[graphql(name = "Query")]
pub struct QueryRoot(BookQueries, DemoQueries, CommentQueries);

#[derive(MergedObject, Default)]
#[graphql(name = "Mutation")]
pub struct MutationRoot(DemoMutations);

/// Settings resolvers read from schema data.
#[derive(Debug, Clone)]
pub struct SchemaOptions {
    /// Topic `newMessage` subscribes to
    pub message_topic: String,
    /// File `readError` tries to read
    pub read_error_path: PathBuf,
    /// Keep the `code` extension on masked errors
    pub expose_error_codes: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            message_topic: DEFAULT_MESSAGE_TOPIC.to_string(),
            read_error_path: PathBuf::from(DEFAULT_READ_ERROR_PATH),
            expose_error_codes: false,
        }
    }
}

impl From<&Config> for SchemaOptions {
    fn from(config: &Config) -> Self {
        Self {
            message_topic: config.message_topic.clone(),
            read_error_path: config.read_error_path.clone(),
            expose_error_codes: config.expose_error_codes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema is missing declared {kind} `{name}`")]
    MissingType { kind: &'static str, name: &'static str },
}

/// Every type the schema must declare, as `(keyword, name)` in SDL.
pub const DECLARED_TYPES: &[(&str, &str)] = &[
    ("type", "Book"),
    ("type", "Query"),
    ("type", "Mutation"),
    ("type", "Subscription"),
    ("type", "Post"),
    ("scalar", "Date"),
    ("type", "Comment"),
];

/// Build the GraphQL schema with all resolvers.
///
/// Fails if the rendered SDL is missing any of [DECLARED_TYPES].
pub fn build_schema(
    pubsub: Arc<PubSub>,
    hello: Arc<HelloClient>,
    options: SchemaOptions,
) -> Result<BookshelfSchema, SchemaError> {
    let schema = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot,
    )
    .register_output_type::<Post>()
    .extension(Tracing)
    .extension(ResponseFormatting::new(options.expose_error_codes))
    .data(pubsub)
    .data(hello)
    .data(options)
    .finish();

    verify_sdl(&schema.sdl())?;
    Ok(schema)
}

/// Check that `sdl` declares every entry of [DECLARED_TYPES].
pub fn verify_sdl(sdl: &str) -> Result<(), SchemaError> {
    for &(kind, name) in DECLARED_TYPES {
        let declared = sdl.lines().any(|line| {
            let mut words = line.split_whitespace();
            words.next() == Some(kind) && words.next() == Some(name)
        });
        if !declared {
            return Err(SchemaError::MissingType { kind, name });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;

    fn schema() -> BookshelfSchema {
        let hello = HelloClient::new("http://127.0.0.1:9/hello", Duration::from_secs(1)).unwrap();
        build_schema(
            Arc::new(PubSub::default()),
            Arc::new(hello),
            SchemaOptions::default(),
        )
        .unwrap()
    }

    fn field_line<'a>(sdl: &'a str, field: &str) -> Option<&'a str> {
        sdl.lines()
            .map(str::trim)
            .find(|line| {
                line.starts_with(&format!("{field}:")) || line.starts_with(&format!("{field}("))
            })
    }

    #[test]
    fn test_sdl_declares_every_type() {
        let sdl = schema().sdl();
        verify_sdl(&sdl).unwrap();
    }

    #[test]
    fn test_sdl_field_signatures() {
        let sdl = schema().sdl();
        for expected in [
            "books: [Book]",
            "booksTitle(title: String!): [Book]",
            "hello: String",
            "mockedString: String",
            "readError: String",
            "authenticationError: String",
            "scalarBooks(title: Date!): Comment",
            "userInputError(input: String): String",
            "newMessage: String",
            "createDate: Date",
            "id: Int",
        ] {
            let field = expected.split([':', '(']).next().unwrap_or_default();
            assert_eq!(field_line(&sdl, field), Some(expected), "in SDL:\n{sdl}");
        }
    }

    #[test]
    fn test_verify_sdl_reports_missing_type() {
        let err = verify_sdl("type Book {\n  title: String\n}\n").unwrap_err();
        assert_matches!(err, SchemaError::MissingType { name: "Query", .. });
    }
}
