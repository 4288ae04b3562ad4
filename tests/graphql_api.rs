//! Integration tests for the GraphQL API
//!
//! These tests run operations through the full schema (formatting extension
//! included) the same way the HTTP handlers do:
//! - Catalogue queries
//! - Error masking
//! - Date scalar arguments and results
//! - The `hello` field against a mock greeting endpoint

use std::sync::Arc;
use std::time::Duration;

use async_graphql::{Request, Variables};
use serde_json::{Value, json};

use bookshelf::graphql::{Executor, MASKED_ERROR_MESSAGE, SchemaOptions, build_schema};
use bookshelf::services::{HelloClient, PubSub};

fn executor_with(hello_url: &str, options: SchemaOptions) -> Executor {
    let hello = HelloClient::new(hello_url, Duration::from_secs(5)).unwrap();
    let schema = build_schema(Arc::new(PubSub::default()), Arc::new(hello), options).unwrap();
    Executor::new(schema)
}

fn executor() -> Executor {
    executor_with("http://127.0.0.1:9/hello", SchemaOptions::default())
}

async fn data(executor: &Executor, request: impl Into<Request>) -> Value {
    let response = executor.execute(request).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.data.into_json().unwrap()
}

async fn error_messages(executor: &Executor, request: impl Into<Request>) -> Vec<String> {
    let response = executor.execute(request).await;
    response.errors.into_iter().map(|e| e.message).collect()
}

// ============================================================================
// Catalogue Tests
// ============================================================================

mod catalogue {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_books_returns_seed_order() {
        let data = data(&executor(), "{ books { title author } }").await;
        assert_eq!(
            data,
            json!({
                "books": [
                    { "title": "Harry Potter and the Chamber of Secrets", "author": "J.K. Rowling" },
                    { "title": "Jurassic Park", "author": "Michael Crichton" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_books_title_exact_match() {
        let executor = executor();
        let data_found = data(
            &executor,
            r#"{ booksTitle(title: "Jurassic Park") { title author } }"#,
        )
        .await;
        assert_eq!(
            data_found,
            json!({ "booksTitle": [{ "title": "Jurassic Park", "author": "Michael Crichton" }] })
        );

        let data_none = data(&executor, r#"{ booksTitle(title: "nonexistent") { title } }"#).await;
        assert_eq!(data_none, json!({ "booksTitle": [] }));

        let data_case = data(&executor, r#"{ booksTitle(title: "jurassic park") { title } }"#).await;
        assert_eq!(data_case, json!({ "booksTitle": [] }));
    }

    #[tokio::test]
    async fn test_books_title_requires_argument() {
        let messages = error_messages(&executor(), "{ booksTitle { title } }").await;
        assert_eq!(messages, vec![MASKED_ERROR_MESSAGE]);
    }

    #[tokio::test]
    async fn test_mocked_string_is_null() {
        let data = data(&executor(), "{ mockedString }").await;
        assert_eq!(data, json!({ "mockedString": null }));
    }
}

// ============================================================================
// Error Masking Tests
// ============================================================================

mod masking {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_authentication_error_is_masked() {
        let response = executor().execute("{ authenticationError }").await;
        assert_eq!(response.errors.len(), 1);
        let err = &response.errors[0];
        assert_eq!(err.message, MASKED_ERROR_MESSAGE);
        assert!(err.extensions.is_none());
        assert_eq!(response.data.into_json().unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_partial_data_survives_masking() {
        let response = executor()
            .execute("{ books { title } authenticationError }")
            .await;
        assert_eq!(response.errors.len(), 1);
        let err = &response.errors[0];
        assert_eq!(err.message, MASKED_ERROR_MESSAGE);
        assert_eq!(
            serde_json::to_value(&err.path).unwrap(),
            json!(["authenticationError"])
        );
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "books": [
                    { "title": "Harry Potter and the Chamber of Secrets" },
                    { "title": "Jurassic Park" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_read_error_is_masked() {
        let messages = error_messages(&executor(), "{ readError }").await;
        assert_eq!(messages, vec![MASKED_ERROR_MESSAGE]);
    }

    #[tokio::test]
    async fn test_user_input_error_is_masked() {
        let executor = executor();
        let messages = error_messages(
            &executor,
            r#"mutation { userInputError(input: "anything-else") }"#,
        )
        .await;
        assert_eq!(messages, vec![MASKED_ERROR_MESSAGE]);

        let data = data(&executor, r#"mutation { userInputError(input: "expected") }"#).await;
        assert_eq!(data, json!({ "userInputError": null }));
    }

    #[tokio::test]
    async fn test_syntax_error_is_masked() {
        let messages = error_messages(&executor(), "{ books { title ").await;
        assert_eq!(messages, vec![MASKED_ERROR_MESSAGE]);
    }

    #[tokio::test]
    async fn test_codes_kept_when_exposed() {
        let options = SchemaOptions {
            expose_error_codes: true,
            ..SchemaOptions::default()
        };
        let executor = executor_with("http://127.0.0.1:9/hello", options);
        let response = executor.execute("{ authenticationError }").await;
        let err = &response.errors[0];
        assert_eq!(err.message, MASKED_ERROR_MESSAGE);
        assert_eq!(
            err.extensions.as_ref().and_then(|e| e.get("code")),
            Some(&async_graphql::Value::from("UNAUTHENTICATED"))
        );
        assert_eq!(err.path.len(), 1);
    }
}

// ============================================================================
// Date Scalar Tests
// ============================================================================

mod date_scalar {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_integer_literal_returns_comment() {
        let data = data(
            &executor(),
            "{ scalarBooks(title: 1546300800000) { id createDate } }",
        )
        .await;
        assert_eq!(
            data,
            json!({ "scalarBooks": { "id": 1, "createDate": 1546300800000i64 } })
        );
    }

    #[tokio::test]
    async fn test_string_literal_is_rejected() {
        let messages = error_messages(
            &executor(),
            r#"{ scalarBooks(title: "2019-01-01") { id } }"#,
        )
        .await;
        assert_eq!(messages, vec![MASKED_ERROR_MESSAGE]);
    }

    #[tokio::test]
    async fn test_variables_follow_literal_rules() {
        let executor = executor();
        let query = "query ($t: Date!) { scalarBooks(title: $t) { id } }";

        let ok = Request::new(query).variables(Variables::from_json(json!({ "t": 1000 })));
        let data = data(&executor, ok).await;
        assert_eq!(data, json!({ "scalarBooks": { "id": 1 } }));

        let bad = Request::new(query).variables(Variables::from_json(json!({ "t": "x" })));
        let messages = error_messages(&executor, bad).await;
        assert_eq!(messages, vec![MASKED_ERROR_MESSAGE]);
    }
}

// ============================================================================
// Hello Tests
// ============================================================================

mod hello {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_hello_returns_greeting() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/hello")
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":"en","hello":"Hello"}"#)
            .create_async()
            .await;

        let executor = executor_with(&format!("{}/hello", server.url()), SchemaOptions::default());
        let data = data(&executor, "{ hello }").await;
        assert_eq!(data, json!({ "hello": "Hello" }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_hello_failure_is_masked() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/hello")
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":"en"}"#)
            .create_async()
            .await;

        let executor = executor_with(&format!("{}/hello", server.url()), SchemaOptions::default());
        let messages = error_messages(&executor, "{ hello }").await;
        assert_eq!(messages, vec![MASKED_ERROR_MESSAGE]);
    }
}
