//! GraphQL service: owns schema building and exposes HTTP routes for /graphql and /graphql/ws.
//!
//! Builds the schema in [start](Service::start) from the manager's topic bus and a
//! hello client. The HTTP server merges [Self::router] into the app and reads
//! [Self::executor] to build [AppState](crate::app::AppState).

use std::sync::Arc;

use anyhow::{Context, Result};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use async_trait::async_trait;
use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use tokio::sync::RwLock;
use tracing::info;

use crate::app::AppState;
use crate::config::Config;
use crate::graphql::{Executor, SchemaOptions, build_schema};
use crate::services::hello::HelloClient;
use crate::services::manager::{Service, ServiceHealth, ServicesManager};

/// Configuration for the GraphQL service.
#[derive(Debug, Clone)]
pub struct GraphqlServiceConfig {
    pub config: Arc<Config>,
}

/// GraphQL service: builds and holds the schema, provides routes for the playground and API.
pub struct GraphqlService {
    manager: Arc<ServicesManager>,
    config: Arc<Config>,
    executor: RwLock<Option<Executor>>,
}

impl GraphqlService {
    /// Create the service. Register with [register_graphql](ServicesManager::register_graphql)
    /// before [start_all](ServicesManager::start_all).
    pub fn new(manager: Arc<ServicesManager>, config: GraphqlServiceConfig) -> Self {
        Self {
            manager,
            config: config.config,
            executor: RwLock::new(None),
        }
    }

    /// Return the executor, if the service has been started.
    pub async fn executor(&self) -> Option<Executor> {
        self.executor.read().await.clone()
    }

    /// Return a router with /graphql and /graphql/ws. Merge this into the app and call
    /// `.with_state(state)` on the combined router so handlers receive [AppState].
    pub fn router() -> Router<AppState> {
        Router::new()
            .route("/graphql", get(graphiql).post(graphql_handler))
            .route("/graphql/ws", get(graphql_ws_handler))
    }
}

async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(
            GraphiQLSource::build()
                .endpoint("/graphql")
                .subscription_endpoint("/graphql/ws")
                .finish(),
        )
        .into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.executor.execute(req.into_inner()).await.into()
}

async fn graphql_ws_handler(
    State(state): State<AppState>,
    protocol: GraphQLProtocol,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            let executor = state.executor;
            GraphQLWebSocket::new(socket, executor.schema().clone(), protocol)
                .with_data(executor.request_data())
                .serve()
        })
}

#[async_trait]
impl Service for GraphqlService {
    fn name(&self) -> &str {
        "graphql"
    }

    async fn start(&self) -> Result<()> {
        info!(service = "graphql", "GraphQL service starting");
        let hello = HelloClient::new(self.config.hello_url.clone(), self.config.hello_timeout)
            .context("hello client")?;
        info!(service = "graphql", hello_url = %hello.url(), "Hello client ready");
        let schema = build_schema(
            self.manager.pubsub(),
            Arc::new(hello),
            SchemaOptions::from(&*self.config),
        )?;
        *self.executor.write().await = Some(Executor::new(schema));
        info!(service = "graphql", "GraphQL service started");
        info!(
            service = "graphql",
            "GraphQL playground: http://{}:{}/graphql",
            self.config.public_host(),
            self.config.port
        );
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        *self.executor.write().await = None;
        info!(service = "graphql", "Stopped");
        Ok(())
    }

    async fn health(&self) -> Result<ServiceHealth> {
        if self.executor.read().await.is_some() {
            Ok(ServiceHealth::healthy())
        } else {
            Ok(ServiceHealth::unhealthy("schema not built"))
        }
    }
}
