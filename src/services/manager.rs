//! Services manager for long-running and background services.
//!
//! Services register with the manager and are started/stopped together.
//! Start order respects [dependencies](Service::dependencies); a service is only
//! started after all of its dependencies, and stopped before them.
//!
//! The manager also owns the process-wide [PubSub] so publishers (the ticker)
//! and consumers (GraphQL subscriptions) share one explicitly constructed bus
//! instead of a global.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::services::graphql::{GraphqlService, GraphqlServiceConfig};
use crate::services::http_server::{HttpServerConfig, HttpServerService};
use crate::services::pubsub::PubSub;
use crate::services::ticker::{TickerConfig, TickerService};

/// Health status of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Result of a service health check.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceHealth {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: None,
        }
    }

    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Degraded,
            message: Some(message.into()),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// A service that can be started, stopped, restarted, and health-checked by the manager.
///
/// Use the [tracing] crate for lifecycle logging and include the service name
/// (e.g. `tracing::info!(service = %self.name(), "Started")`).
///
/// Implement this for components that run background tasks or timers, or that
/// hold long-lived state built at startup. Stateless helpers (e.g. the hello
/// client) are constructed and passed where needed.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Unique name for logging and lookup (e.g. "ticker", "graphql", "http").
    fn name(&self) -> &str;

    /// Names of services that must be started before this one. Cycles are an error.
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Start background tasks. Idempotent allowed.
    async fn start(&self) -> Result<()>;

    /// Stop background tasks and release resources. Idempotent allowed.
    async fn stop(&self) -> Result<()>;

    /// Restart the service: stop then start.
    async fn restart(&self) -> Result<()> {
        self.stop().await?;
        self.start().await
    }

    /// Report current health. Default returns [ServiceHealth::healthy].
    async fn health(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

/// Pending registration for the builder.
pub enum ServiceRegistration {
    Ticker(TickerConfig),
    Graphql(GraphqlServiceConfig),
    Http(HttpServerConfig),
    Service(Arc<dyn Service>),
}

/// Types that can be added to a [ServicesManagerBuilder] via [add_service](ServicesManagerBuilder::add_service).
pub trait IntoServiceRegistration {
    #[doc(hidden)]
    fn into_registration(self) -> ServiceRegistration;
}

impl IntoServiceRegistration for TickerConfig {
    fn into_registration(self) -> ServiceRegistration {
        ServiceRegistration::Ticker(self)
    }
}

impl IntoServiceRegistration for GraphqlServiceConfig {
    fn into_registration(self) -> ServiceRegistration {
        ServiceRegistration::Graphql(self)
    }
}

impl IntoServiceRegistration for HttpServerConfig {
    fn into_registration(self) -> ServiceRegistration {
        ServiceRegistration::Http(self)
    }
}

impl IntoServiceRegistration for Arc<dyn Service> {
    fn into_registration(self) -> ServiceRegistration {
        ServiceRegistration::Service(self)
    }
}

/// Builder for [ServicesManager]: add services with configs, then [build](ServicesManagerBuilder::build)
/// or [start](ServicesManagerBuilder::start).
///
/// ```ignore
/// let services = ServicesManager::builder()
///     .with_pubsub(Arc::new(PubSub::new(config.pubsub_capacity)))
///     .add_service(TickerConfig::from(&*config))
///     .add_service(GraphqlServiceConfig { config: config.clone() })
///     .add_service(HttpServerConfig { config: config.clone() })
///     .start()
///     .await?;
/// ```
pub struct ServicesManagerBuilder {
    pubsub: Option<Arc<PubSub>>,
    registrations: Vec<ServiceRegistration>,
}

impl ServicesManagerBuilder {
    pub fn new() -> Self {
        Self {
            pubsub: None,
            registrations: Vec::new(),
        }
    }

    /// Use `pubsub` as the shared bus instead of a default-sized one.
    pub fn with_pubsub(mut self, pubsub: Arc<PubSub>) -> Self {
        self.pubsub = Some(pubsub);
        self
    }

    /// Add a service: a config ([TickerConfig], [GraphqlServiceConfig], [HttpServerConfig])
    /// or a pre-built [Arc]\[[dyn](Service)\].
    pub fn add_service<T: IntoServiceRegistration>(mut self, t: T) -> Self {
        self.registrations.push(t.into_registration());
        self
    }

    /// Build the manager and register all services. Does not start them.
    pub async fn build(self) -> Result<Arc<ServicesManager>> {
        let pubsub = self.pubsub.unwrap_or_default();
        let manager = Arc::new(ServicesManager::new(pubsub));
        for reg in self.registrations {
            match reg {
                ServiceRegistration::Ticker(config) => {
                    let ticker = Arc::new(TickerService::new(manager.pubsub(), config));
                    manager.register(ticker).await;
                }
                ServiceRegistration::Graphql(config) => {
                    let graphql = Arc::new(GraphqlService::new(manager.clone(), config));
                    manager.register_graphql(graphql).await;
                }
                ServiceRegistration::Http(config) => {
                    let http = Arc::new(HttpServerService::new(manager.clone(), config.config));
                    manager.register_http(http).await;
                }
                ServiceRegistration::Service(svc) => {
                    manager.register(svc).await;
                }
            }
        }
        Ok(manager)
    }

    /// Build the manager, register all services, and start them in dependency order.
    pub async fn start(self) -> Result<Arc<ServicesManager>> {
        let manager = self.build().await?;
        manager.start_all().await?;
        Ok(manager)
    }
}

impl Default for ServicesManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry and lifecycle controller for services.
pub struct ServicesManager {
    pubsub: Arc<PubSub>,
    services: RwLock<HashMap<String, Arc<dyn Service>>>,
    started: RwLock<HashSet<String>>,
    graphql: RwLock<Option<Arc<GraphqlService>>>,
    http: RwLock<Option<Arc<HttpServerService>>>,
}

impl ServicesManager {
    pub fn new(pubsub: Arc<PubSub>) -> Self {
        Self {
            pubsub,
            services: RwLock::new(HashMap::new()),
            started: RwLock::new(HashSet::new()),
            graphql: RwLock::new(None),
            http: RwLock::new(None),
        }
    }

    pub fn builder() -> ServicesManagerBuilder {
        ServicesManagerBuilder::new()
    }

    /// The shared topic bus.
    pub fn pubsub(&self) -> Arc<PubSub> {
        self.pubsub.clone()
    }

    /// Compute start order from dependencies (topological order). Returns an error on unknown deps or cycles.
    async fn start_order(&self) -> Result<Vec<String>> {
        let guard = self.services.read().await;
        let names: HashSet<String> = guard.keys().cloned().collect();
        let mut deps: HashMap<String, Vec<String>> = HashMap::new();
        for (name, svc) in guard.iter() {
            let d = svc.dependencies();
            for dep in &d {
                if !names.contains(dep) {
                    anyhow::bail!(
                        "Service {} depends on {} which is not registered",
                        name,
                        dep
                    );
                }
            }
            deps.insert(name.clone(), d);
        }
        drop(guard);

        // Kahn's algorithm: start order = topological order (dependencies first).
        let mut in_degree: HashMap<String, usize> = deps
            .iter()
            .map(|(name, d)| (name.clone(), d.len()))
            .collect();
        let mut dependent_on: HashMap<String, Vec<String>> =
            names.iter().map(|n| (n.clone(), Vec::new())).collect();
        for (name, d) in &deps {
            for dep in d {
                dependent_on.entry(dep.clone()).or_default().push(name.clone());
            }
        }
        let mut queue: Vec<String> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(n, _)| n.clone())
            .collect();
        queue.sort();
        let mut order = Vec::with_capacity(names.len());
        while let Some(n) = queue.pop() {
            order.push(n.clone());
            for s in dependent_on.get(&n).map(Vec::as_slice).unwrap_or_default() {
                if let Some(deg) = in_degree.get_mut(s) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push(s.clone());
                    }
                }
            }
        }
        if order.len() != names.len() {
            anyhow::bail!("Service dependency cycle detected");
        }
        Ok(order)
    }

    /// Register a service. Does not start it. If a service with the same name
    /// exists, it is replaced (the previous instance is not stopped).
    pub async fn register(&self, service: Arc<dyn Service>) {
        let name = service.name().to_string();
        let mut guard = self.services.write().await;
        if guard.insert(name.clone(), service).is_some() {
            warn!(service = %name, "Service '{}' reregistered, overwriting previous", name);
        } else {
            info!(service = %name, "Service '{}' registered", name);
        }
    }

    /// Register the GraphQL service so [get_graphql](ServicesManager::get_graphql) works.
    pub async fn register_graphql(&self, service: Arc<GraphqlService>) {
        *self.graphql.write().await = Some(service.clone());
        self.register(service).await;
    }

    /// Return the GraphQL service if it is registered and currently **started**.
    pub async fn get_graphql(&self) -> Option<Arc<GraphqlService>> {
        if !self.started.read().await.contains("graphql") {
            return None;
        }
        self.graphql.read().await.clone()
    }

    /// Register the HTTP server service so [get_http](ServicesManager::get_http) works.
    pub async fn register_http(&self, service: Arc<HttpServerService>) {
        *self.http.write().await = Some(service.clone());
        self.register(service).await;
    }

    /// Return the HTTP server service if it is registered and currently **started**.
    pub async fn get_http(&self) -> Option<Arc<HttpServerService>> {
        if !self.started.read().await.contains("http") {
            return None;
        }
        self.http.read().await.clone()
    }

    /// Start all registered services in dependency order (dependencies first).
    pub async fn start_all(&self) -> Result<()> {
        let order = self.start_order().await?;
        for name in &order {
            let svc = {
                let g = self.services.read().await;
                g.get(name).cloned()
            };
            if let Some(s) = svc {
                if let Err(e) = s.start().await {
                    warn!(service = %name, error = %e, "Service '{}' start failed", name);
                    return Err(e).context(format!("failed to start service {}", name));
                }
                self.started.write().await.insert(name.clone());
                info!(service = %name, "Service '{}' started", name);
            }
        }
        Ok(())
    }

    /// Stop all registered services in reverse dependency order (dependents first).
    pub async fn stop_all(&self) -> Result<()> {
        let order = self.start_order().await?;
        for name in order.into_iter().rev() {
            let svc = {
                let g = self.services.read().await;
                g.get(&name).cloned()
            };
            if let Some(s) = svc {
                if let Err(e) = s.stop().await {
                    warn!(service = %name, error = %e, "Service '{}' stop failed", name);
                } else {
                    info!(service = %name, "Service '{}' stopped", name);
                }
                self.started.write().await.remove(&name);
            }
        }
        Ok(())
    }

    /// Restart a single service by name. Dependencies are not restarted.
    ///
    /// The service counts as not started while restarting; if the restart
    /// fails it stays that way, so typed getters stop handing it out.
    pub async fn restart_one(&self, name: &str) -> Result<()> {
        let svc = {
            let guard = self.services.read().await;
            guard.get(name).cloned()
        };
        let Some(s) = svc else {
            anyhow::bail!("Service not found: {}", name);
        };

        self.started.write().await.remove(name);
        if let Err(e) = s.restart().await {
            warn!(service = %name, error = %e, "Service '{}' restart failed", name);
            return Err(e).context(format!("failed to restart service {}", name));
        }
        self.started.write().await.insert(name.to_string());
        info!(service = %name, "Service '{}' restarted", name);
        Ok(())
    }

    /// Health check for all registered services. Services that return an error from
    /// [health](Service::health) are reported as [Unhealthy](HealthStatus::Unhealthy).
    pub async fn health_all(&self) -> HashMap<String, ServiceHealth> {
        let services: Vec<(String, Arc<dyn Service>)> = {
            let guard = self.services.read().await;
            guard.iter().map(|(n, s)| (n.clone(), s.clone())).collect()
        };
        let mut out = HashMap::new();
        for (name, svc) in services {
            let h = match svc.health().await {
                Ok(h) => h,
                Err(e) => ServiceHealth::unhealthy(e.to_string()),
            };
            out.insert(name, h);
        }
        out
    }

    /// Return whether the given service is currently started.
    pub async fn is_started(&self, name: &str) -> bool {
        self.started.read().await.contains(name)
    }
}
