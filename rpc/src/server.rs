//! Axum-based API server.

use axum::routing::get;
use axum::Router;
use eden_delegates::{CacheStats, DelegationChainResolver};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::RpcError;
use crate::handlers;
use crate::metrics::ApiMetrics;
use crate::shutdown::ShutdownListener;

type CacheStatsFn = Box<dyn Fn() -> CacheStats + Send + Sync>;

/// Shared state handed to every request handler.
pub struct AppState {
    pub config: ServerConfig,
    pub resolver: DelegationChainResolver,
    pub metrics: ApiMetrics,
    cache_stats: Option<CacheStatsFn>,
}

impl AppState {
    pub fn new(config: ServerConfig, resolver: DelegationChainResolver) -> Self {
        Self {
            config,
            resolver,
            metrics: ApiMetrics::new(),
            cache_stats: None,
        }
    }

    /// Report query cache counters on the metrics endpoint.
    pub fn with_cache_stats<F>(mut self, stats: F) -> Self
    where
        F: Fn() -> CacheStats + Send + Sync + 'static,
    {
        self.cache_stats = Some(Box::new(stats));
        self
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache_stats.as_ref().map(|stats| stats())
    }
}

/// Build the router with every API route.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/delegates/head", get(handlers::head_delegate))
        .route("/delegates/chiefs", get(handlers::chief_delegates))
        .route("/delegates/chain/:account", get(handlers::delegation_chain))
        .route("/members/:account", get(handlers::member))
        .route("/metrics", get(handlers::metrics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer {
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Serve until `shutdown` resolves.
    pub async fn start(&self, shutdown: ShutdownListener) -> Result<(), RpcError> {
        let addr = self.state.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(
            %addr,
            app = %self.state.config.app_name,
            version = %self.state.config.app_version,
            env = %self.state.config.env,
            "API server listening"
        );

        axum::serve(listener, router(self.state.clone()))
            .with_graceful_shutdown(async move {
                let reason = shutdown.wait().await;
                info!(?reason, "draining API server");
            })
            .await?;
        info!("API server stopped");
        Ok(())
    }
}
