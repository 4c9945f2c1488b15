//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, version negotiation)
//! - Bind server to listener
//! - Stop on the shutdown signal

use std::future::Future;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::negotiation::{negotiate_version, ConfigError, VersionNegotiator};

/// HTTP server for the version-gated API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server. Fails if the negotiation options are invalid.
    pub fn new(config: ServerConfig) -> Result<Self, ConfigError> {
        let negotiator = VersionNegotiator::new(config.negotiation_config()?);
        let router = Self::build_router(&config, negotiator)?;
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, negotiator: VersionNegotiator) -> Result<Router, ConfigError> {
        let greeting = handlers::greeting(negotiator.config())?;

        let versions: Vec<&str> = negotiator.config().versions().iter().map(|v| v.as_str()).collect();
        tracing::info!(
            versions = ?versions,
            mandatory = negotiator.config().is_mandatory(),
            send_reply = negotiator.config().send_reply(),
            "Version negotiation configured"
        );

        Ok(Router::new()
            .route("/", get(handlers::echo))
            .route("/greeting", greeting.into_method_router())
            .layer(middleware::from_fn_with_state(negotiator, negotiate_version))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http()))
    }

    /// The assembled router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
