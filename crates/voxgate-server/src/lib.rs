mod extract;
mod handlers;
mod health;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use voxgate_auth::AuthGate;
use voxgate_config::Config;
use voxgate_storage::AudioStore;
use voxgate_synthesis::{HttpEngine, Orchestrator, SynthesisEngine};
use voxgate_usage::UsageRecorder;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the auth gate, limiter, storage backend, or
    /// engine client fails to initialize
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let gate = AuthGate::from_config(&config.auth)?;
        let limiter = voxgate_ratelimit::create_limiter(&config.rate_limit)?;
        let store = AudioStore::from_config(&config.storage).await?;

        let recorder = config
            .usage
            .as_ref()
            .map_or_else(UsageRecorder::disabled, UsageRecorder::spawn);

        let engine: Arc<dyn SynthesisEngine> = Arc::new(HttpEngine::new(&config.engine)?);

        let orchestrator = Arc::new(Orchestrator::new(gate, limiter, engine, store, recorder, &config.engine));

        let mut app = Router::new()
            .route("/v1/synthesize", post(handlers::synthesize))
            .route("/v1/synthesize-url", post(handlers::synthesize_url))
            .route("/v1/audio/{tenant_id}/{file_id}", get(handlers::audio_file))
            .route("/v1/voices", get(handlers::voices))
            .route("/v1/tenant/stats", get(handlers::tenant_stats))
            .with_state(orchestrator);

        // Health stays outside the auth surface
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        app = app.layer(TraceLayer::new_for_http());

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
