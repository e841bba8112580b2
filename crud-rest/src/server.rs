//! HTTP server with graceful shutdown

use axum::{body::Body, Router};
use http::{Request, StatusCode};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, error::Result, ids::RequestId, middleware::request_tracking};

/// Server instance
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bind `0.0.0.0:<service.port>` and serve until SIGINT or SIGTERM
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.service.port));
        tracing::info!("Starting {} on {}", self.config.service.name, addr);

        let listener = TcpListener::bind(&addr).await?;
        self.serve_with_shutdown(listener, app, shutdown_signal())
            .await
    }

    /// Serve on an already bound listener until `shutdown` completes
    pub async fn serve_with_shutdown(
        self,
        listener: TcpListener,
        app: Router,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        self.log_middleware_config();
        let app = self.apply_middleware(app);

        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Wrap a router with the configured middleware stack
    ///
    /// Layers added later wrap earlier ones, so the request id is set before
    /// the trace span is created and panics are caught outermost.
    pub fn apply_middleware(&self, app: Router) -> Router {
        let middleware = &self.config.middleware;
        let body_limit = middleware.body_limit_bytes();

        let mut app = app;

        if let Some(cors) = self.build_cors_layer() {
            app = app.layer(cors);
        }

        if middleware.compression {
            app = app.layer(CompressionLayer::new());
        }

        app = app
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ))
            .layer(RequestBodyLimitLayer::new(body_limit))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_request_span)
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            );

        app = request_tracking(app, &middleware.request_tracking);

        if middleware.catch_panic {
            app = app.layer(CatchPanicLayer::new());
        }

        app
    }

    /// Log middleware configuration for debugging
    fn log_middleware_config(&self) {
        let middleware = &self.config.middleware;
        let tracking = &middleware.request_tracking;

        tracing::info!("Middleware configuration:");
        tracing::info!("  - Panic recovery: {}", enabled(middleware.catch_panic));
        tracing::info!(
            "  - Request ID tracking: {}",
            enabled(tracking.request_id_enabled)
        );
        tracing::info!(
            "  - Header propagation: {}",
            enabled(tracking.propagate_headers)
        );
        tracing::info!(
            "  - Sensitive header masking: {}",
            enabled(tracking.mask_sensitive_headers)
        );
        tracing::info!("  - Request body limit: {} MB", middleware.body_limit_mb);
        tracing::info!("  - Compression: {}", enabled(middleware.compression));
        tracing::info!("  - CORS mode: {}", middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
        tracing::info!(
            "  - Default page size: {}",
            self.config.pagination.default_page_size
        );
    }

    /// Build CORS layer based on configuration
    fn build_cors_layer(&self) -> Option<CorsLayer> {
        match self.config.middleware.cors_mode.as_str() {
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                Some(CorsLayer::permissive())
            }
            "restrictive" => {
                tracing::debug!("Enabling restrictive CORS (default deny)");
                Some(CorsLayer::new())
            }
            "disabled" => {
                tracing::debug!("CORS disabled");
                None
            }
            _ => {
                tracing::warn!(
                    "Unknown CORS mode: {}, defaulting to permissive",
                    self.config.middleware.cors_mode
                );
                Some(CorsLayer::permissive())
            }
        }
    }
}

fn enabled(flag: bool) -> &'static str {
    if flag {
        "enabled"
    } else {
        "disabled"
    }
}

fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = RequestId::from_request(request)
        .map(|id| id.to_string())
        .unwrap_or_default();

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/echo", post(|body: String| async move { body }))
            .route("/panic", get(|| async { panic!("boom") as () }))
    }

    #[test]
    fn test_server_creation() {
        let config = Config::default();
        let server = Server::new(config.clone());
        assert_eq!(server.config().service.port, config.service.port);
    }

    #[test]
    fn test_cors_modes() {
        let mut config = Config::default();
        assert!(Server::new(config.clone()).build_cors_layer().is_some());

        config.middleware.cors_mode = "disabled".to_string();
        assert!(Server::new(config).build_cors_layer().is_none());
    }

    #[tokio::test]
    async fn test_middleware_sets_request_id() {
        let app = Server::new(Config::default()).apply_middleware(app());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("req_")));
    }

    #[tokio::test]
    async fn test_middleware_catches_panics() {
        let app = Server::new(Config::default()).apply_middleware(app());
        let response = app
            .oneshot(Request::builder().uri("/panic").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_middleware_limits_body_size() {
        let mut config = Config::default();
        config.middleware.body_limit_mb = 1;
        let app = Server::new(config).apply_middleware(app());
        let request = Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from(vec![b'a'; 2 * 1024 * 1024]))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_middleware_with_huge_body_limit() {
        let mut config = Config::default();
        config.middleware.body_limit_mb = usize::MAX;
        let app = Server::new(config).apply_middleware(app());
        let request = Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from("hello"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_serve_with_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = Server::new(Config::default());
        server
            .serve_with_shutdown(listener, app(), async {})
            .await
            .unwrap();
    }
}
