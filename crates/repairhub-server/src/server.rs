use std::net::SocketAddr;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use repairhub_graphql::{
    GRAPHQL_PATH, GraphQLState, UpstreamClient, UpstreamError, build_schema, graphql_handler,
    graphql_handler_get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::AppConfig, handlers};

pub struct GatewayServer {
    addr: SocketAddr,
    app: Router,
}

/// Assembles the gateway router: GraphQL endpoint, health check, CORS and
/// request tracing.
pub fn build_app(cfg: &AppConfig) -> Result<Router, UpstreamError> {
    let client = UpstreamClient::new(&cfg.upstream)?;
    let schema = build_schema(client, &cfg.graphql);
    let state = GraphQLState {
        schema,
        playground: cfg.graphql.playground,
    };

    tracing::info!(
        upstream = %cfg.upstream.base_url,
        timeout_secs = cfg.upstream.timeout_secs,
        introspection = cfg.graphql.introspection,
        playground = cfg.graphql.playground,
        "GraphQL schema built"
    );

    let app = Router::new()
        .route(
            GRAPHQL_PATH,
            get(graphql_handler_get).post(graphql_handler),
        )
        .with_state(state)
        .route("/healthz", get(handlers::healthz))
        // Middleware stack (order: cors -> trace)
        .layer(cors_layer(&cfg.cors.allowed_origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        );

    Ok(app)
}

/// Credentialed CORS restricted to the configured origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> Result<GatewayServer, UpstreamError> {
        let app = build_app(&self.config)?;

        Ok(GatewayServer {
            addr: self.addr,
            app,
        })
    }
}

impl GatewayServer {
    pub async fn run(self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_app_with_defaults() {
        assert!(build_app(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_builder_uses_config_addr() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".into();
        cfg.server.port = 9100;
        let server = ServerBuilder::new().with_config(cfg).build().unwrap();
        assert_eq!(server.addr.to_string(), "127.0.0.1:9100");
    }
}
