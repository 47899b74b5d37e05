use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{ai, auth, questions, sessions, uploads};

pub fn build_app(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(sessions::router())
                .merge(questions::router())
                .merge(ai::router())
                .merge(uploads::router())
                .route("/health", get(|| async { "ok" })),
        )
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// CORS from the configured allow-list. An explicit list reflects only the
/// listed origins and allows credentials; a literal `*` entry falls back to
/// a credential-less wildcard (tower-http panics on credentials + Any).
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let allowed_headers = [
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
    ];

    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .expose_headers([header::CONTENT_LENGTH])
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
