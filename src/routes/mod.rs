mod health;
mod pages;
mod swagger;
mod user;
use health::health_checker_handler;

use crate::AppState;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request},
    routing::get,
    Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Span;

/// Upper bound on the time any single handler may run.
pub const HANDLER_TIMEOUT: Duration = Duration::from_secs(30);

pub fn make_app(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    let request_deadline = state.config.server.request_deadline();

    let router = Router::new()
        .route("/health", get(health_checker_handler))
        .nest("/api/v1", user::user_routes())
        .merge(pages::page_routes())
        .nest_service("/static", static_files)
        .merge(swagger::build_documentation())
        .with_state(state);

    with_middleware(router, request_deadline)
}

/// Wraps `router` in the timeout, panic recovery, request id and tracing
/// layers. Timeouts answer 408.
pub fn with_middleware(router: Router, request_deadline: Option<Duration>) -> Router {
    let router = match request_deadline {
        Some(deadline) => router.layer(TimeoutLayer::new(deadline)),
        None => router,
    };

    router
        .layer(TimeoutLayer::new(HANDLER_TIMEOUT))
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let client_ip = real_ip(request.headers()).or(peer);

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
        real_ip = client_ip.as_deref().unwrap_or("-"),
    )
}

/// Client address as reported by a proxy, first `X-Forwarded-For` hop wins.
fn real_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
        })
        .map(str::to_owned)
}
