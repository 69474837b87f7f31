//! Application router: route tree, caching policy and middleware.
//!
//! [`build_app_router`] is shared by `main.rs` and `tests/common/mod.rs` so
//! both run behind the same layers.

use std::time::Duration;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::response::Response;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Successful public catalog reads may be cached briefly by browsers and CDNs.
const PUBLIC_CACHE_CONTROL: &str = "public, max-age=60";

/// Curation responses reflect in-flight edits and are never cached.
const ADMIN_CACHE_CONTROL: &str = "no-store";

/// Build the full application [`Router`].
///
/// Route tree:
///
/// ```text
/// /health            liveness and schema status
/// /api/v1/...        public catalog (cacheable on success)
/// /api/v1/admin/...  curation, lifecycle and validation (no-store)
/// ```
///
/// Layers, outermost first: CORS, request id, tracing, request id
/// propagation, timeout, gzip, panic recovery.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");

    let api = routes::public_routes()
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            public_cache_control,
        ))
        .nest(
            "/admin",
            routes::admin_routes().layer(SetResponseHeaderLayer::overriding(
                CACHE_CONTROL,
                HeaderValue::from_static(ADMIN_CACHE_CONTROL),
            )),
        );

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", api)
        .layer(CatchPanicLayer::new())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Errors on public routes (404 for an unknown slug, 400 for a bad facet)
/// must not be cached.
fn public_cache_control(response: &Response) -> Option<HeaderValue> {
    response
        .status()
        .is_success()
        .then(|| HeaderValue::from_static(PUBLIC_CACHE_CONTROL))
}

/// Build the CORS layer. The admin UI only sends JSON bodies.
///
/// Panics at startup if any configured origin is invalid.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn public_cache_header_only_on_success() {
        let ok = Response::builder().status(200).body(Body::empty()).unwrap();
        assert_eq!(
            public_cache_control(&ok),
            Some(HeaderValue::from_static(PUBLIC_CACHE_CONTROL))
        );

        let missing = Response::builder().status(404).body(Body::empty()).unwrap();
        assert_eq!(public_cache_control(&missing), None);
    }
}
