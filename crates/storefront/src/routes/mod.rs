//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Shell page (progress, error, or grid + drawer)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog loaded)
//! GET  /static/*               - Content-hashed CSS
//!
//! # Cart (HTMX fragments)
//! GET  /cart/count             - Cart count badge (fragment)
//! GET  /cart/drawer            - Cart drawer (fragment)
//! POST /cart/add               - Add one unit (returns drawer, triggers cart-updated)
//! POST /cart/remove            - Remove one unit (returns drawer, triggers cart-updated)
//! POST /cart/open              - Open the drawer (returns drawer)
//! POST /cart/close             - Close the drawer (returns drawer)
//! ```
//!
//! Without the `HX-Request` header, the POST routes redirect back to `/`.

pub mod cart;
pub mod home;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
    session_lock_middleware,
};
use crate::state::AppState;

/// Directory holding the stylesheet and its hashed copy.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/count", get(cart::count))
        .route("/drawer", get(cart::drawer))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
}

/// Build the full application: routes, static files, and middleware.
///
/// Sentry layers are added by the binary on top of this router.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    CACHE_CONTROL,
                    HeaderValue::from_static("public, max-age=31536000, immutable"),
                ))
                .service(ServeDir::new(STATIC_DIR)),
        )
        .layer(session_layer)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_lock_middleware,
        ))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog has loaded, and for good
/// if the one-time fetch failed.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
