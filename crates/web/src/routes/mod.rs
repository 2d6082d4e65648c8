//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Featured products
//! GET  /shop?category=              - In-stock products, optional category filter
//! GET  /product/{id}                - Product detail
//! GET  /order/{id}                  - Redirect to the order chat
//! GET  /cart                        - Cart page
//! GET  /images/products/{filename}  - Stored product image
//! GET  /static/*                    - Static assets
//! GET  /health, /health/ready       - Liveness / readiness
//!
//! # Admin
//! GET  /admin/login                 - Login form
//! POST /admin/login                 - Login action
//! GET  /admin/logout                - Logout (admin)
//! GET  /admin/dashboard             - Overview (admin)
//! GET  /admin/products              - Product list and form (admin)
//! POST /admin/products              - Create product, multipart (admin)
//! GET  /admin/delete_product/{id}   - Delete product (admin)
//! ```

pub mod admin;
pub mod cart;
pub mod home;
pub mod images;
pub mod order;
pub mod products;
pub mod shop;
pub mod view;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    create_session_layer, request_id_middleware, response_headers_middleware,
};
use crate::state::AppState;

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/shop", get(shop::index))
        .route("/product/{id}", get(products::show))
        .route("/order/{id}", get(order::handoff))
        .route("/cart", get(cart::show))
        .route("/images/products/{filename}", get(images::serve))
        .nest("/admin", admin::routes())
}

/// Build the complete application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let config = state.config();
    let session_layer = create_session_layer(config);
    let static_dir = ServeDir::new(&config.static_dir);
    let body_limit = DefaultBodyLimit::max(config.max_upload_bytes);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", static_dir)
        .layer(body_limit)
        .layer(middleware::from_fn(response_headers_middleware))
        .layer(session_layer)
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
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
