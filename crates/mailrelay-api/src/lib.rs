/// Mailrelay API - HTTP front end for the dispatch pipeline
///
/// Receives the multipart send form, stores uploads as temporary files and
/// hands them to [`mailrelay_core::DispatchPipeline`].
pub mod api;
pub mod context;
pub mod error;
pub mod middleware;

pub use context::ApiContext;
pub use error::ApiError;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Headroom on top of the file payload for text fields and multipart framing
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn router(ctx: Arc<ApiContext>) -> Router {
    let limits = &ctx.config.limits;
    let body_limit = limits
        .max_file_size
        .saturating_mul(limits.max_files)
        .saturating_add(FORM_OVERHEAD_BYTES);

    let routes = Router::new()
        .route("/send-email", post(api::send::handler))
        .route("/health", get(api::health::handler));

    Router::new()
        .nest("/api", routes)
        .fallback(api::not_found)
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&ctx),
            middleware::logging_middleware,
        ))
        // Browser forms post from other origins
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(ctx)
}
