//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, tracing.
//!
//! When `INTERVIEWER_WEB_DIR` points at an existing directory, its files
//! are served for every path the API does not claim.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let web_dir = std::env::var("INTERVIEWER_WEB_DIR").ok();
    build_router_with_web_dir(state, web_dir.as_deref())
}

pub fn build_router_with_web_dir(state: AppState, web_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/sessions/{id}/turns", post(handlers::turn::submit_turn))
        .route(
            "/sessions/{id}/attachments",
            post(handlers::session::add_attachment),
        )
        .route(
            "/sessions/{id}/finalize",
            post(handlers::finalize::finalize_session),
        )
        .route(
            "/sessions/{id}/transcript",
            get(handlers::session::export_transcript),
        );

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(web_dir) = web_dir.filter(|dir| std::path::Path::new(dir).is_dir()) {
        let index_path = format!("{web_dir}/index.html");
        let serve_dir = ServeDir::new(web_dir).fallback(ServeFile::new(index_path));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir, "Static file serving enabled");
    }

    router
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
