use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/upload",
            post(handlers::upload_document_handler)
                .layer(DefaultBodyLimit::max(100 * 1024 * 1024)),
        )
        .route("/paraphrase", post(handlers::paraphrase_handler))
        .route("/jobs/{job_id}", get(handlers::job_status_handler))
        .route("/download/{document_id}", get(handlers::download_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
