pub mod diagnostics;
pub mod models;

// Re-exports
pub use models::*;

use axum::{Json, Router, extract::State, routing::get};
use tower_http::trace::TraceLayer;

// Health handler (simple, keep here)
pub async fn health_handler(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let binding = state.connection.binding_name().map(str::to_string);
    let status = if binding.is_some() { "healthy" } else { "degraded" };

    Json(models::HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        binding,
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(diagnostics::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
