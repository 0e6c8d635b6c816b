use crate::api::models::AppState;
use crate::api::diagnostics::handlers::diagnostics_handler;
use axum::{Router, routing::any};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", any(diagnostics_handler))
}
