use crate::api::models::AppState;
use crate::connection::Connection;
use crate::runner::{self, DiagnosticReport};
use axum::extract::State;
use tracing::info;

/// Run the diagnostic sequence and render it as plain text.
///
/// Always answers 200; failures are part of the body.
pub async fn diagnostics_handler(State(state): State<AppState>) -> String {
    let report = match state.connection.as_ref() {
        Connection::Ready { binding, backend } => {
            info!(binding = %binding, "Running diagnostics");
            runner::run(backend.as_ref(), &state.config.search).await
        }
        Connection::Unavailable(e) => DiagnosticReport::setup_failed(e),
    };

    report.render(
        &state.config.binding.env_var,
        state.config.binding.raw.as_deref(),
    )
}
