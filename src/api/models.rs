use crate::config::AppConfig;
use crate::connection::Connection;
use serde::Serialize;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub connection: Arc<Connection>,
}

impl AppState {
    pub fn new(config: AppConfig, connection: Connection) -> Self {
        Self {
            config: Arc::new(config),
            connection: Arc::new(connection),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Name of the resolved service binding
    pub binding: Option<String>,
}
