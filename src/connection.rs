use crate::binding::{self, BindingError};
use crate::config::AppConfig;
use crate::search::{ElasticClient, SearchBackend, SearchError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error("cannot construct search client: {0}")]
    Client(#[from] SearchError),
}

/// Search backend shared by all requests, or the reason there is none
pub enum Connection {
    Ready {
        binding: String,
        backend: Arc<dyn SearchBackend>,
    },
    Unavailable(StartupError),
}

impl Connection {
    /// Resolve the service binding and build the search client once.
    ///
    /// Failures are kept rather than returned so every request can report them.
    pub fn establish(config: &AppConfig) -> Self {
        match Self::try_establish(config) {
            Ok(connection) => connection,
            Err(e) => {
                warn!(error = %e, "Search backend unavailable");
                Connection::Unavailable(e)
            }
        }
    }

    fn try_establish(config: &AppConfig) -> Result<Self, StartupError> {
        let resolved = binding::resolve(
            config.binding.raw.as_deref(),
            &config.binding.env_var,
            config.binding.service_name.as_deref(),
        )?;
        let client = ElasticClient::new(&resolved.credentials, &config.search)?;

        info!(
            binding = %resolved.name,
            url = %client.url(),
            max_retries = config.search.max_retries,
            "Search client ready"
        );

        Ok(Connection::Ready {
            binding: resolved.name,
            backend: Arc::new(client),
        })
    }

    pub fn binding_name(&self) -> Option<&str> {
        match self {
            Connection::Ready { binding, .. } => Some(binding),
            Connection::Unavailable(_) => None,
        }
    }
}
