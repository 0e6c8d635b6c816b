pub mod credentials;
pub mod services;

pub use credentials::ServiceCredentials;
pub use services::{ServiceBinding, ServiceBindings};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    #[error("malformed service binding document: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("no service binding found{}", named_suffix(.0))]
    NoBindingFound(Option<String>),

    #[error("cannot decode credentials of binding {binding:?}: {source}")]
    Decode {
        binding: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("binding {0:?} has no host addresses")]
    NoHosts(String),
}

fn named_suffix(name: &Option<String>) -> String {
    name.as_ref()
        .map(|n| format!(" named {n:?}"))
        .unwrap_or_default()
}

/// Credentials together with the binding they were taken from
#[derive(Debug, Clone)]
pub struct ResolvedBinding {
    pub name: String,
    pub credentials: ServiceCredentials,
}

/// Resolve the credentials of one service binding from the raw binding document.
///
/// `raw` is the value of `env_var`, `None` when the variable is unset.
pub fn resolve(
    raw: Option<&str>,
    env_var: &str,
    preferred: Option<&str>,
) -> Result<ResolvedBinding, BindingError> {
    let raw = raw.ok_or_else(|| BindingError::MissingEnv(env_var.to_string()))?;
    let bindings = ServiceBindings::parse(raw)?;
    let binding = bindings.select(preferred)?;
    let credentials = ServiceCredentials::decode(binding)?;

    info!(
        binding = %binding.name,
        label = %binding.label,
        tags = ?binding.tags,
        bound = bindings.len(),
        hosts = credentials.hosts().len(),
        url = %credentials.url(),
        "Resolved service binding"
    );

    Ok(ResolvedBinding {
        name: binding.name.clone(),
        credentials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_single_binding() {
        let raw = r#"{
            "searchly": [{
                "name": "es",
                "label": "searchly",
                "credentials": {
                    "username": "u",
                    "password": "p",
                    "host": ["db.example.com:9200"]
                }
            }]
        }"#;

        let resolved = resolve(Some(raw), "VCAP_SERVICES", None).unwrap();

        assert_eq!(resolved.name, "es");
        assert_eq!(resolved.credentials.username(), "u");
        assert_eq!(resolved.credentials.password(), "p");
        assert_eq!(resolved.credentials.url(), "http://db.example.com:9200");
    }

    #[test]
    fn unset_variable_is_reported() {
        let err = resolve(None, "VCAP_SERVICES", None).unwrap_err();
        assert!(matches!(err, BindingError::MissingEnv(ref v) if v == "VCAP_SERVICES"));
        assert_eq!(err.to_string(), "environment variable VCAP_SERVICES is not set");
    }

    #[test]
    fn empty_document_has_no_binding() {
        let err = resolve(Some("{}"), "VCAP_SERVICES", None).unwrap_err();
        assert!(matches!(err, BindingError::NoBindingFound(None)));
        assert_eq!(err.to_string(), "no service binding found");
    }

    #[test]
    fn missing_named_binding_mentions_name() {
        let raw = r#"{"es": [{"name": "a", "credentials": {"host": ["h:1"]}}]}"#;
        let err = resolve(Some(raw), "VCAP_SERVICES", Some("b")).unwrap_err();
        assert_eq!(err.to_string(), "no service binding found named \"b\"");
    }
}
