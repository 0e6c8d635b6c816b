use super::{BindingError, ServiceBinding};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Wire shape of a binding's `credentials` object, after key normalization
#[derive(Debug, Deserialize)]
struct RawCredentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    host: Vec<String>,
}

/// Lowercase the keys of a credentials object so field matching ignores case.
///
/// When several spellings collide, an already-lowercase key wins; otherwise
/// the first one seen is kept.
fn normalize_keys(value: &Value) -> Value {
    match value {
        Value::Object(fields) => {
            let mut normalized = Map::with_capacity(fields.len());
            for (key, field) in fields {
                let lower = key.to_lowercase();
                if *key == lower || !normalized.contains_key(&lower) {
                    normalized.insert(lower, field.clone());
                }
            }
            Value::Object(normalized)
        }
        other => other.clone(),
    }
}

/// Validated connection credentials. `hosts` is never empty.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    username: String,
    password: String,
    hosts: Vec<String>,
}

impl ServiceCredentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        hosts: Vec<String>,
    ) -> Option<Self> {
        match hosts.first() {
            Some(first) if !first.trim().is_empty() => Some(Self {
                username: username.into(),
                password: password.into(),
                hosts,
            }),
            _ => None,
        }
    }

    pub fn decode(binding: &ServiceBinding) -> Result<Self, BindingError> {
        let raw: RawCredentials = serde_json::from_value(normalize_keys(&binding.credentials))
            .map_err(|source| BindingError::Decode {
                binding: binding.name.clone(),
                source,
            })?;

        Self::new(raw.username, raw.password, raw.host)
            .ok_or_else(|| BindingError::NoHosts(binding.name.clone()))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Connection URL built from the first host
    pub fn url(&self) -> String {
        format!("http://{}", self.hosts[0])
    }
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("hosts", &self.hosts)
            .finish()
    }
}
