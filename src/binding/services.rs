use super::BindingError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One bound backing service as described by the platform
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceBinding {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub credentials: serde_json::Value,
}

/// All bindings, grouped by service label.
///
/// Groups are kept sorted by label so that selection does not depend on
/// the key order of the source document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ServiceBindings {
    groups: BTreeMap<String, Vec<ServiceBinding>>,
}

impl ServiceBindings {
    pub fn parse(raw: &str) -> Result<Self, BindingError> {
        serde_json::from_str(raw).map_err(BindingError::Malformed)
    }

    /// Pick one binding.
    ///
    /// With a preferred name, the binding with that exact name wins, wherever
    /// it sits. Otherwise the first binding of the first non-empty group (by
    /// label) is returned.
    pub fn select(&self, preferred: Option<&str>) -> Result<&ServiceBinding, BindingError> {
        match preferred {
            Some(name) => self
                .iter()
                .find(|binding| binding.name == name)
                .ok_or_else(|| BindingError::NoBindingFound(Some(name.to_string()))),
            None => self
                .groups
                .values()
                .find_map(|bindings| bindings.first())
                .ok_or(BindingError::NoBindingFound(None)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceBinding> {
        self.groups.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
