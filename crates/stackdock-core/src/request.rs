//! Deployment request: the sole input to the resolver.
//!
//! A `DeploymentRequest` is built fresh per deployment attempt by the caller
//! (CLI, UI, whatever) and has no persisted identity. Its JSON form is the
//! wire contract between the outer layer and the core.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentId;
use crate::selection::SelectionState;

/// Host port assignment per component, seeded from catalog defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortAssignment {
    ports: BTreeMap<ComponentId, u16>,
}

impl PortAssignment {
    /// Every component mapped to its catalog default port.
    pub fn defaults() -> Self {
        Self {
            ports: ComponentId::ALL
                .into_iter()
                .map(|id| (id, id.spec().default_port))
                .collect(),
        }
    }

    /// Assign a port to one component, leaving the rest untouched.
    #[must_use]
    pub fn with_port(mut self, id: ComponentId, port: u16) -> Self {
        self.ports.insert(id, port);
        self
    }

    /// The effective host port: explicit assignment, or the catalog default.
    pub fn port_for(&self, id: ComponentId) -> u16 {
        self.ports
            .get(&id)
            .copied()
            .unwrap_or(id.spec().default_port)
    }
}

/// Opaque per-component credential fields. Schema varies per component
/// (see [`ComponentSpec::credential_env`](crate::catalog::ComponentSpec));
/// the core never checks strength, only presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSet {
    fields: BTreeMap<ComponentId, BTreeMap<String, String>>,
}

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one credential field for a component.
    #[must_use]
    pub fn with_field(mut self, id: ComponentId, field: &str, value: &str) -> Self {
        self.fields
            .entry(id)
            .or_default()
            .insert(field.to_string(), value.to_string());
        self
    }

    /// A field value, treating the empty string as absent.
    pub fn field(&self, id: ComponentId, field: &str) -> Option<&str> {
        self.fields
            .get(&id)
            .and_then(|m| m.get(field))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// System-wide resource ceiling, applied uniformly to each service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBudget {
    pub cpu_cores: u32,
    pub ram_gb: u32,
}

impl Default for ResourceBudget {
    fn default() -> Self {
        Self {
            cpu_cores: 4,
            ram_gb: 8,
        }
    }
}

/// Externally reported host capacity (from the capacity probe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostCapacity {
    pub cpu_cores: u32,
    pub ram_gb: u32,
}

/// Everything the resolver needs for one deployment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRequest {
    /// Target directory the artifacts will be written into.
    pub install_dir: PathBuf,
    pub selection: SelectionState,
    #[serde(default = "PortAssignment::defaults")]
    pub ports: PortAssignment,
    #[serde(default)]
    pub credentials: CredentialSet,
    #[serde(default)]
    pub budget: ResourceBudget,
    /// Optional image tag pins; components absent here use the catalog
    /// default tag.
    #[serde(default)]
    pub versions: BTreeMap<ComponentId, String>,
    /// Whether the facade should start containers after writing artifacts.
    #[serde(default)]
    pub launch_after_generate: bool,
}

impl DeploymentRequest {
    /// A request with default ports and budget and an empty selection.
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            selection: SelectionState::new(),
            ports: PortAssignment::defaults(),
            credentials: CredentialSet::new(),
            budget: ResourceBudget::default(),
            versions: BTreeMap::new(),
            launch_after_generate: false,
        }
    }

    /// Image reference for a component: pinned tag if supplied, catalog
    /// default otherwise.
    pub fn image_ref(&self, id: ComponentId) -> String {
        let spec = id.spec();
        let tag = self
            .versions
            .get(&id)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(spec.default_tag);
        format!("{}:{}", spec.image, tag)
    }

    /// Parse a request from its JSON wire form.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON (the CLI's request-file format).
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
