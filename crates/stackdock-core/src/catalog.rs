//! Component catalog for the local AI stack.
//!
//! The catalog is the process-wide, read-only registry of everything
//! Stackdock knows how to deploy: image references, ports, volumes,
//! credential schemas, and the hard dependency edges between components.
//!
//! Catalog order is the canonical render order — the manifest generator
//! iterates `CATALOG`, never the user's selection order, so output is
//! byte-stable for a given request.

use serde::{Deserialize, Serialize};

use crate::error::StackError;

/// Stable identifier for a deployable component.
///
/// Wire form is the lowercase string (`"n8n"`, `"openwebui"`, ...). Display
/// casing lives in [`ComponentSpec::display_name`]; nothing else in the
/// system derives names by transforming id casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentId {
    N8n,
    Ollama,
    OpenWebUi,
    Qdrant,
    Postgres,
    Flowise,
    Searxng,
    Perplexity,
}

impl ComponentId {
    /// All component ids in catalog (render) order.
    pub const ALL: [ComponentId; 8] = [
        ComponentId::N8n,
        ComponentId::Ollama,
        ComponentId::OpenWebUi,
        ComponentId::Qdrant,
        ComponentId::Postgres,
        ComponentId::Flowise,
        ComponentId::Searxng,
        ComponentId::Perplexity,
    ];

    /// The lowercase wire id.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentId::N8n => "n8n",
            ComponentId::Ollama => "ollama",
            ComponentId::OpenWebUi => "openwebui",
            ComponentId::Qdrant => "qdrant",
            ComponentId::Postgres => "postgres",
            ComponentId::Flowise => "flowise",
            ComponentId::Searxng => "searxng",
            ComponentId::Perplexity => "perplexity",
        }
    }

    /// The catalog entry for this component.
    pub fn spec(&self) -> &'static ComponentSpec {
        &CATALOG[*self as usize]
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ComponentId {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| StackError::UnknownComponent(s.to_string()))
    }
}

/// A credential field carried by a component: opaque field key in the
/// [`CredentialSet`](crate::request::CredentialSet) mapped to the
/// environment variable the service expects. Empty or absent fields are
/// omitted from rendered output entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialField {
    pub field: &'static str,
    pub env_var: &'static str,
}

/// Cross-component wiring: an environment variable on a dependent service
/// that points at a dependency by its in-network hostname and internal port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceLink {
    pub env_var: &'static str,
    pub target: ComponentId,
    /// URL path suffix appended after `http://<target>:<internal_port>`.
    pub path: &'static str,
}

impl ServiceLink {
    /// Render the in-network URL this link resolves to.
    pub fn url(&self) -> String {
        format!(
            "http://{}:{}{}",
            self.target.as_str(),
            self.target.spec().internal_port,
            self.path
        )
    }
}

/// Immutable descriptor of a deployable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    pub id: ComponentId,
    pub display_name: &'static str,
    pub description: &'static str,
    /// Image reference without a tag (`"n8nio/n8n"`).
    pub image: &'static str,
    /// Tag used when no version map entry is supplied.
    pub default_tag: &'static str,
    /// Default host-published port.
    pub default_port: u16,
    /// Port the service listens on inside the container.
    pub internal_port: u16,
    /// Container path the component's named volume mounts at.
    pub volume_mount: &'static str,
    pub docs_url: &'static str,
    /// Hard dependencies; enabling this component enables these too.
    pub dependencies: &'static [ComponentId],
    /// Credential schema; fields are looked up in the request's credential set.
    pub credential_env: &'static [CredentialField],
    /// Literal `KEY=VALUE` environment entries always emitted.
    pub fixed_env: &'static [&'static str],
    /// Wiring to dependencies via internal hostnames.
    pub links: &'static [ServiceLink],
}

impl ComponentSpec {
    /// Named volume for this component (`<id>_data`), derived only from the id.
    pub fn volume_name(&self) -> String {
        format!("{}_data", self.id.as_str())
    }

    /// Deterministic container name (`ai-<id>-1`), the convention the
    /// liveness poller matches against `docker ps` output.
    pub fn container_name(&self) -> String {
        format!("ai-{}-1", self.id.as_str())
    }

    /// Environment variable naming the host-published port in the env file.
    pub fn port_env_var(&self) -> String {
        format!("{}_PORT", self.id.as_str().to_ascii_uppercase())
    }
}

/// The static component catalog, in render order.
pub const CATALOG: [ComponentSpec; 8] = [
    ComponentSpec {
        id: ComponentId::N8n,
        display_name: "n8n",
        description: "Workflow Automation Platform",
        image: "n8nio/n8n",
        default_tag: "latest",
        default_port: 5678,
        internal_port: 5678,
        volume_mount: "/home/node/.n8n",
        docs_url: "https://docs.n8n.io/",
        dependencies: &[],
        credential_env: &[
            CredentialField {
                field: "username",
                env_var: "N8N_BASIC_AUTH_USER",
            },
            CredentialField {
                field: "password",
                env_var: "N8N_BASIC_AUTH_PASSWORD",
            },
            CredentialField {
                field: "encryption_key",
                env_var: "N8N_ENCRYPTION_KEY",
            },
            CredentialField {
                field: "jwt_secret",
                env_var: "N8N_USER_MANAGEMENT_JWT_SECRET",
            },
        ],
        fixed_env: &["N8N_BASIC_AUTH_ACTIVE=true"],
        links: &[],
    },
    ComponentSpec {
        id: ComponentId::Ollama,
        display_name: "Ollama",
        description: "Local Large Language Model Runner",
        image: "ollama/ollama",
        default_tag: "latest",
        default_port: 11434,
        internal_port: 11434,
        volume_mount: "/root/.ollama",
        docs_url: "https://ollama.ai/docs",
        dependencies: &[],
        credential_env: &[],
        fixed_env: &[],
        links: &[],
    },
    ComponentSpec {
        id: ComponentId::OpenWebUi,
        display_name: "Ollama Web UI",
        description: "Web Interface for Ollama",
        image: "ghcr.io/open-webui/open-webui",
        default_tag: "main",
        default_port: 3000,
        internal_port: 8080,
        volume_mount: "/app/backend/data",
        docs_url: "https://docs.openwebui.com/",
        dependencies: &[ComponentId::Ollama],
        credential_env: &[],
        fixed_env: &[],
        links: &[ServiceLink {
            env_var: "OLLAMA_API_BASE_URL",
            target: ComponentId::Ollama,
            path: "/api",
        }],
    },
    ComponentSpec {
        id: ComponentId::Qdrant,
        display_name: "Qdrant",
        description: "Vector Database",
        image: "qdrant/qdrant",
        default_tag: "latest",
        default_port: 6333,
        internal_port: 6333,
        volume_mount: "/qdrant/storage",
        docs_url: "https://qdrant.tech/documentation/",
        dependencies: &[],
        credential_env: &[CredentialField {
            field: "api_key",
            env_var: "QDRANT_API_KEY",
        }],
        fixed_env: &[],
        links: &[],
    },
    ComponentSpec {
        id: ComponentId::Postgres,
        display_name: "PostgreSQL",
        description: "Relational Database",
        image: "postgres",
        default_tag: "latest",
        default_port: 5432,
        internal_port: 5432,
        volume_mount: "/var/lib/postgresql/data",
        docs_url: "https://www.postgresql.org/docs/",
        dependencies: &[],
        credential_env: &[
            CredentialField {
                field: "username",
                env_var: "POSTGRES_USER",
            },
            CredentialField {
                field: "password",
                env_var: "POSTGRES_PASSWORD",
            },
            CredentialField {
                field: "database",
                env_var: "POSTGRES_DB",
            },
        ],
        fixed_env: &[],
        links: &[],
    },
    ComponentSpec {
        id: ComponentId::Flowise,
        display_name: "Flowise",
        description: "LLM Flow Builder",
        image: "flowiseai/flowise",
        default_tag: "latest",
        default_port: 3001,
        internal_port: 3000,
        volume_mount: "/root/.flowise",
        docs_url: "https://docs.flowiseai.com/",
        dependencies: &[],
        credential_env: &[
            CredentialField {
                field: "username",
                env_var: "FLOWISE_USERNAME",
            },
            CredentialField {
                field: "password",
                env_var: "FLOWISE_PASSWORD",
            },
        ],
        fixed_env: &[],
        links: &[],
    },
    ComponentSpec {
        id: ComponentId::Searxng,
        display_name: "SearXNG",
        description: "Privacy-focused Search Engine",
        image: "searxng/searxng",
        default_tag: "latest",
        default_port: 8080,
        internal_port: 8080,
        volume_mount: "/etc/searxng",
        docs_url: "https://docs.searxng.org/",
        dependencies: &[],
        credential_env: &[CredentialField {
            field: "admin_password",
            env_var: "SEARXNG_ADMIN_PASSWORD",
        }],
        fixed_env: &[],
        links: &[],
    },
    ComponentSpec {
        id: ComponentId::Perplexity,
        display_name: "Perplexity",
        description: "AI Assistant Interface",
        image: "ghcr.io/perplexity-ai/online-inference",
        default_tag: "latest",
        default_port: 3002,
        internal_port: 8080,
        volume_mount: "/app/data",
        docs_url: "https://docs.perplexity.ai/",
        dependencies: &[ComponentId::Ollama, ComponentId::Searxng, ComponentId::Qdrant],
        credential_env: &[],
        fixed_env: &[],
        links: &[
            ServiceLink {
                env_var: "OLLAMA_API_URL",
                target: ComponentId::Ollama,
                path: "",
            },
            ServiceLink {
                env_var: "SEARXNG_API_URL",
                target: ComponentId::Searxng,
                path: "",
            },
            ServiceLink {
                env_var: "QDRANT_URL",
                target: ComponentId::Qdrant,
                path: "",
            },
        ],
    },
];

/// Components whose dependency slice contains `id`, in catalog order.
pub fn dependents_of(id: ComponentId) -> impl Iterator<Item = ComponentId> {
    CATALOG
        .iter()
        .filter(move |spec| spec.dependencies.contains(&id))
        .map(|spec| spec.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    #[test]
    fn test_catalog_order_matches_enum_discriminants() {
        for (idx, spec) in CATALOG.iter().enumerate() {
            assert_eq!(spec.id as usize, idx, "CATALOG[{idx}] id out of order");
            assert_eq!(ComponentId::ALL[idx], spec.id);
        }
    }

    #[test]
    fn test_default_ports_are_unique() {
        let ports: BTreeSet<u16> = CATALOG.iter().map(|s| s.default_port).collect();
        assert_eq!(ports.len(), CATALOG.len());
    }

    #[test]
    fn test_dependency_graph_is_acyclic() {
        // Depth-first walk from every node; a repeat on the active path is a cycle.
        fn walk(id: ComponentId, path: &mut Vec<ComponentId>) {
            assert!(!path.contains(&id), "dependency cycle through {id}");
            path.push(id);
            for dep in id.spec().dependencies {
                walk(*dep, path);
            }
            path.pop();
        }
        for id in ComponentId::ALL {
            walk(id, &mut Vec::new());
        }
    }

    #[test]
    fn test_wire_id_round_trip() {
        for id in ComponentId::ALL {
            assert_eq!(ComponentId::from_str(id.as_str()).unwrap(), id);
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            let back: ComponentId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, id);
        }
    }

    #[test]
    fn test_unknown_id_rejected() {
        let err = ComponentId::from_str("OpenWebUI").unwrap_err();
        assert!(err.to_string().contains("OpenWebUI"));
    }

    #[test]
    fn test_derived_names_are_stable() {
        let spec = ComponentId::OpenWebUi.spec();
        assert_eq!(spec.volume_name(), "openwebui_data");
        assert_eq!(spec.container_name(), "ai-openwebui-1");
        assert_eq!(spec.port_env_var(), "OPENWEBUI_PORT");
    }

    #[test]
    fn test_links_only_point_at_dependencies() {
        for spec in &CATALOG {
            for link in spec.links {
                assert!(
                    spec.dependencies.contains(&link.target),
                    "{} links to {} without depending on it",
                    spec.id,
                    link.target
                );
            }
        }
    }

    #[test]
    fn test_link_url_uses_internal_port() {
        let webui = ComponentId::OpenWebUi.spec();
        assert_eq!(webui.links[0].url(), "http://ollama:11434/api");
    }
}
