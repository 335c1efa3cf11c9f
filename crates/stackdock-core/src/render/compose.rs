//! docker-compose manifest rendering.
//!
//! Iterates the catalog in its fixed order and emits one service block per
//! selected component: image, container name, published port pair,
//! environment (credentials with empty fields omitted, fixed entries,
//! dependency wiring by internal hostname), named volume, shared network,
//! `depends_on`, and the uniform resource-limit block.

use crate::catalog::{ComponentSpec, CATALOG};
use crate::request::DeploymentRequest;

const NETWORK_NAME: &str = "ai-network";
const COMPOSE_VERSION: &str = "3.8";

/// Render the compose manifest for the selected components.
pub fn render_compose(request: &DeploymentRequest) -> String {
    let mut out = String::new();
    out.push_str(&format!("version: '{COMPOSE_VERSION}'\n"));
    out.push_str("\nservices:\n");

    for spec in CATALOG.iter() {
        if !request.selection.is_selected(spec.id) {
            continue;
        }
        render_service(&mut out, spec, request);
    }

    out.push_str("\nnetworks:\n");
    out.push_str(&format!("  {NETWORK_NAME}:\n"));
    out.push_str("    driver: bridge\n");

    out.push_str("\nvolumes:\n");
    for spec in CATALOG.iter() {
        if request.selection.is_selected(spec.id) {
            out.push_str(&format!("  {}:\n", spec.volume_name()));
        }
    }

    out
}

fn render_service(out: &mut String, spec: &ComponentSpec, request: &DeploymentRequest) {
    let host_port = request.ports.port_for(spec.id);

    out.push_str(&format!("  {}:\n", spec.id));
    out.push_str(&format!("    image: {}\n", request.image_ref(spec.id)));
    out.push_str(&format!("    container_name: {}\n", spec.container_name()));
    out.push_str("    ports:\n");
    out.push_str(&format!(
        "      - \"{host_port}:{}\"\n",
        spec.internal_port
    ));

    let env = environment_lines(spec, request);
    if !env.is_empty() {
        out.push_str("    environment:\n");
        for line in &env {
            out.push_str(&format!("      - {line}\n"));
        }
    }

    out.push_str("    volumes:\n");
    out.push_str(&format!(
        "      - {}:{}\n",
        spec.volume_name(),
        spec.volume_mount
    ));

    out.push_str("    networks:\n");
    out.push_str(&format!("      - {NETWORK_NAME}\n"));

    if !spec.dependencies.is_empty() {
        out.push_str("    depends_on:\n");
        for dep in spec.dependencies {
            out.push_str(&format!("      - {dep}\n"));
        }
    }

    out.push_str("    deploy:\n");
    out.push_str("      resources:\n");
    out.push_str("        limits:\n");
    out.push_str(&format!("          cpus: '{}'\n", request.budget.cpu_cores));
    out.push_str(&format!("          memory: {}G\n", request.budget.ram_gb));
}

/// Environment entries for one service: fixed entries first, then the
/// credential schema (empty fields omitted, never emitted as `KEY=`),
/// then dependency wiring via in-network hostnames and internal ports.
fn environment_lines(spec: &ComponentSpec, request: &DeploymentRequest) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for fixed in spec.fixed_env {
        lines.push((*fixed).to_string());
    }

    for field in spec.credential_env {
        if let Some(value) = request.credentials.field(spec.id, field.field) {
            lines.push(format!("{}={value}", field.env_var));
        }
    }

    for link in spec.links {
        lines.push(format!("{}={}", link.env_var, link.url()));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentId;
    use crate::selection::SelectionState;

    fn request_with(ids: &[ComponentId]) -> DeploymentRequest {
        let mut request = DeploymentRequest::new("/opt/ai");
        request.selection = SelectionState::from_enabled(ids.iter().copied());
        request
    }

    #[test]
    fn test_service_block_iff_selected() {
        let request = request_with(&[ComponentId::Ollama, ComponentId::Qdrant]);
        let compose = render_compose(&request);

        assert!(compose.contains("  ollama:\n"));
        assert!(compose.contains("  qdrant:\n"));
        for id in [
            ComponentId::N8n,
            ComponentId::OpenWebUi,
            ComponentId::Postgres,
            ComponentId::Flowise,
            ComponentId::Searxng,
            ComponentId::Perplexity,
        ] {
            assert!(
                !compose.contains(&format!("  {id}:\n")),
                "unselected {id} leaked into manifest"
            );
        }
    }

    #[test]
    fn test_port_mapping_is_host_to_internal() {
        let mut request = request_with(&[ComponentId::OpenWebUi]);
        request.ports = request.ports.with_port(ComponentId::OpenWebUi, 3005);
        let compose = render_compose(&request);
        // open-webui listens on 8080 in-container regardless of the host port.
        assert!(compose.contains("- \"3005:8080\""));
    }

    #[test]
    fn test_wiring_uses_internal_hostname_and_port() {
        let mut request = request_with(&[ComponentId::OpenWebUi]);
        // Remapping ollama's host port must not leak into the wiring.
        request.ports = request.ports.with_port(ComponentId::Ollama, 21434);
        let compose = render_compose(&request);

        assert!(compose.contains("OLLAMA_API_BASE_URL=http://ollama:11434/api"));
        assert!(!compose.contains("21434/api"));
    }

    #[test]
    fn test_empty_credential_fields_are_omitted() {
        let mut request = request_with(&[ComponentId::Qdrant]);
        request.credentials = request
            .credentials
            .clone()
            .with_field(ComponentId::Qdrant, "api_key", "");
        let compose = render_compose(&request);

        assert!(!compose.contains("QDRANT_API_KEY"));
        // No dangling environment section for a service with nothing to emit.
        assert!(!compose.contains("environment:\n    volumes:"));
    }

    #[test]
    fn test_credentials_rendered_when_present() {
        let mut request = request_with(&[ComponentId::Postgres]);
        request.credentials = request
            .credentials
            .clone()
            .with_field(ComponentId::Postgres, "username", "admin")
            .with_field(ComponentId::Postgres, "password", "s3cret")
            .with_field(ComponentId::Postgres, "database", "ai");
        let compose = render_compose(&request);

        assert!(compose.contains("- POSTGRES_USER=admin"));
        assert!(compose.contains("- POSTGRES_PASSWORD=s3cret"));
        assert!(compose.contains("- POSTGRES_DB=ai"));
    }

    #[test]
    fn test_volumes_scoped_to_selection() {
        let request = request_with(&[ComponentId::Ollama, ComponentId::Postgres]);
        let compose = render_compose(&request);
        let volumes = compose.split("\nvolumes:\n").nth(1).unwrap();

        assert!(volumes.contains("ollama_data:"));
        assert!(volumes.contains("postgres_data:"));
        assert!(!volumes.contains("qdrant_data:"));
        assert!(!volumes.contains("n8n_data:"));
    }

    #[test]
    fn test_depends_on_lists_catalog_dependencies() {
        let request = request_with(&[ComponentId::Perplexity]);
        let compose = render_compose(&request);
        let perplexity = compose.split("  perplexity:\n").nth(1).unwrap();

        assert!(perplexity.contains("depends_on:"));
        for dep in ["ollama", "searxng", "qdrant"] {
            assert!(perplexity.contains(&format!("      - {dep}\n")));
        }
    }

    #[test]
    fn test_resource_limits_from_budget() {
        let mut request = request_with(&[ComponentId::Ollama]);
        request.budget.cpu_cores = 6;
        request.budget.ram_gb = 12;
        let compose = render_compose(&request);

        assert!(compose.contains("cpus: '6'"));
        assert!(compose.contains("memory: 12G"));
    }
}
