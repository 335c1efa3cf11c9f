//! README rendering: the human-readable summary document.
//!
//! Lists only externally reachable endpoints (host ports, never in-network
//! ports), fixed operational command snippets, and documentation links for
//! the selected components.

use crate::catalog::CATALOG;
use crate::request::DeploymentRequest;

/// Render the README for the selected components.
pub fn render_readme(request: &DeploymentRequest) -> String {
    let mut md = String::from("# AI Infrastructure Setup\n");

    md.push_str("\n## Services\n\n");
    for spec in CATALOG.iter() {
        if request.selection.is_selected(spec.id) {
            md.push_str(&format!(
                "- {}: http://localhost:{}\n",
                spec.display_name,
                request.ports.port_for(spec.id)
            ));
        }
    }

    md.push_str("\n## Management Commands\n");
    md.push_str("\nStart services:\n```bash\ndocker-compose up -d\n```\n");
    md.push_str("\nStop services:\n```bash\ndocker-compose down\n```\n");
    md.push_str("\nView logs:\n```bash\ndocker-compose logs -f\n```\n");

    md.push_str("\n## Configuration\n\n");
    md.push_str(&format!(
        "Installation Directory: {}\n",
        request.install_dir.display()
    ));
    md.push_str(&format!("CPU Cores: {}\n", request.budget.cpu_cores));
    md.push_str(&format!("RAM: {}GB\n", request.budget.ram_gb));

    md.push_str("\n## Documentation Links\n\n");
    for spec in CATALOG.iter() {
        if request.selection.is_selected(spec.id) {
            md.push_str(&format!("- {}: {}\n", spec.display_name, spec.docs_url));
        }
    }

    md
}
