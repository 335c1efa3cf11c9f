//! `.env` file rendering: flat `KEY=VALUE` lines grouped under comment
//! headers, restricted to the selected components.

use crate::catalog::CATALOG;
use crate::request::DeploymentRequest;

/// Render the environment file for the selected components.
pub fn render_env_file(request: &DeploymentRequest) -> String {
    let mut out = String::new();

    out.push_str("# Environment Configuration\n");
    out.push_str(&format!(
        "INSTALL_DIR={}\n",
        request.install_dir.display()
    ));

    out.push_str("\n# Credentials\n");
    for spec in CATALOG.iter() {
        if !request.selection.is_selected(spec.id) {
            continue;
        }
        for field in spec.credential_env {
            if let Some(value) = request.credentials.field(spec.id, field.field) {
                out.push_str(&format!("{}={value}\n", field.env_var));
            }
        }
    }

    out.push_str("\n# Port Configuration\n");
    for spec in CATALOG.iter() {
        if request.selection.is_selected(spec.id) {
            out.push_str(&format!(
                "{}={}\n",
                spec.port_env_var(),
                request.ports.port_for(spec.id)
            ));
        }
    }

    out.push_str("\n# Resource Limits\n");
    out.push_str(&format!("CPU_CORES={}\n", request.budget.cpu_cores));
    out.push_str(&format!("RAM_GB={}\n", request.budget.ram_gb));

    out
}
