//! Configuration validator.
//!
//! Runs five checks in a fixed order and accumulates every failure rather
//! than short-circuiting, so the caller gets the complete list of problems
//! in one pass. Expected configuration problems are data, never `Err`.
//!
//! Check order:
//! 1. dependency completeness
//! 2. port uniqueness among selected components
//! 3. port availability on the host (optional probe)
//! 4. install-path writability (optional probe)
//! 5. requested resources vs. host capacity (optional probe)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::ComponentId;
use crate::probe::HostProbes;
use crate::request::DeploymentRequest;

/// Which validation check produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    DependencyClosure,
    PortUniqueness,
    PortAvailability,
    InstallDir,
    Resources,
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub check: CheckKind,
    pub message: String,
}

/// The outcome of validating a deployment request. Issues appear in check
/// order; an empty list means the request is deployable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether validation passed (no issues).
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    /// The issue messages, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }

    fn push(&mut self, check: CheckKind, message: String) {
        self.issues.push(ValidationIssue { check, message });
    }
}

/// Validate a deployment request against the catalog and the host.
///
/// Pure over the request except for the injected probes; a missing probe
/// skips its check. Never fails — all problems land in the report.
pub async fn validate(request: &DeploymentRequest, probes: &HostProbes) -> ValidationReport {
    let mut report = ValidationReport::default();
    let selected = request.selection.enabled();

    // 1. Dependency completeness.
    for id in &selected {
        for dep in id.spec().dependencies {
            if !request.selection.is_selected(*dep) {
                report.push(
                    CheckKind::DependencyClosure,
                    format!("{id} requires {dep}"),
                );
            }
        }
    }

    // 2. Port uniqueness: one message per duplicated port value, naming
    // every selected holder.
    let mut holders: BTreeMap<u16, Vec<ComponentId>> = BTreeMap::new();
    for id in &selected {
        let port = request.ports.port_for(*id);
        if port == 0 {
            report.push(
                CheckKind::PortUniqueness,
                format!("{id} has invalid port 0"),
            );
            continue;
        }
        holders.entry(port).or_default().push(*id);
    }
    for (port, ids) in &holders {
        if ids.len() > 1 {
            let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
            report.push(
                CheckKind::PortUniqueness,
                format!(
                    "port {port} is assigned to multiple components: {}",
                    names.join(", ")
                ),
            );
        }
    }

    // 3. Port availability on the host.
    if let Some(probe) = &probes.port {
        for id in &selected {
            let port = request.ports.port_for(*id);
            if !probe.is_port_free(port).await {
                report.push(
                    CheckKind::PortAvailability,
                    format!("port {port} required by {id} is already in use"),
                );
            }
        }
    }

    // 4. Install-path writability.
    if let Some(probe) = &probes.install_dir {
        if let Err(reason) = probe.check_writable(&request.install_dir).await {
            report.push(
                CheckKind::InstallDir,
                format!(
                    "install directory {} is not usable: {reason}",
                    request.install_dir.display()
                ),
            );
        }
    }

    // 5. Resource sufficiency.
    if let Some(probe) = &probes.capacity {
        let capacity = probe.capacity().await;
        if request.budget.cpu_cores > capacity.cpu_cores {
            report.push(
                CheckKind::Resources,
                format!(
                    "requested {} CPU cores exceeds host capacity of {}",
                    request.budget.cpu_cores, capacity.cpu_cores
                ),
            );
        }
        if request.budget.ram_gb > capacity.ram_gb {
            report.push(
                CheckKind::Resources,
                format!(
                    "requested {} GB RAM exceeds host capacity of {} GB",
                    request.budget.ram_gb, capacity.ram_gb
                ),
            );
        }
    }

    report
}
