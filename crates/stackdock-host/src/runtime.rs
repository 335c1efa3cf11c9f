//! docker-compose runtime wrapper and container liveness polling.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use stackdock_core::{ComponentId, SelectionState};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{HostError, Result};

/// Check whether the Docker CLI is reachable on this host.
pub async fn is_docker_available() -> bool {
    match Command::new("docker").arg("info").output().await {
        Ok(out) => out.status.success(),
        Err(_) => false,
    }
}

/// Thin wrapper over the `docker-compose` CLI, run in a project directory.
#[derive(Debug, Clone)]
pub struct ComposeRuntime {
    compose_bin: String,
}

impl Default for ComposeRuntime {
    fn default() -> Self {
        Self {
            compose_bin: "docker-compose".to_string(),
        }
    }
}

impl ComposeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different compose entry point (e.g. `docker` with the
    /// `compose` plugin, via a shim).
    pub fn with_binary(bin: &str) -> Self {
        Self {
            compose_bin: bin.to_string(),
        }
    }

    /// `docker-compose pull` in the install dir.
    pub async fn pull(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["pull"]).await
    }

    /// `docker-compose up -d` in the install dir.
    pub async fn up(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["up", "-d"]).await
    }

    /// `docker-compose down` in the install dir.
    pub async fn down(&self, dir: &Path) -> Result<()> {
        self.run(dir, &["down"]).await
    }

    async fn run(&self, dir: &Path, args: &[&str]) -> Result<()> {
        debug!("{} {} in {}", self.compose_bin, args.join(" "), dir.display());
        let output = Command::new(&self.compose_bin)
            .args(args)
            .current_dir(dir)
            .output()
            .await
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => HostError::DockerNotFound,
                _ => HostError::Io(err),
            })?;

        if output.status.success() {
            info!("{} {} succeeded", self.compose_bin, args.join(" "));
            Ok(())
        } else {
            Err(HostError::ComposeFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }

    /// Names of all running containers, via `docker ps`.
    pub async fn running_containers(&self) -> Result<BTreeSet<String>> {
        let output = Command::new("docker")
            .args(["ps", "--format", "{{.Names}}"])
            .output()
            .await
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => HostError::DockerNotFound,
                _ => HostError::Io(err),
            })?;

        if !output.status.success() {
            return Err(HostError::ComposeFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_container_names(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    /// Liveness map for a selection: which selected components have a
    /// running container matching the `ai-<id>-1` naming convention.
    pub async fn liveness(&self, selection: &SelectionState) -> Result<BTreeMap<ComponentId, bool>> {
        let running = self.running_containers().await?;
        Ok(liveness_from_names(selection, &running))
    }
}

/// Parse `docker ps --format {{.Names}}` output into a name set.
pub fn parse_container_names(stdout: &str) -> BTreeSet<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fold running container names into a per-component liveness map.
pub fn liveness_from_names(
    selection: &SelectionState,
    running: &BTreeSet<String>,
) -> BTreeMap<ComponentId, bool> {
    selection
        .enabled()
        .into_iter()
        .map(|id| (id, running.contains(&id.spec().container_name())))
        .collect()
}
