//! Artifact persistence: writes the generated bundle into the install dir.

use std::path::{Path, PathBuf};

use stackdock_core::GeneratedArtifacts;
use tracing::info;

use crate::error::Result;

/// Paths of the artifacts written by [`write_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPaths {
    pub compose: PathBuf,
    pub env: PathBuf,
    pub readme: PathBuf,
}

/// Write `docker-compose.yml`, `.env`, and `README.md` into `install_dir`,
/// creating the directory if needed.
pub async fn write_artifacts(
    install_dir: &Path,
    artifacts: &GeneratedArtifacts,
) -> Result<WrittenPaths> {
    tokio::fs::create_dir_all(install_dir).await?;
    info!("Created directory: {}", install_dir.display());

    let paths = WrittenPaths {
        compose: install_dir.join("docker-compose.yml"),
        env: install_dir.join(".env"),
        readme: install_dir.join("README.md"),
    };

    tokio::fs::write(&paths.compose, &artifacts.compose_yaml).await?;
    info!("Created file: {}", paths.compose.display());
    tokio::fs::write(&paths.env, &artifacts.env_file).await?;
    info!("Created file: {}", paths.env.display());
    tokio::fs::write(&paths.readme, &artifacts.readme).await?;
    info!("Created file: {}", paths.readme.display());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackdock_core::{generate, ComponentId, DeploymentRequest, SelectionState};

    #[tokio::test]
    async fn test_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = DeploymentRequest::new(dir.path());
        request.selection = SelectionState::from_enabled([ComponentId::Ollama]);
        let artifacts = generate(&request).unwrap();

        let paths = write_artifacts(dir.path(), &artifacts).await.unwrap();

        let compose = tokio::fs::read_to_string(&paths.compose).await.unwrap();
        assert_eq!(compose, artifacts.compose_yaml);
        let env = tokio::fs::read_to_string(&paths.env).await.unwrap();
        assert_eq!(env, artifacts.env_file);
        let readme = tokio::fs::read_to_string(&paths.readme).await.unwrap();
        assert_eq!(readme, artifacts.readme);
    }

    #[tokio::test]
    async fn test_writer_creates_missing_install_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ai/stack");
        let mut request = DeploymentRequest::new(&target);
        request.selection = SelectionState::from_enabled([ComponentId::Qdrant]);
        let artifacts = generate(&request).unwrap();

        write_artifacts(&target, &artifacts).await.unwrap();
        assert!(target.join("docker-compose.yml").exists());
    }
}
