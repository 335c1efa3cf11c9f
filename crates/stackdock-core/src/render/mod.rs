//! Artifact rendering: docker-compose manifest, `.env` file, README.
//!
//! `generate` is a pure, deterministic function of a valid request — no
//! I/O, no clock, no randomness. Calling it twice with the same request
//! yields byte-identical artifacts; the bundle digest makes that cheap to
//! assert (golden equality).

mod compose;
mod envfile;
mod readme;

use sha2::{Digest, Sha256};

use crate::error::{Result, StackError};
use crate::request::DeploymentRequest;

pub use compose::render_compose;
pub use envfile::render_env_file;
pub use readme::render_readme;

/// The three text artifacts produced for a deployment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub compose_yaml: String,
    pub env_file: String,
    pub readme: String,
}

impl GeneratedArtifacts {
    /// SHA-256 over all three artifacts, for golden-equality comparison
    /// across invocations.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [&self.compose_yaml, &self.env_file, &self.readme] {
            hasher.update(part.as_bytes());
            hasher.update(b"\0");
        }
        hex::encode(hasher.finalize())
    }
}

/// Render all artifacts for a request.
///
/// # Errors
///
/// Returns [`StackError::UnclosedSelection`] or [`StackError::EmptySelection`]
/// when the request violates the generator's contract — callers must run
/// [`validate`](crate::validate::validate) first. A contract-conforming
/// request cannot fail.
pub fn generate(request: &DeploymentRequest) -> Result<GeneratedArtifacts> {
    if request.selection.is_empty() {
        return Err(StackError::EmptySelection);
    }
    if let Some((component, dependency)) = request.selection.closure_gap() {
        return Err(StackError::UnclosedSelection {
            component,
            dependency,
        });
    }

    Ok(GeneratedArtifacts {
        compose_yaml: render_compose(request),
        env_file: render_env_file(request),
        readme: render_readme(request),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentId;
    use crate::selection::SelectionState;

    #[test]
    fn test_generate_rejects_empty_selection() {
        let request = DeploymentRequest::new("/opt/ai");
        assert!(matches!(
            generate(&request),
            Err(StackError::EmptySelection)
        ));
    }

    #[test]
    fn test_generate_rejects_unclosed_selection() {
        let mut request = DeploymentRequest::new("/opt/ai");
        // Bypass the selection engine: wire form allows unclosed maps.
        request.selection =
            serde_json::from_str(r#"{ "openwebui": true, "ollama": false }"#).unwrap();

        match generate(&request) {
            Err(StackError::UnclosedSelection {
                component,
                dependency,
            }) => {
                assert_eq!(component, ComponentId::OpenWebUi);
                assert_eq!(dependency, ComponentId::Ollama);
            }
            other => panic!("expected UnclosedSelection, got {other:?}"),
        }
    }

    #[test]
    fn test_digest_tracks_content() {
        let mut request = DeploymentRequest::new("/opt/ai");
        request.selection = SelectionState::from_enabled([ComponentId::Ollama]);
        let a = generate(&request).unwrap();

        request.ports = request.ports.with_port(ComponentId::Ollama, 11500);
        let b = generate(&request).unwrap();

        assert_eq!(a.digest().len(), 64);
        assert_ne!(a.digest(), b.digest());
    }
}
