//! Image version lookups against Docker Hub and GitHub.
//!
//! Builds a version map pinning each component to its latest stable tag.
//! Every lookup is best-effort: any failure falls back to the catalog
//! default tag, so an offline host still produces a usable (unpinned)
//! manifest.

use std::collections::BTreeMap;

use serde::Deserialize;
use stackdock_core::ComponentId;
use tracing::{debug, warn};

/// Where a component's latest tag is published.
#[derive(Debug, Clone, Copy)]
enum TagSource {
    /// Docker Hub repository (`namespace/name`).
    DockerHub(&'static str),
    /// GitHub repository (`owner/repo`), latest release tag.
    GitHubRelease(&'static str),
}

const TAG_SOURCES: &[(ComponentId, TagSource)] = &[
    (ComponentId::N8n, TagSource::DockerHub("n8nio/n8n")),
    (ComponentId::Ollama, TagSource::GitHubRelease("ollama/ollama")),
    (
        ComponentId::OpenWebUi,
        TagSource::GitHubRelease("open-webui/open-webui"),
    ),
    (ComponentId::Qdrant, TagSource::DockerHub("qdrant/qdrant")),
    (ComponentId::Postgres, TagSource::DockerHub("library/postgres")),
    (
        ComponentId::Flowise,
        TagSource::DockerHub("flowiseai/flowise"),
    ),
    (
        ComponentId::Searxng,
        TagSource::DockerHub("searxng/searxng"),
    ),
    (
        ComponentId::Perplexity,
        TagSource::GitHubRelease("perplexity-ai/online-inference"),
    ),
];

#[derive(Debug, Deserialize)]
struct DockerHubTagPage {
    results: Vec<DockerHubTag>,
}

#[derive(Debug, Deserialize)]
struct DockerHubTag {
    name: String,
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    tag_name: String,
}

/// Fetch the latest stable tag for every cataloged component, concurrently.
/// Components whose lookup fails keep their catalog default tag.
pub async fn fetch_version_map(client: &reqwest::Client) -> BTreeMap<ComponentId, String> {
    let lookups = TAG_SOURCES
        .iter()
        .map(|(id, source)| fetch_one(client, *id, *source));
    let results = futures::future::join_all(lookups).await;

    results
        .into_iter()
        .map(|(id, tag)| match tag {
            Some(tag) => {
                debug!("pinned {id} to {tag}");
                (id, tag)
            }
            None => {
                warn!("version lookup failed for {id}, using default tag");
                (id, id.spec().default_tag.to_string())
            }
        })
        .collect()
}

async fn fetch_one(
    client: &reqwest::Client,
    id: ComponentId,
    source: TagSource,
) -> (ComponentId, Option<String>) {
    let tag = match source {
        TagSource::DockerHub(repo) => fetch_docker_hub_tag(client, repo).await,
        TagSource::GitHubRelease(repo) => fetch_github_release(client, repo).await,
    };
    (id, tag)
}

async fn fetch_docker_hub_tag(client: &reqwest::Client, repo: &str) -> Option<String> {
    let url = format!("https://hub.docker.com/v2/repositories/{repo}/tags?page_size=100");
    let page: DockerHubTagPage = client.get(&url).send().await.ok()?.json().await.ok()?;
    pick_stable_tag(&page.results)
}

async fn fetch_github_release(client: &reqwest::Client, repo: &str) -> Option<String> {
    let url = format!("https://api.github.com/repos/{repo}/releases/latest");
    let release: GitHubRelease = client.get(&url).send().await.ok()?.json().await.ok()?;
    Some(release.tag_name.trim_start_matches('v').to_string())
}

/// The newest tag that does not look like a pre-release. Tags carrying
/// `rc`, `test`, or `dev` are skipped; newest is decided by the ISO-8601
/// `last_updated` timestamp (lexicographic order works for ISO-8601).
fn pick_stable_tag(tags: &[DockerHubTag]) -> Option<String> {
    tags.iter()
        .filter(|t| {
            !t.name.contains("rc") && !t.name.contains("test") && !t.name.contains("dev")
        })
        .max_by(|a, b| a.last_updated.cmp(&b.last_updated))
        .map(|t| t.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, updated: &str) -> DockerHubTag {
        DockerHubTag {
            name: name.to_string(),
            last_updated: Some(updated.to_string()),
        }
    }

    #[test]
    fn test_pick_stable_tag_prefers_newest() {
        let tags = vec![
            tag("1.63.0", "2024-10-01T00:00:00Z"),
            tag("1.64.0", "2024-11-01T00:00:00Z"),
            tag("latest", "2024-09-01T00:00:00Z"),
        ];
        assert_eq!(pick_stable_tag(&tags), Some("1.64.0".to_string()));
    }

    #[test]
    fn test_pick_stable_tag_skips_prereleases() {
        let tags = vec![
            tag("2.0.0-rc1", "2024-12-01T00:00:00Z"),
            tag("1.9.9-dev", "2024-12-02T00:00:00Z"),
            tag("1.9.8", "2024-11-01T00:00:00Z"),
        ];
        assert_eq!(pick_stable_tag(&tags), Some("1.9.8".to_string()));
    }

    #[test]
    fn test_pick_stable_tag_empty_input() {
        assert_eq!(pick_stable_tag(&[]), None);
        let only_rc = vec![tag("rc1", "2024-01-01T00:00:00Z")];
        assert_eq!(pick_stable_tag(&only_rc), None);
    }

    #[test]
    fn test_every_component_has_a_tag_source() {
        for id in ComponentId::ALL {
            assert!(
                TAG_SOURCES.iter().any(|(sid, _)| *sid == id),
                "no tag source for {id}"
            );
        }
    }
}
