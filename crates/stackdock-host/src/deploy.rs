//! Deployment orchestration facade.
//!
//! The thin boundary between the pure resolver and the host: validates the
//! request, renders artifacts, persists them, optionally starts the stack,
//! and polls container liveness — streaming human-readable progress lines
//! to the caller the whole way. Transport-agnostic: the caller supplies a
//! [`ProgressSink`], whether that feeds a terminal, a channel, or an IPC
//! pipe.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stackdock_core::{
    generate, validate, ComponentId, DeploymentRequest, HostProbes, ValidationReport,
};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::runtime::ComposeRuntime;
use crate::writer::{write_artifacts, WrittenPaths};

/// Receives human-readable progress lines during a deployment.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn emit(&self, line: &str);
}

/// Progress sink that forwards lines into an unbounded channel.
pub struct ChannelSink(pub mpsc::UnboundedSender<String>);

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn emit(&self, line: &str) {
        let _ = self.0.send(line.to_string());
    }
}

/// Outcome of a deployment attempt.
#[derive(Debug)]
pub struct DeployOutcome {
    pub report: ValidationReport,
    /// Paths written; `None` when validation failed.
    pub written: Option<WrittenPaths>,
    /// Per-component liveness after launch; empty when not launched.
    pub services: BTreeMap<ComponentId, bool>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Orchestrates validate → generate → write → (launch) → liveness.
pub struct DeployPipeline {
    probes: HostProbes,
    runtime: ComposeRuntime,
    sink: Arc<dyn ProgressSink>,
}

impl DeployPipeline {
    pub fn new(probes: HostProbes, runtime: ComposeRuntime, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            probes,
            runtime,
            sink,
        }
    }

    /// Run the full deployment flow for one request.
    ///
    /// A failed validation is a normal outcome (`Ok` with issues in the
    /// report, nothing written); `Err` means a host operation failed.
    pub async fn run(&self, request: &DeploymentRequest) -> Result<DeployOutcome> {
        let started_at = Utc::now();

        self.sink.emit("Validating configuration...").await;
        let report = validate(request, &self.probes).await;
        if !report.passed() {
            for message in report.messages() {
                self.sink.emit(&format!("Error: {message}")).await;
            }
            return Ok(DeployOutcome {
                report,
                written: None,
                services: BTreeMap::new(),
                started_at,
                finished_at: Utc::now(),
            });
        }

        self.sink.emit("Generating deployment artifacts...").await;
        let artifacts = generate(request)?;

        self.sink.emit("Creating installation directory...").await;
        let written = write_artifacts(&request.install_dir, &artifacts).await?;
        self.sink
            .emit(&format!("Created file: {}", written.compose.display()))
            .await;
        self.sink
            .emit(&format!("Created file: {}", written.env.display()))
            .await;
        self.sink
            .emit(&format!("Created file: {}", written.readme.display()))
            .await;

        let mut services = BTreeMap::new();
        if request.launch_after_generate {
            self.sink.emit("Pulling Docker images...").await;
            self.runtime.pull(&request.install_dir).await?;

            self.sink.emit("Starting Docker containers...").await;
            self.runtime.up(&request.install_dir).await?;

            services = self.runtime.liveness(&request.selection).await?;
            self.sink
                .emit("Docker containers started successfully")
                .await;
        }

        Ok(DeployOutcome {
            report,
            written: Some(written),
            services,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackdock_core::SelectionState;

    fn pipeline_with_sink() -> (DeployPipeline, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pipeline = DeployPipeline::new(
            HostProbes::none(),
            ComposeRuntime::new(),
            Arc::new(ChannelSink(tx)),
        );
        (pipeline, rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_failed_validation_writes_nothing_and_streams_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = DeploymentRequest::new(dir.path().join("stack"));
        request.selection = SelectionState::from_enabled([
            ComponentId::Qdrant,
            ComponentId::Flowise,
        ]);
        request.ports = request.ports.with_port(ComponentId::Flowise, 6333);

        let (pipeline, mut rx) = pipeline_with_sink();
        let outcome = pipeline.run(&request).await.unwrap();

        assert!(!outcome.report.passed());
        assert!(outcome.written.is_none());
        assert!(!dir.path().join("stack").exists());

        let lines = drain(&mut rx);
        assert!(lines.iter().any(|l| l.starts_with("Error: port 6333")));
    }

    #[tokio::test]
    async fn test_successful_run_without_launch_writes_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut request = DeploymentRequest::new(dir.path());
        request.selection = SelectionState::from_enabled([ComponentId::Ollama]);

        let (pipeline, mut rx) = pipeline_with_sink();
        let outcome = pipeline.run(&request).await.unwrap();

        assert!(outcome.report.passed());
        let written = outcome.written.unwrap();
        assert!(written.compose.exists());
        assert!(outcome.services.is_empty());
        assert!(outcome.finished_at >= outcome.started_at);

        let lines = drain(&mut rx);
        assert!(lines.contains(&"Validating configuration...".to_string()));
        assert!(!lines.contains(&"Pulling Docker images...".to_string()));
    }
}
