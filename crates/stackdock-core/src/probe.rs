//! Injected host-probe collaborators for validation.
//!
//! The validator is pure except for three optional checks that need to look
//! at the host: port availability, install-path writability, and capacity.
//! Each is behind an async trait object so the core stays testable without
//! touching a real network or filesystem; a `None` probe simply skips its
//! check. In-memory fakes live in [`fakes`].

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::request::HostCapacity;

/// Answers "is this port already bound by something outside this deployment".
#[async_trait]
pub trait PortProbe: Send + Sync {
    async fn is_port_free(&self, port: u16) -> bool;
}

/// Reports total host capacity for the resource-sufficiency check.
#[async_trait]
pub trait CapacityProbe: Send + Sync {
    async fn capacity(&self) -> HostCapacity;
}

/// Checks that the install path is a writable directory or creatable as one.
/// Must be side-effect free: a failed validation leaves nothing behind.
#[async_trait]
pub trait InstallDirProbe: Send + Sync {
    /// `Err` carries the human-readable reason the path is unusable.
    async fn check_writable(&self, path: &Path) -> Result<(), String>;
}

/// The validator's optional host collaborators, bundled.
#[derive(Clone, Default)]
pub struct HostProbes {
    pub port: Option<Arc<dyn PortProbe>>,
    pub capacity: Option<Arc<dyn CapacityProbe>>,
    pub install_dir: Option<Arc<dyn InstallDirProbe>>,
}

impl HostProbes {
    /// No probes: only the pure checks (dependencies, port uniqueness) run.
    pub fn none() -> Self {
        Self::default()
    }
}

/// In-memory probe fakes satisfying the trait contracts for tests.
pub mod fakes {
    use std::collections::BTreeSet;

    use super::*;

    /// Port probe backed by a fixed set of busy ports.
    #[derive(Debug, Default)]
    pub struct StaticPortProbe {
        busy: BTreeSet<u16>,
    }

    impl StaticPortProbe {
        pub fn with_busy<I: IntoIterator<Item = u16>>(ports: I) -> Self {
            Self {
                busy: ports.into_iter().collect(),
            }
        }
    }

    #[async_trait]
    impl PortProbe for StaticPortProbe {
        async fn is_port_free(&self, port: u16) -> bool {
            !self.busy.contains(&port)
        }
    }

    /// Capacity probe returning a fixed capacity.
    #[derive(Debug)]
    pub struct StaticCapacityProbe {
        pub capacity: HostCapacity,
    }

    #[async_trait]
    impl CapacityProbe for StaticCapacityProbe {
        async fn capacity(&self) -> HostCapacity {
            self.capacity
        }
    }

    /// Install-dir probe that accepts everything or fails with a canned reason.
    #[derive(Debug, Default)]
    pub struct StaticInstallDirProbe {
        pub failure: Option<String>,
    }

    impl StaticInstallDirProbe {
        pub fn rejecting(reason: &str) -> Self {
            Self {
                failure: Some(reason.to_string()),
            }
        }
    }

    #[async_trait]
    impl InstallDirProbe for StaticInstallDirProbe {
        async fn check_writable(&self, _path: &Path) -> Result<(), String> {
            match &self.failure {
                Some(reason) => Err(reason.clone()),
                None => Ok(()),
            }
        }
    }
}
