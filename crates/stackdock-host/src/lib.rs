//! Stackdock host layer: everything that touches the machine.
//!
//! The core resolver is pure; this crate supplies its collaborators:
//!
//! - [`probes`]: real implementations of the core's probe traits
//! - [`writer`]: artifact persistence into the install directory
//! - [`runtime`]: docker-compose invocation and container liveness
//! - [`versions`]: latest-stable image tag lookups (Docker Hub, GitHub)
//! - [`deploy`]: the orchestration facade tying it all together

pub mod deploy;
pub mod error;
pub mod probes;
pub mod runtime;
pub mod versions;
pub mod writer;

pub use deploy::{ChannelSink, DeployOutcome, DeployPipeline, ProgressSink};
pub use error::{HostError, Result};
pub use probes::{FsInstallDirProbe, SysCapacityProbe, TcpPortProbe};
pub use runtime::{is_docker_available, ComposeRuntime};
pub use versions::fetch_version_map;
pub use writer::{write_artifacts, WrittenPaths};

use std::sync::Arc;

use stackdock_core::{CapacityProbe, HostProbes};

/// Probe bundle wired to the real host: TCP port checks, filesystem
/// writability, and capacity when `/proc/meminfo` is readable.
pub fn detect_probes() -> HostProbes {
    HostProbes {
        port: Some(Arc::new(TcpPortProbe)),
        capacity: SysCapacityProbe::detect()
            .map(|p| Arc::new(p) as Arc<dyn CapacityProbe>),
        install_dir: Some(Arc::new(FsInstallDirProbe)),
    }
}
