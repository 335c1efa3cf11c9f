//! Stackdock core: deployment configuration resolution for a local AI stack.
//!
//! Takes a [`DeploymentRequest`] — component selection, port assignments,
//! credentials, resource budget — and turns it into a deterministic
//! docker-compose bundle:
//!
//! - [`catalog`]: the static component registry and dependency graph
//! - [`selection`]: dependency-closed selection as pure value transforms
//! - [`validate`]: accumulate-all-failures configuration validation
//! - [`render`]: byte-deterministic manifest / env-file / README rendering
//! - [`probe`]: injected host collaborators (with in-memory fakes)
//!
//! The core performs no I/O and never logs; host access happens only
//! through the probe traits, and everything else is a pure function of the
//! request value.

pub mod catalog;
pub mod error;
pub mod probe;
pub mod render;
pub mod request;
pub mod selection;
pub mod validate;

pub use catalog::{ComponentId, ComponentSpec, CATALOG};
pub use error::{Result, StackError};
pub use probe::{CapacityProbe, HostProbes, InstallDirProbe, PortProbe};
pub use render::{generate, GeneratedArtifacts};
pub use request::{
    CredentialSet, DeploymentRequest, HostCapacity, PortAssignment, ResourceBudget,
};
pub use selection::SelectionState;
pub use validate::{validate, CheckKind, ValidationIssue, ValidationReport};
