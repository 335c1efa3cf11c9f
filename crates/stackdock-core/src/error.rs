//! Core error taxonomy.
//!
//! Expected configuration problems (port conflicts, dependency gaps, ...)
//! are *data*, reported through
//! [`ValidationReport`](crate::validate::ValidationReport) — they never show
//! up here. `StackError` covers contract violations and serialization only.

use crate::catalog::ComponentId;

/// Stackdock core errors.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("unknown component id: {0}")]
    UnknownComponent(String),

    /// `generate` was handed a selection that is not dependency-closed.
    /// Callers must run validation first; this is a programming error,
    /// not a user-facing validation failure.
    #[error("selection is not dependency-closed: {component} requires {dependency}")]
    UnclosedSelection {
        component: ComponentId,
        dependency: ComponentId,
    },

    #[error("nothing selected: a deployment request must enable at least one component")]
    EmptySelection,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, StackError>;
