//! Selection engine: dependency-closed component selection.
//!
//! `SelectionState` is a value type — [`enable`](SelectionState::enable) and
//! [`disable`](SelectionState::disable) return new states rather than
//! mutating, so any UI or CLI layer can hold the current value and re-invoke
//! them freely. The invariant maintained at all times: every selected
//! component has all of its declared dependencies selected.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{dependents_of, ComponentId};

/// Which components are selected for deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState {
    selected: BTreeMap<ComponentId, bool>,
}

impl SelectionState {
    /// Empty selection (nothing enabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from enabled ids, closing over dependencies.
    pub fn from_enabled<I: IntoIterator<Item = ComponentId>>(ids: I) -> Self {
        let mut state = Self::new();
        for id in ids {
            state = state.enable(id);
        }
        state
    }

    pub fn is_selected(&self, id: ComponentId) -> bool {
        self.selected.get(&id).copied().unwrap_or(false)
    }

    /// Selected ids in catalog order.
    pub fn enabled(&self) -> Vec<ComponentId> {
        ComponentId::ALL
            .into_iter()
            .filter(|id| self.is_selected(*id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.values().all(|v| !v)
    }

    /// Enable `id` and, transitively, everything it depends on.
    /// Idempotent. The catalog graph is acyclic by construction, but the
    /// walk carries a visited set so a malformed graph cannot loop.
    #[must_use]
    pub fn enable(&self, id: ComponentId) -> Self {
        let mut next = self.clone();
        let mut visited = BTreeSet::new();
        enable_walk(&mut next.selected, id, &mut visited);
        next
    }

    /// Disable `id` and, transitively, every component that depends on it.
    /// A dependent cannot stay enabled once its dependency is gone.
    #[must_use]
    pub fn disable(&self, id: ComponentId) -> Self {
        let mut next = self.clone();
        let mut visited = BTreeSet::new();
        disable_walk(&mut next.selected, id, &mut visited);
        next
    }

    /// Whether `id` has at least one unselected dependency. Informational:
    /// callers use it to grey out a direct toggle, but `enable` still works
    /// (it pulls the dependencies in itself).
    pub fn is_locked(&self, id: ComponentId) -> bool {
        id.spec()
            .dependencies
            .iter()
            .any(|dep| !self.is_selected(*dep))
    }

    /// Check the dependency-closure invariant, returning the first gap as
    /// `(component, missing dependency)` if there is one.
    pub fn closure_gap(&self) -> Option<(ComponentId, ComponentId)> {
        for id in self.enabled() {
            for dep in id.spec().dependencies {
                if !self.is_selected(*dep) {
                    return Some((id, *dep));
                }
            }
        }
        None
    }

    /// True when every selected component has all dependencies selected.
    pub fn is_closed(&self) -> bool {
        self.closure_gap().is_none()
    }
}

fn enable_walk(
    selected: &mut BTreeMap<ComponentId, bool>,
    id: ComponentId,
    visited: &mut BTreeSet<ComponentId>,
) {
    if !visited.insert(id) {
        return;
    }
    selected.insert(id, true);
    for dep in id.spec().dependencies {
        enable_walk(selected, *dep, visited);
    }
}

fn disable_walk(
    selected: &mut BTreeMap<ComponentId, bool>,
    id: ComponentId,
    visited: &mut BTreeSet<ComponentId>,
) {
    if !visited.insert(id) {
        return;
    }
    selected.insert(id, false);
    for dependent in dependents_of(id) {
        disable_walk(selected, dependent, visited);
    }
}
