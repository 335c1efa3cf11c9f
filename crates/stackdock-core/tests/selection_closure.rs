//! Closure properties of the selection engine across the whole catalog.

use stackdock_core::{ComponentId, SelectionState};

/// Transitive dependency set of a component.
fn transitive_deps(id: ComponentId) -> Vec<ComponentId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(next) = stack.pop() {
        for dep in next.spec().dependencies {
            if !out.contains(dep) {
                out.push(*dep);
                stack.push(*dep);
            }
        }
    }
    out
}

#[test]
fn enable_selects_every_transitive_dependency() {
    for id in ComponentId::ALL {
        let state = SelectionState::new().enable(id);
        assert!(state.is_selected(id));
        for dep in transitive_deps(id) {
            assert!(
                state.is_selected(dep),
                "enable({id}) left dependency {dep} unselected"
            );
        }
    }
}

#[test]
fn disable_leaves_no_selected_dependent_behind() {
    for id in ComponentId::ALL {
        let state = SelectionState::from_enabled(ComponentId::ALL).disable(id);
        for remaining in state.enabled() {
            assert!(
                !remaining.spec().dependencies.contains(&id),
                "disable({id}) left dependent {remaining} selected"
            );
        }
    }
}

#[test]
fn webui_scenario_pulls_in_model_runner() {
    // Enabling the web UI must also select the model runner it depends on.
    let state = SelectionState::new().enable(ComponentId::OpenWebUi);
    assert!(state.is_selected(ComponentId::Ollama));
    assert_eq!(
        state.enabled(),
        vec![ComponentId::Ollama, ComponentId::OpenWebUi]
    );
}

#[test]
fn disabling_model_runner_unselects_web_ui() {
    let state = SelectionState::new().enable(ComponentId::OpenWebUi);
    let state = state.disable(ComponentId::Ollama);
    assert!(!state.is_selected(ComponentId::OpenWebUi));
    assert!(!state.is_selected(ComponentId::Ollama));
    assert!(state.is_empty());
}

#[test]
fn assistant_cascade_covers_indirect_dependents() {
    // Perplexity depends on searxng; dropping searxng must drop perplexity
    // while keeping the unrelated rest of the stack.
    let state = SelectionState::from_enabled(ComponentId::ALL).disable(ComponentId::Searxng);
    assert!(!state.is_selected(ComponentId::Perplexity));
    assert!(state.is_selected(ComponentId::Ollama));
    assert!(state.is_selected(ComponentId::OpenWebUi));
    assert!(state.is_selected(ComponentId::Postgres));
    assert!(state.is_closed());
}
