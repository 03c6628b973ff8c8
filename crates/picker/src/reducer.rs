//! Picker state machine.
//!
//! ```text
//! Idle --Mounted--> Loading --TreeLoaded--> Ready --Opened--> open
//!                      │                      ▲                 │
//!                      └--LoadFailed--> Failed┘ (ReloadRequested)│
//!                                                               ├─ SearchChanged / ToggleNode (no effects)
//!                                                               ├─ NodeSelected(leaf) ─> EmitChange, closed
//!                                                               └─ CreateRequested ─> CreateCategory
//!                                                                    ├─ CreateSucceeded ─> append, EmitChange, closed
//!                                                                    └─ CreateFailed ─> Notify, stays open
//! ```

use crate::state::{LoadPhase, PickerState};
use catalog_taxonomy::{append_root_leaf, find_node, CategoryId, CategoryNode, NormalizedCategory};

#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    Mounted,
    TreeLoaded(Vec<CategoryNode>),
    LoadFailed(String),
    ReloadRequested,
    Opened,
    Closed,
    ToggleNode(CategoryId),
    SearchChanged(String),
    NodeSelected(CategoryId),
    CreateRequested(String),
    CreateSucceeded(NormalizedCategory),
    CreateFailed(String),
    /// Host changed the selected value
    SelectedValueChanged(Option<CategoryId>),
    DisabledChanged(bool),
}

/// Work the driver performs after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchTree,
    CreateCategory(String),
    /// Host `on_change`; fires once per committed selection or creation
    EmitChange(CategoryId),
    Notify(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PickerState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: PickerState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: PickerState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

/// Pure transition function: `(state, event) -> (state, effects)`
pub fn reduce(mut state: PickerState, event: PickerEvent) -> Transition {
    match event {
        PickerEvent::Mounted => {
            if state.phase != LoadPhase::Idle {
                return Transition::unchanged(state);
            }
            state.phase = LoadPhase::Loading;
            Transition::with(state, Effect::FetchTree)
        }

        PickerEvent::TreeLoaded(tree) => {
            if state.phase != LoadPhase::Loading {
                return Transition::unchanged(state);
            }
            state.tree = tree;
            state.search_toggles.clear();
            state.phase = LoadPhase::Ready;
            state.selected_label = state.hydrate_label(state.selected_id.as_ref());
            Transition::unchanged(state)
        }

        PickerEvent::LoadFailed(message) => {
            if state.phase != LoadPhase::Loading {
                return Transition::unchanged(state);
            }
            state.phase = LoadPhase::Failed { message };
            state.open = false;
            Transition::unchanged(state)
        }

        PickerEvent::ReloadRequested => {
            if state.phase == LoadPhase::Loading {
                return Transition::unchanged(state);
            }
            state.phase = LoadPhase::Loading;
            state.open = false;
            Transition::with(state, Effect::FetchTree)
        }

        PickerEvent::Opened => {
            if state.disabled || state.phase != LoadPhase::Ready {
                return Transition::unchanged(state);
            }
            state.open = true;
            state.notice = None;
            Transition::unchanged(state)
        }

        PickerEvent::Closed => {
            state.open = false;
            state.set_search(String::new());
            state.notice = None;
            Transition::unchanged(state)
        }

        PickerEvent::ToggleNode(id) => {
            if state.phase == LoadPhase::Ready {
                state.toggle(&id);
            }
            Transition::unchanged(state)
        }

        PickerEvent::SearchChanged(term) => {
            state.set_search(term);
            Transition::unchanged(state)
        }

        PickerEvent::NodeSelected(id) => {
            if state.disabled || state.phase != LoadPhase::Ready {
                return Transition::unchanged(state);
            }
            let Some(node) = find_node(&state.tree, &id) else {
                return Transition::unchanged(state);
            };
            if !node.is_leaf() && !state.config.allow_branch_selection {
                state.toggle(&id);
                return Transition::unchanged(state);
            }
            let label = node.label.clone();
            commit(state, &id, label)
        }

        PickerEvent::CreateRequested(name) => {
            let name = name.trim().to_string();
            if name.is_empty() || !state.can_offer_create() {
                return Transition::unchanged(state);
            }
            state.is_creating = true;
            state.notice = None;
            Transition::with(state, Effect::CreateCategory(name))
        }

        PickerEvent::CreateSucceeded(category) => {
            if !state.is_creating {
                return Transition::unchanged(state);
            }
            state.is_creating = false;
            state.tree = append_root_leaf(&state.tree, category.clone().into_leaf());
            commit(state, &category.id, category.name)
        }

        PickerEvent::CreateFailed(message) => {
            if !state.is_creating {
                return Transition::unchanged(state);
            }
            state.is_creating = false;
            state.notice = Some(message.clone());
            Transition::with(state, Effect::Notify(message))
        }

        PickerEvent::SelectedValueChanged(id) => {
            state.selected_label = state.hydrate_label(id.as_ref());
            state.selected_id = id;
            Transition::unchanged(state)
        }

        PickerEvent::DisabledChanged(disabled) => {
            state.disabled = disabled;
            if disabled {
                state.open = false;
            }
            Transition::unchanged(state)
        }
    }
}

fn commit(mut state: PickerState, id: &CategoryId, label: String) -> Transition {
    let emitted = state.config.id_coercion.apply(id);
    state.selected_id = Some(emitted.clone());
    state.selected_label = Some(label);
    state.open = false;
    state.set_search(String::new());
    state.notice = None;
    Transition::with(state, Effect::EmitChange(emitted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdCoercion, PickerConfig};
    use pretty_assertions::assert_eq;

    fn tree() -> Vec<CategoryNode> {
        vec![
            CategoryNode::leaf("10", "Shoes").with_children(vec![
                CategoryNode::leaf("11", "Boots"),
                CategoryNode::leaf("sku-x", "Sandals"),
            ]),
            CategoryNode::leaf(20, "Hats"),
        ]
    }

    fn config() -> PickerConfig {
        PickerConfig {
            create_new_enabled: true,
            ..PickerConfig::default()
        }
    }

    fn run(state: PickerState, events: Vec<PickerEvent>) -> (PickerState, Vec<Effect>) {
        events.into_iter().fold((state, Vec::new()), |(state, mut effects), event| {
            let transition = reduce(state, event);
            effects.extend(transition.effects);
            (transition.state, effects)
        })
    }

    fn ready_open(selected: Option<CategoryId>) -> PickerState {
        let (state, _) = run(
            PickerState::new(config(), selected),
            vec![
                PickerEvent::Mounted,
                PickerEvent::TreeLoaded(tree()),
                PickerEvent::Opened,
            ],
        );
        state
    }

    #[test]
    fn mount_fetches_once() {
        let (state, effects) = run(
            PickerState::new(config(), None),
            vec![PickerEvent::Mounted, PickerEvent::Mounted],
        );
        assert!(state.is_loading());
        assert_eq!(effects, vec![Effect::FetchTree]);
    }

    #[test]
    fn tree_load_hydrates_selected_label() {
        let state = ready_open(Some(CategoryId::from(11)));
        assert!(state.is_ready());
        assert_eq!(state.selected_label(), Some("Boots"));
        assert_eq!(state.display_text(), "Boots");
    }

    #[test]
    fn reopening_does_not_refetch() {
        let (state, effects) = run(
            ready_open(None),
            vec![PickerEvent::Closed, PickerEvent::Opened],
        );
        assert!(state.is_open());
        assert!(effects.is_empty());
    }

    #[test]
    fn load_failure_then_manual_reload() {
        let (state, effects) = run(
            PickerState::new(config(), None),
            vec![
                PickerEvent::Mounted,
                PickerEvent::LoadFailed("503".to_string()),
                PickerEvent::Opened,
            ],
        );
        assert_eq!(state.load_error(), Some("503"));
        assert!(!state.is_open());
        assert_eq!(effects, vec![Effect::FetchTree]);

        let (state, effects) = run(
            state,
            vec![PickerEvent::ReloadRequested, PickerEvent::TreeLoaded(tree())],
        );
        assert!(state.is_ready());
        assert_eq!(effects, vec![Effect::FetchTree]);
    }

    #[test]
    fn selecting_leaf_emits_coerced_id_and_closes() {
        let (state, effects) = run(
            ready_open(None),
            vec![
                PickerEvent::SearchChanged("boo".to_string()),
                PickerEvent::NodeSelected(CategoryId::from("11")),
            ],
        );
        assert_eq!(effects, vec![Effect::EmitChange(CategoryId::from(11))]);
        assert!(!state.is_open());
        assert_eq!(state.search_term(), "");
        assert_eq!(state.selected_label(), Some("Boots"));
    }

    #[test]
    fn non_numeric_ids_pass_through() {
        let (_, effects) = run(
            ready_open(None),
            vec![PickerEvent::NodeSelected(CategoryId::from("sku-x"))],
        );
        assert_eq!(effects, vec![Effect::EmitChange(CategoryId::from("sku-x"))]);
    }

    #[test]
    fn preserve_mode_keeps_text_ids() {
        let mut state = ready_open(None);
        state.config.id_coercion = IdCoercion::Preserve;
        let (_, effects) = run(state, vec![PickerEvent::NodeSelected(CategoryId::from("11"))]);
        assert_eq!(effects, vec![Effect::EmitChange(CategoryId::from("11"))]);
    }

    #[test]
    fn selecting_branch_toggles_without_emitting() {
        let (state, effects) = run(
            ready_open(None),
            vec![PickerEvent::NodeSelected(CategoryId::from("10"))],
        );
        assert!(effects.is_empty());
        assert!(state.tree()[0].expanded);
        assert!(state.is_open());
    }

    #[test]
    fn toggling_during_search_collapses_auto_expanded_branch() {
        let (state, effects) = run(
            ready_open(None),
            vec![
                PickerEvent::SearchChanged("boo".to_string()),
                PickerEvent::ToggleNode(CategoryId::from("10")),
            ],
        );
        assert!(effects.is_empty());
        assert!(!state.visible_tree()[0].expanded);

        let (state, _) = run(state, vec![PickerEvent::NodeSelected(CategoryId::from("10"))]);
        assert!(state.visible_tree()[0].expanded);

        let (state, _) = run(
            state,
            vec![
                PickerEvent::ToggleNode(CategoryId::from("10")),
                PickerEvent::SearchChanged("boot".to_string()),
            ],
        );
        assert!(state.visible_tree()[0].expanded);
        assert!(!state.tree()[0].expanded);
    }

    #[test]
    fn branch_selection_when_allowed() {
        let mut state = ready_open(None);
        state.config.allow_branch_selection = true;
        let (_, effects) = run(state, vec![PickerEvent::NodeSelected(CategoryId::from("10"))]);
        assert_eq!(effects, vec![Effect::EmitChange(CategoryId::from(10))]);
    }

    #[test]
    fn toggle_and_search_never_emit() {
        let (state, effects) = run(
            ready_open(None),
            vec![
                PickerEvent::ToggleNode(CategoryId::from("10")),
                PickerEvent::SearchChanged("hat".to_string()),
                PickerEvent::ToggleNode(CategoryId::from("10")),
                PickerEvent::NodeSelected(CategoryId::from("missing")),
            ],
        );
        assert!(effects.is_empty());
        assert_eq!(state.visible_tree(), vec![CategoryNode::leaf(20, "Hats")]);
    }

    #[test]
    fn create_flow_appends_root_leaf_and_selects_it() {
        let (state, effects) = run(
            ready_open(None),
            vec![
                PickerEvent::SearchChanged("Scarves".to_string()),
                PickerEvent::CreateRequested(" Scarves ".to_string()),
            ],
        );
        assert!(state.is_creating());
        assert_eq!(effects, vec![Effect::CreateCategory("Scarves".to_string())]);

        let (state, effects) = run(
            state,
            vec![PickerEvent::CreateSucceeded(NormalizedCategory::new(30, "Scarves"))],
        );
        assert_eq!(effects, vec![Effect::EmitChange(CategoryId::from(30))]);
        assert_eq!(state.tree().len(), 3);
        assert_eq!(state.tree().last(), Some(&CategoryNode::leaf(30, "Scarves")));
        assert!(!state.is_open());
        assert!(!state.is_creating());
        assert_eq!(state.selected_label(), Some("Scarves"));
    }

    #[test]
    fn create_requires_empty_search_result() {
        let (state, effects) = run(
            ready_open(None),
            vec![
                PickerEvent::SearchChanged("boots".to_string()),
                PickerEvent::CreateRequested("boots".to_string()),
            ],
        );
        assert!(effects.is_empty());
        assert!(!state.is_creating());
    }

    #[test]
    fn create_failure_keeps_tree_and_picker_open() {
        let before = ready_open(Some(CategoryId::from(20)));
        let (state, effects) = run(
            before.clone(),
            vec![
                PickerEvent::SearchChanged("Scarves".to_string()),
                PickerEvent::CreateRequested("Scarves".to_string()),
                PickerEvent::CreateFailed("name taken".to_string()),
            ],
        );
        assert_eq!(
            effects,
            vec![
                Effect::CreateCategory("Scarves".to_string()),
                Effect::Notify("name taken".to_string())
            ]
        );
        assert!(state.is_open());
        assert_eq!(state.notice(), Some("name taken"));
        assert_eq!(state.tree(), before.tree());
        assert_eq!(state.selected_id(), before.selected_id());
        assert!(state.can_offer_create());
    }

    #[test]
    fn disabled_picker_ignores_open_and_select() {
        let (state, effects) = run(
            ready_open(None),
            vec![
                PickerEvent::DisabledChanged(true),
                PickerEvent::Opened,
                PickerEvent::NodeSelected(CategoryId::from(20)),
            ],
        );
        assert!(!state.is_open());
        assert!(effects.is_empty());
    }

    #[test]
    fn host_value_change_rehydrates_without_emitting() {
        let (state, effects) = run(
            ready_open(None),
            vec![PickerEvent::SelectedValueChanged(Some(CategoryId::from(20)))],
        );
        assert!(effects.is_empty());
        assert_eq!(state.selected_label(), Some("Hats"));
    }
}
