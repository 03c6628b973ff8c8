use crate::config::PickerConfig;
use catalog_taxonomy::{
    filter_by_search, find_first, find_node, toggle_expanded, CategoryId, CategoryNode,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Not mounted yet
    #[default]
    Idle,
    Loading,
    Ready,
    Failed {
        message: String,
    },
}

/// Everything the picker knows. Only [`crate::reduce`] produces new states.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PickerState {
    pub(crate) config: PickerConfig,
    pub(crate) disabled: bool,
    pub(crate) phase: LoadPhase,
    pub(crate) tree: Vec<CategoryNode>,
    pub(crate) open: bool,
    pub(crate) search_term: String,
    /// Nodes toggled while the current search is active, applied on top of
    /// the filtered view
    pub(crate) search_toggles: Vec<CategoryId>,
    pub(crate) selected_id: Option<CategoryId>,
    pub(crate) selected_label: Option<String>,
    pub(crate) is_creating: bool,
    pub(crate) notice: Option<String>,
}

impl PickerState {
    pub fn new(config: PickerConfig, selected: Option<CategoryId>) -> Self {
        Self {
            config,
            selected_id: selected,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    pub fn load_error(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn tree(&self) -> &[CategoryNode] {
        &self.tree
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_id(&self) -> Option<&CategoryId> {
        self.selected_id.as_ref()
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected_label.as_deref()
    }

    pub fn is_creating(&self) -> bool {
        self.is_creating
    }

    /// Last create-failure message, cleared on the next open/close/create
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Text for the closed picker: selected label or placeholder
    pub fn display_text(&self) -> &str {
        self.selected_label
            .as_deref()
            .unwrap_or(&self.config.placeholder)
    }

    pub fn is_searching(&self) -> bool {
        !self.search_term.trim().is_empty()
    }

    /// Tree as currently shown: search filter applied, then any toggles made
    /// during this search
    pub fn visible_tree(&self) -> Vec<CategoryNode> {
        self.search_toggles.iter().fold(
            filter_by_search(&self.tree, &self.search_term),
            |view, id| toggle_expanded(&view, id),
        )
    }

    /// Whether the "create" affordance should be offered
    pub fn can_offer_create(&self) -> bool {
        self.config.create_new_enabled
            && self.open
            && !self.is_creating
            && self.is_searching()
            && self.visible_tree().is_empty()
    }

    /// Expand or collapse `id` in the view the user sees. Outside a search the
    /// tree itself changes; during one only the filtered view does.
    pub(crate) fn toggle(&mut self, id: &CategoryId) {
        if !self.is_searching() {
            self.tree = toggle_expanded(&self.tree, id);
        } else if let Some(pos) = self.search_toggles.iter().position(|t| t == id) {
            self.search_toggles.remove(pos);
        } else {
            self.search_toggles.push(id.clone());
        }
    }

    pub(crate) fn set_search(&mut self, term: String) {
        self.search_term = term;
        self.search_toggles.clear();
    }

    /// Label for `id`, matching strictly first and then across number/text ids
    pub(crate) fn hydrate_label(&self, id: Option<&CategoryId>) -> Option<String> {
        let id = id?;
        find_node(&self.tree, id)
            .or_else(|| find_first(&self.tree, |node| node.id.loosely_eq(id)))
            .map(|node| node.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(tree: Vec<CategoryNode>) -> PickerState {
        PickerState {
            config: PickerConfig {
                create_new_enabled: true,
                ..PickerConfig::default()
            },
            phase: LoadPhase::Ready,
            tree,
            open: true,
            ..PickerState::default()
        }
    }

    #[test]
    fn display_falls_back_to_placeholder() {
        let state = PickerState::new(PickerConfig::default(), None);
        assert_eq!(state.display_text(), "Select a category");
    }

    #[test]
    fn create_offered_only_without_matches() {
        let mut state = ready(vec![CategoryNode::leaf(1, "Shoes")]);
        state.search_term = "sho".to_string();
        assert!(!state.can_offer_create());
        state.search_term = "hats".to_string();
        assert!(state.can_offer_create());
        state.search_term = "  ".to_string();
        assert!(!state.can_offer_create());
    }

    #[test]
    fn toggles_during_search_collapse_the_filtered_view() {
        let mut state = ready(vec![
            CategoryNode::leaf(1, "Shoes").with_children(vec![CategoryNode::leaf(2, "Boots")])
        ]);
        state.set_search("boo".to_string());
        assert!(state.visible_tree()[0].expanded);

        state.toggle(&CategoryId::from(1));
        assert!(!state.visible_tree()[0].expanded);
        state.toggle(&CategoryId::from(1));
        assert!(state.visible_tree()[0].expanded);

        state.toggle(&CategoryId::from(1));
        state.set_search(String::new());
        assert!(!state.tree()[0].expanded);
        assert!(!state.visible_tree()[0].expanded);
    }

    #[test]
    fn hydration_bridges_numeric_and_text_ids() {
        let state = ready(vec![CategoryNode::leaf("5", "Hats")]);
        assert_eq!(
            state.hydrate_label(Some(&CategoryId::from(5))),
            Some("Hats".to_string())
        );
        assert_eq!(state.hydrate_label(Some(&CategoryId::from(6))), None);
    }
}
