use catalog_taxonomy::CategoryId;
use serde::{Deserialize, Serialize};

/// How a committed selection id is handed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdCoercion {
    /// Text ids that parse as finite numbers are passed as numbers
    #[default]
    NumericStrings,
    /// Ids are passed exactly as they appear in the tree
    Preserve,
}

impl IdCoercion {
    pub fn apply(self, id: &CategoryId) -> CategoryId {
        match self {
            IdCoercion::NumericStrings => id.coerce_numeric(),
            IdCoercion::Preserve => id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// Shown while nothing is selected
    pub placeholder: String,

    /// Offer "create" when a search has no matches
    pub create_new_enabled: bool,

    /// Commit branch nodes on select instead of toggling them
    pub allow_branch_selection: bool,

    pub id_coercion: IdCoercion,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            placeholder: "Select a category".to_string(),
            create_new_enabled: false,
            allow_branch_selection: false,
            id_coercion: IdCoercion::default(),
        }
    }
}
