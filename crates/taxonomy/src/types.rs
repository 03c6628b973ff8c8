use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Maximum number of levels any recursive category walk will descend.
pub const MAX_DEPTH: usize = 10;

/// Category identifier as delivered by the catalog service.
///
/// Ids are either JSON numbers or JSON strings and must round-trip exactly:
/// `12` stays a number, `"12"` stays a string. Equality is strict, so the two
/// are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    Number(Number),
    Text(String),
}

impl CategoryId {
    /// Parse a user-supplied token: valid JSON numbers become numeric ids,
    /// everything else is kept as text.
    pub fn parse_lossless(raw: &str) -> Self {
        match serde_json::from_str::<Number>(raw.trim()) {
            Ok(number) => CategoryId::Number(number),
            Err(_) => CategoryId::Text(raw.to_string()),
        }
    }

    /// Legacy widening rule: a text id whose trimmed content parses as a finite
    /// number becomes numeric. Integral values become integers.
    pub fn coerce_numeric(&self) -> Self {
        let CategoryId::Text(text) = self else {
            return self.clone();
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.clone();
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => number_from_f64(value)
                .map(CategoryId::Number)
                .unwrap_or_else(|| self.clone()),
            _ => self.clone(),
        }
    }

    /// Loose comparison used only when hydrating a host-provided selection:
    /// `5` and `"5"` compare equal after numeric coercion.
    pub fn loosely_eq(&self, other: &CategoryId) -> bool {
        if self == other {
            return true;
        }
        match (self.coerce_numeric(), other.coerce_numeric()) {
            (CategoryId::Number(a), CategoryId::Number(b)) => a.as_f64() == b.as_f64(),
            (a, b) => a == b,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CategoryId::Number(_))
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            CategoryId::Number(number) => number.as_u64(),
            CategoryId::Text(_) => None,
        }
    }
}

fn number_from_f64(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryId::Number(number) => write!(f, "{number}"),
            CategoryId::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for CategoryId {
    fn from(value: u64) -> Self {
        CategoryId::Number(Number::from(value))
    }
}

impl From<i64> for CategoryId {
    fn from(value: i64) -> Self {
        CategoryId::Number(Number::from(value))
    }
}

impl From<i32> for CategoryId {
    fn from(value: i32) -> Self {
        CategoryId::Number(Number::from(value))
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        CategoryId::Text(value.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        CategoryId::Text(value)
    }
}

/// Node in the category tree shown by the picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: CategoryId,

    /// Display name
    pub label: String,

    /// Ordered children; a missing field deserializes as empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryNode>,

    /// UI expansion flag
    #[serde(default)]
    pub expanded: bool,
}

impl CategoryNode {
    pub fn leaf(id: impl Into<CategoryId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
            expanded: false,
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<CategoryNode>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Canonical `{ id, name }` form of a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCategory {
    pub id: CategoryId,
    pub name: String,
}

impl NormalizedCategory {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Root-level leaf node for a freshly created category
    pub fn into_leaf(self) -> CategoryNode {
        CategoryNode::leaf(self.id, self.name)
    }
}

/// Flat category record with a parent link, used to rebuild breadcrumb paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
}
