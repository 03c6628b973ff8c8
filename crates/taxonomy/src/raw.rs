//! Normalization boundary for legacy category shapes.
//!
//! Product records, grid rows and tree fetches all describe "the category" in
//! different ways. [`RawCategory::from_value`] is the only place that inspects
//! JSON structure; everything downstream matches on the enum.

use crate::types::{CategoryId, CategoryNode, NormalizedCategory, MAX_DEPTH};
use serde_json::{Map, Value};

/// Object-shaped category, possibly carrying a subtree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedCategory {
    pub id: Option<CategoryId>,
    pub name: Option<String>,
    pub children: Vec<NamedCategory>,
}

impl NamedCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<CategoryId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<NamedCategory>) -> Self {
        self.children = children;
        self
    }

    /// Name if present and not blank
    pub fn usable_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        Self::object_at(object, 0)
    }

    // Children are kept one level past MAX_DEPTH so the descent can still
    // tell that it was cut short.
    fn object_at(object: &Map<String, Value>, depth: usize) -> Self {
        let id = object
            .get("id")
            .and_then(|id| serde_json::from_value::<CategoryId>(id.clone()).ok());
        let name = object.get("name").and_then(scalar_text);
        let children = match object.get("children") {
            Some(Value::Array(items)) if depth <= MAX_DEPTH => items
                .iter()
                .filter_map(Value::as_object)
                .map(|child| Self::object_at(child, depth + 1))
                .collect(),
            _ => Vec::new(),
        };
        Self { id, name, children }
    }

    fn node_at(node: &CategoryNode, depth: usize) -> Self {
        let children = if depth <= MAX_DEPTH {
            node.children
                .iter()
                .map(|child| Self::node_at(child, depth + 1))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            id: Some(node.id.clone()),
            name: Some(node.label.clone()),
            children,
        }
    }
}

impl From<&CategoryNode> for NamedCategory {
    fn from(node: &CategoryNode) -> Self {
        Self::node_at(node, 0)
    }
}

impl From<&NormalizedCategory> for NamedCategory {
    fn from(category: &NormalizedCategory) -> Self {
        Self::new(category.name.clone()).with_id(category.id.clone())
    }
}

/// One element of a breadcrumb array
#[derive(Debug, Clone, PartialEq)]
pub enum Crumb {
    Node(NamedCategory),
    Text(String),
}

impl Crumb {
    /// The element's own name, before any descent into children
    pub fn name(&self) -> Option<&str> {
        match self {
            Crumb::Node(node) => node.name.as_deref(),
            Crumb::Text(text) => Some(text.as_str()),
        }
    }
}

/// Closed set of category representations the engine accepts
#[derive(Debug, Clone, PartialEq)]
pub enum RawCategory {
    Empty,
    PathString(String),
    SingleNamed(NamedCategory),
    Breadcrumb(Vec<Crumb>),
    /// `category_name` of a product record
    ProductWrapper { category_name: Option<String> },
    /// `original.category_name` of a data-grid row
    RowWrapper { category_name: Option<String> },
    /// Any scalar not covered above, kept in its string form
    Other(String),
}

impl RawCategory {
    /// Classify an arbitrary JSON value. Never fails.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => RawCategory::Empty,
            Value::String(text) if text.is_empty() => RawCategory::Empty,
            Value::String(text) => RawCategory::PathString(text.clone()),
            Value::Array(items) if items.is_empty() => RawCategory::Empty,
            Value::Array(items) => RawCategory::Breadcrumb(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(object) => Crumb::Node(NamedCategory::from_object(object)),
                        other => Crumb::Text(stringify(other)),
                    })
                    .collect(),
            ),
            Value::Object(object) => classify_object(object),
            Value::Bool(_) | Value::Number(_) => RawCategory::Other(stringify(value)),
        }
    }

    pub fn path(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            RawCategory::Empty
        } else {
            RawCategory::PathString(text)
        }
    }

    /// Short tag naming the shape, used in trace output
    pub fn shape(&self) -> &'static str {
        match self {
            RawCategory::Empty => "empty",
            RawCategory::PathString(_) => "path",
            RawCategory::SingleNamed(_) => "named",
            RawCategory::Breadcrumb(_) => "breadcrumb",
            RawCategory::ProductWrapper { .. } => "product",
            RawCategory::RowWrapper { .. } => "row",
            RawCategory::Other(_) => "other",
        }
    }

    /// Identifier carried by the input, if any. Bare scalars are read as ids.
    pub fn id_hint(&self) -> Option<CategoryId> {
        match self {
            RawCategory::SingleNamed(named) => named.id.clone(),
            RawCategory::Breadcrumb(crumbs) => match crumbs.last() {
                Some(Crumb::Node(node)) => node.id.clone(),
                _ => None,
            },
            RawCategory::Other(text) => Some(CategoryId::parse_lossless(text)),
            _ => None,
        }
    }
}

impl From<&Value> for RawCategory {
    fn from(value: &Value) -> Self {
        RawCategory::from_value(value)
    }
}

impl From<&str> for RawCategory {
    fn from(text: &str) -> Self {
        RawCategory::path(text)
    }
}

impl From<&CategoryNode> for RawCategory {
    fn from(node: &CategoryNode) -> Self {
        RawCategory::SingleNamed(NamedCategory::from(node))
    }
}

impl From<&NormalizedCategory> for RawCategory {
    fn from(category: &NormalizedCategory) -> Self {
        RawCategory::SingleNamed(NamedCategory::from(category))
    }
}

fn classify_object(object: &Map<String, Value>) -> RawCategory {
    if let Some(Value::Object(original)) = object.get("original") {
        if original.contains_key("category_name") {
            return RawCategory::RowWrapper {
                category_name: original.get("category_name").and_then(scalar_text),
            };
        }
    }
    if object.contains_key("category_name") {
        return RawCategory::ProductWrapper {
            category_name: object.get("category_name").and_then(scalar_text),
        };
    }
    RawCategory::SingleNamed(NamedCategory::from_object(object))
}

/// String form of a scalar; `None` for null, arrays and objects
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => scalar_text(other).unwrap_or_default(),
    }
}
