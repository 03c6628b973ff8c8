//! # Catalog Taxonomy
//!
//! Category normalization, filtering and tree operations for the catalog admin.
//!
//! ## Architecture
//!
//! ```text
//! serde_json::Value (product field, grid row, breadcrumb, tree node)
//!     │
//!     ├──> RawCategory::from_value (single normalization boundary)
//!     │      │
//!     │      ├──> resolve_name   -> canonical display string
//!     │      ├──> matches        -> category filter predicate
//!     │      └──> render_label   -> list/badge label, optional full path
//!     │
//! Vec<CategoryNode> (tree fetch)
//!     │
//!     └──> tree::{toggle_expanded, filter_by_search, find_label, append_root_leaf}
//!            pure: borrow the forest, return a new one
//! ```
//!
//! None of the functions here fail on malformed category data: unknown shapes
//! resolve to `""` and count as uncategorized.

mod display;
mod error;
mod predicate;
mod raw;
mod resolve;
pub mod trace;
pub mod tree;
mod types;

pub use display::{ancestry, render_label, DisplayLabel, DisplayOptions};
pub use error::{Result, TaxonomyError};
pub use predicate::{filter_products, is_uncategorized, matches, name_tokens, UNCATEGORIZED_FILTER};
pub use raw::{Crumb, NamedCategory, RawCategory};
pub use resolve::{descend_last, has_separator, path_leaf, path_segments, resolve_name, SEPARATORS};
pub use trace::{LogTrace, Matcher, NoopTrace, TraceEvent, TraceHook};
pub use tree::{
    append_root_leaf, filter_by_search, find_by_label, find_first, find_label, find_node,
    for_each_node, node_count, parse_tree, path_to, toggle_expanded, validate_tree, visible_rows,
    TreeRow,
};
pub use types::{CategoryId, CategoryNode, FlatCategory, NormalizedCategory, MAX_DEPTH};
