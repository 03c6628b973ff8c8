use crate::raw::{Crumb, NamedCategory, RawCategory};
use crate::trace::{NoopTrace, TraceEvent, TraceHook};
use crate::types::MAX_DEPTH;

/// Characters that separate levels inside a category path string
pub const SEPARATORS: [char; 4] = ['/', '\\', '>', '|'];

pub fn is_separator(c: char) -> bool {
    SEPARATORS.contains(&c)
}

pub fn has_separator(text: &str) -> bool {
    text.contains(is_separator)
}

/// Trimmed, non-empty segments of a path string, root first.
///
/// Runs of separators behave like a single separator.
pub fn path_segments(text: &str) -> Vec<&str> {
    text.split(is_separator)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Most specific segment of a path string
pub fn path_leaf(text: &str) -> String {
    if has_separator(text) {
        path_segments(text)
            .last()
            .map(|segment| (*segment).to_string())
            .unwrap_or_default()
    } else {
        text.trim().to_string()
    }
}

/// Follow the last child of each node until a leaf or the depth bound.
///
/// Returns the node reached and whether the bound cut the walk short.
pub fn descend_last(node: &NamedCategory) -> (&NamedCategory, bool) {
    let mut current = node;
    let mut depth = 0;
    while let Some(last) = current.children.last() {
        if depth == MAX_DEPTH {
            return (current, true);
        }
        current = last;
        depth += 1;
    }
    (current, false)
}

/// Canonical display name for any category shape. Never fails; unrecognized
/// input yields an empty string.
pub fn resolve_name(raw: &RawCategory) -> String {
    resolve_traced(raw, &NoopTrace)
}

pub(crate) fn resolve_traced(raw: &RawCategory, hook: &dyn TraceHook) -> String {
    let name = match raw {
        RawCategory::Empty => String::new(),
        RawCategory::PathString(text) => path_leaf(text),
        RawCategory::SingleNamed(named) => named_leaf(named, hook),
        RawCategory::Breadcrumb(crumbs) => match crumbs.last() {
            Some(Crumb::Node(named)) => named_leaf(named, hook),
            Some(Crumb::Text(text)) => text.trim().to_string(),
            None => String::new(),
        },
        RawCategory::ProductWrapper { category_name } | RawCategory::RowWrapper { category_name } => {
            category_name.as_deref().map(path_leaf).unwrap_or_default()
        }
        RawCategory::Other(text) => text.trim().to_string(),
    };
    hook.record(&TraceEvent::Resolved {
        shape: raw.shape(),
        name: &name,
    });
    name
}

fn named_leaf(named: &NamedCategory, hook: &dyn TraceHook) -> String {
    let (leaf, truncated) = descend_last(named);
    let name = leaf.name.clone().unwrap_or_default();
    if truncated {
        hook.record(&TraceEvent::DepthLimitReached { name: &name });
    }
    name
}
