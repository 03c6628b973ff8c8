use crate::raw::{Crumb, RawCategory};
use crate::resolve::{path_segments, resolve_name};
use crate::types::{CategoryId, FlatCategory, MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayOptions {
    /// Joins breadcrumb levels
    pub separator: String,

    /// Placeholder when nothing resolves
    pub uncategorized: String,

    pub show_badge: bool,

    /// Render the whole root-to-leaf path instead of the leaf
    pub full_path: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            separator: " > ".to_string(),
            uncategorized: "Uncategorized".to_string(),
            show_badge: false,
            full_path: false,
        }
    }
}

/// Rendered category label for read-only contexts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLabel {
    pub text: String,
    pub badge: bool,
    pub uncategorized: bool,
}

impl fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.badge {
            write!(f, "[{}]", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// Render a category for lists and badges.
///
/// With a flat `categories` list, id-bearing input is looked up there and the
/// path is rebuilt from `parent_id` links.
pub fn render_label(
    category: &RawCategory,
    categories: Option<&[FlatCategory]>,
    options: &DisplayOptions,
) -> DisplayLabel {
    let from_flat = categories.and_then(|flat| {
        let id = category.id_hint()?;
        let chain = ancestry(flat, &id)?;
        Some(if options.full_path {
            chain.join(options.separator.as_str())
        } else {
            chain.last().map(|name| name.to_string()).unwrap_or_default()
        })
    });

    let text = match from_flat {
        Some(text) if !text.trim().is_empty() => text,
        _ if options.full_path => full_path(category, &options.separator),
        _ => resolve_name(category),
    };

    if text.trim().is_empty() {
        DisplayLabel {
            text: options.uncategorized.clone(),
            badge: options.show_badge,
            uncategorized: true,
        }
    } else {
        DisplayLabel {
            text,
            badge: options.show_badge,
            uncategorized: false,
        }
    }
}

/// Names from the root down to `id`, following `parent_id` links
pub fn ancestry<'a>(categories: &'a [FlatCategory], id: &CategoryId) -> Option<Vec<&'a str>> {
    let mut current = lookup(categories, id)?;
    let mut names = vec![current.name.as_str()];
    for _ in 0..MAX_DEPTH {
        let Some(parent) = current.parent_id.as_ref().and_then(|pid| lookup(categories, pid)) else {
            break;
        };
        names.push(parent.name.as_str());
        current = parent;
    }
    names.reverse();
    Some(names)
}

fn lookup<'a>(categories: &'a [FlatCategory], id: &CategoryId) -> Option<&'a FlatCategory> {
    categories
        .iter()
        .find(|category| category.id == *id)
        .or_else(|| categories.iter().find(|category| category.id.loosely_eq(id)))
}

fn full_path(category: &RawCategory, separator: &str) -> String {
    match category {
        RawCategory::PathString(text) => path_segments(text).join(separator),
        RawCategory::ProductWrapper { category_name } | RawCategory::RowWrapper { category_name } => {
            category_name
                .as_deref()
                .map(|text| path_segments(text).join(separator))
                .unwrap_or_default()
        }
        RawCategory::Breadcrumb(crumbs) => crumbs
            .iter()
            .filter_map(Crumb::name)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(separator),
        RawCategory::SingleNamed(named) => {
            let mut names: Vec<&str> = named.usable_name().map(str::trim).into_iter().collect();
            let mut current = named;
            let mut depth = 0;
            while let Some(last) = current.children.last() {
                if depth == MAX_DEPTH {
                    break;
                }
                current = last;
                depth += 1;
                names.extend(current.usable_name().map(str::trim));
            }
            names.join(separator)
        }
        RawCategory::Empty | RawCategory::Other(_) => resolve_name(category),
    }
}
