use crate::raw::{Crumb, RawCategory};
use crate::resolve::{path_segments, resolve_name};
use crate::trace::{MatchKind, NoopTrace, TraceEvent, TraceHook};

/// Filter value reserved for "products without a category"
pub const UNCATEGORIZED_FILTER: &str = "";

/// True when the input carries no usable category.
///
/// This looks at structure rather than the resolved name: a wrapper whose
/// `category_name` is blank is uncategorized even though it is an object.
pub fn is_uncategorized(raw: &RawCategory) -> bool {
    match raw {
        RawCategory::Empty => true,
        RawCategory::PathString(text) | RawCategory::Other(text) => text.trim().is_empty(),
        RawCategory::SingleNamed(named) => named.usable_name().is_none(),
        RawCategory::Breadcrumb(crumbs) => crumbs.is_empty(),
        RawCategory::ProductWrapper { category_name } | RawCategory::RowWrapper { category_name } => {
            category_name
                .as_deref()
                .map_or(true, |name| name.trim().is_empty())
        }
    }
}

/// Every name reachable from the input, blank tokens removed.
///
/// Breadcrumbs contribute every element's name, not only the leaf. String
/// values contribute the whole string plus each path segment.
pub fn name_tokens(raw: &RawCategory) -> Vec<String> {
    let mut tokens = Vec::new();
    match raw {
        RawCategory::Empty => {}
        RawCategory::PathString(text) | RawCategory::Other(text) => push_path(&mut tokens, text),
        RawCategory::SingleNamed(named) => {
            if let Some(name) = &named.name {
                push_token(&mut tokens, name);
            }
        }
        RawCategory::Breadcrumb(crumbs) => {
            for crumb in crumbs {
                match crumb {
                    Crumb::Node(node) => {
                        if let Some(name) = &node.name {
                            push_token(&mut tokens, name);
                        }
                    }
                    Crumb::Text(text) => push_path(&mut tokens, text),
                }
            }
        }
        RawCategory::ProductWrapper { category_name } | RawCategory::RowWrapper { category_name } => {
            if let Some(text) = category_name {
                push_path(&mut tokens, text);
            }
        }
    }
    push_token(&mut tokens, &resolve_name(raw));
    tokens
}

fn push_path(tokens: &mut Vec<String>, text: &str) {
    push_token(tokens, text);
    for segment in path_segments(text) {
        push_token(tokens, segment);
    }
}

fn push_token(tokens: &mut Vec<String>, token: &str) {
    let token = token.trim();
    if !token.is_empty() && !tokens.iter().any(|existing| existing == token) {
        tokens.push(token.to_string());
    }
}

/// Whether a category matches a filter value.
///
/// `""` selects uncategorized inputs. Any other filter is trimmed and compared
/// case-insensitively: an exact token match first, then substring containment
/// in either direction.
pub fn matches(raw: &RawCategory, filter: &str) -> bool {
    matches_traced(raw, filter, &NoopTrace)
}

pub(crate) fn matches_traced(raw: &RawCategory, filter: &str, hook: &dyn TraceHook) -> bool {
    if filter == UNCATEGORIZED_FILTER {
        let uncategorized = is_uncategorized(raw);
        hook.record(&TraceEvent::UncategorizedCheck {
            shape: raw.shape(),
            uncategorized,
        });
        return uncategorized;
    }

    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }

    let tokens = name_tokens(raw);
    let lowered: Vec<String> = tokens.iter().map(|token| token.to_lowercase()).collect();

    let hit = lowered
        .iter()
        .position(|token| *token == needle)
        .map(|idx| (idx, MatchKind::Exact))
        .or_else(|| {
            lowered.iter().enumerate().find_map(|(idx, token)| {
                if token.contains(&needle) {
                    Some((idx, MatchKind::TokenContainsFilter))
                } else if needle.contains(token.as_str()) {
                    Some((idx, MatchKind::FilterContainsToken))
                } else {
                    None
                }
            })
        });

    match hit {
        Some((idx, kind)) => {
            hook.record(&TraceEvent::Matched {
                filter,
                token: &tokens[idx],
                kind,
            });
            true
        }
        None => {
            hook.record(&TraceEvent::NoMatch {
                filter,
                tokens: tokens.len(),
            });
            false
        }
    }
}

/// Keep the items whose category matches `filter`, preserving order
pub fn filter_products<'a, T, F>(items: &'a [T], filter: &str, extract: F) -> Vec<&'a T>
where
    F: Fn(&T) -> RawCategory,
{
    items
        .iter()
        .filter(|item| matches(&extract(item), filter))
        .collect()
}
