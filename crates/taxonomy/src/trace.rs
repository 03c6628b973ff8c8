//! Injectable diagnostics for resolution and matching.
//!
//! The free functions in [`crate::resolve`] and [`crate::predicate`] never
//! report anything. Callers that want to see why a product matched bind a
//! hook through [`Matcher`].

use crate::predicate;
use crate::raw::RawCategory;
use crate::resolve;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Token equals the filter (case-insensitive)
    Exact,
    /// Token contains the filter
    TokenContainsFilter,
    /// Filter contains the token
    FilterContainsToken,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent<'a> {
    Resolved {
        shape: &'static str,
        name: &'a str,
    },
    /// Last-child descent stopped at the depth bound
    DepthLimitReached {
        name: &'a str,
    },
    UncategorizedCheck {
        shape: &'static str,
        uncategorized: bool,
    },
    Matched {
        filter: &'a str,
        token: &'a str,
        kind: MatchKind,
    },
    NoMatch {
        filter: &'a str,
        tokens: usize,
    },
}

impl fmt::Display for TraceEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Resolved { shape, name } => write!(f, "resolved {shape} -> {name:?}"),
            TraceEvent::DepthLimitReached { name } => {
                write!(f, "descent stopped at depth bound on {name:?}")
            }
            TraceEvent::UncategorizedCheck {
                shape,
                uncategorized,
            } => write!(f, "uncategorized check on {shape}: {uncategorized}"),
            TraceEvent::Matched {
                filter,
                token,
                kind,
            } => write!(f, "filter {filter:?} matched token {token:?} ({kind:?})"),
            TraceEvent::NoMatch { filter, tokens } => {
                write!(f, "filter {filter:?} matched none of {tokens} tokens")
            }
        }
    }
}

pub trait TraceHook: Send + Sync {
    fn record(&self, event: &TraceEvent<'_>);
}

/// Default hook; drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl TraceHook for NoopTrace {
    fn record(&self, _event: &TraceEvent<'_>) {}
}

/// Forwards events to the `log` facade at trace level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl TraceHook for LogTrace {
    fn record(&self, event: &TraceEvent<'_>) {
        log::trace!("{event}");
    }
}

/// Resolver and predicate bound to a trace hook
#[derive(Clone, Copy)]
pub struct Matcher<'h> {
    hook: &'h dyn TraceHook,
}

impl Default for Matcher<'static> {
    fn default() -> Self {
        Self { hook: &NoopTrace }
    }
}

impl<'h> Matcher<'h> {
    pub fn new(hook: &'h dyn TraceHook) -> Self {
        Self { hook }
    }

    pub fn resolve(&self, raw: &RawCategory) -> String {
        resolve::resolve_traced(raw, self.hook)
    }

    pub fn matches(&self, raw: &RawCategory, filter: &str) -> bool {
        predicate::matches_traced(raw, filter, self.hook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl TraceHook for Recorder {
        fn record(&self, event: &TraceEvent<'_>) {
            self.0.lock().unwrap().push(event.to_string());
        }
    }

    #[test]
    fn matcher_reports_match_kind() {
        let recorder = Recorder::default();
        let matcher = Matcher::new(&recorder);
        assert!(matcher.matches(&RawCategory::from("Electronics > Phones"), "phone"));
        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].contains("TokenContainsFilter"), "{events:?}");
    }

    #[test]
    fn default_matcher_is_silent_and_equivalent() {
        let matcher = Matcher::default();
        let raw = RawCategory::from("A / B");
        assert_eq!(matcher.resolve(&raw), resolve::resolve_name(&raw));
    }
}
