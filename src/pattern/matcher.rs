use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::compiler::VarSlot;
use crate::router::Vars;

/// Successful match of a [`CompiledPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Length in bytes of the matched prefix of the candidate.
    pub consumed: usize,
    pub vars: Vars,
}

/// Anchored matcher plus the variable slots it was compiled with
///
/// Immutable after construction and `Send + Sync`, so one instance can serve
/// concurrent lookups.
#[derive(Clone)]
pub struct CompiledPattern {
    regex: Regex,
    slots: Vec<VarSlot>,
    /// Native named groups declared inside raw regexp fragments.
    named: Vec<(Arc<str>, usize)>,
}

impl CompiledPattern {
    pub(crate) fn new(regex: Regex, slots: Vec<VarSlot>) -> Self {
        let named = regex
            .capture_names()
            .enumerate()
            .filter_map(|(i, name)| name.map(|n| (Arc::from(n), i)))
            .collect();
        Self {
            regex,
            slots,
            named,
        }
    }

    /// Anchored regex source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    #[must_use]
    pub fn slots(&self) -> &[VarSlot] {
        &self.slots
    }

    /// Matches `candidate` from its first byte.
    ///
    /// Variables are assembled from the native named groups first, then from
    /// the declared slots in declaration order; a declared variable only binds
    /// when its name has no value yet. So a native group always beats a
    /// variable of the same name, and the leftmost of several same-named
    /// variables wins. Groups that did not take part in the match bind nothing.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(candidate)?;
        let consumed = caps.get(0).map_or(0, |m| m.end());

        let mut vars = Vars::new();
        for (name, index) in &self.named {
            if let Some(m) = caps.get(*index) {
                vars.insert_absent(name, m.as_str());
            }
        }
        for slot in &self.slots {
            if let Some(m) = caps.get(slot.slot) {
                vars.insert_absent(&slot.name, m.as_str());
            }
        }

        Some(PatternMatch { consumed, vars })
    }

    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("regex", &self.regex.as_str())
            .field("slots", &self.slots)
            .finish()
    }
}
