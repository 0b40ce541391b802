use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Maximum number of variables before heap allocation.
/// Most patterns bind a handful of variables (e.g. `/users/:id/posts/:post`).
pub const MAX_INLINE_VARS: usize = 8;

/// Stack-allocated variable storage.
///
/// Names are `Arc<str>` shared with the compiled pattern that declared them,
/// values are per-call data cut from the matched path.
pub type VarVec = SmallVec<[(Arc<str>, String); MAX_INLINE_VARS]>;

/// Variable map threaded through resolution
///
/// Names are unique; insertion order is irrelevant to equality. The resolver
/// never mutates a map it was handed: each consuming node derives a new one
/// with [`Vars::extended`] for its subtree, so sibling branches always see
/// the map their container started with.
#[derive(Clone, Default)]
pub struct Vars {
    entries: VarVec,
}

impl Vars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if any
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.as_ref() == name)
    }

    /// Binds `name`, replacing a previous value.
    pub fn insert(&mut self, name: Arc<str>, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Binds `name` unless it already has a value.
    pub(crate) fn insert_absent(&mut self, name: &Arc<str>, value: &str) {
        if !self.contains(name) {
            self.entries.push((Arc::clone(name), value.to_owned()));
        }
    }

    /// A copy of `self` with every binding of `other` applied on top.
    #[must_use]
    pub fn extended(&self, other: &Vars) -> Vars {
        let mut merged = self.clone();
        for (name, value) in &other.entries {
            merged.insert(Arc::clone(name), value.clone());
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Vars {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for Vars {}

impl fmt::Debug for Vars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Serialize for Vars {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<Arc<str>>, V: Into<String>> FromIterator<(K, V)> for Vars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Vars::new();
        for (k, v) in iter {
            vars.insert(k.into(), v.into());
        }
        vars
    }
}
