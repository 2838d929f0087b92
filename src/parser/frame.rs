//! Stack frame identity.
//!
//! A frame borrows its name straight from the input text. The same frame
//! recurs across millions of samples, so its hash is computed once at
//! construction and every later `Hash` call just replays it.

use rustc_hash::FxHasher;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// One call-stack entry (function or module)
///
/// **Public** - shared by parsers, the collapser and the tree
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    name: &'a str,
    is_function: bool,
    already_bracketed: bool,
    hash: u64,
}

impl<'a> Frame<'a> {
    /// Create a frame and cache its structural hash
    pub fn new(name: &'a str, is_function: bool, already_bracketed: bool) -> Self {
        let mut hasher = FxHasher::default();
        name.hash(&mut hasher);
        is_function.hash(&mut hasher);
        already_bracketed.hash(&mut hasher);

        Self {
            name,
            is_function,
            already_bracketed,
            hash: hasher.finish(),
        }
    }

    /// A resolved function symbol
    pub fn function(name: &'a str) -> Self {
        Self::new(name, true, false)
    }

    /// A module-only frame, used when no symbol could be resolved
    ///
    /// Names already written as `[name]` are flagged so renderers do not
    /// bracket them a second time.
    pub fn module(name: &'a str) -> Self {
        let bracketed = name.len() >= 2 && name.starts_with('[') && name.ends_with(']');
        Self::new(name, false, bracketed)
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn is_function(&self) -> bool {
        self.is_function
    }

    pub fn already_bracketed(&self) -> bool {
        self.already_bracketed
    }

    /// Name as written to folded files and shown by renderers
    ///
    /// Module-only frames are shown as `[name]` unless already bracketed.
    pub fn display_name(&self) -> Cow<'a, str> {
        if self.is_function || self.already_bracketed {
            Cow::Borrowed(self.name)
        } else {
            Cow::Owned(format!("[{}]", self.name))
        }
    }

    /// Cached structural hash
    pub fn precomputed_hash(&self) -> u64 {
        self.hash
    }
}

impl PartialEq for Frame<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.is_function == other.is_function
            && self.already_bracketed == other.already_bracketed
            && self.name == other.name
    }
}

impl Eq for Frame<'_> {}

impl Hash for Frame<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Ord for Frame<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then(self.is_function.cmp(&other.is_function))
            .then(self.already_bracketed.cmp(&other.already_bracketed))
    }
}

impl PartialOrd for Frame<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
