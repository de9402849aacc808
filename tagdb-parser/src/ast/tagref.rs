//! Tag references
//!
//!     A tagref node stores the reference exactly as the author typed it, for example
//!     `artist:john doe`, `a:john doe` or just `john doe`. What it points to depends on
//!     the database at the time it is rendered, so resolution is lazy and goes through a
//!     [TagRefResolver] supplied by whoever owns the label graph.

use crate::namespace::{split_qualified, Namespace, RawTag};

/// Outcome of resolving a tag reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTagRef {
    /// The record the reference points to, if any.
    pub tag: Option<(Namespace, RawTag)>,
    /// Namespace typed by the author, if the text had a namespace prefix.
    pub namespace: Option<Namespace>,
    /// Whether the author typed a namespace prefix.
    pub explicit_namespace: bool,
}

impl ResolvedTagRef {
    /// Resolution that only looks at the text, without any label graph.
    pub fn unresolved(text: &str) -> Self {
        let (namespace, _) = split_qualified(text);
        Self {
            tag: None,
            namespace,
            explicit_namespace: namespace.is_some(),
        }
    }

    /// Display title for a resolved reference.
    ///
    /// Bare raw text when the typed namespace matches the resolved one (or none was
    /// typed), `resolved:raw` when the author typed a different namespace.
    pub fn title(&self) -> Option<String> {
        let (ns, raw) = self.tag.as_ref()?;
        if self.explicit_namespace && self.namespace != Some(*ns) {
            Some(format!("{}:{}", ns, raw))
        } else {
            Some(raw.to_string())
        }
    }
}

/// Resolves tagref text against a label graph.
pub trait TagRefResolver {
    fn resolve(&self, text: &str) -> ResolvedTagRef;
}

/// Resolver for rendering without a database: nothing resolves.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnresolvedTags;

impl TagRefResolver for UnresolvedTags {
    fn resolve(&self, text: &str) -> ResolvedTagRef {
        ResolvedTagRef::unresolved(text)
    }
}
