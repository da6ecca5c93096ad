//! Caller supplied filters applied while walking a tree
//!
//! Every filter is optional and a no-op when absent. Filters are plain
//! closures: whatever they panic with propagates out of the walk untouched.

use std::borrow::Cow;
use std::fmt;

use crate::value::ZWNBSP;

type NodePredicate<'a, N> = Box<dyn Fn(&N) -> bool + 'a>;

pub struct Filters<'a, N> {
    remove_node: Option<NodePredicate<'a, N>>,
    unwrap_node: Option<NodePredicate<'a, N>>,
    remove_attribute: Option<Box<dyn Fn(&str) -> bool + 'a>>,
    filter_string: Option<Box<dyn Fn(&str) -> String + 'a>>,
}

impl<'a, N> Default for Filters<'a, N> {
    fn default() -> Self {
        Self {
            remove_node: None,
            unwrap_node: None,
            remove_attribute: None,
            filter_string: None,
        }
    }
}

impl<'a, N> Filters<'a, N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip matching nodes together with their subtree.
    pub fn with_remove_node(mut self, predicate: impl Fn(&N) -> bool + 'a) -> Self {
        self.remove_node = Some(Box::new(predicate));
        self
    }

    /// Visit the children of matching nodes as if the node were absent.
    pub fn with_unwrap_node(mut self, predicate: impl Fn(&N) -> bool + 'a) -> Self {
        self.unwrap_node = Some(Box::new(predicate));
        self
    }

    /// Leave matching attribute names out of descriptors.
    pub fn with_remove_attribute(mut self, predicate: impl Fn(&str) -> bool + 'a) -> Self {
        self.remove_attribute = Some(Box::new(predicate));
        self
    }

    /// Rewrite text node content before it is emitted.
    ///
    /// The filter also runs on the part of a text node that precedes a
    /// selection boundary, so it must map prefixes to prefixes.
    pub fn with_filter_string(mut self, filter: impl Fn(&str) -> String + 'a) -> Self {
        self.filter_string = Some(Box::new(filter));
        self
    }

    pub fn removes(&self, node: &N) -> bool {
        self.remove_node.as_ref().is_some_and(|remove| remove(node))
    }

    pub fn unwraps(&self, node: &N) -> bool {
        self.unwrap_node.as_ref().is_some_and(|unwrap| unwrap(node))
    }

    pub fn removes_attribute(&self, name: &str) -> bool {
        self.remove_attribute
            .as_ref()
            .is_some_and(|remove| remove(name))
    }

    pub fn filter_text<'s>(&self, text: &'s str) -> Cow<'s, str> {
        match &self.filter_string {
            Some(filter) => Cow::Owned(filter(text)),
            None => Cow::Borrowed(text),
        }
    }
}

impl<N> fmt::Debug for Filters<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filters")
            .field("remove_node", &self.remove_node.is_some())
            .field("unwrap_node", &self.unwrap_node.is_some())
            .field("remove_attribute", &self.remove_attribute.is_some())
            .field("filter_string", &self.filter_string.is_some())
            .finish()
    }
}

/// Drop zero width no-break space padding.
pub fn strip_padding(text: &str) -> String {
    text.chars().filter(|c| *c != ZWNBSP).collect()
}

/// Attribute predicate matching names that start with `prefix`.
pub fn attribute_prefix(prefix: impl Into<String>) -> impl Fn(&str) -> bool {
    let prefix = prefix.into();
    move |name: &str| name.starts_with(&prefix)
}
