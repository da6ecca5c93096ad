//! Inline selection resolution
//!
//! Boundaries are resolved while the walker passes over the nodes they name,
//! so the offsets come out of the same traversal that produces the text. The
//! walker reports every position it reaches; a boundary resolves the first
//! time a matching report arrives and is never touched again.

use crate::dom::{contains, Boundary, MarkupNode, Selection};
use log::debug;

pub(crate) struct RangeTracker<N> {
    pending: [Option<Boundary<N>>; 2],
    resolved: [Option<usize>; 2],
}

const ENDS: [&str; 2] = ["start", "end"];

impl<N: MarkupNode> RangeTracker<N> {
    pub(crate) fn new(selection: Option<Selection<N>>) -> Self {
        let pending = match selection {
            Some(Selection { start, end }) => [Some(start), Some(end)],
            None => [None, None],
        };
        Self {
            pending,
            resolved: [None, None],
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.iter().any(Option::is_some)
    }

    /// The walker is about to visit child `index` of `container`.
    pub(crate) fn at_child(&mut self, container: &N, index: usize, length: usize) {
        self.resolve_where(
            |boundary| boundary.offset == index && boundary.node.is_same_node(container),
            |_| length,
        );
    }

    /// Every child of `container` has been visited.
    pub(crate) fn after_children(&mut self, container: &N, count: usize, length: usize) {
        self.resolve_where(
            |boundary| boundary.offset >= count && boundary.node.is_same_node(container),
            |_| length,
        );
    }

    /// `node` occupies `before..after` and has no walked children.
    pub(crate) fn at_leaf(&mut self, node: &N, before: usize, after: usize) {
        self.resolve_where(
            |boundary| boundary.node.is_same_node(node),
            |offset| if offset == 0 { before } else { after },
        );
    }

    /// A text node whose emitted content starts at `before`.
    ///
    /// `measure` maps a source offset to the number of units emitted for the
    /// source text in front of it.
    pub(crate) fn at_text(&mut self, node: &N, before: usize, measure: impl Fn(usize) -> usize) {
        self.resolve_where(
            |boundary| boundary.node.is_same_node(node),
            |offset| before + measure(offset),
        );
    }

    /// `subtree` contributes nothing. Boundaries anywhere inside it collapse
    /// to `length`.
    pub(crate) fn within_skipped(&mut self, subtree: &N, length: usize) {
        if !self.is_pending() {
            return;
        }
        self.resolve_where(|boundary| contains(subtree, &boundary.node), |_| length);
    }

    fn resolve_where(
        &mut self,
        matches: impl Fn(&Boundary<N>) -> bool,
        offset: impl Fn(usize) -> usize,
    ) {
        for end in 0..2 {
            let resolved = match &self.pending[end] {
                Some(boundary) if matches(boundary) => offset(boundary.offset),
                _ => continue,
            };
            self.pending[end] = None;
            self.resolved[end] = Some(resolved);
        }
    }

    /// Resolved `(start, end)`, both set or neither. A selection with an end
    /// the walk never reached is dropped whole.
    pub(crate) fn finish(self) -> (Option<usize>, Option<usize>) {
        for (end, boundary) in self.pending.iter().enumerate() {
            if let Some(boundary) = boundary {
                debug!(
                    "selection {} at offset {} is outside the walked tree",
                    ENDS[end], boundary.offset
                );
            }
        }
        match self.resolved {
            [Some(start), Some(end)] => (Some(start), Some(end)),
            _ => (None, None),
        }
    }
}
