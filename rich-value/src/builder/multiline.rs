//! Line splitting
//!
//! In multiline mode only the root's children whose tag is the line tag count.
//! Each one is walked as a line of its own (the container itself opens no
//! descriptor) and consecutive lines are joined by [`PARAGRAPH_SEPARATOR`],
//! whose slots are always empty. Any other top-level node is skipped.
//!
//! With `li` as line tag, `ul`/`ol` elements met inside a line are flattened
//! into it: the list opens one descriptor shared by everything its items
//! contribute, and the items themselves open none.
//!
//! A selection boundary naming a position between two top-level lines
//! resolves before the separator, at the end of the previous line.

use super::Walker;
use crate::dom::MarkupNode;
use crate::value::PARAGRAPH_SEPARATOR;
use log::trace;

/// Tag that turns on nested list flattening.
pub const LIST_ITEM_TAG: &str = "li";

pub(crate) fn walk_lines<N: MarkupNode>(walker: &mut Walker<'_, '_, N>, root: &N, line_tag: &str) {
    walker.set_flatten_lists(line_tag == LIST_ITEM_TAG);

    let children = root.children();
    let mut lines = 0usize;
    for (index, child) in children.iter().enumerate() {
        walker.at_child(root, index);

        let tag = child.tag_name();
        if tag.as_deref() != Some(line_tag) || walker.filters().removes(child) {
            trace!("skipping top-level node outside a <{line_tag}> line");
            walker.skip(child);
            continue;
        }

        if lines > 0 {
            walker.push_separator(&PARAGRAPH_SEPARATOR);
        }
        lines += 1;
        walker.walk_contents(child, line_tag);
    }
    walker.after_children(root, children.len());
}
