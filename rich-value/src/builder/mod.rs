//! Tree to value conversion
//!
//! A single depth-first walk turns a markup tree into a [`Value`]:
//!
//! - text nodes append their (filtered) code units, each paired with a copy of
//!   the open format stack
//! - inline elements open one descriptor for their whole subtree, so every
//!   character they span shares its handle
//! - object elements (`img`, `hr`, ...) become a single U+FFFC carrying an
//!   object descriptor
//! - `br` becomes `'\n'` under the current stack
//! - anything else (comments, doctypes) is zero-width
//!
//! When a selection is given, its boundaries are resolved during the same walk
//! (see [`range`]). With a line tag the top level is split into lines instead
//! (see [`multiline`]).

pub mod multiline;
mod range;

use crate::dom::html::HtmlFragment;
use crate::dom::{MarkupNode, NodeKind, Selection};
use crate::filters::Filters;
use crate::format::{Attributes, FormatDescriptor, FormatHandle};
use crate::stack::FormatTracker;
use crate::value::{Value, LINE_BREAK, OBJECT_REPLACEMENT_CHARACTER};
use log::{debug, trace};
use range::RangeTracker;

/// Elements rendered as a single replacement character by default.
pub const DEFAULT_OBJECT_TAGS: &[&str] = &[
    "img", "hr", "input", "embed", "wbr", "area", "source", "track", "col", "iframe", "canvas",
];

/// Elements below which whitespace is content by default.
pub const DEFAULT_PRESERVE_WHITESPACE_TAGS: &[&str] = &["pre"];

/// Walk settings independent of the tree and its selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Tag of the top-level line containers. `None` builds a single line.
    pub line_tag: Option<String>,
    pub object_tags: Vec<String>,
    pub preserve_whitespace_tags: Vec<String>,
    /// Reuse an equal descriptor opened right after the previous character's.
    pub coalesce_adjacent: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            line_tag: None,
            object_tags: DEFAULT_OBJECT_TAGS.iter().map(|t| t.to_string()).collect(),
            preserve_whitespace_tags: DEFAULT_PRESERVE_WHITESPACE_TAGS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            coalesce_adjacent: false,
        }
    }
}

impl BuildOptions {
    pub fn is_object_tag(&self, tag: &str) -> bool {
        self.object_tags.iter().any(|t| t == tag)
    }

    pub fn preserves_whitespace(&self, tag: &str) -> bool {
        self.preserve_whitespace_tags.iter().any(|t| t == tag)
    }
}

/// Configured tree to value conversion.
///
/// ```ignore
/// let fragment = HtmlFragment::parse("<em>test</em>");
/// let value = Builder::new().build(fragment.root());
/// assert_eq!(value.text_string(), "test");
/// ```
pub struct Builder<'a, N> {
    options: BuildOptions,
    filters: Filters<'a, N>,
    selection: Option<Selection<N>>,
}

impl<'a, N: MarkupNode> Default for Builder<'a, N> {
    fn default() -> Self {
        Self {
            options: BuildOptions::default(),
            filters: Filters::default(),
            selection: None,
        }
    }
}

impl<'a, N: MarkupNode> Builder<'a, N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_line_tag(mut self, line_tag: Option<&str>) -> Self {
        self.options.line_tag = line_tag.map(str::to_string);
        self
    }

    pub fn with_filters(mut self, filters: Filters<'a, N>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_selection(mut self, selection: Option<Selection<N>>) -> Self {
        self.selection = selection;
        self
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build a value from the children of `root`.
    pub fn build(&self, root: &N) -> Value {
        let mut walker = Walker::new(&self.options, &self.filters, self.selection.clone());
        match self.options.line_tag.as_deref() {
            Some(line_tag) => multiline::walk_lines(&mut walker, root, line_tag),
            None => walker.walk_children(root),
        }
        walker.finish()
    }

    /// Build a value from `node` itself: an element contributes its own
    /// descriptor, a text node its text. Line splitting does not apply.
    pub fn build_node(&self, node: &N) -> Value {
        let mut walker = Walker::new(&self.options, &self.filters, self.selection.clone());
        walker.visit(node);
        walker.finish()
    }
}

/// Parse an HTML fragment and build a value from it.
pub fn create(html: &str, line_tag: Option<&str>) -> Value {
    let fragment = HtmlFragment::parse(html);
    Builder::new()
        .with_line_tag(line_tag)
        .build(fragment.root())
}

/// Build a value from the children of `root`.
///
/// `start`/`end` are set only when a selection is given and both of its
/// boundaries are reached by the walk.
pub fn create_value<'a, N: MarkupNode>(
    root: &N,
    selection: Option<Selection<N>>,
    line_tag: Option<&str>,
    filters: Filters<'a, N>,
) -> Value {
    Builder::new()
        .with_line_tag(line_tag)
        .with_filters(filters)
        .with_selection(selection)
        .build(root)
}

/// Build a value from a single node, the node itself included.
pub fn create_from_node<N: MarkupNode>(node: &N) -> Value {
    Builder::new().build_node(node)
}

/// State of one walk.
pub(crate) struct Walker<'w, 'a, N> {
    options: &'w BuildOptions,
    filters: &'w Filters<'a, N>,
    tracker: FormatTracker,
    text: Vec<u16>,
    formats: Vec<Vec<FormatHandle>>,
    range: RangeTracker<N>,
    preserve_depth: usize,
    flatten_lists: bool,
}

impl<'w, 'a, N: MarkupNode> Walker<'w, 'a, N> {
    fn new(
        options: &'w BuildOptions,
        filters: &'w Filters<'a, N>,
        selection: Option<Selection<N>>,
    ) -> Self {
        Self {
            options,
            filters,
            tracker: FormatTracker::new().coalescing(options.coalesce_adjacent),
            text: Vec::new(),
            formats: Vec::new(),
            range: RangeTracker::new(selection),
            preserve_depth: 0,
            flatten_lists: false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.text.len()
    }

    pub(crate) fn walk_children(&mut self, container: &N) {
        let children = container.children();
        for (index, child) in children.iter().enumerate() {
            self.at_child(container, index);
            self.visit(child);
        }
        self.after_children(container, children.len());
    }

    pub(crate) fn visit(&mut self, node: &N) {
        match node.kind() {
            NodeKind::Text => self.visit_text(node),
            NodeKind::Element => self.visit_element(node),
            kind => {
                trace!("{kind} node is zero-width");
                self.skip(node);
            }
        }
    }

    pub(crate) fn skip(&mut self, node: &N) {
        let length = self.len();
        self.range.within_skipped(node, length);
    }

    fn visit_text(&mut self, node: &N) {
        let raw = node.text().unwrap_or_default();
        let preserve = self.preserve_depth > 0;
        if !preserve && is_layout_whitespace(&raw) {
            trace!("dropping layout whitespace");
            self.skip(node);
            return;
        }

        let before = self.len();
        let filters = self.filters;
        let process = |source: &str| {
            let cleaned = clean_text(source, preserve);
            filters.filter_text(&cleaned).into_owned()
        };
        let emitted: Vec<u16> = process(&raw).encode_utf16().collect();

        if self.range.is_pending() {
            let source: Vec<u16> = raw.encode_utf16().collect();
            let limit = emitted.len();
            self.range.at_text(node, before, |offset| {
                let prefix = String::from_utf16_lossy(&source[..offset.min(source.len())]);
                process(&prefix).encode_utf16().count().min(limit)
            });
        }

        let slot = self.tracker.snapshot();
        for unit in emitted {
            self.push_unit(unit, slot.clone());
        }
    }

    fn visit_element(&mut self, node: &N) {
        let Some(tag) = node.tag_name() else {
            self.skip(node);
            return;
        };

        if self.filters.removes(node) {
            debug!("removing <{tag}>");
            self.skip(node);
            return;
        }

        let unwrap = self.filters.unwraps(node);
        if unwrap && node.children().is_empty() {
            debug!("removing empty unwrapped <{tag}>");
            self.skip(node);
            return;
        }

        if tag == "br" {
            let before = self.len();
            let slot = self.tracker.snapshot();
            self.push_unit(LINE_BREAK, slot);
            let after = self.len();
            self.range.at_leaf(node, before, after);
            return;
        }

        if self.options.is_object_tag(&tag) {
            self.visit_object(node, tag);
            return;
        }

        if unwrap {
            self.walk_contents(node, &tag);
            return;
        }

        if self.flatten_lists && (tag == "ul" || tag == "ol") {
            self.visit_list(node, tag);
            return;
        }

        let descriptor = FormatDescriptor::new(tag.as_str()).with_attributes(self.attributes(node));
        self.tracker
            .open(descriptor, self.formats.last().map(Vec::as_slice));
        self.walk_contents(node, &tag);
        self.tracker.close();
    }

    fn visit_object(&mut self, node: &N, tag: String) {
        let before = self.len();
        let descriptor = FormatDescriptor::object(tag).with_attributes(self.attributes(node));
        self.tracker.open(descriptor, None);
        let slot = self.tracker.snapshot();
        self.tracker.close();

        let mut buffer = [0u16; 1];
        OBJECT_REPLACEMENT_CHARACTER.encode_utf16(&mut buffer);
        self.push_unit(buffer[0], slot);

        self.range.at_leaf(node, before, before + 1);
        self.range.within_skipped(node, before);
    }

    /// A nested list inside a list line: one descriptor for the wrapper, the
    /// items' contents appended to the current line.
    fn visit_list(&mut self, node: &N, tag: String) {
        let descriptor = FormatDescriptor::new(tag.as_str()).with_attributes(self.attributes(node));
        self.tracker
            .open(descriptor, self.formats.last().map(Vec::as_slice));

        let children = node.children();
        for (index, child) in children.iter().enumerate() {
            self.at_child(node, index);
            let is_item = child.tag_name().as_deref() == Some("li");
            if is_item && !self.filters.removes(child) {
                self.walk_children(child);
            } else {
                self.visit(child);
            }
        }
        self.after_children(node, children.len());

        self.tracker.close();
    }

    /// Walk the children of an element, tracking whitespace preservation.
    pub(crate) fn walk_contents(&mut self, node: &N, tag: &str) {
        let preserve = self.options.preserves_whitespace(tag);
        if preserve {
            self.preserve_depth += 1;
        }
        self.walk_children(node);
        if preserve {
            self.preserve_depth -= 1;
        }
    }

    pub(crate) fn push_separator(&mut self, units: &[u16]) {
        for unit in units {
            self.push_unit(*unit, Vec::new());
        }
    }

    pub(crate) fn at_child(&mut self, container: &N, index: usize) {
        let length = self.len();
        self.range.at_child(container, index, length);
    }

    pub(crate) fn after_children(&mut self, container: &N, count: usize) {
        let length = self.len();
        self.range.after_children(container, count, length);
    }

    pub(crate) fn filters(&self) -> &Filters<'a, N> {
        self.filters
    }

    pub(crate) fn set_flatten_lists(&mut self, flatten: bool) {
        self.flatten_lists = flatten;
    }

    fn attributes(&self, node: &N) -> Attributes {
        node.attributes()
            .into_iter()
            .filter(|(name, _)| !self.filters.removes_attribute(name))
            .collect()
    }

    fn push_unit(&mut self, unit: u16, slot: Vec<FormatHandle>) {
        self.text.push(unit);
        self.formats.push(slot);
    }

    fn finish(self) -> Value {
        let (start, end) = self.range.finish();
        Value {
            text: self.text,
            formats: self.formats,
            start,
            end,
            table: self.tracker.into_table(),
        }
    }
}

/// Whitespace-only text that contains a line break or tab only formats the
/// source markup.
fn is_layout_whitespace(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_whitespace())
        && text.contains(['\n', '\r', '\t'])
}

/// Drop characters that never reach the value from source text. Outside
/// preserved whitespace line breaks are expressed by `br` elements only.
fn clean_text(text: &str, preserve_whitespace: bool) -> String {
    text.chars()
        .filter(|c| *c != OBJECT_REPLACEMENT_CHARACTER)
        .filter(|c| preserve_whitespace || (*c != '\n' && *c != '\r'))
        .collect()
}
