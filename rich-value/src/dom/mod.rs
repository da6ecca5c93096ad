//! Host tree abstraction
//!
//! The builder never depends on a concrete DOM. Anything that can answer the
//! questions of [`MarkupNode`] can be turned into a value: the html5ever
//! `RcDom` tree in [`html`], or a live tree owned by an embedding editor.
//!
//! Node identity matters for selections: a [`Boundary`] names a node, and the
//! walker asks [`MarkupNode::is_same_node`] whenever it reaches a candidate.

pub mod html;

use std::fmt;

/// Coarse classification of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
    Document,
    Doctype,
    ProcessingInstruction,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::Comment => "comment",
            NodeKind::Document => "document",
            NodeKind::Doctype => "doctype",
            NodeKind::ProcessingInstruction => "processing instruction",
        };
        f.write_str(name)
    }
}

/// Capabilities the builder needs from a host tree node.
///
/// Implementations are expected to be cheap handles (reference counted
/// pointers, arena indices); `children` is called once per visited element.
pub trait MarkupNode: Clone {
    fn kind(&self) -> NodeKind;

    /// Lowercase tag name for elements, `None` otherwise.
    fn tag_name(&self) -> Option<String>;

    /// Attributes in source order. Empty for non-elements.
    fn attributes(&self) -> Vec<(String, String)>;

    /// Ordered child nodes.
    fn children(&self) -> Vec<Self>;

    /// Character data of text nodes, `None` otherwise.
    fn text(&self) -> Option<String>;

    /// Whether both handles designate the same node.
    fn is_same_node(&self, other: &Self) -> bool;
}

/// One end of a selection: a node and an offset inside it.
///
/// The offset counts UTF-16 units for text nodes and child positions for
/// every other node.
#[derive(Debug, Clone)]
pub struct Boundary<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> Boundary<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// A selection expressed against the source tree.
#[derive(Debug, Clone)]
pub struct Selection<N> {
    pub start: Boundary<N>,
    pub end: Boundary<N>,
}

impl<N: Clone> Selection<N> {
    pub fn new(start: Boundary<N>, end: Boundary<N>) -> Self {
        Self { start, end }
    }

    /// Both ends at the same position.
    pub fn collapsed(node: N, offset: usize) -> Self {
        Self {
            start: Boundary::new(node.clone(), offset),
            end: Boundary::new(node, offset),
        }
    }
}

/// Whether `target` is `ancestor` or one of its descendants.
pub fn contains<N: MarkupNode>(ancestor: &N, target: &N) -> bool {
    ancestor.is_same_node(target)
        || ancestor
            .children()
            .iter()
            .any(|child| contains(child, target))
}
