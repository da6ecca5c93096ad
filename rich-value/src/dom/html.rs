//! HTML trees backed by html5ever
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` pair for both directions:
//! - `html5ever`: browser-grade HTML5 tokenizer and tree builder, so markup
//!   that a browser would accept (unclosed `li`, bare `<br>`, stray entities)
//!   produces the same tree here
//! - `markup5ever_rcdom`: reference counted DOM, whose `Handle` doubles as a
//!   node identity for selections
//!
//! # Fragments
//!
//! Rich text is a fragment, not a document. [`HtmlFragment::parse`] feeds the
//! markup to the document parser behind an explicit `<body>` start tag, which
//! keeps elements such as `script` or `meta` in place instead of hoisting them
//! into `head`, and hands out the `body` element as the root.
//!
//! The fragment owns the parsed `RcDom`. Dropping an `RcDom` detaches the
//! children of every node it owned, so handles obtained from a fragment are
//! only meaningful while the fragment is alive.

use super::{MarkupNode, NodeKind};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, Attribute, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A parsed markup fragment and its root container.
pub struct HtmlFragment {
    // Keeps every node of the tree attached.
    _dom: RcDom,
    root: Handle,
}

impl HtmlFragment {
    /// Parse fragment markup. Parsing never fails; malformed input is repaired
    /// the way a browser would repair it.
    pub fn parse(html: &str) -> Self {
        let source = format!("<body>{html}");
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(source);
        let root = find_element(&dom.document, "body").unwrap_or_else(|| dom.document.clone());
        Self { _dom: dom, root }
    }

    /// The container whose children are the fragment's top-level nodes.
    pub fn root(&self) -> &Handle {
        &self.root
    }

    /// Follow child indices from the root. An empty path is the root itself.
    pub fn node_at_path(&self, path: &[usize]) -> Option<Handle> {
        node_at_path(&self.root, path)
    }
}

/// Parse fragment markup into a tree.
pub fn parse_html(html: &str) -> HtmlFragment {
    HtmlFragment::parse(html)
}

/// Follow child indices from `root`.
pub fn node_at_path(root: &Handle, path: &[usize]) -> Option<Handle> {
    let mut current = root.clone();
    for index in path {
        let next = current.children.borrow().get(*index).cloned()?;
        current = next;
    }
    Some(current)
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &node.data {
        if &*name.local == tag {
            return Some(node.clone());
        }
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

impl MarkupNode for Handle {
    fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Document => NodeKind::Document,
            NodeData::Doctype { .. } => NodeKind::Doctype,
            NodeData::Text { .. } => NodeKind::Text,
            NodeData::Comment { .. } => NodeKind::Comment,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::ProcessingInstruction { .. } => NodeKind::ProcessingInstruction,
        }
    }

    fn tag_name(&self) -> Option<String> {
        match &self.data {
            NodeData::Element { name, .. } => Some((*name.local).to_ascii_lowercase()),
            _ => None,
        }
    }

    fn attributes(&self) -> Vec<(String, String)> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .map(|attr| {
                    let name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    (name, attr.value.to_string())
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn children(&self) -> Vec<Self> {
        self.children.borrow().clone()
    }

    fn text(&self) -> Option<String> {
        match &self.data {
            NodeData::Text { contents } => Some(contents.borrow().to_string()),
            _ => None,
        }
    }

    fn is_same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// Create a detached HTML element with attributes
pub(crate) fn create_element<'a>(
    tag: &str,
    attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a detached text node
pub(crate) fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}
