//! Deprecated call shapes for rich-value
//!
//!     Older callers converted single nodes, rendered values and pulled values out of a tree by
//!     selector through a handful of free functions. Those shapes are kept here so callers can
//!     migrate at their own pace. Every entry point delegates to `rich_value` and reports a
//!     [`DeprecationNotice`] through an injected [`DeprecationLogger`] each time it is called.
//!
//!     The default logger, [`LogDeprecations`], forwards notices to the `log` facade under the
//!     `rich_value::deprecated` target.

pub mod error;
pub mod notice;
pub mod selector;

pub use error::LegacyError;
pub use notice::{DeprecationLogger, DeprecationNotice, LogDeprecations};
pub use selector::Selector;

use rich_value::{to_markup, Builder, MarkupNode, NodeKind, Value};

/// Version in which the wrappers below are removed.
pub const REMOVAL_VERSION: &str = "0.3.0";

const MIGRATION_GUIDE: &str = "https://github.com/rich-value/rich-value/blob/main/MIGRATING.md";

pub const NODE_TO_VALUE: DeprecationNotice = DeprecationNotice {
    construct: "node_to_value",
    version: REMOVAL_VERSION,
    alternative: "rich_value::create_from_node",
    link: MIGRATION_GUIDE,
};

pub const VALUE_TO_MARKUP: DeprecationNotice = DeprecationNotice {
    construct: "value_to_markup",
    version: REMOVAL_VERSION,
    alternative: "rich_value::to_markup",
    link: MIGRATION_GUIDE,
};

pub const MATCHER: DeprecationNotice = DeprecationNotice {
    construct: "matcher",
    version: REMOVAL_VERSION,
    alternative: "rich_value::Builder::build on the selected element",
    link: MIGRATION_GUIDE,
};

pub const CONCAT: DeprecationNotice = DeprecationNotice {
    construct: "concat",
    version: REMOVAL_VERSION,
    alternative: "rich_value::Value::concat",
    link: MIGRATION_GUIDE,
};

/// Entry point for the deprecated wrappers.
#[derive(Debug, Clone, Default)]
pub struct Legacy<L: DeprecationLogger = LogDeprecations> {
    logger: L,
}

impl<L: DeprecationLogger> Legacy<L> {
    pub fn new(logger: L) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Value of a single element or text node, the node itself included.
    ///
    /// Unlike the builder walk, which skips what it does not understand,
    /// anything other than an element or text node is an error here.
    pub fn node_to_value<N: MarkupNode>(&self, node: &N) -> Result<Value, LegacyError> {
        self.logger.deprecated(&NODE_TO_VALUE);
        match node.kind() {
            NodeKind::Element | NodeKind::Text => Ok(rich_value::create_from_node(node)),
            kind => Err(LegacyError::UnsupportedNodeKind(kind)),
        }
    }

    pub fn value_to_markup(
        &self,
        value: &Value,
        line_tag: Option<&str>,
    ) -> Result<String, LegacyError> {
        self.logger.deprecated(&VALUE_TO_MARKUP);
        Ok(to_markup(value, line_tag)?)
    }

    /// Matcher pulling a value out of the first element matching `selector`.
    ///
    /// The notice fires once, when the matcher is created.
    pub fn matcher(&self, selector: &str) -> Result<Matcher, LegacyError> {
        self.logger.deprecated(&MATCHER);
        Ok(Matcher {
            selector: selector.parse()?,
        })
    }

    pub fn concat<'a>(&self, values: impl IntoIterator<Item = &'a Value>) -> Value {
        self.logger.deprecated(&CONCAT);
        Value::concat(values)
    }
}

/// Built by [`Legacy::matcher`].
#[derive(Debug, Clone)]
pub struct Matcher {
    selector: Selector,
}

impl Matcher {
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Value of the contents of the first match under `root`, or an empty
    /// value when nothing matches.
    pub fn matches<N: MarkupNode>(&self, root: &N) -> Value {
        match self.selector.find_first(root) {
            Some(element) => Builder::new().build(&element),
            None => {
                log::debug!("no element under the root matches {:?}", self.selector);
                Value::new()
            }
        }
    }
}
