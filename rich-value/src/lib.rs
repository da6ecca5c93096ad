//! Flat rich text values for nested markup
//!
//!     This crate converts between a markup tree (inline formatting elements, embedded objects,
//!     optional repeated line containers) and a flat value: a UTF-16 text, one format slot per
//!     code unit, and an optional selection expressed as linear offsets. The flat side is what
//!     caret movement, splitting, merging and selection math want; the tree side is what the
//!     document stores.
//!
//!     TLDR:
//!         - Build with [`Builder`] (or the [`create`] / [`create_value`] shortcuts)
//!         - Serialize with [`to_markup`]
//!         - Store and exchange values with [`wire`]
//!
//! Architecture
//!
//!     The builder never depends on a concrete DOM. It walks anything implementing
//!     [`dom::MarkupNode`]; the html5ever `RcDom` implementation lives in [`dom::html`].
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Descriptors, handles and the table owning them
//!     ├── stack.rs                # Open format stack during a walk
//!     ├── value.rs                # The flat value and its local edits (slice, append)
//!     ├── filters.rs              # Caller supplied predicates
//!     ├── dom
//!     │   ├── mod.rs              # MarkupNode trait, boundaries, selections
//!     │   └── html.rs             # html5ever / rcdom implementation
//!     ├── builder
//!     │   ├── mod.rs              # Tree → value walk
//!     │   ├── range.rs            # Inline selection resolution
//!     │   └── multiline.rs        # Line splitting and nested lists
//!     ├── serializer.rs           # Value → markup
//!     └── wire.rs                 # JSON form
//!
//! Testing
//!     tests
//!     ├── builder
//!     └── serializer
//!
//!     Note that rust does not by default discover tests in subdirectories, so they are included
//!     from tests/lib.rs.
//!
//! Core Algorithms
//!
//!     Identity is the heart of the model. Every element the builder walks allocates exactly one
//!     descriptor in the value's [`FormatTable`], and every character it spans stores the same
//!     [`FormatHandle`] at the same depth. The serializer relies on nothing else: it diffs the
//!     handles of consecutive characters, closes what is no longer shared and opens what is new.
//!     Two equal descriptors with different handles are two elements.
//!
//!     Selections are resolved during the build walk. A boundary names a node and an offset in
//!     it, and resolves the moment the walker reaches that position, so there is no second pass
//!     and no mapping table.
//!
//!     Values are never patched to follow a tree. Every edit produces a new value, either by a
//!     local operation ([`Value::slice`], [`Value::append`]) or by rebuilding from the tree.

pub mod builder;
pub mod dom;
pub mod error;
pub mod filters;
pub mod format;
pub mod serializer;
pub mod stack;
pub mod value;
pub mod wire;

pub use builder::{create, create_from_node, create_value, BuildOptions, Builder};
pub use dom::html::HtmlFragment;
pub use dom::{Boundary, MarkupNode, NodeKind, Selection};
pub use error::ValueError;
pub use filters::Filters;
pub use format::{Attributes, FormatDescriptor, FormatHandle, FormatTable};
pub use serializer::to_markup;
pub use value::Value;
