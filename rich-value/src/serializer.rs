//! Value to markup
//!
//! The inverse of the builder. Characters are visited in order while an open
//! stack mirrors the elements currently being filled. For each character the
//! longest common prefix (by handle identity) between the open stack and the
//! character's slot is kept; everything above it is closed and the rest of
//! the slot is opened, so a run sharing one handle ends up inside one element.
//!
//! Pipeline: Value → RcDom → HTML string. The tree is assembled from detached
//! rcdom nodes and written out with html5ever's serializer, which handles
//! escaping and void elements.
//!
//! Rendering rules:
//! - an object descriptor on top of a slot becomes its own void element and
//!   the replacement character is not written
//! - `'\n'` becomes `<br>`
//! - with a line tag, every line is wrapped in that element and `"\n\n"`
//!   starts the next line; an empty value still renders one empty line
//! - with `li` as line tag, `ul`/`ol` descriptors render as a nested list
//!   holding a single item

use crate::builder::multiline::LIST_ITEM_TAG;
use crate::dom::html::{create_element, create_text};
use crate::error::ValueError;
use crate::format::{FormatDescriptor, FormatHandle};
use crate::value::{Value, LINE_BREAK, PARAGRAPH_SEPARATOR};
use html5ever::{serialize, serialize::SerializeOpts, serialize::TraversalScope};
use markup5ever_rcdom::{Handle, SerializableHandle};

/// Render `value` as markup.
///
/// Fails only for values whose formats do not match their text or refer to
/// descriptors missing from the table.
pub fn to_markup(value: &Value, line_tag: Option<&str>) -> Result<String, ValueError> {
    value.check_shape()?;

    let root = create_element("body", []);
    let mut writer = MarkupWriter::new(value, root.clone(), line_tag);
    writer.write()?;

    serialize_children(&root)
}

struct MarkupWriter<'v> {
    value: &'v Value,
    root: Handle,
    line_tag: Option<&'v str>,
    line: Option<Handle>,
    open: Vec<(FormatHandle, Handle)>,
    pending: Vec<u16>,
}

impl<'v> MarkupWriter<'v> {
    fn new(value: &'v Value, root: Handle, line_tag: Option<&'v str>) -> Self {
        Self {
            value,
            root,
            line_tag,
            line: None,
            open: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn write(&mut self) -> Result<(), ValueError> {
        if self.line_tag.is_some() {
            self.start_line();
        }

        let value = self.value;
        let text = &value.text;
        let mut index = 0;
        while index < text.len() {
            if self.line_tag.is_some() && is_separator(value, index) {
                self.close_to(0);
                self.flush();
                self.start_line();
                index += PARAGRAPH_SEPARATOR.len();
                continue;
            }

            let object_written = self.sync_stack(&value.formats[index])?;
            if !object_written {
                self.write_unit(text[index]);
            }
            index += 1;
        }

        self.close_to(0);
        self.flush();
        Ok(())
    }

    /// Bring the open stack in line with `slot`. Returns whether the slot
    /// ended in an object, which replaces the character.
    fn sync_stack(&mut self, slot: &[FormatHandle]) -> Result<bool, ValueError> {
        let common = self
            .open
            .iter()
            .zip(slot)
            .take_while(|((open, _), handle)| open == *handle)
            .count();
        self.close_to(common);

        for (depth, handle) in slot.iter().enumerate().skip(common) {
            let descriptor = self.descriptor(*handle)?;
            let is_top = depth + 1 == slot.len();
            if descriptor.object && is_top {
                self.flush();
                let element = element_for(descriptor);
                self.append(element);
                return Ok(true);
            }
            self.open_format(*handle, descriptor);
        }
        Ok(false)
    }

    fn open_format(&mut self, handle: FormatHandle, descriptor: &FormatDescriptor) {
        self.flush();
        let element = element_for(descriptor);
        self.append(element.clone());

        let content = if self.is_nested_list(descriptor) {
            let item = create_element(LIST_ITEM_TAG, []);
            element.children.borrow_mut().push(item.clone());
            item
        } else {
            element
        };
        self.open.push((handle, content));
    }

    fn is_nested_list(&self, descriptor: &FormatDescriptor) -> bool {
        self.line_tag == Some(LIST_ITEM_TAG)
            && matches!(descriptor.format_type.as_str(), "ul" | "ol")
    }

    fn close_to(&mut self, depth: usize) {
        if self.open.len() > depth {
            self.flush();
            self.open.truncate(depth);
        }
    }

    fn start_line(&mut self) {
        self.flush();
        let tag = self.line_tag.unwrap_or_default();
        let line = create_element(tag, []);
        self.root.children.borrow_mut().push(line.clone());
        self.line = Some(line);
    }

    fn write_unit(&mut self, unit: u16) {
        if unit == LINE_BREAK {
            self.flush();
            self.append(create_element("br", []));
        } else {
            self.pending.push(unit);
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = String::from_utf16_lossy(&self.pending);
        self.pending.clear();
        self.append(create_text(&text));
    }

    fn append(&self, child: Handle) {
        self.current_parent().children.borrow_mut().push(child);
    }

    fn current_parent(&self) -> &Handle {
        self.open
            .last()
            .map(|(_, element)| element)
            .or(self.line.as_ref())
            .unwrap_or(&self.root)
    }

    fn descriptor(&self, handle: FormatHandle) -> Result<&'v FormatDescriptor, ValueError> {
        let value: &'v Value = self.value;
        value
            .table
            .get(handle)
            .ok_or_else(|| ValueError::SerializationError(format!("missing format {handle}")))
    }
}

/// `"\n\n"` with empty slots. Formatted line breaks stay inside the line.
fn is_separator(value: &Value, index: usize) -> bool {
    let end = index + PARAGRAPH_SEPARATOR.len();
    end <= value.len()
        && value.text[index..end] == PARAGRAPH_SEPARATOR
        && value.formats[index..end].iter().all(Vec::is_empty)
}

fn element_for(descriptor: &FormatDescriptor) -> Handle {
    create_element(&descriptor.format_type, descriptor.attributes.iter())
}

/// Serialize the children of `root` (not `root` itself).
fn serialize_children(root: &Handle) -> Result<String, ValueError> {
    let mut output = Vec::new();

    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for child in root.children.borrow().iter() {
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            ValueError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
    }

    String::from_utf8(output)
        .map_err(|e| ValueError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}
