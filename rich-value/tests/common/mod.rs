//! Shared helpers for value tests.

use rich_value::{Builder, FormatDescriptor, HtmlFragment, Value};

/// Build a single-line value from markup.
pub fn build(html: &str) -> Value {
    build_lines(html, None)
}

pub fn build_lines(html: &str, line_tag: Option<&str>) -> Value {
    let fragment = HtmlFragment::parse(html);
    Builder::new().with_line_tag(line_tag).build(fragment.root())
}

/// Format types of every slot, outermost first.
pub fn types(value: &Value) -> Vec<Vec<String>> {
    (0..value.len())
        .map(|index| {
            value
                .stack_at(index)
                .into_iter()
                .map(|descriptor| descriptor.format_type.clone())
                .collect()
        })
        .collect()
}

/// Descriptors at one position.
pub fn stack(value: &Value, index: usize) -> Vec<FormatDescriptor> {
    value.stack_at(index).into_iter().cloned().collect()
}

pub fn utf16(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}
