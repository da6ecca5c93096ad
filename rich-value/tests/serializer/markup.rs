//! Value → markup rendering.

use crate::common::build_lines;
use insta::assert_snapshot;
use rich_value::{to_markup, FormatDescriptor, FormatHandle, Value, ValueError};

/// A value whose slots are given as indices into `descriptors`.
fn value_of(text: &str, descriptors: Vec<FormatDescriptor>, slots: &[&[usize]]) -> Value {
    let mut value = Value::from_text(text);
    let handles: Vec<FormatHandle> = descriptors
        .into_iter()
        .map(|descriptor| value.table.insert(descriptor))
        .collect();
    for (slot, indices) in value.formats.iter_mut().zip(slots) {
        *slot = indices.iter().map(|index| handles[*index]).collect();
    }
    value
}

#[test]
fn test_overlapping_formats() {
    let value = value_of(
        "abc",
        vec![FormatDescriptor::new("em"), FormatDescriptor::new("strong")],
        &[&[0], &[0, 1], &[1]],
    );

    assert_snapshot!(to_markup(&value, None).unwrap(), @"<em>a<strong>b</strong></em><strong>c</strong>");
}

#[test]
fn test_attributes_in_order() {
    let value = value_of(
        "x",
        vec![FormatDescriptor::new("a")
            .with_attribute("href", "/a?b=1&c=\"2\"")
            .with_attribute("target", "_blank")],
        &[&[0]],
    );

    assert_snapshot!(to_markup(&value, None).unwrap(), @r#"<a href="/a?b=1&amp;c=&quot;2&quot;" target="_blank">x</a>"#);
}

#[test]
fn test_object_inside_formatting() {
    let value = value_of(
        "a\u{fffc}b",
        vec![
            FormatDescriptor::new("em"),
            FormatDescriptor::object("img").with_attribute("src", "x.png"),
        ],
        &[&[0], &[0, 1], &[0]],
    );

    assert_snapshot!(to_markup(&value, None).unwrap(), @r#"<em>a<img src="x.png">b</em>"#);
}

#[test]
fn test_line_breaks() {
    let value = value_of("a\nb", vec![FormatDescriptor::new("em")], &[&[0], &[0], &[0]]);

    assert_snapshot!(to_markup(&value, None).unwrap(), @"<em>a<br>b</em>");
}

#[test]
fn test_multiline() {
    let value = value_of(
        "one\n\nt",
        vec![FormatDescriptor::new("em")],
        &[&[], &[], &[0], &[], &[], &[0]],
    );

    assert_snapshot!(to_markup(&value, Some("p")).unwrap(), @"<p>on<em>e</em></p><p><em>t</em></p>");
}

#[test]
fn test_plain_text_after_formatting() {
    let value = value_of("ab c", vec![FormatDescriptor::new("strong")], &[&[0], &[], &[], &[]]);

    assert_snapshot!(to_markup(&value, None).unwrap(), @"<strong>a</strong>b c");
}

#[test]
fn test_plain_last_line() {
    let value = value_of(
        "o\n\nne",
        vec![FormatDescriptor::new("em")],
        &[&[0], &[], &[], &[], &[]],
    );

    assert_snapshot!(to_markup(&value, Some("p")).unwrap(), @"<p><em>o</em></p><p>ne</p>");
}

#[test]
fn test_formatted_breaks_stay_in_line() {
    let value = value_of(
        "a\n\nb",
        vec![FormatDescriptor::new("em")],
        &[&[0], &[0], &[0], &[0]],
    );

    assert_snapshot!(to_markup(&value, Some("p")).unwrap(), @"<p><em>a<br><br>b</em></p>");
}

#[test]
fn test_separator_without_line_tag_is_two_breaks() {
    let value = Value::from_text("a\n\nb");

    assert_snapshot!(to_markup(&value, None).unwrap(), @"a<br><br>b");
}

#[test]
fn test_nested_list() {
    let value = build_lines("<li>one<ul><li>two</li></ul></li><li>three</li>", Some("li"));

    assert_snapshot!(to_markup(&value, Some("li")).unwrap(), @"<li>one<ul><li>two</li></ul></li><li>three</li>");
}

#[test]
fn test_text_is_escaped() {
    let value = Value::from_text("<b> & \u{a0}");

    assert_snapshot!(to_markup(&value, None).unwrap(), @"&lt;b&gt; &amp; &nbsp;");
}

#[test]
fn test_unknown_handle_is_rejected() {
    let mut value = value_of("a", vec![FormatDescriptor::new("em")], &[&[0]]);
    value.table = Default::default();

    assert_eq!(
        to_markup(&value, None),
        Err(ValueError::UnknownFormat {
            index: 0,
            handle: 0
        })
    );
}
