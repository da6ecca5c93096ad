//! Filter set behaviour during the walk.

use crate::common::{stack, types};
use markup5ever_rcdom::Handle;
use rich_value::filters::{attribute_prefix, strip_padding};
use rich_value::{create_value, FormatDescriptor, Filters, HtmlFragment, MarkupNode};

fn build_filtered(html: &str, filters: Filters<'_, Handle>) -> rich_value::Value {
    let fragment = HtmlFragment::parse(html);
    create_value(fragment.root(), None, None, filters)
}

fn is_tag(tag: &'static str) -> impl Fn(&Handle) -> bool {
    move |node: &Handle| node.tag_name().as_deref() == Some(tag)
}

#[test]
fn remove_attribute_strips_private_attributes() {
    let value = build_filtered(
        r#"<strong data-x="v">test</strong>"#,
        Filters::new().with_remove_attribute(attribute_prefix("data-")),
    );

    assert_eq!(value.text_string(), "test");
    assert_eq!(stack(&value, 0), vec![FormatDescriptor::new("strong")]);
}

#[test]
fn format_boundary_attribute_is_filtered() {
    let value = build_filtered(
        r#"<strong data-rich-text-format-boundary="true" class="x">test</strong>"#,
        Filters::new().with_remove_attribute(attribute_prefix("data-rich-text-")),
    );

    assert_eq!(
        stack(&value, 0),
        vec![FormatDescriptor::new("strong").with_attribute("class", "x")]
    );
}

#[test]
fn padding_is_removed() {
    let value = build_filtered(
        "<em>\u{feff}</em>te\u{feff}st",
        Filters::new().with_filter_string(strip_padding),
    );

    assert_eq!(value.text_string(), "test");
    assert_eq!(types(&value), vec![Vec::<&str>::new(); 4]);
}

#[test]
fn removed_nodes_contribute_nothing() {
    let value = build_filtered(
        "a<script>alert(1)</script><em>b</em>",
        Filters::new().with_remove_node(is_tag("script")),
    );

    assert_eq!(value.text_string(), "ab");
    assert_eq!(types(&value), vec![vec![], vec!["em"]]);
}

#[test]
fn unwrapped_nodes_are_transparent() {
    let value = build_filtered(
        "<span>a<em>b</em></span>",
        Filters::new().with_unwrap_node(is_tag("span")),
    );

    assert_eq!(value.text_string(), "ab");
    assert_eq!(types(&value), vec![vec![], vec!["em"]]);
}

#[test]
fn unwrapping_an_empty_object_removes_it() {
    let value = build_filtered(
        r#"a<img src="x.png">b"#,
        Filters::new().with_unwrap_node(is_tag("img")),
    );

    assert_eq!(value.text_string(), "ab");
}

#[test]
fn filters_compose() {
    let value = build_filtered(
        r#"<div><strong data-rich-text-x="1">a&#xfeff;</strong><span>b</span><em>c</em></div>"#,
        Filters::new()
            .with_remove_node(is_tag("em"))
            .with_unwrap_node(is_tag("div"))
            .with_remove_attribute(attribute_prefix("data-rich-text-"))
            .with_filter_string(strip_padding),
    );

    assert_eq!(value.text_string(), "ab");
    assert_eq!(types(&value), vec![vec!["strong"], vec!["span"]]);
    assert!(value.stack_at(0)[0].attributes.is_empty());
}

#[test]
#[should_panic(expected = "filter failed")]
fn filter_panics_propagate() {
    build_filtered(
        "test",
        Filters::new().with_filter_string(|_: &str| -> String { panic!("filter failed") }),
    );
}
