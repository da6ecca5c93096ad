//! Selection boundaries resolved during the build walk.

use rich_value::filters::strip_padding;
use rich_value::{create_value, Boundary, Builder, Filters, HtmlFragment, MarkupNode, Selection};
use markup5ever_rcdom::Handle;

fn at(fragment: &HtmlFragment, path: &[usize], offset: usize) -> Boundary<Handle> {
    Boundary::new(fragment.node_at_path(path).expect("node"), offset)
}

fn select(html: &str, start: (&[usize], usize), end: (&[usize], usize)) -> (Option<usize>, Option<usize>) {
    let fragment = HtmlFragment::parse(html);
    let selection = Selection::new(at(&fragment, start.0, start.1), at(&fragment, end.0, end.1));
    let value = Builder::new()
        .with_selection(Some(selection))
        .build(fragment.root());
    (value.start, value.end)
}

#[test]
fn empty_tree_selects_the_root() {
    let fragment = HtmlFragment::parse("");
    let value = create_value(
        fragment.root(),
        Some(Selection::collapsed(fragment.root().clone(), 0)),
        None,
        Filters::new(),
    );

    assert!(value.is_empty());
    assert!(value.formats.is_empty());
    assert_eq!((value.start, value.end), (Some(0), Some(0)));
}

#[test]
fn text_offsets_add_to_preceding_length() {
    assert_eq!(select("te<em>st</em>", (&[0], 1), (&[1, 0], 1)), (Some(1), Some(3)));
}

#[test]
fn offsets_count_utf16_units() {
    assert_eq!(select("🍒a", (&[0], 2), (&[0], 3)), (Some(2), Some(3)));
}

#[test]
fn container_offsets_count_children() {
    // a, br, b
    assert_eq!(select("a<br>b", (&[], 1), (&[], 2)), (Some(1), Some(2)));
}

#[test]
fn container_offset_past_the_last_child_is_the_end() {
    assert_eq!(select("a<br>b", (&[], 3), (&[], 7)), (Some(3), Some(3)));
}

#[test]
fn selection_before_br() {
    assert_eq!(select("a<br>b", (&[1], 0), (&[1], 0)), (Some(1), Some(1)));
}

#[test]
fn selection_after_br() {
    assert_eq!(select("a<br>b", (&[1], 1), (&[2], 0)), (Some(2), Some(2)));
}

#[test]
fn selection_around_an_object() {
    assert_eq!(select(r#"a<img src="">b"#, (&[1], 0), (&[1], 1)), (Some(1), Some(2)));
}

#[test]
fn empty_element_resolves_at_its_position() {
    assert_eq!(select("a<em></em>b", (&[1], 0), (&[1], 0)), (Some(1), Some(1)));
}

#[test]
fn boundary_in_a_comment_collapses_to_its_position() {
    assert_eq!(select("ab<!--x-->c", (&[1], 0), (&[2], 1)), (Some(2), Some(3)));
}

#[test]
fn boundary_in_layout_whitespace_collapses_to_its_position() {
    assert_eq!(
        select("<em>a</em>\n<em>b</em>", (&[1], 1), (&[2, 0], 1)),
        (Some(1), Some(2))
    );
}

#[test]
fn source_newlines_do_not_count() {
    assert_eq!(select("a\nb", (&[0], 2), (&[0], 3)), (Some(1), Some(2)));
}

#[test]
fn backward_selection_keeps_its_order() {
    assert_eq!(select("test", (&[0], 3), (&[0], 1)), (Some(3), Some(1)));
}

#[test]
fn selection_with_an_end_outside_the_tree_is_dropped() {
    let fragment = HtmlFragment::parse("<em>ab</em>");
    let other = HtmlFragment::parse("elsewhere");
    let inside = || Boundary::new(fragment.node_at_path(&[0, 0]).expect("text"), 1);
    let outside = || Boundary::new(other.node_at_path(&[0]).expect("text"), 1);

    for selection in [
        Selection::new(inside(), outside()),
        Selection::new(outside(), inside()),
    ] {
        let value = Builder::new()
            .with_selection(Some(selection))
            .build(fragment.root());
        assert_eq!(value.text_string(), "ab");
        assert_eq!((value.start, value.end), (None, None));
    }
}

#[test]
fn filtered_characters_collapse_to_the_nearest_kept_position() {
    let fragment = HtmlFragment::parse("\u{feff}ab");
    let text = fragment.node_at_path(&[0]).expect("text");
    let selection = Selection::new(Boundary::new(text.clone(), 1), Boundary::new(text, 2));

    let value = Builder::new()
        .with_filters(Filters::new().with_filter_string(strip_padding))
        .with_selection(Some(selection))
        .build(fragment.root());

    assert_eq!(value.text_string(), "ab");
    assert_eq!((value.start, value.end), (Some(0), Some(1)));
}

#[test]
fn boundary_inside_a_removed_subtree_collapses_to_its_position() {
    let fragment = HtmlFragment::parse("a<script>x()</script>b");
    let script_text = fragment.node_at_path(&[1, 0]).expect("script text");
    let selection = Selection::collapsed(script_text, 2);

    let filters = Filters::new()
        .with_remove_node(|node: &Handle| node.tag_name().as_deref() == Some("script"));
    let value = Builder::new()
        .with_filters(filters)
        .with_selection(Some(selection))
        .build(fragment.root());

    assert_eq!(value.text_string(), "ab");
    assert_eq!((value.start, value.end), (Some(1), Some(1)));
}

#[test]
fn boundary_inside_an_unwrapped_element_counts_its_children() {
    let fragment = HtmlFragment::parse("a<span>bc</span>d");
    let span = fragment.node_at_path(&[1]).expect("span");
    let selection = Selection::new(Boundary::new(span.clone(), 0), Boundary::new(span, 1));

    let filters =
        Filters::new().with_unwrap_node(|node: &Handle| node.tag_name().as_deref() == Some("span"));
    let value = Builder::new()
        .with_filters(filters)
        .with_selection(Some(selection))
        .build(fragment.root());

    assert_eq!(value.text_string(), "abcd");
    assert!(value.formats.iter().all(Vec::is_empty));
    assert_eq!((value.start, value.end), (Some(1), Some(3)));
}
