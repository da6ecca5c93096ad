//! Line splitting and nested list flattening.

use crate::common::{build_lines, types};
use markup5ever_rcdom::Handle;
use rich_value::{Boundary, Builder, HtmlFragment, Selection};
use rstest::rstest;

#[rstest]
#[case::single_line("<p>one</p>", "one")]
#[case::two_lines("<p>one</p><p>two</p>", "one\n\ntwo")]
#[case::empty_lines("<p></p><p></p>", "\n\n")]
#[case::skips_other_children("<p>a</p><div>x</div>y<p>b</p>", "a\n\nb")]
#[case::layout_between_lines("<p>a</p>\n  <p>b</p>", "a\n\nb")]
#[case::nothing_matches("<div>x</div>", "")]
fn joins_lines_with_a_paragraph_separator(#[case] html: &str, #[case] text: &str) {
    let value = build_lines(html, Some("p"));
    assert_eq!(value.text_string(), text);
    assert_eq!(value.formats.len(), value.text.len());
}

#[test]
fn line_containers_open_no_descriptor() {
    let value = build_lines("<p>a<em>b</em></p><p>c</p>", Some("p"));

    assert_eq!(
        types(&value),
        vec![vec![], vec!["em"], vec![], vec![], vec![]]
    );
}

#[test]
fn nested_list_is_flattened_into_its_line() {
    let value = build_lines("<li>one<ul><li>two</li></ul></li><li>three</li>", Some("li"));

    assert_eq!(value.text_string(), "onetwo\n\nthree");
    let mut expected = vec![Vec::<&str>::new(); 3];
    expected.extend(vec![vec!["ul"]; 3]);
    expected.extend(vec![vec![]; 7]);
    assert_eq!(types(&value), expected);

    let list = value.formats[3][0];
    assert!(value.formats[3..6].iter().all(|slot| slot == &vec![list]));
}

#[test]
fn nested_list_items_share_the_list_descriptor() {
    let value = build_lines(
        r#"<li>a<ol start="2"><li>b</li><li><em>c</em></li></ol></li>"#,
        Some("li"),
    );

    assert_eq!(value.text_string(), "abc");
    assert_eq!(value.formats[1][0], value.formats[2][0]);
    assert_eq!(value.stack_at(2)[0].attributes.get("start"), Some("2"));
    assert_eq!(types(&value)[2], vec!["ol", "em"]);
}

#[test]
fn deeper_lists_add_one_descriptor_per_level() {
    let value = build_lines(
        "<li>a<ul><li>b<ol><li>c</li></ol></li></ul></li>",
        Some("li"),
    );

    assert_eq!(value.text_string(), "abc");
    assert_eq!(types(&value), vec![vec![], vec!["ul"], vec!["ul", "ol"]]);
    assert_eq!(value.formats[1][0], value.formats[2][0]);
}

#[test]
fn lists_are_plain_formats_outside_list_lines() {
    let value = build_lines("<p>a<ul><li>b</li></ul></p>", None);

    assert!(types(&value).iter().any(|slot| slot.contains(&"li".to_string())));
}

fn multiline_selection(
    html: &str,
    start: (&[usize], usize),
    end: (&[usize], usize),
) -> (Option<usize>, Option<usize>) {
    let fragment = HtmlFragment::parse(html);
    let node = |path: &[usize]| -> Handle { fragment.node_at_path(path).expect("node") };
    let selection = Selection::new(
        Boundary::new(node(start.0), start.1),
        Boundary::new(node(end.0), end.1),
    );
    let value = Builder::new()
        .with_line_tag(Some("p"))
        .with_selection(Some(selection))
        .build(fragment.root());
    (value.start, value.end)
}

#[test]
fn root_boundary_between_lines_resolves_before_the_separator() {
    assert_eq!(
        multiline_selection("<p>one</p><p>two</p>", (&[], 1), (&[], 2)),
        (Some(3), Some(8))
    );
}

#[test]
fn start_of_a_later_line_is_after_the_separator() {
    assert_eq!(
        multiline_selection("<p>one</p><p>two</p>", (&[1, 0], 0), (&[1, 0], 3)),
        (Some(5), Some(8))
    );
}

#[test]
fn boundary_in_a_skipped_top_level_node() {
    assert_eq!(
        multiline_selection("<p>a</p><div>xyz</div><p>b</p>", (&[1, 0], 2), (&[1], 0)),
        (Some(1), Some(1))
    );
}
