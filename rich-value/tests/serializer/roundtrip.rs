//! build → serialize → build preserves text and structure.

use crate::common::build_lines;
use proptest::prelude::*;
use rich_value::{to_markup, wire, Value};
use rstest::rstest;

fn assert_round_trip(html: &str, line_tag: Option<&str>) -> String {
    let first = build_lines(html, line_tag);
    let markup = to_markup(&first, line_tag).unwrap();
    let second = build_lines(&markup, line_tag);

    assert_eq!(first.text, second.text, "text changed for {html}");
    assert!(
        first.structurally_eq(&second),
        "formats changed for {html}: {markup}"
    );
    markup
}

#[rstest]
#[case::plain("test")]
#[case::trailing_plain("<strong>a</strong>b")]
#[case::formatting("<em>test</em>")]
#[case::nested("<em>te<strong>st</strong></em>")]
#[case::split("<em>te</em><em>st</em>")]
#[case::attributes(r##"<a href="#" target="_blank">test</a>"##)]
#[case::object(r#"te<img src="x.png">st"#)]
#[case::object_in_formatting(r#"<em>a<img src="x.png">b</em>"#)]
#[case::br("a<br>b")]
#[case::double_br("a<br><br>b")]
#[case::br_in_formatting("<em>te<br>st</em>")]
#[case::emoji("<em>🍒</em>")]
#[case::nbsp("test&nbsp; test")]
fn canonical_markup_is_reproduced(#[case] html: &str) {
    assert_eq!(assert_round_trip(html, None), html);
}

#[rstest]
#[case::paragraphs("<p>one</p><p>t<em>w</em>o</p>", Some("p"))]
#[case::empty_line("<p></p>", Some("p"))]
#[case::nested_list("<li>one<ul><li>two</li></ul></li><li>three</li>", Some("li"))]
#[case::formatted_breaks("<p><em>a<br><br>b</em></p><p>c</p>", Some("p"))]
#[case::plain_lines("<p><em>a</em></p><p>b</p>", Some("p"))]
#[case::deep_list("<li>a<ul><li>b<ol><li>c</li></ol></li></ul></li>", Some("li"))]
fn canonical_multiline_markup_is_reproduced(#[case] html: &str, #[case] line_tag: Option<&str>) {
    assert_eq!(assert_round_trip(html, line_tag), html);
}

#[test]
fn overlapping_markup_settles_after_one_pass() {
    let markup = assert_round_trip("<strong>a<em>b</strong>c</em>", None);
    assert_eq!(markup, "<strong>a<em>b</em></strong><em>c</em>");
}

#[test]
fn wire_form_survives_a_round_trip() {
    let value = build_lines("<em>te<strong>st</strong></em><img src=\"\">", None).with_selection(1, 3);
    let json = wire::to_json(&value, false).unwrap();
    let loaded = wire::from_json(&json).unwrap();

    assert!(value.structurally_eq(&loaded));
    assert_eq!((loaded.start, loaded.end), (Some(1), Some(3)));
    assert_eq!(to_markup(&loaded, None), to_markup(&value, None));
}

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Break,
    Image,
}

fn piece_strategy() -> impl Strategy<Value = Piece> {
    prop_oneof![
        4 => "[a-z ]{1,5}".prop_map(Piece::Text),
        1 => Just(Piece::Break),
        1 => Just(Piece::Image),
    ]
}

/// Runs of content, each wrapped in an ordered subset of em/strong/code.
fn markup_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((piece_strategy(), 0u8..8), 0..8).prop_map(
        |runs| {
            let tags = ["em", "strong", "code"];
            let mut html = String::new();
            for (piece, mask) in runs {
                let wrapping: Vec<&str> = tags
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| mask & (1 << bit) != 0)
                    .map(|(_, tag)| *tag)
                    .collect();
                for tag in &wrapping {
                    html.push_str(&format!("<{tag}>"));
                }
                match piece {
                    Piece::Text(text) => html.push_str(&text),
                    Piece::Break => html.push_str("<br>"),
                    Piece::Image => html.push_str(r#"<img src="x.png">"#),
                }
                for tag in wrapping.iter().rev() {
                    html.push_str(&format!("</{tag}>"));
                }
            }
            html
        },
    )
}

proptest! {
    #[test]
    fn build_serialize_build_preserves_structure(html in markup_strategy()) {
        let first = build_lines(&html, None);
        prop_assert_eq!(first.formats.len(), first.text.len());

        let markup = to_markup(&first, None).unwrap();
        let second = build_lines(&markup, None);
        prop_assert_eq!(&first.text, &second.text);
        prop_assert!(first.structurally_eq(&second), "{} -> {}", html, markup);

        // Serializing the rebuilt value changes nothing any more.
        prop_assert_eq!(to_markup(&second, None).unwrap(), markup);
    }

    #[test]
    fn slices_concatenate_back(html in markup_strategy(), cut in 0usize..40) {
        let value = build_lines(&html, None);
        let cut = cut.min(value.len());
        let joined = Value::concat([&value.slice(0, cut), &value.slice(cut, value.len())]);

        prop_assert_eq!(&joined.text, &value.text);
        prop_assert!(joined.check_shape().is_ok());
    }
}
