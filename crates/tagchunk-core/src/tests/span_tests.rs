//! Tests for [`LineCol`] and [`Span`].

use rstest::rstest;

use crate::{LineCol, Span};

fn span(start: usize, end: usize) -> Span {
    Span::new(start, end, LineCol::new(0, 0), LineCol::new(0, 0))
}

#[test]
fn linecol_construction_and_accessors() {
    let pos = LineCol::new(5, 10);
    assert_eq!(pos.line(), 5);
    assert_eq!(pos.column(), 10);
    assert_eq!(pos.display_line(), 6);
}

#[test]
fn span_construction_and_accessors() {
    let span = Span::new(10, 42, LineCol::new(2, 0), LineCol::new(4, 0));
    assert_eq!(span.start_byte(), 10);
    assert_eq!(span.end_byte(), 42);
    assert_eq!(span.start().line(), 2);
    assert_eq!(span.end().line(), 4);
    assert_eq!(span.byte_range(), 10..42);
    assert_eq!(span.len(), 32);
}

#[test]
fn span_serde_round_trip() {
    let span = Span::new(0, 100, LineCol::new(0, 0), LineCol::new(5, 20));
    let json = serde_json::to_string(&span).expect("serialize");
    let deserialized: Span = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(deserialized, span);
}

#[test]
fn span_json_contains_expected_fields() {
    let span = Span::new(12, 42, LineCol::new(2, 0), LineCol::new(4, 0));
    let json = serde_json::to_string(&span).expect("serialize");
    assert!(json.contains("\"start_byte\":12"));
    assert!(json.contains("\"end_byte\":42"));
}

#[test]
fn empty_and_inverted_spans_are_detected() {
    assert!(span(4, 4).is_empty());
    assert!(!span(4, 4).is_inverted());
    assert!(span(9, 3).is_inverted());
    assert_eq!(span(9, 3).len(), 0);
}

#[rstest]
#[case::nested(span(0, 10), span(2, 8), true, true)]
#[case::shared_start(span(0, 10), span(0, 4), true, true)]
#[case::identical(span(0, 10), span(0, 10), true, false)]
#[case::crossing(span(0, 10), span(5, 15), false, false)]
#[case::disjoint(span(0, 10), span(10, 20), false, false)]
fn containment(
    #[case] outer: Span,
    #[case] inner: Span,
    #[case] contains: bool,
    #[case] strictly: bool,
) {
    assert_eq!(outer.contains(&inner), contains);
    assert_eq!(outer.strictly_contains(&inner), strictly);
}

#[test]
fn adjacent_spans_do_not_overlap() {
    assert!(!span(0, 10).overlaps(&span(10, 20)));
    assert!(span(0, 10).overlaps(&span(9, 20)));
    assert!(span(0, 10).same_bytes(&span(0, 10)));
}
