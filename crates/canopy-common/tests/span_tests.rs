use crate::span::*;

#[test]
fn test_span_bounds_and_containment() {
    let span = TextSpan::from_bounds(4, 10);
    assert_eq!(span.length, 6);
    assert_eq!(span.end(), 10);
    assert!(span.contains(4));
    assert!(span.contains(9));
    assert!(!span.contains(10));
    assert!(span.contains_span(TextSpan::new(5, 5)));
    assert!(!span.contains_span(TextSpan::new(5, 6)));
}

#[test]
fn test_overlap_excludes_touching_spans() {
    let a = TextSpan::new(0, 5);
    let b = TextSpan::new(5, 3);
    assert!(!a.overlaps_with(b));
    assert!(a.intersects_with(b));
    assert_eq!(a.intersection(b), Some(TextSpan::empty(5)));
    assert_eq!(a.intersection(TextSpan::new(7, 1)), None);
    assert_eq!(a.cover(TextSpan::new(7, 1)), TextSpan::from_bounds(0, 8));
}

#[test]
fn test_empty_span_never_overlaps() {
    let empty = TextSpan::empty(3);
    assert!(!empty.overlaps_with(TextSpan::new(0, 10)));
    assert!(empty.intersects_with(TextSpan::new(0, 10)));
}

#[test]
#[should_panic(expected = "precedes start")]
fn test_inverted_bounds_panic() {
    let _ = TextSpan::from_bounds(5, 4);
}

#[test]
fn test_apply_text_changes_in_order() {
    let text = "int x = 1;";
    let changes = vec![
        TextChange::new(TextSpan::new(0, 3), "long"),
        TextChange::new(TextSpan::new(8, 1), "42"),
    ];
    assert_eq!(apply_text_changes(text, &changes), "long x = 42;");
}

#[test]
fn test_apply_pure_insert_and_delete() {
    let text = "abc";
    let changes = vec![
        TextChange::new(TextSpan::empty(0), ">"),
        TextChange::new(TextSpan::new(1, 1), ""),
        TextChange::new(TextSpan::empty(3), "<"),
    ];
    assert_eq!(apply_text_changes(text, &changes), ">ac<");
}

#[test]
#[should_panic(expected = "overlaps or precedes")]
fn test_apply_overlapping_changes_panics() {
    let changes = vec![
        TextChange::new(TextSpan::new(0, 3), ""),
        TextChange::new(TextSpan::new(2, 1), ""),
    ];
    let _ = apply_text_changes("abcdef", &changes);
}

#[test]
fn test_change_range_from_change() {
    let change = TextChange::new(TextSpan::new(2, 4), "xy");
    assert_eq!(change.range(), TextChangeRange::new(TextSpan::new(2, 4), 2));
    assert!(!change.range().is_no_change());
    assert!(TextChangeRange::new(TextSpan::empty(9), 0).is_no_change());
}
