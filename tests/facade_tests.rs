//! End-to-end checks through the `canopy` facade.

use canopy::tracing_config::{LogFormat, init_tracing};
use canopy::{NodeTracker, SyntaxNode, TextSpan, apply_text_changes, text_changes};
use canopy_syntax::testkit::kinds::{IDENTIFIER_TOKEN, LITERAL_EXPRESSION};
use canopy_syntax::testkit::{number, parse, whitespace};

fn literal_at(root: &SyntaxNode, position: u32) -> SyntaxNode {
    root.descendant_nodes()
        .find(|node| node.kind() == LITERAL_EXPRESSION && node.position() == position)
        .expect("literal")
}

#[test]
fn test_log_format_names() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("anything else"), LogFormat::Text);
}

#[test]
fn test_init_tracing_twice_is_harmless() {
    init_tracing();
    init_tracing();
}

#[test]
fn test_edit_track_and_diff() {
    let before = parse("int x = 1;\nint y = x + 2;\n");
    let two = literal_at(before.root(), 23);
    let tracker = NodeTracker::new();
    let tracked = tracker.track_node(before.root(), &two).expect("track");

    let x = tracked.find_token(4, false).expect("x");
    assert_eq!(x.kind(), IDENTIFIER_TOKEN);
    let renamed = canopy::GreenNode::token(IDENTIFIER_TOKEN, "count", None, Some(whitespace(" ")));
    let step = tracked.replace_token(&x, renamed).expect("rename");
    let current = tracker.current_node(&step, &two).expect("tracked literal");
    assert_eq!(current.position(), 27);

    let edited = step.replace_node(&current, number("5")).expect("replace");
    let after = before.with_root(edited);
    assert_eq!(after.text(), "int count = 1;\nint y = x + 5;\n");

    let changes = text_changes(Some(&before), Some(&after));
    assert_eq!(apply_text_changes(&before.text(), &changes), after.text());
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].span, TextSpan::new(4, 1));
    assert_eq!(changes[0].new_text, "count");
    assert_eq!(changes[1].span, TextSpan::new(23, 1));
    assert_eq!(changes[1].new_text, "5");
}
