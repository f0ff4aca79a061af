use crate::error::EditError;
use crate::green::GreenNode;
use crate::red::SyntaxNode;
use crate::rewrite::RemoveOptions;
use crate::testkit::kinds::*;
use crate::testkit::{parse, whitespace};
use crate::tracking::{NodeTracker, TRACKING_ANNOTATION_KIND};

fn find(root: &SyntaxNode, kind: crate::SyntaxKind) -> SyntaxNode {
    root.descendant_nodes_and_self()
        .find(|node| node.kind() == kind)
        .expect("node of kind")
}

#[test]
fn test_tracked_node_survives_rewrites() {
    let tree = parse("int x = 1 + 2;");
    let binary = find(tree.root(), BINARY_EXPRESSION);
    let tracker = NodeTracker::new();
    let tracked = tracker.track(tree.root(), std::slice::from_ref(&binary)).expect("track");
    assert_eq!(tracked.to_full_string(), "int x = 1 + 2;");
    assert!(tracker.is_tracked(&binary));

    let current = tracker.current_node(&tracked, &binary).expect("current");
    assert_eq!(current.kind(), BINARY_EXPRESSION);
    assert_eq!(current.position(), 8);
    assert!(current.green().has_annotations_of_kind(TRACKING_ANNOTATION_KIND));

    let x = tracked.find_token(4, false).expect("x");
    let renamed = GreenNode::token(IDENTIFIER_TOKEN, "value", None, Some(whitespace(" ")));
    let rewritten = tracked.replace_token(&x, renamed).expect("rename");
    let moved = tracker.current_node(&rewritten, &binary).expect("current after rename");
    assert_eq!(moved.position(), 12);
    assert_eq!(moved.to_full_string(), "1 + 2");
}

#[test]
fn test_tracking_follows_edits_inside_the_node() {
    let tree = parse("int x = 1 + 2;");
    let binary = find(tree.root(), BINARY_EXPRESSION);
    let tracker = NodeTracker::new();
    let tracked = tracker.track_node(tree.root(), &binary).expect("track");

    let literal = find(&tracked, LITERAL_EXPRESSION);
    let ten = GreenNode::token(NUMERIC_LITERAL_TOKEN, "10", None, Some(whitespace(" ")));
    let replacement = GreenNode::node(LITERAL_EXPRESSION, [Some(ten)]);
    let rewritten = tracked.replace_node(&literal, replacement).expect("replace");
    let current = tracker.current_node(&rewritten, &binary).expect("current");
    assert_eq!(current.to_full_string(), "10 + 2");
}

#[test]
fn test_foreign_nodes_cannot_be_tracked() {
    let tree = parse("int x = 1;");
    let other = parse("int x = 1;");
    let foreign = find(other.root(), LITERAL_EXPRESSION);
    let tracker = NodeTracker::new();
    match tracker.track_node(tree.root(), &foreign) {
        Err(EditError::InvalidNodeToTrack { kind, .. }) => assert_eq!(kind, LITERAL_EXPRESSION),
        other => panic!("expected InvalidNodeToTrack, got {other:?}"),
    }
    assert!(!tracker.is_tracked(&foreign));
}

#[test]
fn test_untracked_and_removed_nodes() {
    let tree = parse("int a;\nint b;\n");
    let first = tree.root().children().next().expect("a");
    let second = tree.root().children().nth(1).expect("b");
    let tracker = NodeTracker::new();
    let tracked = tracker.track_node(tree.root(), &second).expect("track");

    assert!(!tracker.is_tracked(&first));
    assert!(tracker.current_nodes(&tracked, &first).is_empty());

    let current = tracker.current_node(&tracked, &second).expect("current");
    let removed = tracked
        .remove_node(&current, RemoveOptions::KEEP_NO_TRIVIA)
        .expect("remove")
        .expect("root");
    assert_eq!(removed.to_full_string(), "int a;\n");
    assert!(tracker.current_nodes(&removed, &second).is_empty());
    assert!(tracker.current_node(&removed, &second).is_none());
}

#[test]
fn test_duplicated_node_has_several_current_versions() {
    let tree = parse("int f() { a; }");
    let statement = find(tree.root(), EXPRESSION_STATEMENT);
    let tracker = NodeTracker::new();
    let tracked = tracker.track_node(tree.root(), &statement).expect("track");
    let current = tracker.current_node(&tracked, &statement).expect("current");

    let doubled = tracked
        .insert_nodes_after(&current, vec![current.green().clone()])
        .expect("insert");
    assert_eq!(doubled.to_full_string(), "int f() { a; a; }");
    let versions = tracker.current_nodes(&doubled, &statement);
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].position(), 10);
    assert_eq!(versions[1].position(), 13);
    assert!(tracker.current_node(&doubled, &statement).is_none());
}

#[test]
fn test_tracking_again_keeps_the_marker() {
    let tree = parse("int x = 1;");
    let literal = find(tree.root(), LITERAL_EXPRESSION);
    let tracker = NodeTracker::new();
    let tracked = tracker.track_node(tree.root(), &literal).expect("track");
    let current = tracker.current_node(&tracked, &literal).expect("current");

    let again = tracker.track_node(&tracked, &current).expect("track again");
    assert!(GreenNode::ptr_eq(again.green(), tracked.green()));
    assert_eq!(current.green().annotations_of_kind(TRACKING_ANNOTATION_KIND).len(), 1);
    assert!(tracker.current_node(&again, &literal).is_some());
}

#[test]
fn test_lookups_from_inner_nodes_use_the_whole_tree() {
    let tree = parse("int f() { return 1; }");
    let literal = find(tree.root(), LITERAL_EXPRESSION);
    let tracker = NodeTracker::new();
    let tracked = tracker.track_node(tree.root(), &literal).expect("track");
    let block = find(&tracked, BLOCK);
    let current = tracker.current_node(&block, &literal).expect("current");
    assert_eq!(current.position(), 17);
}

fn region_structure(root: &SyntaxNode) -> SyntaxNode {
    root.first_token()
        .and_then(|token| token.leading_trivia().first())
        .and_then(|trivia| trivia.structure())
        .expect("directive structure")
}

#[test]
fn test_tracking_a_directive_inside_trivia() {
    let text = "#region a b\nint x;\n";
    let tree = parse(text);
    let directive = region_structure(tree.root());
    assert_eq!(directive.kind(), REGION_DIRECTIVE_TRIVIA);
    assert!(directive.is_descendant_of(tree.root()));
    assert!(SyntaxNode::ptr_eq(&directive.true_root(), tree.root()));

    let tracker = NodeTracker::new();
    let tracked = tracker.track_node(tree.root(), &directive).expect("track");
    assert_eq!(tracked.to_full_string(), text);
    assert!(tracker.is_tracked(&directive));

    let current = tracker.current_nodes(&tracked, &directive);
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].kind(), REGION_DIRECTIVE_TRIVIA);
    assert_eq!(current[0].position(), 0);
    assert!(current[0].parent_trivia().is_some());
    assert!(SyntaxNode::ptr_eq(&current[0].true_root(), &tracked));
}

#[test]
fn test_lookups_from_inside_trivia_use_the_host_tree() {
    let tree = parse("#region r\nint x = 1;\n");
    let literal = find(tree.root(), LITERAL_EXPRESSION);
    let tracker = NodeTracker::new();
    let tracked = tracker.track_node(tree.root(), &literal).expect("track");

    let inside = region_structure(&tracked);
    assert!(inside.is_descendant_of(&tracked));
    assert!(SyntaxNode::ptr_eq(&inside.true_root(), &tracked));
    let current = tracker.current_node(&inside, &literal).expect("current");
    assert_eq!(current.position(), 18);
    assert_eq!(current.to_full_string(), "1");
}
