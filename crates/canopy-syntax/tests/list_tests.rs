use canopy_common::TextSpan;

use crate::error::EditError;
use crate::green::GreenNode;
use crate::lists::{ChildSyntaxList, SyntaxListBuilder, SyntaxNodeList, SyntaxTokenList, SyntaxTriviaList};
use crate::red::{SyntaxNode, SyntaxNodeOrToken};
use crate::testkit::kinds::*;
use crate::testkit::{identifier, identifier_name, line_comment, parse, parse_member, punctuation, whitespace};

fn find(root: &SyntaxNode, kind: crate::SyntaxKind) -> SyntaxNode {
    root.descendant_nodes_and_self()
        .find(|node| node.kind() == kind)
        .expect("node of kind")
}

fn statement(name: &str) -> GreenNode {
    GreenNode::node(
        EXPRESSION_STATEMENT,
        [Some(identifier_name(name)), Some(punctuation(SEMICOLON_TOKEN))],
    )
}

// =============================================================================
// ChildSyntaxList
// =============================================================================

#[test]
fn test_child_list_flattens_list_slots() {
    let function = parse_member("int f(int a, int b) { }");
    let parameters = find(&function, PARAMETER_LIST);
    let children = parameters.children_with_tokens();
    assert_eq!(children.len(), 5);
    let kinds: Vec<_> = children.iter().map(|child| child.kind()).collect();
    assert_eq!(
        kinds,
        vec![OPEN_PAREN_TOKEN, PARAMETER, COMMA_TOKEN, PARAMETER, CLOSE_PAREN_TOKEN]
    );
    let positions: Vec<_> = children.iter().map(|child| child.position()).collect();
    assert_eq!(positions, vec![5, 6, 11, 13, 18]);
}

#[test]
fn test_child_list_reverse_iteration_matches_forward() {
    let function = parse_member("int f(int a, int b) { }");
    let children = find(&function, PARAMETER_LIST).children_with_tokens();
    let forward: Vec<SyntaxNodeOrToken> = children.iter().collect();
    let mut backward: Vec<SyntaxNodeOrToken> = children.reversed().collect();
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn test_seek_walks_by_occupancy() {
    let function = parse_member("int f(int a, int b) { }");
    let children = ChildSyntaxList::new(find(&function, PARAMETER_LIST));

    let third = children.seek(3, children.start_cursor());
    assert_eq!(third.slot_index, 1);
    assert_eq!(third.preceding_occupancy, 1);
    assert_eq!(third.position_at_slot, 6);

    let last = children.seek(4, third);
    assert_eq!(last.slot_index, 2);
    assert_eq!(last.preceding_occupancy, 4);
    assert_eq!(last.position_at_slot, 18);

    let first = children.seek(0, children.end_cursor());
    assert_eq!(first, children.start_cursor());
}

#[test]
fn test_empty_slots_have_no_occupancy() {
    let function = parse_member("int f() { }");
    let children = find(&function, PARAMETER_LIST).children_with_tokens();
    assert_eq!(children.len(), 2);
    assert_eq!(children.get(1).map(|c| c.kind()), Some(CLOSE_PAREN_TOKEN));
    assert!(children.get(2).is_none());
}

#[test]
fn test_child_lookup_by_position_and_identity() {
    let function = parse_member("int f(int a, int b) { }");
    let parameters = find(&function, PARAMETER_LIST);
    let children = parameters.children_with_tokens();
    assert_eq!(children.child_that_contains_position(12).map(|c| c.kind()), Some(COMMA_TOKEN));
    assert_eq!(parameters.child_that_contains_position(13).kind(), PARAMETER);

    let second = children.get(3).expect("second parameter");
    assert_eq!(children.index_of(&second), Some(3));
    let node = second.as_node().expect("node").clone();
    let first = node.previous_sibling().expect("previous parameter");
    assert_eq!(first.position(), 6);
    assert!(SyntaxNode::ptr_eq(&first.next_sibling().expect("next"), &node));
    assert!(node.next_sibling().is_none());
}

// =============================================================================
// Homogeneous lists
// =============================================================================

#[test]
fn test_node_list_views_three_shapes() {
    let many = find(&parse_member("int f() { a; b; c; }"), BLOCK).node_list(1);
    assert_eq!(many.len(), 3);
    assert_eq!(many.to_full_string(), "a; b; c; ");
    assert_eq!(many.get(2).map(|n| n.position()), Some(16));

    let single = find(&parse_member("int f() { a; }"), BLOCK).node_list(1);
    assert_eq!(single.len(), 1);
    let only = single.first().expect("statement");
    assert_eq!(only.kind(), EXPRESSION_STATEMENT);
    assert_eq!(single.index_of(&only), Some(0));

    let empty = find(&parse_member("int f() { }"), BLOCK).node_list(1);
    assert!(empty.is_empty());
    assert!(empty.first().is_none());
    assert_eq!(empty.add(statement("x")).len(), 1);
}

#[test]
fn test_node_list_edits_are_detached() {
    let list = find(&parse_member("int f() { a; b; c; }"), BLOCK).node_list(1);

    let inserted = list.insert(1, statement("x"));
    assert_eq!(inserted.len(), 4);
    assert_eq!(inserted.to_full_string(), "a; x;b; c; ");
    assert_eq!(list.len(), 3);

    let middle = list.get(1).expect("b");
    let removed = list.remove(&middle).expect("remove");
    assert_eq!(removed.to_full_string(), "a; c; ");

    let replaced = list.replace(&middle, statement("y")).expect("replace");
    assert_eq!(replaced.to_full_string(), "a; y;c; ");

    let spread = list
        .replace_range(&middle, vec![statement("p"), statement("q")])
        .expect("replace range");
    assert_eq!(spread.len(), 4);

    assert_eq!(list.index_of_kind(EXPRESSION_STATEMENT), Some(0));
    assert!(list.any(EXPRESSION_STATEMENT));
}

#[test]
fn test_node_list_rejects_foreign_nodes() {
    let list = find(&parse_member("int f() { a; b; }"), BLOCK).node_list(1);
    let other = find(&parse_member("int g() { a; b; }"), BLOCK).node_list(1);
    let foreign = other.get(0).expect("statement");
    match list.remove(&foreign) {
        Err(EditError::MissingListItem { kind, .. }) => assert_eq!(kind, EXPRESSION_STATEMENT),
        other => panic!("expected MissingListItem, got {other:?}"),
    }
}

#[test]
fn test_node_list_from_greens() {
    let list = SyntaxNodeList::from_greens(&[statement("a"), statement("b")]);
    assert_eq!(list.len(), 2);
    assert_eq!(list.full_span(), TextSpan::new(0, 4));
    assert_eq!(list.last().map(|n| n.position()), Some(2));
}

#[test]
fn test_token_list_edits() {
    let tokens = [identifier("a"), identifier("bb"), identifier("c")];
    let list = SyntaxTokenList::from_greens(&tokens);
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(2).map(|t| t.position()), Some(3));
    assert!(list.any(IDENTIFIER_TOKEN));

    let second = list.get(1).expect("bb");
    assert_eq!(list.index_of(&second), Some(1));
    let replaced = list.replace(&second, identifier("zz")).expect("replace");
    assert_eq!(replaced.to_full_string(), "azzc");
    assert_eq!(list.remove_at(0).to_full_string(), "bbc");
    assert_eq!(list.add(identifier("d")).len(), 4);
}

#[test]
fn test_trivia_list_edits() {
    let tree = parse("int x = 1;");
    let x = tree.root().find_token(4, false).expect("x");
    let trailing = x.trailing_trivia();
    assert_eq!(trailing.len(), 1);
    assert_eq!(trailing.full_span(), TextSpan::new(5, 1));

    let added = trailing.add(GreenNode::trivia(BLOCK_COMMENT_TRIVIA, "/* c */"));
    assert_eq!(added.to_full_string(), " /* c */");

    let space = trailing.first().expect("whitespace");
    assert_eq!(trailing.index_of(&space), Some(0));
    let replaced = trailing.replace(&space, whitespace("   ")).expect("replace");
    assert_eq!(replaced.to_full_string(), "   ");

    let detached = SyntaxTriviaList::from_greens(&[whitespace(" "), line_comment("// a")]);
    assert_eq!(detached.len(), 2);
    assert!(detached.remove(&space).is_err());
}

// =============================================================================
// Builders
// =============================================================================

#[test]
fn test_list_builder_flattens() {
    let mut builder = SyntaxListBuilder::with_capacity(4);
    builder.add(&statement("a"));
    let pair = GreenNode::list([statement("b"), statement("c")]).expect("list");
    builder.add(&pair);
    assert_eq!(builder.len(), 3);
    let list = builder.to_node_list();
    assert_eq!(list.to_full_string(), "a;b;c;");
    assert_eq!(builder.remove_last().map(|n| n.to_full_string()), Some("c;".to_string()));
    assert_eq!(builder.to_green().map(|g| g.slot_count()), Some(2));
    builder.clear();
    assert!(builder.is_empty());
    assert!(builder.to_green().is_none());
}
