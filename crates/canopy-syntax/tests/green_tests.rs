use canopy_common::limits::LOTS_OF_CHILDREN_THRESHOLD;

use crate::green::{GreenListBuilder, GreenNode, NodeFlags};
use crate::kind::SyntaxKind;
use crate::testkit::kinds::*;
use crate::testkit::{identifier, identifier_name, number, parse_green, punctuation, whitespace};

fn spaced(kind: SyntaxKind, text: &str) -> GreenNode {
    GreenNode::token(kind, text, Some(whitespace("  ")), Some(whitespace(" ")))
}

#[test]
fn test_token_widths_split_trivia_from_text() {
    let token = spaced(IDENTIFIER_TOKEN, "abc");
    assert_eq!(token.full_width(), 6);
    assert_eq!(token.width(), 3);
    assert_eq!(token.leading_trivia_width(), 2);
    assert_eq!(token.trailing_trivia_width(), 1);
    assert_eq!(token.to_full_string(), "  abc ");
}

#[test]
fn test_node_full_width_is_sum_of_slots() {
    let left = number("1");
    let plus = spaced(PLUS_TOKEN, "+");
    let right = number("22");
    let binary = GreenNode::node(BINARY_EXPRESSION, [Some(left), Some(plus), None, Some(right)]);
    assert_eq!(binary.slot_count(), 4);
    assert!(binary.slot(2).is_none());
    assert_eq!(binary.full_width(), 1 + 4 + 2);
    assert_eq!(binary.children().count(), 3);
    assert_eq!(binary.to_full_string(), "1  + 22");
}

#[test]
fn test_list_of_five_elements() {
    let tokens: Vec<GreenNode> = (0..5).map(|i| identifier(&format!("a{i}"))).collect();
    let list = GreenNode::list(tokens).expect("five elements make a list");
    assert!(list.is_list());
    assert_eq!(list.kind(), SyntaxKind::LIST);
    assert_eq!(list.slot_count(), 5);
    assert_eq!(list.slot(4).map(GreenNode::token_text), Some("a4"));
    assert_eq!(list.full_width(), 10);
    assert_eq!(list.slot_offset(3), 6);
}

#[test]
fn test_list_elides_single_element_and_empty() {
    let only = identifier("x");
    let list = GreenNode::list([only.clone()]).expect("one element");
    assert!(GreenNode::ptr_eq(&list, &only));
    assert!(GreenNode::list(Vec::new()).is_none());
}

#[test]
fn test_long_list_offsets_and_slot_search() {
    let count = LOTS_OF_CHILDREN_THRESHOLD + 2;
    let tokens: Vec<GreenNode> = (0..count).map(|_| identifier("ab")).collect();
    let list = GreenNode::list(tokens).expect("list");
    assert!(list.has_offset_table());
    assert_eq!(list.slot_offset(5), 10);
    assert_eq!(list.slot_offset(count), list.full_width());
    assert_eq!(list.find_slot_index_containing_offset(11), 5);
    assert_eq!(list.find_slot_index_containing_offset(0), 0);
}

#[test]
fn test_short_list_slot_search_scans() {
    let list = GreenNode::list([identifier("a"), identifier("bcd"), identifier("e")]).expect("list");
    assert!(!list.has_offset_table());
    assert_eq!(list.find_slot_index_containing_offset(0), 0);
    assert_eq!(list.find_slot_index_containing_offset(1), 1);
    assert_eq!(list.find_slot_index_containing_offset(3), 1);
    assert_eq!(list.find_slot_index_containing_offset(4), 2);
}

#[test]
fn test_builder_flattens_nested_lists() {
    let inner = GreenNode::list([identifier("a"), identifier("b")]).expect("list");
    let mut builder = GreenListBuilder::new();
    builder.add(&inner).add(&identifier("c")).add_option(None);
    assert_eq!(builder.len(), 3);
    let list = builder.into_list().expect("list");
    assert_eq!(list.slot_count(), 3);
    assert!(list.children().all(|child| !child.is_list()));
    assert_eq!(list.to_full_string(), "abc");
}

#[test]
fn test_list_concat() {
    let left = GreenNode::list([identifier("a"), identifier("b")]).expect("list");
    let right = identifier("c");
    let joined = GreenNode::list_concat(Some(&left), Some(&right)).expect("list");
    assert_eq!(joined.slot_count(), 3);
    assert!(GreenNode::ptr_eq(
        &GreenNode::list_concat(None, Some(&right)).expect("element"),
        &right
    ));
    assert!(GreenNode::list_concat(None, None).is_none());
}

#[test]
fn test_missing_flags() {
    let missing = GreenNode::missing_token(SEMICOLON_TOKEN);
    assert!(missing.is_missing());
    assert_eq!(missing.full_width(), 0);

    let all_missing = GreenNode::node(EMPTY_STATEMENT, [Some(missing)]);
    assert!(all_missing.is_missing());

    let present = GreenNode::node(EMPTY_STATEMENT, [Some(punctuation(SEMICOLON_TOKEN))]);
    assert!(!present.is_missing());
    assert!(present.flags().contains(NodeFlags::IS_NOT_MISSING));
}

#[test]
fn test_terminals() {
    let root = parse_green("int x = 1;");
    assert_eq!(root.first_terminal().map(GreenNode::kind), Some(INT_KEYWORD));
    assert_eq!(root.last_terminal().map(GreenNode::kind), Some(END_OF_FILE_TOKEN));
}

#[test]
fn test_trivia_queries() {
    let token = spaced(IDENTIFIER_TOKEN, "x");
    let leading = token.leading_trivia().expect("leading");
    assert!(leading.is_trivia());
    assert_eq!(leading.token_text(), "  ");
    assert!(!token.is_trivia());

    let bare = token.with_leading_trivia(None).with_trailing_trivia(None);
    assert_eq!(bare.full_width(), 1);
    assert!(bare.leading_trivia().is_none());
}

#[test]
fn test_with_slots_keeps_kind_and_annotations() {
    let annotation = crate::SyntaxAnnotation::new();
    let node = identifier_name("a").with_additional_annotations([annotation.clone()]);
    let replaced = node.with_slots([Some(identifier("b"))]);
    assert_eq!(replaced.kind(), IDENTIFIER_NAME);
    assert_eq!(replaced.to_full_string(), "b");
    assert!(replaced.has_annotation(&annotation));
}

#[test]
fn test_parse_round_trips_text() {
    let text = "int x = 1; // one\n#region r\nint f(int a, int b) { return a + b; }\n#endregion\n";
    assert_eq!(parse_green(text).to_full_string(), text);
}

#[test]
#[should_panic(expected = "lists are built with GreenNode::list")]
fn test_node_rejects_list_kind() {
    let _ = GreenNode::node(SyntaxKind::LIST, [Some(identifier("a"))]);
}
