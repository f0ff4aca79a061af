use canopy_common::DiagnosticInfo;

use crate::annotation::SyntaxAnnotation;
use crate::green::{GreenNode, NodeFlags};
use crate::side_table::SideTables;
use crate::testkit::kinds::*;
use crate::testkit::lexer::INVALID_CHARACTER;
use crate::testkit::{identifier, identifier_name, parse, parse_with_path};

#[test]
fn test_add_error_builds_new_node() {
    let token = identifier("x");
    let with_error = token.add_error(DiagnosticInfo::error(7, "bad name"));
    assert!(!GreenNode::ptr_eq(&token, &with_error));
    assert!(!token.contains_diagnostics());
    assert!(token.diagnostics().is_empty());
    assert!(with_error.contains_diagnostics());
    assert_eq!(with_error.diagnostics().len(), 1);
    assert_eq!(with_error.diagnostics()[0].code, 7);
    assert_eq!(with_error.to_full_string(), "x");
}

#[test]
fn test_diagnostic_flag_propagates_to_parents() {
    let token = identifier("x").add_error(DiagnosticInfo::error(7, "bad name"));
    let name = GreenNode::node(IDENTIFIER_NAME, [Some(token)]);
    assert!(name.flags().contains(NodeFlags::CONTAINS_DIAGNOSTICS));
    assert!(name.diagnostics().is_empty());
    let statement = GreenNode::node(EXPRESSION_STATEMENT, [Some(name), Some(crate::testkit::punctuation(SEMICOLON_TOKEN))]);
    assert!(statement.contains_diagnostics());
}

#[test]
fn test_plain_nodes_have_no_entry() {
    let node = identifier_name("plain");
    assert!(SideTables::global().entry(&node).is_none());
    assert!(SideTables::global().annotations(&node).is_empty());
}

#[test]
fn test_annotations_compare_by_identity() {
    let a = SyntaxAnnotation::with_data("rename", "x");
    let b = SyntaxAnnotation::with_data("rename", "x");
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert_eq!(a.kind(), Some("rename"));
    assert_eq!(a.data(), Some("x"));
    assert!(SyntaxAnnotation::elastic().is_elastic());
    assert_eq!(SyntaxAnnotation::elastic(), SyntaxAnnotation::elastic());
}

#[test]
fn test_annotation_edits() {
    let a = SyntaxAnnotation::with_kind("first");
    let b = SyntaxAnnotation::with_kind("second");
    let node = identifier_name("x");

    let annotated = node.with_additional_annotations([a.clone(), b.clone(), a.clone()]);
    assert_eq!(annotated.annotations().len(), 2);
    assert!(annotated.has_annotation(&a));
    assert!(annotated.has_annotations_of_kind("second"));
    assert_eq!(annotated.annotations_of_kind("first"), vec![a.clone()]);

    let same = annotated.with_additional_annotations([a.clone()]);
    assert!(GreenNode::ptr_eq(&same, &annotated));

    let without_a = annotated.without_annotations([&a]);
    assert!(!without_a.has_annotation(&a));
    assert!(without_a.has_annotation(&b));

    let cleared = annotated.without_annotations_of_kind("first").without_annotations_of_kind("second");
    assert!(!cleared.has_annotations());
    assert!(!cleared.contains_annotations());
}

#[test]
fn test_annotations_and_diagnostics_coexist() {
    let annotation = SyntaxAnnotation::new();
    let node = identifier("x")
        .add_error(DiagnosticInfo::error(1, "first"))
        .with_additional_annotations([annotation.clone()])
        .add_error(DiagnosticInfo::error(2, "second"));
    assert!(node.has_annotation(&annotation));
    let codes: Vec<u32> = node.diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![1, 2]);
}

#[test]
fn test_tree_diagnostics_are_positioned() {
    let tree = parse_with_path("int x = 1; @", "bad.toy");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.file, "bad.toy");
    assert_eq!(diagnostic.code, INVALID_CHARACTER);
    assert_eq!(diagnostic.start, 11);
    assert_eq!(diagnostic.length, 1);
    assert_eq!(diagnostic.message_text, "Invalid character '@'.");
}

#[test]
fn test_clean_parse_has_no_diagnostics() {
    let tree = parse("int f(int a) { return a; }");
    assert!(tree.diagnostics().is_empty());
    assert!(!tree.root().contains_diagnostics());
}

#[test]
fn test_diagnostics_sorted_by_start() {
    let tree = parse("int x = 1; @ int y = 2; $");
    let starts: Vec<u32> = tree.diagnostics().iter().map(|d| d.start).collect();
    assert_eq!(starts.len(), 2);
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
}
