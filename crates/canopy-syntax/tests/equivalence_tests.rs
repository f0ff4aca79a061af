use crate::equivalence::{are_equivalent, are_equivalent_nodes};
use crate::kind::SyntaxKind;
use crate::testkit::kinds::*;
use crate::testkit::{parse, parse_green};

fn equivalent(a: &str, b: &str) -> bool {
    are_equivalent(&parse_green(a), &parse_green(b), None)
}

#[test]
fn test_trivia_is_ignored() {
    assert!(equivalent("int x = 1;", "int   x=1;  // note\n"));
    assert!(equivalent("int f() { }", "/* header */\nint f()\n{\n}\n"));
}

#[test]
fn test_token_text_matters() {
    assert!(!equivalent("int x = 1;", "int x = 2;"));
    assert!(!equivalent("int x = 1;", "int y = 1;"));
    assert!(!equivalent("int x = a + b;", "int x = a - b;"));
}

#[test]
fn test_missing_tokens_differ_from_present_ones() {
    assert!(!equivalent("int x = 1", "int x = 1;"));
    assert!(equivalent("int x = 1", "int x =  1"));
}

#[test]
fn test_slot_shape_matters() {
    assert!(!equivalent("int f() { return; }", "int f() { return 1; }"));
    assert!(!equivalent("int x;", "int x = 1;"));
    assert!(!equivalent("int x;", "int x; int y;"));
}

#[test]
fn test_ignored_child_kinds_are_skipped() {
    let before = parse_green("int f(int a) { return a; }");
    let after = parse_green("int f(int a) { return a + 1; }");
    assert!(!are_equivalent(&before, &after, None));

    let bodies = |kind: SyntaxKind| kind == BLOCK;
    assert!(are_equivalent(&before, &after, Some(&bodies)));

    let renamed = parse_green("int f(int b) { return a; }");
    assert!(!are_equivalent(&before, &renamed, Some(&bodies)));
}

#[test]
fn test_ignored_kinds_inside_lists() {
    let before = parse_green("int f() { a; b; }");
    let after = parse_green("int f() { a; int x; b; }");
    let declarations = |kind: SyntaxKind| kind == VARIABLE_DECLARATION;
    assert!(!are_equivalent(&before, &after, None));
    assert!(are_equivalent(&before, &after, Some(&declarations)));
}

#[test]
fn test_optional_nodes() {
    let tree = parse("int x = 1;");
    let other = parse(" int x = 1 ; ");
    assert!(are_equivalent_nodes(None, None, None));
    assert!(!are_equivalent_nodes(Some(tree.root()), None, None));
    assert!(!are_equivalent_nodes(None, Some(tree.root()), None));
    assert!(are_equivalent_nodes(Some(tree.root()), Some(other.root()), None));
    assert!(tree.root().is_equivalent_to(other.root()));
}

#[test]
fn test_token_equivalence() {
    let tree = parse("int x = 1;");
    let other = parse("int  x  = 1;");
    let x = tree.root().find_token(4, false).expect("x");
    let other_x = other.root().find_token(5, false).expect("x");
    assert_eq!(other_x.text(), "x");
    assert!(x.is_equivalent_to(&other_x));
    let int = tree.root().first_token().expect("int");
    assert!(!x.is_equivalent_to(&int));
}
