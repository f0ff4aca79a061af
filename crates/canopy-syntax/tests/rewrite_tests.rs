use crate::error::EditError;
use crate::green::GreenNode;
use crate::red::{SyntaxNode, SyntaxToken};
use crate::rewrite::RemoveOptions;
use crate::testkit::kinds::*;
use crate::testkit::{identifier, identifier_name, line_comment, number, parse, punctuation, whitespace};

fn find(root: &SyntaxNode, kind: crate::SyntaxKind, position: u32) -> SyntaxNode {
    root.descendant_nodes_and_self()
        .find(|node| node.kind() == kind && node.position() == position)
        .expect("node of kind at position")
}

fn statement(name: &str) -> GreenNode {
    GreenNode::node(
        EXPRESSION_STATEMENT,
        [Some(identifier_name(name)), Some(punctuation(SEMICOLON_TOKEN))],
    )
}

fn parameter(name: &str) -> GreenNode {
    let keyword = GreenNode::token(INT_KEYWORD, "int", None, Some(whitespace(" ")));
    let ty = GreenNode::node(PREDEFINED_TYPE, [Some(keyword)]);
    GreenNode::node(PARAMETER, [Some(ty), Some(identifier(name))])
}

fn spaced_name(name: &str) -> GreenNode {
    let token = GreenNode::token(IDENTIFIER_TOKEN, name, None, Some(whitespace(" ")));
    GreenNode::node(IDENTIFIER_NAME, [Some(token)])
}

// =============================================================================
// Nodes
// =============================================================================

#[test]
fn test_replace_node_leaves_original_untouched() {
    let tree = parse("int x = 1;");
    let root = tree.root();
    let literal = find(root, LITERAL_EXPRESSION, 8);
    let rewritten = root.replace_node(&literal, number("42")).expect("replace");
    assert_eq!(rewritten.to_full_string(), "int x = 42;");
    assert!(rewritten.parent().is_none());
    assert_eq!(tree.text(), "int x = 1;");

    let declaration = root.children().next().expect("declaration");
    let rewritten_declaration = rewritten.children().next().expect("declaration");
    let type_before = declaration.green().slot(0).expect("type");
    let type_after = rewritten_declaration.green().slot(0).expect("type");
    assert!(GreenNode::ptr_eq(type_before, type_after));
}

#[test]
fn test_replace_nodes_sees_rewritten_descendants() {
    let tree = parse("int x = a + b;");
    let root = tree.root();
    let binary = find(root, BINARY_EXPRESSION, 8);
    let left = find(root, IDENTIFIER_NAME, 8);
    let mut seen_by_outer = String::new();
    let rewritten = root
        .replace_nodes(&[binary, left], |node, green| {
            if node.kind() == IDENTIFIER_NAME {
                spaced_name("z")
            } else {
                seen_by_outer = green.to_full_string();
                green.clone()
            }
        })
        .expect("replace");
    assert_eq!(seen_by_outer, "z + b");
    assert_eq!(rewritten.to_full_string(), "int x = z + b;");
}

#[test]
fn test_replace_every_name() {
    let tree = parse("int f() { a; b; }");
    let root = tree.root();
    let names: Vec<SyntaxNode> = root
        .descendant_nodes()
        .filter(|node| node.kind() == IDENTIFIER_NAME)
        .collect();
    assert_eq!(names.len(), 2);
    let rewritten = root
        .replace_nodes(&names, |_, _| identifier_name("z"))
        .expect("replace");
    assert_eq!(rewritten.to_full_string(), "int f() { z; z; }");
}

#[test]
fn test_foreign_nodes_are_rejected() {
    let tree = parse("int x = 1;");
    let other = parse("int x = 1;");
    let foreign = find(other.root(), LITERAL_EXPRESSION, 8);
    match tree.root().replace_node(&foreign, number("2")) {
        Err(EditError::NodeNotInTree { kind, span }) => {
            assert_eq!(kind, LITERAL_EXPRESSION);
            assert_eq!(span.start, 8);
        }
        other => panic!("expected NodeNotInTree, got {other:?}"),
    }
}

#[test]
fn test_insert_into_list() {
    let tree = parse("int f() { a; b; }");
    let root = tree.root();
    let a = find(root, EXPRESSION_STATEMENT, 10);
    let b = find(root, EXPRESSION_STATEMENT, 13);

    let before = root.insert_nodes_before(&b, vec![statement("x")]).expect("insert");
    assert_eq!(before.to_full_string(), "int f() { a; x;b; }");
    let after = root.insert_nodes_after(&a, vec![statement("x")]).expect("insert");
    assert_eq!(after.to_full_string(), "int f() { a; x;b; }");

    let block = before.descendant_nodes().find(|n| n.kind() == BLOCK).expect("block");
    assert_eq!(block.node_list(1).len(), 3);
}

#[test]
fn test_insert_next_to_single_element_builds_a_list() {
    let tree = parse("int f() { a; }");
    let root = tree.root();
    let a = find(root, EXPRESSION_STATEMENT, 10);
    let rewritten = root.insert_nodes_before(&a, vec![statement("x")]).expect("insert");
    assert_eq!(rewritten.to_full_string(), "int f() { x;a; }");
    let block = rewritten.descendant_nodes().find(|n| n.kind() == BLOCK).expect("block");
    assert!(block.green().slot(1).is_some_and(GreenNode::is_list));
    assert_eq!(block.node_list(1).len(), 2);
}

#[test]
fn test_replace_with_several_nodes_in_separated_list() {
    let tree = parse("int f(int a, int b) { }");
    let root = tree.root();
    let b = find(root, PARAMETER, 13);
    let rewritten = root
        .replace_node_with_nodes(&b, vec![parameter("p"), parameter("q")])
        .expect("replace");
    assert_eq!(rewritten.to_full_string(), "int f(int a, int p,int q) { }");

    let parameters = rewritten
        .descendant_nodes()
        .find(|n| n.kind() == PARAMETER_LIST)
        .expect("parameters")
        .separated_list(1);
    assert_eq!(parameters.len(), 3);
    assert_eq!(parameters.separator_count(), 2);
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn test_remove_takes_separator_along() {
    let tree = parse("int f(int a, int b, int c) { }");
    let root = tree.root();
    let b = find(root, PARAMETER, 13);
    let without_b = root.remove_node(&b, RemoveOptions::KEEP_NO_TRIVIA).expect("remove").expect("root");
    assert_eq!(without_b.to_full_string(), "int f(int a, int c) { }");

    let c = find(root, PARAMETER, 20);
    let without_c = root.remove_node(&c, RemoveOptions::KEEP_NO_TRIVIA).expect("remove").expect("root");
    assert_eq!(without_c.to_full_string(), "int f(int a, int b) { }");

    let a = find(root, PARAMETER, 6);
    let without_all = root
        .remove_nodes(&[a, b, c], RemoveOptions::KEEP_NO_TRIVIA)
        .expect("remove")
        .expect("root");
    assert_eq!(without_all.to_full_string(), "int f() { }");
}

#[test]
fn test_remove_keeps_requested_trivia() {
    let text = "int x;\n// about y\nint y;\nint z;\n";
    let tree = parse(text);
    let root = tree.root();
    let y = find(root, VARIABLE_DECLARATION, 7);
    assert_eq!(y.span().start, 18);

    let plain = root.remove_node(&y, RemoveOptions::KEEP_NO_TRIVIA).expect("remove").expect("root");
    assert_eq!(plain.to_full_string(), "int x;\nint z;\n");

    let leading = root
        .remove_node(&y, RemoveOptions::KEEP_LEADING_TRIVIA)
        .expect("remove")
        .expect("root");
    assert_eq!(leading.to_full_string(), "int x;\n// about y\nint z;\n");

    let exterior = root
        .remove_node(&y, RemoveOptions::KEEP_EXTERIOR_TRIVIA)
        .expect("remove")
        .expect("root");
    assert_eq!(exterior.to_full_string(), "int x;\n// about y\n\nint z;\n");
}

#[test]
fn test_remove_keeps_directives() {
    let tree = parse("int a;\n#region r\nint b;\nint c;\n");
    let root = tree.root();
    let b = find(root, VARIABLE_DECLARATION, 7);

    let dropped = root.remove_node(&b, RemoveOptions::KEEP_NO_TRIVIA).expect("remove").expect("root");
    assert_eq!(dropped.to_full_string(), "int a;\nint c;\n");

    let kept = root.remove_node(&b, RemoveOptions::KEEP_DIRECTIVES).expect("remove").expect("root");
    assert_eq!(kept.to_full_string(), "int a;\n#region r\nint c;\n");
    let c = kept.children().nth(1).expect("c");
    let directive = c.first_token().expect("int").leading_trivia().first().expect("directive");
    assert_eq!(directive.kind(), REGION_DIRECTIVE_TRIVIA);
}

#[test]
fn test_removing_the_root_leaves_nothing() {
    let tree = parse("int x;");
    let root = tree.root();
    assert!(root.remove_node(root, RemoveOptions::KEEP_NO_TRIVIA).expect("remove").is_none());
}

// =============================================================================
// Tokens and trivia
// =============================================================================

#[test]
fn test_replace_token() {
    let tree = parse("int x = 1;");
    let root = tree.root();
    let x = root.find_token(4, false).expect("x");
    let spaced = GreenNode::token(IDENTIFIER_TOKEN, "value", None, Some(whitespace(" ")));
    let rewritten = root.replace_token(&x, spaced).expect("replace");
    assert_eq!(rewritten.to_full_string(), "int value = 1;");
}

#[test]
fn test_replace_tokens_keeping_trivia() {
    let tree = parse("int f(int a) { return a; }");
    let root = tree.root();
    let identifiers: Vec<SyntaxToken> = root
        .descendant_tokens()
        .filter(|token| token.kind() == IDENTIFIER_TOKEN)
        .collect();
    assert_eq!(identifiers.len(), 3);
    let rewritten = root
        .replace_tokens(&identifiers, |token, green| {
            GreenNode::token(
                token.kind(),
                &token.text().to_uppercase(),
                green.leading_trivia().cloned(),
                green.trailing_trivia().cloned(),
            )
        })
        .expect("replace");
    assert_eq!(rewritten.to_full_string(), "int F(int A) { return A; }");
}

#[test]
fn test_replace_trivia() {
    let tree = parse("int x; // old\n");
    let root = tree.root();
    let comment = root.find_trivia(7, false).expect("comment");
    assert_eq!(comment.kind(), LINE_COMMENT_TRIVIA);

    let replaced = root
        .replace_trivia(std::slice::from_ref(&comment), |_, _| line_comment("// new"))
        .expect("replace");
    assert_eq!(replaced.to_full_string(), "int x; // new\n");

    let removed = root.replace_trivia_with(&comment, Vec::new()).expect("remove");
    assert_eq!(removed.to_full_string(), "int x; \n");
}

#[test]
fn test_replace_trivia_inside_directive() {
    let tree = parse("#region r\nint b;\n");
    let root = tree.root();
    let space = root.find_trivia(7, true).expect("whitespace in directive");
    assert_eq!(space.kind(), WHITESPACE_TRIVIA);
    let rewritten = root.replace_trivia_with(&space, vec![whitespace("   ")]).expect("replace");
    assert_eq!(rewritten.to_full_string(), "#region   r\nint b;\n");
    let directive = rewritten.find_trivia(0, false).expect("directive");
    assert_eq!(directive.kind(), REGION_DIRECTIVE_TRIVIA);
}

#[test]
fn test_replace_syntax_in_one_pass() {
    let tree = parse("int x = 1; // c\n");
    let root = tree.root();
    let literal = find(root, LITERAL_EXPRESSION, 8);
    let x = root.find_token(4, false).expect("x");
    let comment = root.find_trivia(11, false).expect("comment");
    let rewritten = root
        .replace_syntax(
            &[literal],
            |_, _| number("2"),
            &[x],
            |_, _| GreenNode::token(IDENTIFIER_TOKEN, "y", None, Some(whitespace(" "))),
            &[comment],
            |_, _| line_comment("// d"),
        )
        .expect("replace");
    assert_eq!(rewritten.to_full_string(), "int y = 2; // d\n");
}

#[test]
fn test_with_slot_builds_a_new_root() {
    let tree = parse("int x = 1");
    let declaration = tree.root().children().next().expect("declaration");
    assert!(declaration.green().slot(2).is_some_and(GreenNode::is_missing));
    let fixed = declaration.with_slot(2, Some(punctuation(SEMICOLON_TOKEN)));
    assert_eq!(fixed.kind(), VARIABLE_DECLARATION);
    assert!(fixed.parent().is_none());
    assert_eq!(fixed.to_full_string(), "int x = 1;");
    assert!(!fixed.contains_diagnostics());
}

#[test]
fn test_rewritten_root_makes_a_tree() {
    let tree = crate::testkit::parse_with_path("int x = 1;", "a.toy");
    let literal = find(tree.root(), LITERAL_EXPRESSION, 8);
    let rewritten = tree.root().replace_node(&literal, number("7")).expect("replace");
    let next = tree.with_root(rewritten);
    assert_eq!(next.file_path(), "a.toy");
    assert_eq!(next.text(), "int x = 7;");
    assert_eq!(next.len(), 10);
}
