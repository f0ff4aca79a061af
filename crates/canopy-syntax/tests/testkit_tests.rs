use crate::green::GreenNode;
use crate::red::{SyntaxNode, SyntaxNodeOrToken};
use crate::testkit::kinds::*;
use crate::testkit::lexer::{INVALID_CHARACTER, UNKNOWN_DIRECTIVE, UNTERMINATED_COMMENT, UNTERMINATED_STRING};
use crate::testkit::parser::{NESTING_TOO_DEEP, TOKEN_EXPECTED, UNEXPECTED_TOKEN};
use crate::testkit::{Lexer, lex, parse, parse_expression};

fn child_kinds(node: &SyntaxNode) -> Vec<crate::SyntaxKind> {
    node.children_with_tokens().iter().map(|child| child.kind()).collect()
}

fn statements(text: &str) -> Vec<crate::SyntaxKind> {
    let tree = parse(text);
    let block = tree
        .root()
        .descendant_nodes()
        .find(|node| node.kind() == BLOCK)
        .expect("block");
    block.node_list(1).iter().map(|statement| statement.kind()).collect()
}

// =============================================================================
// Lexer
// =============================================================================

#[test]
fn test_lex_kinds() {
    let kinds: Vec<_> = lex("int x = 1;").iter().map(GreenNode::kind).collect();
    assert_eq!(
        kinds,
        vec![
            INT_KEYWORD,
            IDENTIFIER_TOKEN,
            EQUALS_TOKEN,
            NUMERIC_LITERAL_TOKEN,
            SEMICOLON_TOKEN,
            END_OF_FILE_TOKEN
        ]
    );
}

#[test]
fn test_trailing_trivia_ends_at_line_end() {
    let tokens = lex("a // c\n\nb");
    assert_eq!(tokens.len(), 3);
    let a = &tokens[0];
    assert_eq!(a.token_text(), "a");
    assert_eq!(a.trailing_trivia().map(GreenNode::to_full_string).as_deref(), Some(" // c\n"));
    let b = &tokens[1];
    assert_eq!(b.leading_trivia().map(GreenNode::kind), Some(END_OF_LINE_TRIVIA));
    assert!(b.trailing_trivia().is_none());
}

#[test]
fn test_lexer_position_advances_past_trailing_trivia() {
    let mut lexer = Lexer::new("ab cd");
    let first = lexer.next_token();
    assert_eq!(first.token_text(), "ab");
    assert_eq!(lexer.position(), 3);
    assert_eq!(lexer.next_token().token_text(), "cd");
    assert_eq!(lexer.next_token().kind(), END_OF_FILE_TOKEN);
    assert_eq!(lexer.next_token().kind(), END_OF_FILE_TOKEN);
}

#[test]
fn test_string_literals() {
    let tokens = lex("\"hi\" \"open\nx");
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0].kind(), STRING_LITERAL_TOKEN);
    assert_eq!(tokens[0].token_text(), "\"hi\"");
    assert!(!tokens[0].contains_diagnostics());

    assert_eq!(tokens[1].kind(), STRING_LITERAL_TOKEN);
    assert_eq!(tokens[1].token_text(), "\"open");
    let diagnostics = tokens[1].diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, UNTERMINATED_STRING);
    assert_eq!(tokens[2].token_text(), "x");
}

#[test]
fn test_unterminated_comment() {
    let tree = parse("int x; /* never");
    assert_eq!(tree.text(), "int x; /* never");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, UNTERMINATED_COMMENT);
    assert_eq!(diagnostics[0].start, 7);
    assert_eq!(diagnostics[0].length, 8);
}

#[test]
fn test_directives_become_structured_trivia() {
    let text = "#region a b\nint x;\n#endregion\n";
    let tree = parse(text);
    assert_eq!(tree.text(), text);
    assert!(tree.diagnostics().is_empty());

    let int = tree.root().first_token().expect("int");
    let region = int.leading_trivia().first().expect("region");
    assert_eq!(region.kind(), REGION_DIRECTIVE_TRIVIA);
    let structure = region.structure().expect("structure");
    let message = structure
        .children_with_tokens()
        .last()
        .and_then(SyntaxNodeOrToken::into_token)
        .expect("message");
    assert_eq!(message.kind(), PREPROCESSING_MESSAGE_TOKEN);
    assert_eq!(message.text(), "a b");

    let eof = tree.root().last_token_with(crate::red::TokenFilter::ALL).expect("eof");
    assert_eq!(eof.kind(), END_OF_FILE_TOKEN);
    let end = eof.leading_trivia().first().expect("endregion");
    assert_eq!(end.kind(), END_REGION_DIRECTIVE_TRIVIA);
    let end_structure = end.structure().expect("structure");
    assert!(end_structure.green().slot(2).is_none());
    assert_eq!(end_structure.to_full_string(), "#endregion\n");
}

#[test]
fn test_unknown_directive() {
    let tree = parse("#pragma x\nint y;");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, UNKNOWN_DIRECTIVE);
    assert_eq!(diagnostics[0].start, 1);
    assert_eq!(diagnostics[0].length, 6);
    let int = tree.root().first_token().expect("int");
    assert_eq!(
        int.leading_trivia().first().map(|t| t.kind()),
        Some(BAD_DIRECTIVE_TRIVIA)
    );
}

#[test]
fn test_hash_inside_a_line_is_invalid() {
    let tree = parse("int x; #region\n");
    assert_eq!(tree.text(), "int x; #region\n");
    let first = tree.diagnostics().into_iter().next().expect("diagnostic");
    assert_eq!(first.code, INVALID_CHARACTER);
    assert_eq!(first.start, 7);
}

// =============================================================================
// Parser
// =============================================================================

#[test]
fn test_function_shape() {
    let tree = parse("int add(int a, int b) { return a + b * 2; }");
    assert!(tree.diagnostics().is_empty());
    let function = tree.root().children().next().expect("function");
    assert_eq!(
        child_kinds(&function),
        vec![PREDEFINED_TYPE, IDENTIFIER_TOKEN, PARAMETER_LIST, BLOCK]
    );

    let statement = function
        .descendant_nodes()
        .find(|node| node.kind() == RETURN_STATEMENT)
        .expect("return");
    let sum = statement.children().next().expect("expression");
    assert_eq!(sum.kind(), BINARY_EXPRESSION);
    assert_eq!(
        child_kinds(&sum),
        vec![IDENTIFIER_NAME, PLUS_TOKEN, BINARY_EXPRESSION]
    );
    let product = sum.children().nth(1).expect("product");
    assert_eq!(product.to_full_string(), "b * 2");
}

#[test]
fn test_variable_declarators() {
    let tree = parse("int a = 1, b, c = a;");
    let declaration = tree.root().children().next().expect("declaration");
    assert_eq!(declaration.kind(), VARIABLE_DECLARATION);
    let declarators = declaration.separated_list(1);
    assert_eq!(declarators.len(), 3);
    assert_eq!(declarators.separator_count(), 2);
    let initialized: Vec<bool> = declarators
        .iter()
        .map(|declarator| declarator.green().slot(1).is_some())
        .collect();
    assert_eq!(initialized, vec![true, false, true]);
}

#[test]
fn test_statement_kinds() {
    assert_eq!(
        statements("void f() { if (a) b = 1; else { } while (c) ; int d; ; g(d); }"),
        vec![
            IF_STATEMENT,
            WHILE_STATEMENT,
            VARIABLE_DECLARATION,
            EMPTY_STATEMENT,
            EXPRESSION_STATEMENT
        ]
    );
    let tree = parse("void f() { if (a) b = 1; else { } }");
    let if_statement = tree
        .root()
        .descendant_nodes()
        .find(|node| node.kind() == IF_STATEMENT)
        .expect("if");
    assert_eq!(if_statement.children().last().map(|n| n.kind()), Some(ELSE_CLAUSE));
    assert!(
        if_statement
            .descendant_nodes()
            .any(|node| node.kind() == ASSIGNMENT_EXPRESSION)
    );
}

#[test]
fn test_invocation_expression() {
    let root = SyntaxNode::new_root(parse_expression("g(1, x)"));
    assert_eq!(root.kind(), INVOCATION_EXPRESSION);
    let arguments = root.children().nth(1).expect("arguments");
    assert_eq!(arguments.kind(), ARGUMENT_LIST);
    let list = arguments.separated_list(1);
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(1).map(|argument| argument.kind()), Some(IDENTIFIER_NAME));
}

#[test]
fn test_missing_tokens_carry_diagnostics() {
    let tree = parse("int x = 1");
    assert_eq!(tree.text(), "int x = 1");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, TOKEN_EXPECTED);
    assert_eq!(diagnostics[0].start, 9);
    assert_eq!(diagnostics[0].length, 0);
    assert_eq!(diagnostics[0].message_text, "';' expected.");
    assert!(tree.root().contains_diagnostics());
}

#[test]
fn test_unexpected_tokens_are_skipped() {
    let text = "int f() { ) }";
    let tree = parse(text);
    assert_eq!(tree.text(), text);
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, UNEXPECTED_TOKEN);
    assert_eq!(diagnostics[0].start, 10);
    assert_eq!(diagnostics[0].message_text, "Unexpected token ')'.");

    let close = tree.root().find_token(12, false).expect("close brace");
    assert_eq!(close.kind(), CLOSE_BRACE_TOKEN);
    let skipped = close.leading_trivia().first().expect("skipped");
    assert_eq!(skipped.kind(), SKIPPED_TOKENS_TRIVIA);
    assert!(skipped.is_skipped_tokens());
}

#[test]
fn test_deep_nesting_is_reported() {
    let depth = 300;
    let text = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let diagnostics = std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(move || {
            let root = SyntaxNode::new_root(parse_expression(&text));
            root.diagnostics_in_file("deep.toy")
        })
        .expect("spawn")
        .join()
        .expect("parse");
    assert!(diagnostics.iter().any(|d| d.code == NESTING_TOO_DEEP));
}

#[test]
fn test_round_trip_with_crlf() {
    let text = "int x;\r\n// c\r\nvoid f() { }\r\n";
    let tree = parse(text);
    assert_eq!(tree.text(), text);
    assert!(tree.diagnostics().is_empty());
    assert_eq!(tree.root().children().count(), 2);
}
