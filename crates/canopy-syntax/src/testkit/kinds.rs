//! Kinds of the test language.

use crate::kind::SyntaxKind;

const fn kind(raw: u16) -> SyntaxKind {
    SyntaxKind(SyntaxKind::FIRST_LANGUAGE_KIND + raw)
}

// Trivia
pub const WHITESPACE_TRIVIA: SyntaxKind = kind(0);
pub const END_OF_LINE_TRIVIA: SyntaxKind = SyntaxKind::END_OF_LINE_TRIVIA;
pub const LINE_COMMENT_TRIVIA: SyntaxKind = SyntaxKind::SINGLE_LINE_COMMENT_TRIVIA;
pub const BLOCK_COMMENT_TRIVIA: SyntaxKind = kind(3);
pub const SKIPPED_TOKENS_TRIVIA: SyntaxKind = kind(4);
pub const REGION_DIRECTIVE_TRIVIA: SyntaxKind = kind(5);
pub const END_REGION_DIRECTIVE_TRIVIA: SyntaxKind = kind(6);
pub const BAD_DIRECTIVE_TRIVIA: SyntaxKind = kind(7);

// Tokens
pub const IDENTIFIER_TOKEN: SyntaxKind = kind(20);
pub const NUMERIC_LITERAL_TOKEN: SyntaxKind = kind(21);
pub const STRING_LITERAL_TOKEN: SyntaxKind = kind(22);
pub const INT_KEYWORD: SyntaxKind = kind(23);
pub const VOID_KEYWORD: SyntaxKind = kind(24);
pub const RETURN_KEYWORD: SyntaxKind = kind(25);
pub const IF_KEYWORD: SyntaxKind = kind(26);
pub const ELSE_KEYWORD: SyntaxKind = kind(27);
pub const WHILE_KEYWORD: SyntaxKind = kind(28);
pub const OPEN_PAREN_TOKEN: SyntaxKind = kind(29);
pub const CLOSE_PAREN_TOKEN: SyntaxKind = kind(30);
pub const OPEN_BRACE_TOKEN: SyntaxKind = kind(31);
pub const CLOSE_BRACE_TOKEN: SyntaxKind = kind(32);
pub const SEMICOLON_TOKEN: SyntaxKind = kind(33);
pub const COMMA_TOKEN: SyntaxKind = kind(34);
pub const EQUALS_TOKEN: SyntaxKind = kind(35);
pub const PLUS_TOKEN: SyntaxKind = kind(36);
pub const MINUS_TOKEN: SyntaxKind = kind(37);
pub const ASTERISK_TOKEN: SyntaxKind = kind(38);
pub const SLASH_TOKEN: SyntaxKind = kind(39);
pub const LESS_THAN_TOKEN: SyntaxKind = kind(40);
pub const GREATER_THAN_TOKEN: SyntaxKind = kind(41);
pub const HASH_TOKEN: SyntaxKind = kind(42);
pub const PREPROCESSING_MESSAGE_TOKEN: SyntaxKind = kind(43);
pub const BAD_TOKEN: SyntaxKind = kind(44);
pub const END_OF_FILE_TOKEN: SyntaxKind = kind(45);

// Nodes
pub const COMPILATION_UNIT: SyntaxKind = kind(60);
pub const FUNCTION_DECLARATION: SyntaxKind = kind(61);
pub const PARAMETER_LIST: SyntaxKind = kind(62);
pub const PARAMETER: SyntaxKind = kind(63);
pub const VARIABLE_DECLARATION: SyntaxKind = kind(64);
pub const VARIABLE_DECLARATOR: SyntaxKind = kind(65);
pub const EQUALS_VALUE_CLAUSE: SyntaxKind = kind(66);
pub const PREDEFINED_TYPE: SyntaxKind = kind(67);
pub const BLOCK: SyntaxKind = kind(68);
pub const EXPRESSION_STATEMENT: SyntaxKind = kind(69);
pub const RETURN_STATEMENT: SyntaxKind = kind(70);
pub const IF_STATEMENT: SyntaxKind = kind(71);
pub const ELSE_CLAUSE: SyntaxKind = kind(72);
pub const WHILE_STATEMENT: SyntaxKind = kind(73);
pub const EMPTY_STATEMENT: SyntaxKind = kind(74);
pub const IDENTIFIER_NAME: SyntaxKind = kind(75);
pub const LITERAL_EXPRESSION: SyntaxKind = kind(76);
pub const BINARY_EXPRESSION: SyntaxKind = kind(77);
pub const ASSIGNMENT_EXPRESSION: SyntaxKind = kind(78);
pub const PARENTHESIZED_EXPRESSION: SyntaxKind = kind(79);
pub const INVOCATION_EXPRESSION: SyntaxKind = kind(80);
pub const ARGUMENT_LIST: SyntaxKind = kind(81);

/// Fixed text of punctuation and keyword kinds.
#[must_use]
pub fn token_text(kind: SyntaxKind) -> Option<&'static str> {
    Some(match kind {
        INT_KEYWORD => "int",
        VOID_KEYWORD => "void",
        RETURN_KEYWORD => "return",
        IF_KEYWORD => "if",
        ELSE_KEYWORD => "else",
        WHILE_KEYWORD => "while",
        OPEN_PAREN_TOKEN => "(",
        CLOSE_PAREN_TOKEN => ")",
        OPEN_BRACE_TOKEN => "{",
        CLOSE_BRACE_TOKEN => "}",
        SEMICOLON_TOKEN => ";",
        COMMA_TOKEN => ",",
        EQUALS_TOKEN => "=",
        PLUS_TOKEN => "+",
        MINUS_TOKEN => "-",
        ASTERISK_TOKEN => "*",
        SLASH_TOKEN => "/",
        LESS_THAN_TOKEN => "<",
        GREATER_THAN_TOKEN => ">",
        HASH_TOKEN => "#",
        _ => return None,
    })
}

#[must_use]
pub fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    Some(match text {
        "int" => INT_KEYWORD,
        "void" => VOID_KEYWORD,
        "return" => RETURN_KEYWORD,
        "if" => IF_KEYWORD,
        "else" => ELSE_KEYWORD,
        "while" => WHILE_KEYWORD,
        _ => return None,
    })
}

/// Human-readable name, for messages and test output.
#[must_use]
pub fn kind_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::LIST => "List",
        WHITESPACE_TRIVIA => "WhitespaceTrivia",
        END_OF_LINE_TRIVIA => "EndOfLineTrivia",
        LINE_COMMENT_TRIVIA => "LineCommentTrivia",
        BLOCK_COMMENT_TRIVIA => "BlockCommentTrivia",
        SKIPPED_TOKENS_TRIVIA => "SkippedTokensTrivia",
        REGION_DIRECTIVE_TRIVIA => "RegionDirectiveTrivia",
        END_REGION_DIRECTIVE_TRIVIA => "EndRegionDirectiveTrivia",
        BAD_DIRECTIVE_TRIVIA => "BadDirectiveTrivia",
        IDENTIFIER_TOKEN => "IdentifierToken",
        NUMERIC_LITERAL_TOKEN => "NumericLiteralToken",
        STRING_LITERAL_TOKEN => "StringLiteralToken",
        PREPROCESSING_MESSAGE_TOKEN => "PreprocessingMessageToken",
        BAD_TOKEN => "BadToken",
        END_OF_FILE_TOKEN => "EndOfFileToken",
        COMPILATION_UNIT => "CompilationUnit",
        FUNCTION_DECLARATION => "FunctionDeclaration",
        PARAMETER_LIST => "ParameterList",
        PARAMETER => "Parameter",
        VARIABLE_DECLARATION => "VariableDeclaration",
        VARIABLE_DECLARATOR => "VariableDeclarator",
        EQUALS_VALUE_CLAUSE => "EqualsValueClause",
        PREDEFINED_TYPE => "PredefinedType",
        BLOCK => "Block",
        EXPRESSION_STATEMENT => "ExpressionStatement",
        RETURN_STATEMENT => "ReturnStatement",
        IF_STATEMENT => "IfStatement",
        ELSE_CLAUSE => "ElseClause",
        WHILE_STATEMENT => "WhileStatement",
        EMPTY_STATEMENT => "EmptyStatement",
        IDENTIFIER_NAME => "IdentifierName",
        LITERAL_EXPRESSION => "LiteralExpression",
        BINARY_EXPRESSION => "BinaryExpression",
        ASSIGNMENT_EXPRESSION => "AssignmentExpression",
        PARENTHESIZED_EXPRESSION => "ParenthesizedExpression",
        INVOCATION_EXPRESSION => "InvocationExpression",
        ARGUMENT_LIST => "ArgumentList",
        other => token_text(other).unwrap_or("Unknown"),
    }
}

/// Binding power of a binary operator; higher binds tighter.
#[must_use]
pub fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    match kind {
        LESS_THAN_TOKEN | GREATER_THAN_TOKEN => Some(1),
        PLUS_TOKEN | MINUS_TOKEN => Some(2),
        ASTERISK_TOKEN | SLASH_TOKEN => Some(3),
        _ => None,
    }
}
