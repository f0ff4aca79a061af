//! Recursive-descent parser for the test language.
//!
//! ```text
//! unit        := member* EOF
//! member      := type IDENT ( parameters block | declarators ';' )
//! parameters  := '(' (type IDENT (',' type IDENT)*)? ')'
//! declarators := declarator (',' declarator)*
//! declarator  := IDENT ('=' expression)?
//! statement   := block | 'if' '(' expr ')' statement ('else' statement)?
//!              | 'while' '(' expr ')' statement | 'return' expr? ';'
//!              | type declarators ';' | ';' | expression ';'
//! expression  := binary ('=' expression)?
//! ```
//!
//! Errors never stop the parse. An expected token that is not there is
//! produced as a missing token carrying a diagnostic; a token that cannot
//! start anything is skipped and attached to the next token's leading trivia
//! as skipped-tokens trivia.

use canopy_common::{DiagnosticInfo, format_message};

use super::kinds::*;
use super::lexer::{Lexer, skipped_tokens};
use crate::green::{GreenListBuilder, GreenNode, NodeCache};
use crate::kind::SyntaxKind;

pub const TOKEN_EXPECTED: u32 = 1002;
pub const UNEXPECTED_TOKEN: u32 = 1003;
pub const NESTING_TOO_DEEP: u32 = 1007;

/// Nesting depth at which the parser stops descending.
const MAX_NESTING: usize = 256;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: GreenNode,
    skipped: Vec<GreenNode>,
    cache: &'a NodeCache,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str, cache: &'a NodeCache) -> Self {
        let mut lexer = Lexer::new(text);
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            skipped: Vec::new(),
            cache,
            depth: 0,
        }
    }

    // =========================================================================
    // Token handling
    // =========================================================================

    #[inline]
    fn token(&self) -> SyntaxKind {
        self.current.kind()
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.token() == kind
    }

    /// Consume the current token.
    fn bump(&mut self) -> GreenNode {
        let next = self.lexer.next_token();
        let token = std::mem::replace(&mut self.current, next);
        self.attach_skipped(token)
    }

    fn attach_skipped(&mut self, token: GreenNode) -> GreenNode {
        if self.skipped.is_empty() {
            return token;
        }
        let skipped = skipped_tokens(std::mem::take(&mut self.skipped));
        let mut leading = GreenListBuilder::new();
        leading.add(&skipped);
        leading.add_option(token.leading_trivia());
        token.with_leading_trivia(leading.into_list())
    }

    /// Skip the current token with a diagnostic.
    fn skip(&mut self) {
        let text = self.current.token_text().to_string();
        let message = format_message("Unexpected token '{0}'.", &[text.as_str()]);
        let width = self.current.width();
        let next = self.lexer.next_token();
        let token = std::mem::replace(&mut self.current, next);
        self.skipped
            .push(token.add_error(DiagnosticInfo::error(UNEXPECTED_TOKEN, message).with_location(0, width)));
    }

    fn expect(&mut self, kind: SyntaxKind) -> GreenNode {
        if self.at(kind) {
            return self.bump();
        }
        missing(kind)
    }

    fn node(&self, kind: SyntaxKind, slots: Vec<Option<GreenNode>>) -> GreenNode {
        self.cache.node(kind, slots)
    }

    fn enter(&mut self) -> bool {
        if self.depth >= MAX_NESTING {
            return false;
        }
        self.depth += 1;
        true
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn parse_compilation_unit(mut self) -> GreenNode {
        let mut members = GreenListBuilder::new();
        while !self.at(END_OF_FILE_TOKEN) {
            if is_type_start(self.token()) {
                members.add(&self.parse_member());
            } else {
                self.skip();
            }
        }
        let eof = self.bump();
        self.node(COMPILATION_UNIT, vec![members.into_list(), Some(eof)])
    }

    /// A single expression. Input after the expression is ignored.
    pub fn parse_single_expression(mut self) -> GreenNode {
        self.parse_expression()
    }

    fn parse_member(&mut self) -> GreenNode {
        let ty = self.parse_type();
        let name = self.expect(IDENTIFIER_TOKEN);
        if self.at(OPEN_PAREN_TOKEN) {
            let parameters = self.parse_parameter_list();
            let body = self.parse_block();
            self.node(FUNCTION_DECLARATION, vec![Some(ty), Some(name), Some(parameters), Some(body)])
        } else {
            self.parse_variable_declaration_rest(ty, name)
        }
    }

    fn parse_type(&mut self) -> GreenNode {
        match self.token() {
            INT_KEYWORD | VOID_KEYWORD => {
                let keyword = self.bump();
                self.node(PREDEFINED_TYPE, vec![Some(keyword)])
            }
            _ => {
                let name = self.expect(IDENTIFIER_TOKEN);
                self.node(IDENTIFIER_NAME, vec![Some(name)])
            }
        }
    }

    fn parse_parameter_list(&mut self) -> GreenNode {
        let open = self.expect(OPEN_PAREN_TOKEN);
        let mut parameters = GreenListBuilder::new();
        if !self.at(CLOSE_PAREN_TOKEN) {
            loop {
                let ty = self.parse_type();
                let name = self.expect(IDENTIFIER_TOKEN);
                parameters.add(&self.node(PARAMETER, vec![Some(ty), Some(name)]));
                if !self.at(COMMA_TOKEN) {
                    break;
                }
                parameters.add(&self.bump());
            }
        }
        let close = self.expect(CLOSE_PAREN_TOKEN);
        self.node(PARAMETER_LIST, vec![Some(open), parameters.into_list(), Some(close)])
    }

    /// `name (= init)? (, declarator)* ;` after the type and first name.
    fn parse_variable_declaration_rest(&mut self, ty: GreenNode, first_name: GreenNode) -> GreenNode {
        let mut declarators = GreenListBuilder::new();
        let mut name = first_name;
        loop {
            let initializer = self.at(EQUALS_TOKEN).then(|| {
                let equals = self.bump();
                let value = self.parse_expression();
                self.node(EQUALS_VALUE_CLAUSE, vec![Some(equals), Some(value)])
            });
            declarators.add(&self.node(VARIABLE_DECLARATOR, vec![Some(name), initializer]));
            if !self.at(COMMA_TOKEN) {
                break;
            }
            declarators.add(&self.bump());
            name = self.expect(IDENTIFIER_TOKEN);
        }
        let semicolon = self.expect(SEMICOLON_TOKEN);
        self.node(VARIABLE_DECLARATION, vec![Some(ty), declarators.into_list(), Some(semicolon)])
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> GreenNode {
        let open = self.expect(OPEN_BRACE_TOKEN);
        let mut statements = GreenListBuilder::new();
        if !open.is_missing() {
            while !self.at(CLOSE_BRACE_TOKEN) && !self.at(END_OF_FILE_TOKEN) {
                if is_statement_start(self.token()) {
                    statements.add(&self.parse_statement());
                } else {
                    self.skip();
                }
            }
        }
        let close = self.expect(CLOSE_BRACE_TOKEN);
        self.node(BLOCK, vec![Some(open), statements.into_list(), Some(close)])
    }

    fn parse_statement(&mut self) -> GreenNode {
        if !self.enter() {
            return nesting_too_deep(EMPTY_STATEMENT, SEMICOLON_TOKEN);
        }
        let statement = match self.token() {
            OPEN_BRACE_TOKEN => self.parse_block(),
            IF_KEYWORD => self.parse_if_statement(),
            WHILE_KEYWORD => self.parse_while_statement(),
            RETURN_KEYWORD => self.parse_return_statement(),
            SEMICOLON_TOKEN => {
                let semicolon = self.bump();
                self.node(EMPTY_STATEMENT, vec![Some(semicolon)])
            }
            INT_KEYWORD | VOID_KEYWORD => {
                let ty = self.parse_type();
                let name = self.expect(IDENTIFIER_TOKEN);
                self.parse_variable_declaration_rest(ty, name)
            }
            _ => {
                let expression = self.parse_expression();
                let semicolon = self.expect(SEMICOLON_TOKEN);
                self.node(EXPRESSION_STATEMENT, vec![Some(expression), Some(semicolon)])
            }
        };
        self.exit();
        statement
    }

    fn parse_if_statement(&mut self) -> GreenNode {
        let keyword = self.bump();
        let open = self.expect(OPEN_PAREN_TOKEN);
        let condition = self.parse_expression();
        let close = self.expect(CLOSE_PAREN_TOKEN);
        let then = self.parse_embedded_statement();
        let else_clause = self.at(ELSE_KEYWORD).then(|| {
            let keyword = self.bump();
            let statement = self.parse_embedded_statement();
            self.node(ELSE_CLAUSE, vec![Some(keyword), Some(statement)])
        });
        self.node(
            IF_STATEMENT,
            vec![Some(keyword), Some(open), Some(condition), Some(close), Some(then), else_clause],
        )
    }

    fn parse_while_statement(&mut self) -> GreenNode {
        let keyword = self.bump();
        let open = self.expect(OPEN_PAREN_TOKEN);
        let condition = self.parse_expression();
        let close = self.expect(CLOSE_PAREN_TOKEN);
        let body = self.parse_embedded_statement();
        self.node(
            WHILE_STATEMENT,
            vec![Some(keyword), Some(open), Some(condition), Some(close), Some(body)],
        )
    }

    fn parse_embedded_statement(&mut self) -> GreenNode {
        if is_statement_start(self.token()) {
            self.parse_statement()
        } else {
            self.node(EMPTY_STATEMENT, vec![Some(missing(SEMICOLON_TOKEN))])
        }
    }

    fn parse_return_statement(&mut self) -> GreenNode {
        let keyword = self.bump();
        let value = (!self.at(SEMICOLON_TOKEN) && is_expression_start(self.token())).then(|| self.parse_expression());
        let semicolon = self.expect(SEMICOLON_TOKEN);
        self.node(RETURN_STATEMENT, vec![Some(keyword), value, Some(semicolon)])
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> GreenNode {
        if !self.enter() {
            return nesting_too_deep(IDENTIFIER_NAME, IDENTIFIER_TOKEN);
        }
        let left = self.parse_binary(0);
        let expression = if self.at(EQUALS_TOKEN) {
            let equals = self.bump();
            let right = self.parse_expression();
            self.node(ASSIGNMENT_EXPRESSION, vec![Some(left), Some(equals), Some(right)])
        } else {
            left
        };
        self.exit();
        expression
    }

    /// Operators binding tighter than `min_precedence`, left associative.
    fn parse_binary(&mut self, min_precedence: u8) -> GreenNode {
        let mut left = self.parse_primary();
        while let Some(precedence) = binary_precedence(self.token())
            && precedence > min_precedence
        {
            let operator = self.bump();
            let right = self.parse_binary(precedence);
            left = self.node(BINARY_EXPRESSION, vec![Some(left), Some(operator), Some(right)]);
        }
        left
    }

    fn parse_primary(&mut self) -> GreenNode {
        match self.token() {
            NUMERIC_LITERAL_TOKEN | STRING_LITERAL_TOKEN => {
                let literal = self.bump();
                self.node(LITERAL_EXPRESSION, vec![Some(literal)])
            }
            OPEN_PAREN_TOKEN => {
                let open = self.bump();
                let inner = self.parse_expression();
                let close = self.expect(CLOSE_PAREN_TOKEN);
                self.node(PARENTHESIZED_EXPRESSION, vec![Some(open), Some(inner), Some(close)])
            }
            _ => {
                let identifier = self.expect(IDENTIFIER_TOKEN);
                let name = self.node(IDENTIFIER_NAME, vec![Some(identifier)]);
                if self.at(OPEN_PAREN_TOKEN) {
                    let arguments = self.parse_argument_list();
                    self.node(INVOCATION_EXPRESSION, vec![Some(name), Some(arguments)])
                } else {
                    name
                }
            }
        }
    }

    fn parse_argument_list(&mut self) -> GreenNode {
        let open = self.bump();
        let mut arguments = GreenListBuilder::new();
        if !self.at(CLOSE_PAREN_TOKEN) {
            loop {
                arguments.add(&self.parse_expression());
                if !self.at(COMMA_TOKEN) {
                    break;
                }
                arguments.add(&self.bump());
            }
        }
        let close = self.expect(CLOSE_PAREN_TOKEN);
        self.node(ARGUMENT_LIST, vec![Some(open), arguments.into_list(), Some(close)])
    }
}

/// A node of `kind` around one missing `token`, flagged as too deep.
fn nesting_too_deep(kind: SyntaxKind, token: SyntaxKind) -> GreenNode {
    let diagnostic = DiagnosticInfo::error(NESTING_TOO_DEEP, "Nesting is too deep.");
    GreenNode::node(kind, [Some(GreenNode::missing_token(token))]).add_error(diagnostic)
}

/// A missing token with a "'x' expected" diagnostic.
#[must_use]
pub fn missing(kind: SyntaxKind) -> GreenNode {
    let expected = match kind {
        IDENTIFIER_TOKEN => "Identifier",
        other => token_text(other).unwrap_or("token"),
    };
    let message = format_message("'{0}' expected.", &[expected]);
    GreenNode::missing_token(kind).add_error(DiagnosticInfo::error(TOKEN_EXPECTED, message))
}

fn is_type_start(kind: SyntaxKind) -> bool {
    matches!(kind, INT_KEYWORD | VOID_KEYWORD | IDENTIFIER_TOKEN)
}

fn is_expression_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        IDENTIFIER_TOKEN | NUMERIC_LITERAL_TOKEN | STRING_LITERAL_TOKEN | OPEN_PAREN_TOKEN
    )
}

fn is_statement_start(kind: SyntaxKind) -> bool {
    is_expression_start(kind)
        || matches!(
            kind,
            OPEN_BRACE_TOKEN | IF_KEYWORD | WHILE_KEYWORD | RETURN_KEYWORD | SEMICOLON_TOKEN | INT_KEYWORD | VOID_KEYWORD
        )
}
