//! Lexer for the test language.
//!
//! Every token owns the trivia around it: leading trivia is everything since
//! the previous token's trailing trivia, and trailing trivia runs up to and
//! including the first end of line. `#region` / `#endregion` at the start of
//! a line become directive structured trivia. Characters that cannot start a
//! token become skipped-tokens trivia carrying a diagnostic.

use canopy_common::{DiagnosticInfo, format_message};

use super::kinds::*;
use crate::green::{GreenListBuilder, GreenNode};
use crate::kind::{SyntaxKind, TriviaStructure};

pub const INVALID_CHARACTER: u32 = 1001;
pub const UNTERMINATED_STRING: u32 = 1004;
pub const UNTERMINATED_COMMENT: u32 = 1005;
pub const UNKNOWN_DIRECTIVE: u32 = 1006;

pub struct Lexer<'a> {
    text: &'a str,
    position: usize,
    /// No token has been produced on the current line yet.
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Lexer {
            text,
            position: 0,
            at_line_start: true,
        }
    }

    /// Byte offset of the next unread character.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !predicate(c)).unwrap_or(rest.len());
        self.position += len;
        &rest[..len]
    }

    fn take(&mut self, len: usize) -> &'a str {
        let text = &self.rest()[..len];
        self.position += len;
        text
    }

    /// The next token with its trivia. At the end of input this is an
    /// end-of-file token, forever.
    pub fn next_token(&mut self) -> GreenNode {
        let leading = self.scan_trivia(false);
        let (kind, text, diagnostic) = self.scan_token();
        self.at_line_start = false;
        let trailing = self.scan_trivia(true);
        let token = GreenNode::token(kind, text, leading, trailing);
        match diagnostic {
            Some(diagnostic) => token.add_error(diagnostic),
            None => token,
        }
    }

    /// All tokens of the input, ending with the end-of-file token.
    pub fn tokenize(mut self) -> Vec<GreenNode> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind() == END_OF_FILE_TOKEN;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn scan_token(&mut self) -> (SyntaxKind, &'a str, Option<DiagnosticInfo>) {
        let Some(c) = self.peek() else {
            return (END_OF_FILE_TOKEN, "", None);
        };
        if c.is_ascii_alphabetic() || c == '_' {
            let text = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return (keyword_kind(text).unwrap_or(IDENTIFIER_TOKEN), text, None);
        }
        if c.is_ascii_digit() {
            let text = self.take_while(|c| c.is_ascii_alphanumeric());
            return (NUMERIC_LITERAL_TOKEN, text, None);
        }
        if c == '"' {
            return self.scan_string();
        }
        match punctuation_kind(c) {
            Some(kind) => (kind, self.take(1), None),
            None => unreachable!("scan_trivia leaves only token starts and end of input"),
        }
    }

    fn scan_string(&mut self) -> (SyntaxKind, &'a str, Option<DiagnosticInfo>) {
        let rest = self.rest();
        let body = &rest[1..];
        match body.find(['"', '\n', '\r']) {
            Some(end) if body[end..].starts_with('"') => (STRING_LITERAL_TOKEN, self.take(end + 2), None),
            end => {
                let text = self.take(1 + end.unwrap_or(body.len()));
                let diagnostic = DiagnosticInfo::error(UNTERMINATED_STRING, "Unterminated string literal.")
                    .with_location(0, text.len() as u32);
                (STRING_LITERAL_TOKEN, text, Some(diagnostic))
            }
        }
    }

    /// Leading trivia, or with `trailing` the trivia up to the first end of
    /// line.
    fn scan_trivia(&mut self, trailing: bool) -> Option<GreenNode> {
        let mut trivia = GreenListBuilder::new();
        while let Some(c) = self.peek() {
            let rest = self.rest();
            if c == ' ' || c == '\t' {
                trivia.add(&GreenNode::trivia(WHITESPACE_TRIVIA, self.take_while(|c| c == ' ' || c == '\t')));
            } else if c == '\n' || c == '\r' {
                let len = if rest.starts_with("\r\n") { 2 } else { 1 };
                trivia.add(&GreenNode::trivia(END_OF_LINE_TRIVIA, self.take(len)));
                self.at_line_start = true;
                if trailing {
                    break;
                }
            } else if rest.starts_with("//") {
                trivia.add(&GreenNode::trivia(LINE_COMMENT_TRIVIA, self.take_while(|c| c != '\n' && c != '\r')));
            } else if rest.starts_with("/*") {
                trivia.add(&self.scan_block_comment());
            } else if trailing {
                break;
            } else if c == '#' && self.at_line_start {
                trivia.add(&self.scan_directive());
            } else if is_token_start(c) {
                break;
            } else {
                trivia.add(&self.scan_invalid_character(c));
            }
        }
        trivia.into_list()
    }

    fn scan_block_comment(&mut self) -> GreenNode {
        let rest = self.rest();
        match rest[2..].find("*/") {
            Some(end) => GreenNode::trivia(BLOCK_COMMENT_TRIVIA, self.take(end + 4)),
            None => {
                let text = self.take(rest.len());
                GreenNode::trivia(BLOCK_COMMENT_TRIVIA, text).add_error(
                    DiagnosticInfo::error(UNTERMINATED_COMMENT, "'*/' expected.").with_location(0, text.len() as u32),
                )
            }
        }
    }

    fn scan_invalid_character(&mut self, c: char) -> GreenNode {
        let text = self.take(c.len_utf8());
        let message = format_message("Invalid character '{0}'.", &[text]);
        let bad = GreenNode::token(BAD_TOKEN, text, None, None)
            .add_error(DiagnosticInfo::error(INVALID_CHARACTER, message).with_location(0, text.len() as u32));
        skipped_tokens(vec![bad])
    }

    /// `#name message` up to and including the end of line.
    fn scan_directive(&mut self) -> GreenNode {
        let hash = GreenNode::token(HASH_TOKEN, self.take(1), None, None);
        let name_text = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let after_name = self.scan_inline_whitespace();
        let line = self.take_while(|c| c != '\n' && c != '\r');
        let message_text = line.trim_end();
        self.position -= line.len() - message_text.len();
        let message_end = self.scan_line_end();

        let kind = match name_text {
            "region" => REGION_DIRECTIVE_TRIVIA,
            "endregion" => END_REGION_DIRECTIVE_TRIVIA,
            _ => BAD_DIRECTIVE_TRIVIA,
        };
        let mut name = GreenNode::token(IDENTIFIER_TOKEN, name_text, None, after_name);
        if kind == BAD_DIRECTIVE_TRIVIA {
            let message = format_message("Unknown directive '#{0}'.", &[name_text]);
            name = name.add_error(
                DiagnosticInfo::error(UNKNOWN_DIRECTIVE, message).with_location(0, name_text.len() as u32),
            );
        }
        let mut slots = vec![Some(hash), Some(name)];
        if message_text.is_empty() {
            if let Some(Some(last)) = slots.last_mut() {
                let mut trailing = GreenListBuilder::new();
                trailing.add_option(last.trailing_trivia());
                trailing.add_option(message_end.as_ref());
                *last = last.with_trailing_trivia(trailing.into_list());
            }
            slots.push(None);
        } else {
            slots.push(Some(GreenNode::token(PREPROCESSING_MESSAGE_TOKEN, message_text, None, message_end)));
        }
        self.at_line_start = true;
        GreenNode::structured_trivia(kind, TriviaStructure::Directive, slots)
    }

    fn scan_inline_whitespace(&mut self) -> Option<GreenNode> {
        let text = self.take_while(|c| c == ' ' || c == '\t');
        (!text.is_empty()).then(|| GreenNode::trivia(WHITESPACE_TRIVIA, text))
    }

    /// Whitespace then an end of line, as trailing trivia.
    fn scan_line_end(&mut self) -> Option<GreenNode> {
        let mut trivia = GreenListBuilder::new();
        if let Some(whitespace) = self.scan_inline_whitespace() {
            trivia.add(&whitespace);
        }
        let rest = self.rest();
        let len = if rest.starts_with("\r\n") {
            2
        } else if rest.starts_with(['\n', '\r']) {
            1
        } else {
            0
        };
        if len > 0 {
            trivia.add(&GreenNode::trivia(END_OF_LINE_TRIVIA, self.take(len)));
        }
        trivia.into_list()
    }
}

/// Skipped tokens wrapped as structured trivia.
pub(crate) fn skipped_tokens(tokens: Vec<GreenNode>) -> GreenNode {
    GreenNode::structured_trivia(
        SKIPPED_TOKENS_TRIVIA,
        TriviaStructure::SkippedTokens,
        [GreenNode::list(tokens)],
    )
}

fn punctuation_kind(c: char) -> Option<SyntaxKind> {
    Some(match c {
        '(' => OPEN_PAREN_TOKEN,
        ')' => CLOSE_PAREN_TOKEN,
        '{' => OPEN_BRACE_TOKEN,
        '}' => CLOSE_BRACE_TOKEN,
        ';' => SEMICOLON_TOKEN,
        ',' => COMMA_TOKEN,
        '=' => EQUALS_TOKEN,
        '+' => PLUS_TOKEN,
        '-' => MINUS_TOKEN,
        '*' => ASTERISK_TOKEN,
        '/' => SLASH_TOKEN,
        '<' => LESS_THAN_TOKEN,
        '>' => GREATER_THAN_TOKEN,
        _ => return None,
    })
}

fn is_token_start(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '"' || punctuation_kind(c).is_some()
}
