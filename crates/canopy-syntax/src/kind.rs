//! Node kinds.
//!
//! A kind is an opaque per-language code. The tree core knows a handful of
//! them: `NONE` (the default, never produced by a parser), `LIST` (the kind of
//! the list encoding) and the two trivia kinds that end a line. Languages
//! number their own kinds from `SyntaxKind::FIRST_LANGUAGE_KIND` upward and
//! reuse the shared trivia kinds for their line breaks and line comments.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SyntaxKind(pub u16);

impl SyntaxKind {
    pub const NONE: SyntaxKind = SyntaxKind(0);
    /// Kind of every list node. Lists hold their elements as slots.
    pub const LIST: SyntaxKind = SyntaxKind(1);
    /// A line break.
    pub const END_OF_LINE_TRIVIA: SyntaxKind = SyntaxKind(2);
    /// A comment running to the end of its line.
    pub const SINGLE_LINE_COMMENT_TRIVIA: SyntaxKind = SyntaxKind(3);
    /// Lowest kind a language may assign.
    pub const FIRST_LANGUAGE_KIND: u16 = 4;

    #[inline]
    #[must_use]
    pub const fn is_list(self) -> bool {
        self.0 == Self::LIST.0
    }

    /// Trivia after which nothing else can follow on the same line.
    #[inline]
    #[must_use]
    pub const fn ends_line(self) -> bool {
        self.0 == Self::END_OF_LINE_TRIVIA.0 || self.0 == Self::SINGLE_LINE_COMMENT_TRIVIA.0
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => f.write_str("NONE"),
            Self::LIST => f.write_str("LIST"),
            Self::END_OF_LINE_TRIVIA => f.write_str("END_OF_LINE_TRIVIA"),
            Self::SINGLE_LINE_COMMENT_TRIVIA => f.write_str("SINGLE_LINE_COMMENT_TRIVIA"),
            SyntaxKind(raw) => write!(f, "SyntaxKind({raw})"),
        }
    }
}

/// What a structured trivia node represents.
///
/// Navigation uses this to decide which structured trivia to step into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriviaStructure {
    /// A preprocessor-like directive (`#region`, `#if`, ...).
    Directive,
    /// Tokens the parser skipped over.
    SkippedTokens,
    /// Any other structured trivia, such as documentation comments.
    Other,
}
