//! `SyntaxTokenList`: a list slot holding tokens only (modifiers and the like).

use std::fmt;

use canopy_common::TextSpan;

use super::{ListHost, missing_item};
use crate::error::EditError;
use crate::green::GreenNode;
use crate::kind::SyntaxKind;
use crate::red::{SyntaxNodeOrToken, SyntaxToken};

#[derive(Clone, Default)]
pub struct SyntaxTokenList {
    host: ListHost,
}

impl SyntaxTokenList {
    pub(crate) fn from_host(host: ListHost) -> Self {
        SyntaxTokenList { host }
    }

    /// A detached list of `tokens`.
    #[must_use]
    pub fn from_greens<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a GreenNode>,
    {
        let host = ListHost::from_greens(tokens);
        debug_assert!(host.greens().iter().all(GreenNode::is_token));
        SyntaxTokenList { host }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.host.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.host.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<SyntaxToken> {
        self.host.get(index).and_then(SyntaxNodeOrToken::into_token)
    }

    #[must_use]
    pub fn first(&self) -> Option<SyntaxToken> {
        self.get(0)
    }

    #[must_use]
    pub fn last(&self) -> Option<SyntaxToken> {
        self.get(self.len().checked_sub(1)?)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = SyntaxToken> + ExactSizeIterator + '_ {
        (0..self.len()).map(|index| match self.get(index) {
            Some(token) => token,
            None => unreachable!("token list element {index} is not a token"),
        })
    }

    #[must_use]
    pub fn index_of(&self, token: &SyntaxToken) -> Option<usize> {
        self.host.index_of(&SyntaxNodeOrToken::Token(token.clone()))
    }

    #[must_use]
    pub fn any(&self, kind: SyntaxKind) -> bool {
        (0..self.len()).any(|index| self.host.green_at(index).is_some_and(|green| green.kind() == kind))
    }

    #[must_use]
    pub fn green(&self) -> Option<&GreenNode> {
        self.host.green()
    }

    #[must_use]
    pub fn full_span(&self) -> TextSpan {
        self.host.full_span()
    }

    #[must_use]
    pub fn span(&self) -> TextSpan {
        self.host.span()
    }

    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.host.to_full_string()
    }

    #[must_use]
    pub fn add(&self, token: GreenNode) -> Self {
        self.insert(self.len(), token)
    }

    #[must_use]
    pub fn add_range(&self, tokens: Vec<GreenNode>) -> Self {
        self.insert_range(self.len(), tokens)
    }

    #[must_use]
    pub fn insert(&self, index: usize, token: GreenNode) -> Self {
        self.insert_range(index, vec![token])
    }

    /// # Panics
    ///
    /// Panics when `index > len()`.
    #[must_use]
    pub fn insert_range(&self, index: usize, tokens: Vec<GreenNode>) -> Self {
        debug_assert!(tokens.iter().all(GreenNode::is_token));
        SyntaxTokenList::from_host(self.host.inserted(index, tokens))
    }

    /// # Panics
    ///
    /// Panics when `index >= len()`.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        SyntaxTokenList::from_host(self.host.removed_at(index))
    }

    pub fn remove(&self, token: &SyntaxToken) -> Result<Self, EditError> {
        let index = self.require(token)?;
        Ok(self.remove_at(index))
    }

    pub fn replace(&self, token: &SyntaxToken, replacement: GreenNode) -> Result<Self, EditError> {
        self.replace_range(token, vec![replacement])
    }

    pub fn replace_range(&self, token: &SyntaxToken, replacements: Vec<GreenNode>) -> Result<Self, EditError> {
        let index = self.require(token)?;
        Ok(SyntaxTokenList::from_host(self.host.replaced_at(index, replacements)))
    }

    fn require(&self, token: &SyntaxToken) -> Result<usize, EditError> {
        self.index_of(token)
            .ok_or_else(|| missing_item(&SyntaxNodeOrToken::Token(token.clone())))
    }
}

impl fmt::Debug for SyntaxTokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
