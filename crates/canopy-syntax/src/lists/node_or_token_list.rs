//! `SyntaxNodeOrTokenList`: a list slot mixing nodes and tokens.
//!
//! Also the raw view of a separated list (`SeparatedSyntaxList::with_separators`).

use std::fmt;

use canopy_common::TextSpan;

use super::{ListHost, missing_item};
use crate::error::EditError;
use crate::green::GreenNode;
use crate::red::SyntaxNodeOrToken;

#[derive(Clone, Default)]
pub struct SyntaxNodeOrTokenList {
    host: ListHost,
}

impl SyntaxNodeOrTokenList {
    pub(crate) fn from_host(host: ListHost) -> Self {
        SyntaxNodeOrTokenList { host }
    }

    /// A detached list of `elements`.
    #[must_use]
    pub fn from_greens<'a, I>(elements: I) -> Self
    where
        I: IntoIterator<Item = &'a GreenNode>,
    {
        SyntaxNodeOrTokenList {
            host: ListHost::from_greens(elements),
        }
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
    pub fn get(&self, index: usize) -> Option<SyntaxNodeOrToken> {
        self.host.get(index)
    }

    #[must_use]
    pub fn first(&self) -> Option<SyntaxNodeOrToken> {
        self.get(0)
    }

    #[must_use]
    pub fn last(&self) -> Option<SyntaxNodeOrToken> {
        self.get(self.len().checked_sub(1)?)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = SyntaxNodeOrToken> + ExactSizeIterator + '_ {
        (0..self.len()).filter_map(|index| self.get(index)).collect::<Vec<_>>().into_iter()
    }

    #[must_use]
    pub fn index_of(&self, element: &SyntaxNodeOrToken) -> Option<usize> {
        self.host.index_of(element)
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
    pub fn add(&self, element: GreenNode) -> Self {
        self.insert(self.len(), element)
    }

    #[must_use]
    pub fn add_range(&self, elements: Vec<GreenNode>) -> Self {
        self.insert_range(self.len(), elements)
    }

    #[must_use]
    pub fn insert(&self, index: usize, element: GreenNode) -> Self {
        self.insert_range(index, vec![element])
    }

    /// # Panics
    ///
    /// Panics when `index > len()`.
    #[must_use]
    pub fn insert_range(&self, index: usize, elements: Vec<GreenNode>) -> Self {
        SyntaxNodeOrTokenList::from_host(self.host.inserted(index, elements))
    }

    /// # Panics
    ///
    /// Panics when `index >= len()`.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        SyntaxNodeOrTokenList::from_host(self.host.removed_at(index))
    }

    pub fn remove(&self, element: &SyntaxNodeOrToken) -> Result<Self, EditError> {
        let index = self.index_of(element).ok_or_else(|| missing_item(element))?;
        Ok(self.remove_at(index))
    }

    pub fn replace(&self, element: &SyntaxNodeOrToken, replacement: GreenNode) -> Result<Self, EditError> {
        self.replace_range(element, vec![replacement])
    }

    pub fn replace_range(
        &self,
        element: &SyntaxNodeOrToken,
        replacements: Vec<GreenNode>,
    ) -> Result<Self, EditError> {
        let index = self.index_of(element).ok_or_else(|| missing_item(element))?;
        Ok(SyntaxNodeOrTokenList::from_host(self.host.replaced_at(index, replacements)))
    }
}

impl fmt::Debug for SyntaxNodeOrTokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
