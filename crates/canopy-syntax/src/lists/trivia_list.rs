//! `SyntaxTriviaList`: the leading or trailing trivia of a token.

use std::fmt;

use canopy_common::{TextSize, TextSpan};

use crate::error::EditError;
use crate::green::{GreenListBuilder, GreenNode};
use crate::kind::SyntaxKind;
use crate::red::{SyntaxToken, SyntaxTrivia};

#[derive(Clone, Default)]
pub struct SyntaxTriviaList {
    token: Option<SyntaxToken>,
    /// A single trivia or a list of them.
    green: Option<GreenNode>,
    position: TextSize,
    leading: bool,
}

impl SyntaxTriviaList {
    pub(crate) fn new(token: Option<SyntaxToken>, green: Option<GreenNode>, position: TextSize, leading: bool) -> Self {
        SyntaxTriviaList {
            token,
            green,
            position,
            leading,
        }
    }

    /// A detached list of `trivia`.
    #[must_use]
    pub fn from_greens<'a, I>(trivia: I) -> Self
    where
        I: IntoIterator<Item = &'a GreenNode>,
    {
        let mut builder = GreenListBuilder::new();
        builder.add_range(trivia);
        debug_assert!(builder.as_slice().iter().all(GreenNode::is_trivia));
        SyntaxTriviaList::new(None, builder.into_list(), 0, true)
    }

    /// The token owning this trivia.
    #[must_use]
    pub fn token(&self) -> Option<&SyntaxToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub fn is_leading(&self) -> bool {
        self.leading
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match &self.green {
            None => 0,
            Some(green) if green.is_list() => green.slot_count(),
            Some(_) => 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.green.is_none()
    }

    fn green_at(&self, index: usize) -> Option<(&GreenNode, TextSize)> {
        let green = self.green.as_ref()?;
        if green.is_list() {
            if index >= green.slot_count() {
                return None;
            }
            Some((green.slot(index)?, green.slot_offset(index)))
        } else {
            (index == 0).then_some((green, 0))
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<SyntaxTrivia> {
        let (green, offset) = self.green_at(index)?;
        Some(SyntaxTrivia::new(
            self.token.clone(),
            green.clone(),
            self.position + offset,
            index,
            self.leading,
        ))
    }

    #[must_use]
    pub fn first(&self) -> Option<SyntaxTrivia> {
        self.get(0)
    }

    #[must_use]
    pub fn last(&self) -> Option<SyntaxTrivia> {
        self.get(self.len().checked_sub(1)?)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = SyntaxTrivia> + ExactSizeIterator + '_ {
        (0..self.len()).map(|index| match self.get(index) {
            Some(trivia) => trivia,
            None => unreachable!("trivia list element {index} missing"),
        })
    }

    /// Trivia in reverse order.
    pub fn reversed(&self) -> impl Iterator<Item = SyntaxTrivia> + '_ {
        self.iter().rev()
    }

    #[must_use]
    pub fn index_of(&self, trivia: &SyntaxTrivia) -> Option<usize> {
        let index = trivia.index();
        let (green, _) = self.green_at(index)?;
        (trivia.token() == self.token.as_ref()
            && trivia.is_leading() == self.leading
            && GreenNode::ptr_eq(green, trivia.green()))
        .then_some(index)
    }

    #[must_use]
    pub fn any(&self, kind: SyntaxKind) -> bool {
        (0..self.len()).any(|index| self.green_at(index).is_some_and(|(green, _)| green.kind() == kind))
    }

    /// The green encoding: a single trivia, a list, or `None`.
    #[must_use]
    pub fn green(&self) -> Option<&GreenNode> {
        self.green.as_ref()
    }

    #[must_use]
    pub fn full_width(&self) -> TextSize {
        self.green.as_ref().map_or(0, GreenNode::full_width)
    }

    #[must_use]
    pub fn full_span(&self) -> TextSpan {
        TextSpan::new(self.position, self.full_width())
    }

    #[must_use]
    pub fn to_full_string(&self) -> String {
        self.green.as_ref().map(GreenNode::to_full_string).unwrap_or_default()
    }

    fn greens(&self) -> Vec<GreenNode> {
        (0..self.len()).filter_map(|index| self.green_at(index).map(|(green, _)| green.clone())).collect()
    }

    fn edited(&self, edit: impl FnOnce(&mut Vec<GreenNode>)) -> Self {
        let mut elements = self.greens();
        edit(&mut elements);
        SyntaxTriviaList::from_greens(&elements)
    }

    fn require(&self, trivia: &SyntaxTrivia) -> Result<usize, EditError> {
        self.index_of(trivia).ok_or(EditError::MissingListItem {
            kind: trivia.kind(),
            span: trivia.span(),
        })
    }

    // =========================================================================
    // Edits (each returns a new, detached list)
    // =========================================================================

    #[must_use]
    pub fn add(&self, trivia: GreenNode) -> Self {
        self.insert(self.len(), trivia)
    }

    #[must_use]
    pub fn add_range(&self, trivia: Vec<GreenNode>) -> Self {
        self.insert_range(self.len(), trivia)
    }

    #[must_use]
    pub fn insert(&self, index: usize, trivia: GreenNode) -> Self {
        self.insert_range(index, vec![trivia])
    }

    /// # Panics
    ///
    /// Panics when `index > len()`.
    #[must_use]
    pub fn insert_range(&self, index: usize, trivia: Vec<GreenNode>) -> Self {
        assert!(index <= self.len(), "insert index {index} out of range ({})", self.len());
        self.edited(|elements| {
            elements.splice(index..index, trivia);
        })
    }

    /// # Panics
    ///
    /// Panics when `index >= len()`.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        assert!(index < self.len(), "remove index {index} out of range ({})", self.len());
        self.edited(|elements| {
            elements.remove(index);
        })
    }

    pub fn remove(&self, trivia: &SyntaxTrivia) -> Result<Self, EditError> {
        let index = self.require(trivia)?;
        Ok(self.remove_at(index))
    }

    pub fn replace(&self, trivia: &SyntaxTrivia, replacement: GreenNode) -> Result<Self, EditError> {
        self.replace_range(trivia, vec![replacement])
    }

    pub fn replace_range(&self, trivia: &SyntaxTrivia, replacements: Vec<GreenNode>) -> Result<Self, EditError> {
        let index = self.require(trivia)?;
        Ok(self.edited(|elements| {
            elements.splice(index..=index, replacements);
        }))
    }
}

impl fmt::Display for SyntaxTriviaList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_full_string())
    }
}

impl fmt::Debug for SyntaxTriviaList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
