//! Source spans and text edits.
//!
//! All positions are UTF-8 byte offsets into the source text. A syntax tree
//! never stores absolute positions in its shared layer; spans are computed by
//! the positioned layer and handed out as plain `TextSpan` values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A byte offset or length in source text.
pub type TextSize = u32;

/// A half-open range `[start, start + length)` of source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: TextSize,
    pub length: TextSize,
}

impl TextSpan {
    /// Create a span from a start offset and a length.
    #[inline]
    #[must_use]
    pub const fn new(start: TextSize, length: TextSize) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end offsets.
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    #[inline]
    #[must_use]
    pub fn from_bounds(start: TextSize, end: TextSize) -> Self {
        assert!(end >= start, "span end {end} precedes start {start}");
        Self {
            start,
            length: end - start,
        }
    }

    /// An empty span at `position`.
    #[inline]
    #[must_use]
    pub const fn empty(position: TextSize) -> Self {
        Self {
            start: position,
            length: 0,
        }
    }

    /// Exclusive end offset.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> TextSize {
        self.start + self.length
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// True when `position` lies inside the span (end exclusive).
    #[inline]
    #[must_use]
    pub const fn contains(&self, position: TextSize) -> bool {
        position >= self.start && position < self.end()
    }

    /// True when `other` lies entirely inside this span.
    #[inline]
    #[must_use]
    pub const fn contains_span(&self, other: TextSpan) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// True when the spans share at least one position.
    ///
    /// Empty spans never overlap anything.
    #[inline]
    #[must_use]
    pub fn overlaps_with(&self, other: TextSpan) -> bool {
        self.start.max(other.start) < self.end().min(other.end())
    }

    /// True when the spans overlap or touch (an empty span at a boundary
    /// intersects).
    #[inline]
    #[must_use]
    pub const fn intersects_with(&self, other: TextSpan) -> bool {
        other.start <= self.end() && other.end() >= self.start
    }

    /// True when `position` lies inside the span or at its end.
    #[inline]
    #[must_use]
    pub const fn intersects_with_position(&self, position: TextSize) -> bool {
        position >= self.start && position <= self.end()
    }

    /// The overlapping portion of two spans, if they intersect.
    #[must_use]
    pub fn intersection(&self, other: TextSpan) -> Option<TextSpan> {
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        (start <= end).then(|| TextSpan::from_bounds(start, end))
    }

    /// The smallest span covering both spans.
    #[must_use]
    pub fn cover(&self, other: TextSpan) -> TextSpan {
        TextSpan::from_bounds(self.start.min(other.start), self.end().max(other.end()))
    }

    /// Byte range usable for slicing source text.
    #[inline]
    #[must_use]
    pub const fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{})", self.start, self.end())
    }
}

/// The shape of an edit: a replaced span of old text and the length of the
/// text that replaces it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextChangeRange {
    pub span: TextSpan,
    pub new_length: TextSize,
}

impl TextChangeRange {
    #[inline]
    #[must_use]
    pub const fn new(span: TextSpan, new_length: TextSize) -> Self {
        Self { span, new_length }
    }

    /// True when the range neither removes nor inserts anything.
    #[inline]
    #[must_use]
    pub const fn is_no_change(&self) -> bool {
        self.span.length == 0 && self.new_length == 0
    }
}

/// A single text replacement: `span` of the old text is replaced by `new_text`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextChange {
    pub span: TextSpan,
    pub new_text: String,
}

impl TextChange {
    #[must_use]
    pub fn new(span: TextSpan, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    /// The edit shape without its text.
    #[must_use]
    pub fn range(&self) -> TextChangeRange {
        TextChangeRange::new(self.span, self.new_text.len() as TextSize)
    }
}

impl fmt::Display for TextChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {:?}", self.span, self.new_text)
    }
}

/// Apply ordered, non-overlapping changes to `text`.
///
/// # Panics
///
/// Panics if the changes are out of order, overlap, or reach past the end of
/// `text`.
#[must_use]
pub fn apply_text_changes(text: &str, changes: &[TextChange]) -> String {
    let grown: usize = changes.iter().map(|c| c.new_text.len()).sum();
    let mut result = String::with_capacity(text.len() + grown);
    let mut cursor = 0usize;
    for change in changes {
        let range = change.span.to_range();
        assert!(
            range.start >= cursor,
            "text change {change} overlaps or precedes the previous change"
        );
        assert!(
            range.end <= text.len(),
            "text change {change} reaches past the end of the text ({})",
            text.len()
        );
        result.push_str(&text[cursor..range.start]);
        result.push_str(&change.new_text);
        cursor = range.end;
    }
    result.push_str(&text[cursor..]);
    result
}
