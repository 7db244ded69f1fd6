//! Data structures and procedures for handling source locations.

use std::{fmt, ops::Range};

pub use source_map::{FileName, SourceFile, SourceFileIndex, SourceMap};

pub mod source_map;

/// A global byte index.
///
/// Here, "global" means relative to a [`SourceMap`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct ByteIndex(u32);

impl ByteIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Map a global byte index to a local one.
    pub fn local(self, file: &SourceFile) -> LocalByteIndex {
        LocalByteIndex::new(self.0 - file.span().start.0)
    }
}

impl std::ops::Add<u32> for ByteIndex {
    type Output = Self;

    fn add(self, offset: u32) -> Self::Output {
        Self(self.0 + offset)
    }
}

impl std::ops::Sub<u32> for ByteIndex {
    type Output = Self;

    fn sub(self, offset: u32) -> Self::Output {
        Self(self.0 - offset)
    }
}

/// A file-local byte index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct LocalByteIndex(u32);

impl LocalByteIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// Map a local byte index to a global one.
    pub fn global(self, file: &SourceFile) -> ByteIndex {
        ByteIndex::new(file.span().start.0 + self.0)
    }
}

impl std::ops::Add<u32> for LocalByteIndex {
    type Output = Self;

    fn add(self, offset: u32) -> Self::Output {
        Self(self.0 + offset)
    }
}

/// A global byte span of source code.
///
/// _Global_ means relative to a [`SourceMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    /// The start of the span, inclusive.
    start: ByteIndex,
    /// The end of the span, exclusive.
    end: ByteIndex,
}

impl Span {
    #[cfg_attr(debug_assertions, track_caller)]
    pub fn new(start: ByteIndex, end: ByteIndex) -> Self {
        debug_assert!(
            start <= end,
            "span start ({}) > span end ({})",
            start.0,
            end.0
        );

        Self { start, end }
    }

    /// Create an empty span at the given index.
    pub fn empty(index: ByteIndex) -> Self {
        Self::new(index, index)
    }

    pub fn with_length(start: ByteIndex, length: u32) -> Self {
        Self::new(start, ByteIndex(start.0 + length))
    }

    pub fn start(self) -> ByteIndex {
        self.start
    }

    pub fn end(self) -> ByteIndex {
        self.end
    }

    pub fn length(self) -> u32 {
        self.end.0 - self.start.0
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(self, index: ByteIndex) -> bool {
        self.start <= index && index <= self.end
    }

    /// Merge with a span to the right, yielding a span covering both.
    #[must_use]
    pub fn merge(self, other: impl PossiblySpanning) -> Self {
        match other.possible_span() {
            Some(other) => Self::new(self.start, other.end),
            None => self,
        }
    }

    pub fn local(self, file: &SourceFile) -> LocalSpan {
        LocalSpan::new(self.start.local(file), self.end.local(file))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

impl Spanning for Span {
    fn span(&self) -> Self {
        *self
    }
}

/// A span inside a single source file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LocalSpan {
    start: LocalByteIndex,
    end: LocalByteIndex,
}

impl LocalSpan {
    pub fn new(start: LocalByteIndex, end: LocalByteIndex) -> Self {
        debug_assert!(start <= end);

        Self { start, end }
    }

    pub fn empty(index: LocalByteIndex) -> Self {
        Self::new(index, index)
    }

    pub fn with_length(start: LocalByteIndex, length: u32) -> Self {
        Self::new(start, LocalByteIndex(start.0 + length))
    }

    pub fn start(self) -> LocalByteIndex {
        self.start
    }

    pub fn end(self) -> LocalByteIndex {
        self.end
    }

    pub fn set_end(&mut self, index: LocalByteIndex) {
        debug_assert!(self.start <= index);
        self.end = index;
    }

    pub fn global(self, file: &SourceFile) -> Span {
        Span::new(self.start.global(file), self.end.global(file))
    }
}

impl fmt::Debug for LocalSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

impl From<LocalSpan> for Range<usize> {
    fn from(span: LocalSpan) -> Self {
        span.start.0 as usize..span.end.0 as usize
    }
}

/// Convenience function for constructing a global span in test code.
pub fn span(start: u32, end: u32) -> Span {
    Span::new(ByteIndex::new(start), ByteIndex::new(end))
}

pub trait Spanning: PossiblySpanning {
    fn span(&self) -> Span;
}

impl<S: Spanning> Spanning for &S {
    fn span(&self) -> Span {
        (**self).span()
    }
}

pub trait PossiblySpanning {
    fn possible_span(&self) -> Option<Span>;
}

impl<S: Spanning> PossiblySpanning for S {
    fn possible_span(&self) -> Option<Span> {
        Some(self.span())
    }
}

impl<S: Spanning> PossiblySpanning for Option<S> {
    fn possible_span(&self) -> Option<Span> {
        self.as_ref().map(Spanning::span)
    }
}

impl<S: Spanning> PossiblySpanning for Vec<S> {
    fn possible_span(&self) -> Option<Span> {
        self.first()
            .map(|first| first.span().merge(self.last().map(Spanning::span)))
    }
}

/// A value with a source location attached.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spanned<Bare> {
    pub bare: Bare,
    pub span: Span,
}

impl<Bare> Spanned<Bare> {
    pub const fn new(span: Span, bare: Bare) -> Self {
        Self { bare, span }
    }

    /// Attach the unknown location.
    pub fn bare(bare: Bare) -> Self {
        Self::new(Span::default(), bare)
    }

    pub fn map<U>(self, mapper: impl FnOnce(Bare) -> U) -> Spanned<U> {
        Spanned::new(self.span, mapper(self.bare))
    }

    pub const fn as_ref(&self) -> Spanned<&Bare> {
        Spanned::new(self.span, &self.bare)
    }
}

impl<Bare> Spanning for Spanned<Bare> {
    fn span(&self) -> Span {
        self.span
    }
}

impl<Bare: fmt::Debug> fmt::Debug for Spanned<Bare> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?}", self.bare, self.span)
    }
}

impl<Bare: fmt::Display> fmt::Display for Spanned<Bare> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bare.fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn merge_spans() {
        assert_eq!(span(1, 4).merge(span(6, 9)), span(1, 9));
    }

    #[test]
    fn merge_with_nothing() {
        assert_eq!(span(1, 4).merge(None::<Span>), span(1, 4));
    }

    #[test]
    fn default_span_is_unknown_location() {
        assert_eq!(Span::default(), span(0, 0));
    }

    #[test]
    fn possible_span_of_vector() {
        let spans = vec![span(2, 3), span(5, 8), span(9, 10)];
        assert_eq!(spans.possible_span(), Some(span(2, 10)));
    }
}
