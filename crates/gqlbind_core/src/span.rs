//! Byte spans and file-qualified locations.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::source::FileId;

/// A half-open byte range inside one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    #[must_use]
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `pos`.
    #[must_use]
    #[inline]
    pub const fn empty(pos: u32) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[must_use]
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the text this span covers, or an empty string when out of range.
    #[must_use]
    pub fn slice<'s>(&self, text: &'s str) -> &'s str {
        text.get(self.start as usize..self.end as usize)
            .unwrap_or_default()
    }

    /// Qualifies this span with the file it belongs to.
    #[must_use]
    #[inline]
    pub const fn in_file(self, file: FileId) -> Location {
        Location { file, span: self }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        miette::SourceSpan::new(
            miette::SourceOffset::from(span.start as usize),
            span.len() as usize,
        )
    }
}

/// A span tagged with the file it points into.
///
/// Schemas are assembled from several SDL files, so anything that outlives a
/// single file's parse (type map entries, diagnostics about duplicates) carries
/// a `Location` instead of a bare [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    pub file: FileId,
    pub span: Span,
}
