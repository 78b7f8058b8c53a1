//! Source files and line lookup.

use crate::span::{Location, Span};
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a file inside a [`SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileId(u32);

impl FileId {
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

/// One SDL input with a precomputed line table.
#[derive(Debug, Clone)]
pub struct SourceFile {
    id: FileId,
    path: PathBuf,
    text: String,
    /// Byte offset of the first character of every line.
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Creates a source file. The id is reassigned when it is added to a map.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| i as u32 + 1));
        Self {
            id: FileId(0),
            path: path.into(),
            text,
            line_starts,
        }
    }

    #[must_use]
    pub fn id(&self) -> FileId {
        self.id
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Display name used in diagnostics.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines, counting a trailing line without newline.
    #[must_use]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// 1-based line number containing `offset`.
    #[must_use]
    pub fn line_of(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index as u32 + 1,
            Err(index) => index as u32,
        }
    }

    /// 1-based `(line, column)` of `offset`, column counted in bytes.
    #[must_use]
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line_of(offset);
        let start = self.line_starts[(line - 1) as usize];
        (line, offset - start + 1)
    }

    /// Text of a 1-based line without its line terminator.
    #[must_use]
    pub fn line_text(&self, line: u32) -> &str {
        let Some(&start) = self.line_starts.get(line.wrapping_sub(1) as usize) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line as usize)
            .map_or(self.text.len(), |&next| next as usize - 1);
        self.text[start as usize..end].trim_end_matches('\r')
    }

    /// Iterates `(line number, line text)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> {
        (1..=self.line_count()).map(|line| (line, self.line_text(line)))
    }

    /// Source wrapper for rendering miette reports.
    #[must_use]
    pub fn named_source(&self) -> miette::NamedSource<String> {
        miette::NamedSource::new(self.name(), self.text.clone())
    }
}

/// Ordered collection of loaded source files.
#[derive(Debug, Default, Clone)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file and returns its id. Files keep insertion order.
    pub fn add(&mut self, mut file: SourceFile) -> FileId {
        let id = FileId(self.files.len() as u32);
        file.id = id;
        self.files.push(file);
        id
    }

    /// Gets a file by id.
    ///
    /// # Panics
    ///
    /// Panics when the id was not produced by this map.
    #[must_use]
    pub fn get(&self, id: FileId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Formats a location as `path:line:column`.
    #[must_use]
    pub fn describe(&self, location: Location) -> String {
        let file = self.get(location.file);
        let (line, col) = file.line_col(location.span.start);
        format!("{}:{line}:{col}", file.name())
    }

    /// Line number of a span's start.
    #[must_use]
    pub fn line_of(&self, file: FileId, span: Span) -> u32 {
        self.get(file).line_of(span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lookup() {
        let file = SourceFile::new("a.graphql", "type A {\n  id: ID\n}\n");
        assert_eq!(file.line_of(0), 1);
        assert_eq!(file.line_of(9), 2);
        assert_eq!(file.line_col(11), (2, 3));
        assert_eq!(file.line_text(2), "  id: ID");
        assert_eq!(file.line_text(3), "}");
        assert_eq!(file.line_text(99), "");
    }

    #[test]
    fn test_crlf_lines() {
        let file = SourceFile::new("a.graphql", "# Future\r\ntype A\r\n");
        let lines: Vec<_> = file.lines().collect();
        assert_eq!(lines[0], (1, "# Future"));
        assert_eq!(lines[1], (2, "type A"));
    }

    #[test]
    fn test_source_map_ids_follow_insertion_order() {
        let mut map = SourceMap::new();
        let a = map.add(SourceFile::new("a.graphql", "type A"));
        let b = map.add(SourceFile::new("b.graphql", "\ntype B"));
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
        assert_eq!(map.get(b).id(), b);
        assert_eq!(map.describe(Span::new(1, 5).in_file(b)), "b.graphql:2:1");
    }
}
