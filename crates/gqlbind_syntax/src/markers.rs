//! Comment markers.
//!
//! GraphQL comments never reach the AST, so markers are recovered by a
//! separate line scan over the raw text. The scan yields a table keyed by
//! `(file, line)` of the declaration each marker annotates; the AST walk only
//! ever looks markers up by declaration position.
//!
//! Vocabulary (case-insensitive, whole-line `#` comments):
//!
//! ```graphql
//! # => Union
//! type PurchaseResult { success: PurchaseSuccess error: PurchaseError }
//!
//! # Future
//! type Subscription { ... }
//! ```

use gqlbind_core::{FileId, SourceFile, Span};
use std::collections::BTreeMap;

/// What a marker says about the declaration it precedes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkerKind {
    /// `# => Union`: the object type is a discriminated union wrapper.
    UnionWrapper,
    /// `# Future`: the declaration is forthcoming and may be excluded.
    Future,
}

impl MarkerKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnionWrapper => "=> Union",
            Self::Future => "Future",
        }
    }

    /// Recognises a marker in the body of a `#` comment (text after `#`).
    #[must_use]
    pub fn from_comment(body: &str) -> Option<Self> {
        let body = body.trim_start();
        if let Some(rest) = body.strip_prefix("=>") {
            return keyword(rest.trim_start(), "union").then_some(Self::UnionWrapper);
        }
        keyword(body, "future").then_some(Self::Future)
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `text` starts with `word` (ASCII case-insensitive) and the word ends there.
fn keyword(text: &str, word: &str) -> bool {
    let Some(head) = text.get(..word.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(word)
        && !text[word.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// A marker attached to a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub file: FileId,
    /// 1-based line of the comment.
    pub comment_line: u32,
    /// 1-based line the marker annotates.
    pub target_line: u32,
    /// Span of the comment text.
    pub span: Span,
}

/// A marker with no following declaration in its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingMarker {
    pub kind: MarkerKind,
    pub line: u32,
    pub span: Span,
}

/// Markers of a whole schema, keyed by annotated line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerTable {
    entries: BTreeMap<(FileId, u32), Vec<Marker>>,
}

impl MarkerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, marker: Marker) {
        self.entries
            .entry((marker.file, marker.target_line))
            .or_default()
            .push(marker);
    }

    /// Markers annotating `line` of `file`.
    #[must_use]
    pub fn get(&self, file: FileId, line: u32) -> &[Marker] {
        self.entries
            .get(&(file, line))
            .map_or(&[], Vec::as_slice)
    }

    /// Markers for the declaration starting at `offset` of `source`.
    ///
    /// A marked line annotates only the declaration that opens it, so members
    /// written on the same line as their type (`enum A { X Y }`) never
    /// inherit the type's markers.
    #[must_use]
    pub fn for_declaration(&self, source: &SourceFile, offset: u32) -> &[Marker] {
        if !opens_line(source, offset) {
            return &[];
        }
        self.get(source.id(), source.line_of(offset))
    }

    #[must_use]
    pub fn has(&self, source: &SourceFile, offset: u32, kind: MarkerKind) -> bool {
        self.for_declaration(source, offset)
            .iter()
            .any(|m| m.kind == kind)
    }

    /// Iterates markers in file and line order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.entries.values().flatten()
    }

    /// Iterates the annotated `(file, line)` keys.
    pub fn lines(&self) -> impl Iterator<Item = (FileId, u32)> + '_ {
        self.entries.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether only whitespace precedes `offset` on its line.
#[must_use]
pub fn opens_line(source: &SourceFile, offset: u32) -> bool {
    let (line, col) = source.line_col(offset);
    source
        .line_text(line)
        .get(..(col - 1) as usize)
        .is_some_and(|prefix| prefix.trim().is_empty())
}

/// Scans one file for markers.
///
/// Each marker attaches to the next non-blank, non-comment line. Markers
/// still pending at end of file are returned as the error; they are never
/// carried into the next file.
pub fn scan(source: &SourceFile) -> Result<Vec<Marker>, Vec<DanglingMarker>> {
    let mut markers = Vec::new();
    let mut pending: Vec<(MarkerKind, u32, Span)> = Vec::new();
    let mut in_block_string = false;
    let mut offset = 0u32;

    for (line, text) in source.lines() {
        let line_start = offset;
        offset = source
            .text()
            .get(line_start as usize..)
            .and_then(|rest| memchr::memchr(b'\n', rest.as_bytes()))
            .map_or(source.text().len() as u32, |i| line_start + i as u32 + 1);

        let trimmed = text.trim_start();

        if in_block_string {
            in_block_string ^= toggles_block_string(text);
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        if let Some(body) = trimmed.strip_prefix('#') {
            if let Some(kind) = MarkerKind::from_comment(body) {
                let indent = (text.len() - trimmed.len()) as u32;
                let span = Span::new(line_start + indent, line_start + text.len() as u32);
                pending.push((kind, line, span));
            }
            continue;
        }

        in_block_string = toggles_block_string(text);
        flush(&mut pending, &mut markers, source.id(), line);
    }

    if pending.is_empty() {
        Ok(markers)
    } else {
        Err(pending
            .into_iter()
            .map(|(kind, line, span)| DanglingMarker { kind, line, span })
            .collect())
    }
}

fn flush(
    pending: &mut Vec<(MarkerKind, u32, Span)>,
    markers: &mut Vec<Marker>,
    file: FileId,
    target_line: u32,
) {
    markers.extend(pending.drain(..).map(|(kind, comment_line, span)| Marker {
        kind,
        file,
        comment_line,
        target_line,
        span,
    }));
}

/// An odd number of unescaped `"""` on a line opens or closes a block string.
fn toggles_block_string(line: &str) -> bool {
    let code = line.split_once(" #").map_or(line, |(code, _)| code);
    let count = code
        .matches("\"\"\"")
        .count()
        .saturating_sub(code.matches("\\\"\"\"").count());
    count % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(text: &str) -> SourceFile {
        SourceFile::new("test.graphql", text)
    }

    #[test]
    fn test_vocabulary_is_case_insensitive() {
        assert_eq!(MarkerKind::from_comment(" => Union"), Some(MarkerKind::UnionWrapper));
        assert_eq!(MarkerKind::from_comment("=>union"), Some(MarkerKind::UnionWrapper));
        assert_eq!(MarkerKind::from_comment(" FUTURE"), Some(MarkerKind::Future));
        assert_eq!(MarkerKind::from_comment(" future: not yet shipped"), Some(MarkerKind::Future));
        assert_eq!(MarkerKind::from_comment(" Futures market"), None);
        assert_eq!(MarkerKind::from_comment(" => Unions"), None);
        assert_eq!(MarkerKind::from_comment(" regular comment"), None);
    }

    #[test]
    fn test_marker_attaches_to_next_declaration_line() {
        let source = file("# => Union\ntype Foo { a: A }\n");
        let markers = scan(&source).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, MarkerKind::UnionWrapper);
        assert_eq!(markers[0].comment_line, 1);
        assert_eq!(markers[0].target_line, 2);
    }

    #[test]
    fn test_blank_lines_and_comments_do_not_break_association() {
        let source = file("# => Union\n\n# plain comment\n   \ntype Foo { a: A }\n");
        let markers = scan(&source).unwrap();
        assert_eq!(markers[0].target_line, 5);
    }

    #[test]
    fn test_stacked_markers_share_target() {
        let source = file("# Future\n# => Union\ntype Foo { a: A }");
        let markers = scan(&source).unwrap();
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| m.target_line == 3));
    }

    #[test]
    fn test_dangling_marker_at_end_of_file() {
        let source = file("type A { a: Int }\n# Future\n\n");
        let dangling = scan(&source).unwrap_err();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].line, 2);
        assert_eq!(dangling[0].span.slice(source.text()), "# Future");
    }

    #[test]
    fn test_comments_inside_block_strings_are_not_markers() {
        let source = file("\"\"\"\n# Future\n\"\"\"\ntype A { a: Int }\n");
        let markers = scan(&source).unwrap();
        assert!(markers.is_empty());
    }

    #[test]
    fn test_table_lookup_requires_line_opening_declaration() {
        let source = file("# Future\nenum A { X Y }\n");
        let mut table = MarkerTable::new();
        for marker in scan(&source).unwrap() {
            table.insert(marker);
        }
        let enum_start = source.text().find("enum").unwrap() as u32;
        let x_start = source.text().find('X').unwrap() as u32;
        assert!(table.has(&source, enum_start, MarkerKind::Future));
        assert!(!table.has(&source, x_start, MarkerKind::Future));
        assert_eq!(table.len(), 1);
    }
}
