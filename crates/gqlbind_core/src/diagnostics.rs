//! Diagnostic collection for the parse and validation passes.

use crate::source::FileId;
use crate::span::Span;

/// A span with the message shown under it.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// One schema error. Every diagnostic aborts the run, so there is no
/// severity.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Stable code, see [`codes`].
    pub code: &'static str,
    /// Short title.
    pub title: String,
    /// Detailed message.
    pub message: Option<String>,
    /// File the labels point into, when known.
    pub file: Option<FileId>,
    pub labels: Vec<Label>,
}

impl Diagnostic {
    pub fn error(code: &'static str, title: impl Into<String>) -> Self {
        Self {
            code,
            title: title.into(),
            message: None,
            file: None,
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message));
        self
    }

    #[must_use]
    pub fn in_file(mut self, file: FileId) -> Self {
        self.file = Some(file);
        self
    }

    /// Returns the primary span, if any.
    #[must_use]
    pub fn primary_span(&self) -> Option<Span> {
        self.labels.first().map(|l| l.span)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.title)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// A collection of diagnostics.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Adds an error with a single primary label.
    pub fn error(
        &mut self,
        code: &'static str,
        title: impl Into<String>,
        span: Span,
        message: impl Into<String>,
    ) {
        self.add(Diagnostic::error(code, title).with_span(span, message));
    }

    /// Moves every diagnostic of `other` into this bag, tagging untagged ones
    /// with `file`.
    pub fn absorb(&mut self, other: DiagnosticBag, file: FileId) {
        self.diagnostics
            .extend(other.diagnostics.into_iter().map(|mut d| {
                d.file.get_or_insert(file);
                d
            }));
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Diagnostic codes.
pub mod codes {
    pub const UNEXPECTED_TOKEN: &str = "E0001";
    pub const UNEXPECTED_EOF: &str = "E0002";
    pub const INVALID_SYNTAX: &str = "E0003";
    pub const UNTERMINATED_STRING: &str = "E0004";
    pub const UNDEFINED_TYPE: &str = "E0010";
    pub const DUPLICATE_TYPE: &str = "E0012";
    pub const DUPLICATE_FIELD: &str = "E0013";
    pub const DUPLICATE_ENUM_VALUE: &str = "E0014";
    pub const INVALID_EXTENSION: &str = "E0015";
    pub const DUPLICATE_SCHEMA: &str = "E0016";
    pub const DUPLICATE_ARGUMENT: &str = "E0017";
    pub const DUPLICATE_MEMBER: &str = "E0018";
    pub const EMPTY_TYPE: &str = "E0019";
    pub const WRONG_TYPE_KIND: &str = "E0020";
    pub const INPUT_CYCLE: &str = "E0021";
    pub const DANGLING_MARKER: &str = "E0040";
    pub const DETACHED_MARKER: &str = "E0041";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_records_primary_label() {
        let mut bag = DiagnosticBag::new();
        assert!(!bag.has_errors());
        bag.error(codes::INVALID_SYNTAX, "bad", Span::new(4, 10), "details");

        assert!(bag.has_errors());
        assert_eq!(bag.len(), 1);
        let diag = bag.iter().next().unwrap();
        assert_eq!(diag.primary_span(), Some(Span::new(4, 10)));
        assert_eq!(diag.labels[0].message, "details");
    }

    #[test]
    fn test_absorb_tags_file() {
        let mut inner = DiagnosticBag::new();
        inner.error(codes::UNEXPECTED_TOKEN, "t", Span::new(0, 1), "m");
        let mut outer = DiagnosticBag::new();
        outer.absorb(inner, FileId::from_raw(2));
        let diag = outer.iter().next().unwrap();
        assert_eq!(diag.file, Some(FileId::from_raw(2)));
        assert_eq!(diag.to_string(), "[E0001] t");
    }
}
