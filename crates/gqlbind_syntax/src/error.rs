//! Errors raised while loading a schema.

use crate::markers::MarkerKind;
use gqlbind_core::{Diagnostic, SourceMap};
use miette::{LabeledSpan, NamedSource, SourceCode, SourceSpan};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One located problem inside a schema file.
#[derive(Debug, Error)]
#[error("{location}: {message}")]
pub struct SourceIssue {
    pub code: &'static str,
    /// `path:line:column`
    pub location: String,
    pub message: String,
    src: Option<NamedSource<String>>,
    labels: Vec<LabeledSpan>,
}

impl SourceIssue {
    /// Resolves a collected diagnostic against the loaded files.
    #[must_use]
    pub fn from_diagnostic(diagnostic: &Diagnostic, sources: &SourceMap) -> Self {
        let message = match &diagnostic.message {
            Some(message) => message.clone(),
            None => diagnostic.title.clone(),
        };
        let Some(file) = diagnostic.file else {
            return Self {
                code: diagnostic.code,
                location: "<schema>".to_string(),
                message,
                src: None,
                labels: Vec::new(),
            };
        };

        let source = sources.get(file);
        let location = diagnostic.primary_span().map_or_else(
            || source.name(),
            |span| sources.describe(span.in_file(file)),
        );
        let labels = diagnostic
            .labels
            .iter()
            .map(|label| LabeledSpan::new_with_span(Some(label.message.clone()), label.span))
            .collect();

        Self {
            code: diagnostic.code,
            location,
            message,
            src: Some(source.named_source()),
            labels,
        }
    }
}

impl miette::Diagnostic for SourceIssue {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.src.as_ref().map(|src| src as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.iter().cloned()))
        }
    }
}

/// Schema loading errors. Any of them aborts the run before output is written.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum SchemaParseError {
    #[error("failed to read schema file `{}`", path.display())]
    #[diagnostic(code(gqlbind::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error in `{file}`")]
    #[diagnostic(code(gqlbind::syntax))]
    Syntax {
        file: String,
        #[related]
        issues: Vec<SourceIssue>,
    },

    #[error("type `{name}` is declared more than once")]
    #[diagnostic(code(gqlbind::duplicate_type))]
    DuplicateType {
        name: String,
        /// Where the type was first declared.
        first: String,
        /// Where the type was declared again.
        second: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("declared again here")]
        span: SourceSpan,
        #[help]
        help: String,
    },

    #[error("invalid extension of `{name}`: {reason}")]
    #[diagnostic(code(gqlbind::invalid_extension))]
    InvalidExtension {
        name: String,
        reason: String,
        location: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("extended here")]
        span: SourceSpan,
    },

    #[error("schema is invalid: {} error(s)", issues.len())]
    #[diagnostic(code(gqlbind::invalid_schema))]
    Invalid {
        #[related]
        issues: Vec<SourceIssue>,
    },

    #[error("marker `{kind}` at {location} is not followed by any declaration")]
    #[diagnostic(
        code(gqlbind::dangling_marker),
        help("markers annotate the next declaration of the same file")
    )]
    DanglingMarker {
        kind: MarkerKind,
        location: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("dangling marker")]
        span: SourceSpan,
    },

    #[error("marker `{kind}` at {location} does not precede a type, field or enum value")]
    #[diagnostic(
        code(gqlbind::detached_marker),
        help("place the marker directly above the declaration it annotates")
    )]
    DetachedMarker {
        kind: MarkerKind,
        location: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this marker")]
        span: SourceSpan,
    },
}

impl SchemaParseError {
    /// Short machine-readable name of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Syntax { .. } => "syntax",
            Self::DuplicateType { .. } => "duplicate_type",
            Self::InvalidExtension { .. } => "invalid_extension",
            Self::Invalid { .. } => "invalid",
            Self::DanglingMarker { .. } => "dangling_marker",
            Self::DetachedMarker { .. } => "detached_marker",
        }
    }

    /// Located issues carried by `Syntax` and `Invalid`.
    #[must_use]
    pub fn issues(&self) -> &[SourceIssue] {
        match self {
            Self::Syntax { issues, .. } | Self::Invalid { issues } => issues,
            _ => &[],
        }
    }
}
