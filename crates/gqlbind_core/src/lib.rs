//! Core utilities for gqlbind.
//!
//! This crate provides foundational types used throughout gqlbind:
//! - `span`: Byte spans and file-qualified locations
//! - `source`: Loaded SDL files and line lookup
//! - `text`: String interning
//! - `diagnostics`: Error collection
//! - `case`: Identifier case conversion
//! - `keywords`: Reserved words and identifier escaping

pub mod case;
pub mod diagnostics;
pub mod keywords;
pub mod source;
pub mod span;
pub mod text;

pub use case::Case;
pub use diagnostics::{Diagnostic, DiagnosticBag, Label};
pub use keywords::EscapeStyle;
pub use source::{FileId, SourceFile, SourceMap};
pub use span::{Location, Span};
pub use text::{Interner, Text, BUILTIN_SCALARS};
