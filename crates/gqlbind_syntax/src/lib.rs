//! Syntax layer for gqlbind.
//!
//! This crate provides:
//! - `token`: Token kinds and token structures
//! - `lexer`: Tokenization
//! - `ast`: Abstract syntax tree types
//! - `parser`: Recursive descent parser for one SDL file
//! - `markers`: Comment marker line scanner
//! - `schema`: Multi-file loading, merging and validation

pub mod ast;
pub mod error;
pub mod lexer;
pub mod markers;
pub mod parser;
pub mod schema;
pub mod token;

pub use ast::*;
pub use error::{SchemaParseError, SourceIssue};
pub use lexer::Lexer;
pub use markers::{DanglingMarker, Marker, MarkerKind, MarkerTable};
pub use parser::{parse as parse_document, ParseResult};
pub use schema::{parse, parse_sources, ParsedSchema, SchemaType, TypeExtension};
pub use token::{DirectiveLocation, Token, TokenKind};
