//! Intermediate representation for gqlbind.
//!
//! This crate provides:
//! - `ir`: The language-agnostic IR consumed by every plugin
//! - `tables`: Injected lookup tables (legacy aliases, platform defaults, custom inputs)
//! - `transform`: Schema to IR transformation
//!
//! # Example
//!
//! ```no_run
//! use gqlbind_ir::{transform, Tables};
//!
//! let (schema, markers) = gqlbind_syntax::parse(&["schema.graphql"])?;
//! let ir = transform(&schema, &markers, &Tables::default())?;
//! println!("{}", serde_json::to_string_pretty(&ir)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod ir;
pub mod tables;
pub mod transform;

pub use error::TransformError;
pub use ir::*;
pub use tables::{CustomInputType, Tables, TablesError, DEFAULT_ERROR_CODE_ENUM};
pub use transform::transform;
