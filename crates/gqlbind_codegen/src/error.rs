//! Plugin-local errors. A failure aborts only the plugin that raised it.

use crate::plugin::Language;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, miette::Diagnostic)]
pub enum CodegenError {
    #[error("{language} cannot represent {construct}: {reason}")]
    #[diagnostic(code(gqlbind::codegen::unsupported))]
    UnsupportedConstruct {
        language: Language,
        construct: String,
        reason: String,
    },

    #[error("{language} template `{template}` failed: {message}")]
    #[diagnostic(code(gqlbind::codegen::template))]
    Template {
        language: Language,
        template: String,
        message: String,
    },

    #[error("failed to write `{}`", path.display())]
    #[diagnostic(code(gqlbind::codegen::write))]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedConstruct { .. } => "unsupported_construct",
            Self::Template { .. } => "template",
            Self::OutputWrite { .. } => "output_write",
        }
    }
}
