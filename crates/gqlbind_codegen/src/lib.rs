//! Code generation for gqlbind.
//!
//! This crate renders an [`IrSchema`] into type bindings for:
//! - Kotlin (`Types.kt`)
//! - Swift (`Types.swift`)
//! - Dart (`types.dart`)
//! - TypeScript (`types.ts`)
//! - GDScript (`types.gd`)
//!
//! # Example
//!
//! ```ignore
//! use gqlbind_codegen::{CodeGenerator, Language};
//!
//! let generator = CodeGenerator::new(&ir, &tables);
//! let file = generator.generate(Language::Kotlin)?;
//! gqlbind_codegen::write_output("generated", &file)?;
//! ```

pub mod engine;
pub mod error;
pub mod plugin;
pub mod plugins;

pub use engine::{TemplateEngine, TemplateKind};
pub use error::CodegenError;
pub use plugin::{GenerationContext, Language, LanguagePlugin, ParseLanguageError};
pub use plugins::plugin_for;

use gqlbind_ir::{IrSchema, Tables};
use rayon::prelude::*;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Code generation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Render declarations and members marked `# Future`.
    pub include_future: bool,
    /// Emit the "generated, do not edit" header.
    pub header: bool,
    /// Package or module name for languages that declare one.
    pub package: Option<String>,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            include_future: true,
            header: true,
            package: None,
        }
    }
}

/// Number of declarations rendered per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub enums: usize,
    pub interfaces: usize,
    pub objects: usize,
    pub inputs: usize,
    pub unions: usize,
    pub operations: usize,
}

impl Summary {
    #[must_use]
    pub fn of(schema: &IrSchema) -> Self {
        Self {
            enums: schema.enums.len(),
            interfaces: schema.interfaces.len(),
            objects: schema.objects.len(),
            inputs: schema.inputs.len(),
            unions: schema.unions.len(),
            operations: schema.operations.iter().map(|op| op.fields.len()).sum(),
        }
    }

    /// Counts for one language's file. Inputs replaced by a custom type
    /// without a declaration are not emitted and not counted.
    #[must_use]
    pub fn for_language(schema: &IrSchema, tables: &Tables, language: Language) -> Self {
        let inputs = schema
            .inputs
            .iter()
            .filter(|input| {
                tables
                    .custom_input(&input.name, language.as_str())
                    .map_or(true, |custom| custom.declaration.is_some())
            })
            .count();
        Self {
            inputs,
            ..Self::of(schema)
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} enums, {} interfaces, {} objects, {} inputs, {} unions, {} operations",
            self.enums, self.interfaces, self.objects, self.inputs, self.unions, self.operations
        )
    }
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub language: Language,
    pub file_name: String,
    pub contents: String,
    pub summary: Summary,
}

/// Result of one plugin in a multi-language run.
#[derive(Debug)]
pub struct PluginOutcome {
    pub language: Language,
    pub result: Result<GeneratedFile, CodegenError>,
}

/// Main code generator.
pub struct CodeGenerator<'a> {
    schema: &'a IrSchema,
    tables: &'a Tables,
    options: CodegenOptions,
}

impl<'a> CodeGenerator<'a> {
    /// Creates a new code generator.
    pub fn new(schema: &'a IrSchema, tables: &'a Tables) -> Self {
        Self {
            schema,
            tables,
            options: CodegenOptions::default(),
        }
    }

    /// Sets code generation options.
    #[must_use]
    pub fn with_options(mut self, options: CodegenOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// The IR actually rendered, `Future` declarations removed on request.
    fn effective_schema(&self) -> Cow<'a, IrSchema> {
        if self.options.include_future {
            Cow::Borrowed(self.schema)
        } else {
            let excluded = self.schema.future_types();
            if !excluded.is_empty() {
                tracing::info!(types = ?excluded, "excluding future declarations");
            }
            Cow::Owned(self.schema.without_future())
        }
    }

    /// Generates code for the specified language.
    pub fn generate(&self, language: Language) -> Result<GeneratedFile, CodegenError> {
        let schema = self.effective_schema();
        self.render(language, &schema)
    }

    /// Generates every requested language in parallel. Outcomes keep the
    /// requested order and one failure does not stop the others.
    pub fn generate_all(&self, languages: &[Language]) -> Vec<PluginOutcome> {
        let schema = self.effective_schema();
        languages
            .par_iter()
            .map(|&language| PluginOutcome {
                language,
                result: self.render(language, &schema),
            })
            .collect()
    }

    fn render(&self, language: Language, schema: &IrSchema) -> Result<GeneratedFile, CodegenError> {
        let plugin = plugin_for(language);
        let ctx = GenerationContext {
            schema,
            tables: self.tables,
            options: &self.options,
        };
        let engine = TemplateEngine::new(plugin, ctx)?;
        let contents = plugin.emit_file(&engine)?;
        let summary = Summary::for_language(schema, self.tables, language);
        tracing::debug!(%language, bytes = contents.len(), "rendered");
        Ok(GeneratedFile {
            language,
            file_name: plugin.file_name().to_string(),
            contents,
            summary,
        })
    }
}

/// Writes `file` into `dir`, creating the directory if needed.
pub fn write_output(dir: impl AsRef<Path>, file: &GeneratedFile) -> Result<PathBuf, CodegenError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| CodegenError::OutputWrite {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(&file.file_name);
    std::fs::write(&path, &file.contents).map_err(|source| CodegenError::OutputWrite {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "wrote output");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codegen_options_default() {
        let options = CodegenOptions::default();
        assert!(options.include_future);
        assert!(options.header);
        assert!(options.package.is_none());
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary {
            enums: 2,
            objects: 3,
            ..Summary::default()
        };
        assert_eq!(
            summary.to_string(),
            "2 enums, 0 interfaces, 3 objects, 0 inputs, 0 unions, 0 operations"
        );
    }

    #[test]
    fn test_write_output_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = GeneratedFile {
            language: Language::Kotlin,
            file_name: "Types.kt".to_string(),
            contents: "enum class Color\n".to_string(),
            summary: Summary::default(),
        };
        let path = write_output(dir.path().join("nested/out"), &file).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "enum class Color\n");
    }
}
