//! The language plugin contract.
//!
//! A plugin is a stateless value that answers language questions (how to
//! spell a scalar, an optional, a doc comment) and ships one template per IR
//! node kind. Everything structural lives in the templates; everything
//! lexical lives here and reaches the templates as helpers.

use crate::engine::{TemplateEngine, TemplateKind};
use crate::error::CodegenError;
use crate::CodegenOptions;
use gqlbind_core::case::{pascal_case, Case};
use gqlbind_core::{keywords, EscapeStyle};
use gqlbind_ir::{
    IrEnum, IrInput, IrInterface, IrNamedType, IrObject, IrOperation, IrScalar, IrSchema, IrType,
    IrUnion, IrValue, NamedKind, Tables, UnionKind,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Kotlin,
    Swift,
    Dart,
    TypeScript,
    GDScript,
}

impl Language {
    pub const ALL: [Self; 5] = [
        Self::Kotlin,
        Self::Swift,
        Self::Dart,
        Self::TypeScript,
        Self::GDScript,
    ];

    /// Identifier used on the command line and as the key of every table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kotlin => "kotlin",
            Self::Swift => "swift",
            Self::Dart => "dart",
            Self::TypeScript => "typescript",
            Self::GDScript => "gdscript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language `{0}` (expected one of kotlin, swift, dart, typescript, gdscript)")]
pub struct ParseLanguageError(pub String);

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kotlin" | "kt" => Ok(Self::Kotlin),
            "swift" => Ok(Self::Swift),
            "dart" => Ok(Self::Dart),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "gdscript" | "gd" | "godot" => Ok(Self::GDScript),
            _ => Err(ParseLanguageError(s.to_string())),
        }
    }
}

/// Everything a plugin may read while rendering.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub schema: &'a IrSchema,
    pub tables: &'a Tables,
    pub options: &'a CodegenOptions,
}

/// Data handed to the `file` template.
#[derive(Debug, Serialize)]
pub struct FileView<'a> {
    pub language: Language,
    pub file_name: &'static str,
    pub header: bool,
    pub package: Option<&'a str>,
    pub generator: &'a str,
    pub version: &'a str,
    pub sources: &'a [String],
    /// Rendered declarations in IR order.
    pub body: String,
}

/// Per-language rendering contract.
pub trait LanguagePlugin: Send + Sync {
    fn language(&self) -> Language;

    /// Name of the single generated file.
    fn file_name(&self) -> &'static str;

    fn reserved_words(&self) -> &'static [&'static str];

    fn escape_style(&self) -> EscapeStyle;

    fn indent_unit(&self) -> &'static str {
        "    "
    }

    /// Convention for field, argument and operation names.
    fn field_case(&self) -> Case {
        Case::Preserve
    }

    /// Convention for enum cases and legacy aliases.
    fn enum_case(&self) -> Case;

    /// Native spelling of a built-in GraphQL scalar.
    fn map_scalar(&self, name: &str) -> Option<&'static str>;

    /// Wraps `token` (the spelling of `ty` without its nullability) so it
    /// reads as required or optional.
    fn nullability_syntax(&self, ty: &IrType, token: String) -> String;

    /// Spells a list whose elements are `element`, already rendered as `token`.
    fn list_syntax(&self, element: &IrType, token: String) -> String;

    /// Doc comment for `text`, one output line per input line, each prefixed
    /// with `indent` and terminated by a newline.
    fn doc_comment(&self, text: &str, indent: &str) -> String;

    /// Attribute or comment marking a deprecated declaration, newline-terminated.
    fn deprecation_attribute(&self, reason: &str, indent: &str) -> String;

    fn templates(&self) -> &'static [(TemplateKind, &'static str)];

    fn escape_identifier(&self, name: &str) -> String {
        keywords::escape(name, self.reserved_words(), self.escape_style())
    }

    fn type_name(&self, name: &str) -> String {
        self.escape_identifier(name)
    }

    fn field_name(&self, name: &str) -> String {
        self.escape_identifier(&self.field_case().apply(name))
    }

    fn enum_case_name(&self, name: &str) -> String {
        self.escape_identifier(&self.enum_case().apply(name))
    }

    /// Identifier of one union variant.
    fn variant_name(&self, member: &str) -> String {
        self.escape_identifier(&pascal_case(member))
    }

    /// Spelling of a reference to a scalar declared in the schema.
    fn custom_scalar(&self, name: &str) -> String {
        self.type_name(name)
    }

    fn scalar_type(&self, name: &str) -> String {
        self.map_scalar(name)
            .map_or_else(|| self.type_name(name), str::to_string)
    }

    /// Spelling of a named type. Inputs with a custom override resolve to
    /// the override's name.
    fn named_type(&self, named: &IrNamedType, ctx: GenerationContext<'_>) -> String {
        match named.kind {
            NamedKind::Input => ctx
                .tables
                .custom_input(&named.name, self.language().as_str())
                .map_or_else(|| self.type_name(&named.name), |custom| custom.type_name.clone()),
            NamedKind::Scalar => self.custom_scalar(&named.name),
            _ => self.type_name(&named.name),
        }
    }

    /// Full type reference, nullability included at every level.
    fn type_ref(&self, ty: &IrType, ctx: GenerationContext<'_>) -> String {
        let token = match ty.strip_non_null() {
            IrType::List(element) => self.list_syntax(element, self.type_ref(element, ctx)),
            IrType::Named(named) => self.named_type(named, ctx),
            IrType::Scalar(_) | IrType::NonNull(_) => self.scalar_type(ty.name()),
        };
        self.nullability_syntax(ty, token)
    }

    fn string_literal(&self, value: &str) -> String {
        quote(value, '"', false)
    }

    fn float_literal(&self, value: f64) -> String {
        format!("{value:?}")
    }

    fn null_literal(&self) -> &'static str {
        "null"
    }

    fn enum_literal(&self, type_name: &str, case: &str) -> String {
        format!("{type_name}.{case}")
    }

    fn list_literal(&self, items: Vec<String>) -> String {
        format!("[{}]", items.join(", "))
    }

    /// Literal constructing an input object. `None` when the language has
    /// no expression form for it.
    fn object_literal(&self, type_name: &str, fields: Vec<(String, String)>) -> Option<String>;

    /// Renders a default value as a literal of type `ty`.
    fn render_value(
        &self,
        value: &IrValue,
        ty: &IrType,
        ctx: GenerationContext<'_>,
    ) -> Option<String> {
        Some(match value {
            IrValue::Null => self.null_literal().to_string(),
            IrValue::Int(v) if ty.name() == "Float" => self.float_literal(*v as f64),
            IrValue::Int(v) => v.to_string(),
            IrValue::Float(v) => self.float_literal(*v),
            IrValue::String(s) => self.string_literal(s),
            IrValue::Boolean(b) => b.to_string(),
            IrValue::Enum(case) => {
                self.enum_literal(&self.type_name(ty.name()), &self.enum_case_name(case))
            }
            IrValue::List(items) => {
                let element = match ty.strip_non_null() {
                    IrType::List(element) => element.as_ref(),
                    other => other,
                };
                let items = items
                    .iter()
                    .map(|item| self.render_value(item, element, ctx))
                    .collect::<Option<Vec<_>>>()?;
                self.list_literal(items)
            }
            IrValue::Object(fields) => {
                let named = ty.named_type()?;
                if ctx
                    .tables
                    .custom_input(&named.name, self.language().as_str())
                    .is_some()
                {
                    return None;
                }
                let input = ctx.schema.find_input(&named.name)?;
                // Declaration order, so positional constructors line up.
                let fields = input
                    .fields
                    .iter()
                    .filter_map(|field| fields.get(&field.name).map(|value| (field, value)))
                    .map(|(field, value)| {
                        Some((
                            self.field_name(&field.name),
                            self.render_value(value, &field.ty, ctx)?,
                        ))
                    })
                    .collect::<Option<Vec<_>>>()?;
                return self.object_literal(&self.named_type(named, ctx), fields);
            }
        })
    }

    fn emit_scalar(
        &self,
        engine: &TemplateEngine<'_>,
        node: &IrScalar,
    ) -> Result<String, CodegenError> {
        engine.render(TemplateKind::Scalar, node)
    }

    fn emit_enum(&self, engine: &TemplateEngine<'_>, node: &IrEnum) -> Result<String, CodegenError> {
        let cases = node
            .values
            .iter()
            .map(|v| (v.name.as_str(), self.enum_case_name(&v.name)))
            .chain(
                node.aliases
                    .iter()
                    .map(|a| (a.name.as_str(), self.enum_case_name(&a.name))),
            );
        ensure_distinct(self.language(), || format!("enum `{}`", node.name), cases)?;
        engine.render(TemplateKind::Enum, node)
    }

    fn emit_interface(
        &self,
        engine: &TemplateEngine<'_>,
        node: &IrInterface,
    ) -> Result<String, CodegenError> {
        let fields = node
            .fields
            .iter()
            .map(|f| (f.name.as_str(), self.field_name(&f.name)));
        ensure_distinct(self.language(), || format!("interface `{}`", node.name), fields)?;
        engine.render(TemplateKind::Interface, node)
    }

    fn emit_object(
        &self,
        engine: &TemplateEngine<'_>,
        node: &IrObject,
    ) -> Result<String, CodegenError> {
        let fields = node
            .fields
            .iter()
            .map(|f| (f.name.as_str(), self.field_name(&f.name)));
        ensure_distinct(self.language(), || format!("object `{}`", node.name), fields)?;
        engine.render(TemplateKind::Object, node)
    }

    /// Inputs with a custom override emit the override's declaration
    /// verbatim, or nothing when it has none.
    fn emit_input(&self, engine: &TemplateEngine<'_>, node: &IrInput) -> Result<String, CodegenError> {
        let ctx = engine.context();
        if let Some(custom) = ctx.tables.custom_input(&node.name, self.language().as_str()) {
            return Ok(custom.declaration.clone().unwrap_or_default());
        }
        let fields = node
            .fields
            .iter()
            .map(|f| (f.name.as_str(), self.field_name(&f.name)));
        ensure_distinct(self.language(), || format!("input `{}`", node.name), fields)?;
        engine.render(TemplateKind::Input, node)
    }

    fn emit_union(&self, engine: &TemplateEngine<'_>, node: &IrUnion) -> Result<String, CodegenError> {
        let variants = node
            .members
            .iter()
            .map(|m| (m.name.as_str(), self.variant_name(&m.name)));
        ensure_distinct(self.language(), || format!("union `{}`", node.name), variants)?;
        engine.render(TemplateKind::Union, node)
    }

    fn emit_operation_signature(
        &self,
        engine: &TemplateEngine<'_>,
        node: &IrOperation,
    ) -> Result<String, CodegenError> {
        let fields = node
            .fields
            .iter()
            .map(|f| (f.name.as_str(), self.field_name(&f.name)));
        ensure_distinct(self.language(), || format!("{} `{}`", node.kind, node.type_name), fields)?;
        engine.render(TemplateKind::Operation, node)
    }

    /// Top-level identifiers the file declares, each paired with the schema
    /// name it comes from.
    fn top_level_names(&self, ctx: GenerationContext<'_>) -> Vec<(String, String)> {
        declared_names(self, ctx)
    }

    /// Assembles the whole file: header, declarations in IR order, footer.
    fn emit_file(&self, engine: &TemplateEngine<'_>) -> Result<String, CodegenError> {
        let ctx = engine.context();
        let schema = ctx.schema;
        let names = self.top_level_names(ctx);
        ensure_distinct(
            self.language(),
            || format!("file `{}`", self.file_name()),
            names.iter().map(|(origin, ident)| (origin.as_str(), ident.clone())),
        )?;

        let mut declarations = Vec::new();

        for node in &schema.scalars {
            declarations.push(self.emit_scalar(engine, node)?);
        }
        for node in &schema.enums {
            declarations.push(self.emit_enum(engine, node)?);
        }
        for node in &schema.interfaces {
            declarations.push(self.emit_interface(engine, node)?);
        }
        for node in &schema.objects {
            declarations.push(self.emit_object(engine, node)?);
        }
        for node in &schema.inputs {
            declarations.push(self.emit_input(engine, node)?);
        }
        for node in &schema.unions {
            declarations.push(self.emit_union(engine, node)?);
        }
        for node in &schema.operations {
            declarations.push(self.emit_operation_signature(engine, node)?);
        }

        let body = declarations
            .iter()
            .map(|d| d.trim_end())
            .filter(|d| !d.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        engine.render(
            TemplateKind::File,
            &FileView {
                language: self.language(),
                file_name: self.file_name(),
                header: ctx.options.header,
                package: ctx.options.package.as_deref(),
                generator: &schema.metadata.generator,
                version: &schema.metadata.version,
                sources: &schema.metadata.sources,
                body,
            },
        )
    }
}

/// Names of the schema's own declarations and resolver interfaces. Inputs
/// with a custom override contribute the override's name.
pub(crate) fn declared_names<P: LanguagePlugin + ?Sized>(
    plugin: &P,
    ctx: GenerationContext<'_>,
) -> Vec<(String, String)> {
    let schema = ctx.schema;
    let language = plugin.language().as_str();
    let named = |name: &String| (name.clone(), plugin.type_name(name));
    let mut names: Vec<(String, String)> = Vec::new();
    names.extend(schema.scalars.iter().map(|t| named(&t.name)));
    names.extend(schema.enums.iter().map(|t| named(&t.name)));
    names.extend(schema.interfaces.iter().map(|t| named(&t.name)));
    names.extend(schema.objects.iter().map(|t| named(&t.name)));
    names.extend(schema.inputs.iter().map(|t| {
        match ctx.tables.custom_input(&t.name, language) {
            Some(custom) => (t.name.clone(), custom.type_name.clone()),
            None => named(&t.name),
        }
    }));
    names.extend(schema.unions.iter().map(|t| named(&t.name)));
    names.extend(schema.operations.iter().map(|op| {
        (
            format!("{} resolver", op.type_name),
            format!("{}Resolver", plugin.type_name(&op.type_name)),
        )
    }));
    names
}

/// Class names `{Union}{Variant}` of wrapper union variants declared at the
/// top level.
pub(crate) fn variant_class_names<P: LanguagePlugin + ?Sized>(
    plugin: &P,
    ctx: GenerationContext<'_>,
) -> Vec<(String, String)> {
    ctx.schema
        .unions
        .iter()
        .filter(|u| u.kind == UnionKind::Wrapper)
        .flat_map(|u| {
            u.members.iter().map(move |m| {
                (
                    format!("{}.{}", u.name, m.name),
                    format!("{}{}", plugin.type_name(&u.name), plugin.variant_name(&m.name)),
                )
            })
        })
        .collect()
}

/// Fails when two names of one declaration map to the same identifier.
pub(crate) fn ensure_distinct<'n>(
    language: Language,
    construct: impl FnOnce() -> String,
    names: impl IntoIterator<Item = (&'n str, String)>,
) -> Result<(), CodegenError> {
    let mut seen: FxHashMap<String, &str> = FxHashMap::default();
    for (original, ident) in names {
        if let Some(previous) = seen.insert(ident.clone(), original) {
            return Err(CodegenError::UnsupportedConstruct {
                language,
                construct: construct(),
                reason: format!("`{previous}` and `{original}` both map to `{ident}`"),
            });
        }
    }
    Ok(())
}

/// Quotes `value` with `delimiter`, escaping `$` for languages that
/// interpolate it.
pub(crate) fn quote(value: &str, delimiter: char, escape_dollar: bool) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(delimiter);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if escape_dollar => out.push_str("\\$"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Prefixes every line of `text` with `indent` and `marker`.
pub(crate) fn line_comment(text: &str, indent: &str, marker: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                format!("{indent}{marker}\n")
            } else {
                format!("{indent}{marker} {line}\n")
            }
        })
        .collect()
}

/// `/** ... */` block with one ` * ` line per input line.
pub(crate) fn block_comment(text: &str, indent: &str) -> String {
    let mut out = format!("{indent}/**\n");
    out.push_str(&line_comment(&text.replace("*/", "*\\/"), indent, " *"));
    out.push_str(indent);
    out.push_str(" */\n");
    out
}
