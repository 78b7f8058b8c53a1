//! Template engine.
//!
//! Wraps a [`Handlebars`] registry holding one plugin's templates. Strict mode
//! is on so a misspelled node property fails the render instead of printing
//! nothing, and HTML escaping is off.
//!
//! Helpers available to every template:
//!
//! | helper | example | result |
//! |---|---|---|
//! | `type` | `{{type this.type}}` | type reference with nullability |
//! | `ident` | `{{ident name}}` | escaped identifier |
//! | `field_name` / `type_name` / `enum_case` / `variant_name` | `{{field_name name}}` | plugin naming |
//! | `doc` | `{{doc description status indent=1}}` | doc comment or nothing |
//! | `deprecated` | `{{deprecated deprecation indent=1}}` | deprecation attribute or nothing |
//! | `default` | `{{default ../name this}}` | explicit or platform default literal |
//! | `value` | `{{value default_value this.type}}` | literal |
//! | `string` | `{{string name}}` | quoted string literal |
//! | `camel` / `pascal` / `snake` / `constant` | `{{pascal name}}` | case conversion |
//! | `required` | `{{#if (required this.type)}}` | whether the type is non-null |
//! | `inherited` | `{{#if (inherited ../name name)}}` | whether an implemented interface declares the field |
//! | `supertypes` | `{{join (supertypes name) ", "}}` | interfaces and native unions of an object |
//! | `join` | `{{join list ", "}}` | joined strings |

use crate::error::CodegenError;
use crate::plugin::{GenerationContext, LanguagePlugin};
use gqlbind_core::case::Case;
use gqlbind_ir::{IrField, IrType, IrValue, UnionKind};
use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperDef, RenderContext, RenderError,
    RenderErrorReason, ScopedJson,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Named templates, one per IR node kind plus the file wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    File,
    Scalar,
    Enum,
    Interface,
    Object,
    Input,
    Union,
    Operation,
}

impl TemplateKind {
    pub const ALL: [Self; 8] = [
        Self::File,
        Self::Scalar,
        Self::Enum,
        Self::Interface,
        Self::Object,
        Self::Input,
        Self::Union,
        Self::Operation,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::Interface => "interface",
            Self::Object => "object",
            Self::Input => "input",
            Self::Union => "union",
            Self::Operation => "operation",
        }
    }
}

/// A template registry bound to one plugin and one generation context.
pub struct TemplateEngine<'a> {
    registry: Handlebars<'a>,
    plugin: &'a dyn LanguagePlugin,
    ctx: GenerationContext<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Registers the plugin's templates and helpers.
    pub fn new(
        plugin: &'a dyn LanguagePlugin,
        ctx: GenerationContext<'a>,
    ) -> Result<Self, CodegenError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(no_escape);

        for &(kind, source) in plugin.templates() {
            registry
                .register_template_string(kind.as_str(), source)
                .map_err(|err| CodegenError::Template {
                    language: plugin.language(),
                    template: kind.as_str().to_string(),
                    message: err.to_string(),
                })?;
        }

        let helpers = [
            ("type", HelperKind::Type),
            ("ident", HelperKind::Ident),
            ("field_name", HelperKind::FieldName),
            ("type_name", HelperKind::TypeName),
            ("enum_case", HelperKind::EnumCase),
            ("variant_name", HelperKind::VariantName),
            ("doc", HelperKind::Doc),
            ("deprecated", HelperKind::Deprecated),
            ("default", HelperKind::Default),
            ("value", HelperKind::Value),
            ("string", HelperKind::String),
            ("camel", HelperKind::Case(Case::Camel)),
            ("pascal", HelperKind::Case(Case::Pascal)),
            ("snake", HelperKind::Case(Case::Snake)),
            ("constant", HelperKind::Case(Case::Constant)),
            ("required", HelperKind::Required),
            ("inherited", HelperKind::Inherited),
            ("supertypes", HelperKind::Supertypes),
            ("join", HelperKind::Join),
        ];
        for (name, kind) in helpers {
            registry.register_helper(
                name,
                Box::new(PluginHelper {
                    name,
                    kind,
                    plugin,
                    ctx,
                }),
            );
        }

        Ok(Self {
            registry,
            plugin,
            ctx,
        })
    }

    #[must_use]
    pub fn plugin(&self) -> &'a dyn LanguagePlugin {
        self.plugin
    }

    #[must_use]
    pub fn context(&self) -> GenerationContext<'a> {
        self.ctx
    }

    /// Renders `node` with the template registered for `kind`.
    pub fn render(&self, kind: TemplateKind, node: &impl Serialize) -> Result<String, CodegenError> {
        self.registry
            .render(kind.as_str(), node)
            .map(|text| tidy(&text))
            .map_err(|err| CodegenError::Template {
                language: self.plugin.language(),
                template: kind.as_str().to_string(),
                message: err.to_string(),
            })
    }
}

/// Normalises template output: trailing whitespace is stripped, blank lines
/// collapse to one and never open or close a block.
fn tidy(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            let opens_block = lines
                .last()
                .map_or(true, |prev| prev.is_empty() || prev.ends_with(['{', '(', '[', ':']));
            if opens_block {
                continue;
            }
        } else if line.trim_start().starts_with(['}', ')', ']'])
            && lines.last().is_some_and(|prev| prev.is_empty())
        {
            lines.pop();
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[derive(Debug, Clone, Copy)]
enum HelperKind {
    Type,
    Ident,
    FieldName,
    TypeName,
    EnumCase,
    VariantName,
    Doc,
    Deprecated,
    Default,
    Value,
    String,
    Case(Case),
    Required,
    Inherited,
    Supertypes,
    Join,
}

struct PluginHelper<'a> {
    name: &'static str,
    kind: HelperKind,
    plugin: &'a dyn LanguagePlugin,
    ctx: GenerationContext<'a>,
}

impl HelperDef for PluginHelper<'_> {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        self.evaluate(h).map(ScopedJson::Derived)
    }
}

impl PluginHelper<'_> {
    fn evaluate(&self, h: &Helper<'_>) -> Result<Json, RenderError> {
        let plugin = self.plugin;
        let text = match self.kind {
            HelperKind::Type => plugin.type_ref(&self.decode::<IrType>(h, 0)?, self.ctx),
            HelperKind::Ident => plugin.escape_identifier(self.str_param(h, 0)?),
            HelperKind::FieldName => plugin.field_name(self.str_param(h, 0)?),
            HelperKind::TypeName => plugin.type_name(self.str_param(h, 0)?),
            HelperKind::EnumCase => plugin.enum_case_name(self.str_param(h, 0)?),
            HelperKind::VariantName => plugin.variant_name(self.str_param(h, 0)?),
            HelperKind::String => plugin.string_literal(self.str_param(h, 0)?),
            HelperKind::Case(case) => case.apply(self.str_param(h, 0)?),
            HelperKind::Doc => self.doc(h)?,
            HelperKind::Deprecated => match self.param(h, 0)?.as_str() {
                Some(reason) => plugin.deprecation_attribute(reason, &self.indent(h)),
                None => String::new(),
            },
            HelperKind::Default => self.default(h)?,
            HelperKind::Value => {
                let value = self.param(h, 0)?;
                if value.is_null() {
                    String::new()
                } else {
                    let value: IrValue = self.decode(h, 0)?;
                    let ty: IrType = self.decode(h, 1)?;
                    plugin.render_value(&value, &ty, self.ctx).unwrap_or_default()
                }
            }
            HelperKind::Required => {
                return Ok(Json::Bool(self.decode::<IrType>(h, 0)?.is_required()));
            }
            HelperKind::Inherited => {
                let owner = self.str_param(h, 0)?;
                let field = self.str_param(h, 1)?;
                let interfaces = self.interfaces_of(owner);
                return Ok(Json::Bool(
                    interfaces.iter().any(|name| self.declares(name, field)),
                ));
            }
            HelperKind::Supertypes => {
                return Ok(Json::Array(
                    self.supertypes(self.str_param(h, 0)?)
                        .into_iter()
                        .map(Json::String)
                        .collect(),
                ));
            }
            HelperKind::Join => {
                let separator = self.str_param(h, 1)?;
                let items = self.param(h, 0)?.as_array().cloned().unwrap_or_default();
                items
                    .iter()
                    .map(|item| match item {
                        Json::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(separator)
            }
        };
        Ok(Json::String(text))
    }

    fn param<'h>(&self, h: &'h Helper<'_>, index: usize) -> Result<&'h Json, RenderError> {
        h.param(index)
            .map(|p| p.value())
            .ok_or_else(|| RenderErrorReason::ParamNotFoundForIndex(self.name, index).into())
    }

    fn str_param<'h>(&self, h: &'h Helper<'_>, index: usize) -> Result<&'h str, RenderError> {
        self.param(h, index)?.as_str().ok_or_else(|| {
            RenderErrorReason::Other(format!(
                "helper `{}` expects a string as parameter {index}",
                self.name
            ))
            .into()
        })
    }

    fn decode<T: DeserializeOwned>(&self, h: &Helper<'_>, index: usize) -> Result<T, RenderError> {
        serde_json::from_value(self.param(h, index)?.clone()).map_err(|err| {
            RenderErrorReason::Other(format!(
                "helper `{}` cannot read parameter {index}: {err}",
                self.name
            ))
            .into()
        })
    }

    fn indent(&self, h: &Helper<'_>) -> String {
        let depth = h
            .hash_get("indent")
            .and_then(|v| v.value().as_u64())
            .unwrap_or(0);
        self.plugin
            .indent_unit()
            .repeat(usize::try_from(depth).unwrap_or(0))
    }

    /// `{{doc description status}}`: the description, plus a note when the
    /// declaration is `future`.
    fn doc(&self, h: &Helper<'_>) -> Result<String, RenderError> {
        let description = self.param(h, 0)?.as_str();
        let future = h
            .param(1)
            .and_then(|p| p.value().as_str())
            .is_some_and(|status| status == "future");
        let text = match (description, future) {
            (None, false) => return Ok(String::new()),
            (Some(text), false) => text.to_string(),
            (None, true) => FUTURE_NOTE.to_string(),
            (Some(text), true) => format!("{text}\n\n{FUTURE_NOTE}"),
        };
        Ok(self.plugin.doc_comment(&text, &self.indent(h)))
    }

    /// `{{default owner field}}`: explicit default first, then the platform
    /// default table.
    fn default(&self, h: &Helper<'_>) -> Result<String, RenderError> {
        let owner = self.str_param(h, 0)?;
        let field: IrField = self.decode(h, 1)?;
        if let Some(value) = &field.default_value {
            if let Some(literal) = self.plugin.render_value(value, &field.ty, self.ctx) {
                return Ok(literal);
            }
        }
        Ok(self
            .ctx
            .schema
            .platform_default(owner, &field.name, self.plugin.language().as_str())
            .unwrap_or_default()
            .to_string())
    }

    fn interfaces_of(&self, owner: &str) -> Vec<&str> {
        let schema = self.ctx.schema;
        schema
            .find_object(owner)
            .map(|o| &o.implements)
            .or_else(|| schema.find_interface(owner).map(|i| &i.implements))
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn declares(&self, interface: &str, field: &str) -> bool {
        self.ctx
            .schema
            .find_interface(interface)
            .is_some_and(|i| i.fields.iter().any(|f| f.name == field))
    }

    /// Interfaces, then native unions listing `object` as a member.
    fn supertypes(&self, object: &str) -> Vec<String> {
        let schema = self.ctx.schema;
        let interfaces = self
            .interfaces_of(object)
            .into_iter()
            .filter(|name| schema.find_interface(name).is_some())
            .map(|name| self.plugin.type_name(name));
        let unions = schema
            .unions
            .iter()
            .filter(|u| u.kind == UnionKind::Native)
            .filter(|u| u.members.iter().any(|m| m.type_name == object))
            .map(|u| self.plugin.type_name(&u.name));
        interfaces.chain(unions).collect()
    }
}

const FUTURE_NOTE: &str = "Future: not yet available on every platform.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tidy_collapses_blank_lines() {
        let raw = "class A {\n\n    val a: Int\n   \n\n    val b: Int\n\n}\n\n\n";
        assert_eq!(tidy(raw), "class A {\n    val a: Int\n\n    val b: Int\n}\n");
    }

    #[test]
    fn test_tidy_keeps_separating_blank_line() {
        assert_eq!(tidy("a\n\nb"), "a\n\nb\n");
        assert_eq!(tidy("\n\na"), "a\n");
    }

    #[test]
    fn test_template_kind_names() {
        let names: Vec<_> = TemplateKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            ["file", "scalar", "enum", "interface", "object", "input", "union", "operation"]
        );
    }
}
