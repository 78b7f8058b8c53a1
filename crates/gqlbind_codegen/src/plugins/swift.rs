//! Swift: value-type structs with memberwise initialisers, protocols for
//! interfaces and enums with associated values for unions.
//!
//! A struct cannot store itself, so types that reach themselves through
//! non-list properties become `final class` and unions `indirect enum`.
//! Protocol requirements are invariant: a field that narrows its interface's
//! type is stored as `{field}{Type}` next to a getter of the interface type.

use crate::engine::{TemplateEngine, TemplateKind};
use crate::error::CodegenError;
use crate::plugin::{ensure_distinct, line_comment, quote, GenerationContext, Language, LanguagePlugin};
use gqlbind_core::case::{camel_case, pascal_case, Case};
use gqlbind_core::{keywords, EscapeStyle};
use gqlbind_ir::{IrField, IrInput, IrInterface, IrObject, IrType, IrUnion, NamedKind, Status};
use rustc_hash::FxHashSet;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct SwiftPlugin;

const TEMPLATES: &[(TemplateKind, &str)] = &[
    (TemplateKind::File, include_str!("../../templates/swift/file.hbs")),
    (TemplateKind::Scalar, include_str!("../../templates/swift/scalar.hbs")),
    (TemplateKind::Enum, include_str!("../../templates/swift/enum.hbs")),
    (TemplateKind::Interface, include_str!("../../templates/swift/interface.hbs")),
    (TemplateKind::Object, include_str!("../../templates/swift/object.hbs")),
    (TemplateKind::Input, include_str!("../../templates/swift/input.hbs")),
    (TemplateKind::Union, include_str!("../../templates/swift/union.hbs")),
    (TemplateKind::Operation, include_str!("../../templates/swift/operation.hbs")),
];

/// An object or input rendered as a struct, or as a final class when it
/// contains itself.
#[derive(Debug, Serialize)]
struct RecordView<'a> {
    name: &'a str,
    description: Option<&'a str>,
    status: Status,
    implements: &'a [String],
    reference: bool,
    fields: Vec<PropertyView<'a>>,
}

#[derive(Debug, Serialize)]
struct PropertyView<'a> {
    #[serde(flatten)]
    field: &'a IrField,
    /// Name of the stored property and initialiser parameter.
    stored: String,
    /// Interface type of the conformance getter, when the field narrows it.
    witness: Option<String>,
}

#[derive(Debug, Serialize)]
struct UnionView<'a> {
    #[serde(flatten)]
    node: &'a IrUnion,
    indirect: bool,
}

impl SwiftPlugin {
    /// Whether `name` reaches itself through properties stored inline.
    fn contains_itself(&self, name: &str, ctx: GenerationContext<'_>) -> bool {
        let mut stack = self.stored_inline(name, ctx);
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        while let Some(next) = stack.pop() {
            if next == name {
                return true;
            }
            if seen.insert(next) {
                stack.extend(self.stored_inline(next, ctx));
            }
        }
        false
    }

    /// Generated value types that `name` stores inline. Arrays and
    /// protocol existentials are boxed and do not count.
    fn stored_inline<'s>(&self, name: &str, ctx: GenerationContext<'s>) -> Vec<&'s str> {
        let schema = ctx.schema;
        let value_type = |ty: &'s IrType| match ty.strip_non_null() {
            IrType::Named(named) => match named.kind {
                NamedKind::Object | NamedKind::Union => Some(named.name.as_str()),
                NamedKind::Input
                    if ctx.tables.custom_input(&named.name, self.language().as_str()).is_none() =>
                {
                    Some(named.name.as_str())
                }
                _ => None,
            },
            _ => None,
        };
        if let Some(object) = schema.find_object(name) {
            object.fields.iter().filter_map(|f| value_type(&f.ty)).collect()
        } else if let Some(input) = schema.find_input(name) {
            input.fields.iter().filter_map(|f| value_type(&f.ty)).collect()
        } else if let Some(union) = schema.find_union(name) {
            union
                .members
                .iter()
                .map(|m| m.type_name.as_str())
                .filter(|member| schema.find_interface(member).is_none())
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Types the implemented interfaces declare for `field`.
    fn required_types<'s>(
        &self,
        implements: &[String],
        field: &str,
        ctx: GenerationContext<'s>,
    ) -> Vec<(&'s str, &'s IrType)> {
        implements
            .iter()
            .filter_map(|name| ctx.schema.find_interface(name))
            .filter_map(|interface| {
                interface
                    .fields
                    .iter()
                    .find(|f| f.name == field)
                    .map(|f| (interface.name.as_str(), &f.ty))
            })
            .collect()
    }

    fn record<'a>(
        &self,
        construct: &str,
        node: (&'a str, Option<&'a str>, Status),
        implements: &'a [String],
        fields: &'a [IrField],
        ctx: GenerationContext<'_>,
    ) -> Result<RecordView<'a>, CodegenError> {
        let (name, description, status) = node;
        let mut properties = Vec::with_capacity(fields.len());
        for field in fields {
            let required = self.required_types(implements, &field.name, ctx);
            let narrowed: Vec<_> = required.iter().filter(|(_, ty)| **ty != field.ty).collect();
            let witness = match narrowed.first() {
                None => None,
                Some((interface, ty)) => {
                    if let Some((other, _)) = required.iter().find(|(_, other)| other != ty) {
                        return Err(CodegenError::UnsupportedConstruct {
                            language: self.language(),
                            construct: format!("{construct} `{name}`"),
                            reason: format!(
                                "`{}` needs a different type for `{interface}` and `{other}`",
                                field.name
                            ),
                        });
                    }
                    Some(self.type_ref(ty, ctx))
                }
            };
            let stored = if witness.is_some() {
                self.field_name(&format!("{}{}", field.name, pascal_case(field.ty.name())))
            } else {
                self.field_name(&field.name)
            };
            properties.push(PropertyView {
                field,
                stored,
                witness,
            });
        }

        let members = properties.iter().flat_map(|p| {
            let getter = p
                .witness
                .as_ref()
                .map(|_| (p.field.name.as_str(), self.field_name(&p.field.name)));
            std::iter::once((p.field.name.as_str(), p.stored.clone())).chain(getter)
        });
        ensure_distinct(self.language(), || format!("{construct} `{name}`"), members)?;

        Ok(RecordView {
            name,
            description,
            status,
            implements,
            reference: self.contains_itself(name, ctx),
            fields: properties,
        })
    }
}

impl LanguagePlugin for SwiftPlugin {
    fn language(&self) -> Language {
        Language::Swift
    }

    fn file_name(&self) -> &'static str {
        "Types.swift"
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        keywords::SWIFT
    }

    fn escape_style(&self) -> EscapeStyle {
        EscapeStyle::Backticks
    }

    fn enum_case(&self) -> Case {
        Case::Camel
    }

    /// Union cases follow enum case naming.
    fn variant_name(&self, member: &str) -> String {
        self.escape_identifier(&camel_case(member))
    }

    fn map_scalar(&self, name: &str) -> Option<&'static str> {
        match name {
            "ID" | "String" => Some("String"),
            "Int" => Some("Int"),
            "Float" => Some("Double"),
            "Boolean" => Some("Bool"),
            _ => None,
        }
    }

    fn nullability_syntax(&self, ty: &IrType, token: String) -> String {
        if ty.is_required() {
            token
        } else {
            format!("{token}?")
        }
    }

    fn list_syntax(&self, _element: &IrType, token: String) -> String {
        format!("[{token}]")
    }

    fn doc_comment(&self, text: &str, indent: &str) -> String {
        line_comment(text, indent, "///")
    }

    fn deprecation_attribute(&self, reason: &str, indent: &str) -> String {
        format!(
            "{indent}@available(*, deprecated, message: {})\n",
            quote(reason, '"', false)
        )
    }

    fn templates(&self) -> &'static [(TemplateKind, &'static str)] {
        TEMPLATES
    }

    fn null_literal(&self) -> &'static str {
        "nil"
    }

    fn enum_literal(&self, _type_name: &str, case: &str) -> String {
        format!(".{case}")
    }

    fn object_literal(&self, type_name: &str, fields: Vec<(String, String)>) -> Option<String> {
        let args: Vec<String> = fields
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        Some(format!("{type_name}({})", args.join(", ")))
    }

    /// A protocol cannot narrow a requirement it inherits.
    fn emit_interface(
        &self,
        engine: &TemplateEngine<'_>,
        node: &IrInterface,
    ) -> Result<String, CodegenError> {
        let ctx = engine.context();
        let construct = || format!("interface `{}`", node.name);
        for field in &node.fields {
            let inherited = self.required_types(&node.implements, &field.name, ctx);
            if let Some((parent, _)) = inherited.iter().find(|(_, ty)| **ty != field.ty) {
                return Err(CodegenError::UnsupportedConstruct {
                    language: self.language(),
                    construct: construct(),
                    reason: format!("`{}` narrows the type declared by `{parent}`", field.name),
                });
            }
        }
        let fields = node
            .fields
            .iter()
            .map(|f| (f.name.as_str(), self.field_name(&f.name)));
        ensure_distinct(self.language(), construct, fields)?;
        engine.render(TemplateKind::Interface, node)
    }

    fn emit_object(
        &self,
        engine: &TemplateEngine<'_>,
        node: &IrObject,
    ) -> Result<String, CodegenError> {
        let view = self.record(
            "object",
            (&node.name, node.description.as_deref(), node.status),
            &node.implements,
            &node.fields,
            engine.context(),
        )?;
        engine.render(TemplateKind::Object, &view)
    }

    fn emit_input(&self, engine: &TemplateEngine<'_>, node: &IrInput) -> Result<String, CodegenError> {
        let ctx = engine.context();
        if let Some(custom) = ctx.tables.custom_input(&node.name, self.language().as_str()) {
            return Ok(custom.declaration.clone().unwrap_or_default());
        }
        let view = self.record(
            "input",
            (&node.name, node.description.as_deref(), node.status),
            &[],
            &node.fields,
            ctx,
        )?;
        engine.render(TemplateKind::Input, &view)
    }

    fn emit_union(&self, engine: &TemplateEngine<'_>, node: &IrUnion) -> Result<String, CodegenError> {
        let variants = node
            .members
            .iter()
            .map(|m| (m.name.as_str(), self.variant_name(&m.name)));
        ensure_distinct(self.language(), || format!("union `{}`", node.name), variants)?;
        let view = UnionView {
            node,
            indirect: self.contains_itself(&node.name, engine.context()),
        };
        engine.render(TemplateKind::Union, &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naming() {
        let plugin = SwiftPlugin;
        assert_eq!(plugin.enum_case_name("PLAY_STORE"), "playStore");
        assert_eq!(plugin.enum_case_name("DEFAULT"), "`default`");
        assert_eq!(plugin.variant_name("purchase"), "purchase");
        assert_eq!(
            plugin.deprecation_attribute("use sku", "    "),
            "    @available(*, deprecated, message: \"use sku\")\n"
        );
    }

    #[test]
    fn test_list_of_optionals() {
        let schema = gqlbind_ir::IrSchema::default();
        let tables = gqlbind_ir::Tables::default();
        let options = crate::CodegenOptions::default();
        let ctx = crate::GenerationContext {
            schema: &schema,
            tables: &tables,
            options: &options,
        };
        let ty = IrType::non_null(IrType::list(IrType::scalar("Boolean")));
        assert_eq!(SwiftPlugin.type_ref(&ty, ctx), "[Bool?]");
        assert_eq!(SwiftPlugin.type_ref(&IrType::list(ty), ctx), "[[Bool?]]?");
    }
}
