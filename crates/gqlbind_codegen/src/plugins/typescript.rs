//! TypeScript: interfaces, string enums with an ordinal table and union
//! type aliases.

use crate::engine::TemplateKind;
use crate::plugin::{block_comment, declared_names, quote, GenerationContext, Language, LanguagePlugin};
use gqlbind_core::case::Case;
use gqlbind_core::{keywords, EscapeStyle};
use gqlbind_ir::IrType;

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptPlugin;

const TEMPLATES: &[(TemplateKind, &str)] = &[
    (TemplateKind::File, include_str!("../../templates/typescript/file.hbs")),
    (TemplateKind::Scalar, include_str!("../../templates/typescript/scalar.hbs")),
    (TemplateKind::Enum, include_str!("../../templates/typescript/enum.hbs")),
    (TemplateKind::Interface, include_str!("../../templates/typescript/interface.hbs")),
    (TemplateKind::Object, include_str!("../../templates/typescript/object.hbs")),
    (TemplateKind::Input, include_str!("../../templates/typescript/input.hbs")),
    (TemplateKind::Union, include_str!("../../templates/typescript/union.hbs")),
    (TemplateKind::Operation, include_str!("../../templates/typescript/operation.hbs")),
];

impl LanguagePlugin for TypeScriptPlugin {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn file_name(&self) -> &'static str {
        "types.ts"
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        keywords::TYPESCRIPT
    }

    fn escape_style(&self) -> EscapeStyle {
        EscapeStyle::TrailingUnderscore
    }

    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn enum_case(&self) -> Case {
        Case::Preserve
    }

    // Property and enum member names may be keywords, and escaping them
    // would change the wire names.
    fn field_name(&self, name: &str) -> String {
        self.field_case().apply(name)
    }

    fn enum_case_name(&self, name: &str) -> String {
        self.enum_case().apply(name)
    }

    fn map_scalar(&self, name: &str) -> Option<&'static str> {
        match name {
            "ID" | "String" => Some("string"),
            "Int" | "Float" => Some("number"),
            "Boolean" => Some("boolean"),
            _ => None,
        }
    }

    fn nullability_syntax(&self, ty: &IrType, token: String) -> String {
        if ty.is_required() {
            token
        } else {
            format!("{token} | null")
        }
    }

    fn list_syntax(&self, element: &IrType, token: String) -> String {
        if element.is_required() {
            format!("{token}[]")
        } else {
            format!("({token})[]")
        }
    }

    fn doc_comment(&self, text: &str, indent: &str) -> String {
        block_comment(text, indent)
    }

    fn deprecation_attribute(&self, reason: &str, indent: &str) -> String {
        format!("{indent}/** @deprecated {} */\n", reason.replace("*/", "*\\/"))
    }

    fn templates(&self) -> &'static [(TemplateKind, &'static str)] {
        TEMPLATES
    }

    fn string_literal(&self, value: &str) -> String {
        quote(value, '\'', false)
    }

    fn float_literal(&self, value: f64) -> String {
        value.to_string()
    }

    fn object_literal(&self, _type_name: &str, fields: Vec<(String, String)>) -> Option<String> {
        if fields.is_empty() {
            return Some("{}".to_string());
        }
        let entries: Vec<String> = fields
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        Some(format!("{{ {} }}", entries.join(", ")))
    }

    /// Every enum also declares an ordinal table.
    fn top_level_names(&self, ctx: GenerationContext<'_>) -> Vec<(String, String)> {
        let mut names = declared_names(self, ctx);
        names.extend(ctx.schema.enums.iter().map(|e| {
            (format!("{} ordinals", e.name), format!("{}Ordinal", self.type_name(&e.name)))
        }));
        names
    }
}
