//! Dart: immutable classes with const constructors, enhanced enums and
//! sealed class hierarchies for unions.

use crate::engine::TemplateKind;
use crate::plugin::{
    declared_names, line_comment, quote, variant_class_names, GenerationContext, Language,
    LanguagePlugin,
};
use gqlbind_core::case::Case;
use gqlbind_core::{keywords, EscapeStyle};
use gqlbind_ir::IrType;

#[derive(Debug, Clone, Copy, Default)]
pub struct DartPlugin;

const TEMPLATES: &[(TemplateKind, &str)] = &[
    (TemplateKind::File, include_str!("../../templates/dart/file.hbs")),
    (TemplateKind::Scalar, include_str!("../../templates/dart/scalar.hbs")),
    (TemplateKind::Enum, include_str!("../../templates/dart/enum.hbs")),
    (TemplateKind::Interface, include_str!("../../templates/dart/interface.hbs")),
    (TemplateKind::Object, include_str!("../../templates/dart/object.hbs")),
    (TemplateKind::Input, include_str!("../../templates/dart/input.hbs")),
    (TemplateKind::Union, include_str!("../../templates/dart/union.hbs")),
    (TemplateKind::Operation, include_str!("../../templates/dart/operation.hbs")),
];

impl LanguagePlugin for DartPlugin {
    fn language(&self) -> Language {
        Language::Dart
    }

    fn file_name(&self) -> &'static str {
        "types.dart"
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        keywords::DART
    }

    fn escape_style(&self) -> EscapeStyle {
        EscapeStyle::TrailingUnderscore
    }

    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn enum_case(&self) -> Case {
        Case::Camel
    }

    fn map_scalar(&self, name: &str) -> Option<&'static str> {
        match name {
            "ID" | "String" => Some("String"),
            "Int" => Some("int"),
            "Float" => Some("double"),
            "Boolean" => Some("bool"),
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
        format!("List<{token}>")
    }

    fn doc_comment(&self, text: &str, indent: &str) -> String {
        line_comment(text, indent, "///")
    }

    fn deprecation_attribute(&self, reason: &str, indent: &str) -> String {
        format!("{indent}@Deprecated({})\n", quote(reason, '\'', true))
    }

    fn templates(&self) -> &'static [(TemplateKind, &'static str)] {
        TEMPLATES
    }

    fn string_literal(&self, value: &str) -> String {
        quote(value, '\'', true)
    }

    /// Constructor defaults must be constant.
    fn list_literal(&self, items: Vec<String>) -> String {
        format!("const [{}]", items.join(", "))
    }

    fn object_literal(&self, type_name: &str, fields: Vec<(String, String)>) -> Option<String> {
        let args: Vec<String> = fields
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        Some(format!("const {type_name}({})", args.join(", ")))
    }

    /// Wrapper variants are top-level classes.
    fn top_level_names(&self, ctx: GenerationContext<'_>) -> Vec<(String, String)> {
        let mut names = declared_names(self, ctx);
        names.extend(variant_class_names(self, ctx));
        names
    }
}
