//! Kotlin: data classes, enum classes with raw values, sealed interfaces for
//! unions and suspend resolver interfaces for operations.

use crate::engine::TemplateKind;
use crate::plugin::{
    block_comment, declared_names, quote, variant_class_names, GenerationContext, Language,
    LanguagePlugin,
};
use gqlbind_core::case::Case;
use gqlbind_core::{keywords, EscapeStyle};
use gqlbind_ir::IrType;

#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinPlugin;

const TEMPLATES: &[(TemplateKind, &str)] = &[
    (TemplateKind::File, include_str!("../../templates/kotlin/file.hbs")),
    (TemplateKind::Scalar, include_str!("../../templates/kotlin/scalar.hbs")),
    (TemplateKind::Enum, include_str!("../../templates/kotlin/enum.hbs")),
    (TemplateKind::Interface, include_str!("../../templates/kotlin/interface.hbs")),
    (TemplateKind::Object, include_str!("../../templates/kotlin/object.hbs")),
    (TemplateKind::Input, include_str!("../../templates/kotlin/input.hbs")),
    (TemplateKind::Union, include_str!("../../templates/kotlin/union.hbs")),
    (TemplateKind::Operation, include_str!("../../templates/kotlin/operation.hbs")),
];

impl LanguagePlugin for KotlinPlugin {
    fn language(&self) -> Language {
        Language::Kotlin
    }

    fn file_name(&self) -> &'static str {
        "Types.kt"
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        keywords::KOTLIN
    }

    fn escape_style(&self) -> EscapeStyle {
        EscapeStyle::Backticks
    }

    fn enum_case(&self) -> Case {
        Case::Preserve
    }

    fn map_scalar(&self, name: &str) -> Option<&'static str> {
        match name {
            "ID" | "String" => Some("String"),
            "Int" => Some("Int"),
            "Float" => Some("Double"),
            "Boolean" => Some("Boolean"),
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
        block_comment(text, indent)
    }

    fn deprecation_attribute(&self, reason: &str, indent: &str) -> String {
        format!("{indent}@Deprecated({})\n", quote(reason, '"', true))
    }

    fn templates(&self) -> &'static [(TemplateKind, &'static str)] {
        TEMPLATES
    }

    fn string_literal(&self, value: &str) -> String {
        quote(value, '"', true)
    }

    fn list_literal(&self, items: Vec<String>) -> String {
        format!("listOf({})", items.join(", "))
    }

    fn object_literal(&self, type_name: &str, fields: Vec<(String, String)>) -> Option<String> {
        let args: Vec<String> = fields
            .into_iter()
            .map(|(name, value)| format!("{name} = {value}"))
            .collect();
        Some(format!("{type_name}({})", args.join(", ")))
    }

    /// Wrapper variants are top-level classes.
    fn top_level_names(&self, ctx: GenerationContext<'_>) -> Vec<(String, String)> {
        let mut names = declared_names(self, ctx);
        names.extend(variant_class_names(self, ctx));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodegenOptions;
    use gqlbind_ir::{IrSchema, NamedKind, Tables};

    #[test]
    fn test_type_refs() {
        let schema = IrSchema::default();
        let tables = Tables::default();
        let options = CodegenOptions::default();
        let ctx = GenerationContext {
            schema: &schema,
            tables: &tables,
            options: &options,
        };
        let plugin = KotlinPlugin;
        let product = IrType::named("Product", NamedKind::Object);
        let cases = [
            (IrType::scalar("Int"), "Int?"),
            (IrType::non_null(IrType::scalar("ID")), "String"),
            (IrType::list(IrType::non_null(product.clone())), "List<Product>?"),
            (
                IrType::non_null(IrType::list(IrType::scalar("Float"))),
                "List<Double?>",
            ),
        ];
        for (ty, expected) in cases {
            assert_eq!(plugin.type_ref(&ty, ctx), expected, "{ty}");
        }
    }

    #[test]
    fn test_escaping() {
        assert_eq!(KotlinPlugin.field_name("when"), "`when`");
        assert_eq!(KotlinPlugin.string_literal("$price"), r#""\$price""#);
    }
}
