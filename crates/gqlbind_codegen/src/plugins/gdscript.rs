//! GDScript (Godot 4): inner classes, integer enums and resolver stubs.
//!
//! GDScript has neither nullable built-ins nor multiple inheritance, so:
//! - optional built-in scalars, optional enums, optional lists and custom
//!   scalars are typed `Variant`
//! - nested lists and lists of optional elements are untyped `Array`
//! - an object extends its first interface and declares the rest of its
//!   fields itself
//! - input object defaults have no literal form and are left out

use crate::engine::{TemplateEngine, TemplateKind};
use crate::error::CodegenError;
use crate::plugin::{
    declared_names, ensure_distinct, line_comment, GenerationContext, Language, LanguagePlugin,
};
use gqlbind_core::case::{constant_case, Case};
use gqlbind_core::{keywords, EscapeStyle};
use gqlbind_ir::{
    IrArg, IrField, IrInterface, IrObject, IrOperation, IrOperationField, IrSchema, IrType,
    NamedKind, Status,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct GDScriptPlugin;

const TEMPLATES: &[(TemplateKind, &str)] = &[
    (TemplateKind::File, include_str!("../../templates/gdscript/file.hbs")),
    (TemplateKind::Scalar, include_str!("../../templates/gdscript/scalar.hbs")),
    (TemplateKind::Enum, include_str!("../../templates/gdscript/enum.hbs")),
    (TemplateKind::Interface, include_str!("../../templates/gdscript/class.hbs")),
    (TemplateKind::Object, include_str!("../../templates/gdscript/class.hbs")),
    (TemplateKind::Input, include_str!("../../templates/gdscript/input.hbs")),
    (TemplateKind::Union, include_str!("../../templates/gdscript/union.hbs")),
    (TemplateKind::Operation, include_str!("../../templates/gdscript/operation.hbs")),
];

/// An interface or object as a single-inheritance class.
#[derive(Debug, Serialize)]
struct ClassView<'a> {
    name: &'a str,
    description: Option<&'a str>,
    status: Status,
    base: Option<&'a str>,
    /// Interfaces other than the base, listed in the doc comment.
    also_implements: Vec<&'a str>,
    fields: Vec<&'a IrField>,
}

impl<'a> ClassView<'a> {
    fn new(
        schema: &'a IrSchema,
        name: &'a str,
        description: Option<&'a str>,
        status: Status,
        implements: &'a [String],
        fields: &'a [IrField],
    ) -> Self {
        let mut interfaces = implements
            .iter()
            .filter_map(|name| schema.find_interface(name));
        let base: Option<&IrInterface> = interfaces.next();
        let fields = fields
            .iter()
            .filter(|field| {
                base.map_or(true, |base| base.fields.iter().all(|f| f.name != field.name))
            })
            .collect();
        Self {
            name,
            description,
            status,
            base: base.map(|b| b.name.as_str()),
            also_implements: interfaces.map(|i| i.name.as_str()).collect(),
            fields,
        }
    }
}

#[derive(Debug, Serialize)]
struct OperationView<'a> {
    type_name: &'a str,
    fields: Vec<ResolverView<'a>>,
}

#[derive(Debug, Serialize)]
struct ResolverView<'a> {
    name: &'a str,
    description: Option<&'a str>,
    deprecation: Option<&'a str>,
    status: Status,
    params: String,
    return_type: String,
    stub: String,
}

impl GDScriptPlugin {
    /// Parameter list where only a trailing run of optional arguments gets
    /// defaults.
    fn params(&self, arguments: &[IrArg], ctx: GenerationContext<'_>) -> String {
        let mut trailing = true;
        let mut params: Vec<String> = arguments
            .iter()
            .rev()
            .map(|arg| {
                let declared = format!("{}: {}", self.field_name(&arg.name), self.type_ref(&arg.ty, ctx));
                let default = arg
                    .default_value
                    .as_ref()
                    .and_then(|value| self.render_value(value, &arg.ty, ctx))
                    .or_else(|| (!arg.ty.is_required()).then(|| "null".to_string()));
                match default {
                    Some(default) if trailing => format!("{declared} = {default}"),
                    _ => {
                        trailing = false;
                        declared
                    }
                }
            })
            .collect();
        params.reverse();
        params.join(", ")
    }

    /// Placeholder return value matching [`LanguagePlugin::type_ref`].
    fn zero_value(&self, ty: &IrType) -> &'static str {
        if !ty.is_required() {
            return "null";
        }
        match ty.strip_non_null() {
            IrType::List(_) => "[]",
            IrType::Scalar(name) => match name.as_str() {
                "Int" => "0",
                "Float" => "0.0",
                "Boolean" => "false",
                "ID" | "String" => "\"\"",
                _ => "null",
            },
            IrType::Named(named) if named.kind == NamedKind::Enum => "0",
            _ => "null",
        }
    }

    fn resolver<'a>(&self, field: &'a IrOperationField, ctx: GenerationContext<'_>) -> ResolverView<'a> {
        ResolverView {
            name: &field.name,
            description: field.description.as_deref(),
            deprecation: field.deprecation.as_deref(),
            status: field.status,
            params: self.params(&field.arguments, ctx),
            return_type: self.type_ref(&field.return_type, ctx),
            stub: self.zero_value(&field.return_type).to_string(),
        }
    }
}

impl LanguagePlugin for GDScriptPlugin {
    fn language(&self) -> Language {
        Language::GDScript
    }

    fn file_name(&self) -> &'static str {
        "types.gd"
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        keywords::GDSCRIPT
    }

    fn escape_style(&self) -> EscapeStyle {
        EscapeStyle::Prefix("p_")
    }

    fn indent_unit(&self) -> &'static str {
        "\t"
    }

    fn field_case(&self) -> Case {
        Case::Snake
    }

    fn enum_case(&self) -> Case {
        Case::Constant
    }

    fn map_scalar(&self, name: &str) -> Option<&'static str> {
        match name {
            "ID" | "String" => Some("String"),
            "Int" => Some("int"),
            "Float" => Some("float"),
            "Boolean" => Some("bool"),
            _ => None,
        }
    }

    fn custom_scalar(&self, _name: &str) -> String {
        "Variant".to_string()
    }

    fn type_ref(&self, ty: &IrType, ctx: GenerationContext<'_>) -> String {
        let required = ty.is_required();
        match ty.strip_non_null() {
            IrType::List(_) if !required => "Variant".to_string(),
            IrType::List(element) => {
                let typed = element.is_required()
                    && !element.is_list()
                    && !matches!(
                        element.named_type().map(|n| n.kind),
                        Some(NamedKind::Scalar)
                    );
                if typed {
                    let token = match element.named_type() {
                        Some(named) if named.kind == NamedKind::Enum => "int".to_string(),
                        _ => self.type_ref(element, ctx),
                    };
                    self.list_syntax(element, token)
                } else {
                    "Array".to_string()
                }
            }
            IrType::Scalar(_) if !required => "Variant".to_string(),
            IrType::Scalar(name) => self.scalar_type(name),
            IrType::Named(named) => match named.kind {
                NamedKind::Enum if required => self.type_name(&named.name),
                NamedKind::Enum => "Variant".to_string(),
                _ => self.named_type(named, ctx),
            },
            IrType::NonNull(_) => "Variant".to_string(),
        }
    }

    // Object references are nullable already; built-ins are handled in
    // `type_ref`.
    fn nullability_syntax(&self, _ty: &IrType, token: String) -> String {
        token
    }

    fn list_syntax(&self, _element: &IrType, token: String) -> String {
        format!("Array[{token}]")
    }

    fn doc_comment(&self, text: &str, indent: &str) -> String {
        line_comment(text, indent, "##")
    }

    fn deprecation_attribute(&self, reason: &str, indent: &str) -> String {
        line_comment(&format!("@deprecated: {reason}"), indent, "##")
    }

    fn templates(&self) -> &'static [(TemplateKind, &'static str)] {
        TEMPLATES
    }

    fn object_literal(&self, _type_name: &str, _fields: Vec<(String, String)>) -> Option<String> {
        None
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
        let view = ClassView::new(
            engine.context().schema,
            &node.name,
            node.description.as_deref(),
            node.status,
            &node.implements,
            &node.fields,
        );
        engine.render(TemplateKind::Interface, &view)
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
        let view = ClassView::new(
            engine.context().schema,
            &node.name,
            node.description.as_deref(),
            node.status,
            &node.implements,
            &node.fields,
        );
        engine.render(TemplateKind::Object, &view)
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
        let ctx = engine.context();
        let view = OperationView {
            type_name: &node.type_name,
            fields: node.fields.iter().map(|f| self.resolver(f, ctx)).collect(),
        };
        engine.render(TemplateKind::Operation, &view)
    }

    /// Every enum also declares a `_BY_VALUE` lookup constant.
    fn top_level_names(&self, ctx: GenerationContext<'_>) -> Vec<(String, String)> {
        let mut names = declared_names(self, ctx);
        names.extend(ctx.schema.enums.iter().map(|e| {
            (format!("{} raw values", e.name), format!("{}_BY_VALUE", constant_case(&e.name)))
        }));
        names
    }
}
