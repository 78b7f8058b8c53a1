//! AST to IR transformation.
//!
//! Walks the merged type map once, in declaration order. Markers are looked up
//! by declaration position only, so the transformer does not care whether they
//! came from comments or (later) from directives.

use crate::error::TransformError;
use crate::ir::*;
use crate::tables::Tables;
use gqlbind_core::{FileId, Span};
use gqlbind_syntax::ast::{self, FieldDefinition, InputValueDefinition, TypeKind};
use gqlbind_syntax::{MarkerKind, MarkerTable, OperationType, ParsedSchema, SchemaType};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Builds the IR of a loaded schema.
pub fn transform(
    schema: &ParsedSchema,
    markers: &MarkerTable,
    tables: &Tables,
) -> Result<IrSchema, TransformError> {
    let ir = Transformer::new(schema, markers, tables).run()?;
    tracing::info!(
        enums = ir.enums.len(),
        interfaces = ir.interfaces.len(),
        objects = ir.objects.len(),
        inputs = ir.inputs.len(),
        unions = ir.unions.len(),
        scalars = ir.scalars.len(),
        operations = ir.operations.len(),
        "built IR"
    );
    Ok(ir)
}

struct Transformer<'a> {
    schema: &'a ParsedSchema,
    markers: &'a MarkerTable,
    tables: &'a Tables,
    /// Objects folded into unions.
    wrappers: FxHashSet<String>,
    ir: IrSchema,
}

impl<'a> Transformer<'a> {
    fn new(schema: &'a ParsedSchema, markers: &'a MarkerTable, tables: &'a Tables) -> Self {
        Self {
            schema,
            markers,
            tables,
            wrappers: FxHashSet::default(),
            ir: IrSchema::default(),
        }
    }

    fn run(mut self) -> Result<IrSchema, TransformError> {
        self.ir.metadata.sources = self
            .schema
            .sources()
            .iter()
            .map(|source| {
                source
                    .path()
                    .file_name()
                    .map_or_else(|| source.name(), |name| name.to_string_lossy().into_owned())
            })
            .collect();

        self.collect_wrappers()?;

        let schema = self.schema;
        for ty in schema.types() {
            if ty.name.starts_with("__") || schema.is_root_type(ty.definition.name().value) {
                continue;
            }
            self.declaration(ty)?;
        }
        tracing::debug!(
            enums = self.ir.enums.len(),
            scalars = self.ir.scalars.len(),
            "transformed enums and scalars"
        );
        tracing::debug!(
            objects = self.ir.objects.len(),
            interfaces = self.ir.interfaces.len(),
            inputs = self.ir.inputs.len(),
            unions = self.ir.unions.len(),
            "transformed composite types"
        );

        self.operations()?;
        self.legacy_aliases()?;
        self.platform_defaults()?;
        self.custom_inputs()?;
        Ok(self.ir)
    }

    fn has_marker(&self, file: FileId, offset: u32, kind: MarkerKind) -> bool {
        self.markers.has(self.schema.source(file), offset, kind)
    }

    fn status(&self, file: FileId, offset: u32) -> Status {
        if self.has_marker(file, offset, MarkerKind::Future) {
            Status::Future
        } else {
            Status::Stable
        }
    }

    fn location(&self, file: FileId, span: Span) -> String {
        self.schema.sources().describe(span.in_file(file))
    }

    /// Finds union wrappers up front so references to them resolve as unions.
    fn collect_wrappers(&mut self) -> Result<(), TransformError> {
        let schema = self.schema;
        for ty in schema.types() {
            if !self.has_marker(ty.file, ty.definition.start(), MarkerKind::UnionWrapper) {
                continue;
            }
            let is_root = schema.is_root_type(ty.definition.name().value);
            if ty.kind() != TypeKind::Object || is_root {
                let target = if is_root {
                    format!("root operation type `{}`", ty.name)
                } else {
                    format!("{} `{}`", ty.kind(), ty.name)
                };
                return Err(TransformError::UnsupportedMarker {
                    marker: MarkerKind::UnionWrapper,
                    target,
                    location: self.location(ty.file, ty.definition.name().span),
                });
            }
            self.wrappers.insert(ty.name.clone());
        }
        Ok(())
    }

    fn declaration(&mut self, ty: &SchemaType) -> Result<(), TransformError> {
        let name = ty.name.clone();
        let description = ty.description().map(str::to_string);
        let status = self.status(ty.file, ty.definition.start());

        match ty.kind() {
            TypeKind::Scalar => self.ir.scalars.push(IrScalar {
                name,
                description,
                status,
            }),
            TypeKind::Enum => {
                let values = self.enum_values(ty)?;
                self.ir.enums.push(IrEnum {
                    name,
                    description,
                    status,
                    values,
                    aliases: Vec::new(),
                });
            }
            TypeKind::Object if self.wrappers.contains(&name) => {
                let members = self.wrapper_members(ty)?;
                if ty.implements().next().is_some() {
                    tracing::warn!(
                        wrapper = %name,
                        "union wrapper implements interfaces; dropping the interface list"
                    );
                }
                self.ir.unions.push(IrUnion {
                    name,
                    description,
                    status,
                    kind: UnionKind::Wrapper,
                    members,
                });
            }
            TypeKind::Object => {
                let implements = self.implements(ty);
                let fields = self.fields(ty)?;
                self.ir.objects.push(IrObject {
                    name,
                    description,
                    status,
                    implements,
                    fields,
                });
            }
            TypeKind::Interface => {
                let implements = self.implements(ty);
                let fields = self.fields(ty)?;
                self.ir.interfaces.push(IrInterface {
                    name,
                    description,
                    status,
                    implements,
                    fields,
                });
            }
            TypeKind::InputObject => {
                let fields = ty
                    .input_fields()
                    .map(|(file, field)| self.input_field(&name, file, field))
                    .collect::<Result<_, _>>()?;
                self.ir.inputs.push(IrInput {
                    name,
                    description,
                    status,
                    fields,
                });
            }
            TypeKind::Union => {
                let members = ty
                    .union_members()
                    .map(|(_, member)| {
                        let member = self.schema.name(member.value);
                        IrUnionMember {
                            name: member.clone(),
                            type_name: member,
                            description: None,
                            deprecation: None,
                            status: Status::Stable,
                        }
                    })
                    .collect();
                self.ir.unions.push(IrUnion {
                    name,
                    description,
                    status,
                    kind: UnionKind::Native,
                    members,
                });
            }
        }
        Ok(())
    }

    fn implements(&self, ty: &SchemaType) -> Vec<String> {
        ty.implements()
            .map(|(_, name)| self.schema.name(name.value))
            .collect()
    }

    fn enum_values(&self, ty: &SchemaType) -> Result<Vec<IrEnumValue>, TransformError> {
        let interner = self.schema.interner();
        ty.enum_values()
            .enumerate()
            .map(|(ordinal, (file, value))| {
                let name = self.schema.name(value.name.value);
                self.reject_wrapper_marker(file, value.start(), value.name.span, || {
                    format!("enum value `{}.{name}`", ty.name)
                })?;
                Ok(IrEnumValue {
                    ordinal: u32::try_from(ordinal).unwrap_or(u32::MAX),
                    description: value.description.as_ref().map(|d| d.value.clone()),
                    deprecation: ast::deprecation(&value.directives, interner),
                    status: self.status(file, value.start()),
                    name,
                })
            })
            .collect()
    }

    /// `=> Union` is only meaningful on object declarations.
    fn reject_wrapper_marker(
        &self,
        file: FileId,
        offset: u32,
        span: Span,
        target: impl FnOnce() -> String,
    ) -> Result<(), TransformError> {
        if self.has_marker(file, offset, MarkerKind::UnionWrapper) {
            return Err(TransformError::UnsupportedMarker {
                marker: MarkerKind::UnionWrapper,
                target: target(),
                location: self.location(file, span),
            });
        }
        Ok(())
    }

    fn fields(&self, ty: &SchemaType) -> Result<Vec<IrField>, TransformError> {
        ty.fields()
            .map(|(file, field)| self.field(&ty.name, file, field))
            .collect()
    }

    fn field(
        &self,
        owner: &str,
        file: FileId,
        field: &FieldDefinition,
    ) -> Result<IrField, TransformError> {
        let name = self.schema.name(field.name.value);
        self.reject_wrapper_marker(file, field.start(), field.name.span, || {
            format!("field `{owner}.{name}`")
        })?;
        let referenced_by = format!("`{owner}.{name}`");
        Ok(IrField {
            ty: self.ir_type(&field.ty, &referenced_by)?,
            arguments: self.arguments(&field.arguments, &referenced_by)?,
            default_value: None,
            description: field.description.as_ref().map(|d| d.value.clone()),
            deprecation: ast::deprecation(&field.directives, self.schema.interner()),
            status: self.status(file, field.start()),
            name,
        })
    }

    fn input_field(
        &self,
        owner: &str,
        file: FileId,
        field: &InputValueDefinition,
    ) -> Result<IrField, TransformError> {
        let name = self.schema.name(field.name.value);
        self.reject_wrapper_marker(file, field.start(), field.name.span, || {
            format!("input field `{owner}.{name}`")
        })?;
        let referenced_by = format!("`{owner}.{name}`");
        Ok(IrField {
            ty: self.ir_type(&field.ty, &referenced_by)?,
            arguments: Vec::new(),
            default_value: field.default_value.as_ref().map(|value| self.value(value)),
            description: field.description.as_ref().map(|d| d.value.clone()),
            deprecation: ast::deprecation(&field.directives, self.schema.interner()),
            status: self.status(file, field.start()),
            name,
        })
    }

    fn arguments(
        &self,
        arguments: &[InputValueDefinition],
        owner: &str,
    ) -> Result<Vec<IrArg>, TransformError> {
        arguments
            .iter()
            .map(|arg| {
                let name = self.schema.name(arg.name.value);
                Ok(IrArg {
                    ty: self.ir_type(&arg.ty, &format!("argument `{name}` of {owner}"))?,
                    default_value: arg.default_value.as_ref().map(|value| self.value(value)),
                    description: arg.description.as_ref().map(|d| d.value.clone()),
                    deprecation: ast::deprecation(&arg.directives, self.schema.interner()),
                    name,
                })
            })
            .collect()
    }

    fn wrapper_members(&self, ty: &SchemaType) -> Result<Vec<IrUnionMember>, TransformError> {
        ty.fields()
            .map(|(file, field)| {
                let name = self.schema.name(field.name.value);
                let invalid = |reason: String| TransformError::InvalidWrapperMember {
                    wrapper: ty.name.clone(),
                    field: name.clone(),
                    reason,
                    location: self.location(file, field.name.span),
                };

                if !field.arguments.is_empty() {
                    return Err(invalid("takes arguments".to_string()));
                }
                let referenced_by = format!("`{}.{name}`", ty.name);
                let member = self.ir_type(&field.ty, &referenced_by)?;
                if member.is_list() {
                    return Err(invalid(format!("is the list type `{member}`")));
                }
                match member.named_type() {
                    Some(IrNamedType {
                        kind: NamedKind::Object | NamedKind::Interface | NamedKind::Union,
                        name: type_name,
                    }) => Ok(IrUnionMember {
                        name: name.clone(),
                        type_name: type_name.clone(),
                        description: field.description.as_ref().map(|d| d.value.clone()),
                        deprecation: ast::deprecation(&field.directives, self.schema.interner()),
                        status: self.status(file, field.start()),
                    }),
                    _ => Err(invalid(format!(
                        "has type `{member}`, which is not an object, interface or union"
                    ))),
                }
            })
            .collect()
    }

    fn ir_type(&self, ty: &ast::Type, referenced_by: &str) -> Result<IrType, TransformError> {
        match ty {
            ast::Type::Named(named) => {
                let name = self.schema.name(named.name);
                if self.schema.interner().is_builtin_scalar(named.name) {
                    return Ok(IrType::Scalar(name));
                }
                let kind = match self.schema.kind_of(named.name) {
                    Some(TypeKind::Scalar) => NamedKind::Scalar,
                    Some(TypeKind::Enum) => NamedKind::Enum,
                    Some(TypeKind::Object) if self.wrappers.contains(&name) => NamedKind::Union,
                    Some(TypeKind::Object) => NamedKind::Object,
                    Some(TypeKind::Interface) => NamedKind::Interface,
                    Some(TypeKind::Union) => NamedKind::Union,
                    Some(TypeKind::InputObject) => NamedKind::Input,
                    None => {
                        return Err(TransformError::UnresolvedType {
                            name,
                            referenced_by: referenced_by.to_string(),
                        })
                    }
                };
                Ok(IrType::named(name, kind))
            }
            ast::Type::List(inner, _) => Ok(IrType::list(self.ir_type(inner, referenced_by)?)),
            ast::Type::NonNull(inner, _) => {
                Ok(IrType::non_null(self.ir_type(inner, referenced_by)?))
            }
        }
    }

    fn value(&self, value: &ast::Value) -> IrValue {
        match value {
            ast::Value::Int(value, _) => IrValue::Int(*value),
            ast::Value::Float(value, _) => IrValue::Float(*value),
            ast::Value::String(value, _) => IrValue::String(value.clone()),
            ast::Value::Boolean(value, _) => IrValue::Boolean(*value),
            ast::Value::Enum(name) => IrValue::Enum(self.schema.name(name.value)),
            ast::Value::List(items, _) => {
                IrValue::List(items.iter().map(|item| self.value(item)).collect())
            }
            ast::Value::Object(fields, _) => IrValue::Object(
                fields
                    .iter()
                    .map(|(name, value)| (self.schema.name(name.value), self.value(value)))
                    .collect::<IndexMap<_, _>>(),
            ),
            // Variables never parse in const positions.
            ast::Value::Null(_) | ast::Value::Variable(_) => IrValue::Null,
        }
    }

    fn operations(&mut self) -> Result<(), TransformError> {
        let schema = self.schema;
        for operation in OperationType::ALL {
            let Some(root) = schema.root_type(operation) else {
                continue;
            };
            let root_status = self.status(root.file, root.definition.start());
            let fields = root
                .fields()
                .map(|(file, field)| {
                    let field = self.field(&root.name, file, field)?;
                    let status = if root_status.is_future() {
                        Status::Future
                    } else {
                        field.status
                    };
                    Ok(IrOperationField {
                        name: field.name,
                        arguments: field.arguments,
                        return_type: field.ty,
                        description: field.description,
                        deprecation: field.deprecation,
                        status,
                    })
                })
                .collect::<Result<Vec<_>, TransformError>>()?;
            tracing::debug!(operation = ?operation, fields = fields.len(), "transformed root type");
            self.ir.operations.push(IrOperation {
                kind: match operation {
                    OperationType::Query => OperationKind::Query,
                    OperationType::Mutation => OperationKind::Mutation,
                    OperationType::Subscription => OperationKind::Subscription,
                },
                type_name: root.name.clone(),
                fields,
            });
        }
        Ok(())
    }

    fn legacy_aliases(&mut self) -> Result<(), TransformError> {
        let table = &self.tables.error_code_legacy_aliases;
        if table.is_empty() {
            return Ok(());
        }
        let enum_name = self.tables.error_code_enum.clone();
        let Some(target) = self.ir.enums.iter_mut().find(|e| e.name == enum_name) else {
            return Err(TransformError::UnresolvedType {
                name: enum_name,
                referenced_by: "error_code_legacy_aliases".to_string(),
            });
        };

        for (canonical, aliases) in table {
            let Some(ordinal) = target.value(canonical).map(|v| v.ordinal) else {
                return Err(TransformError::UnknownAliasTarget {
                    enum_name,
                    canonical: canonical.clone(),
                });
            };
            for alias in aliases {
                let taken = target.values.iter().any(|v| v.name == *alias)
                    || target.aliases.iter().any(|a| a.name == *alias);
                if taken {
                    return Err(TransformError::DuplicateAlias {
                        enum_name,
                        alias: alias.clone(),
                    });
                }
                target.aliases.push(IrEnumAlias {
                    name: alias.clone(),
                    canonical: canonical.clone(),
                    ordinal,
                });
            }
        }
        tracing::debug!(
            enum_name = %enum_name,
            aliases = target.aliases.len(),
            "synthesised legacy aliases"
        );
        Ok(())
    }

    fn platform_defaults(&mut self) -> Result<(), TransformError> {
        let mut rows = Vec::new();
        for (type_name, fields) in &self.tables.platform_type_defaults {
            let declared: Option<&[IrField]> = self
                .ir
                .find_object(type_name)
                .map(|o| o.fields.as_slice())
                .or_else(|| self.ir.find_input(type_name).map(|i| i.fields.as_slice()))
                .or_else(|| self.ir.find_interface(type_name).map(|i| i.fields.as_slice()));
            let Some(declared) = declared else {
                return Err(TransformError::UnresolvedType {
                    name: type_name.clone(),
                    referenced_by: "platform_type_defaults".to_string(),
                });
            };

            for (field_name, values) in fields {
                if !declared.iter().any(|f| f.name == *field_name) {
                    return Err(TransformError::UnresolvedField {
                        type_name: type_name.clone(),
                        field: field_name.clone(),
                        referenced_by: "platform_type_defaults".to_string(),
                    });
                }
                rows.push(IrPlatformDefault {
                    type_name: type_name.clone(),
                    field_name: field_name.clone(),
                    values: values.clone(),
                });
            }
        }
        self.ir.platform_defaults = rows;
        Ok(())
    }

    fn custom_inputs(&self) -> Result<(), TransformError> {
        for name in self.tables.custom_input_types.keys() {
            match self.schema.kind_of_name(name) {
                Some(TypeKind::InputObject) => {}
                Some(kind) => {
                    return Err(TransformError::NotAnInputType {
                        name: name.clone(),
                        kind: kind.to_string(),
                        referenced_by: "custom_input_types".to_string(),
                    })
                }
                None => {
                    return Err(TransformError::UnresolvedType {
                        name: name.clone(),
                        referenced_by: "custom_input_types".to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}
