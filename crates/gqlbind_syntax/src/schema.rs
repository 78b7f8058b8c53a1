//! Multi-file schema loading.
//!
//! Every file is parsed on its own, then type declarations are merged into a
//! single ordered type map (file order, then declaration order) and the result
//! is validated the way `buildASTSchema` would.

use crate::ast::*;
use crate::error::{SchemaParseError, SourceIssue};
use crate::markers::{self, opens_line, MarkerTable};
use crate::parser;
use gqlbind_core::{
    diagnostics::codes, Diagnostic, DiagnosticBag, FileId, Interner, Location, SourceFile,
    SourceMap, Span, Text,
};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::path::Path;

/// A type declaration merged with its extensions.
#[derive(Debug, Clone)]
pub struct SchemaType {
    pub name: String,
    /// File holding the original declaration.
    pub file: FileId,
    pub definition: TypeDefinition,
    /// `extend` blocks in the order they were read.
    pub extensions: Vec<TypeExtension>,
}

/// One `extend` block applied to a type.
#[derive(Debug, Clone)]
pub struct TypeExtension {
    pub file: FileId,
    pub definition: TypeDefinition,
}

impl SchemaType {
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.definition.kind()
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.definition.name().span.in_file(self.file)
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.definition.description().map(|d| d.value.as_str())
    }

    /// The declaration followed by its extensions, each with its file.
    pub fn parts(&self) -> impl Iterator<Item = (FileId, &TypeDefinition)> {
        std::iter::once((self.file, &self.definition))
            .chain(self.extensions.iter().map(|ext| (ext.file, &ext.definition)))
    }

    /// Directives of the declaration and all extensions.
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.parts().flat_map(|(_, def)| def.directives())
    }

    /// Fields of an object or interface, extensions included.
    pub fn fields(&self) -> impl Iterator<Item = (FileId, &FieldDefinition)> {
        self.parts().flat_map(|(file, def)| {
            let fields: &[FieldDefinition] = match def {
                TypeDefinition::Object(obj) => &obj.fields,
                TypeDefinition::Interface(iface) => &iface.fields,
                _ => &[],
            };
            fields.iter().map(move |field| (file, field))
        })
    }

    /// Fields of an input object, extensions included.
    pub fn input_fields(&self) -> impl Iterator<Item = (FileId, &InputValueDefinition)> {
        self.parts().flat_map(|(file, def)| {
            let fields: &[InputValueDefinition] = match def {
                TypeDefinition::Input(input) => &input.fields,
                _ => &[],
            };
            fields.iter().map(move |field| (file, field))
        })
    }

    /// Values of an enum, extensions included.
    pub fn enum_values(&self) -> impl Iterator<Item = (FileId, &EnumValueDefinition)> {
        self.parts().flat_map(|(file, def)| {
            let values: &[EnumValueDefinition] = match def {
                TypeDefinition::Enum(e) => &e.values,
                _ => &[],
            };
            values.iter().map(move |value| (file, value))
        })
    }

    /// Members of a union, extensions included.
    pub fn union_members(&self) -> impl Iterator<Item = (FileId, &Name)> {
        self.parts().flat_map(|(file, def)| {
            let members: &[Name] = match def {
                TypeDefinition::Union(u) => &u.members,
                _ => &[],
            };
            members.iter().map(move |member| (file, member))
        })
    }

    /// Interfaces named in `implements`, extensions included.
    pub fn implements(&self) -> impl Iterator<Item = (FileId, &Name)> {
        self.parts().flat_map(|(file, def)| {
            let names: &[Name] = match def {
                TypeDefinition::Object(obj) => &obj.implements,
                TypeDefinition::Interface(iface) => &iface.implements,
                _ => &[],
            };
            names.iter().map(move |name| (file, name))
        })
    }
}

/// A loaded, merged and validated schema.
#[derive(Debug)]
pub struct ParsedSchema {
    sources: SourceMap,
    interner: Interner,
    types: IndexMap<Text, SchemaType>,
    roots: BTreeMap<OperationType, Text>,
    directives: Vec<(FileId, DirectiveDefinitionNode)>,
}

impl ParsedSchema {
    #[must_use]
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    #[must_use]
    pub fn source(&self, file: FileId) -> &SourceFile {
        self.sources.get(file)
    }

    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Resolves an interned name.
    #[must_use]
    pub fn name(&self, text: Text) -> String {
        self.interner.get(text)
    }

    /// Named types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.values()
    }

    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&SchemaType> {
        self.interner
            .lookup(name)
            .and_then(|text| self.types.get(&text))
    }

    /// Kind of a named type, built-in scalars included.
    #[must_use]
    pub fn kind_of(&self, name: Text) -> Option<TypeKind> {
        if self.interner.is_builtin_scalar(name) {
            return Some(TypeKind::Scalar);
        }
        self.types.get(&name).map(SchemaType::kind)
    }

    /// Kind of a named type looked up by spelling.
    #[must_use]
    pub fn kind_of_name(&self, name: &str) -> Option<TypeKind> {
        self.interner.lookup(name).and_then(|text| self.kind_of(text))
    }

    /// The root type of an operation, if the schema has one.
    #[must_use]
    pub fn root_type(&self, operation: OperationType) -> Option<&SchemaType> {
        self.roots
            .get(&operation)
            .and_then(|name| self.types.get(name))
    }

    /// Whether `name` is the root type of some operation.
    #[must_use]
    pub fn is_root_type(&self, name: Text) -> bool {
        self.roots.values().any(|root| *root == name)
    }

    /// Directive definitions in declaration order.
    pub fn directive_definitions(&self) -> impl Iterator<Item = (FileId, &DirectiveDefinitionNode)> {
        self.directives.iter().map(|(file, def)| (*file, def))
    }
}

/// Reads and parses SDL files, in the given order.
pub fn parse<P: AsRef<Path>>(paths: &[P]) -> Result<(ParsedSchema, MarkerTable), SchemaParseError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        files.push(SourceFile::new(path, text));
    }
    parse_sources(files)
}

/// Parses already loaded SDL sources, in the given order.
pub fn parse_sources(
    files: Vec<SourceFile>,
) -> Result<(ParsedSchema, MarkerTable), SchemaParseError> {
    let mut sources = SourceMap::new();
    let ids: Vec<FileId> = files.into_iter().map(|file| sources.add(file)).collect();

    let interner = Interner::new();
    let mut markers = MarkerTable::new();
    let mut documents = Vec::with_capacity(ids.len());

    for id in ids {
        let source = sources.get(id);
        let result = parser::parse(source.text(), id, &interner);
        if result.diagnostics.has_errors() {
            let mut tagged = DiagnosticBag::new();
            tagged.absorb(result.diagnostics, id);
            return Err(SchemaParseError::Syntax {
                file: source.name(),
                issues: issues(&tagged, &sources),
            });
        }
        tracing::debug!(
            file = %source.name(),
            definitions = result.document.definitions.len(),
            "parsed schema file"
        );

        match markers::scan(source) {
            Ok(found) => found.into_iter().for_each(|marker| markers.insert(marker)),
            Err(dangling) => {
                let first = &dangling[0];
                return Err(SchemaParseError::DanglingMarker {
                    kind: first.kind,
                    location: sources.describe(first.span.in_file(id)),
                    src: source.named_source(),
                    span: first.span.into(),
                });
            }
        }
        documents.push(result.document);
    }

    let schema = SchemaBuilder::new(sources, interner).build(documents)?;
    check_markers(&schema, &markers)?;

    tracing::info!(
        files = schema.sources.len(),
        types = schema.types.len(),
        markers = markers.len(),
        "schema loaded"
    );
    Ok((schema, markers))
}

fn issues(bag: &DiagnosticBag, sources: &SourceMap) -> Vec<SourceIssue> {
    bag.iter()
        .map(|diagnostic| SourceIssue::from_diagnostic(diagnostic, sources))
        .collect()
}

struct SchemaBuilder {
    sources: SourceMap,
    interner: Interner,
    types: IndexMap<Text, SchemaType>,
}

impl SchemaBuilder {
    fn new(sources: SourceMap, interner: Interner) -> Self {
        Self {
            sources,
            interner,
            types: IndexMap::new(),
        }
    }

    fn build(mut self, documents: Vec<Document>) -> Result<ParsedSchema, SchemaParseError> {
        let mut extensions = Vec::new();
        let mut schema_definitions = Vec::new();
        let mut directives = Vec::new();

        for document in documents {
            let file = document.file;
            for definition in document.definitions {
                match definition {
                    Definition::Type(def) => self.declare(file, def)?,
                    Definition::Extension(def) => extensions.push(TypeExtension {
                        file,
                        definition: def,
                    }),
                    Definition::Schema(def) => schema_definitions.push((file, def, false)),
                    Definition::SchemaExtension(def) => schema_definitions.push((file, def, true)),
                    Definition::Directive(def) => directives.push((file, def)),
                }
            }
        }

        for extension in extensions {
            self.extend(extension)?;
        }

        let mut bag = DiagnosticBag::new();
        let roots = self.resolve_roots(&schema_definitions, &mut bag);

        let schema = ParsedSchema {
            sources: self.sources,
            interner: self.interner,
            types: self.types,
            roots,
            directives,
        };

        Validator::new(&schema, &mut bag).validate();

        if bag.has_errors() {
            return Err(SchemaParseError::Invalid {
                issues: issues(&bag, &schema.sources),
            });
        }
        Ok(schema)
    }

    fn declare(&mut self, file: FileId, definition: TypeDefinition) -> Result<(), SchemaParseError> {
        let name = definition.name();
        let second = name.span.in_file(file);

        let first = if self.interner.is_builtin_scalar(name.value) {
            Some("built-in scalar".to_string())
        } else {
            self.types
                .get(&name.value)
                .map(|existing| self.sources.describe(existing.location()))
        };

        if let Some(first) = first {
            let spelled = self.interner.get(name.value);
            return Err(SchemaParseError::DuplicateType {
                help: format!("`{spelled}` was first declared at {first}"),
                name: spelled,
                first,
                second: self.sources.describe(second),
                src: self.sources.get(file).named_source(),
                span: name.span.into(),
            });
        }

        self.types.insert(
            name.value,
            SchemaType {
                name: self.interner.get(name.value),
                file,
                definition,
                extensions: Vec::new(),
            },
        );
        Ok(())
    }

    fn extend(&mut self, extension: TypeExtension) -> Result<(), SchemaParseError> {
        let name = extension.definition.name();
        let kind = extension.definition.kind();

        let reason = match self.types.get_mut(&name.value) {
            Some(existing) if existing.kind() == kind => {
                existing.extensions.push(extension);
                return Ok(());
            }
            Some(existing) => format!("declared as {} but extended as {kind}", existing.kind()),
            None => "the type is not declared in any schema file".to_string(),
        };

        let span = extension.definition.span();
        Err(SchemaParseError::InvalidExtension {
            name: self.interner.get(name.value),
            reason,
            location: self.sources.describe(span.in_file(extension.file)),
            src: self.sources.get(extension.file).named_source(),
            span: span.into(),
        })
    }

    /// Root operation types from `schema` blocks, or the conventional names.
    fn resolve_roots(
        &self,
        definitions: &[(FileId, SchemaDefinition, bool)],
        bag: &mut DiagnosticBag,
    ) -> BTreeMap<OperationType, Text> {
        let mut roots = BTreeMap::new();

        let mut seen_schema: Option<Location> = None;
        for (file, definition, is_extension) in definitions {
            if !is_extension {
                if let Some(first) = seen_schema {
                    bag.add(
                        Diagnostic::error(codes::DUPLICATE_SCHEMA, "duplicate schema definition")
                            .with_message(format!(
                                "a schema definition already exists at {}",
                                self.sources.describe(first)
                            ))
                            .with_span(definition.span, "second schema definition")
                            .in_file(*file),
                    );
                }
                seen_schema.get_or_insert(definition.span.in_file(*file));
            }

            for operation in &definition.operations {
                if roots
                    .insert(operation.operation, operation.type_name.value)
                    .is_some()
                {
                    bag.add(
                        Diagnostic::error(codes::DUPLICATE_SCHEMA, "duplicate root operation")
                            .with_message(format!(
                                "{:?} root type is defined more than once",
                                operation.operation
                            ))
                            .with_span(operation.span, "defined again here")
                            .in_file(*file),
                    );
                }
                let type_name = operation.type_name;
                match self.types.get(&type_name.value).map(SchemaType::kind) {
                    Some(TypeKind::Object) => {}
                    Some(kind) => bag.add(
                        Diagnostic::error(codes::WRONG_TYPE_KIND, "root type must be an object")
                            .with_message(format!(
                                "`{}` is a {kind}",
                                self.interner.get(type_name.value)
                            ))
                            .with_span(type_name.span, "not an object type")
                            .in_file(*file),
                    ),
                    None => bag.add(
                        Diagnostic::error(codes::UNDEFINED_TYPE, "unknown root type")
                            .with_message(format!(
                                "`{}` is not defined",
                                self.interner.get(type_name.value)
                            ))
                            .with_span(type_name.span, "unknown type")
                            .in_file(*file),
                    ),
                }
            }
        }

        if definitions.is_empty() {
            for operation in OperationType::ALL {
                let conventional = self
                    .interner
                    .lookup(operation.default_type_name())
                    .filter(|name| {
                        self.types
                            .get(name)
                            .is_some_and(|ty| ty.kind() == TypeKind::Object)
                    });
                if let Some(name) = conventional {
                    roots.insert(operation, name);
                }
            }
        }

        roots
    }
}

/// Structural validation over the merged type map.
struct Validator<'s, 'b> {
    schema: &'s ParsedSchema,
    bag: &'b mut DiagnosticBag,
}

impl<'s, 'b> Validator<'s, 'b> {
    fn new(schema: &'s ParsedSchema, bag: &'b mut DiagnosticBag) -> Self {
        Self { schema, bag }
    }

    fn validate(&mut self) {
        let schema = self.schema;
        for ty in schema.types() {
            match ty.kind() {
                TypeKind::Object | TypeKind::Interface => {
                    self.validate_implements(ty);
                    self.validate_fields(ty);
                }
                TypeKind::Union => self.validate_union(ty),
                TypeKind::Enum => self.validate_enum(ty),
                TypeKind::InputObject => self.validate_input(ty),
                TypeKind::Scalar => {}
            }
            self.validate_not_empty(ty);
        }
        self.validate_input_cycles();
    }

    /// Every type but a scalar needs at least one field, value or member
    /// once its extensions are merged.
    fn validate_not_empty(&mut self, ty: &SchemaType) {
        let (count, what) = match ty.kind() {
            TypeKind::Object | TypeKind::Interface => (ty.fields().count(), "field"),
            TypeKind::InputObject => (ty.input_fields().count(), "field"),
            TypeKind::Enum => (ty.enum_values().count(), "value"),
            TypeKind::Union => (ty.union_members().count(), "member"),
            TypeKind::Scalar => return,
        };
        if count == 0 {
            self.error(
                ty.file,
                codes::EMPTY_TYPE,
                "empty type",
                ty.definition.name().span,
                format!("{} `{}` must declare at least one {what}", ty.kind(), ty.name),
            );
        }
    }

    fn error(&mut self, file: FileId, code: &'static str, title: &str, span: Span, message: String) {
        self.bag.add(
            Diagnostic::error(code, title)
                .with_message(message.clone())
                .with_span(span, message)
                .in_file(file),
        );
    }

    /// Checks that a referenced type exists and has the right direction.
    fn check_reference(&mut self, file: FileId, ty: &Type, owner: &str, input: bool) {
        let named = ty.named_type();
        let spelled = self.schema.name(named.name);
        match self.schema.kind_of(named.name) {
            None => self.error(
                file,
                codes::UNDEFINED_TYPE,
                "unknown type",
                named.span,
                format!("`{owner}` refers to unknown type `{spelled}`"),
            ),
            Some(kind) if input && !kind.is_input() => self.error(
                file,
                codes::WRONG_TYPE_KIND,
                "output type in input position",
                named.span,
                format!("`{owner}` must be an input type, but `{spelled}` is declared as {kind}"),
            ),
            Some(kind) if !input && !kind.is_output() => self.error(
                file,
                codes::WRONG_TYPE_KIND,
                "input type in output position",
                named.span,
                format!("`{owner}` must be an output type, but `{spelled}` is declared as {kind}"),
            ),
            Some(_) => {}
        }
    }

    fn validate_implements(&mut self, ty: &SchemaType) {
        let mut seen = FxHashSet::default();
        for (file, interface) in ty.implements() {
            let spelled = self.schema.name(interface.value);
            if !seen.insert(interface.value) {
                self.error(
                    file,
                    codes::DUPLICATE_MEMBER,
                    "duplicate interface",
                    interface.span,
                    format!("`{}` implements `{spelled}` more than once", ty.name),
                );
                continue;
            }
            match self.schema.kind_of(interface.value) {
                Some(TypeKind::Interface) => {}
                None => self.error(
                    file,
                    codes::UNDEFINED_TYPE,
                    "unknown type",
                    interface.span,
                    format!("`{}` implements unknown interface `{spelled}`", ty.name),
                ),
                Some(kind) => self.error(
                    file,
                    codes::WRONG_TYPE_KIND,
                    "not an interface",
                    interface.span,
                    format!("`{}` implements `{spelled}`, which is declared as {kind}", ty.name),
                ),
            }
        }
    }

    fn validate_fields(&mut self, ty: &SchemaType) {
        let mut seen = FxHashSet::default();
        for (file, field) in ty.fields() {
            let field_name = self.schema.name(field.name.value);
            let owner = format!("{}.{field_name}", ty.name);
            if !seen.insert(field.name.value) {
                self.error(
                    file,
                    codes::DUPLICATE_FIELD,
                    "duplicate field",
                    field.name.span,
                    format!("field `{owner}` is declared more than once"),
                );
            }
            self.check_reference(file, &field.ty, &owner, false);

            let mut arguments = FxHashSet::default();
            for argument in &field.arguments {
                let argument_name = self.schema.name(argument.name.value);
                let owner = format!("{owner}({argument_name}:)");
                if !arguments.insert(argument.name.value) {
                    self.error(
                        file,
                        codes::DUPLICATE_ARGUMENT,
                        "duplicate argument",
                        argument.name.span,
                        format!("argument `{owner}` is declared more than once"),
                    );
                }
                self.check_reference(file, &argument.ty, &owner, true);
            }
        }
    }

    fn validate_union(&mut self, ty: &SchemaType) {
        let mut seen = FxHashSet::default();
        for (file, member) in ty.union_members() {
            let spelled = self.schema.name(member.value);
            if !seen.insert(member.value) {
                self.error(
                    file,
                    codes::DUPLICATE_MEMBER,
                    "duplicate union member",
                    member.span,
                    format!("`{spelled}` appears more than once in union `{}`", ty.name),
                );
                continue;
            }
            match self.schema.kind_of(member.value) {
                Some(TypeKind::Object) => {}
                None => self.error(
                    file,
                    codes::UNDEFINED_TYPE,
                    "unknown type",
                    member.span,
                    format!("union `{}` refers to unknown type `{spelled}`", ty.name),
                ),
                Some(kind) => self.error(
                    file,
                    codes::WRONG_TYPE_KIND,
                    "union member must be an object type",
                    member.span,
                    format!("union `{}` includes `{spelled}`, which is declared as {kind}", ty.name),
                ),
            }
        }
    }

    fn validate_enum(&mut self, ty: &SchemaType) {
        let mut seen = FxHashSet::default();
        for (file, value) in ty.enum_values() {
            if !seen.insert(value.name.value) {
                let spelled = self.schema.name(value.name.value);
                self.error(
                    file,
                    codes::DUPLICATE_ENUM_VALUE,
                    "duplicate enum value",
                    value.name.span,
                    format!("`{}.{spelled}` is declared more than once", ty.name),
                );
            }
        }
    }

    fn validate_input(&mut self, ty: &SchemaType) {
        let mut seen = FxHashSet::default();
        for (file, field) in ty.input_fields() {
            let owner = format!("{}.{}", ty.name, self.schema.name(field.name.value));
            if !seen.insert(field.name.value) {
                self.error(
                    file,
                    codes::DUPLICATE_FIELD,
                    "duplicate field",
                    field.name.span,
                    format!("input field `{owner}` is declared more than once"),
                );
            }
            self.check_reference(file, &field.ty, &owner, true);
        }
    }

    /// Input objects may not reference themselves through non-null,
    /// non-list fields: such a value could never be constructed.
    fn validate_input_cycles(&mut self) {
        let mut edges: FxHashMap<Text, Vec<(FileId, &'s InputValueDefinition, Text)>> =
            FxHashMap::default();
        let schema = self.schema;
        for ty in schema.types() {
            if ty.kind() != TypeKind::InputObject {
                continue;
            }
            let name = ty.definition.name().value;
            for (file, field) in ty.input_fields() {
                if let Type::NonNull(inner, _) = &field.ty {
                    if let Type::Named(named) = inner.as_ref() {
                        if schema.kind_of(named.name) == Some(TypeKind::InputObject) {
                            edges.entry(name).or_default().push((file, field, named.name));
                        }
                    }
                }
            }
        }

        let mut done = FxHashSet::default();
        for ty in schema.types() {
            let start = ty.definition.name().value;
            if ty.kind() == TypeKind::InputObject && !done.contains(&start) {
                let mut path = Vec::new();
                self.visit_input(start, &edges, &mut path, &mut done);
            }
        }
    }

    fn visit_input(
        &mut self,
        node: Text,
        edges: &FxHashMap<Text, Vec<(FileId, &'s InputValueDefinition, Text)>>,
        path: &mut Vec<Text>,
        done: &mut FxHashSet<Text>,
    ) {
        path.push(node);
        for &(file, field, target) in edges.get(&node).map_or(&[][..], Vec::as_slice) {
            if let Some(position) = path.iter().position(|&p| p == target) {
                let cycle: Vec<String> = path[position..]
                    .iter()
                    .chain(std::iter::once(&target))
                    .map(|&name| self.schema.name(name))
                    .collect();
                self.error(
                    file,
                    codes::INPUT_CYCLE,
                    "circular input reference",
                    field.span,
                    format!(
                        "non-null input fields form a cycle: {}",
                        cycle.join(" -> ")
                    ),
                );
            } else if !done.contains(&target) {
                self.visit_input(target, edges, path, done);
            }
        }
        path.pop();
        done.insert(node);
    }
}

/// Every marked line must open a type, field, input field or enum value.
fn check_markers(schema: &ParsedSchema, markers: &MarkerTable) -> Result<(), SchemaParseError> {
    if markers.is_empty() {
        return Ok(());
    }

    let mut declared: FxHashSet<(FileId, u32)> = FxHashSet::default();
    let mut record = |file: FileId, offset: u32| {
        let source = schema.source(file);
        if opens_line(source, offset) {
            declared.insert((file, source.line_of(offset)));
        }
    };

    for ty in schema.types() {
        record(ty.file, ty.definition.start());
        for (file, field) in ty.fields() {
            record(file, field.start());
        }
        for (file, field) in ty.input_fields() {
            record(file, field.start());
        }
        for (file, value) in ty.enum_values() {
            record(file, value.start());
        }
    }

    match markers
        .iter()
        .find(|marker| !declared.contains(&(marker.file, marker.target_line)))
    {
        None => Ok(()),
        Some(marker) => {
            let source = schema.source(marker.file);
            Err(SchemaParseError::DetachedMarker {
                kind: marker.kind,
                location: schema.sources.describe(marker.span.in_file(marker.file)),
                src: source.named_source(),
                span: marker.span.into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::MarkerKind;

    fn load(files: &[(&str, &str)]) -> Result<(ParsedSchema, MarkerTable), SchemaParseError> {
        parse_sources(
            files
                .iter()
                .map(|(path, text)| SourceFile::new(*path, *text))
                .collect(),
        )
    }

    fn invalid_codes(error: &SchemaParseError) -> Vec<&'static str> {
        error.issues().iter().map(|issue| issue.code).collect()
    }

    #[test]
    fn test_types_keep_file_and_declaration_order() {
        let (schema, _) = load(&[
            ("a.graphql", "type B { a: A }\ntype A { id: ID }"),
            ("b.graphql", "enum C { X }"),
        ])
        .unwrap();
        let names: Vec<_> = schema.types().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn test_duplicate_type_across_files() {
        let err = load(&[
            ("a.graphql", "type Product { id: ID }"),
            ("b.graphql", "\ntype Product { id: ID }"),
        ])
        .unwrap_err();
        match err {
            SchemaParseError::DuplicateType {
                name,
                first,
                second,
                ..
            } => {
                assert_eq!(name, "Product");
                assert_eq!(first, "a.graphql:1:6");
                assert_eq!(second, "b.graphql:2:6");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extensions_merge_in_order() {
        let (schema, _) = load(&[
            ("type.graphql", "type Product { id: ID! }\nenum Store { APP_STORE }"),
            (
                "type-ios.graphql",
                "extend type Product { ios: String }\nextend enum Store { PLAY_STORE }",
            ),
        ])
        .unwrap();
        let product = schema.get_type("Product").unwrap();
        let fields: Vec<_> = product
            .fields()
            .map(|(_, f)| schema.name(f.name.value))
            .collect();
        assert_eq!(fields, ["id", "ios"]);
        assert_eq!(product.extensions[0].file, FileId::from_raw(1));

        let store = schema.get_type("Store").unwrap();
        assert_eq!(store.enum_values().count(), 2);
    }

    #[test]
    fn test_invalid_extensions() {
        let err = load(&[("a.graphql", "extend type Missing { a: Int }")]).unwrap_err();
        assert_eq!(err.kind(), "invalid_extension");

        let err = load(&[("a.graphql", "enum Color { RED }\nextend type Color { a: Int }")])
            .unwrap_err();
        assert!(matches!(err, SchemaParseError::InvalidExtension { name, .. } if name == "Color"));
    }

    #[test]
    fn test_unknown_types_and_kind_misuse() {
        let err = load(&[(
            "a.graphql",
            r#"
            input Filter { product: Product }
            type Product { id: ID filter: Filter store: Missing }
            union U = Product | Filter
            type Cart implements Product { id: ID }
            "#,
        )])
        .unwrap_err();
        let codes = invalid_codes(&err);
        assert_eq!(
            codes,
            [
                codes::WRONG_TYPE_KIND,
                codes::WRONG_TYPE_KIND,
                codes::UNDEFINED_TYPE,
                codes::WRONG_TYPE_KIND,
                codes::WRONG_TYPE_KIND,
            ]
        );
    }

    #[test]
    fn test_duplicate_fields_and_values() {
        let err = load(&[
            ("a.graphql", "type A { id: ID }\nenum E { X Y }"),
            ("b.graphql", "extend type A { id: ID }\nextend enum E { X }"),
        ])
        .unwrap_err();
        assert_eq!(
            invalid_codes(&err),
            [codes::DUPLICATE_FIELD, codes::DUPLICATE_ENUM_VALUE]
        );
        assert!(err.issues()[0].location.starts_with("b.graphql:1:"));
    }

    #[test]
    fn test_circular_non_null_inputs() {
        let err = load(&[(
            "a.graphql",
            "input A { b: B! }\ninput B { a: A! }\ninput C { c: C }\ninput D { d: [D!]! }",
        )])
        .unwrap_err();
        assert_eq!(invalid_codes(&err), [codes::INPUT_CYCLE]);
        assert!(err.issues()[0].message.contains("A -> B -> A"));
    }

    #[test]
    fn test_empty_types_are_rejected() {
        let err = load(&[(
            "a.graphql",
            "enum E {}\ntype T {}\ninput I {}\ninterface N\nunion U\nscalar Date",
        )])
        .unwrap_err();
        assert_eq!(invalid_codes(&err), [codes::EMPTY_TYPE; 5]);
        assert_eq!(err.issues()[0].message, "enum `E` must declare at least one value");
        assert_eq!(err.issues()[0].location, "a.graphql:1:6");

        // Fields added by an extension count.
        let (schema, _) = load(&[
            ("a.graphql", "type Query"),
            ("b.graphql", "extend type Query { ping: Boolean }"),
        ])
        .unwrap();
        assert_eq!(schema.get_type("Query").unwrap().fields().count(), 1);
    }

    #[test]
    fn test_root_operations() {
        let (schema, _) = load(&[("a.graphql", "type Query { a: Int }")]).unwrap();
        assert_eq!(
            schema.root_type(OperationType::Query).map(|t| t.name.as_str()),
            Some("Query")
        );
        assert!(schema.root_type(OperationType::Mutation).is_none());

        let (schema, _) = load(&[(
            "a.graphql",
            "schema { query: Root }\ntype Root { a: Int }\ntype Query { b: Int }",
        )])
        .unwrap();
        assert_eq!(
            schema.root_type(OperationType::Query).map(|t| t.name.as_str()),
            Some("Root")
        );
    }

    #[test]
    fn test_marker_association() {
        let (schema, markers) = load(&[(
            "a.graphql",
            "type A { id: ID }\n# => Union\n\ntype Foo { a: A }\n",
        )])
        .unwrap();
        let foo = schema.get_type("Foo").unwrap();
        let source = schema.source(foo.file);
        assert!(markers.has(source, foo.definition.start(), MarkerKind::UnionWrapper));
    }

    #[test]
    fn test_marker_before_description_attaches_to_declaration() {
        let (schema, markers) = load(&[(
            "a.graphql",
            "type A {\n  # Future\n  \"\"\"\n  Later.\n  \"\"\"\n  b: Int\n}\n",
        )])
        .unwrap();
        let a = schema.get_type("A").unwrap();
        let (_, field) = a.fields().next().unwrap();
        assert!(markers.has(schema.source(a.file), field.start(), MarkerKind::Future));
    }

    #[test]
    fn test_dangling_marker_is_not_carried_across_files() {
        let err = load(&[
            ("a.graphql", "type A { id: ID }\n# => Union"),
            ("b.graphql", "type Foo { a: A }"),
        ])
        .unwrap_err();
        match err {
            SchemaParseError::DanglingMarker { location, kind, .. } => {
                assert_eq!(kind, MarkerKind::UnionWrapper);
                assert_eq!(location, "a.graphql:2:1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_detached_marker() {
        let err = load(&[(
            "a.graphql",
            "# Future\nschema { query: Query }\ntype Query { a: Int }",
        )])
        .unwrap_err();
        assert_eq!(err.kind(), "detached_marker");
    }

    #[test]
    fn test_syntax_error_names_file() {
        let err = load(&[("broken.graphql", "type A {")]).unwrap_err();
        match &err {
            SchemaParseError::Syntax { file, issues } => {
                assert_eq!(file, "broken.graphql");
                assert!(!issues.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = parse(&["/definitely/not/here.graphql"]).unwrap_err();
        assert_eq!(err.kind(), "io");
    }
}
