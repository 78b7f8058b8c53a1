//! Abstract Syntax Tree types for GraphQL SDL.
//!
//! Nodes own their data so a parsed schema can outlive the lexer that read it.
//! Names are interned [`Text`] ids resolved through the schema's [`Interner`].

use crate::token::DirectiveLocation;
use gqlbind_core::{FileId, Interner, Span, Text};

/// Fallback reason for `@deprecated` without an argument.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// A complete SDL document (one source file).
#[derive(Debug, Clone)]
pub struct Document {
    pub file: FileId,
    pub definitions: Vec<Definition>,
    pub span: Span,
}

/// A top-level definition.
#[derive(Debug, Clone)]
pub enum Definition {
    Schema(SchemaDefinition),
    SchemaExtension(SchemaDefinition),
    Type(TypeDefinition),
    /// `extend type ...`, `extend enum ...` and friends. The span of the
    /// wrapped definition starts at `extend`.
    Extension(TypeDefinition),
    Directive(DirectiveDefinitionNode),
}

/// Schema definition.
#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    pub description: Option<Description>,
    pub directives: Vec<Directive>,
    pub operations: Vec<OperationTypeDefinition>,
    pub span: Span,
}

/// Operation type in schema (query/mutation/subscription).
#[derive(Debug, Clone)]
pub struct OperationTypeDefinition {
    pub operation: OperationType,
    pub type_name: Name,
    pub span: Span,
}

/// Type of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub const ALL: [Self; 3] = [Self::Query, Self::Mutation, Self::Subscription];

    /// Conventional root type name used when no `schema` block names one.
    #[must_use]
    pub const fn default_type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }
}

/// The kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl TypeKind {
    /// Whether values of this kind may appear in argument or input positions.
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Scalar | Self::Enum | Self::InputObject)
    }

    /// Whether values of this kind may appear in field result positions.
    #[must_use]
    pub const fn is_output(self) -> bool {
        !matches!(self, Self::InputObject)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Object => "object type",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::InputObject => "input object",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type definitions.
#[derive(Debug, Clone)]
pub enum TypeDefinition {
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    Input(InputObjectTypeDefinition),
    Scalar(ScalarTypeDefinition),
}

impl TypeDefinition {
    #[must_use]
    pub fn name(&self) -> Name {
        match self {
            Self::Object(def) => def.name,
            Self::Interface(def) => def.name,
            Self::Union(def) => def.name,
            Self::Enum(def) => def.name,
            Self::Input(def) => def.name,
            Self::Scalar(def) => def.name,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Object(_) => TypeKind::Object,
            Self::Interface(_) => TypeKind::Interface,
            Self::Union(_) => TypeKind::Union,
            Self::Enum(_) => TypeKind::Enum,
            Self::Input(_) => TypeKind::InputObject,
            Self::Scalar(_) => TypeKind::Scalar,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&Description> {
        match self {
            Self::Object(def) => def.description.as_ref(),
            Self::Interface(def) => def.description.as_ref(),
            Self::Union(def) => def.description.as_ref(),
            Self::Enum(def) => def.description.as_ref(),
            Self::Input(def) => def.description.as_ref(),
            Self::Scalar(def) => def.description.as_ref(),
        }
    }

    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        match self {
            Self::Object(def) => &def.directives,
            Self::Interface(def) => &def.directives,
            Self::Union(def) => &def.directives,
            Self::Enum(def) => &def.directives,
            Self::Input(def) => &def.directives,
            Self::Scalar(def) => &def.directives,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Object(def) => def.span,
            Self::Interface(def) => def.span,
            Self::Union(def) => def.span,
            Self::Enum(def) => def.span,
            Self::Input(def) => def.span,
            Self::Scalar(def) => def.span,
        }
    }

    /// Offset where the declaration starts, including its description.
    #[must_use]
    pub fn start(&self) -> u32 {
        start_of(self.description(), self.span())
    }
}

/// Object type definition.
#[derive(Debug, Clone)]
pub struct ObjectTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub implements: Vec<Name>,
    pub directives: Vec<Directive>,
    pub fields: Vec<FieldDefinition>,
    pub span: Span,
}

/// Interface type definition.
#[derive(Debug, Clone)]
pub struct InterfaceTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub implements: Vec<Name>,
    pub directives: Vec<Directive>,
    pub fields: Vec<FieldDefinition>,
    pub span: Span,
}

/// Union type definition.
#[derive(Debug, Clone)]
pub struct UnionTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub members: Vec<Name>,
    pub span: Span,
}

/// Enum type definition.
#[derive(Debug, Clone)]
pub struct EnumTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub values: Vec<EnumValueDefinition>,
    pub span: Span,
}

/// Enum value definition.
#[derive(Debug, Clone)]
pub struct EnumValueDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Span,
}

impl EnumValueDefinition {
    #[must_use]
    pub fn start(&self) -> u32 {
        start_of(self.description.as_ref(), self.span)
    }
}

/// Input object type definition.
#[derive(Debug, Clone)]
pub struct InputObjectTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub fields: Vec<InputValueDefinition>,
    pub span: Span,
}

/// Scalar type definition.
#[derive(Debug, Clone)]
pub struct ScalarTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Span,
}

/// Field definition.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
    pub directives: Vec<Directive>,
    pub span: Span,
}

impl FieldDefinition {
    #[must_use]
    pub fn start(&self) -> u32 {
        start_of(self.description.as_ref(), self.span)
    }
}

/// Input value definition (argument or input field).
#[derive(Debug, Clone)]
pub struct InputValueDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub span: Span,
}

impl InputValueDefinition {
    #[must_use]
    pub fn start(&self) -> u32 {
        start_of(self.description.as_ref(), self.span)
    }
}

fn start_of(description: Option<&Description>, span: Span) -> u32 {
    description.map_or(span.start, |d| d.span.start.min(span.start))
}

/// Type reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// `User`
    Named(NamedType),
    /// `[User]`
    List(Box<Type>, Span),
    /// `User!`
    NonNull(Box<Type>, Span),
}

impl Type {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Named(named) => named.span,
            Self::List(_, span) | Self::NonNull(_, span) => *span,
        }
    }

    /// The innermost named type.
    #[must_use]
    pub fn named_type(&self) -> &NamedType {
        match self {
            Self::Named(named) => named,
            Self::List(inner, _) | Self::NonNull(inner, _) => inner.named_type(),
        }
    }

    #[must_use]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(..))
    }

    /// Renders the reference in GraphQL notation, e.g. `[String!]!`.
    #[must_use]
    pub fn display(&self, interner: &Interner) -> String {
        match self {
            Self::Named(named) => interner.get(named.name),
            Self::List(inner, _) => format!("[{}]", inner.display(interner)),
            Self::NonNull(inner, _) => format!("{}!", inner.display(interner)),
        }
    }
}

/// Named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedType {
    pub name: Text,
    pub span: Span,
}

/// Directive definition.
#[derive(Debug, Clone)]
pub struct DirectiveDefinitionNode {
    pub description: Option<Description>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
    pub span: Span,
}

/// Directive usage.
#[derive(Debug, Clone)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

impl Directive {
    #[must_use]
    pub fn argument(&self, name: Text) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|arg| arg.name.value == name)
            .map(|arg| &arg.value)
    }
}

/// Returns the `@deprecated` reason among `directives`, if the directive is
/// present.
#[must_use]
pub fn deprecation(directives: &[Directive], interner: &Interner) -> Option<String> {
    let deprecated = interner.lookup("deprecated")?;
    let directive = directives.iter().find(|d| d.name.value == deprecated)?;
    let reason = interner
        .lookup("reason")
        .and_then(|reason| directive.argument(reason));
    Some(match reason {
        Some(Value::String(reason, _)) => reason.clone(),
        _ => DEFAULT_DEPRECATION_REASON.to_string(),
    })
}

/// Argument.
#[derive(Debug, Clone)]
pub struct Argument {
    pub name: Name,
    pub value: Value,
    pub span: Span,
}

/// Value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(Name),
    Int(i64, Span),
    Float(f64, Span),
    String(String, Span),
    Boolean(bool, Span),
    Null(Span),
    Enum(Name),
    List(Vec<Value>, Span),
    Object(Vec<(Name, Value)>, Span),
}

impl Value {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Variable(name) | Self::Enum(name) => name.span,
            Self::Int(_, span)
            | Self::Float(_, span)
            | Self::String(_, span)
            | Self::Boolean(_, span)
            | Self::Null(span)
            | Self::List(_, span)
            | Self::Object(_, span) => *span,
        }
    }
}

/// Name with span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name {
    pub value: Text,
    pub span: Span,
}

impl Name {
    #[must_use]
    pub const fn new(value: Text, span: Span) -> Self {
        Self { value, span }
    }
}

/// Description string, already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub value: String,
    pub span: Span,
}

impl Description {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }
}
