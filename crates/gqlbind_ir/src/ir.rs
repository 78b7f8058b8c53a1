//! The language-agnostic intermediate representation.
//!
//! Built once per run by [`crate::transform`], immutable afterwards and shared
//! by every language plugin. All collections preserve declaration order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// GraphQL's built-in scalars, mapped to [`IrType::Scalar`].
pub const BUILTIN_SCALARS: [&str; 5] = gqlbind_core::BUILTIN_SCALARS;

/// Whether a declaration is shipped or forthcoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Stable,
    /// Marked `# Future` in the schema.
    Future,
}

impl Status {
    #[must_use]
    pub fn is_future(self) -> bool {
        self == Self::Future
    }
}

/// Kind of a named, non-built-in type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedKind {
    /// A custom scalar declared with `scalar`.
    Scalar,
    Enum,
    Object,
    Interface,
    Input,
    Union,
}

/// A reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrNamedType {
    pub name: String,
    pub kind: NamedKind,
}

/// A type reference with its nullability.
///
/// GraphQL types are nullable unless wrapped in [`IrType::NonNull`], which
/// never wraps another `NonNull`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrType {
    /// One of [`BUILTIN_SCALARS`].
    Scalar(String),
    Named(IrNamedType),
    List(Box<IrType>),
    NonNull(Box<IrType>),
}

impl IrType {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    pub fn named(name: impl Into<String>, kind: NamedKind) -> Self {
        Self::Named(IrNamedType {
            name: name.into(),
            kind,
        })
    }

    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wraps `inner` as non-null. Already non-null types are returned as is.
    #[must_use]
    pub fn non_null(inner: Self) -> Self {
        match inner {
            Self::NonNull(_) => inner,
            other => Self::NonNull(Box::new(other)),
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Whether the outermost non-null-stripped type is a list.
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self.strip_non_null(), Self::List(_))
    }

    /// The type without its outer non-null wrapper.
    #[must_use]
    pub fn strip_non_null(&self) -> &Self {
        match self {
            Self::NonNull(inner) => inner,
            other => other,
        }
    }

    /// The wrapped type of a list or non-null, `None` for named types.
    #[must_use]
    pub fn inner(&self) -> Option<&Self> {
        match self {
            Self::List(inner) | Self::NonNull(inner) => Some(inner),
            Self::Scalar(_) | Self::Named(_) => None,
        }
    }

    /// Name of the innermost named type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(name) => name,
            Self::Named(named) => &named.name,
            Self::List(inner) | Self::NonNull(inner) => inner.name(),
        }
    }

    /// The innermost named type, `None` when it is a built-in scalar.
    #[must_use]
    pub fn named_type(&self) -> Option<&IrNamedType> {
        match self {
            Self::Scalar(_) => None,
            Self::Named(named) => Some(named),
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    /// Number of list wrappers between this type and its named type.
    #[must_use]
    pub fn list_depth(&self) -> usize {
        match self {
            Self::Scalar(_) | Self::Named(_) => 0,
            Self::List(inner) => 1 + inner.list_depth(),
            Self::NonNull(inner) => inner.list_depth(),
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(name) => f.write_str(name),
            Self::Named(named) => f.write_str(&named.name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A constant value from a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IrValue {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<IrValue>),
    Object(IndexMap<String, IrValue>),
}

impl fmt::Display for IrValue {
    /// GraphQL literal notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
            Self::Enum(value) => f.write_str(value),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// An argument of a field or operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrArg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IrType,
    #[serde(default)]
    pub default_value: Option<IrValue>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecation: Option<String>,
}

/// A field of an object, interface or input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: IrType,
    #[serde(default)]
    pub arguments: Vec<IrArg>,
    #[serde(default)]
    pub default_value: Option<IrValue>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecation: Option<String>,
    #[serde(default)]
    pub status: Status,
}

/// One value of an enum. `ordinal` is its 0-based declaration position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrEnumValue {
    pub name: String,
    pub ordinal: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecation: Option<String>,
    #[serde(default)]
    pub status: Status,
}

/// A legacy spelling that resolves to a canonical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrEnumAlias {
    pub name: String,
    pub canonical: String,
    /// Ordinal of the canonical value.
    pub ordinal: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrEnum {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub values: Vec<IrEnumValue>,
    #[serde(default)]
    pub aliases: Vec<IrEnumAlias>,
}

impl IrEnum {
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&IrEnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrObject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub implements: Vec<String>,
    pub fields: Vec<IrField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrInterface {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub implements: Vec<String>,
    pub fields: Vec<IrField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub fields: Vec<IrField>,
}

/// How a union is expressed in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionKind {
    /// `union U = A | B`
    Native,
    /// An object marked `# => Union` whose fields are the variants.
    Wrapper,
}

/// One variant of a union.
///
/// For native unions `name == type_name`. For wrappers `name` is the
/// wrapper's field name, which acts as the discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrUnionMember {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecation: Option<String>,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrUnion {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub kind: UnionKind,
    pub members: Vec<IrUnionMember>,
}

/// A custom scalar declared in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrScalar {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signature of one root field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrOperationField {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<IrArg>,
    pub return_type: IrType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecation: Option<String>,
    #[serde(default)]
    pub status: Status,
}

/// The fields of one root operation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrOperation {
    pub kind: OperationKind,
    /// Name of the root type, e.g. `Query`.
    pub type_name: String,
    pub fields: Vec<IrOperationField>,
}

/// Per-language default literal of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrPlatformDefault {
    pub type_name: String,
    pub field_name: String,
    /// Language id to literal, already in target syntax.
    pub values: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrSchemaMetadata {
    /// Input file names in load order.
    pub sources: Vec<String>,
    pub generator: String,
    pub version: String,
}

impl Default for IrSchemaMetadata {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            generator: "gqlbind".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The whole IR.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IrSchema {
    pub metadata: IrSchemaMetadata,
    pub scalars: Vec<IrScalar>,
    pub enums: Vec<IrEnum>,
    pub interfaces: Vec<IrInterface>,
    pub objects: Vec<IrObject>,
    pub inputs: Vec<IrInput>,
    pub unions: Vec<IrUnion>,
    pub operations: Vec<IrOperation>,
    pub platform_defaults: Vec<IrPlatformDefault>,
}

impl IrSchema {
    #[must_use]
    pub fn find_enum(&self, name: &str) -> Option<&IrEnum> {
        self.enums.iter().find(|e| e.name == name)
    }

    #[must_use]
    pub fn find_object(&self, name: &str) -> Option<&IrObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    #[must_use]
    pub fn find_input(&self, name: &str) -> Option<&IrInput> {
        self.inputs.iter().find(|i| i.name == name)
    }

    #[must_use]
    pub fn find_union(&self, name: &str) -> Option<&IrUnion> {
        self.unions.iter().find(|u| u.name == name)
    }

    #[must_use]
    pub fn find_interface(&self, name: &str) -> Option<&IrInterface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// Platform literal for `type_name.field_name` in `language`.
    #[must_use]
    pub fn platform_default(&self, type_name: &str, field_name: &str, language: &str) -> Option<&str> {
        self.platform_defaults
            .iter()
            .find(|row| row.type_name == type_name && row.field_name == field_name)
            .and_then(|row| row.values.get(language))
            .map(String::as_str)
    }

    /// Names of every declaration carrying [`Status::Future`].
    #[must_use]
    pub fn future_types(&self) -> Vec<&str> {
        let scalars = self.scalars.iter().map(|t| (t.status, t.name.as_str()));
        let enums = self.enums.iter().map(|t| (t.status, t.name.as_str()));
        let interfaces = self.interfaces.iter().map(|t| (t.status, t.name.as_str()));
        let objects = self.objects.iter().map(|t| (t.status, t.name.as_str()));
        let inputs = self.inputs.iter().map(|t| (t.status, t.name.as_str()));
        let unions = self.unions.iter().map(|t| (t.status, t.name.as_str()));
        scalars
            .chain(enums)
            .chain(interfaces)
            .chain(objects)
            .chain(inputs)
            .chain(unions)
            .filter(|(status, _)| status.is_future())
            .map(|(_, name)| name)
            .collect()
    }

    /// A copy without `Future` declarations and members.
    ///
    /// Stable fields whose type refers to a removed declaration are removed
    /// too, so the result never references a type it does not contain.
    #[must_use]
    pub fn without_future(&self) -> Self {
        let removed: Vec<String> = self.future_types().into_iter().map(str::to_string).collect();
        let keeps = |ty: &IrType| !removed.iter().any(|name| name == ty.name());
        let keep_field = |field: &IrField| {
            !field.status.is_future()
                && keeps(&field.ty)
                && field.arguments.iter().all(|arg| keeps(&arg.ty))
        };
        let fields = |fields: &[IrField]| -> Vec<IrField> {
            fields.iter().filter(|f| keep_field(f)).cloned().collect()
        };
        let kept_names = |names: &[String]| -> Vec<String> {
            names
                .iter()
                .filter(|name| !removed.contains(name))
                .cloned()
                .collect()
        };

        Self {
            metadata: self.metadata.clone(),
            scalars: self
                .scalars
                .iter()
                .filter(|t| !t.status.is_future())
                .cloned()
                .collect(),
            enums: self
                .enums
                .iter()
                .filter(|e| !e.status.is_future())
                .map(|e| {
                    let values: Vec<IrEnumValue> = e
                        .values
                        .iter()
                        .filter(|v| !v.status.is_future())
                        .cloned()
                        .collect();
                    let aliases = e
                        .aliases
                        .iter()
                        .filter(|a| values.iter().any(|v| v.name == a.canonical))
                        .cloned()
                        .collect();
                    IrEnum {
                        values,
                        aliases,
                        ..e.clone()
                    }
                })
                .collect(),
            interfaces: self
                .interfaces
                .iter()
                .filter(|i| !i.status.is_future())
                .map(|i| IrInterface {
                    fields: fields(&i.fields),
                    implements: kept_names(&i.implements),
                    ..i.clone()
                })
                .collect(),
            objects: self
                .objects
                .iter()
                .filter(|o| !o.status.is_future())
                .map(|o| IrObject {
                    fields: fields(&o.fields),
                    implements: kept_names(&o.implements),
                    ..o.clone()
                })
                .collect(),
            inputs: self
                .inputs
                .iter()
                .filter(|i| !i.status.is_future())
                .map(|i| IrInput {
                    fields: fields(&i.fields),
                    ..i.clone()
                })
                .collect(),
            unions: self
                .unions
                .iter()
                .filter(|u| !u.status.is_future())
                .map(|u| IrUnion {
                    members: u
                        .members
                        .iter()
                        .filter(|m| !m.status.is_future() && !removed.contains(&m.type_name))
                        .cloned()
                        .collect(),
                    ..u.clone()
                })
                .collect(),
            operations: self
                .operations
                .iter()
                .map(|op| IrOperation {
                    fields: op
                        .fields
                        .iter()
                        .filter(|f| {
                            !f.status.is_future()
                                && keeps(&f.return_type)
                                && f.arguments.iter().all(|arg| keeps(&arg.ty))
                        })
                        .cloned()
                        .collect(),
                    ..op.clone()
                })
                .collect(),
            platform_defaults: self.platform_defaults.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_null_never_nests() {
        let ty = IrType::non_null(IrType::non_null(IrType::scalar("String")));
        assert_eq!(ty, IrType::NonNull(Box::new(IrType::scalar("String"))));
    }

    #[test]
    fn test_type_display_and_helpers() {
        let ty = IrType::non_null(IrType::list(IrType::non_null(IrType::named(
            "Product",
            NamedKind::Object,
        ))));
        assert_eq!(ty.to_string(), "[Product!]!");
        assert!(ty.is_required());
        assert!(ty.is_list());
        assert_eq!(ty.name(), "Product");
        assert_eq!(ty.list_depth(), 1);
        assert_eq!(ty.named_type().map(|n| n.kind), Some(NamedKind::Object));
        assert!(!ty.strip_non_null().is_required());
    }

    #[test]
    fn test_value_display() {
        let value = IrValue::Object(IndexMap::from([
            ("limit".to_string(), IrValue::Int(10)),
            (
                "tags".to_string(),
                IrValue::List(vec![IrValue::String("a".into()), IrValue::Null]),
            ),
        ]));
        assert_eq!(value.to_string(), r#"{limit: 10, tags: ["a", null]}"#);
        assert_eq!(IrValue::Float(1.0).to_string(), "1.0");
    }

    #[test]
    fn test_without_future_drops_dependent_fields() {
        let schema = IrSchema {
            objects: vec![
                IrObject {
                    name: "Wallet".into(),
                    description: None,
                    status: Status::Future,
                    implements: Vec::new(),
                    fields: Vec::new(),
                },
                IrObject {
                    name: "User".into(),
                    description: None,
                    status: Status::Stable,
                    implements: Vec::new(),
                    fields: vec![
                        IrField {
                            name: "id".into(),
                            ty: IrType::scalar("ID"),
                            arguments: Vec::new(),
                            default_value: None,
                            description: None,
                            deprecation: None,
                            status: Status::Stable,
                        },
                        IrField {
                            name: "wallet".into(),
                            ty: IrType::named("Wallet", NamedKind::Object),
                            arguments: Vec::new(),
                            default_value: None,
                            description: None,
                            deprecation: None,
                            status: Status::Stable,
                        },
                    ],
                },
            ],
            ..IrSchema::default()
        };

        assert_eq!(schema.future_types(), ["Wallet"]);
        let stable = schema.without_future();
        assert_eq!(stable.objects.len(), 1);
        assert_eq!(stable.objects[0].fields.len(), 1);
        assert_eq!(stable.objects[0].fields[0].name, "id");
    }
}
