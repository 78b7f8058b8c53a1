//! Errors raised while building the IR.

use gqlbind_syntax::MarkerKind;
use thiserror::Error;

/// Transformation errors. Any of them aborts the run before rendering.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum TransformError {
    #[error("type `{name}` referenced by {referenced_by} is not declared")]
    #[diagnostic(code(gqlbind::unresolved_type))]
    UnresolvedType { name: String, referenced_by: String },

    #[error("type `{type_name}` has no field `{field}` (referenced by {referenced_by})")]
    #[diagnostic(code(gqlbind::unresolved_field))]
    UnresolvedField {
        type_name: String,
        field: String,
        referenced_by: String,
    },

    #[error("marker `{marker}` at {location} cannot annotate {target}")]
    #[diagnostic(
        code(gqlbind::unsupported_marker),
        help("`=> Union` only applies to object types")
    )]
    UnsupportedMarker {
        marker: MarkerKind,
        /// What the marker was attached to, e.g. "enum `Color`".
        target: String,
        location: String,
    },

    #[error("field `{field}` of union wrapper `{wrapper}` at {location} {reason}")]
    #[diagnostic(
        code(gqlbind::invalid_wrapper_member),
        help("every field of a union wrapper must be a single object, interface or union")
    )]
    InvalidWrapperMember {
        wrapper: String,
        field: String,
        reason: String,
        location: String,
    },

    #[error("legacy aliases target `{enum_name}.{canonical}`, which is not a value of `{enum_name}`")]
    #[diagnostic(code(gqlbind::unknown_alias_target))]
    UnknownAliasTarget { enum_name: String, canonical: String },

    #[error("legacy alias `{alias}` collides with an existing name in `{enum_name}`")]
    #[diagnostic(code(gqlbind::duplicate_alias))]
    DuplicateAlias { enum_name: String, alias: String },

    #[error("`{name}` is declared as {kind} but {referenced_by} expects an input type")]
    #[diagnostic(code(gqlbind::not_an_input_type))]
    NotAnInputType {
        name: String,
        kind: String,
        referenced_by: String,
    },
}

impl TransformError {
    /// Short machine-readable name of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnresolvedType { .. } => "unresolved_type",
            Self::UnresolvedField { .. } => "unresolved_field",
            Self::UnsupportedMarker { .. } => "unsupported_marker",
            Self::InvalidWrapperMember { .. } => "invalid_wrapper_member",
            Self::UnknownAliasTarget { .. } => "unknown_alias_target",
            Self::DuplicateAlias { .. } => "duplicate_alias",
            Self::NotAnInputType { .. } => "not_an_input_type",
        }
    }
}
