//! Reserved words of the target languages and identifier escaping.

/// How a language disambiguates an identifier that collides with a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeStyle {
    /// `` `when` `` (Kotlin, Swift)
    Backticks,
    /// `default_` (Dart, TypeScript)
    TrailingUnderscore,
    /// `p_class` (GDScript)
    Prefix(&'static str),
}

/// Returns `name` unchanged unless it is in `reserved`, in which case it is
/// rewritten according to `style`.
#[must_use]
pub fn escape(name: &str, reserved: &[&str], style: EscapeStyle) -> String {
    if !is_reserved(name, reserved) {
        return name.to_string();
    }
    match style {
        EscapeStyle::Backticks => format!("`{name}`"),
        EscapeStyle::TrailingUnderscore => format!("{name}_"),
        EscapeStyle::Prefix(prefix) => format!("{prefix}{name}"),
    }
}

#[must_use]
pub fn is_reserved(name: &str, reserved: &[&str]) -> bool {
    reserved.contains(&name)
}

/// Kotlin hard keywords.
pub const KOTLIN: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Swift keywords usable in declarations, expressions and statements.
pub const SWIFT: &[&str] = &[
    "associatedtype", "class", "deinit", "enum", "extension", "fileprivate", "func", "import",
    "init", "inout", "internal", "let", "open", "operator", "private", "protocol", "public",
    "rethrows", "static", "struct", "subscript", "typealias", "var", "break", "case", "continue",
    "default", "defer", "do", "else", "fallthrough", "for", "guard", "if", "in", "repeat",
    "return", "switch", "where", "while", "as", "Any", "catch", "false", "is", "nil", "self",
    "Self", "super", "throw", "throws", "true", "try", "Type",
];

/// Dart reserved words and built-in identifiers that cannot name members.
pub const DART: &[&str] = &[
    "assert", "break", "case", "catch", "class", "const", "continue", "default", "do", "else",
    "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new", "null",
    "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var", "void",
    "while", "with", "values", "index",
];

/// TypeScript reserved words.
pub const TYPESCRIPT: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "implements", "interface", "let",
    "package", "private", "protected", "public", "static", "yield",
];

/// GDScript keywords and built-in type names.
pub const GDSCRIPT: &[&str] = &[
    "if", "elif", "else", "for", "while", "match", "break", "continue", "pass", "return",
    "class", "class_name", "extends", "is", "in", "as", "self", "signal", "func", "static",
    "const", "enum", "var", "breakpoint", "preload", "await", "yield", "assert", "void",
    "PI", "TAU", "INF", "NAN", "true", "false", "null", "and", "or", "not", "super",
    "Array", "Dictionary", "String", "Object", "Variant", "int", "float", "bool",
    "Node", "RefCounted", "Resource", "Color", "Callable", "Signal", "Error", "Time",
];
