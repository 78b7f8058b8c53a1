//! Identifier case conversion.
//!
//! Thin deterministic wrappers over `heck`, so every plugin spells converted
//! names the same way. Round-tripping is not guaranteed (`productIOS` becomes
//! `product_ios`, which converts back to `productIos`).

use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `fooBar`
#[must_use]
pub fn camel_case(s: &str) -> String {
    s.to_lower_camel_case()
}

/// `FooBar`
#[must_use]
pub fn pascal_case(s: &str) -> String {
    s.to_upper_camel_case()
}

/// `foo_bar`
#[must_use]
pub fn snake_case(s: &str) -> String {
    s.to_snake_case()
}

/// `FOO_BAR`
#[must_use]
pub fn constant_case(s: &str) -> String {
    s.to_shouty_snake_case()
}

/// A naming convention a plugin applies to one kind of identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Case {
    /// Keep the SDL spelling.
    Preserve,
    Camel,
    Pascal,
    Snake,
    Constant,
}

impl Case {
    #[must_use]
    pub fn apply(self, s: &str) -> String {
        match self {
            Self::Preserve => s.to_string(),
            Self::Camel => camel_case(s),
            Self::Pascal => pascal_case(s),
            Self::Snake => snake_case(s),
            Self::Constant => constant_case(s),
        }
    }
}
