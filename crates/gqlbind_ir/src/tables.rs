//! Static lookup tables.
//!
//! Tables are plain configuration loaded once per run (usually from a
//! `tables.json` next to the schema) and passed explicitly to the transformer
//! and to every plugin. Keys keep file order.
//!
//! ```json
//! {
//!   "error_code_enum": "ErrorCode",
//!   "error_code_legacy_aliases": { "ITEM_UNAVAILABLE": ["E_ITEM_UNAVAILABLE"] },
//!   "platform_type_defaults": {
//!     "RequestPurchaseProps": { "type": { "kotlin": "ProductType.InApp" } }
//!   },
//!   "custom_input_types": {
//!     "DiscountOfferInput": { "swift": { "type_name": "Product.PurchaseOption" } }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Enum that receives legacy aliases unless configured otherwise.
pub const DEFAULT_ERROR_CODE_ENUM: &str = "ErrorCode";

/// A hand-written replacement for a generated input type in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomInputType {
    /// Name used wherever the input is referenced.
    pub type_name: String,
    /// Declaration emitted verbatim instead of the generated one. When
    /// absent the declaration is omitted entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tables {
    pub error_code_enum: String,
    /// Canonical value to its legacy spellings, in emission order.
    pub error_code_legacy_aliases: IndexMap<String, Vec<String>>,
    /// Type to field to language to literal.
    pub platform_type_defaults: IndexMap<String, IndexMap<String, BTreeMap<String, String>>>,
    /// Input name to language to override.
    pub custom_input_types: IndexMap<String, BTreeMap<String, CustomInputType>>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            error_code_enum: DEFAULT_ERROR_CODE_ENUM.to_string(),
            error_code_legacy_aliases: IndexMap::new(),
            platform_type_defaults: IndexMap::new(),
            custom_input_types: IndexMap::new(),
        }
    }
}

/// Errors raised while reading tables.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum TablesError {
    #[error("failed to read tables from `{}`", path.display())]
    #[diagnostic(code(gqlbind::tables::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tables in `{origin}`")]
    #[diagnostic(
        code(gqlbind::tables::parse),
        help("expected an object with error_code_enum, error_code_legacy_aliases, platform_type_defaults and custom_input_types")
    )]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Tables {
    pub fn from_json_str(json: &str) -> Result<Self, TablesError> {
        Self::parse(json, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TablesError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TablesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::parse(&json, &path.display().to_string())?;
        tracing::debug!(
            path = %path.display(),
            aliases = tables.error_code_legacy_aliases.len(),
            defaults = tables.platform_type_defaults.len(),
            custom_inputs = tables.custom_input_types.len(),
            "loaded tables"
        );
        Ok(tables)
    }

    fn parse(json: &str, origin: &str) -> Result<Self, TablesError> {
        serde_json::from_str(json).map_err(|source| TablesError::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Override of `input` for `language`, if any.
    #[must_use]
    pub fn custom_input(&self, input: &str, language: &str) -> Option<&CustomInputType> {
        self.custom_input_types
            .get(input)
            .and_then(|languages| languages.get(language))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.error_code_legacy_aliases.is_empty()
            && self.platform_type_defaults.is_empty()
            && self.custom_input_types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let tables = Tables::from_json_str("{}").unwrap();
        assert_eq!(tables, Tables::default());
        assert_eq!(tables.error_code_enum, "ErrorCode");
        assert!(tables.is_empty());
    }

    #[test]
    fn test_keys_keep_file_order() {
        let tables = Tables::from_json_str(
            r#"{
                "error_code_legacy_aliases": {
                    "USER_CANCELLED": ["E_USER_CANCELLED", "UserCancelled"],
                    "NETWORK_ERROR": ["E_NETWORK_ERROR"]
                }
            }"#,
        )
        .unwrap();
        let canonical: Vec<_> = tables.error_code_legacy_aliases.keys().collect();
        assert_eq!(canonical, ["USER_CANCELLED", "NETWORK_ERROR"]);
        assert_eq!(
            tables.error_code_legacy_aliases["USER_CANCELLED"],
            ["E_USER_CANCELLED", "UserCancelled"]
        );
    }

    #[test]
    fn test_custom_input_lookup() {
        let tables = Tables::from_json_str(
            r#"{
                "custom_input_types": {
                    "OfferInput": {
                        "swift": { "type_name": "Product.PurchaseOption" },
                        "kotlin": { "type_name": "OfferInput", "declaration": "typealias OfferInput = Map<String, Any?>" }
                    }
                }
            }"#,
        )
        .unwrap();
        let swift = tables.custom_input("OfferInput", "swift").unwrap();
        assert_eq!(swift.type_name, "Product.PurchaseOption");
        assert!(swift.declaration.is_none());
        assert!(tables.custom_input("OfferInput", "dart").is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Tables::from_json_str(r#"{ "aliases": {} }"#).unwrap_err();
        assert!(matches!(err, TablesError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Tables::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, TablesError::Io { .. }));
    }
}
