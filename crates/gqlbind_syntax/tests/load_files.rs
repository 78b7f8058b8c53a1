//! Integration tests for loading schemas from disk.

use gqlbind_syntax::{parse, MarkerKind, OperationType, SchemaParseError, TypeKind};
use std::fs;
use std::path::PathBuf;

fn write_files(dir: &tempfile::TempDir, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, text)| {
            let path = dir.path().join(name);
            fs::write(&path, text).unwrap();
            path
        })
        .collect()
}

/// Test that files are concatenated in the order they were given.
#[test]
fn test_file_order_is_significant() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_files(
        &dir,
        &[
            ("schema.graphql", "schema { query: Query }"),
            ("type.graphql", "enum Color { RED GREEN }\ntype Product { id: ID! color: Color }"),
            ("type-ios.graphql", "extend type Product { appStoreId: String }"),
            ("api.graphql", "type Query { products(first: Int = 10): [Product!]! }"),
        ],
    );

    let (schema, markers) = parse(&paths).unwrap();
    assert!(markers.is_empty());

    let names: Vec<_> = schema.types().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Color", "Product", "Query"]);
    assert_eq!(schema.kind_of_name("Color"), Some(TypeKind::Enum));
    assert_eq!(schema.kind_of_name("ID"), Some(TypeKind::Scalar));

    let product = schema.get_type("Product").unwrap();
    assert_eq!(product.fields().count(), 3);
    assert_eq!(
        schema.source(product.extensions[0].file).path(),
        paths[2].as_path()
    );

    let query = schema.root_type(OperationType::Query).unwrap();
    assert_eq!(query.name, "Query");
}

/// Test that markers are resolved per file.
#[test]
fn test_markers_are_keyed_by_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_files(
        &dir,
        &[
            (
                "type.graphql",
                "type Success { id: ID }\ntype Failure { code: Int }\n",
            ),
            (
                "result.graphql",
                "# => Union\ntype PurchaseResult {\n  success: Success\n  # future\n  failure: Failure\n}\n",
            ),
        ],
    );

    let (schema, markers) = parse(&paths).unwrap();
    assert_eq!(markers.len(), 2);

    let result = schema.get_type("PurchaseResult").unwrap();
    let source = schema.source(result.file);
    assert!(markers.has(source, result.definition.start(), MarkerKind::UnionWrapper));

    let flagged: Vec<_> = result
        .fields()
        .filter(|(file, field)| {
            markers.has(schema.source(*file), field.start(), MarkerKind::Future)
        })
        .map(|(_, field)| schema.name(field.name.value))
        .collect();
    assert_eq!(flagged, ["failure"]);
}

/// Test that a marker before end of input fails the load.
#[test]
fn test_trailing_marker_fails() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_files(&dir, &[("a.graphql", "type A { a: Int }\n# => Union\n")]);

    let err = parse(&paths).unwrap_err();
    assert!(matches!(err, SchemaParseError::DanglingMarker { .. }));
}

/// Test the rendered message of a duplicate type.
#[test]
fn test_duplicate_type_message() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_files(
        &dir,
        &[
            ("a.graphql", "type Product { id: ID }"),
            ("b.graphql", "type Product { id: ID }"),
        ],
    );

    let err = parse(&paths).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"type `Product` is declared more than once");
}
