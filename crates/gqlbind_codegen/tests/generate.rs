//! End-to-end rendering tests: SDL in, one file per language out.

use gqlbind_codegen::{CodeGenerator, CodegenError, CodegenOptions, GeneratedFile, Language};
use gqlbind_core::SourceFile;
use gqlbind_ir::{transform, IrSchema, Tables};
use gqlbind_syntax::parse_sources;

fn ir_with(sdl: &str, tables: &Tables) -> IrSchema {
    let (schema, markers) = parse_sources(vec![SourceFile::new("schema.graphql", sdl)]).unwrap();
    transform(&schema, &markers, tables).unwrap()
}

fn render(sdl: &str, tables: &Tables, language: Language) -> String {
    let ir = ir_with(sdl, tables);
    CodeGenerator::new(&ir, tables)
        .generate(language)
        .unwrap()
        .contents
}

fn render_default(sdl: &str, language: Language) -> String {
    render(sdl, &Tables::default(), language)
}

/// Asserts that `needle` appears as a whole line, ignoring indentation.
#[track_caller]
fn assert_line(output: &str, needle: &str) {
    assert!(
        output.lines().any(|line| line.trim() == needle),
        "missing line `{needle}` in:\n{output}"
    );
}

/// Asserts that the lines appear in this order.
#[track_caller]
fn assert_in_order(output: &str, needles: &[&str]) {
    let positions: Vec<usize> = needles
        .iter()
        .map(|needle| {
            output
                .find(needle)
                .unwrap_or_else(|| panic!("missing `{needle}` in:\n{output}"))
        })
        .collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "{needles:?} out of order in:\n{output}"
    );
}

const COLOR_PRODUCT: &str = "enum Color { RED GREEN BLUE }\ntype Product { id: ID! name: String color: Color }";

/// Test that Color and Product come out right in Kotlin.
#[test]
fn test_color_product_kotlin() {
    let out = render_default(COLOR_PRODUCT, Language::Kotlin);
    assert_line(&out, "enum class Color(val rawValue: String, val schemaOrdinal: Int) {");
    assert_in_order(&out, &["RED(\"RED\", 0),", "GREEN(\"GREEN\", 1),", "BLUE(\"BLUE\", 2);"]);
    assert_line(&out, "data class Product(");
    assert_line(&out, "val id: String,");
    assert_line(&out, "val name: String? = null,");
    assert_line(&out, "val color: Color? = null,");
    assert_line(&out, "\"RED\" -> RED");
    assert!(out.starts_with("// Generated by gqlbind"));
}

/// Test that Color and Product come out right in Swift.
#[test]
fn test_color_product_swift() {
    let out = render_default(COLOR_PRODUCT, Language::Swift);
    assert_line(&out, "public enum Color: String, Codable, CaseIterable {");
    assert_in_order(&out, &["case red = \"RED\"", "case green = \"GREEN\"", "case blue = \"BLUE\""]);
    assert_line(&out, "case .red: return 0");
    assert_line(&out, "case .green: return 1");
    assert_line(&out, "case .blue: return 2");
    assert_line(&out, "public var id: String");
    assert_line(&out, "public var name: String?");
    assert_line(&out, "name: String? = nil,");
    assert_line(&out, "color: Color? = nil");
}

/// Test that Color and Product come out right in Dart.
#[test]
fn test_color_product_dart() {
    let out = render_default(COLOR_PRODUCT, Language::Dart);
    assert_in_order(&out, &["red('RED', 0),", "green('GREEN', 1),", "blue('BLUE', 2);"]);
    assert_line(&out, "required this.id,");
    assert_line(&out, "this.name,");
    assert_line(&out, "final String id;");
    assert_line(&out, "final String? name;");
    assert_line(&out, "final Color? color;");
}

/// Test that Color and Product come out right in TypeScript.
#[test]
fn test_color_product_typescript() {
    let out = render_default(COLOR_PRODUCT, Language::TypeScript);
    assert_in_order(&out, &["RED = 'RED',", "GREEN = 'GREEN',", "BLUE = 'BLUE',"]);
    assert_line(&out, "[Color.RED]: 0,");
    assert_line(&out, "[Color.BLUE]: 2,");
    assert_line(&out, "export interface Product {");
    assert_line(&out, "id: string;");
    assert_line(&out, "name?: string | null;");
    assert_line(&out, "color?: Color | null;");
}

/// Test that Color and Product come out right in GDScript.
#[test]
fn test_color_product_gdscript() {
    let out = render_default(COLOR_PRODUCT, Language::GDScript);
    assert_in_order(&out, &["RED = 0,", "GREEN = 1,", "BLUE = 2,"]);
    assert_line(&out, "class Product extends RefCounted:");
    assert_line(&out, "var id: String");
    assert_line(&out, "var name: Variant");
    assert_line(&out, "var color: Variant");
    // `Color` is a Godot built-in class.
    assert_line(&out, "enum p_Color {");
    assert_line(&out, "\"GREEN\": p_Color.GREEN,");
    assert_line(&out, "extends RefCounted");
}

/// Test every combination of list and element nullability.
#[test]
fn test_nullability_matrix() {
    let sdl = "type T { a: [Int] b: [Int!] c: [Int]! d: [Int!]! e: [[String!]] }";
    let kotlin = render_default(sdl, Language::Kotlin);
    for line in [
        "val a: List<Int?>? = null,",
        "val b: List<Int>? = null,",
        "val c: List<Int?>,",
        "val d: List<Int>,",
        "val e: List<List<String>?>? = null,",
    ] {
        assert_line(&kotlin, line);
    }

    let ts = render_default(sdl, Language::TypeScript);
    for line in [
        "a?: (number | null)[] | null;",
        "b?: number[] | null;",
        "c: (number | null)[];",
        "d: number[];",
        "e?: (string[] | null)[] | null;",
    ] {
        assert_line(&ts, line);
    }

    let swift = render_default(sdl, Language::Swift);
    assert_line(&swift, "public var a: [Int?]?");
    assert_line(&swift, "public var d: [Int]");

    let gd = render_default(sdl, Language::GDScript);
    assert_line(&gd, "var a: Variant");
    assert_line(&gd, "var c: Array");
    assert_line(&gd, "var d: Array[int]");
}

/// Test that every legacy alias is emitted and points at its canonical case.
#[test]
fn test_legacy_aliases_in_every_language() {
    let tables = Tables::from_json_str(
        r#"{ "error_code_legacy_aliases": { "NETWORK_ERROR": ["E_NETWORK_ERROR", "NetworkFailure"] } }"#,
    )
    .unwrap();
    let sdl = "enum ErrorCode { UNKNOWN NETWORK_ERROR }";

    let kotlin = render(sdl, &tables, Language::Kotlin);
    assert_line(&kotlin, "val E_NETWORK_ERROR: ErrorCode get() = NETWORK_ERROR");
    assert_line(&kotlin, "val NetworkFailure: ErrorCode get() = NETWORK_ERROR");
    assert_line(&kotlin, "\"E_NETWORK_ERROR\" -> NETWORK_ERROR");

    let swift = render(sdl, &tables, Language::Swift);
    assert_line(&swift, "public static let eNetworkError: ErrorCode = .networkError");
    assert_line(&swift, "public static let networkFailure: ErrorCode = .networkError");
    assert_line(&swift, "case \"NetworkFailure\": self = .networkError");

    let dart = render(sdl, &tables, Language::Dart);
    assert_line(&dart, "static const eNetworkError = ErrorCode.networkError;");
    assert_line(&dart, "static const networkFailure = ErrorCode.networkError;");

    let ts = render(sdl, &tables, Language::TypeScript);
    assert_line(&ts, "E_NETWORK_ERROR = 'NETWORK_ERROR',");
    assert_line(&ts, "NetworkFailure = 'NETWORK_ERROR',");

    let gd = render(sdl, &tables, Language::GDScript);
    assert_line(&gd, "E_NETWORK_ERROR = 1,");
    assert_line(&gd, "NETWORK_FAILURE = 1,");
}

/// Test wrapper unions and native unions.
#[test]
fn test_unions() {
    let sdl = "
type PurchaseSuccess { id: ID! }
type PurchaseFailure { code: Int! }
# => Union
type PurchaseResult { success: PurchaseSuccess failure: PurchaseFailure }
union Outcome = PurchaseSuccess | PurchaseFailure
";
    let kotlin = render_default(sdl, Language::Kotlin);
    assert_line(&kotlin, "sealed interface PurchaseResult");
    assert_line(
        &kotlin,
        "data class PurchaseResultSuccess(val value: PurchaseSuccess) : PurchaseResult",
    );
    assert_line(&kotlin, ") : Outcome");

    let swift = render_default(sdl, Language::Swift);
    assert_line(&swift, "public enum PurchaseResult {");
    assert_line(&swift, "case success(PurchaseSuccess)");
    assert_line(&swift, "case failure(PurchaseFailure)");

    let dart = render_default(sdl, Language::Dart);
    assert_line(
        &dart,
        "final class PurchaseResultFailure extends PurchaseResult {",
    );
    assert_line(&dart, "class PurchaseSuccess implements Outcome {");

    let ts = render_default(sdl, Language::TypeScript);
    assert_line(&ts, "| { kind: 'success'; value: PurchaseSuccess }");
    assert_line(&ts, "| PurchaseFailure;");

    let gd = render_default(sdl, Language::GDScript);
    assert_line(&gd, "class PurchaseResult extends RefCounted:");
    assert_line(&gd, "const SUCCESS := \"success\"");
    assert_line(&gd, "var value: Variant");
}

/// Test interfaces: overrides in Kotlin and single inheritance in GDScript.
#[test]
fn test_interfaces() {
    let sdl = "
interface Entity { id: ID! }
type Receipt implements Entity { id: ID! total: Float! }
";
    let kotlin = render_default(sdl, Language::Kotlin);
    assert_line(&kotlin, "interface Entity {");
    assert_line(&kotlin, "override val id: String,");
    assert_line(&kotlin, "val total: Double,");
    assert_line(&kotlin, ") : Entity");

    let gd = render_default(sdl, Language::GDScript);
    assert_line(&gd, "class Receipt extends Entity:");
    assert_line(&gd, "var total: float");
    assert_eq!(gd.matches("var id: String").count(), 1);

    let ts = render_default(sdl, Language::TypeScript);
    assert_line(&ts, "export interface Receipt extends Entity {");
}

/// Test resolver signatures for root operation types.
#[test]
fn test_operation_signatures() {
    let sdl = "
type Product { id: ID! }
type Query { products(first: Int = 10, sku: String!): [Product!]! }
";
    let kotlin = render_default(sdl, Language::Kotlin);
    assert_line(&kotlin, "interface QueryResolver {");
    assert_line(
        &kotlin,
        "suspend fun products(first: Int? = 10, sku: String): List<Product>",
    );

    let swift = render_default(sdl, Language::Swift);
    assert_line(
        &swift,
        "func products(first: Int?, sku: String) async throws -> [Product]",
    );

    let dart = render_default(sdl, Language::Dart);
    assert_line(
        &dart,
        "Future<List<Product>> products({ int? first, required String sku });",
    );

    let ts = render_default(sdl, Language::TypeScript);
    assert_line(
        &ts,
        "products(args: { first?: number | null; sku: string }): Promise<Product[]>;",
    );

    let gd = render_default(sdl, Language::GDScript);
    assert_line(&gd, "func products(first: Variant, sku: String) -> Array[Product]:");
    assert_line(&gd, "return []");
    assert!(!kotlin.contains("class Query"));
}

/// Test defaults from the schema and from the platform table.
#[test]
fn test_defaults() {
    let tables = Tables::from_json_str(
        r#"{ "platform_type_defaults": { "Options": { "kind": { "kotlin": "Kind.Fast" } } } }"#,
    )
    .unwrap();
    let sdl = "
enum Kind { FAST SLOW }
input Options { kind: Kind retries: Int = 3 ratio: Float = 1 tags: [String!] = [\"a\"] mode: Kind = SLOW }
";
    let kotlin = render(sdl, &tables, Language::Kotlin);
    assert_line(&kotlin, "val kind: Kind? = Kind.Fast,");
    assert_line(&kotlin, "val retries: Int? = 3,");
    assert_line(&kotlin, "val ratio: Double? = 1.0,");
    assert_line(&kotlin, "val tags: List<String>? = listOf(\"a\"),");
    assert_line(&kotlin, "val mode: Kind? = Kind.SLOW,");

    let swift = render(sdl, &tables, Language::Swift);
    assert_line(&swift, "kind: Kind? = nil,");
    assert_line(&swift, "mode: Kind? = .slow");

    let dart = render(sdl, &tables, Language::Dart);
    assert_line(&dart, "this.tags = const ['a'],");
    assert_line(&dart, "this.mode = Kind.slow,");

    let gd = render(sdl, &tables, Language::GDScript);
    assert_line(&gd, "var retries: Variant = 3");
}

/// Test that custom input overrides replace the generated declaration.
#[test]
fn test_custom_input_override() {
    let tables = Tables::from_json_str(
        r#"{ "custom_input_types": { "Filter": {
            "swift": { "type_name": "Product.Filter" },
            "kotlin": { "type_name": "ProductFilter", "declaration": "typealias ProductFilter = Map<String, Any?>" }
        } } }"#,
    )
    .unwrap();
    let sdl = "input Filter { q: String }\ntype Query { search(filter: Filter): [String!]! }";

    let swift = render(sdl, &tables, Language::Swift);
    assert!(!swift.contains("public struct Filter"));
    assert_line(
        &swift,
        "func search(filter: Product.Filter?) async throws -> [String]",
    );

    let kotlin = render(sdl, &tables, Language::Kotlin);
    assert_line(&kotlin, "typealias ProductFilter = Map<String, Any?>");
    assert_line(&kotlin, "suspend fun search(filter: ProductFilter?): List<String>");

    let dart = render(sdl, &tables, Language::Dart);
    assert_line(&dart, "class Filter {");

    let ir = ir_with(sdl, &tables);
    let generator = CodeGenerator::new(&ir, &tables);
    let summary = |language| generator.generate(language).unwrap().summary;
    assert_eq!(summary(Language::Swift).inputs, 0);
    assert_eq!(summary(Language::Kotlin).inputs, 1);
    assert_eq!(summary(Language::Dart).inputs, 1);
}

/// Test that reserved words are escaped per language.
#[test]
fn test_reserved_words() {
    let sdl = "enum Mode { DEFAULT CUSTOM }\ntype Settings { default: Mode class: String }";
    let swift = render_default(sdl, Language::Swift);
    assert_line(&swift, "case `default` = \"DEFAULT\"");
    assert_line(&swift, "public var `default`: Mode?");

    let kotlin = render_default(sdl, Language::Kotlin);
    assert_line(&kotlin, "val `class`: String? = null,");

    let dart = render_default(sdl, Language::Dart);
    assert_line(&dart, "default_('DEFAULT', 0),");
    assert_line(&dart, "final String? class_;");

    let ts = render_default(sdl, Language::TypeScript);
    assert_line(&ts, "class?: string | null;");

    let gd = render_default(sdl, Language::GDScript);
    assert_line(&gd, "var p_class: Variant");
}

/// Test that descriptions, deprecations and future markers reach the docs.
#[test]
fn test_docs_and_deprecations() {
    let sdl = "
\"A store item.\"
type Item {
  \"Store identifier.\"
  sku: String!
  legacy: String @deprecated(reason: \"Use sku\")
}
# Future
type Subscription2 { x: Int }
";
    let kotlin = render_default(sdl, Language::Kotlin);
    assert_in_order(&kotlin, &["/**", " * A store item.", " */", "data class Item("]);
    assert_line(&kotlin, "* Store identifier.");
    assert_line(&kotlin, "@Deprecated(\"Use sku\")");
    assert_line(&kotlin, "* Future: not yet available on every platform.");

    let swift = render_default(sdl, Language::Swift);
    assert_line(&swift, "/// A store item.");
    assert_line(&swift, "@available(*, deprecated, message: \"Use sku\")");

    let ts = render_default(sdl, Language::TypeScript);
    assert_line(&ts, "/** @deprecated Use sku */");

    let gd = render_default(sdl, Language::GDScript);
    assert_line(&gd, "## @deprecated: Use sku");
}

/// Test that future declarations can be left out.
#[test]
fn test_exclude_future() {
    let sdl = "type Item { id: ID! }\n# Future\ntype Bundle { items: [Item!]! }";
    let ir = ir_with(sdl, &Tables::default());
    let tables = Tables::default();

    let all = CodeGenerator::new(&ir, &tables).generate(Language::Kotlin).unwrap();
    assert!(all.contents.contains("class Bundle("));
    assert_eq!(all.summary.objects, 2);

    let stable = CodeGenerator::new(&ir, &tables)
        .with_options(CodegenOptions {
            include_future: false,
            ..CodegenOptions::default()
        })
        .generate(Language::Kotlin)
        .unwrap();
    assert!(!stable.contents.contains("Bundle"));
    assert_eq!(stable.summary.objects, 1);
}

/// Test header and package options.
#[test]
fn test_header_and_package() {
    let ir = ir_with("type Item { id: ID! }", &Tables::default());
    let tables = Tables::default();
    let file = CodeGenerator::new(&ir, &tables)
        .with_options(CodegenOptions {
            header: false,
            package: Some("com.example.store".to_string()),
            ..CodegenOptions::default()
        })
        .generate(Language::Kotlin)
        .unwrap();
    assert!(file.contents.starts_with("package com.example.store\n"));
    assert!(!file.contents.contains("Generated by"));
}

/// Test that rendering is byte-for-byte deterministic.
#[test]
fn test_deterministic_output() {
    let sdl = "
enum ErrorCode { UNKNOWN NETWORK_ERROR }
interface Entity { id: ID! }
type Receipt implements Entity { id: ID! code: ErrorCode }
union Found = Receipt
type Query { receipts(limit: Int = 5): [Receipt!]! }
";
    let tables = Tables::from_json_str(
        r#"{ "error_code_legacy_aliases": { "NETWORK_ERROR": ["E_NETWORK"] } }"#,
    )
    .unwrap();
    let ir = ir_with(sdl, &tables);
    let generator = CodeGenerator::new(&ir, &tables);
    let first: Vec<GeneratedFile> = generator
        .generate_all(&Language::ALL)
        .into_iter()
        .map(|outcome| outcome.result.unwrap())
        .collect();
    for _ in 0..3 {
        let again: Vec<GeneratedFile> = generator
            .generate_all(&Language::ALL)
            .into_iter()
            .map(|outcome| outcome.result.unwrap())
            .collect();
        assert_eq!(first, again);
    }
    let names: Vec<_> = first.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, ["Types.kt", "Types.swift", "types.dart", "types.ts", "types.gd"]);
}

/// Test that one plugin failing does not stop the others.
#[test]
fn test_failure_is_isolated_per_language() {
    let ir = ir_with("enum Store { PLAY_STORE PlayStore }", &Tables::default());
    let tables = Tables::default();
    let outcomes = CodeGenerator::new(&ir, &tables).generate_all(&Language::ALL);

    let languages: Vec<_> = outcomes.iter().map(|o| o.language).collect();
    assert_eq!(languages, Language::ALL);

    for outcome in &outcomes {
        match outcome.language {
            Language::Kotlin | Language::TypeScript => assert!(outcome.result.is_ok()),
            Language::Swift | Language::Dart | Language::GDScript => {
                let Err(err) = &outcome.result else {
                    panic!("{} should fail", outcome.language);
                };
                assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }));
                assert!(err.to_string().contains("enum `Store`"), "{err}");
            }
        }
    }

    let swift_error = outcomes[1].result.as_ref().unwrap_err();
    insta::assert_snapshot!(
        swift_error.to_string(),
        @"swift cannot represent enum `Store`: `PLAY_STORE` and `PlayStore` both map to `playStore`"
    );
}

/// Test that self-referencing records become classes and unions become indirect.
#[test]
fn test_recursive_swift_types() {
    let sdl = "
type Category { id: ID! parent: Category children: [Category!] }
type Tag { label: String! }
type Leaf { id: ID! }
type Branch { next: Tree }
union Tree = Leaf | Branch
";
    let swift = render_default(sdl, Language::Swift);
    assert_line(&swift, "public final class Category {");
    assert_line(&swift, "public var parent: Category?");
    assert_line(&swift, "public var children: [Category]?");
    assert_line(&swift, "public struct Tag {");
    assert_line(&swift, "public indirect enum Tree {");
    assert_line(&swift, "case branch(Branch)");
    assert_line(&swift, "public final class Branch {");
}

/// Test that a field narrowing its interface type keeps the declared getter.
#[test]
fn test_swift_covariant_interface_field() {
    let sdl = "
interface Node { related: Node }
type Product implements Node { related: Product }
";
    let swift = render_default(sdl, Language::Swift);
    assert_line(&swift, "var related: Node? { get }");
    assert_line(&swift, "public var relatedProduct: Product?");
    assert_line(&swift, "public var related: Node? { relatedProduct }");
    assert_line(&swift, "self.relatedProduct = relatedProduct");

    let kotlin = render_default(sdl, Language::Kotlin);
    assert_line(&kotlin, "override val related: Product? = null,");
}

/// Test that wrapper union variants may not shadow another declaration.
#[test]
fn test_file_wide_name_collisions() {
    let sdl = "
type Purchase { id: ID! }
type ResultPurchase { id: ID! }
# => Union
type Result { purchase: Purchase }
";
    let ir = ir_with(sdl, &Tables::default());
    let tables = Tables::default();
    let generator = CodeGenerator::new(&ir, &tables);

    for (language, file) in [(Language::Kotlin, "Types.kt"), (Language::Dart, "types.dart")] {
        let err = generator.generate(language).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }));
        let message = err.to_string();
        assert!(message.contains(&format!("file `{file}`")), "{message}");
        assert!(message.contains("ResultPurchase"), "{message}");
    }
    assert!(generator.generate(Language::Swift).is_ok());
    assert!(generator.generate(Language::TypeScript).is_ok());
}

/// Test that ordinals stay at their declared position when future values are left out.
#[test]
fn test_ordinals_survive_excluded_values() {
    let sdl = "enum Store {\n  APPLE\n  # Future\n  HORIZON\n  PLAY\n}";
    let ir = ir_with(sdl, &Tables::default());
    let tables = Tables::default();
    let generator = CodeGenerator::new(&ir, &tables).with_options(CodegenOptions {
        include_future: false,
        ..CodegenOptions::default()
    });
    let contents = |language| generator.generate(language).unwrap().contents;

    let kotlin = contents(Language::Kotlin);
    assert!(!kotlin.contains("HORIZON"));
    assert_line(&kotlin, "APPLE(\"APPLE\", 0),");
    assert_line(&kotlin, "PLAY(\"PLAY\", 2);");

    let dart = contents(Language::Dart);
    assert_line(&dart, "play('PLAY', 2);");

    let swift = contents(Language::Swift);
    assert_line(&swift, "case .play: return 2");
}
