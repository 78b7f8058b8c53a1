//! Recursive descent parser for GraphQL SDL.

use crate::ast::*;
use crate::lexer::{block_string_value, string_value, Lexer};
use crate::token::{DirectiveLocation, Token, TokenKind};
use gqlbind_core::{diagnostics::codes, DiagnosticBag, FileId, Interner, Span, Text};

/// Parser for one SDL file.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    file: FileId,
    current: Token,
    /// End offset of the last consumed token.
    prev_end: u32,
    diagnostics: DiagnosticBag,
}

/// Result of parsing.
pub struct ParseResult {
    pub document: Document,
    pub diagnostics: DiagnosticBag,
}

/// Parses a source string into a document.
pub fn parse(source: &str, file: FileId, interner: &Interner) -> ParseResult {
    let mut parser = Parser::new(source, file, interner);
    let document = parser.parse_document();
    ParseResult {
        document,
        diagnostics: parser.diagnostics,
    }
}

impl<'a> Parser<'a> {
    /// Creates a new parser.
    pub fn new(source: &'a str, file: FileId, interner: &'a Interner) -> Self {
        let mut lexer = Lexer::new(source, interner);
        let current = lexer.next_token();
        Self {
            lexer,
            file,
            current,
            prev_end: 0,
            diagnostics: DiagnosticBag::new(),
        }
    }

    /// Returns the current token kind.
    #[inline]
    fn at(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns true if at the given kind.
    #[inline]
    fn at_kind(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Advances to the next token, reporting lexer errors on the way.
    fn advance(&mut self) {
        self.prev_end = self.current.span.end;
        self.current = self.lexer.next_token();
        while self.at_kind(TokenKind::Error) {
            self.report_lex_error();
            self.prev_end = self.current.span.end;
            self.current = self.lexer.next_token();
        }
    }

    fn report_lex_error(&mut self) {
        let text = self.current_text();
        if text.starts_with('"') {
            self.diagnostics.error(
                codes::UNTERMINATED_STRING,
                "unterminated string",
                self.current.span,
                "string is never closed",
            );
        } else {
            self.diagnostics.error(
                codes::INVALID_SYNTAX,
                "invalid token",
                self.current.span,
                format!("unexpected `{text}`"),
            );
        }
    }

    /// Expects a specific token kind.
    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.advance();
            true
        } else {
            self.error_expected(kind);
            false
        }
    }

    /// Consumes the token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Gets the text of the current token.
    fn current_text(&self) -> &'a str {
        self.lexer.span_text(self.current.span)
    }

    /// Interns the current token's text.
    fn intern_current(&self) -> Text {
        self.lexer.intern_span(self.current.span)
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end.max(start))
    }

    /// Reports an error.
    fn error(&mut self, message: &str) {
        let found = self.found();
        self.diagnostics.error(
            codes::INVALID_SYNTAX,
            message,
            self.current.span,
            format!("{message}, found {found}"),
        );
    }

    /// Reports an expected token error.
    fn error_expected(&mut self, expected: TokenKind) {
        let found = self.found();
        self.diagnostics.error(
            codes::UNEXPECTED_TOKEN,
            "unexpected token",
            self.current.span,
            format!("expected `{expected}`, found {found}"),
        );
    }

    fn found(&self) -> String {
        match self.at() {
            TokenKind::Eof => "end of file".to_string(),
            _ => format!("`{}`", self.current_text()),
        }
    }

    /// Whether the current token starts a top-level definition.
    fn at_definition_start(&self) -> bool {
        matches!(
            self.at(),
            TokenKind::Schema
                | TokenKind::Scalar
                | TokenKind::Type
                | TokenKind::Interface
                | TokenKind::Union
                | TokenKind::Enum
                | TokenKind::Input
                | TokenKind::Directive
                | TokenKind::Extend
                | TokenKind::StringLiteral
                | TokenKind::BlockStringLiteral
        )
    }

    /// Parses a document.
    pub fn parse_document(&mut self) -> Document {
        // The first token may itself be an error token.
        while self.at_kind(TokenKind::Error) {
            self.report_lex_error();
            self.current = self.lexer.next_token();
        }

        let start = self.current.span.start;
        let mut definitions = Vec::new();

        while !self.at_kind(TokenKind::Eof) {
            let before = self.current.span.start;
            if let Some(def) = self.parse_definition() {
                definitions.push(def);
            } else {
                // Recovery: skip to next definition
                if self.current.span.start == before {
                    self.advance();
                }
                while !self.at_kind(TokenKind::Eof) && !self.at_definition_start() {
                    self.advance();
                }
            }
        }

        Document {
            file: self.file,
            definitions,
            span: Span::new(start, self.current.span.end),
        }
    }

    /// Parses a definition.
    fn parse_definition(&mut self) -> Option<Definition> {
        let description = self.try_parse_description();

        match self.at() {
            TokenKind::Schema => Some(Definition::Schema(
                self.parse_schema_definition(description),
            )),
            TokenKind::Directive => Some(Definition::Directive(
                self.parse_directive_definition(description),
            )),
            TokenKind::Extend => {
                if let Some(description) = &description {
                    self.diagnostics.error(
                        codes::INVALID_SYNTAX,
                        "unexpected description",
                        description.span,
                        "extensions cannot carry a description",
                    );
                }
                self.parse_extension()
            }
            _ => match self.parse_type_definition(description) {
                Some(def) => Some(Definition::Type(def)),
                None => {
                    self.error("expected a type system definition");
                    None
                }
            },
        }
    }

    /// Parses `extend ...`.
    fn parse_extension(&mut self) -> Option<Definition> {
        let start = self.current.span.start;
        self.advance(); // extend

        if self.at_kind(TokenKind::Schema) {
            let mut schema = self.parse_schema_definition(None);
            schema.span = self.span_from(start);
            return Some(Definition::SchemaExtension(schema));
        }

        match self.parse_type_definition(None) {
            Some(mut def) => {
                set_span_start(&mut def, start);
                Some(Definition::Extension(def))
            }
            None => {
                self.error("expected a type kind after `extend`");
                None
            }
        }
    }

    /// Parses a named type definition. Bodies are optional for extensions
    /// and for body-less declarations.
    fn parse_type_definition(&mut self, description: Option<Description>) -> Option<TypeDefinition> {
        let def = match self.at() {
            TokenKind::Type => TypeDefinition::Object(self.parse_object_type(description)),
            TokenKind::Interface => {
                TypeDefinition::Interface(self.parse_interface_type(description))
            }
            TokenKind::Union => TypeDefinition::Union(self.parse_union_type(description)),
            TokenKind::Enum => TypeDefinition::Enum(self.parse_enum_type(description)),
            TokenKind::Input => TypeDefinition::Input(self.parse_input_object_type(description)),
            TokenKind::Scalar => TypeDefinition::Scalar(self.parse_scalar_type(description)),
            _ => return None,
        };
        Some(def)
    }

    /// Tries to parse a description.
    fn try_parse_description(&mut self) -> Option<Description> {
        let value = match self.at() {
            TokenKind::StringLiteral => string_value(self.current_text()),
            TokenKind::BlockStringLiteral => block_string_value(self.current_text()),
            _ => return None,
        };
        let span = self.current.span;
        self.advance();
        Some(Description::new(value, span))
    }

    /// Parses a name.
    fn parse_name(&mut self) -> Name {
        let span = self.current.span;
        let value = self.intern_current();
        if self.at().is_name() {
            self.advance();
        } else {
            self.error("expected name");
        }
        Name::new(value, span)
    }

    /// Parses schema definition.
    fn parse_schema_definition(&mut self, description: Option<Description>) -> SchemaDefinition {
        let start = self.current.span.start;
        self.advance(); // schema

        let directives = self.parse_directives();
        let mut operations = Vec::new();

        if self.eat(TokenKind::LBrace) {
            while !self.at_kind(TokenKind::RBrace) && !self.at_kind(TokenKind::Eof) {
                let op_start = self.current.span.start;
                let operation = match self.at() {
                    TokenKind::Query => OperationType::Query,
                    TokenKind::Mutation => OperationType::Mutation,
                    TokenKind::Subscription => OperationType::Subscription,
                    _ => {
                        self.error("expected operation type");
                        self.advance();
                        continue;
                    }
                };
                self.advance();
                self.expect(TokenKind::Colon);
                let type_name = self.parse_name();
                operations.push(OperationTypeDefinition {
                    operation,
                    type_name,
                    span: self.span_from(op_start),
                });
            }
            self.expect(TokenKind::RBrace);
        }

        SchemaDefinition {
            description,
            directives,
            operations,
            span: self.span_from(start),
        }
    }

    /// Parses object type definition.
    fn parse_object_type(&mut self, description: Option<Description>) -> ObjectTypeDefinition {
        let start = self.current.span.start;
        self.advance(); // type

        let name = self.parse_name();
        let implements = self.parse_implements();
        let directives = self.parse_directives();
        let fields = self.parse_fields_block();

        ObjectTypeDefinition {
            description,
            name,
            implements,
            directives,
            fields,
            span: self.span_from(start),
        }
    }

    /// Parses interface type definition.
    fn parse_interface_type(&mut self, description: Option<Description>) -> InterfaceTypeDefinition {
        let start = self.current.span.start;
        self.advance(); // interface

        let name = self.parse_name();
        let implements = self.parse_implements();
        let directives = self.parse_directives();
        let fields = self.parse_fields_block();

        InterfaceTypeDefinition {
            description,
            name,
            implements,
            directives,
            fields,
            span: self.span_from(start),
        }
    }

    /// Parses union type definition.
    fn parse_union_type(&mut self, description: Option<Description>) -> UnionTypeDefinition {
        let start = self.current.span.start;
        self.advance(); // union

        let name = self.parse_name();
        let directives = self.parse_directives();

        let mut members = Vec::new();
        if self.eat(TokenKind::Eq) {
            self.eat(TokenKind::Pipe);
            members.push(self.parse_name());
            while self.eat(TokenKind::Pipe) {
                members.push(self.parse_name());
            }
        }

        UnionTypeDefinition {
            description,
            name,
            directives,
            members,
            span: self.span_from(start),
        }
    }

    /// Parses enum type definition.
    fn parse_enum_type(&mut self, description: Option<Description>) -> EnumTypeDefinition {
        let start = self.current.span.start;
        self.advance(); // enum

        let name = self.parse_name();
        let directives = self.parse_directives();

        let values = if self.eat(TokenKind::LBrace) {
            let values = self.parse_enum_values();
            self.expect(TokenKind::RBrace);
            values
        } else {
            Vec::new()
        };

        EnumTypeDefinition {
            description,
            name,
            directives,
            values,
            span: self.span_from(start),
        }
    }

    /// Parses enum values.
    fn parse_enum_values(&mut self) -> Vec<EnumValueDefinition> {
        let mut values = Vec::new();
        while !self.at_kind(TokenKind::RBrace) && !self.at_kind(TokenKind::Eof) {
            let before = self.current.span.start;
            let description = self.try_parse_description();
            let value_start = self.current.span.start;

            if matches!(self.at(), TokenKind::True | TokenKind::False | TokenKind::Null) {
                self.error("enum values cannot be `true`, `false` or `null`");
            }
            let name = self.parse_name();
            let directives = self.parse_directives();

            values.push(EnumValueDefinition {
                description,
                name,
                directives,
                span: self.span_from(value_start),
            });

            if self.current.span.start == before {
                self.advance();
            }
        }
        values
    }

    /// Parses input object type definition.
    fn parse_input_object_type(
        &mut self,
        description: Option<Description>,
    ) -> InputObjectTypeDefinition {
        let start = self.current.span.start;
        self.advance(); // input

        let name = self.parse_name();
        let directives = self.parse_directives();

        let fields = if self.eat(TokenKind::LBrace) {
            let fields = self.parse_input_value_definitions(TokenKind::RBrace);
            self.expect(TokenKind::RBrace);
            fields
        } else {
            Vec::new()
        };

        InputObjectTypeDefinition {
            description,
            name,
            directives,
            fields,
            span: self.span_from(start),
        }
    }

    /// Parses scalar type definition.
    fn parse_scalar_type(&mut self, description: Option<Description>) -> ScalarTypeDefinition {
        let start = self.current.span.start;
        self.advance(); // scalar

        let name = self.parse_name();
        let directives = self.parse_directives();

        ScalarTypeDefinition {
            description,
            name,
            directives,
            span: self.span_from(start),
        }
    }

    /// Parses directive definition.
    fn parse_directive_definition(
        &mut self,
        description: Option<Description>,
    ) -> DirectiveDefinitionNode {
        let start = self.current.span.start;
        self.advance(); // directive
        self.expect(TokenKind::At);

        let name = self.parse_name();
        let arguments = if self.eat(TokenKind::LParen) {
            let args = self.parse_input_value_definitions(TokenKind::RParen);
            self.expect(TokenKind::RParen);
            args
        } else {
            Vec::new()
        };

        let repeatable = self.eat(TokenKind::Repeatable);
        self.expect(TokenKind::On);

        let mut locations = Vec::new();
        self.eat(TokenKind::Pipe);
        loop {
            match DirectiveLocation::parse(self.current_text()) {
                Some(location) => {
                    locations.push(location);
                    self.advance();
                }
                None => {
                    self.error("expected directive location");
                    break;
                }
            }
            if !self.eat(TokenKind::Pipe) {
                break;
            }
        }

        DirectiveDefinitionNode {
            description,
            name,
            arguments,
            repeatable,
            locations,
            span: self.span_from(start),
        }
    }

    /// Parses implements clause.
    fn parse_implements(&mut self) -> Vec<Name> {
        let mut implements = Vec::new();
        if self.eat(TokenKind::Implements) {
            self.eat(TokenKind::Amp);
            implements.push(self.parse_name());
            while self.eat(TokenKind::Amp) {
                implements.push(self.parse_name());
            }
        }
        implements
    }

    /// Parses an optional `{ field* }` block.
    fn parse_fields_block(&mut self) -> Vec<FieldDefinition> {
        if !self.eat(TokenKind::LBrace) {
            return Vec::new();
        }
        let fields = self.parse_field_definitions();
        self.expect(TokenKind::RBrace);
        fields
    }

    /// Parses field definitions.
    fn parse_field_definitions(&mut self) -> Vec<FieldDefinition> {
        let mut fields = Vec::new();
        while !self.at_kind(TokenKind::RBrace) && !self.at_kind(TokenKind::Eof) {
            let before = self.current.span.start;
            let description = self.try_parse_description();
            fields.push(self.parse_field_definition(description));
            if self.current.span.start == before {
                self.advance();
            }
        }
        fields
    }

    /// Parses a field definition.
    fn parse_field_definition(&mut self, description: Option<Description>) -> FieldDefinition {
        let start = self.current.span.start;
        let name = self.parse_name();

        let arguments = if self.eat(TokenKind::LParen) {
            let args = self.parse_input_value_definitions(TokenKind::RParen);
            self.expect(TokenKind::RParen);
            args
        } else {
            Vec::new()
        };

        self.expect(TokenKind::Colon);
        let ty = self.parse_type();
        let directives = self.parse_directives();

        FieldDefinition {
            description,
            name,
            arguments,
            ty,
            directives,
            span: self.span_from(start),
        }
    }

    /// Parses input value definitions up to `close`.
    fn parse_input_value_definitions(&mut self, close: TokenKind) -> Vec<InputValueDefinition> {
        let mut fields = Vec::new();
        while !self.at_kind(close) && !self.at_kind(TokenKind::Eof) {
            let before = self.current.span.start;
            let description = self.try_parse_description();
            fields.push(self.parse_input_value_definition(description));
            if self.current.span.start == before {
                self.advance();
            }
        }
        fields
    }

    /// Parses an input value definition.
    fn parse_input_value_definition(
        &mut self,
        description: Option<Description>,
    ) -> InputValueDefinition {
        let start = self.current.span.start;
        let name = self.parse_name();
        self.expect(TokenKind::Colon);
        let ty = self.parse_type();

        let default_value = if self.eat(TokenKind::Eq) {
            Some(self.parse_value(true))
        } else {
            None
        };

        let directives = self.parse_directives();

        InputValueDefinition {
            description,
            name,
            ty,
            default_value,
            directives,
            span: self.span_from(start),
        }
    }

    /// Parses a type reference.
    fn parse_type(&mut self) -> Type {
        let start = self.current.span.start;

        let ty = if self.eat(TokenKind::LBracket) {
            let inner = self.parse_type();
            self.expect(TokenKind::RBracket);
            Type::List(Box::new(inner), self.span_from(start))
        } else {
            let name = self.parse_name();
            Type::Named(NamedType {
                name: name.value,
                span: name.span,
            })
        };

        if self.eat(TokenKind::Bang) {
            Type::NonNull(Box::new(ty), self.span_from(start))
        } else {
            ty
        }
    }

    /// Parses directives.
    fn parse_directives(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        while self.at_kind(TokenKind::At) {
            directives.push(self.parse_directive());
        }
        directives
    }

    /// Parses a directive.
    fn parse_directive(&mut self) -> Directive {
        let start = self.current.span.start;
        self.advance(); // @

        let name = self.parse_name();
        let arguments = if self.eat(TokenKind::LParen) {
            let args = self.parse_arguments();
            self.expect(TokenKind::RParen);
            args
        } else {
            Vec::new()
        };

        Directive {
            name,
            arguments,
            span: self.span_from(start),
        }
    }

    /// Parses arguments.
    fn parse_arguments(&mut self) -> Vec<Argument> {
        let mut args = Vec::new();
        while !self.at_kind(TokenKind::RParen) && !self.at_kind(TokenKind::Eof) {
            let before = self.current.span.start;
            args.push(self.parse_argument());
            if self.current.span.start == before {
                self.advance();
            }
        }
        args
    }

    /// Parses an argument.
    fn parse_argument(&mut self) -> Argument {
        let start = self.current.span.start;
        let name = self.parse_name();
        self.expect(TokenKind::Colon);
        let value = self.parse_value(false);
        Argument {
            name,
            value,
            span: self.span_from(start),
        }
    }

    /// Parses a value. Variables are rejected in const positions.
    fn parse_value(&mut self, is_const: bool) -> Value {
        let start = self.current.span.start;

        match self.at() {
            TokenKind::Dollar => {
                self.advance();
                let name = self.parse_name();
                if is_const {
                    self.diagnostics.error(
                        codes::INVALID_SYNTAX,
                        "unexpected variable",
                        self.span_from(start),
                        "default values must be constant",
                    );
                }
                Value::Variable(name)
            }
            TokenKind::IntLiteral => {
                let text = self.current_text();
                let value = match text.parse() {
                    Ok(value) => value,
                    Err(_) => {
                        self.error("integer literal out of range");
                        0
                    }
                };
                self.advance();
                Value::Int(value, self.span_from(start))
            }
            TokenKind::FloatLiteral => {
                let value = self.current_text().parse().unwrap_or(0.0);
                self.advance();
                Value::Float(value, self.span_from(start))
            }
            TokenKind::StringLiteral => {
                let value = string_value(self.current_text());
                self.advance();
                Value::String(value, self.span_from(start))
            }
            TokenKind::BlockStringLiteral => {
                let value = block_string_value(self.current_text());
                self.advance();
                Value::String(value, self.span_from(start))
            }
            TokenKind::True => {
                self.advance();
                Value::Boolean(true, self.span_from(start))
            }
            TokenKind::False => {
                self.advance();
                Value::Boolean(false, self.span_from(start))
            }
            TokenKind::Null => {
                self.advance();
                Value::Null(self.span_from(start))
            }
            TokenKind::LBracket => {
                self.advance();
                let mut values = Vec::new();
                while !self.at_kind(TokenKind::RBracket) && !self.at_kind(TokenKind::Eof) {
                    let before = self.current.span.start;
                    values.push(self.parse_value(is_const));
                    if self.current.span.start == before {
                        self.advance();
                    }
                }
                self.expect(TokenKind::RBracket);
                Value::List(values, self.span_from(start))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut fields = Vec::new();
                while !self.at_kind(TokenKind::RBrace) && !self.at_kind(TokenKind::Eof) {
                    let before = self.current.span.start;
                    let name = self.parse_name();
                    self.expect(TokenKind::Colon);
                    let value = self.parse_value(is_const);
                    fields.push((name, value));
                    if self.current.span.start == before {
                        self.advance();
                    }
                }
                self.expect(TokenKind::RBrace);
                Value::Object(fields, self.span_from(start))
            }
            kind if kind.is_name() => {
                let name = self.parse_name();
                Value::Enum(name)
            }
            _ => {
                self.error("expected value");
                Value::Null(Span::empty(start))
            }
        }
    }
}

fn set_span_start(def: &mut TypeDefinition, start: u32) {
    let span = match def {
        TypeDefinition::Object(def) => &mut def.span,
        TypeDefinition::Interface(def) => &mut def.span,
        TypeDefinition::Union(def) => &mut def.span,
        TypeDefinition::Enum(def) => &mut def.span,
        TypeDefinition::Input(def) => &mut def.span,
        TypeDefinition::Scalar(def) => &mut def.span,
    };
    span.start = start;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> (Document, Interner) {
        let interner = Interner::new();
        let result = parse(source, FileId::from_raw(0), &interner);
        assert!(
            !result.diagnostics.has_errors(),
            "unexpected diagnostics: {:?}",
            result.diagnostics.into_vec()
        );
        (result.document, interner)
    }

    fn object(def: &Definition) -> &ObjectTypeDefinition {
        match def {
            Definition::Type(TypeDefinition::Object(obj)) => obj,
            other => panic!("expected object type, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_simple_type() {
        let (doc, interner) = parse_ok("type Query { hello: String }");
        assert_eq!(doc.definitions.len(), 1);
        let query = object(&doc.definitions[0]);
        assert_eq!(interner.get(query.name.value), "Query");
        assert_eq!(interner.get(query.fields[0].name.value), "hello");
    }

    #[test]
    fn test_parse_wrapping_types() {
        let (doc, interner) = parse_ok("type Cart { items: [Item!]! tags: [[String]] }");
        let cart = object(&doc.definitions[0]);
        assert_eq!(cart.fields[0].ty.display(&interner), "[Item!]!");
        assert!(cart.fields[0].ty.is_non_null());
        assert_eq!(cart.fields[1].ty.display(&interner), "[[String]]");
        assert_eq!(interner.get(cart.fields[1].ty.named_type().name), "String");
    }

    #[test]
    fn test_parse_descriptions_and_deprecation() {
        let source = r#"
            """
            A purchasable product.
            """
            type Product {
              "Store identifier"
              id: ID!
              price: Float @deprecated(reason: "Use priceMicros")
              legacy: String @deprecated
            }
        "#;
        let (doc, interner) = parse_ok(source);
        let product = object(&doc.definitions[0]);
        assert_eq!(
            product.description.as_ref().map(|d| d.value.as_str()),
            Some("A purchasable product.")
        );
        assert_eq!(
            product.fields[0].description.as_ref().map(|d| d.value.as_str()),
            Some("Store identifier")
        );
        assert_eq!(
            deprecation(&product.fields[1].directives, &interner).as_deref(),
            Some("Use priceMicros")
        );
        assert_eq!(
            deprecation(&product.fields[2].directives, &interner).as_deref(),
            Some(DEFAULT_DEPRECATION_REASON)
        );
        assert_eq!(deprecation(&product.fields[0].directives, &interner), None);
    }

    #[test]
    fn test_description_counts_as_declaration_start() {
        let source = "\"doc\"\ntype A { a: Int }";
        let (doc, _) = parse_ok(source);
        let Definition::Type(def) = &doc.definitions[0] else {
            panic!("expected type");
        };
        assert_eq!(def.start(), 0);
        assert_eq!(def.span().start, 6);
    }

    #[test]
    fn test_parse_interfaces_unions_inputs() {
        let source = r#"
            interface Node { id: ID! }
            type User implements Node & Entity { id: ID! }
            union SearchResult = | User | Product
            input Filter { limit: Int = 10, tags: [String!] = ["a", "b"], mode: Mode = FAST }
            scalar DateTime
            enum Mode { FAST, SLOW }
        "#;
        let (doc, interner) = parse_ok(source);
        assert_eq!(doc.definitions.len(), 6);

        let user = object(&doc.definitions[1]);
        let names: Vec<_> = user.implements.iter().map(|n| interner.get(n.value)).collect();
        assert_eq!(names, ["Node", "Entity"]);

        let Definition::Type(TypeDefinition::Union(union)) = &doc.definitions[2] else {
            panic!("expected union");
        };
        assert_eq!(union.members.len(), 2);

        let Definition::Type(TypeDefinition::Input(filter)) = &doc.definitions[3] else {
            panic!("expected input");
        };
        assert!(matches!(filter.fields[0].default_value, Some(Value::Int(10, _))));
        assert!(matches!(&filter.fields[1].default_value, Some(Value::List(items, _)) if items.len() == 2));
        assert!(matches!(filter.fields[2].default_value, Some(Value::Enum(_))));

        let Definition::Type(TypeDefinition::Enum(mode)) = &doc.definitions[5] else {
            panic!("expected enum");
        };
        assert_eq!(mode.values.len(), 2);
    }

    #[test]
    fn test_keywords_as_names() {
        let (doc, interner) = parse_ok("type Event { type: String input: Int query: Boolean }");
        let event = object(&doc.definitions[0]);
        let names: Vec<_> = event.fields.iter().map(|f| interner.get(f.name.value)).collect();
        assert_eq!(names, ["type", "input", "query"]);
    }

    #[test]
    fn test_parse_schema_and_extensions() {
        let source = r#"
            schema { query: RootQuery mutation: RootMutation }
            extend type Product { platform: String }
            extend enum Color { BLUE }
            extend schema @foo
        "#;
        let (doc, _) = parse_ok(source);
        assert!(matches!(&doc.definitions[0], Definition::Schema(s) if s.operations.len() == 2));
        assert!(matches!(&doc.definitions[1], Definition::Extension(TypeDefinition::Object(_))));
        assert!(matches!(&doc.definitions[2], Definition::Extension(TypeDefinition::Enum(_))));
        assert!(matches!(&doc.definitions[3], Definition::SchemaExtension(_)));
    }

    #[test]
    fn test_parse_directive_definition() {
        let (doc, _) = parse_ok(
            "directive @platform(name: String!) repeatable on FIELD_DEFINITION | ENUM_VALUE",
        );
        let Definition::Directive(directive) = &doc.definitions[0] else {
            panic!("expected directive definition");
        };
        assert!(directive.repeatable);
        assert_eq!(
            directive.locations,
            [DirectiveLocation::FieldDefinition, DirectiveLocation::EnumValue]
        );
    }

    #[test]
    fn test_syntax_errors_are_reported() {
        let interner = Interner::new();
        let result = parse("type { a: }", FileId::from_raw(0), &interner);
        assert!(result.diagnostics.has_errors());

        let result = parse("type A { a: \"oops }", FileId::from_raw(0), &interner);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.code == codes::UNTERMINATED_STRING));
    }

    #[test]
    fn test_recovery_terminates_on_garbage() {
        let interner = Interner::new();
        let result = parse("%%% type A { b: Int } ??? }", FileId::from_raw(0), &interner);
        assert!(result.diagnostics.has_errors());
        assert!(result
            .document
            .definitions
            .iter()
            .any(|d| matches!(d, Definition::Type(_))));
    }
}
