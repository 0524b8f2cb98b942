//! Reader for the subset of Ballerina source that describes HTTP services:
//! `service<http>` blocks, their resources and the annotations on both.
//! Function bodies and any other top-level definitions are skipped.

use std::collections::BTreeMap;

use super::lexer::{tokenize, Token, TokenKind};
use super::model::{
    normalize_path, HttpMethod, ParameterLocation, ResourceDefinition, ResourceParameter,
    ServiceDefinition, ServiceInfo,
};
use super::ConversionError;

/// Parameter types that carry the connection itself rather than request data.
const CONNECTION_TYPES: &[&str] = &[
    "message",
    "http:Request",
    "http:Response",
    "http:Connection",
    "http:InRequest",
    "http:OutResponse",
];

/// Deepest nesting of arrays, records and annotations inside an annotation value.
const MAX_VALUE_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Str(String),
    Number(String),
    Bool(bool),
    Ident(String),
    Array(Vec<AnnotationValue>),
    Record(BTreeMap<String, AnnotationValue>),
    Annotation(Box<Annotation>),
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Strings of an array value; a lone string is treated as a one-element array.
    pub fn as_strings(&self) -> Vec<String> {
        match self {
            AnnotationValue::Str(value) => vec![value.clone()],
            AnnotationValue::Array(items) => items
                .iter()
                .filter_map(AnnotationValue::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub package: Option<String>,
    pub name: String,
    pub attributes: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn attr_str(&self, key: &str) -> Option<String> {
        self.attributes
            .get(key)
            .and_then(AnnotationValue::as_str)
            .map(str::to_string)
    }

    pub fn attr_strings(&self, key: &str) -> Vec<String> {
        self.attributes
            .get(key)
            .map(AnnotationValue::as_strings)
            .unwrap_or_default()
    }
}

/// Parse every service defined in `source`.
pub fn parse_services(source: &str) -> Result<Vec<ServiceDefinition>, ConversionError> {
    let tokens = tokenize(source)?;
    Parser {
        tokens,
        pos: 0,
        depth: 0,
    }
    .parse_compilation_unit()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

struct RawParameter {
    annotations: Vec<Annotation>,
    type_name: String,
    name: String,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always terminates the stream with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn at_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn unexpected(&self, expected: &str) -> ConversionError {
        let token = self.peek();
        ConversionError::Syntax {
            line: token.line,
            column: token.column,
            message: format!("expected {expected}, found {}", token.describe()),
        }
    }

    fn expect_punct(&mut self, ch: char) -> Result<(), ConversionError> {
        if self.peek().is_punct(ch) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{ch}'")))
        }
    }

    fn eat_punct(&mut self, ch: char) -> bool {
        if self.peek().is_punct(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<String, ConversionError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn parse_compilation_unit(&mut self) -> Result<Vec<ServiceDefinition>, ConversionError> {
        let mut services = Vec::new();
        let mut annotations = Vec::new();

        while !self.at_eof() {
            if self.peek().is_punct('@') {
                annotations.push(self.parse_annotation()?);
                continue;
            }

            if self.peek().is_ident("public") {
                self.advance();
                continue;
            }

            if self.peek().is_ident("service") {
                let service_annotations = std::mem::take(&mut annotations);
                services.push(self.parse_service(service_annotations)?);
                continue;
            }

            // package, import, function, struct, connector, constants...
            annotations.clear();
            self.skip_definition()?;
        }

        Ok(services)
    }

    /// Skip to the end of the current definition: a `;` or a balanced block at depth zero.
    fn skip_definition(&mut self) -> Result<(), ConversionError> {
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Eof => return Ok(()),
                TokenKind::Punct(';') => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::Punct('{') => {
                    self.skip_block()?;
                    self.eat_punct(';');
                    return Ok(());
                }
                TokenKind::Punct('}') => return Err(self.unexpected("a definition")),
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn skip_block(&mut self) -> Result<(), ConversionError> {
        let open = self.peek().clone();
        self.expect_punct('{')?;
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.advance();
            match token.kind {
                TokenKind::Punct('{') => depth += 1,
                TokenKind::Punct('}') => depth -= 1,
                TokenKind::Eof => {
                    return Err(ConversionError::Syntax {
                        line: open.line,
                        column: open.column,
                        message: "unclosed '{'".to_string(),
                    })
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_annotation(&mut self) -> Result<Annotation, ConversionError> {
        self.expect_punct('@')?;
        let first = self.expect_ident()?;
        let (package, name) = if self.eat_punct(':') {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        let attributes = if self.peek().is_punct('{') {
            self.parse_record()?
        } else {
            BTreeMap::new()
        };

        Ok(Annotation {
            package,
            name,
            attributes,
        })
    }

    fn parse_record(&mut self) -> Result<BTreeMap<String, AnnotationValue>, ConversionError> {
        self.expect_punct('{')?;
        let mut fields = BTreeMap::new();
        loop {
            if self.eat_punct('}') {
                break;
            }
            let key = match &self.peek().kind {
                TokenKind::Ident(key) | TokenKind::Str(key) => key.clone(),
                _ => return Err(self.unexpected("attribute name")),
            };
            self.advance();
            self.expect_punct(':')?;
            let value = self.parse_value()?;
            fields.insert(key, value);

            if !self.eat_punct(',') && !self.peek().is_punct('}') {
                return Err(self.unexpected("',' or '}'"));
            }
        }
        Ok(fields)
    }

    fn parse_value(&mut self) -> Result<AnnotationValue, ConversionError> {
        if self.depth >= MAX_VALUE_NESTING {
            let token = self.peek();
            return Err(ConversionError::Syntax {
                line: token.line,
                column: token.column,
                message: "annotation nesting too deep".to_string(),
            });
        }
        self.depth += 1;
        let value = self.parse_nested_value();
        self.depth -= 1;
        value
    }

    fn parse_nested_value(&mut self) -> Result<AnnotationValue, ConversionError> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Str(value) => {
                self.advance();
                Ok(AnnotationValue::Str(value))
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(AnnotationValue::Number(value))
            }
            TokenKind::Punct('-') => {
                self.advance();
                match self.advance().kind {
                    TokenKind::Number(value) => Ok(AnnotationValue::Number(format!("-{value}"))),
                    _ => Err(self.unexpected("number")),
                }
            }
            TokenKind::Ident(ident) => {
                self.advance();
                match ident.as_str() {
                    "true" => Ok(AnnotationValue::Bool(true)),
                    "false" => Ok(AnnotationValue::Bool(false)),
                    _ if self.eat_punct(':') => {
                        let member = self.expect_ident()?;
                        Ok(AnnotationValue::Ident(format!("{ident}:{member}")))
                    }
                    _ => Ok(AnnotationValue::Ident(ident)),
                }
            }
            TokenKind::Punct('[') => {
                self.advance();
                let mut items = Vec::new();
                loop {
                    if self.eat_punct(']') {
                        break;
                    }
                    items.push(self.parse_value()?);
                    if !self.eat_punct(',') && !self.peek().is_punct(']') {
                        return Err(self.unexpected("',' or ']'"));
                    }
                }
                Ok(AnnotationValue::Array(items))
            }
            TokenKind::Punct('{') => Ok(AnnotationValue::Record(self.parse_record()?)),
            TokenKind::Punct('@') => {
                Ok(AnnotationValue::Annotation(Box::new(self.parse_annotation()?)))
            }
            _ => Err(self.unexpected("annotation value")),
        }
    }

    fn parse_service(
        &mut self,
        annotations: Vec<Annotation>,
    ) -> Result<ServiceDefinition, ConversionError> {
        self.advance(); // `service`
        if self.eat_punct('<') {
            self.expect_ident()?;
            self.expect_punct('>')?;
        }
        let name = self.expect_ident()?;

        // endpoint bindings and anything else up to the body are not part of the description
        while !self.peek().is_punct('{') {
            if self.at_eof() {
                return Err(self.unexpected("'{'"));
            }
            self.advance();
        }
        self.expect_punct('{')?;

        let mut service = ServiceDefinition {
            name,
            ..ServiceDefinition::default()
        };
        apply_service_annotations(&mut service, &annotations);

        let mut pending = Vec::new();
        loop {
            if self.eat_punct('}') {
                break;
            }
            if self.at_eof() {
                return Err(self.unexpected("'}'"));
            }
            if self.peek().is_punct('@') {
                pending.push(self.parse_annotation()?);
                continue;
            }
            if self.peek().is_ident("resource") {
                let resource_annotations = std::mem::take(&mut pending);
                service.resources.push(self.parse_resource(resource_annotations)?);
                continue;
            }
            pending.clear();
            self.skip_definition()?;
        }

        Ok(service)
    }

    fn parse_resource(
        &mut self,
        annotations: Vec<Annotation>,
    ) -> Result<ResourceDefinition, ConversionError> {
        self.advance(); // `resource`
        let name = self.expect_ident()?;
        self.expect_punct('(')?;

        let mut parameters = Vec::new();
        if !self.eat_punct(')') {
            loop {
                parameters.push(self.parse_parameter()?);
                if self.eat_punct(')') {
                    break;
                }
                self.expect_punct(',')?;
            }
        }

        while !self.peek().is_punct('{') {
            if self.at_eof() {
                return Err(self.unexpected("resource body"));
            }
            self.advance();
        }
        self.skip_block()?;

        Ok(build_resource(name, &annotations, parameters))
    }

    fn parse_parameter(&mut self) -> Result<RawParameter, ConversionError> {
        let mut annotations = Vec::new();
        while self.peek().is_punct('@') {
            annotations.push(self.parse_annotation()?);
        }

        let mut parts: Vec<Token> = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::Punct(',') | TokenKind::Punct(')') if depth == 0 => break,
                TokenKind::Punct('<') | TokenKind::Punct('[') | TokenKind::Punct('(') => depth += 1,
                TokenKind::Punct('>') | TokenKind::Punct(']') | TokenKind::Punct(')') => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::Eof => return Err(self.unexpected("')'")),
                _ => {}
            }
            parts.push(self.advance());
        }

        let name = match parts.pop() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) if !parts.is_empty() => name,
            _ => return Err(self.unexpected("parameter type and name")),
        };
        let type_name = parts.iter().map(token_text).collect::<String>();

        Ok(RawParameter {
            annotations,
            type_name,
            name,
        })
    }
}

fn token_text(token: &Token) -> String {
    match &token.kind {
        TokenKind::Ident(value) | TokenKind::Number(value) => value.clone(),
        TokenKind::Str(value) => format!("\"{value}\""),
        TokenKind::Punct(ch) => ch.to_string(),
        TokenKind::Eof => String::new(),
    }
}

fn apply_service_annotations(service: &mut ServiceDefinition, annotations: &[Annotation]) {
    for annotation in annotations {
        match annotation.name.as_str() {
            "configuration" => {
                if let Some(base_path) = annotation.attr_str("basePath") {
                    service.base_path = Some(normalize_path(&base_path));
                }
            }
            "BasePath" => {
                if let Some(base_path) = annotation.attr_str("value") {
                    service.base_path = Some(normalize_path(&base_path));
                }
            }
            "ServiceInfo" => {
                service.info = ServiceInfo {
                    title: annotation.attr_str("title"),
                    version: annotation
                        .attr_str("version")
                        .or_else(|| annotation.attr_str("serviceVersion")),
                    description: annotation.attr_str("description"),
                };
            }
            _ => {}
        }
    }
}

fn build_resource(
    name: String,
    annotations: &[Annotation],
    parameters: Vec<RawParameter>,
) -> ResourceDefinition {
    let mut resource = ResourceDefinition {
        name,
        ..ResourceDefinition::default()
    };
    let mut body_param = None;

    for annotation in annotations {
        if let Some(method) = HttpMethod::parse(&annotation.name) {
            // `@http:GET {}` style; only upper-case names are verb annotations
            if annotation.name == method.as_str() {
                resource.methods.push(method);
                continue;
            }
        }
        match annotation.name.as_str() {
            "Path" => resource.path = annotation.attr_str("value").unwrap_or_default(),
            "Consumes" => resource.consumes = annotation.attr_strings("value"),
            "Produces" => resource.produces = annotation.attr_strings("value"),
            "resourceConfig" => {
                resource.methods.extend(
                    annotation
                        .attr_strings("methods")
                        .iter()
                        .filter_map(|m| HttpMethod::parse(m)),
                );
                if let Some(path) = annotation.attr_str("path") {
                    resource.path = path;
                }
                resource.consumes.extend(annotation.attr_strings("consumes"));
                resource.produces.extend(annotation.attr_strings("produces"));
                body_param = annotation.attr_str("body");
            }
            "ResourceInfo" => {
                resource.summary = annotation.attr_str("summary");
                resource.description = annotation.attr_str("description");
            }
            _ => {}
        }
    }

    resource.path = normalize_path(&resource.path);
    resource.methods.sort();
    resource.methods.dedup();

    let placeholders: Vec<String> = resource
        .path_placeholders()
        .into_iter()
        .map(str::to_string)
        .collect();

    for raw in parameters {
        let annotated = raw.annotations.iter().find_map(|annotation| {
            let location = match annotation.name.as_str() {
                "PathParam" => ParameterLocation::Path,
                "QueryParam" => ParameterLocation::Query,
                "HeaderParam" => ParameterLocation::Header,
                _ => return None,
            };
            let name = annotation.attr_str("value").unwrap_or_else(|| raw.name.clone());
            Some((name, location))
        });

        let (name, location) = match annotated {
            Some(found) => found,
            None if CONNECTION_TYPES.contains(&raw.type_name.as_str()) => continue,
            None if body_param.as_deref() == Some(raw.name.as_str()) => {
                (raw.name.clone(), ParameterLocation::Body)
            }
            None if placeholders.contains(&raw.name) => {
                (raw.name.clone(), ParameterLocation::Path)
            }
            None => continue,
        };

        resource
            .parameters
            .push(ResourceParameter::new(name, location, raw.type_name));
    }

    resource
}
