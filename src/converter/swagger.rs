//! Swagger 2.0 documents: rendering a [`ServiceDefinition`] as JSON and
//! reading one back from JSON or YAML text.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::model::{
    normalize_path, HttpMethod, ParameterLocation, ResourceDefinition, ResourceParameter,
    ServiceDefinition, ServiceInfo,
};
use super::ConversionError;

pub const SWAGGER_VERSION: &str = "2.0";
const DEFAULT_API_VERSION: &str = "1.0.0";
const DEFAULT_SERVICE_NAME: &str = "SwaggerService";

/// Render `service` as a pretty-printed Swagger 2.0 JSON document.
pub fn render_document(service: &ServiceDefinition) -> Result<String, ConversionError> {
    Ok(serde_json::to_string_pretty(&to_document_value(service))?)
}

pub fn to_document_value(service: &ServiceDefinition) -> Value {
    let mut info = Map::new();
    info.insert(
        "title".to_string(),
        json!(service.info.title.clone().unwrap_or_else(|| service.name.clone())),
    );
    info.insert(
        "version".to_string(),
        json!(service
            .info
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string())),
    );
    if let Some(description) = &service.info.description {
        info.insert("description".to_string(), json!(description));
    }

    let mut paths = Map::new();
    for resource in &service.resources {
        let item = paths
            .entry(resource.path.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(item) = item.as_object_mut() {
            let methods = if resource.methods.is_empty() {
                vec![HttpMethod::Get]
            } else {
                resource.methods.clone()
            };
            for method in methods {
                item.insert(
                    method.swagger_key().to_string(),
                    operation_value(resource, method, resource.methods.len() > 1),
                );
            }
        }
    }

    json!({
        "swagger": SWAGGER_VERSION,
        "info": Value::Object(info),
        "basePath": service.base_path.clone().unwrap_or_else(|| "/".to_string()),
        "paths": Value::Object(paths),
    })
}

fn operation_value(resource: &ResourceDefinition, method: HttpMethod, multi_method: bool) -> Value {
    let operation_id = if multi_method {
        format!("{}{}", resource.name, capitalize(method.swagger_key()))
    } else {
        resource.name.clone()
    };

    let mut operation = Map::new();
    operation.insert("operationId".to_string(), json!(operation_id));
    if let Some(summary) = &resource.summary {
        operation.insert("summary".to_string(), json!(summary));
    }
    if let Some(description) = &resource.description {
        operation.insert("description".to_string(), json!(description));
    }
    if !resource.consumes.is_empty() {
        operation.insert("consumes".to_string(), json!(resource.consumes));
    }
    if !resource.produces.is_empty() {
        operation.insert("produces".to_string(), json!(resource.produces));
    }
    if !resource.parameters.is_empty() {
        let parameters: Vec<Value> = resource.parameters.iter().map(parameter_value).collect();
        operation.insert("parameters".to_string(), Value::Array(parameters));
    }
    operation.insert("responses".to_string(), json!({ "200": { "description": "Successful" } }));
    Value::Object(operation)
}

fn parameter_value(parameter: &ResourceParameter) -> Value {
    match parameter.location {
        ParameterLocation::Body => json!({
            "name": parameter.name,
            "in": "body",
            "required": parameter.required,
            "schema": { "type": schema_type(&parameter.type_name) },
        }),
        location => json!({
            "name": parameter.name,
            "in": location.as_str(),
            "required": parameter.required,
            "type": schema_type(&parameter.type_name),
        }),
    }
}

/// Map a Ballerina value type onto the closest Swagger primitive.
fn schema_type(type_name: &str) -> &'static str {
    match type_name {
        "int" => "integer",
        "float" => "number",
        "boolean" => "boolean",
        "json" | "xml" | "map" => "object",
        other if other.ends_with("[]") => "array",
        _ => "string",
    }
}

fn ballerina_type(swagger_type: Option<&str>, location: ParameterLocation) -> &'static str {
    match (swagger_type, location) {
        (_, ParameterLocation::Body) => "json",
        (Some("integer"), _) => "int",
        (Some("number"), _) => "float",
        (Some("boolean"), _) => "boolean",
        _ => "string",
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SwaggerDocument {
    #[serde(default)]
    info: SwaggerInfo,
    base_path: Option<String>,
    #[serde(default)]
    consumes: Vec<String>,
    #[serde(default)]
    produces: Vec<String>,
    #[serde(default)]
    paths: BTreeMap<String, PathItem>,
}

#[derive(Debug, Default, Deserialize)]
struct SwaggerInfo {
    #[serde(default, deserialize_with = "scalar_string")]
    title: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    version: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    description: Option<String>,
}

/// Accept numbers and booleans where a string is expected; `version: 1.0` is common in YAML.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
struct PathItem {
    get: Option<Operation>,
    put: Option<Operation>,
    post: Option<Operation>,
    delete: Option<Operation>,
    options: Option<Operation>,
    head: Option<Operation>,
    patch: Option<Operation>,
    #[serde(default)]
    parameters: Vec<Parameter>,
}

impl PathItem {
    fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, self.get.as_ref()),
            (HttpMethod::Put, self.put.as_ref()),
            (HttpMethod::Post, self.post.as_ref()),
            (HttpMethod::Delete, self.delete.as_ref()),
            (HttpMethod::Options, self.options.as_ref()),
            (HttpMethod::Head, self.head.as_ref()),
            (HttpMethod::Patch, self.patch.as_ref()),
        ]
        .into_iter()
        .filter_map(|(method, operation)| operation.map(|op| (method, op)))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    operation_id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    consumes: Option<Vec<String>>,
    produces: Option<Vec<String>>,
    #[serde(default)]
    parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Deserialize)]
struct Parameter {
    // `$ref` parameters carry neither and are skipped
    #[serde(default)]
    name: String,
    #[serde(default, rename = "in")]
    location: String,
    required: Option<bool>,
    #[serde(rename = "type")]
    type_name: Option<String>,
}

impl Parameter {
    fn to_resource_parameter(&self) -> Option<ResourceParameter> {
        let location = ParameterLocation::parse(&self.location)?;
        if self.name.is_empty() {
            return None;
        }
        let mut parameter = ResourceParameter::new(
            self.name.clone(),
            location,
            ballerina_type(self.type_name.as_deref(), location),
        );
        if location != ParameterLocation::Path {
            parameter.required = self.required.unwrap_or(parameter.required);
        }
        Some(parameter)
    }
}

/// Read a Swagger document (JSON or YAML) into a [`ServiceDefinition`].
pub fn parse_document(text: &str) -> Result<ServiceDefinition, ConversionError> {
    let document: SwaggerDocument = if text.trim_start().starts_with('{') {
        serde_json::from_str(text).map_err(|err| ConversionError::InvalidSwagger(err.to_string()))?
    } else {
        serde_yaml::from_str(text).map_err(|err| ConversionError::InvalidSwagger(err.to_string()))?
    };

    let mut service = ServiceDefinition {
        name: document
            .info
            .title
            .as_deref()
            .map(to_identifier)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        base_path: document.base_path.as_deref().map(normalize_path),
        info: ServiceInfo {
            title: document.info.title.clone(),
            version: document.info.version.clone(),
            description: document.info.description.clone(),
        },
        resources: Vec::new(),
    };

    let mut taken: Vec<String> = Vec::new();
    for (path, item) in &document.paths {
        for (method, operation) in item.operations() {
            let base_name = operation
                .operation_id
                .as_deref()
                .map(to_identifier)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| derive_operation_name(method, path));
            let name = unique_name(base_name, &taken);
            taken.push(name.clone());

            // operation parameters override path-level ones with the same name and location
            let mut parameters: Vec<Parameter> = item.parameters.clone();
            for parameter in &operation.parameters {
                parameters
                    .retain(|p| !(p.name == parameter.name && p.location == parameter.location));
                parameters.push(parameter.clone());
            }

            service.resources.push(ResourceDefinition {
                name,
                methods: vec![method],
                path: normalize_path(path),
                consumes: operation
                    .consumes
                    .clone()
                    .unwrap_or_else(|| document.consumes.clone()),
                produces: operation
                    .produces
                    .clone()
                    .unwrap_or_else(|| document.produces.clone()),
                parameters: parameters
                    .iter()
                    .filter_map(Parameter::to_resource_parameter)
                    .collect(),
                summary: operation.summary.clone(),
                description: operation.description.clone(),
            });
        }
    }

    Ok(service)
}

/// Turn free text such as `"Swagger Petstore"` into `SwaggerPetstore`.
pub fn to_identifier(text: &str) -> String {
    let mut identifier = String::new();
    let mut upper_next = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if identifier.is_empty() && ch.is_ascii_digit() {
                identifier.push('_');
            }
            if upper_next && !identifier.is_empty() {
                identifier.push(ch.to_ascii_uppercase());
            } else {
                identifier.push(ch);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    identifier
}

fn derive_operation_name(method: HttpMethod, path: &str) -> String {
    let mut name = method.swagger_key().to_string();
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        let segment = segment.trim_start_matches('{').trim_end_matches('}');
        name.push_str(&capitalize(&to_identifier(segment)));
    }
    name
}

fn unique_name(base: String, taken: &[String]) -> String {
    if !taken.contains(&base) {
        return base;
    }
    (1..)
        .map(|index| format!("{base}{index}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
