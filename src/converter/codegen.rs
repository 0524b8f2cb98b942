use std::fmt::Write;

use super::model::{HttpMethod, ParameterLocation, ResourceDefinition, ServiceDefinition};
use super::swagger::to_identifier;

const INDENT: &str = "    ";

/// Render `service` as a Ballerina `service<http>` skeleton with one stub
/// resource per operation.
pub fn render_service(service: &ServiceDefinition) -> String {
    let mut out = String::new();

    out.push_str("import ballerina.net.http;\n");
    let has_swagger_annotations = !service.info.is_empty()
        || service
            .resources
            .iter()
            .any(|resource| resource.summary.is_some() || resource.description.is_some());
    if has_swagger_annotations {
        out.push_str("import ballerina.net.http.swagger;\n");
    }
    out.push('\n');

    if !service.info.is_empty() {
        let mut fields = Vec::new();
        push_field(&mut fields, "title", service.info.title.as_deref());
        push_field(&mut fields, "version", service.info.version.as_deref());
        push_field(&mut fields, "description", service.info.description.as_deref());
        let _ = writeln!(out, "@swagger:ServiceInfo {{{}}}", fields.join(", "));
    }
    let base_path = service.base_path.as_deref().unwrap_or("/");
    let _ = writeln!(out, "@http:configuration {{basePath:{}}}", quote(base_path));
    let _ = writeln!(out, "service<http> {} {{", identifier_or(&service.name, "SwaggerService"));

    for resource in &service.resources {
        out.push('\n');
        render_resource(&mut out, resource);
    }

    out.push_str("}\n");
    out
}

fn render_resource(out: &mut String, resource: &ResourceDefinition) {
    if resource.summary.is_some() || resource.description.is_some() {
        let mut fields = Vec::new();
        push_field(&mut fields, "summary", resource.summary.as_deref());
        push_field(&mut fields, "description", resource.description.as_deref());
        let _ = writeln!(out, "{INDENT}@swagger:ResourceInfo {{{}}}", fields.join(", "));
    }

    let methods: &[HttpMethod] = if resource.methods.is_empty() {
        &[HttpMethod::Get]
    } else {
        &resource.methods
    };
    for method in methods {
        let _ = writeln!(out, "{INDENT}@http:{} {{}}", method.as_str());
    }
    let _ = writeln!(out, "{INDENT}@http:Path {{value:{}}}", quote(&resource.path));
    if !resource.consumes.is_empty() {
        let _ = writeln!(
            out,
            "{INDENT}@http:Consumes {{value:{}}}",
            quote_list(&resource.consumes)
        );
    }
    if !resource.produces.is_empty() {
        let _ = writeln!(
            out,
            "{INDENT}@http:Produces {{value:{}}}",
            quote_list(&resource.produces)
        );
    }

    let mut parameters = vec!["message m".to_string()];
    for parameter in &resource.parameters {
        let annotation = match parameter.location {
            ParameterLocation::Path => "PathParam",
            ParameterLocation::Query => "QueryParam",
            ParameterLocation::Header => "HeaderParam",
            // the payload is read from the message itself
            ParameterLocation::Body => continue,
        };
        parameters.push(format!(
            "@http:{annotation} {{value:{}}} {} {}",
            quote(&parameter.name),
            parameter.type_name,
            identifier_or(&parameter.name, "param"),
        ));
    }

    let _ = writeln!(
        out,
        "{INDENT}resource {} ({}) {{",
        identifier_or(&resource.name, "resource"),
        parameters.join(", ")
    );
    let _ = writeln!(out, "{INDENT}{INDENT}message response = {{}};");
    let _ = writeln!(out, "{INDENT}{INDENT}reply response;");
    let _ = writeln!(out, "{INDENT}}}");
}

fn push_field(fields: &mut Vec<String>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        fields.push(format!("{key}:{}", quote(value)));
    }
}

fn identifier_or(name: &str, fallback: &str) -> String {
    let identifier = to_identifier(name);
    if identifier.is_empty() {
        fallback.to_string()
    } else {
        identifier
    }
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn quote_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|value| quote(value)).collect();
    format!("[{}]", items.join(", "))
}
