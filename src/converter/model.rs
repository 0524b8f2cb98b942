use std::fmt;

/// HTTP verbs a resource can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Key used for the operation inside a Swagger path item.
    pub fn swagger_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a resource parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Body => "body",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "body" => Some(ParameterLocation::Body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceParameter {
    pub name: String,
    pub location: ParameterLocation,
    pub type_name: String,
    pub required: bool,
}

impl ResourceParameter {
    pub fn new(
        name: impl Into<String>,
        location: ParameterLocation,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            type_name: type_name.into(),
            // path and body parameters can never be omitted by a caller
            required: matches!(location, ParameterLocation::Path | ParameterLocation::Body),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDefinition {
    pub name: String,
    pub methods: Vec<HttpMethod>,
    pub path: String,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub parameters: Vec<ResourceParameter>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl ResourceDefinition {
    /// Names of the `{placeholders}` in the resource path, in order.
    pub fn path_placeholders(&self) -> Vec<&str> {
        path_placeholders(&self.path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceInfo {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl ServiceInfo {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.version.is_none() && self.description.is_none()
    }
}

/// One service together with its resources, the common shape both directions
/// of the conversion go through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub name: String,
    pub base_path: Option<String>,
    pub info: ServiceInfo,
    pub resources: Vec<ResourceDefinition>,
}

pub fn path_placeholders(path: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Prefix a path with `/` when it lacks one; an empty path becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("PATCH"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("TRACE"), None);
    }

    #[test]
    fn placeholders_are_extracted_in_order() {
        assert_eq!(path_placeholders("/pets/{petId}/toys/{toyId}"), vec!["petId", "toyId"]);
        assert!(path_placeholders("/pets/{broken").is_empty());
    }

    #[test]
    fn normalize_path_adds_leading_slash() {
        assert_eq!(normalize_path("pets"), "/pets");
        assert_eq!(normalize_path("/pets"), "/pets");
        assert_eq!(normalize_path(""), "/");
    }
}
