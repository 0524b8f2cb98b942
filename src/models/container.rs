use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request and response payload of both conversion endpoints: a Ballerina
/// source and the Swagger document describing it.
///
/// `sourceText` and `descriptionText` are accepted on input, but responses
/// always use `ballerinaDefinition` and `swaggerDefinition`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinitionContainer {
    #[serde(default, alias = "sourceText", skip_serializing_if = "Option::is_none")]
    #[schema(example = "import ballerina.net.http;\n\nservice<http> hello { }")]
    pub ballerina_definition: Option<String>,
    #[serde(default, alias = "descriptionText", skip_serializing_if = "Option::is_none")]
    #[schema(example = "{\"swagger\": \"2.0\", \"paths\": {}}")]
    pub swagger_definition: Option<String>,
}

impl ServiceDefinitionContainer {
    pub fn new(ballerina_definition: impl Into<String>) -> Self {
        Self {
            ballerina_definition: Some(ballerina_definition.into()),
            swagger_definition: None,
        }
    }
}

/// Body of every 400 and 500 response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[serde(rename = "Error")]
    pub error: String,
}
