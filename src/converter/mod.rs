//! Conversion between Ballerina service sources and Swagger documents.

pub mod ballerina;
pub mod codegen;
pub mod lexer;
pub mod model;
pub mod swagger;

use async_trait::async_trait;

pub use model::{
    HttpMethod, ParameterLocation, ResourceDefinition, ResourceParameter, ServiceDefinition,
    ServiceInfo,
};

#[derive(thiserror::Error, Debug)]
pub enum ConversionError {
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("no service definitions found in ballerina source")]
    NoServices,
    #[error("service '{0}' not found in ballerina source")]
    UnknownService(String),
    #[error("invalid swagger definition: {0}")]
    InvalidSwagger(String),
    #[error("failed to serialize swagger definition: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Converter used by the HTTP layer. Implementations must be stateless or
/// internally synchronised; one instance serves every request.
#[async_trait]
pub trait SwaggerConverter: Send + Sync {
    /// Short name reported by the health endpoint.
    fn name(&self) -> &'static str;

    /// Produce a Swagger document for one service of `ballerina_source`. When
    /// `service_name` is absent the first service in the source is used.
    async fn generate_swagger_definitions(
        &self,
        ballerina_source: &str,
        service_name: Option<&str>,
    ) -> Result<String, ConversionError>;

    /// Produce Ballerina source for the service described by `swagger_definition`.
    async fn service_from_swagger_definition(
        &self,
        swagger_definition: &str,
    ) -> Result<String, ConversionError>;
}

/// The converter shipped with the service, built on the in-crate Ballerina
/// reader and Swagger writer.
#[derive(Debug, Clone, Default)]
pub struct BallerinaSwaggerConverter;

impl BallerinaSwaggerConverter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SwaggerConverter for BallerinaSwaggerConverter {
    fn name(&self) -> &'static str {
        "ballerina-swagger"
    }

    async fn generate_swagger_definitions(
        &self,
        ballerina_source: &str,
        service_name: Option<&str>,
    ) -> Result<String, ConversionError> {
        let services = ballerina::parse_services(ballerina_source)?;
        let service = select_service(&services, service_name)?;
        tracing::debug!(
            service = %service.name,
            resources = service.resources.len(),
            "generating swagger definition"
        );
        swagger::render_document(service)
    }

    async fn service_from_swagger_definition(
        &self,
        swagger_definition: &str,
    ) -> Result<String, ConversionError> {
        let service = swagger::parse_document(swagger_definition)?;
        tracing::debug!(
            service = %service.name,
            resources = service.resources.len(),
            "generating ballerina service"
        );
        Ok(codegen::render_service(&service))
    }
}

pub fn select_service<'a>(
    services: &'a [ServiceDefinition],
    service_name: Option<&str>,
) -> Result<&'a ServiceDefinition, ConversionError> {
    match service_name {
        Some(name) => services
            .iter()
            .find(|service| service.name == name)
            .ok_or_else(|| ConversionError::UnknownService(name.to_string())),
        None => services.first().ok_or(ConversionError::NoServices),
    }
}
