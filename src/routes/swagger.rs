use axum::extract::State;
use axum::http::header::{
    HeaderName, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::app::AppState;
use crate::converter::ConversionError;
use crate::errors::{AppError, AppResult};
use crate::extract::{JsonPayload, QueryParams};
use crate::models::container::{ErrorBody, ServiceDefinitionContainer};

pub const MISSING_BALLERINA_SOURCE: &str = "Please provide valid ballerina source.";
pub const MISSING_SWAGGER_SOURCE: &str = "Please provide valid swagger source.";

type AllowOrigin = [(HeaderName, &'static str); 1];

const ALLOW_ANY_ORIGIN: AllowOrigin = [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")];

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConvertToSwaggerQuery {
    /// Service to convert when the source defines more than one.
    pub service_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/service/swagger/ballerina-to-swagger",
    tag = "Swagger",
    params(ConvertToSwaggerQuery),
    request_body = ServiceDefinitionContainer,
    responses(
        (status = 200, description = "Swagger definition generated", body = ServiceDefinitionContainer),
        (status = 400, description = "Source could not be converted", body = ErrorBody)
    )
)]
pub async fn convert_to_swagger(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ConvertToSwaggerQuery>,
    JsonPayload(mut container): JsonPayload<ServiceDefinitionContainer>,
) -> AppResult<(AllowOrigin, Json<ServiceDefinitionContainer>)> {
    let source = container
        .ballerina_definition
        .as_deref()
        .ok_or_else(|| AppError::bad_request("ballerinaDefinition is required"))?;
    let service_name = query.service_name.as_deref().filter(|name| !name.is_empty());

    let swagger = state
        .converter
        .generate_swagger_definitions(source, service_name)
        .await
        .map_err(log_conversion_error)?;

    container.swagger_definition = Some(swagger);
    Ok((ALLOW_ANY_ORIGIN, Json(container)))
}

/// Validates the pair and runs the Swagger to Ballerina conversion on
/// `swaggerDefinition`; `ballerinaDefinition` is only checked for presence.
/// The generated source is not written back; the container is answered unchanged.
#[utoipa::path(
    post,
    path = "/service/swagger/swagger-to-ballerina",
    tag = "Swagger",
    request_body = ServiceDefinitionContainer,
    responses(
        (status = 200, description = "Definitions are convertible; container echoed", body = ServiceDefinitionContainer),
        (status = 204, description = "A required definition is missing", body = String, content_type = "text/plain"),
        (status = 400, description = "Swagger definition could not be converted", body = ErrorBody)
    )
)]
pub async fn convert_to_ballerina(
    State(state): State<AppState>,
    JsonPayload(container): JsonPayload<ServiceDefinitionContainer>,
) -> AppResult<(AllowOrigin, Json<ServiceDefinitionContainer>)> {
    let ballerina = container.ballerina_definition.as_deref().unwrap_or_default();
    if ballerina.is_empty() {
        return Err(AppError::missing_input(MISSING_BALLERINA_SOURCE));
    }
    let swagger = container.swagger_definition.as_deref().unwrap_or_default();
    if swagger.is_empty() {
        return Err(AppError::missing_input(MISSING_SWAGGER_SOURCE));
    }

    let generated = state
        .converter
        .service_from_swagger_definition(swagger)
        .await
        .map_err(log_conversion_error)?;
    tracing::debug!(bytes = generated.len(), "ballerina service generated from swagger definition");

    Ok((ALLOW_ANY_ORIGIN, Json(container)))
}

/// Answers CORS pre-flight requests for both conversion endpoints.
pub async fn preflight() -> (StatusCode, [(HeaderName, &'static str); 4]) {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "content-type"),
            (ACCESS_CONTROL_ALLOW_METHODS, "OPTIONS, POST"),
            (CONTENT_TYPE, "text/plain"),
        ],
    )
}

fn log_conversion_error(err: ConversionError) -> AppError {
    tracing::error!(error = %err, "error while processing service definition at converter service");
    AppError::from(err)
}
