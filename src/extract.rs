use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// JSON body extractor whose rejection is an [`AppError`], so malformed
/// payloads get the same `{"Error": ...}` body as conversion failures. The
/// message names the offending field path.
#[derive(Debug, Clone)]
pub struct JsonPayload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| AppError::bad_request(err.body_text()))?;

        parse_json(&bytes).map(JsonPayload)
    }
}

/// Query string extractor with the same [`AppError`] rejection as [`JsonPayload`].
#[derive(Debug, Clone, Default)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|err| AppError::bad_request(err.body_text()))?;

        Ok(QueryParams(value))
    }
}

pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        let path = err.path().to_string();
        if path == "." {
            AppError::bad_request(format!("invalid request body: {}", err.inner()))
        } else {
            AppError::bad_request(format!("invalid request body at '{path}': {}", err.inner()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::container::ServiceDefinitionContainer;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Selection {
        service_name: Option<String>,
    }

    async fn extract_query(uri: &str) -> Result<Selection, AppError> {
        let (mut parts, _) = axum::http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        QueryParams::<Selection>::from_request_parts(&mut parts, &())
            .await
            .map(|QueryParams(selection)| selection)
    }

    #[tokio::test]
    async fn reads_query_parameters() {
        let selection = extract_query("/convert?serviceName=clock").await.unwrap();
        assert_eq!(selection.service_name.as_deref(), Some("clock"));

        let selection = extract_query("/convert").await.unwrap();
        assert!(selection.service_name.is_none());
    }

    #[tokio::test]
    async fn duplicated_query_parameter_is_bad_request() {
        let err = extract_query("/convert?serviceName=a&serviceName=b").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("serviceName"), "{err}");
    }

    #[test]
    fn reports_field_path_of_type_errors() {
        let err = parse_json::<ServiceDefinitionContainer>(br#"{"ballerinaDefinition": 42}"#)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ballerinaDefinition"), "{message}");
    }

    #[test]
    fn reports_syntax_errors_without_path() {
        let err = parse_json::<ServiceDefinitionContainer>(b"{not json").unwrap_err();
        assert!(err.to_string().starts_with("bad request: invalid request body:"));
    }
}
