use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::converter::ConversionError;
use crate::models::container::ErrorBody;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// A required field was empty. Answered with 204 and a plain-text hint.
    /// HTTP/1 connections drop the body of a 204, so only in-process callers
    /// of the router see the hint.
    #[error("{0}")]
    MissingInput(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingInput(_) => StatusCode::NO_CONTENT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conversion(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match self {
            AppError::MissingInput(_) => (
                status,
                [(ACCESS_CONTROL_ALLOW_ORIGIN, "*"), (CONTENT_TYPE, "text/plain")],
                message,
            )
                .into_response(),
            _ => (
                status,
                [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
                Json(ErrorBody { error: message }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body;

    #[tokio::test]
    async fn conversion_errors_become_json_bad_requests() {
        let resp = AppError::from(ConversionError::NoServices).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");

        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["Error"], "no service definitions found in ballerina source");
    }

    #[tokio::test]
    async fn missing_input_is_plain_text_no_content() {
        let resp = AppError::missing_input("Please provide valid swagger source.").into_response();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");

        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Please provide valid swagger source.");
    }
}
