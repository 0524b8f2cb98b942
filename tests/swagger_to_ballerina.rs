mod common;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;

use common::{post_json, HELLO_SOURCE, PETSTORE_SWAGGER};
use swagger_bridge::{create_app, create_default_app, AppState, ConversionError, SwaggerConverter};

const ENDPOINT: &str = "/service/swagger/swagger-to-ballerina";

#[tokio::test]
async fn empty_ballerina_source_is_no_content() -> Result<()> {
    let app = create_default_app();

    for payload in [
        json!({ "ballerinaDefinition": "", "swaggerDefinition": PETSTORE_SWAGGER }),
        json!({ "swaggerDefinition": PETSTORE_SWAGGER }),
        json!({}),
    ] {
        let resp = post_json(&app, ENDPOINT, &payload).await?;
        assert_eq!(resp.status, StatusCode::NO_CONTENT);
        assert!(resp.text().contains("ballerina source"), "body: {}", resp.text());
    }

    Ok(())
}

#[tokio::test]
async fn empty_swagger_source_is_no_content() -> Result<()> {
    let app = create_default_app();

    let resp = post_json(
        &app,
        ENDPOINT,
        &json!({ "ballerinaDefinition": HELLO_SOURCE, "swaggerDefinition": "" }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert_eq!(resp.text(), "Please provide valid swagger source.");

    Ok(())
}

#[tokio::test]
async fn populated_container_is_echoed_verbatim() -> Result<()> {
    let app = create_default_app();

    let payload = json!({
        "ballerinaDefinition": HELLO_SOURCE,
        "swaggerDefinition": PETSTORE_SWAGGER,
    });
    let resp = post_json(&app, ENDPOINT, &payload).await?;
    assert_eq!(resp.status, StatusCode::OK, "body: {}", resp.text());
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
    assert_eq!(resp.json()?, payload);

    Ok(())
}

#[tokio::test]
async fn yaml_swagger_is_accepted() -> Result<()> {
    let app = create_default_app();

    let yaml = "swagger: '2.0'\ninfo:\n  title: Ping\n  version: 1.0\npaths:\n  /ping:\n    get:\n      responses:\n        200:\n          description: pong\n";
    let resp = post_json(
        &app,
        ENDPOINT,
        &json!({ "ballerinaDefinition": HELLO_SOURCE, "swaggerDefinition": yaml }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::OK, "body: {}", resp.text());

    Ok(())
}

#[tokio::test]
async fn invalid_swagger_is_bad_request() -> Result<()> {
    let app = create_default_app();

    let resp = post_json(
        &app,
        ENDPOINT,
        &json!({ "ballerinaDefinition": HELLO_SOURCE, "swaggerDefinition": "{\"paths\": [1, 2" }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));
    assert!(resp.json()?["Error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("invalid swagger definition"));

    Ok(())
}

struct FailingConverter;

#[async_trait]
impl SwaggerConverter for FailingConverter {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn generate_swagger_definitions(
        &self,
        _: &str,
        _: Option<&str>,
    ) -> Result<String, ConversionError> {
        Err(ConversionError::NoServices)
    }

    async fn service_from_swagger_definition(&self, _: &str) -> Result<String, ConversionError> {
        Err(ConversionError::InvalidSwagger("converter exploded".to_string()))
    }
}

#[tokio::test]
async fn converter_failures_map_to_bad_request() -> Result<()> {
    let app = create_app(AppState::new(Arc::new(FailingConverter)));

    let resp = post_json(
        &app,
        ENDPOINT,
        &json!({ "ballerinaDefinition": "anything", "swaggerDefinition": "anything" }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()?, json!({ "Error": "invalid swagger definition: converter exploded" }));

    // validation happens before the converter is consulted
    let resp = post_json(&app, ENDPOINT, &json!({ "ballerinaDefinition": "anything" })).await?;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);

    Ok(())
}

#[derive(Default)]
struct RecordingConverter {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl SwaggerConverter for RecordingConverter {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn generate_swagger_definitions(
        &self,
        _: &str,
        _: Option<&str>,
    ) -> Result<String, ConversionError> {
        Err(ConversionError::NoServices)
    }

    async fn service_from_swagger_definition(&self, text: &str) -> Result<String, ConversionError> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(String::new())
    }
}

#[tokio::test]
async fn swagger_definition_is_what_gets_converted() -> Result<()> {
    let converter = Arc::new(RecordingConverter::default());
    let app = create_app(AppState::new(converter.clone()));

    let resp = post_json(
        &app,
        ENDPOINT,
        &json!({ "ballerinaDefinition": HELLO_SOURCE, "swaggerDefinition": PETSTORE_SWAGGER }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(*converter.seen.lock().unwrap(), vec![PETSTORE_SWAGGER.to_string()]);

    Ok(())
}
