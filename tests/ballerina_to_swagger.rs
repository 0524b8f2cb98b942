mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};

use common::{post_json, send, HELLO_SOURCE};
use swagger_bridge::create_default_app;

const ENDPOINT: &str = "/service/swagger/ballerina-to-swagger";

#[tokio::test]
async fn converts_first_service_and_echoes_source() -> Result<()> {
    let app = create_default_app();

    let resp = post_json(&app, ENDPOINT, &json!({ "ballerinaDefinition": HELLO_SOURCE })).await?;
    assert_eq!(resp.status, StatusCode::OK, "body: {}", resp.text());
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));

    let body = resp.json()?;
    assert_eq!(body["ballerinaDefinition"], HELLO_SOURCE);

    let swagger_text = body["swaggerDefinition"]
        .as_str()
        .expect("swaggerDefinition must be a string");
    assert!(!swagger_text.is_empty());

    let swagger: Value = serde_json::from_str(swagger_text)?;
    assert_eq!(swagger["swagger"], "2.0");
    assert_eq!(swagger["basePath"], "/hello");
    assert_eq!(swagger["paths"]["/"]["get"]["operationId"], "sayHello");
    assert_eq!(swagger["paths"]["/{name}"]["get"]["parameters"][0]["in"], "path");

    Ok(())
}

#[tokio::test]
async fn service_name_query_selects_service() -> Result<()> {
    let app = create_default_app();

    let resp = post_json(
        &app,
        &format!("{ENDPOINT}?serviceName=byeService"),
        &json!({ "ballerinaDefinition": HELLO_SOURCE }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::OK, "body: {}", resp.text());

    let body = resp.json()?;
    let swagger: Value =
        serde_json::from_str(body["swaggerDefinition"].as_str().unwrap_or_default())?;
    assert_eq!(swagger["basePath"], "/bye");
    assert_eq!(swagger["paths"]["/"]["post"]["operationId"], "sayBye");

    Ok(())
}

#[tokio::test]
async fn unknown_service_name_is_bad_request() -> Result<()> {
    let app = create_default_app();

    let resp = post_json(
        &app,
        &format!("{ENDPOINT}?serviceName=nope"),
        &json!({ "ballerinaDefinition": HELLO_SOURCE }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));

    let body = resp.json()?;
    assert!(body["Error"].as_str().unwrap_or_default().contains("nope"), "{body}");

    Ok(())
}

#[tokio::test]
async fn unparseable_source_is_bad_request() -> Result<()> {
    let app = create_default_app();

    let resp = post_json(
        &app,
        ENDPOINT,
        &json!({ "ballerinaDefinition": "service<http> broken { resource ( }" }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let body = resp.json()?;
    let message = body.get("Error").and_then(Value::as_str).expect("Error key");
    assert!(message.contains("line 1"), "{message}");

    Ok(())
}

#[tokio::test]
async fn missing_source_is_bad_request() -> Result<()> {
    let app = create_default_app();

    let resp = post_json(&app, ENDPOINT, &json!({})).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.json()?.get("Error").is_some());

    Ok(())
}

#[tokio::test]
async fn malformed_json_is_bad_request_with_error_body() -> Result<()> {
    let app = create_default_app();

    let req = Request::builder()
        .method("POST")
        .uri(ENDPOINT)
        .header("content-type", "application/json")
        .body(Body::from(r#"{"ballerinaDefinition": ["not", "a", "string"]}"#))?;
    let resp = send(&app, req).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let message = resp.json()?["Error"].as_str().unwrap_or_default().to_string();
    assert!(message.contains("ballerinaDefinition"), "{message}");

    Ok(())
}

#[tokio::test]
async fn duplicated_service_name_is_json_bad_request() -> Result<()> {
    let app = create_default_app();

    let resp = post_json(
        &app,
        &format!("{ENDPOINT}?serviceName=helloService&serviceName=byeService"),
        &json!({ "ballerinaDefinition": HELLO_SOURCE }),
    )
    .await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));

    let body = resp.json()?;
    let message = body.get("Error").and_then(Value::as_str).expect("Error key");
    assert!(message.contains("serviceName"), "{message}");

    Ok(())
}

#[tokio::test]
async fn deeply_nested_annotation_is_bad_request() -> Result<()> {
    let app = create_default_app();
    let source = format!("@a {{x:{}", "[".repeat(200_000));

    let resp = post_json(&app, ENDPOINT, &json!({ "ballerinaDefinition": source })).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.header("access-control-allow-origin"), Some("*"));

    let message = resp.json()?["Error"].as_str().unwrap_or_default().to_string();
    assert!(message.contains("annotation nesting too deep"), "{message}");

    Ok(())
}
