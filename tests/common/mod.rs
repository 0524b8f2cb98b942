#![allow(dead_code)]

use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

pub const HELLO_SOURCE: &str = r#"import ballerina.net.http;

@http:configuration {basePath:"/hello"}
service<http> helloService {

    @http:GET {}
    @http:Path {value:"/"}
    resource sayHello (message m) {
        message response = {};
        reply response;
    }

    @http:GET {}
    @http:Path {value:"/{name}"}
    resource greet (message m, @http:PathParam {value:"name"} string name) {
        reply m;
    }
}

@http:configuration {basePath:"/bye"}
service<http> byeService {

    @http:POST {}
    @http:Path {value:"/"}
    resource sayBye (message m) {
        reply m;
    }
}
"#;

pub const PETSTORE_SWAGGER: &str = r#"{
  "swagger": "2.0",
  "info": {"title": "Swagger Petstore", "version": "1.0.0"},
  "basePath": "/v1",
  "paths": {
    "/pets": {
      "get": {"operationId": "listPets", "responses": {"200": {"description": "ok"}}}
    }
  }
}"#;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> Result<TestResponse> {
    let resp: Response = app.clone().oneshot(req).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = body::to_bytes(resp.into_body(), 10_485_760).await?.to_vec();
    Ok(TestResponse { status, headers, body })
}

pub async fn post_json(app: &Router, uri: &str, payload: &Value) -> Result<TestResponse> {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))?;
    send(app, req).await
}
