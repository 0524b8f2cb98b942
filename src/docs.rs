use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Map, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::container::{ErrorBody, ServiceDefinitionContainer};
use crate::routes;

const CONVERSION_PATHS: [&str; 2] = [
	"/service/swagger/ballerina-to-swagger",
	"/service/swagger/swagger-to-ballerina",
];

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::swagger::convert_to_swagger,
		routes::swagger::convert_to_ballerina,
		routes::health::health
	),
	components(
		schemas(
			ServiceDefinitionContainer,
			ErrorBody,
			routes::health::HealthResponse
		)
	),
	tags(
		(name = "Swagger", description = "Conversion between Ballerina services and Swagger definitions"),
		(name = "Health", description = "Liveness probe")
	)
)]
pub struct ApiDoc;

pub fn build_openapi(port: u16) -> anyhow::Result<utoipa::openapi::OpenApi> {
	let mut doc = serde_json::to_value(&ApiDoc::openapi())?;

	ensure_preflight_operations(&mut doc);
	add_examples(&mut doc);
	ensure_servers(&mut doc, port);

	Ok(serde_json::from_value(doc)?)
}

pub fn swagger_routes(doc: utoipa::openapi::OpenApi) -> anyhow::Result<Router> {
	let swagger_config =
		utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"]).try_it_out_enabled(true);

	let doc_json = Arc::new(serde_json::to_value(&doc)?);

	let json_route = {
		let doc_json = Arc::clone(&doc_json);
		get(move || {
			let doc_json = Arc::clone(&doc_json);
			async move { Json((*doc_json).clone()) }
		})
	};

	Ok(Router::new()
		.route("/api-docs/openapi.json", json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config)))
}

/// Only the raw document, for deployments with Swagger UI disabled.
pub fn openapi_json_route(doc: utoipa::openapi::OpenApi) -> anyhow::Result<Router> {
	let doc_json = Arc::new(serde_json::to_value(&doc)?);
	Ok(Router::new().route(
		"/api-docs/openapi.json",
		get(move || {
			let doc_json = Arc::clone(&doc_json);
			async move { Json((*doc_json).clone()) }
		}),
	))
}

// One handler serves OPTIONS on both conversion paths, which a single
// `#[utoipa::path]` cannot express, so those operations are merged in here.
fn ensure_preflight_operations(doc: &mut Value) {
	let Some(root) = doc.as_object_mut() else {
		return;
	};
	let paths = root
		.entry("paths")
		.or_insert_with(|| Value::Object(Map::new()));

	for path in CONVERSION_PATHS {
		let addition = json!({
			"options": {
				"tags": ["Swagger"],
				"summary": "CORS pre-flight",
				"responses": {
					"200": {
						"description": "Allowed origin, headers and methods",
						"headers": {
							"Access-Control-Allow-Origin": {"schema": {"type": "string"}, "description": "*"},
							"Access-Control-Allow-Headers": {"schema": {"type": "string"}, "description": "content-type"},
							"Access-Control-Allow-Methods": {"schema": {"type": "string"}, "description": "OPTIONS, POST"}
						}
					}
				}
			}
		});

		match paths.get_mut(path) {
			Some(existing) => merge_values(existing, &addition),
			None => {
				if let Some(paths) = paths.as_object_mut() {
					paths.insert(path.to_string(), addition);
				}
			}
		}
	}
}

fn add_examples(doc: &mut Value) {
	let examples = [
		(
			"/service/swagger/ballerina-to-swagger",
			json!({
				"ballerinaDefinition": "import ballerina.net.http;\n\n@http:configuration {basePath:\"/hello\"}\nservice<http> helloService {\n    @http:GET {}\n    @http:Path {value:\"/\"}\n    resource sayHello (message m) {\n        reply m;\n    }\n}\n"
			}),
		),
		(
			"/service/swagger/swagger-to-ballerina",
			json!({
				"ballerinaDefinition": "service<http> helloService { }",
				"swaggerDefinition": "{\"swagger\": \"2.0\", \"info\": {\"title\": \"helloService\", \"version\": \"1.0.0\"}, \"paths\": {}}"
			}),
		),
	];

	for (path, example) in examples {
		let pointer = format!(
			"/paths/{}/post/requestBody/content/application~1json",
			path.replace('~', "~0").replace('/', "~1")
		);
		if let Some(media) = doc.pointer_mut(&pointer).and_then(Value::as_object_mut) {
			media.entry("example").or_insert(example);
		}
	}
}

fn ensure_servers(doc: &mut Value, port: u16) {
	let server_url = format!("http://localhost:{}", port);

	match doc.get_mut("servers") {
		Some(Value::Array(arr)) => {
			let has = arr.iter().any(|v| v.get("url").and_then(Value::as_str) == Some(server_url.as_str()));
			if !has {
				arr.push(json!({ "url": server_url }));
			}
		}
		_ => {
			doc["servers"] = json!([{ "url": server_url }]);
		}
	}
}

fn merge_values(target: &mut Value, addition: &Value) {
	match (target, addition) {
		(Value::Object(existing), Value::Object(extra)) => {
			for (key, value) in extra {
				match existing.get_mut(key) {
					Some(current) => merge_values(current, value),
					None => {
						existing.insert(key.clone(), value.clone());
					}
				}
			}
		}
		(Value::Array(existing), Value::Array(extra)) => {
			for item in extra {
				if !existing.contains(item) {
					existing.push(item.clone());
				}
			}
		}
		// keep the generated value for primitives and mismatched types
		_ => {}
	}
}
