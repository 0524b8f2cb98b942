use serde_json::Value;

#[test]
fn openapi_documents_conversion_endpoints() -> anyhow::Result<()> {
    // Build the OpenAPI document the same way the server does
    let doc = swagger_bridge::docs::build_openapi(8000)?;
    let v = serde_json::to_value(&doc)?;

    let paths = v.get("paths").and_then(Value::as_object).expect("paths must exist");
    for path in [
        "/service/swagger/ballerina-to-swagger",
        "/service/swagger/swagger-to-ballerina",
    ] {
        let item = paths.get(path).unwrap_or_else(|| panic!("missing path {path}"));
        assert!(item.get("post").is_some(), "{path} missing post");
        assert!(item.get("options").is_some(), "{path} missing options");
    }
    assert!(paths.contains_key("/api/health"));

    let props = v
        .pointer("/components/schemas/ServiceDefinitionContainer/properties")
        .and_then(Value::as_object)
        .expect("container schema must exist");
    assert!(props.contains_key("ballerinaDefinition"));
    assert!(props.contains_key("swaggerDefinition"));

    let example = v.pointer(
        "/paths/~1service~1swagger~1ballerina-to-swagger/post/requestBody/content/application~1json/example",
    );
    assert!(example.is_some(), "request example missing");

    assert_eq!(v.pointer("/servers/0/url").and_then(Value::as_str), Some("http://localhost:8000"));

    Ok(())
}
