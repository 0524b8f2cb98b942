use std::fs;

fn main() -> anyhow::Result<()> {
    // Optional first argument overrides the output path.
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/swagger-bridge-openapi.json".to_string());

    let doc = swagger_bridge::docs::build_openapi(8000)?;
    let s = serde_json::to_string_pretty(&doc)?;
    fs::write(&path, s)?;
    println!("wrote {}", path);
    Ok(())
}
