//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI 3 specification for the REST surface to `openapi.json`,
//! so clients can consume the contract without a running server.

use api_lib::web::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let spec_json = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write("openapi.json", &spec_json)?;
    println!("✅ OpenAPI specification generated at openapi.json");
    Ok(())
}
