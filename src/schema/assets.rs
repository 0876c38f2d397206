//! Files embedded in the binary: the catalog JSON Schema and the sample catalog

use rust_embed::Embed;

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

/// File name of the catalog JSON Schema
pub const CATALOG_SCHEMA: &str = "catalog.schema.json";

/// File name of the sample catalog
pub const SAMPLE_CATALOG: &str = "catalog.yaml";

/// Get an embedded file as text
pub fn get(name: &str) -> Option<String> {
    Assets::get(name).map(|file| String::from_utf8_lossy(&file.data).into_owned())
}

/// The catalog JSON Schema
pub fn catalog_schema() -> Option<String> {
    get(CATALOG_SCHEMA)
}

/// The sample catalog shipped with the binary (YAML)
pub fn sample_catalog() -> Option<String> {
    get(SAMPLE_CATALOG)
}
