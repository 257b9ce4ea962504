//! Schema documents on disk
//!
//! Schemas are JSON or YAML documents with camelCase keys:
//!
//! ```yaml
//! identifierColumn: id
//! columns:
//!   - name: id
//!     type: integer
//!     unique: true
//!   - name: age
//!     type: integer
//!     required: true
//!     min: 18
//!     max: 100
//! ```

use std::path::Path;

use tracing::info;

use super::error::SchemaLoadError;
use super::registry::SchemaRegistry;
use super::types::Schema;

/// Parse a schema from a JSON document and check it for consistency
pub fn from_json_str(source: &str) -> Result<Schema, SchemaLoadError> {
    let schema: Schema = serde_json::from_str(source)?;
    SchemaRegistry::new(&schema)?;
    Ok(schema)
}

/// Parse a schema from a YAML document and check it for consistency
pub fn from_yaml_str(source: &str) -> Result<Schema, SchemaLoadError> {
    let schema: Schema = serde_yaml::from_str(source)?;
    SchemaRegistry::new(&schema)?;
    Ok(schema)
}

/// Load a schema file, choosing the format by extension (`json`, `yaml`, `yml`)
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema, SchemaLoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let parse: fn(&str) -> Result<Schema, SchemaLoadError> = match extension.as_deref() {
        Some("json") => from_json_str,
        Some("yaml") | Some("yml") => from_yaml_str,
        _ => return Err(SchemaLoadError::UnsupportedFormat(path.to_path_buf())),
    };

    let source = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let schema = parse(&source)?;
    info!(path = %path.display(), columns = schema.len(), "Loaded schema");
    Ok(schema)
}
