//! Catalog load/save helpers with schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_catalog;
use crate::core::types::Catalog;

pub const CATALOG_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/catalog/v1.schema.json"
));

/// Load and validate a catalog file (schema + invariants).
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    debug!(path = %path.display(), "loading catalog");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    let catalog =
        parse_catalog(&contents).with_context(|| format!("load catalog {}", path.display()))?;
    debug!(
        exercises = catalog.exercises.len(),
        submissions = catalog.submissions.len(),
        resources = catalog.resources.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Parse catalog JSON and validate it against the embedded schema and invariants.
pub fn parse_catalog(contents: &str) -> Result<Catalog> {
    let value: Value = serde_json::from_str(contents).context("parse catalog json")?;
    validate_schema(&value)?;
    let catalog: Catalog = serde_json::from_value(value).context("deserialize catalog")?;
    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        return Err(anyhow!("catalog invariants failed: {}", errors.join("; ")));
    }
    Ok(catalog)
}

/// Write catalog to disk as pretty-printed JSON with a trailing newline.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(catalog).context("serialize catalog")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write catalog {}", path.display()))
}

fn validate_schema(catalog: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(CATALOG_SCHEMA).context("parse catalog schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(catalog) {
        let messages = compiled
            .iter_errors(catalog)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "catalog schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
