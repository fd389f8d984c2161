use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::common::error::Result;
use crate::pipeline::catalog::Catalog;

/// Read and shape-check the input catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)?;
    let catalog = Catalog::from_json_str(&content)?;
    debug!(path = %path.display(), categories = catalog.categories().len(), "loaded catalog");
    Ok(catalog)
}

/// Pretty-printed JSON with two-space indent. Non-ASCII text is written as is.
pub fn render_catalog(catalog: &Catalog) -> Result<String> {
    Ok(serde_json::to_string_pretty(&catalog.as_value())?)
}

pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let rendered = render_catalog(catalog)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, rendered)?;
    info!(path = %path.display(), "wrote catalog");
    Ok(())
}
