use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::model::PricingDocument;

/// Serialize the document and replace the artifact atomically: the JSON is
/// written to a temp file in the target directory, then renamed over the
/// canonical path. A crash mid-write leaves the previous artifact intact.
pub fn write_document(doc: &PricingDocument, path: &Path) -> Result<PathBuf> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let json = serde_json::to_string_pretty(doc).context("Failed to serialize document")?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .context("Failed to write document")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    info!(
        "Wrote {} instance types ({} entries) to {}",
        doc.instance_types.len(),
        doc.entry_count(),
        path.display()
    );
    Ok(path.to_path_buf())
}
