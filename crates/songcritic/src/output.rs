//! Writing rendered critiques and request previews.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use songcritic_critique::RenderedCritique;
use songcritic_service::{CritiqueRequest, Part};

pub const DOCUMENT_FILE_NAME: &str = "document.html";
pub const SUMMARY_FILE_NAME: &str = "summary.html";

/// Write both views into `out_dir`, returning the paths written.
///
/// A summary left over from an earlier run is removed when the new
/// critique has none.
pub fn write_views(rendered: &RenderedCritique, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let document_path = out_dir.join(DOCUMENT_FILE_NAME);
    std::fs::write(&document_path, &rendered.document)
        .with_context(|| format!("Failed to write {}", document_path.display()))?;
    let mut written = vec![document_path];

    let summary_path = out_dir.join(SUMMARY_FILE_NAME);
    match &rendered.summary {
        Some(summary) => {
            std::fs::write(&summary_path, summary.to_html())
                .with_context(|| format!("Failed to write {}", summary_path.display()))?;
            written.push(summary_path);
        }
        None if summary_path.exists() => {
            std::fs::remove_file(&summary_path)
                .with_context(|| format!("Failed to remove {}", summary_path.display()))?;
        }
        None => {}
    }

    Ok(written)
}

/// Copy of the request with inline media replaced by a size marker
pub fn redact_media(request: &CritiqueRequest) -> CritiqueRequest {
    let mut preview = request.clone();
    for part in &mut preview.contents.parts {
        if let Part::InlineMedia { inline_data } = part {
            inline_data.data = format!("<{} base64 chars>", inline_data.data.len());
        }
    }
    preview
}
