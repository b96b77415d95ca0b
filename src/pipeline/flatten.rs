//! Flattening extracted localization files for the rasterizer.
//!
//! The rasterizer consumes a flat directory of text sources. The destination
//! is ensured but never reset: it accumulates across languages by design.
//! Missing candidates are warned, not fatal, since partial localization is an
//! acceptable degraded outcome for a font-atlas build.

use crate::pipeline::config::Config;
use crate::pipeline::error::Result;
use crate::pipeline::extract::localization_files;
use crate::pipeline::workspace;
use std::path::PathBuf;

/// What the flattening pass copied and what it could not find.
#[derive(Debug, Default)]
pub struct CopyReport {
    /// Destination paths of files that were copied.
    pub copied: Vec<PathBuf>,
    /// Source paths that were expected but absent.
    pub missing: Vec<PathBuf>,
}

/// Copies the known localization filenames for `language` from the raw
/// extraction output into the flat rasterizer input directory.
pub async fn flatten(config: &Config, language: &str) -> Result<CopyReport> {
    let dest_dir = config.extracted_txt_dir();
    workspace::ensure_dir(&dest_dir).await?;

    let lang_dir = config.extracted_res_dir().join("lang");
    let mut report = CopyReport::default();

    for name in localization_files(language) {
        let src = lang_dir.join(&name);
        if src.exists() {
            let dest = dest_dir.join(&name);
            workspace::copy_file(&src, &dest).await?;
            log::info!("copied {} -> {}", src.display(), dest.display());
            report.copied.push(dest);
        } else {
            log::warn!("expected extracted file not found: {}", src.display());
            report.missing.push(src);
        }
    }

    Ok(report)
}
