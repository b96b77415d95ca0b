//! Prerequisite verification for external tools and typefaces.
//!
//! Every missing artifact is reported, not just the first, so operators see
//! the complete remediation list in one run.

use crate::pipeline::config::Config;
use std::path::{Path, PathBuf};

/// Returns all `*.ttf` files in the given directory, sorted by path.
pub fn find_typefaces(dir: &Path) -> Vec<PathBuf> {
    let pattern = dir.join("*.ttf");
    let Some(pattern) = pattern.to_str() else {
        return Vec::new();
    };
    match glob::glob(pattern) {
        Ok(paths) => {
            let mut typefaces: Vec<PathBuf> = paths.flatten().collect();
            typefaces.sort();
            typefaces
        }
        Err(_) => Vec::new(),
    }
}

/// Verifies that the required executables and input assets exist.
///
/// When `require_extractor`, the extraction/injection tool must be at its
/// fixed relative path. When `require_font_tools`, the rasterizer and the
/// font-metadata generator must exist and at least one typeface file must be
/// present. Returns a description of every missing artifact; empty means all
/// prerequisites are satisfied. Each missing item is also logged.
pub fn check_prereqs(
    config: &Config,
    require_extractor: bool,
    require_font_tools: bool,
) -> Vec<String> {
    let mut missing = Vec::new();

    if require_extractor {
        check_file(&config.extractor_exe(), &mut missing);
    }

    if require_font_tools {
        check_file(&config.fontgen_exe(), &mut missing);
        check_file(&config.rasterizer_exe(), &mut missing);

        let typeface_dir = config.typeface_dir();
        if find_typefaces(&typeface_dir).is_empty() {
            let item = format!("no typeface files (*.ttf) in {}", typeface_dir.display());
            log::warn!("{item}");
            missing.push(item);
        }
    }

    missing
}

fn check_file(path: &Path, missing: &mut Vec<String>) {
    if !path.exists() {
        let item = format!("missing file: {}", path.display());
        log::warn!("{item}");
        missing.push(item);
    }
}
