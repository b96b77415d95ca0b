//! Verification of the rasterizer's output artifacts.

use crate::pipeline::config::{Config, FONT_BASENAME, IMAGE_EXT, METRICS_EXT};

/// Confirms the rasterizer produced both expected artifacts: the
/// glyph-metrics file and the bitmap atlas.
///
/// Both files are checked even if the first is missing, and each absence is
/// reported by name. The tool's exit code is not a trustworthy success
/// signal, so this presence check is mandatory regardless of how the
/// rasterizer exited.
pub fn verify_font_artifacts(config: &Config) -> bool {
    let stem = config.modded_fonts_dir().join(FONT_BASENAME);
    let metrics = stem.with_extension(METRICS_EXT);
    let image = stem.with_extension(IMAGE_EXT);

    let mut ok = true;
    for artifact in [&metrics, &image] {
        if !artifact.exists() {
            log::error!("missing expected output file: {}", artifact.display());
            ok = false;
        }
    }
    ok
}
