//! Font atlas generation via the external rasterizer.

use crate::pipeline::config::{Config, FONT_BASENAME};
use crate::pipeline::error::Result;
use crate::pipeline::runner::{ToolOutput, ToolRunner};
use crate::pipeline::workspace;

/// Invokes the rasterizer against the flattened text sources.
///
/// Returns the tool's raw output without interpretation: a zero exit code
/// from the rasterizer does not guarantee artifact presence, so the
/// verification gate in [`crate::pipeline::verify`] is the sole correctness
/// check for this stage.
pub async fn generate<R: ToolRunner>(
    config: &Config,
    runner: &R,
    typeface: &str,
    font_size: u32,
) -> Result<ToolOutput> {
    let output_dir = config.modded_fonts_dir();
    workspace::ensure_dir(&output_dir).await?;

    let args = vec![
        "-tf".to_string(),
        config.extracted_txt_dir().display().to_string(),
        "-fs".to_string(),
        font_size.to_string(),
        "-ttf".to_string(),
        typeface.to_string(),
        "-o".to_string(),
        FONT_BASENAME.to_string(),
        "-ff".to_string(),
        output_dir.display().to_string(),
    ];

    let output = runner.run(&config.rasterizer_exe(), &args).await?;
    if !output.stdout.is_empty() {
        log::info!("{}", output.stdout.trim_end());
    }
    if !output.stderr.is_empty() {
        log::info!("{}", output.stderr.trim_end());
    }
    Ok(output)
}
