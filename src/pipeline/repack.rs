//! Repacking modded font assets into the destination assets archive.

use crate::pipeline::config::Config;
use crate::pipeline::error::Result;
use crate::pipeline::runner::ToolRunner;

/// Folds the modded-assets tree back into the destination assets archive
/// using the archive tool's reimport mode.
///
/// Returns `Ok(false)` on any of: missing tool or script, non-zero tool exit
/// code, or the destination archive being absent after the run. This is the
/// terminal stage of the forward pipeline.
pub async fn repack_font_assets<R: ToolRunner>(config: &Config, runner: &R) -> Result<bool> {
    let exe = config.repacker_exe();
    let script = config.repack_script();

    let mut ok = true;
    for required in [&exe, &script] {
        if !required.exists() {
            log::error!("missing file: {}", required.display());
            ok = false;
        }
    }
    if !ok {
        return Ok(false);
    }

    let assets_archive = config.assets_archive();
    let args = vec![
        "-w".to_string(),
        "-r".to_string(),
        "-r".to_string(),
        script.display().to_string(),
        assets_archive.display().to_string(),
        config.modded_assets_dir().display().to_string(),
    ];

    let output = runner.run(&exe, &args).await?;
    if !output.success() {
        log::error!("repack tool exited with code {:?}", output.code);
        log_tool_output(&output.stdout, &output.stderr);
        return Ok(false);
    }

    if !assets_archive.exists() {
        log::error!("expected assets archive not found: {}", assets_archive.display());
        return Ok(false);
    }

    log::info!("repacked assets into {}", assets_archive.display());
    Ok(true)
}

fn log_tool_output(stdout: &str, stderr: &str) {
    if !stdout.is_empty() {
        log::info!("{}", stdout.trim_end());
    }
    if !stderr.is_empty() {
        log::info!("{}", stderr.trim_end());
    }
}
