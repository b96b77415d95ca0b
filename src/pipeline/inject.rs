//! Reimporting edited translation XML into the source archive.
//!
//! The inverse path: caller-supplied XML is staged into a tree mirroring the
//! archive's internal `lang/` layout (the injection tool matches by
//! internal path, not by flat filename) and the tool is invoked in reimport
//! mode against the original archive.

use crate::pipeline::config::Config;
use crate::pipeline::error::Result;
use crate::pipeline::extract::{localization_files, validate_language};
use crate::pipeline::runner::ToolRunner;
use crate::pipeline::workspace;
use std::path::Path;

/// Stages whichever of the two known localization files exist in
/// `xml_source_dir` and reimports them into `archive`.
///
/// Unlike extraction's per-file tolerance, injection fails when *neither*
/// expected file is found: there must be at least one real input to justify
/// invoking the tool at all.
pub async fn inject<R: ToolRunner>(
    config: &Config,
    runner: &R,
    archive: &Path,
    xml_source_dir: &Path,
    language: &str,
) -> Result<bool> {
    validate_language(language)?;

    let exe = config.extractor_exe();
    let script = config.extract_script();

    let mut ok = true;
    if !archive.exists() {
        log::error!("archive not found: {}", archive.display());
        ok = false;
    }
    if !xml_source_dir.exists() {
        log::error!("XML source directory not found: {}", xml_source_dir.display());
        ok = false;
    }
    for required in [&exe, &script] {
        if !required.exists() {
            log::error!("missing file: {}", required.display());
            ok = false;
        }
    }
    if !ok {
        return Ok(false);
    }

    // Stage into the archive-internal layout.
    let staging_dir = config.inject_staging_dir();
    let staging_lang_dir = staging_dir.join("lang");
    workspace::reset_dir(&staging_dir).await?;
    workspace::ensure_dir(&staging_lang_dir).await?;

    let mut found_any = false;
    for name in localization_files(language) {
        let src = xml_source_dir.join(&name);
        if src.exists() {
            workspace::copy_file(&src, &staging_lang_dir.join(&name)).await?;
            log::info!("staged for injection: {name}");
            found_any = true;
        } else {
            log::warn!("{} not found in {}", name, xml_source_dir.display());
        }
    }

    if !found_any {
        log::error!("no matching XML files found to inject");
        return Ok(false);
    }

    let args = vec![
        "-w".to_string(),
        "-r".to_string(),
        "-r".to_string(),
        script.display().to_string(),
        archive.display().to_string(),
        staging_dir.display().to_string(),
    ];

    let output = runner.run(&exe, &args).await?;
    if !output.success() {
        log::error!("reimport failed with exit code {:?}", output.code);
        if !output.stdout.is_empty() {
            log::info!("{}", output.stdout.trim_end());
        }
        if !output.stderr.is_empty() {
            log::info!("{}", output.stderr.trim_end());
        }
        return Ok(false);
    }

    log::info!("injection succeeded");
    Ok(true)
}
