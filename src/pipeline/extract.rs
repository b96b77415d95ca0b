//! Localization extraction from the source archive.
//!
//! Builds a filter expression selecting exactly the two known localization
//! files for a language and invokes the extraction tool with it. In list
//! mode no state is mutated; the tool is asked to list matches and the
//! expected files are then checked independently under the standard output
//! directory.

use crate::pipeline::config::Config;
use crate::pipeline::error::{Error, Result};
use crate::pipeline::runner::ToolRunner;
use crate::pipeline::workspace;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static LANGUAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9_-]+$").expect("valid token pattern"));

/// Whether a language token is safe to place into a tool filter argument.
pub fn is_valid_language(language: &str) -> bool {
    LANGUAGE_TOKEN.is_match(language)
}

/// Rejects tokens that must not flow into a subprocess argument.
pub fn validate_language(language: &str) -> Result<()> {
    if is_valid_language(language) {
        Ok(())
    } else {
        Err(Error::InvalidLanguage {
            token: language.to_string(),
        })
    }
}

/// The two known localization filenames for a language.
pub fn localization_files(language: &str) -> [String; 2] {
    [
        format!("texts_{language}.xml"),
        format!("export_{language}.xml"),
    ]
}

/// Archive-internal paths of the localization files.
pub fn lang_paths(language: &str) -> [String; 2] {
    localization_files(language).map(|name| format!("lang/{name}"))
}

/// Filter expression the extraction tool expects: comma-separated patterns,
/// each prefixed with the `{}` wildcard.
fn filter_expression(paths: &[String]) -> String {
    paths
        .iter()
        .map(|p| format!("{{}}{p}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Extracts (or, with `list_only`, lists) the localization files for a
/// language from the source archive.
///
/// Not `list_only`: the raw-output directory is reset, the tool is invoked
/// against it, and its exit code is logged but not treated as definitive;
/// the caller checks for resulting files separately. Returns `Ok(true)`.
///
/// `list_only`: the tool runs without an output directory and this function
/// then checks whether both expected files are present at their addressed
/// paths under the standard output directory, returning whether all were
/// found.
pub async fn extract<R: ToolRunner>(
    config: &Config,
    runner: &R,
    language: &str,
    archive: &Path,
    list_only: bool,
) -> Result<bool> {
    validate_language(language)?;

    let paths = lang_paths(language);
    let filter = filter_expression(&paths);
    let exe = config.extractor_exe();
    let script = config.extract_script();
    let output_dir = config.extracted_res_dir();

    if !list_only {
        workspace::reset_dir(&output_dir).await?;
    }

    let mut args: Vec<String> = Vec::new();
    if list_only {
        args.push("-l".into());
    }
    args.push("-f".into());
    args.push(filter);
    args.push(script.display().to_string());
    args.push(archive.display().to_string());
    if !list_only {
        args.push(output_dir.display().to_string());
    }

    let output = runner.run(&exe, &args).await?;
    if !output.stdout.is_empty() {
        log::info!("{}", output.stdout.trim_end());
    }
    if !output.stderr.is_empty() {
        log::info!("{}", output.stderr.trim_end());
    }

    if !list_only {
        log::info!("extraction tool exited with code {:?}", output.code);
        return Ok(true);
    }

    // List-mode verification: both files must be addressable on disk.
    let mut all_present = true;
    for path in &paths {
        let candidate = output_dir.join(path);
        if !candidate.exists() {
            log::warn!("expected localization file not found: {}", candidate.display());
            all_present = false;
        }
    }
    if all_present {
        log::info!("all localization files present for language {language}");
    }
    Ok(all_present)
}
