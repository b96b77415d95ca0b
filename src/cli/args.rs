//! Command line argument parsing and validation.

use crate::pipeline::RunOptions;
use crate::pipeline::extract::is_valid_language;
use clap::Parser;
use std::path::PathBuf;

/// Localization font repack pipeline
#[derive(Parser, Debug)]
#[command(
    name = "fontpak",
    version,
    about = "Localization font repack pipeline for packed game resource archives",
    long_about = "Extracts localized text from a packed resource archive, rasterizes it into a
bitmap font atlas, and repacks the modified font assets into the assets archive.
An inverse mode reimports edited translation XML into the source archive.

Run from the directory containing _tools_/, _script_/ and the archives so the
fixed relative tool layout resolves.

Usage:
  fontpak --language zh --archive res.pak --font-size 48
  fontpak --language zh --extract-only
  fontpak --inject-xml ./edited-xml --continue-after-inject

Exit codes are stage-addressed: each failing stage has its own non-zero code."
)]
pub struct Args {
    /// Language token selecting which localized text to extract or inject
    #[arg(short, long, value_name = "LANG", default_value = "zh")]
    pub language: String,

    /// Path to the source resource archive
    #[arg(long, value_name = "PATH", default_value = "res.pak")]
    pub archive: PathBuf,

    /// Font size passed to the rasterizer
    #[arg(long, value_name = "SIZE", default_value_t = 48)]
    pub font_size: u32,

    /// Typeface selector passed to the rasterizer
    #[arg(long, value_name = "NAME", default_value = "ChironHeiHK-Text-R-400")]
    pub typeface: String,

    /// Only extract and stage localization files, then exit
    #[arg(long)]
    pub extract_only: bool,

    /// Directory of edited XML files to reimport into the source archive
    #[arg(long, value_name = "DIR")]
    pub inject_xml: Option<PathBuf>,

    /// After a successful injection, continue with the full repack flow
    #[arg(long)]
    pub continue_after_inject: bool,

    /// Optional configuration file overriding the tool and workspace roots
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_language(&self.language) {
            return Err(format!(
                "Invalid language token: {:?}. Only letters, digits, '_' and '-' are allowed",
                self.language
            ));
        }

        if self.font_size == 0 {
            return Err("Font size must be greater than zero".to_string());
        }

        if self.continue_after_inject && self.inject_xml.is_none() {
            return Err(
                "--continue-after-inject requires --inject-xml".to_string(),
            );
        }

        Ok(())
    }

    /// Pipeline run options derived from the arguments
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            language: self.language.clone(),
            archive: self.archive.clone(),
            font_size: self.font_size,
            typeface: self.typeface.clone(),
            extract_only: self.extract_only,
            inject_xml_dir: self.inject_xml.clone(),
            continue_after_inject: self.continue_after_inject,
        }
    }
}
