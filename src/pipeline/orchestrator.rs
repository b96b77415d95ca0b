//! Pipeline orchestration and stage sequencing.
//!
//! Ties the independent external-tool invocations into one coherent run:
//! prerequisite checks, extraction, staging, font generation, verification,
//! and repack, or the injection variant. Any stage failure moves directly
//! to a terminal state carrying a stage-specific exit code; no stage is ever
//! retried. The only branch points besides failure are `extract_only`
//! (short-circuits after staging) and `continue_after_inject` (re-enters the
//! forward pipeline after a successful injection).

use crate::pipeline::config::Config;
use crate::pipeline::runner::ToolRunner;
use crate::pipeline::{extract, flatten, fontgen, inject, prereq, repack, verify};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;

/// Stage-addressed process exit codes, distinct per failure site so
/// operators can diagnose a run from the exit code alone.
pub mod exit_code {
    /// Pipeline completed.
    pub const SUCCESS: i32 = 0;
    /// Injection failed.
    pub const INJECT_FAILED: i32 = 1;
    /// Extraction/injection tool missing.
    pub const MISSING_EXTRACTOR: i32 = 2;
    /// Source archive missing.
    pub const MISSING_ARCHIVE: i32 = 3;
    /// Extraction failed.
    pub const EXTRACT_FAILED: i32 = 4;
    /// Font tools or typefaces missing.
    pub const MISSING_FONT_TOOLS: i32 = 5;
    /// No typeface files to process.
    pub const NO_TYPEFACES: i32 = 6;
    /// Rasterizer failed or its artifacts did not verify.
    pub const FONT_GENERATION_FAILED: i32 = 7;
    /// Repack into the assets archive failed.
    pub const REPACK_FAILED: i32 = 8;
}

/// The stages of one pipeline run, in program order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Inverse path: reimport edited XML into the source archive.
    Inject,
    /// Extraction-tool prerequisite check.
    PrereqExtract,
    /// Localization extraction from the source archive.
    Extract,
    /// Flattening extracted files for the rasterizer.
    Flatten,
    /// Font-tool and typeface prerequisite check.
    PrereqFont,
    /// Font atlas generation.
    Generate,
    /// Artifact verification.
    Verify,
    /// Repack into the assets archive.
    Repack,
}

impl Stage {
    /// Human-readable stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Inject => "inject",
            Stage::PrereqExtract => "prereq-extract",
            Stage::Extract => "extract",
            Stage::Flatten => "flatten",
            Stage::PrereqFont => "prereq-font",
            Stage::Generate => "generate",
            Stage::Verify => "verify",
            Stage::Repack => "repack",
        }
    }
}

/// Progress notifications emitted while a run executes, consumed by a
/// presentation boundary (see [`crate::pipeline::worker`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A stage is about to execute.
    StageStarted {
        /// The stage that started.
        stage: Stage,
    },
    /// The run finished with the given process exit code.
    Finished {
        /// Terminal exit code of the run.
        exit_code: i32,
    },
}

/// Per-stage result consumed by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage completed.
    Success,
    /// The stage degraded but the workflow may continue.
    SoftFailure,
    /// The workflow halts with this exit code.
    HardFailure(i32),
}

/// Caller-facing options for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Language token selecting which localized text to operate on.
    pub language: String,
    /// Path to the source resource archive.
    pub archive: PathBuf,
    /// Font size passed to the rasterizer.
    pub font_size: u32,
    /// Typeface selector passed to the rasterizer.
    pub typeface: String,
    /// Stop after extraction and staging.
    pub extract_only: bool,
    /// Inverse path: directory of edited XML to reimport first.
    pub inject_xml_dir: Option<PathBuf>,
    /// After a successful injection, continue into the forward pipeline
    /// instead of exiting.
    pub continue_after_inject: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            language: "zh".to_string(),
            archive: PathBuf::from("res.pak"),
            font_size: 48,
            typeface: "ChironHeiHK-Text-R-400".to_string(),
            extract_only: false,
            inject_xml_dir: None,
            continue_after_inject: false,
        }
    }
}

/// One pipeline invocation: configuration, a tool runner, and an optional
/// event channel toward a presentation boundary.
///
/// Stages execute in strict program order; a later stage never begins before
/// the prior stage's subprocess has fully exited and its output has been
/// checked. Running two pipelines against the same workspace root
/// concurrently is a precondition violation and is not guarded against.
pub struct Pipeline<R> {
    config: Config,
    runner: R,
    events: Option<UnboundedSender<PipelineEvent>>,
}

impl<R: ToolRunner> Pipeline<R> {
    /// Creates a pipeline over the given configuration and tool runner.
    pub fn new(config: Config, runner: R) -> Self {
        Self {
            config,
            runner,
            events: None,
        }
    }

    /// Attaches a progress-event channel.
    pub fn with_events(mut self, events: UnboundedSender<PipelineEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns the pipeline configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Executes one full run and returns the process exit code.
    pub async fn run(&self, opts: &RunOptions) -> i32 {
        let code = self.run_stages(opts).await;
        self.emit(PipelineEvent::Finished { exit_code: code });
        code
    }

    async fn run_stages(&self, opts: &RunOptions) -> i32 {
        if let Some(xml_dir) = &opts.inject_xml_dir {
            self.start(Stage::Inject);
            match self.inject_stage(opts, xml_dir).await {
                StageOutcome::Success => {
                    log::info!("injection complete");
                    if !opts.continue_after_inject {
                        return exit_code::SUCCESS;
                    }
                }
                StageOutcome::HardFailure(code) => return code,
                StageOutcome::SoftFailure => {}
            }
        }

        self.start(Stage::PrereqExtract);
        if let StageOutcome::HardFailure(code) = self.prereq_extract_stage(opts) {
            return code;
        }

        self.start(Stage::Extract);
        if let StageOutcome::HardFailure(code) = self.extract_stage(opts).await {
            return code;
        }

        self.start(Stage::Flatten);
        match self.flatten_stage(opts).await {
            StageOutcome::HardFailure(code) => return code,
            StageOutcome::SoftFailure => {
                log::warn!("continuing with a partial localization set");
            }
            StageOutcome::Success => {}
        }

        if opts.extract_only {
            log::info!("extraction complete, stopping as requested");
            return exit_code::SUCCESS;
        }

        self.start(Stage::PrereqFont);
        if let StageOutcome::HardFailure(code) = self.prereq_font_stage() {
            return code;
        }

        self.start(Stage::Generate);
        if let StageOutcome::HardFailure(code) = self.generate_stage(opts).await {
            return code;
        }

        self.start(Stage::Verify);
        if let StageOutcome::HardFailure(code) = self.verify_stage() {
            return code;
        }

        self.start(Stage::Repack);
        if let StageOutcome::HardFailure(code) = self.repack_stage().await {
            return code;
        }

        log::info!("done");
        exit_code::SUCCESS
    }

    async fn inject_stage(&self, opts: &RunOptions, xml_dir: &Path) -> StageOutcome {
        log::info!(
            "injecting XML from {} into {}",
            xml_dir.display(),
            opts.archive.display()
        );
        if !prereq::check_prereqs(&self.config, true, false).is_empty() {
            log::error!("extraction tool is missing");
            return StageOutcome::HardFailure(exit_code::MISSING_EXTRACTOR);
        }
        match inject::inject(
            &self.config,
            &self.runner,
            &opts.archive,
            xml_dir,
            &opts.language,
        )
        .await
        {
            Ok(true) => StageOutcome::Success,
            Ok(false) => {
                log::error!("injection failed");
                StageOutcome::HardFailure(exit_code::INJECT_FAILED)
            }
            Err(e) => {
                log::error!("injection failed: {e}");
                StageOutcome::HardFailure(exit_code::INJECT_FAILED)
            }
        }
    }

    fn prereq_extract_stage(&self, opts: &RunOptions) -> StageOutcome {
        if !prereq::check_prereqs(&self.config, true, false).is_empty() {
            log::error!(
                "extraction tool is missing: place it at {}",
                self.config.extractor_exe().display()
            );
            return StageOutcome::HardFailure(exit_code::MISSING_EXTRACTOR);
        }
        if !opts.archive.exists() {
            log::error!("archive not found: {}", opts.archive.display());
            return StageOutcome::HardFailure(exit_code::MISSING_ARCHIVE);
        }
        StageOutcome::Success
    }

    async fn extract_stage(&self, opts: &RunOptions) -> StageOutcome {
        log::info!("extracting localization files...");
        match extract::extract(
            &self.config,
            &self.runner,
            &opts.language,
            &opts.archive,
            false,
        )
        .await
        {
            Ok(true) => StageOutcome::Success,
            Ok(false) => {
                log::error!("extraction failed");
                StageOutcome::HardFailure(exit_code::EXTRACT_FAILED)
            }
            Err(e) => {
                log::error!("extraction failed: {e}");
                StageOutcome::HardFailure(exit_code::EXTRACT_FAILED)
            }
        }
    }

    async fn flatten_stage(&self, opts: &RunOptions) -> StageOutcome {
        log::info!("copying extracted xml into the rasterizer input folder...");
        match flatten::flatten(&self.config, &opts.language).await {
            Ok(report) if report.missing.is_empty() => StageOutcome::Success,
            Ok(_) => StageOutcome::SoftFailure,
            Err(e) => {
                log::error!("staging failed: {e}");
                StageOutcome::HardFailure(exit_code::EXTRACT_FAILED)
            }
        }
    }

    fn prereq_font_stage(&self) -> StageOutcome {
        if !prereq::check_prereqs(&self.config, false, true).is_empty() {
            log::error!(
                "font tools are missing: ensure {}, {} and {} exist",
                self.config.fontgen_exe().display(),
                self.config.rasterizer_exe().display(),
                self.config.typeface_dir().display()
            );
            return StageOutcome::HardFailure(exit_code::MISSING_FONT_TOOLS);
        }
        if prereq::find_typefaces(&self.config.typeface_dir()).is_empty() {
            log::error!("no typeface files to process");
            return StageOutcome::HardFailure(exit_code::NO_TYPEFACES);
        }
        StageOutcome::Success
    }

    async fn generate_stage(&self, opts: &RunOptions) -> StageOutcome {
        log::info!(
            "generating font atlas with {} at size {}...",
            opts.typeface,
            opts.font_size
        );
        match fontgen::generate(&self.config, &self.runner, &opts.typeface, opts.font_size).await {
            Ok(output) if output.success() => StageOutcome::Success,
            Ok(output) => {
                log::error!("rasterizer exited with code {:?}", output.code);
                StageOutcome::HardFailure(exit_code::FONT_GENERATION_FAILED)
            }
            Err(e) => {
                log::error!("rasterizer invocation failed: {e}");
                StageOutcome::HardFailure(exit_code::FONT_GENERATION_FAILED)
            }
        }
    }

    fn verify_stage(&self) -> StageOutcome {
        if verify::verify_font_artifacts(&self.config) {
            StageOutcome::Success
        } else {
            log::error!("font artifact verification failed");
            StageOutcome::HardFailure(exit_code::FONT_GENERATION_FAILED)
        }
    }

    async fn repack_stage(&self) -> StageOutcome {
        log::info!("repacking modified assets into the assets archive...");
        match repack::repack_font_assets(&self.config, &self.runner).await {
            Ok(true) => StageOutcome::Success,
            Ok(false) => {
                log::error!("repack failed");
                StageOutcome::HardFailure(exit_code::REPACK_FAILED)
            }
            Err(e) => {
                log::error!("repack failed: {e}");
                StageOutcome::HardFailure(exit_code::REPACK_FAILED)
            }
        }
    }

    fn start(&self, stage: Stage) {
        log::info!("stage: {}", stage.name());
        self.emit(PipelineEvent::StageStarted { stage });
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(events) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = events.send(event);
        }
    }
}
