//! The font repack pipeline.
//!
//! # Overview
//!
//! The pipeline automates a multi-stage asset-localization workflow for a
//! packaged game resource archive:
//!
//! 1. Verify the required external tools exist
//! 2. Extract localization files from the source archive
//! 3. Flatten the extracted XML into the rasterizer input folder
//! 4. Invoke the rasterizer to produce a bitmap font atlas
//! 5. Verify the atlas artifacts and repack them into the assets archive
//!
//! An inverse path stages edited translation XML and reimports it into the
//! source archive. Both archive formats and the rasterization algorithm
//! belong to external black-box tools invoked as subprocesses through the
//! [`runner::ToolRunner`] seam.
//!
//! # Module Organization
//!
//! - [`config`] - Tool, script, and workspace locations
//! - [`workspace`] - Staging-directory lifecycle
//! - [`prereq`] - Prerequisite verification
//! - [`runner`] - The subprocess seam
//! - [`extract`] - Localization extraction
//! - [`flatten`] - Staging for the rasterizer
//! - [`fontgen`] - Font atlas generation
//! - [`verify`] - Artifact verification
//! - [`repack`] - Repack into the assets archive
//! - [`inject`] - The inverse reimport path
//! - [`orchestrator`] - Stage sequencing and exit codes
//! - [`worker`] - Background execution for presentation layers

pub mod config;
pub mod error;
pub mod extract;
pub mod flatten;
pub mod fontgen;
pub mod inject;
pub mod orchestrator;
pub mod prereq;
pub mod repack;
pub mod runner;
pub mod verify;
pub mod worker;
pub mod workspace;

pub use config::Config;
pub use error::{Error, Result};
pub use orchestrator::{Pipeline, PipelineEvent, RunOptions, Stage, StageOutcome, exit_code};
pub use runner::{SystemRunner, ToolOutput, ToolRunner};
