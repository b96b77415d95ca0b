//! Localization font repack pipeline for packed game resource archives.
//!
//! This library orchestrates a multi-stage workflow around two external
//! black-box tools: an archive extraction/injection tool and a font
//! rasterizer. The forward pipeline extracts localized text, stages it,
//! generates a bitmap font atlas, verifies the artifacts, and repacks them
//! into the assets archive. An inverse path reimports edited translation XML
//! into the source archive.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{CliError, FontpakError, Result};
pub use pipeline::{Config, Pipeline, RunOptions};
