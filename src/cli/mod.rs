//! Command line interface for the font repack pipeline.

mod args;

pub use args::Args;

use crate::error::{CliError, Result};
use crate::pipeline::{Config, Pipeline, SystemRunner};

/// Main CLI entry point: parses arguments, builds the configuration, and
/// runs one pipeline invocation. Returns the process exit code.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config = Config::load(args.config.as_deref())?;
    let pipeline = Pipeline::new(config, SystemRunner);

    Ok(pipeline.run(&args.run_options()).await)
}
