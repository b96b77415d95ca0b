//! The subprocess seam.
//!
//! Every external tool is invoked through [`ToolRunner`], which returns a
//! typed [`ToolOutput`] instead of a bare boolean. Stages are generic over
//! the runner so tests can substitute a scripted implementation and assert
//! that no subprocess is spawned on invalid input.

use crate::pipeline::error::{Error, Result};
use std::future::Future;
use std::path::Path;

/// Captured result of one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code of the tool, `None` if terminated by signal.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the tool exited with code zero.
    ///
    /// Note: for the rasterizer a zero exit code is *not* sufficient proof
    /// of success; artifact presence is checked separately.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Abstraction over launching one external tool and waiting for it.
pub trait ToolRunner {
    /// Runs `program` with `args`, blocking until the child exits, and
    /// captures its output. Failure to *launch* is an error; a non-zero
    /// exit code is not; callers interpret [`ToolOutput::code`].
    fn run(
        &self,
        program: &Path,
        args: &[String],
    ) -> impl Future<Output = Result<ToolOutput>> + Send;
}

/// Production runner backed by [`tokio::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<ToolOutput> {
        log::info!("running: {} {}", program.display(), args.join(" "));

        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|error| Error::CommandFailed {
                command: program.display().to_string(),
                error,
            })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
