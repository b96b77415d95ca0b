//! Background execution of one pipeline run.
//!
//! A presentation layer (a GUI form, a service wrapper) submits a full run
//! to a worker task so its own event loop stays responsive, receiving
//! progress over a channel. The pipeline core stays thread-agnostic; only
//! this boundary is concurrent. One run per workspace root: concurrent
//! runs against the same root are a precondition violation.

use crate::pipeline::config::Config;
use crate::pipeline::orchestrator::{Pipeline, PipelineEvent, RunOptions};
use crate::pipeline::runner::ToolRunner;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle to a pipeline run executing on a worker task.
pub struct WorkerHandle {
    /// Progress events, ending with [`PipelineEvent::Finished`].
    pub events: mpsc::UnboundedReceiver<PipelineEvent>,
    /// Resolves to the run's exit code.
    pub task: JoinHandle<i32>,
}

/// Submits one full pipeline run to a background task.
pub fn spawn<R>(config: Config, runner: R, opts: RunOptions) -> WorkerHandle
where
    R: ToolRunner + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(async move {
        Pipeline::new(config, runner)
            .with_events(tx)
            .run(&opts)
            .await
    });
    WorkerHandle { events: rx, task }
}
