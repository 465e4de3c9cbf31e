use crate::{Artifact, Pipeline, PipelineError, RenderBackend, RenderRequest, Result};
use log::debug;
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Render(RenderRequest, oneshot::Sender<Result<Artifact>>),
    Close(oneshot::Sender<()>),
}

/// An async-friendly renderer backed by a dedicated worker thread.
///
/// The worker owns the `Pipeline` and runs one render at a time; requests
/// from concurrent tasks queue up in submission order. Clones share the
/// same worker.
#[derive(Clone)]
pub struct Renderer {
    cmd_tx: Sender<Command>,
}

impl Renderer {
    /// Move `pipeline` onto a new worker thread.
    pub fn spawn<B>(pipeline: Pipeline<B>) -> Self
    where
        B: RenderBackend + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Render(request, resp) => {
                        let res = pipeline.run(&request);
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(());
                        break;
                    }
                }
            }
            debug!("render worker stopped");
        });

        Self { cmd_tx }
    }

    /// Create a renderer driving headless Chrome.
    #[cfg(feature = "cdp")]
    pub async fn new(config: Option<crate::RenderConfig>) -> Result<Self> {
        let pipeline = crate::new_pipeline(config.unwrap_or_default())?;
        Ok(Self::spawn(pipeline))
    }

    /// Queue a render and wait for its artifact
    pub async fn render(&self, request: RenderRequest) -> Result<Artifact> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Render(request, tx))
            .map_err(|_| PipelineError::WorkerUnavailable("worker has stopped".into()))?;
        rx.await
            .map_err(|e| PipelineError::WorkerUnavailable(format!("Render canceled: {}", e)))?
    }

    /// Stop the worker after the renders already queued have finished.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Close(tx))
            .map_err(|_| PipelineError::WorkerUnavailable("worker has stopped".into()))?;
        rx.await
            .map_err(|e| PipelineError::WorkerUnavailable(format!("Close canceled: {}", e)))
    }
}
