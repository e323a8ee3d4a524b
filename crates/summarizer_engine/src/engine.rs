use std::sync::{mpsc, Arc};
use std::thread;

use summarizer_logging::{summarizer_error, summarizer_info};

use crate::fetch::ChannelProgressSink;
use crate::pipeline::{SummaryError, Summarizer};
use crate::{EngineEvent, ModelBackend, RequestId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(std::io::Error),
    #[error("engine is not running")]
    Stopped,
}

enum EngineCommand {
    Summarize {
        request_id: RequestId,
        url: String,
        backend: ModelBackend,
    },
}

/// Runs summaries on a worker thread so the caller never blocks on network.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(summarizer: Summarizer) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("summarizer-engine")
            .build()?;
        let summarizer = Arc::new(summarizer);

        thread::Builder::new()
            .name("summarizer-commands".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let summarizer = summarizer.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(handle_command(summarizer, command, event_tx));
                }
            })
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx, event_rx })
    }

    /// Queues a summary. Every accepted request ends with exactly one
    /// [`EngineEvent::Completed`].
    pub fn summarize(
        &self,
        request_id: RequestId,
        url: impl Into<String>,
        backend: ModelBackend,
    ) -> Result<(), EngineError> {
        let command = EngineCommand::Summarize {
            request_id,
            url: url.into(),
            backend,
        };
        self.cmd_tx.send(command).map_err(|_| {
            summarizer_error!("Engine thread is gone; request {} dropped", request_id);
            EngineError::Stopped
        })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    summarizer: Arc<Summarizer>,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Summarize {
            request_id,
            url,
            backend,
        } => {
            let worker = {
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    run_summary(&summarizer, request_id, &url, backend, event_tx).await;
                })
            };
            if let Err(err) = worker.await {
                summarizer_error!("Request {} aborted: {}", request_id, err);
                let _ = event_tx.send(EngineEvent::Completed {
                    request_id,
                    result: Err(SummaryError::Interrupted(err.to_string())),
                });
            }
        }
    }
}

async fn run_summary(
    summarizer: &Summarizer,
    request_id: RequestId,
    url: &str,
    backend: ModelBackend,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    summarizer_info!("Request {} summarizing {} with {} model", request_id, url, backend);
    let sink = ChannelProgressSink::new(event_tx.clone());
    let result = summarizer.summarize(request_id, url, backend, &sink).await;
    if let Err(err) = &result {
        summarizer_error!("Request {} failed: {}", request_id, err);
    }
    let _ = event_tx.send(EngineEvent::Completed { request_id, result });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_reports_a_stopped_engine() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        drop(cmd_rx);
        let (_event_tx, event_rx) = mpsc::channel();
        let handle = EngineHandle { cmd_tx, event_rx };

        let result = handle.summarize(1, "https://example.com", ModelBackend::Hosted);
        assert!(matches!(result, Err(EngineError::Stopped)));
    }
}
