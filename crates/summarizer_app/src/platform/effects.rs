use summarizer_core::{Effect, Failure, ModelChoice, Msg, RequestId, Stage};
use summarizer_engine::{EngineError, EngineEvent, EngineHandle, ModelBackend, SummaryError};
use summarizer_logging::{summarizer_info, summarizer_trace};

/// Executes core effects against the engine and turns engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Sends effects to the engine. Requests the engine refuses come back as
    /// failure messages so the core never waits on them.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut rejected = Vec::new();
        for effect in effects {
            match effect {
                Effect::Summarize {
                    request_id,
                    url,
                    model,
                } => {
                    summarizer_info!(
                        "Summarize request_id={} model={:?} url={}",
                        request_id,
                        model,
                        url
                    );
                    if let Err(err) = self.engine.summarize(request_id, url, map_model(model)) {
                        rejected.push(rejected_request(request_id, &err));
                    }
                }
            }
        }
        rejected
    }

    pub fn drain_events(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = map_event(event) {
                msgs.push(msg);
            }
        }
        msgs
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Progress(progress) => match progress.bytes {
            // Byte counts only feed the log; the status line tracks stages.
            Some(bytes) => {
                summarizer_trace!("request_id={} downloaded {} bytes", progress.request_id, bytes);
                None
            }
            None => Some(Msg::StageChanged {
                request_id: progress.request_id,
                stage: map_stage(progress.stage),
            }),
        },
        EngineEvent::Completed {
            request_id,
            result: Ok(markdown),
        } => Some(Msg::SummaryReady {
            request_id,
            markdown,
        }),
        EngineEvent::Completed {
            request_id,
            result: Err(err),
        } => Some(Msg::SummaryFailed {
            request_id,
            failure: map_failure(&err),
        }),
    }
}

fn rejected_request(request_id: RequestId, err: &EngineError) -> Msg {
    Msg::SummaryFailed {
        request_id,
        failure: Failure::other(err.to_string()),
    }
}

fn map_failure(err: &SummaryError) -> Failure {
    if err.is_network() {
        Failure::network(err.to_string())
    } else {
        Failure::other(err.to_string())
    }
}

fn map_model(model: ModelChoice) -> ModelBackend {
    match model {
        ModelChoice::Hosted => ModelBackend::Hosted,
        ModelChoice::Local => ModelBackend::Local,
    }
}

fn map_stage(stage: summarizer_engine::Stage) -> Stage {
    match stage {
        summarizer_engine::Stage::Fetching => Stage::Fetching,
        summarizer_engine::Stage::Extracting => Stage::Extracting,
        summarizer_engine::Stage::Generating => Stage::Generating,
        summarizer_engine::Stage::Done => Stage::Done,
    }
}
