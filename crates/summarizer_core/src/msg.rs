#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL field.
    UrlChanged(String),
    /// User picked a backend in the model selector.
    ModelSelected(crate::ModelChoice),
    /// User clicked Summarize.
    SummarizeClicked,
    /// Engine moved a request to a new stage.
    StageChanged {
        request_id: crate::RequestId,
        stage: crate::Stage,
    },
    /// Engine produced a summary.
    SummaryReady {
        request_id: crate::RequestId,
        markdown: String,
    },
    /// Engine gave up on a request.
    SummaryFailed {
        request_id: crate::RequestId,
        failure: crate::Failure,
    },
}
