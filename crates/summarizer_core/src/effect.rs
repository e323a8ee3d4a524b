use crate::{ModelChoice, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the fetch/extract/prompt/dispatch pipeline for one URL.
    Summarize {
        request_id: RequestId,
        url: String,
        model: ModelChoice,
    },
}
