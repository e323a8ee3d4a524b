use std::sync::Arc;

use summarizer_logging::{summarizer_debug, summarizer_info};

use crate::chat::{ModelDispatcher, ModelError};
use crate::config::EngineConfig;
use crate::decode::decode_html;
use crate::extract::{BoilerplateStripper, Extractor};
use crate::fetch::{Fetcher, ProgressSink, ReqwestFetcher};
use crate::prompt::build_prompt;
use crate::{
    EngineEvent, FailureKind, FetchError, ModelBackend, RequestId, RequestProgress, Stage,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SummaryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The summary task ended without producing a result.
    #[error("summary task stopped unexpectedly: {0}")]
    Interrupted(String),
}

impl SummaryError {
    /// True when the page itself could not be retrieved.
    pub fn is_network(&self) -> bool {
        match self {
            SummaryError::Fetch(err) => err.kind != FailureKind::InvalidUrl,
            SummaryError::Model(_) | SummaryError::Interrupted(_) => false,
        }
    }
}

/// Fetch, extract, prompt and dispatch for one URL.
pub struct Summarizer {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    dispatcher: ModelDispatcher,
}

impl Summarizer {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        dispatcher: ModelDispatcher,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            dispatcher,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, SummaryError> {
        let fetcher = ReqwestFetcher::new(config.fetch.clone())?;
        let dispatcher = ModelDispatcher::from_config(config)?;
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(BoilerplateStripper),
            dispatcher,
        ))
    }

    pub async fn summarize(
        &self,
        request_id: RequestId,
        url: &str,
        backend: ModelBackend,
        sink: &dyn ProgressSink,
    ) -> Result<String, SummaryError> {
        let report = |stage: Stage| {
            sink.emit(EngineEvent::Progress(RequestProgress {
                request_id,
                stage,
                bytes: None,
            }));
        };

        report(Stage::Fetching);
        let output = self.fetcher.fetch(request_id, url, sink).await?;

        report(Stage::Extracting);
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        summarizer_debug!(
            "Decoded {} bytes as {}",
            output.metadata.byte_len,
            decoded.encoding_label
        );
        let page = self
            .extractor
            .extract(&output.metadata.final_url, &decoded.html);
        summarizer_info!(
            "Extracted \"{}\" from {} ({} chars of text)",
            page.title,
            page.url,
            page.body_text.len()
        );

        report(Stage::Generating);
        let messages = build_prompt(&page.title, &page.body_text);
        let summary = self.dispatcher.dispatch(backend, &messages).await?;

        report(Stage::Done);
        Ok(summary)
    }
}
