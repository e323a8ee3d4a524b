//! Summarizer engine: page fetch, text extraction, prompt assembly and model
//! dispatch, run off the UI thread.
mod chat;
mod config;
mod decode;
mod engine;
mod extract;
mod fetch;
mod pipeline;
mod prompt;
mod types;

pub use chat::{ChatBackend, HostedChat, LocalChat, ModelDispatcher, ModelError};
pub use config::{
    validate_api_key, ApiKey, BackendEndpoint, ConfigError, EngineConfig, API_KEY_PREFIX,
    API_KEY_VAR, DEFAULT_HOSTED_BASE_URL, DEFAULT_LOCAL_BASE_URL, HOSTED_BASE_URL_VAR,
    HOSTED_MODEL, LOCAL_BASE_URL_VAR, LOCAL_MODEL,
};
pub use decode::{decode_html, DecodedHtml};
pub use engine::{EngineError, EngineHandle};
pub use extract::{BoilerplateStripper, Extractor, Page, NO_CONTENT, NO_TITLE};
pub use fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
pub use pipeline::{SummaryError, Summarizer};
pub use prompt::{build_prompt, ChatMessage, Role, SYSTEM_PROMPT};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, ModelBackend, RequestId,
    RequestProgress, Stage,
};
