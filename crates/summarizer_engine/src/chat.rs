use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use summarizer_logging::{summarizer_info, summarizer_warn};

use crate::config::{ApiKey, BackendEndpoint, EngineConfig};
use crate::prompt::ChatMessage;
use crate::ModelBackend;

/// Longest slice of an error body carried into an error message.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{backend} model returned status {status}: {body}")]
    Http {
        backend: ModelBackend,
        status: u16,
        body: String,
    },
    #[error("could not reach {backend} model: {message}")]
    Transport {
        backend: ModelBackend,
        message: String,
    },
    #[error("unexpected response from {backend} model: {message}")]
    MalformedResponse {
        backend: ModelBackend,
        message: String,
    },
    #[error("{backend} model returned no text")]
    EmptyResponse { backend: ModelBackend },
    /// The HTTP client shared by both backends could not be built.
    #[error("could not set up the model HTTP client: {message}")]
    ClientSetup { message: String },
}

#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` endpoint.
pub struct HostedChat {
    client: reqwest::Client,
    endpoint: BackendEndpoint,
    api_key: ApiKey,
}

impl HostedChat {
    pub fn new(client: reqwest::Client, endpoint: BackendEndpoint, api_key: ApiKey) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl ChatBackend for HostedChat {
    fn model(&self) -> &str {
        &self.endpoint.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let backend = ModelBackend::Hosted;
        let body = CompletionRequest {
            model: &self.endpoint.model,
            messages,
        };
        let request = self
            .client
            .post(self.endpoint.url("chat/completions"))
            .bearer_auth(self.api_key.expose());
        let text = post_json(request, &body, backend).await?;

        let parsed: CompletionResponse = parse_reply(&text, backend)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ModelError::EmptyResponse { backend })
    }
}

#[derive(Serialize)]
struct LocalChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct LocalChatResponse {
    message: ReplyMessage,
}

/// Ollama-style `/api/chat` endpoint, non-streaming.
pub struct LocalChat {
    client: reqwest::Client,
    endpoint: BackendEndpoint,
}

impl LocalChat {
    pub fn new(client: reqwest::Client, endpoint: BackendEndpoint) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait::async_trait]
impl ChatBackend for LocalChat {
    fn model(&self) -> &str {
        &self.endpoint.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let backend = ModelBackend::Local;
        let body = LocalChatRequest {
            model: &self.endpoint.model,
            messages,
            stream: false,
        };
        let request = self.client.post(self.endpoint.url("api/chat"));
        let text = post_json(request, &body, backend).await?;

        let parsed: LocalChatResponse = parse_reply(&text, backend)?;
        parsed
            .message
            .content
            .ok_or(ModelError::EmptyResponse { backend })
    }
}

async fn post_json<T: Serialize>(
    request: reqwest::RequestBuilder,
    body: &T,
    backend: ModelBackend,
) -> Result<String, ModelError> {
    let payload = serde_json::to_vec(body).map_err(|err| ModelError::MalformedResponse {
        backend,
        message: format!("could not encode request: {err}"),
    })?;

    let transport = |err: reqwest::Error| ModelError::Transport {
        backend,
        message: err.to_string(),
    };
    let response = request
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    let text = response.text().await.map_err(transport)?;
    if !status.is_success() {
        summarizer_warn!("{} model answered {}", backend, status);
        return Err(ModelError::Http {
            backend,
            status: status.as_u16(),
            body: clip(&text),
        });
    }
    Ok(text)
}

fn parse_reply<T: serde::de::DeserializeOwned>(
    text: &str,
    backend: ModelBackend,
) -> Result<T, ModelError> {
    serde_json::from_str(text).map_err(|err| ModelError::MalformedResponse {
        backend,
        message: err.to_string(),
    })
}

fn clip(text: &str) -> String {
    let text = text.trim();
    if text.len() <= MAX_ERROR_BODY {
        return text.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Owns one backend per [`ModelBackend`] variant.
#[derive(Clone)]
pub struct ModelDispatcher {
    hosted: Arc<dyn ChatBackend>,
    local: Arc<dyn ChatBackend>,
}

impl ModelDispatcher {
    pub fn new(hosted: Arc<dyn ChatBackend>, local: Arc<dyn ChatBackend>) -> Self {
        Self { hosted, local }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self, ModelError> {
        let client = build_client(config.model_timeout)?;
        Ok(Self::new(
            Arc::new(HostedChat::new(
                client.clone(),
                config.hosted.clone(),
                config.api_key.clone(),
            )),
            Arc::new(LocalChat::new(client, config.local.clone())),
        ))
    }

    pub fn backend(&self, which: ModelBackend) -> &dyn ChatBackend {
        match which {
            ModelBackend::Hosted => self.hosted.as_ref(),
            ModelBackend::Local => self.local.as_ref(),
        }
    }

    pub async fn dispatch(
        &self,
        which: ModelBackend,
        messages: &[ChatMessage],
    ) -> Result<String, ModelError> {
        let backend = self.backend(which);
        summarizer_info!(
            "Dispatching {} messages to {} model {}",
            messages.len(),
            which,
            backend.model()
        );
        backend.complete(messages).await
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, ModelError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ModelError::ClientSetup {
            message: err.to_string(),
        })
}
