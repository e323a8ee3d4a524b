use pretty_assertions::assert_eq;
use serde_json::json;
use summarizer_engine::{
    build_prompt, validate_api_key, BackendEndpoint, ChatBackend, HostedChat, LocalChat,
    ModelBackend, ModelError, HOSTED_MODEL, LOCAL_MODEL,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hosted(server: &MockServer) -> HostedChat {
    HostedChat::new(
        reqwest::Client::new(),
        BackendEndpoint {
            base_url: server.uri(),
            model: HOSTED_MODEL.to_string(),
        },
        validate_api_key(Some("sk-proj-test")).unwrap(),
    )
}

fn local(server: &MockServer) -> LocalChat {
    LocalChat::new(
        reqwest::Client::new(),
        BackendEndpoint {
            base_url: server.uri(),
            model: LOCAL_MODEL.to_string(),
        },
    )
}

#[tokio::test]
async fn hosted_sends_fixed_model_and_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-proj-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "system"}, {"role": "user"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "# Summary\n\n* one"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = hosted(&server)
        .complete(&build_prompt("T", "body"))
        .await
        .expect("reply");

    assert_eq!(reply, "# Summary\n\n* one");
}

#[tokio::test]
async fn local_sends_fixed_model_without_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.2",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.2",
            "message": {"role": "assistant", "content": "  local *markdown*  "},
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = local(&server);
    assert_eq!(backend.model(), LOCAL_MODEL);
    let reply = backend
        .complete(&build_prompt("T", "body"))
        .await
        .expect("reply");

    assert_eq!(reply, "  local *markdown*  ");
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = hosted(&server)
        .complete(&build_prompt("T", "body"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ModelError::Http {
            backend: ModelBackend::Hosted,
            status: 401,
            body: "invalid api key".to_string(),
        }
    );
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = hosted(&server)
        .complete(&build_prompt("T", "body"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ModelError::EmptyResponse {
            backend: ModelBackend::Hosted
        }
    );
}

#[tokio::test]
async fn non_json_reply_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = local(&server)
        .complete(&build_prompt("T", "body"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ModelError::MalformedResponse {
            backend: ModelBackend::Local,
            ..
        }
    ));
}
