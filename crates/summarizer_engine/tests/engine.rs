use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use summarizer_engine::{
    validate_api_key, BackendEndpoint, BoilerplateStripper, EngineEvent, EngineHandle,
    FetchError, FetchOutput, FetchSettings, Fetcher, HostedChat, LocalChat, ModelBackend,
    ModelDispatcher, ProgressSink, RequestId, ReqwestFetcher, SummaryError, Summarizer,
    HOSTED_MODEL, LOCAL_MODEL,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct PanickingFetcher;

#[async_trait::async_trait]
impl Fetcher for PanickingFetcher {
    async fn fetch(
        &self,
        _request_id: RequestId,
        _url: &str,
        _sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError> {
        panic!("fetcher blew up");
    }
}

fn dispatcher(server: &MockServer) -> ModelDispatcher {
    let client = reqwest::Client::new();
    let endpoint = |model: &str| BackendEndpoint {
        base_url: server.uri(),
        model: model.to_string(),
    };
    ModelDispatcher::new(
        Arc::new(HostedChat::new(
            client.clone(),
            endpoint(HOSTED_MODEL),
            validate_api_key(Some("sk-proj-test")).unwrap(),
        )),
        Arc::new(LocalChat::new(client, endpoint(LOCAL_MODEL))),
    )
}

fn engine(server: &MockServer) -> EngineHandle {
    let summarizer = Summarizer::new(
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap()),
        Arc::new(BoilerplateStripper),
        dispatcher(server),
    );
    EngineHandle::new(summarizer).expect("engine starts")
}

async fn wait_for_completion(engine: &EngineHandle) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut events = Vec::new();
    while Instant::now() < deadline {
        while let Some(event) = engine.try_recv() {
            let done = matches!(event, EngineEvent::Completed { .. });
            events.push(event);
            if done {
                return events;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("engine did not complete in time; saw {events:?}");
}

#[tokio::test]
async fn engine_reports_progress_then_completion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<title>T</title><body>text</body>", "text/html"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "summary"}}]
        })))
        .mount(&server)
        .await;

    let engine = engine(&server);
    engine
        .summarize(11, format!("{}/page", server.uri()), ModelBackend::Hosted)
        .expect("engine accepts request");

    let events = wait_for_completion(&engine).await;
    assert!(events.iter().any(|event| matches!(event, EngineEvent::Progress(_))));
    assert_eq!(
        events.last(),
        Some(&EngineEvent::Completed {
            request_id: 11,
            result: Ok("summary".to_string()),
        })
    );
}

#[tokio::test]
async fn engine_reports_failures_as_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let engine = engine(&server);
    engine
        .summarize(12, format!("{}/nope", server.uri()), ModelBackend::Local)
        .expect("engine accepts request");

    let events = wait_for_completion(&engine).await;
    match events.last() {
        Some(EngineEvent::Completed {
            request_id: 12,
            result: Err(err),
        }) => assert!(err.is_network()),
        other => panic!("unexpected final event: {other:?}"),
    }
}

#[tokio::test]
async fn panicking_request_still_completes_and_engine_keeps_working() {
    let server = MockServer::start().await;
    let summarizer = Summarizer::new(
        Arc::new(PanickingFetcher),
        Arc::new(BoilerplateStripper),
        dispatcher(&server),
    );
    let engine = EngineHandle::new(summarizer).expect("engine starts");

    engine
        .summarize(21, "https://example.com", ModelBackend::Hosted)
        .expect("engine accepts request");
    let events = wait_for_completion(&engine).await;
    match events.last() {
        Some(EngineEvent::Completed {
            request_id: 21,
            result: Err(err @ SummaryError::Interrupted(_)),
        }) => assert!(!err.is_network()),
        other => panic!("unexpected final event: {other:?}"),
    }

    engine
        .summarize(22, "https://example.com", ModelBackend::Local)
        .expect("engine still accepts requests");
    let events = wait_for_completion(&engine).await;
    assert!(matches!(
        events.last(),
        Some(EngineEvent::Completed { request_id: 22, result: Err(_) })
    ));
}
