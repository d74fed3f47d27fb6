//! ProxyClient and fallback re-run tests against a mock vt-proxy

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::routing::post;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use vt_cli::client::GENERIC_FAILURE_MESSAGE;
use vt_cli::{analyze, ProxyClient};
use vt_common::detection::normalizer::{DisplayResult, ResultOrigin};
use vt_common::detection::{AnalysisRequest, DetectionKind, PercentScore, Provider};
use vt_common::session::{
    AnalysisSession, ClientError, DetectionBackend, DetectionMode, CREDITS_EXHAUSTED_MESSAGE,
};

const LONG_TEXT: &str =
    "A reasonably long paragraph for testing. It easily clears the minimum length check.";

#[derive(Clone)]
struct MockProxy {
    status: StatusCode,
    body: &'static str,
    hits: Arc<AtomicUsize>,
}

async fn reply(State(mock): State<MockProxy>) -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    (mock.status, [(header::CONTENT_TYPE, "application/json")], mock.body)
}

/// Start a mock proxy answering both detection routes with one canned reply
async fn spawn_proxy(status: StatusCode, body: &'static str) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let mock = MockProxy {
        status,
        body,
        hits: hits.clone(),
    };
    let app = Router::new()
        .route("/api/detect-ai", post(reply))
        .route("/api/detect-plagiarism", post(reply))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), hits)
}

#[tokio::test]
async fn test_success_envelope_is_parsed() {
    let (url, hits) = spawn_proxy(
        StatusCode::OK,
        r#"{"sapling":{"ai_score":0.12,"items":[],"status":"success"},"winstonai":{"ai_score":0.91,"items":[],"status":"success"}}"#,
    )
    .await;
    let client = ProxyClient::new(url).unwrap();

    let envelope = client.detect_ai(&AnalysisRequest::new(LONG_TEXT)).await.unwrap();

    assert!(envelope.sapling.is_some());
    assert!(envelope.winstonai.is_some());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bad_request_maps_to_validation() {
    let (url, _) = spawn_proxy(
        StatusCode::BAD_REQUEST,
        r#"{"error":"Text must be at least 50 characters long"}"#,
    )
    .await;
    let client = ProxyClient::new(url).unwrap();

    let err = client.detect_plagiarism(&AnalysisRequest::new(LONG_TEXT)).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Validation("Text must be at least 50 characters long".to_string())
    );
}

#[tokio::test]
async fn test_payment_required_maps_to_credits_exhausted() {
    let (url, _) = spawn_proxy(
        StatusCode::PAYMENT_REQUIRED,
        r#"{"error":"API credits exhausted","details":{},"status":402}"#,
    )
    .await;
    let client = ProxyClient::new(url).unwrap();

    let err = client.detect_ai(&AnalysisRequest::new(LONG_TEXT)).await.unwrap_err();

    assert_eq!(err, ClientError::CreditsExhausted);
}

#[tokio::test]
async fn test_other_status_keeps_code_and_message() {
    let (url, _) = spawn_proxy(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":"Eden AI API error","details":"slow down","status":429}"#,
    )
    .await;
    let client = ProxyClient::new(url).unwrap();

    let err = client.detect_ai(&AnalysisRequest::new(LONG_TEXT)).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Upstream {
            status: 429,
            message: "Eden AI API error".to_string()
        }
    );
}

#[tokio::test]
async fn test_error_without_message_uses_generic_text() {
    let (url, _) = spawn_proxy(StatusCode::BAD_GATEWAY, "upstream went away").await;
    let client = ProxyClient::new(url).unwrap();

    let err = client.detect_ai(&AnalysisRequest::new(LONG_TEXT)).await.unwrap_err();

    assert_eq!(
        err,
        ClientError::Upstream {
            status: 502,
            message: GENERIC_FAILURE_MESSAGE.to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_proxy_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let client = ProxyClient::new(url).unwrap();

    let err = client.detect_ai(&AnalysisRequest::new(LONG_TEXT)).await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn test_credits_exhausted_reruns_with_simulated_data() {
    let (url, hits) = spawn_proxy(
        StatusCode::PAYMENT_REQUIRED,
        r#"{"error":"API credits exhausted","status":402}"#,
    )
    .await;
    let mut session = AnalysisSession::new(ProxyClient::new(url).unwrap());

    let outcome = analyze(&mut session, DetectionKind::AiDetection, AnalysisRequest::new(LONG_TEXT)).await;

    assert_eq!(outcome.fallback_notice.as_deref(), Some(CREDITS_EXHAUSTED_MESSAGE));
    match outcome.result.unwrap() {
        DisplayResult::Ai(result) => {
            assert_eq!(result.origin, ResultOrigin::Simulated);
            assert_eq!(result.provider, Provider::WinstonAi);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(session.mode(), DetectionMode::Fallback);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_live_plagiarism_through_session() {
    let (url, _) = spawn_proxy(
        StatusCode::OK,
        r#"{"winstonai":{"plagia_score":42,"items":[{"text":"source","candidates":[{"url":"https://a.example","plagiarized_text":"copied words","plagia_score":0.8,"prediction":"plagiarized"}]}],"cost":0.01,"status":"success"}}"#,
    )
    .await;
    let mut session = AnalysisSession::new(ProxyClient::new(url).unwrap());

    let outcome = analyze(
        &mut session,
        DetectionKind::Plagiarism,
        AnalysisRequest::new(LONG_TEXT).with_title("Essay"),
    )
    .await;

    assert!(outcome.fallback_notice.is_none());
    match outcome.result.unwrap() {
        DisplayResult::Plagiarism(result) => {
            assert_eq!(result.origin, ResultOrigin::Live);
            assert_eq!(result.score, PercentScore(42.0));
            assert_eq!(result.total_matches, 1);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(session.mode(), DetectionMode::Live);
}
