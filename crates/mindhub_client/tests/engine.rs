use std::sync::Arc;
use std::time::Duration;

use mindhub_client::{
    endpoints, ApiRequest, ClientSettings, EngineEvent, EngineHandle, FailureKind,
    ReqwestTransport, Reviewable,
};
use mindhub_core::{Decision, Post, TagChoice};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> EngineHandle {
    let transport = ReqwestTransport::new(&ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("transport");
    EngineHandle::new(Arc::new(transport)).expect("engine")
}

/// Waits for the next engine event without blocking the test runtime.
async fn next_event(engine: EngineHandle, timeout: Duration) -> (EngineHandle, Option<EngineEvent>) {
    tokio::task::spawn_blocking(move || {
        let event = engine.recv_timeout(timeout);
        (engine, event)
    })
    .await
    .expect("join")
}

fn sample_post() -> Post {
    Post {
        id: "p1".to_string(),
        header: "Logic guide".to_string(),
        content: "Use processors".to_string(),
        author_id: "u9".to_string(),
        tags: vec!["topic:logic".to_string()],
        time: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn completed_request_reports_its_ticket() {
    mindhub_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let scope = engine.scope();
    let ticket = engine.send(endpoints::ping(), &scope);

    let (_engine, event) = next_event(engine, Duration::from_secs(5)).await;
    match event {
        Some(EngineEvent::Completed {
            ticket: got,
            result: Ok(response),
        }) => {
            assert_eq!(got, ticket);
            assert_eq!(&response.body[..], b"pong");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn dropped_scope_discards_the_result() {
    mindhub_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/upload/page/0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    let scope = engine.scope();
    engine.send(ApiRequest::get("posts/upload/page/0"), &scope);
    drop(scope);

    let (_engine, event) = next_event(engine, Duration::from_millis(800)).await;
    assert_eq!(event, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn child_scope_is_cancelled_with_parent() {
    let server = MockServer::start().await;
    let engine = engine_for(&server);
    let parent = engine.scope();
    let child = parent.child();
    assert!(!child.is_cancelled());

    parent.cancel();
    assert!(child.is_cancelled());

    let other = engine.scope();
    engine.shutdown();
    assert!(other.is_cancelled());
}

#[tokio::test(flavor = "multi_thread")]
async fn verify_chain_stops_at_first_failure() {
    mindhub_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/notification"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let decision = Decision::Verify {
        item: sample_post(),
        tags: vec![TagChoice::new("topic", "logic", None)],
    };
    let requests = Post::decision_requests(&decision);
    assert_eq!(requests.len(), 2);

    let engine = engine_for(&server);
    let scope = engine.scope();
    engine.submit(requests, &scope);

    let (_engine, event) = next_event(engine, Duration::from_secs(5)).await;
    match event {
        Some(EngineEvent::Completed {
            result: Err(err), ..
        }) => assert_eq!(err.kind, FailureKind::HttpStatus(500)),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_after_shutdown_fails_at_once() {
    mindhub_logging::initialize_for_tests();
    let server = MockServer::start().await;
    let engine = engine_for(&server);
    engine.shutdown();

    let scope = engine.scope();
    let ticket = engine.send(endpoints::ping(), &scope);

    match engine.try_recv() {
        Some(EngineEvent::Completed {
            ticket: got,
            result: Err(err),
        }) => {
            assert_eq!(got, ticket);
            assert_eq!(err.kind, FailureKind::Network);
        }
        other => panic!("unexpected event {other:?}"),
    }
}
