use std::time::Duration;

use mindhub_client::{
    endpoints, ApiRequest, ClientSettings, FailureKind, ReqwestTransport, Transport,
};
use mindhub_core::{ListConfig, ListEffect, PageSize, PagedList, SchematicUpload};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> ClientSettings {
    ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    }
}

fn first_page_request(resource: &str) -> ApiRequest {
    let config = ListConfig::new(resource, PageSize::DEFAULT).with_query("name", "drill");
    let (_list, effects) = PagedList::<SchematicUpload>::open(config);
    match &effects[..] {
        [ListEffect::FetchPage(page)] => ApiRequest::from(page),
        other => panic!("unexpected effects {other:?}"),
    }
}

#[tokio::test]
async fn page_request_sends_headers_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schematic-upload/page/0"))
        .and(query_param("name", "drill"))
        .and(header("ngrok-skip-browser-warning", "true"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id": "s1", "name": "drill", "authorId": "a", "tags": ["mode:pvp"]}]"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&ClientSettings {
        bearer_token: Some("secret".to_string()),
        ..settings(&server)
    })
    .expect("transport");

    let response = transport
        .send(&first_page_request("schematic-upload"))
        .await
        .expect("page ok");
    assert_eq!(response.status, 200);

    let uploads: Vec<SchematicUpload> = response.json().expect("decode");
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].author_id, "a");
}

#[tokio::test]
async fn form_post_is_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mindustry-server"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("address=play.example.org%3A6567"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&settings(&server)).expect("transport");
    let response = transport
        .send(&endpoints::add_server("play.example.org:6567"))
        .await
        .expect("post ok");
    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/schematic-upload/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&settings(&server)).expect("transport");
    let err = transport
        .send(&ApiRequest::delete("schematic-upload/missing"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("pong"),
        )
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&ClientSettings {
        request_timeout: Duration::from_millis(50),
        ..settings(&server)
    })
    .expect("transport");
    let err = transport.send(&endpoints::ping()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mindustry-server/page/0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&ClientSettings {
        max_bytes: 10,
        ..settings(&server)
    })
    .expect("transport");
    let err = transport
        .send(&ApiRequest::get("mindustry-server/page/0"))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[test]
fn resolve_keeps_base_path_and_encodes_segments() {
    let transport = ReqwestTransport::new(&ClientSettings {
        base_url: "https://api.example.org/api/v1/".to_string(),
        ..ClientSettings::default()
    })
    .expect("transport");

    let url = transport.resolve(&endpoints::remove_server("1.2.3.4:6567 #2"));
    assert_eq!(
        url.as_str(),
        "https://api.example.org/api/v1/mindustry-server/1.2.3.4:6567%20%232"
    );

    let url = transport.resolve(&endpoints::total("posts/upload/"));
    assert_eq!(url.as_str(), "https://api.example.org/api/v1/posts/upload/total");
}

#[test]
fn malformed_base_url_is_rejected() {
    let err = ReqwestTransport::new(&ClientSettings {
        base_url: "not a url".to_string(),
        ..ClientSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
