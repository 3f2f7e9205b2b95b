use std::time::{Duration, Instant};

use ferret_client::ReqwestFetcher;
use ferret_core::config::FetchConfig;
use ferret_core::error::AppError;
use ferret_core::models::FetchMode;
use ferret_core::task::TaskBuilder;
use ferret_core::traits::{DirectAgent, Fetcher};
use wiremock::matchers::{header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::integration::common::{
    PAGE_HTML, TEST_USER_AGENT, mount_html, test_config, test_request,
};

async fn serve_slow_page(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE_HTML)
                .set_delay(delay),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn ok_response_returns_body_exactly() {
    let server = MockServer::start().await;
    mount_html(&server, "/page", 200, PAGE_HTML).await;

    let fetcher = ReqwestFetcher::from_config(&test_config()).unwrap();
    let request = test_request(&format!("{}/page", server.uri()), FetchMode::Static);
    let html = fetcher.fetch(&request).await.unwrap();

    assert_eq!(html, PAGE_HTML);
}

#[tokio::test]
async fn not_found_carries_status() {
    let server = MockServer::start().await;
    mount_html(&server, "/missing", 404, "<h1>Not Found</h1>").await;

    let fetcher = ReqwestFetcher::from_config(&test_config()).unwrap();
    let url = format!("{}/missing", server.uri());
    let err = fetcher
        .fetch(&test_request(&url, FetchMode::Static))
        .await
        .unwrap_err();

    match err {
        AppError::HttpStatus { status, url: failed } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_carries_status() {
    let server = MockServer::start().await;
    mount_html(&server, "/boom", 503, "unavailable").await;

    let fetcher = ReqwestFetcher::from_config(&test_config()).unwrap();
    let request = test_request(&format!("{}/boom", server.uri()), FetchMode::Static);
    let err = fetcher.fetch(&request).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn unreachable_host_is_network_error_within_timeout() {
    let config = test_config();
    let fetcher = ReqwestFetcher::from_config(&config).unwrap();

    let started = Instant::now();
    // Port 1 on loopback is closed on any sane test host.
    let err = fetcher
        .fetch(&test_request("http://127.0.0.1:1/", FetchMode::Static))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NetworkError(_)), "got {err:?}");
    assert!(started.elapsed() < config.timeout + Duration::from_secs(1));
}

#[tokio::test]
async fn slow_server_times_out_as_network_error() {
    let server = serve_slow_page(Duration::from_secs(3)).await;

    let fetcher = ReqwestFetcher::from_config(&test_config()).unwrap();
    let mut request = test_request(&format!("{}/slow", server.uri()), FetchMode::Static);
    request.timeout = Duration::from_secs(1);

    let started = Instant::now();
    let err = fetcher.fetch(&request).await.unwrap_err();

    assert!(matches!(err, AppError::NetworkError(_)), "got {err:?}");
    assert!(err.to_string().contains("timed out after 1s"), "got {err}");
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn sub_second_timeout_is_reported_in_milliseconds() {
    let server = serve_slow_page(Duration::from_secs(2)).await;

    let fetcher = ReqwestFetcher::from_config(&test_config()).unwrap();
    let mut request = test_request(&format!("{}/slow", server.uri()), FetchMode::Static);
    request.timeout = Duration::from_millis(500);

    let err = fetcher.fetch(&request).await.unwrap_err();

    assert!(err.to_string().contains("timed out after 500ms"), "got {err}");
}

#[tokio::test]
async fn request_timeout_overrides_fetcher_default_through_task() {
    let server = serve_slow_page(Duration::from_secs(3)).await;

    // Built from the 30 s default; only the request carries the short timeout.
    let config = FetchConfig::default();
    let fetcher = ReqwestFetcher::from_config(&config).unwrap();
    let builder = TaskBuilder::new(fetcher.clone(), fetcher);
    let mut request = test_request(&format!("{}/slow", server.uri()), FetchMode::Static);
    request.timeout = Duration::from_secs(1);

    let started = Instant::now();
    let err = builder.build(request).run(&DirectAgent).await.unwrap_err();

    assert!(matches!(err, AppError::NetworkError(_)), "got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn request_without_tls_verification_still_fetches() {
    let server = MockServer::start().await;
    mount_html(&server, "/page", 200, PAGE_HTML).await;

    let fetcher = ReqwestFetcher::from_config(&test_config()).unwrap();
    let mut request = test_request(&format!("{}/page", server.uri()), FetchMode::Static);
    request.verify_tls = false;

    let html = fetcher.fetch(&request).await.unwrap();

    assert_eq!(html, PAGE_HTML);
}

#[tokio::test]
async fn sends_configured_user_agent_and_accept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", TEST_USER_AGENT))
        .and(headers(
            "accept",
            vec![
                "text/html",
                "application/xhtml+xml",
                "application/xml;q=0.9",
                "*/*;q=0.8",
            ],
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::from_config(&test_config()).unwrap();
    let request = test_request(&format!("{}/ua", server.uri()), FetchMode::Static);
    let html = fetcher.fetch(&request).await.unwrap();

    assert_eq!(html, PAGE_HTML);
}

#[tokio::test]
async fn follows_redirects_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/page"))
        .mount(&server)
        .await;
    mount_html(&server, "/page", 200, PAGE_HTML).await;

    let fetcher = ReqwestFetcher::from_config(&test_config()).unwrap();
    let request = test_request(&format!("{}/old", server.uri()), FetchMode::Static);
    let html = fetcher.fetch(&request).await.unwrap();

    assert_eq!(html, PAGE_HTML);
}
