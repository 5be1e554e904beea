//! End-to-end scan flows against a mock scan service

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use url_scan::{
    CheckStatus, HttpScanService, Key, RiskBand, ScanController, ScanService, UiEvent, UiState,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller_for(server: &MockServer) -> ScanController<HttpScanService> {
    ScanController::new(assert_ok!(HttpScanService::new(&server.uri())))
}

fn assert_settled(controller: &ScanController<HttpScanService>) {
    let page = controller.page();
    assert!(page.trigger.enabled);
    assert!(!page.trigger.busy);
    assert!(!page.loading_visible());
}

#[tokio::test]
async fn example_com_renders_high_risk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "url": "example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "example.com",
            "risk_score": 8,
            "checks": {
                "domain_age": { "is_suspicious": true, "reasons": ["Registered 2 days ago"] }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller
        .handle(UiEvent::Input("example.com".to_string()))
        .await;
    controller.handle(UiEvent::KeyPress(Key::Enter)).await;

    let page = controller.page();
    assert_eq!(page.state(), UiState::ResultsShown);
    assert!(page.error().is_none());

    let results = page.results().expect("results shown");
    assert_eq!(results.scanned_url, "example.com");
    assert_eq!(results.score_text, "8/10");
    assert_eq!(results.band, RiskBand::High);
    assert_eq!(results.badge, "High Risk");
    assert_eq!(results.checks.len(), 1);
    assert_eq!(results.checks[0].title, "Domain Age");
    assert_eq!(results.checks[0].status, CheckStatus::Suspicious);
    assert_eq!(results.checks[0].reasons, ["Registered 2 days ago"]);
    assert_settled(&controller);
}

#[tokio::test]
async fn whitespace_input_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.run_scan("   \t ").await;

    let page = controller.page();
    let error = page.error().expect("error shown");
    assert_eq!(error.message, "Please enter a URL to scan");
    drop(page);
    assert_settled(&controller);
}

#[tokio::test]
async fn service_reported_error_is_shown_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "invalid url" })))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.run_scan("nonsense").await;

    let page = controller.page();
    assert_eq!(page.state(), UiState::ErrorShown);
    assert_eq!(page.error().unwrap().message, "invalid url");
    assert!(page.results().is_none());
    assert_settled(&controller);
}

#[tokio::test]
async fn error_envelope_on_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "URL too long" })))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.run_scan("https://example.com/very/long").await;

    assert_eq!(controller.page().error().unwrap().message, "URL too long");
    assert_settled(&controller);
}

#[tokio::test]
async fn server_error_without_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.run_scan("example.com").await;

    let message = controller.page().error().unwrap().message.clone();
    assert!(message.contains("503"), "{message}");
    assert_settled(&controller);
}

#[tokio::test]
async fn unreachable_service() {
    let listener = assert_ok!(std::net::TcpListener::bind("127.0.0.1:0"));
    let uri = format!("http://{}", assert_ok!(listener.local_addr()));
    drop(listener);

    let controller = ScanController::new(assert_ok!(HttpScanService::new(&uri)));
    controller.run_scan("example.com").await;

    assert_eq!(controller.page().state(), UiState::ErrorShown);
    assert!(!controller.page().error().unwrap().message.is_empty());
    assert!(controller.page().trigger.enabled);
}

#[tokio::test]
async fn check_order_follows_response() {
    let server = MockServer::start().await;
    let body = r#"{
        "url": "http://paypal-login.tk",
        "risk_score": 5,
        "checks": {
            "url_pattern": {"passed": false, "reasons": ["Uses suspicious top-level domain: .tk"]},
            "ssl_certificate": {"is_suspicious": false, "reasons": []},
            "brand_similarity": {"is_suspicious": true, "reasons": ["Possible typosquatting of \"paypal\"", "Suspicious keyword detected"]}
        },
        "is_phishing": true,
        "timestamp": "2024-05-01T12:00:00"
    }"#;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json"),
        )
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.run_scan("http://paypal-login.tk").await;

    let page = controller.page();
    let results = page.results().expect("results shown");
    let titles: Vec<&str> = results.checks.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Url Pattern", "Ssl Certificate", "Brand Similarity"]);
    assert_eq!(results.checks[0].status, CheckStatus::Suspicious);
    assert_eq!(results.checks[1].status, CheckStatus::Safe);
    assert!(results.checks[1].reasons.is_empty());
    assert_eq!(results.checks[2].reasons.len(), 2);
    assert_eq!(results.bar.percent, 50.0);
    assert_eq!(results.band, RiskBand::Medium);
    assert_eq!(results.is_phishing, Some(true));
    assert_eq!(results.timestamp.as_deref(), Some("2024-05-01T12:00:00"));
}

#[tokio::test]
async fn second_scan_replaces_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "url": "first.test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "first.test",
            "risk_score": 1,
            "checks": {
                "a": { "is_suspicious": false, "reasons": ["one"] },
                "b": { "is_suspicious": false, "reasons": ["two"] }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "url": "second.test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "second.test",
            "risk_score": 7,
            "checks": { "c": { "is_suspicious": true, "reasons": ["three"] } }
        })))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    controller.run_scan("first.test").await;
    assert_eq!(controller.page().results().unwrap().checks.len(), 2);

    controller.run_scan("second.test").await;
    let page = controller.page();
    let results = page.results().unwrap();
    assert_eq!(results.scanned_url, "second.test");
    assert_eq!(results.checks.len(), 1);
    assert_eq!(results.checks[0].title, "C");
    assert_eq!(results.band, RiskBand::High);
}

#[tokio::test]
async fn submit_returns_raw_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .respond_with(ResponseTemplate::new(418).set_body_string("teapot"))
        .mount(&server)
        .await;

    let service = assert_ok!(HttpScanService::new(&server.uri()));
    let reply = assert_ok!(
        service
            .submit(&url_scan::ScanRequest::new("example.com"))
            .await
    );
    assert_eq!(reply.status, 418);
    assert_eq!(reply.body, "teapot");
}

#[tokio::test]
async fn health_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-05-01T12:00:00"
        })))
        .mount(&server)
        .await;

    let service = assert_ok!(HttpScanService::new(&server.uri()));
    let health = assert_ok!(service.health().await);
    assert!(health.is_healthy());
    assert_eq!(health.timestamp.as_deref(), Some("2024-05-01T12:00:00"));
}

#[tokio::test]
async fn health_endpoint_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = assert_ok!(HttpScanService::new(&server.uri()));
    assert_err!(service.health().await);
}
