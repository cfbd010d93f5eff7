//! Web UI Integration Tests
//!
//! Drives the actix app with a stub analyzer: session cookie handling, the
//! persistent "pressed" state, memoization and inline error reporting.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{test, web, App};
use async_trait::async_trait;

use sciclaims::core::{SessionStore, SESSION_COOKIE};
use sciclaims::domain::{ClaimAnalysisResult, ClaimEntry, EvidenceReport, Example, ExampleSet, Report};
use sciclaims::web::{configure, AppState};
use sciclaims::{ClaimAnalyzer, ClaimsError, Verdict};

const ABSTRACT: &str = "Studies show Aspirin reduces inflammation. More research needed.";

/// Analyzer that counts calls and either succeeds or fails
struct StubAnalyzer {
    calls: AtomicUsize,
    verdict: &'static str,
    fail: bool,
}

impl StubAnalyzer {
    fn ok(verdict: &'static str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            verdict,
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            verdict: "SUPPORT",
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClaimAnalyzer for StubAnalyzer {
    fn name(&self) -> &str {
        "stub"
    }

    fn endpoint(&self) -> &str {
        "stub://claims"
    }

    async fn analyze(&self, text: &str) -> Result<ClaimAnalysisResult, ClaimsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ClaimsError::Transport("connection refused".to_string()));
        }

        Ok(vec![ClaimEntry {
            claim: format!("Claim from: {}", text),
            claim_analysis: vec![EvidenceReport {
                original_id: "10.1000/xyz123".to_string(),
                title: "Aspirin and inflammation".to_string(),
                abstract_text: ABSTRACT.to_string(),
                report: Report {
                    response: Verdict::from(self.verdict),
                    confidence: 87.0,
                    rationale: "Stated directly.".to_string(),
                    evidence: vec!["Aspirin reduces inflammation.".to_string()],
                },
            }],
        }])
    }
}

fn examples() -> ExampleSet {
    ExampleSet::new(vec![
        Example {
            id: 1,
            topic: "health".to_string(),
            source_type: "news".to_string(),
            title: "Aspirin".to_string(),
            doc_source: "https://news.example.org/1".to_string(),
            text: "Aspirin reduces inflammation.".to_string(),
        },
        Example {
            id: 2,
            topic: "covid".to_string(),
            source_type: "tweet".to_string(),
            title: "Masks".to_string(),
            doc_source: "https://news.example.org/2".to_string(),
            text: "Masks reduce transmission.".to_string(),
        },
    ])
    .unwrap()
}

fn state(analyzer: Arc<StubAnalyzer>) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        examples(),
        analyzer,
        SessionStore::new(60),
        PathBuf::from("/nonexistent/favicon-1.png"),
    ))
}

fn session_cookie(resp: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("session cookie set")
}

fn body_text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[actix_web::test]
async fn test_landing_page_before_analyze() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert!(resp.status().is_success());
    let cookie = session_cookie(&resp);
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));

    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("Example 1 (health-news): Aspirin"));
    assert!(body.contains("Example 2 (covid-tweet): Masks"));
    assert!(body.contains(">Aspirin reduces inflammation.</textarea>"));
    assert!(!body.contains("CLAIM ANALYSIS"));
    assert_eq!(analyzer.calls(), 0);
}

#[actix_web::test]
async fn test_example_selection() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/?example=2").to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains("<option value=\"2\" selected>"));
    assert!(body.contains(">Masks reduce transmission.</textarea>"));
    assert!(body.contains("href=\"https://news.example.org/2\""));
}

#[actix_web::test]
async fn test_unparsable_example_selects_first() {
    let app = test::init_service(
        App::new()
            .app_data(state(StubAnalyzer::ok("SUPPORT")))
            .configure(configure),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?example=abc").to_request()).await;
    assert!(resp.status().is_success());
    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("<option value=\"1\" selected>"));
    assert!(body.contains(">Aspirin reduces inflammation.</textarea>"));
}

#[actix_web::test]
async fn test_analyze_renders_highlighted_results() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1"), ("text", "Aspirin reduces inflammation.")])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains("CLAIM ANALYSIS"));
    assert!(body.contains("<summary>Claim from: Aspirin reduces inflammation.</summary>"));
    assert!(body.contains("<b>SUPPORT</b>"));
    assert!(body.contains("width: 87%; background: green;"));
    assert!(body.contains(
        "Studies show  <span style='color:white;background-color:green; border-radius:.25rem;padding:.2em'>Aspirin reduces inflammation.</span>  More research needed."
    ));
    assert!(body.contains("https://doi.org/10.1000/xyz123"));
    assert_eq!(analyzer.calls(), 1);
}

#[actix_web::test]
async fn test_contradicting_verdict_is_red() {
    let analyzer = StubAnalyzer::ok("CONTRADICT");
    let app = test::init_service(App::new().app_data(state(analyzer)).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1"), ("text", "x")])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains("<b>CONTRADICT</b>"));
    assert!(body.contains("background-color:red"));
}

#[actix_web::test]
async fn test_results_persist_and_are_memoized() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1"), ("text", "Aspirin reduces inflammation.")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);
    assert_eq!(analyzer.calls(), 1);

    // A later render of the same example keeps showing results from the memo
    let req = test::TestRequest::get()
        .uri("/?example=1")
        .cookie(cookie.clone())
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains("CLAIM ANALYSIS"));
    assert_eq!(analyzer.calls(), 1);

    // Switching example re-analyzes the new text
    let req = test::TestRequest::get()
        .uri("/?example=2")
        .cookie(cookie.clone())
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains("Claim from: Masks reduce transmission."));
    assert_eq!(analyzer.calls(), 2);

    // A different session starts unpressed
    let req = test::TestRequest::get().uri("/").to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(!body.contains("CLAIM ANALYSIS"));
    assert_eq!(analyzer.calls(), 2);
}

#[actix_web::test]
async fn test_transport_failure_shown_inline() {
    let analyzer = StubAnalyzer::failing();
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1"), ("text", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("data-kind=\"transport\""));
    assert!(body.contains("connection refused"));
    assert!(!body.contains("CLAIM ANALYSIS"));
    assert_eq!(analyzer.calls(), 1);
}

#[actix_web::test]
async fn test_oversized_text_rejected_without_calling_service() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let long_text = "a".repeat(10_001);
    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1"), ("text", long_text.as_str())])
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);

    assert!(body.contains("data-kind=\"input\""));
    assert!(body.contains("the limit is 10000 characters"));
    assert_eq!(analyzer.calls(), 0);
}

#[actix_web::test]
async fn test_non_ascii_text_at_limit_is_analyzed() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let text: String = "β-blockers, (n=12); ".chars().cycle().take(10_000).collect();
    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1"), ("text", text.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("CLAIM ANALYSIS"));
    assert!(!body.contains("class=\"error\""));
    assert_eq!(analyzer.calls(), 1);
}

#[actix_web::test]
async fn test_form_over_byte_limit_shown_inline() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let text = "€".repeat(20_000);
    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1"), ("text", text.as_str())])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(!session_cookie(&resp).value().is_empty());

    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("data-kind=\"input\""));
    assert!(body.contains("Text is too large"));
    assert_eq!(analyzer.calls(), 0);
}

#[actix_web::test]
async fn test_malformed_form_shown_inline() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = body_text(&test::read_body(resp).await);
    assert!(body.contains("data-kind=\"input\""));
    assert_eq!(analyzer.calls(), 0);
}

#[actix_web::test]
async fn test_submitted_text_survives_reload() {
    let analyzer = StubAnalyzer::ok("SUPPORT");
    let app = test::init_service(App::new().app_data(state(analyzer.clone())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/analyze")
        .set_form([("example", "1"), ("text", "My own abstract.")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = session_cookie(&resp);
    assert_eq!(analyzer.calls(), 1);

    // Reload keeps the user's text and its results without a new call
    for uri in ["/", "/?example=1"] {
        let req = test::TestRequest::get().uri(uri).cookie(cookie.clone()).to_request();
        let body = body_text(&test::call_and_read_body(&app, req).await);
        assert!(body.contains(">My own abstract.</textarea>"));
        assert!(!body.contains(">Aspirin reduces inflammation.</textarea>"));
        assert!(body.contains("<summary>Claim from: My own abstract.</summary>"));
        assert_eq!(analyzer.calls(), 1);
    }

    // Changing the selection resets the text area to the example
    let req = test::TestRequest::get()
        .uri("/?example=2")
        .cookie(cookie.clone())
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains(">Masks reduce transmission.</textarea>"));
    assert_eq!(analyzer.calls(), 2);

    let req = test::TestRequest::get()
        .uri("/?example=1")
        .cookie(cookie)
        .to_request();
    let body = body_text(&test::call_and_read_body(&app, req).await);
    assert!(body.contains(">Aspirin reduces inflammation.</textarea>"));
    assert_eq!(analyzer.calls(), 3);
}

#[actix_web::test]
async fn test_missing_favicon_is_not_found() {
    let app = test::init_service(
        App::new()
            .app_data(state(StubAnalyzer::ok("SUPPORT")))
            .configure(configure),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/favicon.png").to_request()).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_liveness() {
    let app = test::init_service(
        App::new()
            .app_data(state(StubAnalyzer::ok("SUPPORT")))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health/live").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
