//! HTTP handlers for the demo page.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::error::{InternalError, UrlencodedError};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::page::{render_page, AnalysisOutcome, PageView};
use super::AppState;
use crate::core::SESSION_COOKIE;
use crate::domain::MAX_TEXT_CHARS;

/// Query parameters for the landing page
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Selected example id; anything unparsable selects the first example
    pub example: Option<String>,
}

/// Analyze form body
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub example: Option<String>,
    pub text: String,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

fn parse_example(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse().ok())
}

/// Session id from the cookie, or a new session
fn session_id(req: &HttpRequest, state: &AppState) -> Uuid {
    let requested = req
        .cookie(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());
    state.sessions.resolve(requested)
}

fn page_response(session: Uuid, body: String) -> HttpResponse {
    let cookie = Cookie::build(SESSION_COOKIE, session.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();

    HttpResponse::Ok()
        .cookie(cookie)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn input_rejected(message: String) -> AnalysisOutcome {
    AnalysisOutcome::Failed {
        kind: "input".to_string(),
        message,
    }
}

/// Analyze `text` unless it is over the length limit
async fn run_analysis(state: &AppState, session: Uuid, text: &str) -> AnalysisOutcome {
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        tracing::debug!(session = %session, chars, "Rejected oversized text");
        return input_rejected(format!(
            "Text is {} characters long; the limit is {} characters",
            chars, MAX_TEXT_CHARS
        ));
    }

    match state
        .sessions
        .analyze_cached(session, state.analyzer.as_ref(), text)
        .await
    {
        Ok(result) => AnalysisOutcome::Completed(result),
        Err(e) => {
            tracing::warn!(
                session = %session,
                analyzer = state.analyzer.name(),
                kind = e.kind(),
                error = %e,
                "Claim analysis failed"
            );
            AnalysisOutcome::Failed {
                kind: e.kind().to_string(),
                message: e.to_string(),
            }
        }
    }
}

/// Landing page
///
/// The text area shows the text last submitted under the selected example,
/// or the example's own text. Once Analyze has been clicked in this session,
/// every render re-runs the analysis for the shown text (served from the
/// session memo when unchanged).
#[get("/")]
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> impl Responder {
    let session = session_id(&req, &state);
    let requested =
        parse_example(query.example.as_deref()).or_else(|| state.sessions.submitted_example(session));
    let selected = state.examples.select(requested);
    let text = state
        .sessions
        .submitted_text(session, selected.id)
        .unwrap_or_else(|| selected.text.clone());

    let outcome = if state.sessions.is_pressed(session) {
        Some(run_analysis(&state, session, &text).await)
    } else {
        None
    };

    let body = render_page(&PageView {
        examples: &state.examples,
        selected,
        text: &text,
        outcome,
    });
    page_response(session, body)
}

/// Analyze the submitted text and render the page with results
#[post("/analyze")]
pub async fn analyze(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<AnalyzeForm>,
) -> impl Responder {
    let session = session_id(&req, &state);
    state.sessions.press(session);

    let selected = state.examples.select(parse_example(form.example.as_deref()));
    state.sessions.submit(session, selected.id, &form.text);
    let outcome = run_analysis(&state, session, &form.text).await;

    let body = render_page(&PageView {
        examples: &state.examples,
        selected,
        text: &form.text,
        outcome: Some(outcome),
    });
    page_response(session, body)
}

/// Render an unreadable Analyze form as the page with an inline error
pub fn form_error(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected analyze form");

    let response = match req.app_data::<web::Data<AppState>>() {
        Some(state) => {
            let session = session_id(req, state);
            let selected = state.examples.first();
            let message = match &err {
                UrlencodedError::Overflow { .. } => format!(
                    "Text is too large; the limit is {} characters",
                    MAX_TEXT_CHARS
                ),
                other => format!("Could not read the submitted form: {}", other),
            };
            let body = render_page(&PageView {
                examples: &state.examples,
                selected,
                text: "",
                outcome: Some(input_rejected(message)),
            });
            page_response(session, body)
        }
        None => HttpResponse::BadRequest().body(err.to_string()),
    };

    InternalError::from_response(err, response).into()
}

/// Page icon from the resource directory
#[get("/favicon.png")]
pub async fn favicon(state: web::Data<AppState>) -> impl Responder {
    match tokio::fs::read(&state.favicon).await {
        Ok(bytes) => HttpResponse::Ok().content_type("image/png").body(bytes),
        Err(e) => {
            tracing::debug!(path = %state.favicon.display(), error = %e, "Favicon unavailable");
            HttpResponse::NotFound().finish()
        }
    }
}

/// Liveness probe endpoint
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
