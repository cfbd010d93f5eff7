//! HTML rendering for the demo page.
//!
//! Everything that comes from the user or the analysis service is escaped;
//! the only raw markup inserted is the highlight tags around evidence spans.

use crate::domain::{ClaimAnalysisResult, ClaimEntry, EvidenceReport, Example, ExampleSet, MAX_TEXT_CHARS};
use crate::evidence::{escape_html, locate, render_escaped};

pub const TITLE: &str = "SciClaims: Biomedical Scientific Claim Verification";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1200px; padding: 1rem 2rem; }
.big-font { font-size: 32px; }
.m-font { font-size: 18px; }
select, textarea { width: 100%; box-sizing: border-box; font-size: 16px; }
textarea { height: 210px; }
button.analyze { width: 100%; padding: .6em; font-size: 18px; margin-top: .5em; }
details.claim { border: 1px solid #ddd; border-radius: .5rem; margin-bottom: 1rem; padding: .5rem 1rem; }
details.claim > summary { font-size: 24px; cursor: pointer; }
.columns { display: flex; gap: 2rem; }
.columns > div { flex: 1; }
.verdict-square { display: inline-block; width: 1em; height: 1em; vertical-align: middle; }
.confidencebar { width: 20%; margin-bottom: 15px; background-color: #ddd; }
.confidence { text-align: center; padding-top: 5px; padding-bottom: 5px; color: white; }
.error { border: 1px solid #c00; background: #fee; padding: 1rem; border-radius: .5rem; }
"#;

/// Result of the analysis step, if it ran on this render
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Completed(ClaimAnalysisResult),
    Failed { kind: String, message: String },
}

/// Everything needed to render the page once
pub struct PageView<'a> {
    pub examples: &'a ExampleSet,
    pub selected: &'a Example,
    /// Contents of the text area
    pub text: &'a str,
    pub outcome: Option<AnalysisOutcome>,
}

/// Render the whole page
pub fn render_page(view: &PageView<'_>) -> String {
    let mut out = String::with_capacity(16 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(TITLE)));
    out.push_str("<link rel=\"icon\" type=\"image/png\" href=\"/favicon.png\">\n");
    out.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    out.push_str(&format!("<h1>{}</h1>\n<hr>\n", escape_html(TITLE)));
    out.push_str(
        "<p class=\"big-font\">Select one of the sample documents below or try your own text. \
         Then, click <b>ANALYZE</b></p>\n",
    );

    render_selector(view, &mut out);
    render_input(view, &mut out);

    match &view.outcome {
        Some(AnalysisOutcome::Completed(result)) => render_results(result, &mut out),
        Some(AnalysisOutcome::Failed { kind, message }) => render_error(kind, message, &mut out),
        None => {}
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_selector(view: &PageView<'_>, out: &mut String) {
    out.push_str("<form method=\"get\" action=\"/\">\n");
    out.push_str("<select name=\"example\" onchange=\"this.form.submit()\">\n");
    for example in view.examples.iter() {
        let selected = if example.id == view.selected.id {
            " selected"
        } else {
            ""
        };
        out.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            example.id,
            selected,
            escape_html(&example.label())
        ));
    }
    out.push_str("</select>\n<noscript><button type=\"submit\">Load</button></noscript>\n</form>\n");
    out.push_str(&format!(
        "<p><em><a href=\"{}\">source</a></em></p>\n",
        escape_html(&view.selected.doc_source)
    ));
}

fn render_input(view: &PageView<'_>, out: &mut String) {
    out.push_str("<form method=\"post\" action=\"/analyze\">\n");
    out.push_str(&format!(
        "<input type=\"hidden\" name=\"example\" value=\"{}\">\n",
        view.selected.id
    ));
    out.push_str(&format!(
        "<textarea name=\"text\" maxlength=\"{}\">{}</textarea>\n",
        MAX_TEXT_CHARS,
        escape_html(view.text)
    ));
    out.push_str("<button type=\"submit\" class=\"analyze\">Analyze</button>\n</form>\n");
}

fn render_error(kind: &str, message: &str, out: &mut String) {
    out.push_str(&format!(
        "<div class=\"error\" data-kind=\"{}\"><b>Claim analysis failed</b>: {}</div>\n",
        escape_html(kind),
        escape_html(message)
    ));
}

/// Render all claims as collapsible sections
pub fn render_results(result: &ClaimAnalysisResult, out: &mut String) {
    out.push_str(
        "<p class=\"big-font\" style=\"text-align: center;\">&#128202; <b>CLAIM ANALYSIS</b></p>\n",
    );

    if result.is_empty() {
        out.push_str("<p>No claims were found in this text.</p>\n");
        return;
    }

    for entry in result {
        render_claim(entry, out);
    }
}

fn render_claim(entry: &ClaimEntry, out: &mut String) {
    out.push_str(&format!(
        "<details class=\"claim\">\n<summary>{}</summary>\n",
        escape_html(&entry.claim)
    ));
    for report in &entry.claim_analysis {
        render_report(report, out);
    }
    out.push_str("</details>\n");
}

/// Render one evidence report: verdict, confidence, rationale, source and the
/// highlighted abstract
pub fn render_report(report: &EvidenceReport, out: &mut String) {
    let verdict = &report.report.response;
    let color = verdict.color();
    let confidence = report.report.confidence;
    let source_url = escape_html(&report.source_url());

    out.push_str("<hr>\n<div class=\"columns\">\n<div>\n");
    out.push_str(&format!(
        "<p><span class=\"verdict-square\" style=\"background: {}\"></span> <b>{}</b></p>\n",
        color,
        escape_html(verdict.as_str())
    ));
    out.push_str(&format!(
        "<b>Prediction score: </b>\n<div class=\"confidencebar\">\n\
         <div class=\"confidence\" style=\"width: {}%; background: {};\">{}%</div>\n</div>\n",
        report.report.confidence_percent(),
        color,
        confidence
    ));
    out.push_str(&format!(
        "<p class=\"m-font\"><b>Rationale</b>: {}</p>\n",
        escape_html(&report.report.rationale)
    ));
    out.push_str(&format!(
        "<p><a href=\"{0}\">{0}</a></p>\n</div>\n<div>\n",
        source_url
    ));

    let (starts, ends) = locate(&report.report.evidence, &report.abstract_text);
    let highlighted = render_escaped(&starts, &ends, &report.abstract_text, color);
    out.push_str(&format!("<p>{}</p>\n", escape_html(&report.title)));
    out.push_str(&format!("<div class=\"abstract\">{}</div>\n", highlighted));
    out.push_str("</div>\n</div>\n");
}
