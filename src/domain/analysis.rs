//! Claim analysis result types
//!
//! These types mirror the JSON returned by the claim analysis service: an
//! array of claims, each with one report per evidence abstract.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Base URL for evidence source links
pub const DOI_BASE_URL: &str = "https://doi.org";

/// Full response body of the claim analysis service
pub type ClaimAnalysisResult = Vec<ClaimEntry>;

/// One extracted claim and its evidence reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimEntry {
    /// The claim text extracted from the submitted document
    pub claim: String,

    /// Reports in service order
    pub claim_analysis: Vec<EvidenceReport>,
}

/// Verdict of one claim against one abstract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceReport {
    /// DOI of the source publication (numbers are kept as their text)
    #[serde(deserialize_with = "deserialize_original_id")]
    pub original_id: String,

    pub title: String,

    #[serde(rename = "abstract")]
    pub abstract_text: String,

    pub report: Report,
}

impl EvidenceReport {
    /// Link to the source publication
    pub fn source_url(&self) -> String {
        format!("{}/{}", DOI_BASE_URL, self.original_id)
    }
}

/// The model's judgement for one claim/abstract pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub response: Verdict,

    /// Confidence percentage, 0-100
    pub confidence: f64,

    pub rationale: String,

    /// Abstract sentences the verdict relies on
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl Report {
    /// Confidence clamped to the 0-100 range used for bar widths
    pub fn confidence_percent(&self) -> f64 {
        self.confidence.clamp(0.0, 100.0)
    }
}

/// Verdict label returned by the service
///
/// Unknown labels are preserved verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Support,
    Contradict,
    Other(String),
}

impl Verdict {
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Support => "SUPPORT",
            Verdict::Contradict => "CONTRADICT",
            Verdict::Other(label) => label,
        }
    }

    /// Highlight and indicator color: green for SUPPORT, red for anything else
    pub fn color(&self) -> &'static str {
        if matches!(self, Verdict::Support) {
            "green"
        } else {
            "red"
        }
    }
}

impl From<String> for Verdict {
    fn from(label: String) -> Self {
        match label.as_str() {
            "SUPPORT" => Verdict::Support,
            "CONTRADICT" => Verdict::Contradict,
            _ => Verdict::Other(label),
        }
    }
}

impl From<&str> for Verdict {
    fn from(label: &str) -> Self {
        Verdict::from(label.to_string())
    }
}

impl From<Verdict> for String {
    fn from(verdict: Verdict) -> Self {
        verdict.as_str().to_string()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_original_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
