//! Domain types for the claim verification demo.
//!
//! This module contains the core data structures:
//! - Example: sample documents offered on the landing page
//! - Analysis: claims, evidence reports and verdicts returned by the service

pub mod analysis;
pub mod example;

// Re-export commonly used types
pub use analysis::{ClaimAnalysisResult, ClaimEntry, EvidenceReport, Report, Verdict};
pub use example::{Example, ExampleSet, FixtureError, EXAMPLES_FILE};

/// Maximum length of a submitted document, in characters
pub const MAX_TEXT_CHARS: usize = 10_000;
