//! sciclaims - Biomedical scientific claim verification demo
//!
//! A small web UI in front of a remote claim-verification service. The user
//! picks a sample document or pastes text; the service extracts claims and
//! judges each one against published abstracts; the page shows the verdicts
//! with the supporting or contradicting sentences highlighted in each abstract.
//!
//! # Modules
//!
//! - `adapters`: Claim analysis service client
//! - `config`: Config file and environment loading
//! - `core`: Per-session state (pressed flag, memoized results)
//! - `domain`: Data structures (Example, ClaimEntry, EvidenceReport)
//! - `evidence`: Span location and highlight rendering
//! - `web`: HTTP server and page rendering
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Start the web UI
//! sciclaims --config config.yaml serve
//!
//! # Analyze a document from the terminal
//! sciclaims analyze --input abstract.txt
//!
//! # List the sample documents
//! sciclaims examples
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod evidence;
pub mod web;

// Re-export main types at crate root for convenience
pub use adapters::{ClaimAnalyzer, ClaimsApiClient, ClaimsError};
pub use config::{ApiConfig, ConfigError, ResolvedConfig};
pub use crate::core::{SessionContext, SessionStore};
pub use domain::{ClaimAnalysisResult, ClaimEntry, EvidenceReport, Example, ExampleSet, Report, Verdict};
pub use evidence::Span;
