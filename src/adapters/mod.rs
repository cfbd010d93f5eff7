//! Adapter interfaces for external systems.
//!
//! The claim analysis service is the only external system. Handlers talk to it
//! through the [`ClaimAnalyzer`] trait so pages can be rendered against a stub.

pub mod claims_api;

use async_trait::async_trait;

use crate::domain::ClaimAnalysisResult;

// Re-export the HTTP adapter
pub use claims_api::{ClaimsApiClient, ClaimsError};

/// Trait for claim analysis backends
#[async_trait]
pub trait ClaimAnalyzer: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Identity of the backend, part of the memoization key
    fn endpoint(&self) -> &str;

    /// Extract claims from `text` and verify each against the literature
    async fn analyze(&self, text: &str) -> Result<ClaimAnalysisResult, ClaimsError>;
}
