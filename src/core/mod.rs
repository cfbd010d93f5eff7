//! Core request-independent state.
//!
//! This module contains:
//! - Session: per-session pressed flag, submitted text and memoized analysis results

pub mod session;

// Re-export commonly used types
pub use session::{memo_key, SessionContext, SessionStore, SubmittedText, SESSION_COOKIE};
