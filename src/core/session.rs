//! Per-session state for the web UI.
//!
//! Each browser session carries three things across page renders:
//! - the "pressed" flag, set once the user clicks Analyze, which keeps the
//!   results visible on later renders
//! - the text last submitted for analysis, kept while the same example stays
//!   selected
//! - a memo of analysis results keyed by (endpoint, text)
//!
//! Sessions live in memory only and are dropped after a period of inactivity.
//! The number of sessions and the memo size per session are both bounded.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::adapters::{ClaimAnalyzer, ClaimsError};
use crate::domain::ClaimAnalysisResult;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "sciclaims_session";

/// Upper bound on the idle timeout (one year)
const MAX_IDLE_MINUTES: u64 = 365 * 24 * 60;

/// Memo key for an analysis request (first 16 hex chars of SHA256)
pub fn memo_key(endpoint: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(endpoint.as_bytes());
    hasher.update(b"\n");
    hasher.update(text.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

/// Text the user submitted, tied to the example that was selected at the time
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedText {
    pub example: i64,
    pub text: String,
}

/// State of one browser session
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Whether Analyze has been clicked in this session
    pub pressed: bool,
    /// Last text sent through the Analyze form
    pub submitted: Option<SubmittedText>,
    memo: HashMap<String, ClaimAnalysisResult>,
    /// Memo keys, oldest first
    memo_order: VecDeque<String>,
    last_seen: DateTime<Utc>,
}

impl SessionContext {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            pressed: false,
            submitted: None,
            memo: HashMap::new(),
            memo_order: VecDeque::new(),
            last_seen: now,
        }
    }

    /// Store a result, evicting the oldest entries beyond `limit`
    fn remember(&mut self, key: String, result: ClaimAnalysisResult, limit: usize) {
        if self.memo.insert(key.clone(), result).is_none() {
            self.memo_order.push_back(key);
        }
        while self.memo_order.len() > limit {
            if let Some(oldest) = self.memo_order.pop_front() {
                self.memo.remove(&oldest);
            }
        }
    }
}

/// In-memory session registry
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionContext>>,
    idle_timeout: Duration,
    max_sessions: usize,
    max_memo_entries: usize,
}

impl SessionStore {
    /// Live sessions kept before the least recently seen one is evicted
    pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
    /// Memoized results kept per session
    pub const DEFAULT_MAX_MEMO_ENTRIES: usize = 32;

    pub fn new(idle_minutes: u64) -> Self {
        Self::with_limits(
            idle_minutes,
            Self::DEFAULT_MAX_SESSIONS,
            Self::DEFAULT_MAX_MEMO_ENTRIES,
        )
    }

    pub fn with_limits(idle_minutes: u64, max_sessions: usize, max_memo_entries: usize) -> Self {
        let minutes = idle_minutes.min(MAX_IDLE_MINUTES) as i64;
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: Duration::minutes(minutes),
            max_sessions: max_sessions.max(1),
            max_memo_entries: max_memo_entries.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionContext>> {
        // A panic while holding the lock cannot leave a session half-written
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return the live session for `id`, or start a new one
    ///
    /// Idle sessions are pruned first, so an expired id gets a fresh session.
    /// At capacity, the least recently seen session makes room.
    pub fn resolve(&self, id: Option<Uuid>) -> Uuid {
        let now = Utc::now();
        self.prune_idle(now);

        let mut sessions = self.lock();
        if let Some(id) = id {
            if let Some(ctx) = sessions.get_mut(&id) {
                ctx.last_seen = now;
                return id;
            }
        }

        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, ctx)| ctx.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                    tracing::debug!(session = %oldest, "Evicted least recently seen session");
                }
                None => break,
            }
        }

        let id = Uuid::new_v4();
        sessions.insert(id, SessionContext::new(now));
        tracing::debug!(session = %id, active = sessions.len(), "Started session");
        id
    }

    /// Drop sessions not seen since `now - idle_timeout`
    pub fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, ctx| now - ctx.last_seen <= self.idle_timeout);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, active = sessions.len(), "Pruned idle sessions");
        }
        pruned
    }

    fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut SessionContext) -> R) -> R {
        let now = Utc::now();
        let mut sessions = self.lock();
        let ctx = sessions
            .entry(id)
            .or_insert_with(|| SessionContext::new(now));
        ctx.last_seen = now;
        f(ctx)
    }

    /// Snapshot of a session's state
    pub fn get(&self, id: Uuid) -> Option<SessionContext> {
        self.lock().get(&id).cloned()
    }

    pub fn is_pressed(&self, id: Uuid) -> bool {
        self.lock().get(&id).map(|ctx| ctx.pressed).unwrap_or(false)
    }

    /// Record that Analyze was clicked
    pub fn press(&self, id: Uuid) {
        self.with_session(id, |ctx| ctx.pressed = true);
    }

    /// Record the text sent through the Analyze form
    pub fn submit(&self, id: Uuid, example: i64, text: &str) {
        self.with_session(id, |ctx| {
            ctx.submitted = Some(SubmittedText {
                example,
                text: text.to_string(),
            })
        });
    }

    /// Example the last submission was made under
    pub fn submitted_example(&self, id: Uuid) -> Option<i64> {
        self.lock()
            .get(&id)
            .and_then(|ctx| ctx.submitted.as_ref())
            .map(|s| s.example)
    }

    /// Submitted text to show for `example`
    ///
    /// A different example discards the submission, so the text area falls
    /// back to that example's own text.
    pub fn submitted_text(&self, id: Uuid, example: i64) -> Option<String> {
        self.with_session(id, |ctx| match &ctx.submitted {
            Some(s) if s.example == example => Some(s.text.clone()),
            Some(_) => {
                ctx.submitted = None;
                None
            }
            None => None,
        })
    }

    /// Analyze `text`, reusing this session's memoized result when present
    ///
    /// Only successful results are memoized. The lock is not held while the
    /// analyzer runs.
    pub async fn analyze_cached(
        &self,
        id: Uuid,
        analyzer: &dyn ClaimAnalyzer,
        text: &str,
    ) -> Result<ClaimAnalysisResult, ClaimsError> {
        let key = memo_key(analyzer.endpoint(), text);

        if let Some(hit) = self.with_session(id, |ctx| ctx.memo.get(&key).cloned()) {
            tracing::debug!(session = %id, key = %key, "Claim analysis memo hit");
            return Ok(hit);
        }

        let result = analyzer.analyze(text).await?;
        let limit = self.max_memo_entries;
        self.with_session(id, |ctx| ctx.remember(key, result.clone(), limit));
        Ok(result)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
