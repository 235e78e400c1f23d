// Debounced player search.
//
// `SearchSession` is a pure state machine driven by the caller's clock: the
// orchestrator feeds it keystrokes, sleeps until `next_deadline()`, asks
// `poll_due()` for the lookup to issue, and hands the response back through
// `apply_result()`. Every issued lookup carries a generation number; only a
// response for the latest generation is applied.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::actions::ActionResult;
use crate::models::PlayerSearchResult;

/// A lookup the caller should perform now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    debounce: Duration,
    query: String,
    deadline: Option<Instant>,
    results: Vec<PlayerSearchResult>,
    error: Option<String>,
    /// Generation of the most recently issued (or invalidated) lookup.
    generation: u64,
    in_flight: bool,
}

impl SearchSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            query: String::new(),
            deadline: None,
            results: Vec::new(),
            error: None,
            generation: 0,
            in_flight: false,
        }
    }

    /// Record a new value of the search box.
    pub fn on_input(&mut self, query: impl Into<String>, now: Instant) {
        self.query = query.into();
        if self.query.trim().is_empty() {
            self.deadline = None;
            self.results.clear();
            self.error = None;
            self.in_flight = false;
            // Anything still in flight belongs to an older query.
            self.generation += 1;
            return;
        }
        self.deadline = Some(now + self.debounce);
    }

    /// When the pending lookup becomes due, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Issue the pending lookup once its deadline has passed.
    pub fn poll_due(&mut self, now: Instant) -> Option<LookupRequest> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.generation += 1;
                self.in_flight = true;
                let query = self.query.trim().to_string();
                debug!("Issuing search #{} for {:?}", self.generation, query);
                Some(LookupRequest {
                    generation: self.generation,
                    query,
                })
            }
            _ => None,
        }
    }

    /// Apply a lookup response. Returns `false` (and changes nothing) when
    /// the response belongs to a superseded lookup.
    pub fn apply_result(
        &mut self,
        generation: u64,
        result: ActionResult<Vec<PlayerSearchResult>>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                "Discarding stale search response #{} (latest #{})",
                generation, self.generation
            );
            return false;
        }
        self.in_flight = false;
        match result {
            Ok(results) => {
                self.results = results;
                self.error = None;
            }
            Err(e) => {
                self.results.clear();
                self.error = Some(e.message);
            }
        }
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[PlayerSearchResult] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
