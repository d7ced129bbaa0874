//! Resolution outcome and the per-adapter attempt log

use std::fmt;

use serde::Serialize;

use super::PlaceContext;

/// Where a pipeline run ended up.
///
/// `NotStarted -> TryingSource(i) -> Succeeded(i) | Exhausted`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum PipelineState {
    NotStarted,
    TryingSource(usize),
    Succeeded(usize),
    Exhausted,
}

impl PipelineState {
    /// Move on to the next adapter; settled states stay put
    #[must_use]
    pub fn advance(self) -> Self {
        match self {
            PipelineState::NotStarted => PipelineState::TryingSource(0),
            PipelineState::TryingSource(index) => PipelineState::TryingSource(index + 1),
            settled => settled,
        }
    }

    /// Settle on the adapter currently being tried
    #[must_use]
    pub fn succeed(self) -> Self {
        match self {
            PipelineState::TryingSource(index) => PipelineState::Succeeded(index),
            other => other,
        }
    }
}

/// What one adapter invocation produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptStatus {
    Found { count: usize },
    NotFound,
    /// Adapter returned items but none survived validation
    Invalid { discarded: usize },
    Skipped { reason: String },
    Failed { reason: String },
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub source: &'static str,
    #[serde(flatten)]
    pub status: AttemptStatus,
}

impl Attempt {
    #[must_use]
    pub fn new(source: &'static str, status: AttemptStatus) -> Self {
        Self { source, status }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            AttemptStatus::Failed { .. } | AttemptStatus::TimedOut
        )
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            AttemptStatus::Found { count } => write!(f, "{}: found {count}", self.source),
            AttemptStatus::NotFound => write!(f, "{}: nothing found", self.source),
            AttemptStatus::Invalid { discarded } => {
                write!(f, "{}: {discarded} invalid items discarded", self.source)
            }
            AttemptStatus::Skipped { reason } => write!(f, "{}: skipped ({reason})", self.source),
            AttemptStatus::Failed { reason } => write!(f, "{}: failed ({reason})", self.source),
            AttemptStatus::TimedOut => write!(f, "{}: timed out", self.source),
        }
    }
}

/// Final, deduplicated and limit-capped result of one pipeline run
#[derive(Debug, Clone)]
pub struct Resolution<C> {
    pub state: PipelineState,
    pub place: Option<PlaceContext>,
    pub items: Vec<C>,
    /// Tag of the adapter whose items were accepted
    pub source: Option<&'static str>,
    pub attempts: Vec<Attempt>,
}

impl<C> Resolution<C> {
    #[must_use]
    pub fn succeeded(
        state: PipelineState,
        source: &'static str,
        place: Option<PlaceContext>,
        items: Vec<C>,
        attempts: Vec<Attempt>,
    ) -> Self {
        Self {
            state: state.succeed(),
            place,
            items,
            source: Some(source),
            attempts,
        }
    }

    #[must_use]
    pub fn exhausted(attempts: Vec<Attempt>) -> Self {
        Self {
            state: PipelineState::Exhausted,
            place: None,
            items: Vec::new(),
            source: None,
            attempts,
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == PipelineState::Exhausted
    }

    /// Any adapter errored or ran out of time before the outcome was decided
    #[must_use]
    pub fn had_failures(&self) -> bool {
        self.attempts.iter().any(Attempt::is_failure)
    }

    /// Number of adapters that were actually invoked
    #[must_use]
    pub fn sources_tried(&self) -> usize {
        self.attempts.len()
    }
}
