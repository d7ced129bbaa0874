//! Cascading resolution pipeline
//!
//! A [`Pipeline`] holds an ordered list of [`Provider`]s for one entity kind
//! and tries them one at a time. The first provider whose normalized result
//! is non-empty wins and nothing after it runs. Providers never return
//! errors: "not found", "no credential" and "the service is down" are all
//! outcomes the pipeline records before moving on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::models::{Attempt, AttemptStatus, PipelineState, PlaceContext, Query, Resolution};
use crate::normalize::{Candidate, normalize};

/// Items an adapter found, plus the entity they describe when known.
#[derive(Debug, Clone)]
pub struct Findings<C> {
    pub place: Option<PlaceContext>,
    pub items: Vec<C>,
}

impl<C> Findings<C> {
    #[must_use]
    pub fn new(items: Vec<C>) -> Self {
        Self { place: None, items }
    }

    #[must_use]
    pub fn with_place(mut self, place: Option<PlaceContext>) -> Self {
        self.place = place;
        self
    }
}

/// Result of one adapter invocation
#[derive(Debug, Clone)]
pub enum SourceOutcome<C> {
    Found(Findings<C>),
    NotFound,
    /// The adapter cannot run (missing credential, disabled, query lacks a
    /// field it needs); no network I/O happened.
    Skipped(String),
    /// Network failure, non-2xx status or malformed payload
    Failed(String),
}

impl<C> SourceOutcome<C> {
    /// Collapse an adapter's internal result into an outcome, logging the
    /// cause of any failure.
    pub fn from_result(source: &str, result: anyhow::Result<Findings<C>>) -> Self {
        match result {
            Ok(findings) if findings.items.is_empty() => {
                debug!(source, "provider returned no results");
                SourceOutcome::NotFound
            }
            Ok(findings) => SourceOutcome::Found(findings),
            Err(e) => {
                warn!(source, error = %format!("{e:#}"), "provider failed, treating as empty");
                SourceOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        SourceOutcome::Skipped(reason.into())
    }
}

/// One external data source wrapped behind a normalized contract.
#[async_trait]
pub trait Provider<C: Candidate>: Send + Sync {
    /// Tag reported as the result source, e.g. `"Wikipedia"`
    fn source(&self) -> &'static str;

    async fn search(&self, query: &Query) -> SourceOutcome<C>;
}

/// Ordered, short-circuiting sequence of providers for one entity kind
pub struct Pipeline<C: Candidate> {
    name: &'static str,
    providers: Vec<Arc<dyn Provider<C>>>,
    adapter_timeout: Duration,
}

impl<C: Candidate> Pipeline<C> {
    #[must_use]
    pub fn new(name: &'static str, adapter_timeout: Duration) -> Self {
        Self {
            name,
            providers: Vec::new(),
            adapter_timeout,
        }
    }

    /// Append a provider; earlier providers take priority.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn Provider<C>>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Provider tags in priority order
    #[must_use]
    pub fn sources(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Try each provider in order and return the first non-empty, valid set.
    ///
    /// Never fails: when every provider comes back empty the outcome is
    /// [`Resolution::exhausted`].
    pub async fn resolve(&self, query: &Query) -> Resolution<C> {
        let mut attempts = Vec::with_capacity(self.providers.len());
        let mut state = PipelineState::NotStarted;

        for provider in &self.providers {
            state = state.advance();
            let source = provider.source();
            debug!(pipeline = self.name, ?state, source, "trying source");

            let outcome =
                match tokio::time::timeout(self.adapter_timeout, provider.search(query)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(
                            pipeline = self.name,
                            source,
                            timeout_ms = self.adapter_timeout.as_millis() as u64,
                            "provider timed out"
                        );
                        attempts.push(Attempt::new(source, AttemptStatus::TimedOut));
                        continue;
                    }
                };

            let status = match outcome {
                SourceOutcome::Found(findings) => {
                    let received = findings.items.len();
                    let items = normalize(findings.items, query.limit());
                    if items.is_empty() {
                        AttemptStatus::Invalid {
                            discarded: received,
                        }
                    } else {
                        attempts.push(Attempt::new(
                            source,
                            AttemptStatus::Found { count: items.len() },
                        ));
                        info!(
                            pipeline = self.name,
                            source,
                            count = items.len(),
                            discarded = received - items.len(),
                            "resolved"
                        );
                        return Resolution::succeeded(
                            state,
                            source,
                            findings.place,
                            items,
                            attempts,
                        );
                    }
                }
                SourceOutcome::NotFound => AttemptStatus::NotFound,
                SourceOutcome::Skipped(reason) => AttemptStatus::Skipped { reason },
                SourceOutcome::Failed(reason) => AttemptStatus::Failed { reason },
            };
            attempts.push(Attempt::new(source, status));
        }

        info!(
            pipeline = self.name,
            tried = attempts.len(),
            "all sources exhausted"
        );
        Resolution::exhausted(attempts)
    }
}
