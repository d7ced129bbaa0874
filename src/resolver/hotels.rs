use serde::Serialize;
use tracing::{info, instrument};

use crate::config::TripScoutConfig;
use crate::http::HttpClient;
use crate::models::{HotelItem, Query, Resolution};
use crate::pipeline::Pipeline;
use crate::providers::{hotel_pipeline, synthetic};

pub const FALLBACK: &str = "Fallback";
pub const FALLBACK_AFTER_ERROR: &str = "Fallback (Error)";
pub const NO_SOURCE: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelResolution {
    pub hotels: Vec<HotelItem>,
    /// `"Booking.com"`, `"Fallback"`, `"Fallback (Error)"` or `"None"`
    pub source: &'static str,
}

pub struct HotelResolver {
    pipeline: Pipeline<HotelItem>,
}

impl HotelResolver {
    pub fn new(pipeline: Pipeline<HotelItem>) -> Self {
        Self { pipeline }
    }

    pub fn from_config(config: &TripScoutConfig, client: &HttpClient) -> Self {
        Self::new(hotel_pipeline(config, client))
    }

    #[instrument(name = "resolve_hotels", skip_all, fields(destination = query.name()))]
    pub async fn resolve(&self, query: &Query) -> HotelResolution {
        let resolution = self.pipeline.resolve(query).await;
        let source = source_tag(&resolution);
        if resolution.source == Some(synthetic::SOURCE) {
            info!(source, attempts = resolution.sources_tried(), "serving placeholder hotels");
        }
        HotelResolution {
            hotels: resolution.items,
            source,
        }
    }
}

/// Caller-facing tag: placeholder results say whether a live source broke
fn source_tag(resolution: &Resolution<HotelItem>) -> &'static str {
    match resolution.source {
        Some(synthetic::SOURCE) if resolution.had_failures() => FALLBACK_AFTER_ERROR,
        Some(synthetic::SOURCE) => FALLBACK,
        Some(source) => source,
        None => NO_SOURCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attempt, AttemptStatus, PipelineState};

    fn synthetic_win(first: AttemptStatus) -> Resolution<HotelItem> {
        Resolution::succeeded(
            PipelineState::TryingSource(1),
            synthetic::SOURCE,
            None,
            synthetic::generate_hotels("Paris", 2),
            vec![
                Attempt::new("Booking.com", first),
                Attempt::new(synthetic::SOURCE, AttemptStatus::Found { count: 2 }),
            ],
        )
    }

    #[test]
    fn test_source_tag_after_failure() {
        let resolution = synthetic_win(AttemptStatus::Failed {
            reason: "Request failed".to_string(),
        });
        assert_eq!(source_tag(&resolution), FALLBACK_AFTER_ERROR);
        assert_eq!(source_tag(&synthetic_win(AttemptStatus::TimedOut)), FALLBACK_AFTER_ERROR);
    }

    #[test]
    fn test_source_tag_after_empty_scrape() {
        assert_eq!(source_tag(&synthetic_win(AttemptStatus::NotFound)), FALLBACK);
        assert_eq!(
            source_tag(&synthetic_win(AttemptStatus::Skipped {
                reason: "disabled".to_string()
            })),
            FALLBACK
        );
    }

    #[test]
    fn test_source_tag_exhausted() {
        assert_eq!(source_tag(&Resolution::exhausted(Vec::new())), NO_SOURCE);
    }
}
