use tracing::instrument;

use crate::config::TripScoutConfig;
use crate::http::HttpClient;
use crate::models::{AttractionLink, Query};
use crate::pipeline::Pipeline;
use crate::providers::attraction_pipeline;

pub struct AttractionResolver {
    pipeline: Pipeline<AttractionLink>,
}

impl AttractionResolver {
    pub fn new(pipeline: Pipeline<AttractionLink>) -> Self {
        Self { pipeline }
    }

    pub fn from_config(config: &TripScoutConfig, client: &HttpClient) -> Self {
        Self::new(attraction_pipeline(config, client))
    }

    /// Booking page for an attraction, `None` when no source knows it
    #[instrument(name = "resolve_attraction_link", skip_all, fields(attraction = query.name()))]
    pub async fn resolve(&self, query: &Query) -> Option<String> {
        self.pipeline
            .resolve(query)
            .await
            .items
            .into_iter()
            .next()
            .map(|link| link.url)
    }
}
