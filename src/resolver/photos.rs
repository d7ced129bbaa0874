use serde::Serialize;
use tracing::instrument;

use crate::config::TripScoutConfig;
use crate::http::HttpClient;
use crate::models::{PhotoItem, PlaceContext, Query};
use crate::pipeline::Pipeline;
use crate::providers::photo_pipeline;

/// Photos for one entity. `place` is only known when the winning source
/// identified the entity itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotoResolution {
    pub place: Option<PlaceContext>,
    pub photos: Vec<String>,
}

pub struct PhotoResolver {
    pipeline: Pipeline<PhotoItem>,
}

impl PhotoResolver {
    pub fn new(pipeline: Pipeline<PhotoItem>) -> Self {
        Self { pipeline }
    }

    pub fn from_config(config: &TripScoutConfig, client: &HttpClient) -> Self {
        Self::new(photo_pipeline(config, client))
    }

    #[instrument(
        name = "resolve_photos",
        skip_all,
        fields(name = query.name(), subject = %query.subject())
    )]
    pub async fn resolve(&self, query: &Query) -> PhotoResolution {
        let resolution = self.pipeline.resolve(query).await;
        PhotoResolution {
            place: resolution.place,
            photos: resolution.items.into_iter().map(|photo| photo.url).collect(),
        }
    }
}
