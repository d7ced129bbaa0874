//! Pexels generic image search
//!
//! Issues one search per keyword augmentation of the query subject and keeps
//! the top hit of each. The searches are independent, so they run
//! concurrently.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::config::PexelsConfig;
use crate::http::{HttpClient, fetch_json};
use crate::models::{PhotoItem, Query};
use crate::pipeline::{Findings, Provider, SourceOutcome};

pub const SOURCE: &str = "Pexels";

pub struct PexelsProvider {
    client: HttpClient,
    config: PexelsConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    large: Option<String>,
    original: Option<String>,
}

impl PexelsProvider {
    pub fn new(client: HttpClient, config: PexelsConfig) -> Self {
        Self { client, config }
    }

    async fn top_hit(&self, api_key: &str, search: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/search?per_page=1&query={}",
            self.config.base_url,
            urlencoding::encode(search)
        );
        let response: SearchResponse =
            fetch_json(self.client.get(url).header("Authorization", api_key)).await?;
        Ok(response
            .photos
            .into_iter()
            .next()
            .and_then(|photo| photo.src.large.or(photo.src.original)))
    }

    async fn lookup(&self, api_key: &str, query: &Query) -> Result<Findings<PhotoItem>> {
        let searches = augmented_searches(query);
        let results = join_all(searches.iter().map(|search| self.top_hit(api_key, search))).await;

        let mut items = Vec::new();
        let mut last_error = None;
        for (search, result) in searches.iter().zip(results) {
            match result {
                Ok(Some(url)) => items.push(PhotoItem::new(url, SOURCE)),
                Ok(None) => {}
                Err(e) => {
                    warn!(search = %search, error = %e, "pexels search failed");
                    last_error = Some(e);
                }
            }
        }

        // A partial answer is still an answer; only fail when every search did
        match last_error {
            Some(e) if items.is_empty() => Err(anyhow!("all pexels searches failed: {e}")),
            _ => Ok(Findings::new(items)),
        }
    }
}

/// One search string per keyword augmentation, e.g.
/// `"Narita International Airport airport terminal building exterior"`.
fn augmented_searches(query: &Query) -> Vec<String> {
    let base = query.search_text();
    query
        .subject()
        .search_terms()
        .iter()
        .map(|terms| format!("{base} {terms}"))
        .collect()
}

#[async_trait]
impl Provider<PhotoItem> for PexelsProvider {
    fn source(&self) -> &'static str {
        SOURCE
    }

    #[instrument(name = "pexels_search", skip_all, fields(name = query.name()))]
    async fn search(&self, query: &Query) -> SourceOutcome<PhotoItem> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return SourceOutcome::skipped("no api key");
        };
        SourceOutcome::from_result(SOURCE, self.lookup(api_key, query).await)
    }
}
