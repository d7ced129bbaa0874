//! Wikipedia / Wikimedia Commons photo lookup
//!
//! Resolves an article title with a Wikipedia search, then lists the media
//! attached to that article. When no article matches, falls back to a
//! full-text file search on Commons using the same search text.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::WikimediaConfig;
use crate::http::{HttpClient, fetch_json};
use crate::models::{PhotoItem, PhotoSubject, PlaceContext, Query};
use crate::pipeline::{Findings, Provider, SourceOutcome};

pub const SOURCE: &str = "Wikipedia";

/// Articles routinely carry this many images including icons and maps
const MEDIA_PER_ARTICLE: usize = 50;

/// Which query field drives the article search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    /// ICAO/IATA style code, e.g. `LFPG`
    Code,
    /// Name plus city
    Title,
}

pub struct WikimediaProvider {
    client: HttpClient,
    config: WikimediaConfig,
    key: LookupKey,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    search: Vec<SearchHit>,
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Deserialize)]
struct ImageInfo {
    url: Option<String>,
}

impl WikimediaProvider {
    pub fn new(client: HttpClient, config: WikimediaConfig, key: LookupKey) -> Self {
        Self {
            client,
            config,
            key,
        }
    }

    /// Text used for the article search, `None` when the query lacks the
    /// field this lookup keys on.
    fn search_text(&self, query: &Query) -> Option<String> {
        match self.key {
            LookupKey::Code => query.code().map(|code| match query.subject() {
                PhotoSubject::Airport => format!("{code} airport"),
                _ => code.to_string(),
            }),
            LookupKey::Title => Some(query.search_text()),
        }
    }

    async fn lookup(&self, search_text: &str, limit: usize) -> Result<Findings<PhotoItem>> {
        match self.resolve_title(search_text).await? {
            Some(title) => {
                debug!(%title, "resolved article");
                let urls = self.article_media(&title).await?;
                let place = PlaceContext::new(title.clone(), Some(self.article_link(&title)));
                Ok(Findings::new(to_photos(urls)).with_place(Some(place)))
            }
            None => {
                debug!(search_text, "no article, falling back to media search");
                let urls = self.media_search(search_text, limit).await?;
                Ok(Findings::new(to_photos(urls)))
            }
        }
    }

    async fn resolve_title(&self, search_text: &str) -> Result<Option<String>> {
        let url = format!(
            "{}?action=query&format=json&formatversion=2&list=search&srlimit=1&srsearch={}",
            self.config.wikipedia_api_url,
            urlencoding::encode(search_text)
        );
        let response: ApiResponse = fetch_json(self.client.get(url)).await?;
        Ok(response
            .query
            .unwrap_or_default()
            .search
            .into_iter()
            .next()
            .map(|hit| hit.title))
    }

    async fn article_media(&self, title: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}?action=query&format=json&formatversion=2&titles={}&generator=images&gimlimit={}&prop=imageinfo&iiprop=url",
            self.config.wikipedia_api_url,
            urlencoding::encode(title),
            MEDIA_PER_ARTICLE
        );
        let response: ApiResponse = fetch_json(self.client.get(url)).await?;
        Ok(image_urls(response))
    }

    async fn media_search(&self, search_text: &str, limit: usize) -> Result<Vec<String>> {
        // Over-fetch: some hits are documents or vector files
        let url = format!(
            "{}?action=query&format=json&formatversion=2&generator=search&gsrnamespace=6&gsrlimit={}&gsrsearch={}&prop=imageinfo&iiprop=url",
            self.config.commons_api_url,
            limit * 2,
            urlencoding::encode(search_text)
        );
        let response: ApiResponse = fetch_json(self.client.get(url)).await?;
        Ok(image_urls(response))
    }

    fn article_link(&self, title: &str) -> String {
        let slug = title.replace(' ', "_");
        format!("{}{}", self.config.page_base_url, urlencoding::encode(&slug))
    }
}

fn image_urls(response: ApiResponse) -> Vec<String> {
    response
        .query
        .unwrap_or_default()
        .pages
        .into_iter()
        .flat_map(|page| page.imageinfo)
        .filter_map(|info| info.url)
        .collect()
}

fn to_photos(urls: Vec<String>) -> Vec<PhotoItem> {
    urls.into_iter().map(|url| PhotoItem::new(url, SOURCE)).collect()
}

#[async_trait]
impl Provider<PhotoItem> for WikimediaProvider {
    fn source(&self) -> &'static str {
        SOURCE
    }

    #[instrument(name = "wikimedia_search", skip_all, fields(name = query.name()))]
    async fn search(&self, query: &Query) -> SourceOutcome<PhotoItem> {
        if !self.config.enabled {
            return SourceOutcome::skipped("wikimedia disabled");
        }
        let Some(search_text) = self.search_text(query) else {
            return SourceOutcome::skipped("query has no code");
        };
        SourceOutcome::from_result(SOURCE, self.lookup(&search_text, query.limit()).await)
    }
}
