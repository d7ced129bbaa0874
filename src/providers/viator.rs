//! Viator attraction links
//!
//! The partner API is preferred when a key is configured. Without one, the
//! public search page is fetched and the first attraction or tour link on it
//! is taken.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::ViatorConfig;
use crate::http::{BROWSER_USER_AGENT, HttpClient, fetch_json, fetch_text};
use crate::models::{AttractionLink, Query};
use crate::pipeline::{Findings, Provider, SourceOutcome};

pub const API_SOURCE: &str = "Viator";
pub const PUBLIC_SOURCE: &str = "Viator (public)";

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreetextRequest<'a> {
    search_term: &'a str,
    search_types: [SearchType; 1],
    currency: &'static str,
}

#[derive(Debug, Serialize)]
struct SearchType {
    #[serde(rename = "searchType")]
    kind: &'static str,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct Pagination {
    start: u32,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct FreetextResponse {
    #[serde(default)]
    attractions: Option<AttractionResults>,
}

#[derive(Debug, Default, Deserialize)]
struct AttractionResults {
    #[serde(default)]
    results: Vec<Attraction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Attraction {
    #[serde(alias = "title")]
    name: String,
    #[serde(alias = "webUrl", alias = "productUrl")]
    url: Option<String>,
    country: Option<String>,
    destination_name: Option<String>,
}

impl Attraction {
    fn is_in(&self, country: &str) -> bool {
        let country = country.to_lowercase();
        self.country
            .as_deref()
            .is_some_and(|c| c.to_lowercase() == country)
            || self
                .destination_name
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&country))
    }
}

/// Pick the first linked attraction located in `country`, else the first
/// linked one overall. Entries without a URL are never chosen.
fn choose(results: Vec<Attraction>, country: Option<&str>) -> Option<Attraction> {
    let linked: Vec<Attraction> = results.into_iter().filter(|a| a.url.is_some()).collect();
    let preferred = country.and_then(|c| linked.iter().position(|a| a.is_in(c)));
    linked.into_iter().nth(preferred.unwrap_or(0))
}

pub struct ViatorApiProvider {
    client: HttpClient,
    config: ViatorConfig,
}

impl ViatorApiProvider {
    pub fn new(client: HttpClient, config: ViatorConfig) -> Self {
        Self { client, config }
    }

    async fn lookup(&self, api_key: &str, query: &Query) -> Result<Findings<AttractionLink>> {
        let search_term = query.search_text();
        let body = serde_json::to_vec(&FreetextRequest {
            search_term: &search_term,
            search_types: [SearchType {
                kind: "ATTRACTIONS",
                pagination: Pagination { start: 1, count: 10 },
            }],
            currency: "USD",
        })
        .context("Failed to encode Viator search request")?;

        let response: FreetextResponse = fetch_json(
            self.client
                .post(format!("{}/search/freetext", self.config.api_url))
                .header("exp-api-key", api_key)
                .header("Accept", "application/json;version=2.0")
                .header("Accept-Language", "en-US")
                .header("Content-Type", "application/json")
                .body(body),
        )
        .await?;

        let results = response.attractions.unwrap_or_default().results;
        debug!(results = results.len(), "viator attractions");
        let links = choose(results, query.country())
            .and_then(|a| a.url.map(|url| AttractionLink::new(a.name, url)))
            .into_iter()
            .collect();
        Ok(Findings::new(links))
    }
}

#[async_trait]
impl Provider<AttractionLink> for ViatorApiProvider {
    fn source(&self) -> &'static str {
        API_SOURCE
    }

    #[instrument(name = "viator_api_search", skip_all, fields(attraction = query.name()))]
    async fn search(&self, query: &Query) -> SourceOutcome<AttractionLink> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return SourceOutcome::skipped("no api key");
        };
        SourceOutcome::from_result(API_SOURCE, self.lookup(api_key, query).await)
    }
}

pub struct ViatorPublicProvider {
    client: HttpClient,
    config: ViatorConfig,
}

impl ViatorPublicProvider {
    pub fn new(client: HttpClient, config: ViatorConfig) -> Self {
        Self { client, config }
    }

    async fn lookup(&self, query: &Query) -> Result<Findings<AttractionLink>> {
        let url = format!(
            "{}/searchResults/all?text={}",
            self.config.public_url,
            urlencoding::encode(&query.search_text())
        );
        let html = fetch_text(
            self.client
                .get(url)
                .header("User-Agent", BROWSER_USER_AGENT),
        )
        .await?;

        let links = first_result_link(&html, &self.config.public_url)
            .map(|url| AttractionLink::new(query.name(), url))
            .into_iter()
            .collect();
        Ok(Findings::new(links))
    }
}

/// First attraction or tour link on a search results page, absolutized
fn first_result_link(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| is_result_path(href))
        .map(|href| {
            if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{}{}", base_url.trim_end_matches('/'), href)
            }
        })
}

/// Site-relative or viator.com link to an attraction or tour page
fn is_result_path(href: &str) -> bool {
    let path = href
        .strip_prefix("https://www.viator.com")
        .or_else(|| href.strip_prefix("http://www.viator.com"))
        .unwrap_or(href);
    path.starts_with('/') && (path.contains("-attractions/") || path.contains("/tours/"))
}

#[async_trait]
impl Provider<AttractionLink> for ViatorPublicProvider {
    fn source(&self) -> &'static str {
        PUBLIC_SOURCE
    }

    #[instrument(name = "viator_public_search", skip_all, fields(attraction = query.name()))]
    async fn search(&self, query: &Query) -> SourceOutcome<AttractionLink> {
        SourceOutcome::from_result(PUBLIC_SOURCE, self.lookup(query).await)
    }
}
