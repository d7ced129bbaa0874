//! Foursquare Places: text search for the best venue, then its photos

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::FoursquareConfig;
use crate::http::{HttpClient, fetch_json};
use crate::models::{PhotoItem, PlaceContext, Query};
use crate::pipeline::{Findings, Provider, SourceOutcome};

pub const SOURCE: &str = "Foursquare";

pub struct FoursquareProvider {
    client: HttpClient,
    config: FoursquareConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Venue>,
}

#[derive(Debug, Deserialize)]
struct Venue {
    fsq_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct VenuePhoto {
    prefix: String,
    suffix: String,
}

impl VenuePhoto {
    /// Full-size URL; Foursquare splits it around a size segment
    fn url(&self) -> String {
        format!("{}original{}", self.prefix, self.suffix)
    }
}

impl FoursquareProvider {
    pub fn new(client: HttpClient, config: FoursquareConfig) -> Self {
        Self { client, config }
    }

    async fn lookup(&self, api_key: &str, query: &Query) -> Result<Findings<PhotoItem>> {
        let Some(venue) = self.find_venue(api_key, query).await? else {
            return Ok(Findings::new(Vec::new()));
        };
        debug!(venue = %venue.name, fsq_id = %venue.fsq_id, "matched venue");

        let url = format!(
            "{}/places/{}/photos?limit={}&sort=POPULAR",
            self.config.base_url,
            urlencoding::encode(&venue.fsq_id),
            query.limit()
        );
        let photos: Vec<VenuePhoto> = fetch_json(
            self.client
                .get(url)
                .header("Authorization", api_key)
                .header("Accept", "application/json"),
        )
        .await?;

        let items = photos
            .iter()
            .map(|photo| PhotoItem::new(photo.url(), SOURCE))
            .collect();
        let place = PlaceContext::new(
            venue.name,
            Some(format!("{}{}", self.config.venue_base_url, venue.fsq_id)),
        );
        Ok(Findings::new(items).with_place(Some(place)))
    }

    async fn find_venue(&self, api_key: &str, query: &Query) -> Result<Option<Venue>> {
        let mut url = format!(
            "{}/places/search?limit=1&query={}",
            self.config.base_url,
            urlencoding::encode(query.name())
        );
        if let Some(near) = near(query) {
            url.push_str("&near=");
            url.push_str(&urlencoding::encode(&near));
        }

        let response: SearchResponse = fetch_json(
            self.client
                .get(url)
                .header("Authorization", api_key)
                .header("Accept", "application/json"),
        )
        .await?;
        Ok(response.results.into_iter().next())
    }
}

/// `near` accepts a free-form locality like `"Paris, France"`
fn near(query: &Query) -> Option<String> {
    match (query.city(), query.country()) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (Some(city), None) => Some(city.to_string()),
        (None, Some(country)) => Some(country.to_string()),
        (None, None) => None,
    }
}

#[async_trait]
impl Provider<PhotoItem> for FoursquareProvider {
    fn source(&self) -> &'static str {
        SOURCE
    }

    #[instrument(name = "foursquare_search", skip_all, fields(name = query.name()))]
    async fn search(&self, query: &Query) -> SourceOutcome<PhotoItem> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return SourceOutcome::skipped("no api key");
        };
        SourceOutcome::from_result(SOURCE, self.lookup(api_key, query).await)
    }
}
