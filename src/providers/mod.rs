//! Source adapters and the default pipelines built from them

pub mod booking;
pub mod foursquare;
pub mod pexels;
pub mod synthetic;
pub mod viator;
pub mod wikimedia;

use std::sync::Arc;

pub use booking::BookingProvider;
pub use foursquare::FoursquareProvider;
pub use pexels::PexelsProvider;
pub use synthetic::SyntheticHotelProvider;
pub use viator::{ViatorApiProvider, ViatorPublicProvider};
pub use wikimedia::{LookupKey, WikimediaProvider};

use crate::config::TripScoutConfig;
use crate::http::HttpClient;
use crate::models::{AttractionLink, HotelItem, PhotoItem};
use crate::pipeline::Pipeline;

/// Wikimedia by code, Wikimedia by title, Foursquare, then Pexels
pub fn photo_pipeline(config: &TripScoutConfig, client: &HttpClient) -> Pipeline<PhotoItem> {
    let providers = &config.providers;
    Pipeline::new("photos", config.adapter_timeout())
        .with_provider(Arc::new(WikimediaProvider::new(
            client.clone(),
            providers.wikimedia.clone(),
            LookupKey::Code,
        )))
        .with_provider(Arc::new(WikimediaProvider::new(
            client.clone(),
            providers.wikimedia.clone(),
            LookupKey::Title,
        )))
        .with_provider(Arc::new(FoursquareProvider::new(
            client.clone(),
            providers.foursquare.clone(),
        )))
        .with_provider(Arc::new(PexelsProvider::new(
            client.clone(),
            providers.pexels.clone(),
        )))
}

/// Booking.com scrape, then synthetic hotels
pub fn hotel_pipeline(config: &TripScoutConfig, client: &HttpClient) -> Pipeline<HotelItem> {
    Pipeline::new("hotels", config.adapter_timeout())
        .with_provider(Arc::new(BookingProvider::new(
            client.clone(),
            config.providers.booking.clone(),
        )))
        .with_provider(Arc::new(SyntheticHotelProvider::new()))
}

/// Viator partner API, then the public search page
pub fn attraction_pipeline(
    config: &TripScoutConfig,
    client: &HttpClient,
) -> Pipeline<AttractionLink> {
    Pipeline::new("attraction_links", config.adapter_timeout())
        .with_provider(Arc::new(ViatorApiProvider::new(
            client.clone(),
            config.providers.viator.clone(),
        )))
        .with_provider(Arc::new(ViatorPublicProvider::new(
            client.clone(),
            config.providers.viator.clone(),
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_client;

    #[test]
    fn test_default_pipeline_order() {
        let config = TripScoutConfig::default();
        let client = build_client(&config.http).unwrap();

        assert_eq!(
            photo_pipeline(&config, &client).sources(),
            vec!["Wikipedia", "Wikipedia", "Foursquare", "Pexels"]
        );
        assert_eq!(hotel_pipeline(&config, &client).sources(), vec!["Booking.com", "Synthetic"]);
        assert_eq!(
            attraction_pipeline(&config, &client).sources(),
            vec!["Viator", "Viator (public)"]
        );
    }
}
