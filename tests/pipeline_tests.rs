mod common;

use rstest::rstest;

use tripscout::models::{AttemptStatus, HotelItem, PhotoItem, PipelineState, Query};
use tripscout::normalize::{is_allowed_image_url, normalize};
use tripscout::providers::SyntheticHotelProvider;
use tripscout::resolver::HotelResolver;

use common::*;

#[rstest]
#[case(1)]
#[case(5)]
#[case(25)]
#[tokio::test]
async fn test_outcome_respects_limit_and_allow_list(#[case] limit: usize) {
    let mut items = photos("mixed", 20);
    items.push(PhotoItem::new("https://img.example.org/mixed/0.jpg", "Mixed"));
    items.push(PhotoItem::new("https://img.example.org/diagram.svg", "Mixed"));
    items.push(PhotoItem::new("ftp://img.example.org/a.jpg", "Mixed"));
    let provider = MockProvider::found("Mixed", items);
    let pipeline = pipeline::<PhotoItem>("photos").with_provider(provider);

    let resolution = pipeline.resolve(&Query::new("Louvre", limit).unwrap()).await;

    assert_eq!(resolution.items.len(), limit.min(20));
    assert!(resolution.items.iter().all(|p| is_allowed_image_url(&p.url)));
    let renormalized = normalize(resolution.items.clone(), limit);
    assert_eq!(renormalized, resolution.items);
}

#[tokio::test]
async fn test_all_sources_empty_yields_empty_outcome() {
    let first = MockProvider::<PhotoItem>::not_found("Wikipedia");
    let second = MockProvider::<PhotoItem>::failing("Foursquare");
    let third = MockProvider::<PhotoItem>::found("Pexels", Vec::new());
    let pipeline = pipeline::<PhotoItem>("photos")
        .with_provider(first.clone())
        .with_provider(second.clone())
        .with_provider(third.clone());

    let resolution = pipeline.resolve(&Query::new("Atlantis", 10).unwrap()).await;

    assert_eq!(resolution.state, PipelineState::Exhausted);
    assert!(resolution.items.is_empty());
    assert!(resolution.place.is_none());
    assert_eq!(resolution.sources_tried(), 3);
    assert_eq!(resolution.attempts[2].status, AttemptStatus::NotFound);
    assert_eq!(first.calls() + second.calls() + third.calls(), 3);
}

#[tokio::test]
async fn test_later_sources_untouched_after_success() {
    let first = MockProvider::<PhotoItem>::not_found("Wikipedia");
    let second = MockProvider::found("Foursquare", photos("venue", 2));
    let third = MockProvider::found("Pexels", photos("stock", 2));
    let pipeline = pipeline::<PhotoItem>("photos")
        .with_provider(first.clone())
        .with_provider(second.clone())
        .with_provider(third.clone());

    let resolution = pipeline.resolve(&Query::new("Le Jules Verne", 10).unwrap()).await;

    assert_eq!(resolution.state, PipelineState::Succeeded(1));
    assert_eq!(resolution.source, Some("Foursquare"));
    assert_eq!(third.calls(), 0);
}

#[tokio::test]
async fn test_failed_scrape_labels_placeholder_hotels() {
    let booking = MockProvider::<HotelItem>::failing("Booking.com");
    let resolver = HotelResolver::new(
        pipeline::<HotelItem>("hotels")
            .with_provider(booking.clone())
            .with_provider(std::sync::Arc::new(SyntheticHotelProvider::new())),
    );

    let resolution = resolver.resolve(&Query::new("Paris, France", 10).unwrap()).await;

    assert_eq!(resolution.source, "Fallback (Error)");
    assert_eq!(resolution.hotels.len(), 10);
    assert!(resolution.hotels.iter().all(|h| !h.is_real_data));
    assert_eq!(booking.calls(), 1);
}

#[tokio::test]
async fn test_empty_scrape_labels_placeholder_hotels() {
    let resolver = HotelResolver::new(
        pipeline::<HotelItem>("hotels")
            .with_provider(MockProvider::<HotelItem>::not_found("Booking.com"))
            .with_provider(std::sync::Arc::new(SyntheticHotelProvider::new())),
    );

    let resolution = resolver.resolve(&Query::new("Lisbon", 4).unwrap()).await;

    assert_eq!(resolution.source, "Fallback");
    assert_eq!(resolution.hotels.len(), 4);
}
