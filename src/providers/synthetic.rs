//! Deterministic placeholder hotels
//!
//! Last resort of the hotel pipeline so callers always receive a list. The
//! generator is seeded from the destination: the same destination and limit
//! always produce the same hotels. Every record is tagged
//! [`Provenance::Synthetic`].

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::models::{HotelItem, Provenance, Query};
use crate::pipeline::{Findings, Provider, SourceOutcome};

pub const SOURCE: &str = "Synthetic";

const NAME_TEMPLATES: [&str; 12] = [
    "{city} Grand Hotel",
    "Hotel {city} Central",
    "The {city} Boutique Inn",
    "{city} Riverside Suites",
    "{city} Plaza Hotel",
    "Old Town Residence {city}",
    "{city} Garden Hotel",
    "{city} Harbour View",
    "Panorama Hotel {city}",
    "{city} City Lodge",
    "Maison {city}",
    "{city} Station Hotel",
];

const AREAS: [&str; 6] = [
    "City Centre",
    "Old Town",
    "Riverside",
    "Business District",
    "Near Main Station",
    "Arts Quarter",
];

const AMENITIES: [&str; 8] = [
    "Free WiFi",
    "Breakfast included",
    "Fitness centre",
    "Airport shuttle",
    "Spa",
    "Restaurant",
    "24-hour front desk",
    "Non-smoking rooms",
];

/// Nightly price bands in USD with their display indicator
const PRICE_BANDS: [(u32, u32, &str); 4] = [
    (60, 110, "$"),
    (110, 190, "$$"),
    (190, 320, "$$$"),
    (320, 600, "$$$$"),
];

#[derive(Debug, Default)]
pub struct SyntheticHotelProvider;

impl SyntheticHotelProvider {
    pub fn new() -> Self {
        Self
    }
}

/// Generate exactly `count` distinct hotels for a destination.
#[must_use]
pub fn generate_hotels(destination: &str, count: usize) -> Vec<HotelItem> {
    let city = city_of(destination);
    let mut rng = StdRng::seed_from_u64(seed_for(destination));

    (0..count)
        .map(|index| {
            let template = NAME_TEMPLATES[index % NAME_TEMPLATES.len()];
            let round = index / NAME_TEMPLATES.len();
            let mut name = template.replace("{city}", city);
            if round > 0 {
                name = format!("{name} {}", round + 1);
            }

            let (low, high, band) = PRICE_BANDS[rng.random_range(0..PRICE_BANDS.len())];
            let nightly = rng.random_range(low..high);
            let rating = f32::from(rng.random_range(35u8..=49)) / 10.0;
            let area = AREAS[rng.random_range(0..AREAS.len())];

            let first = rng.random_range(0..AMENITIES.len());
            let amenity_count = rng.random_range(2..=4usize);
            let amenities = (0..amenity_count)
                .map(|offset| AMENITIES[(first + offset) % AMENITIES.len()].to_string())
                .collect();

            HotelItem::new(name, format!("{area}, {city}"), band, SOURCE, Provenance::Synthetic)
                .with_price_per_night(Some(nightly))
                .with_rating(Some(rating))
                .with_amenities(amenities)
        })
        .collect()
}

/// `"Paris, France"` -> `"Paris"`
fn city_of(destination: &str) -> &str {
    destination
        .split(',')
        .map(str::trim)
        .find(|part| !part.is_empty())
        .unwrap_or("City")
}

fn seed_for(destination: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    destination.trim().to_lowercase().hash(&mut hasher);
    hasher.finish()
}

#[async_trait]
impl Provider<HotelItem> for SyntheticHotelProvider {
    fn source(&self) -> &'static str {
        SOURCE
    }

    async fn search(&self, query: &Query) -> SourceOutcome<HotelItem> {
        SourceOutcome::Found(Findings::new(generate_hotels(query.name(), query.limit())))
    }
}
