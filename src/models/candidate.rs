//! Normalized result items, one type per entity kind

use serde::{Deserialize, Serialize};

/// The entity a photo set belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceContext {
    pub name: String,
    pub link: Option<String>,
}

impl PlaceContext {
    pub fn new(name: impl Into<String>, link: Option<String>) -> Self {
        Self {
            name: name.into(),
            link,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoItem {
    pub url: String,
    pub source: String,
}

impl PhotoItem {
    pub fn new(url: impl AsRef<str>, source: impl Into<String>) -> Self {
        Self {
            url: url.as_ref().trim().to_string(),
            source: source.into(),
        }
    }
}

/// Where a hotel record came from, as stated by the adapter that built it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelItem {
    pub name: String,
    pub location: String,
    /// Display price or price band, e.g. `"US$142"` or `"$$"`
    pub price: String,
    pub price_per_night: Option<u32>,
    pub rating: Option<f32>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub provenance: Provenance,
    pub is_real_data: bool,
}

impl HotelItem {
    pub fn new(
        name: impl AsRef<str>,
        location: impl Into<String>,
        price: impl Into<String>,
        source: impl Into<String>,
        provenance: Provenance,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            location: location.into(),
            price: price.into(),
            price_per_night: None,
            rating: None,
            source: source.into(),
            amenities: Vec::new(),
            link: None,
            provenance,
            is_real_data: provenance == Provenance::Live,
        }
    }

    #[must_use]
    pub fn with_rating(mut self, rating: Option<f32>) -> Self {
        self.rating = rating;
        self
    }

    #[must_use]
    pub fn with_price_per_night(mut self, price: Option<u32>) -> Self {
        self.price_per_night = price;
        self
    }

    #[must_use]
    pub fn with_amenities(mut self, amenities: Vec<String>) -> Self {
        self.amenities = amenities;
        self
    }

    #[must_use]
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}

/// A resolved external page for an attraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionLink {
    pub name: String,
    pub url: String,
}

impl AttractionLink {
    pub fn new(name: impl Into<String>, url: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            url: url.as_ref().trim().to_string(),
        }
    }
}
