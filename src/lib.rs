//! `TripScout` - photo, hotel and attraction link resolution for trip planning
//!
//! Every request is answered by a cascade of external sources: the first
//! source producing usable results wins and the rest are never contacted.
//! Provider trouble never surfaces to callers as an error; at worst the
//! answer is empty (or, for hotels, clearly labelled placeholder data).

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod resolver;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::TripScoutConfig;
pub use error::TripScoutError;
pub use models::{AttractionLink, HotelItem, PhotoItem, PlaceContext, Query, Resolution};
pub use pipeline::{Pipeline, Provider, SourceOutcome};
pub use resolver::{AttractionResolver, HotelResolver, PhotoResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
