//! Data models for `TripScout`
//!
//! - Query: what the caller asked for
//! - Candidate: normalized provider results, one type per entity kind
//! - Outcome: the pipeline's final answer plus its attempt log

pub mod candidate;
pub mod outcome;
pub mod query;

pub use candidate::{AttractionLink, HotelItem, PhotoItem, PlaceContext, Provenance};
pub use outcome::{Attempt, AttemptStatus, PipelineState, Resolution};
pub use query::{PhotoSubject, Query, StayDetails, TravelGroup};
