//! HTTP handlers
//!
//! Handlers only translate between the wire and a [`Query`]; all resolution
//! work happens in the resolvers held by [`AppState`]. Input problems answer
//! 400 with a JSON error envelope, an empty resolution is still a 200.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Query as QueryParams, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::config::TripScoutConfig;
use crate::http::HttpClient;
use crate::models::{HotelItem, PhotoSubject, PlaceContext, Query, StayDetails};
use crate::resolver::{AttractionResolver, HotelResolver, PhotoResolver};
use crate::{TripScoutError, VERSION};

/// Shared handler state; cheap to clone
#[derive(Clone)]
pub struct AppState {
    photos: Arc<PhotoResolver>,
    hotels: Arc<HotelResolver>,
    attractions: Arc<AttractionResolver>,
    limits: Limits,
}

#[derive(Debug, Clone, Copy)]
struct Limits {
    photo_default: usize,
    photo_max: usize,
    hotels: usize,
}

impl AppState {
    pub fn new(
        config: &TripScoutConfig,
        photos: PhotoResolver,
        hotels: HotelResolver,
        attractions: AttractionResolver,
    ) -> Self {
        Self {
            photos: Arc::new(photos),
            hotels: Arc::new(hotels),
            attractions: Arc::new(attractions),
            limits: Limits {
                photo_default: config.photos.default_limit,
                photo_max: config.photos.max_limit,
                hotels: config.hotels.max_results,
            },
        }
    }

    /// Resolvers wired to the real providers
    pub fn from_config(config: &TripScoutConfig, client: &HttpClient) -> Self {
        Self::new(
            config,
            PhotoResolver::from_config(config, client),
            HotelResolver::from_config(config, client),
            AttractionResolver::from_config(config, client),
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/photos", get(get_photos))
        .route("/api/hotels", get(get_hotels).post(post_hotels))
        .route("/api/attraction-link", get(get_attraction_link))
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

/// Error response with a `{ "error": { "code", "message" } }` body
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal",
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<TripScoutError> for AppError {
    fn from(err: TripScoutError) -> Self {
        if err.is_caller_error() {
            AppError::bad_request(err.user_message())
        } else {
            error!(error = %err, "request failed");
            AppError::internal()
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

/// Non-blank value of a required parameter
fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request(format!("{field} is required")))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct PhotoParams {
    #[serde(alias = "airport", alias = "place")]
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub code: Option<String>,
    pub kind: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub place: Option<PlaceContext>,
    pub photos: Vec<String>,
}

async fn get_photos(
    State(state): State<AppState>,
    params: Result<QueryParams<PhotoParams>, QueryRejection>,
) -> Result<Json<PhotoResponse>, AppError> {
    let QueryParams(params) = params?;
    let name = required("name", params.name)?;
    let subject = match params.kind.as_deref() {
        Some(kind) => kind.parse::<PhotoSubject>()?,
        None => PhotoSubject::default(),
    };
    // Oversized limits are clamped, zero is rejected by Query::new
    let limit = params
        .limit
        .unwrap_or(state.limits.photo_default)
        .min(state.limits.photo_max);

    let query = Query::new(name, limit)?
        .with_city(params.city)
        .with_country(params.country)
        .with_code(params.code)
        .with_subject(subject);

    let resolution = state.photos.resolve(&query).await;
    Ok(Json(PhotoResponse {
        place: resolution.place,
        photos: resolution.photos,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelParams {
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub travel_group: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HotelResponse {
    pub success: bool,
    pub hotels: Vec<HotelItem>,
    pub count: usize,
    pub source: &'static str,
}

async fn get_hotels(
    State(state): State<AppState>,
    params: Result<QueryParams<HotelParams>, QueryRejection>,
) -> Result<Json<HotelResponse>, AppError> {
    let QueryParams(params) = params?;
    search_hotels(&state, params).await
}

async fn post_hotels(
    State(state): State<AppState>,
    body: Result<Json<HotelParams>, JsonRejection>,
) -> Result<Json<HotelResponse>, AppError> {
    let Json(params) = body?;
    search_hotels(&state, params).await
}

async fn search_hotels(
    state: &AppState,
    params: HotelParams,
) -> Result<Json<HotelResponse>, AppError> {
    let destination = required("destination", params.destination)?;
    let stay = StayDetails::parse(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        params.travel_group.as_deref(),
    )?;
    let query = Query::new(destination, state.limits.hotels)?.with_stay(stay);

    let resolution = state.hotels.resolve(&query).await;
    Ok(Json(HotelResponse {
        success: true,
        count: resolution.hotels.len(),
        hotels: resolution.hotels,
        source: resolution.source,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct AttractionParams {
    pub attraction: Option<String>,
    pub destination: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttractionLinkResponse {
    pub url: Option<String>,
}

async fn get_attraction_link(
    State(state): State<AppState>,
    params: Result<QueryParams<AttractionParams>, QueryRejection>,
) -> Result<Json<AttractionLinkResponse>, AppError> {
    let QueryParams(params) = params?;
    let attraction = required("attraction", params.attraction)?;
    let query = Query::new(attraction, 1)?
        .with_city(params.destination)
        .with_country(params.country);

    Ok(Json(AttractionLinkResponse {
        url: state.attractions.resolve(&query).await,
    }))
}
