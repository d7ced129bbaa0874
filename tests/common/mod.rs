#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tripscout::api::AppState;
use tripscout::models::{AttractionLink, HotelItem, PhotoItem, PlaceContext, Query};
use tripscout::normalize::Candidate;
use tripscout::pipeline::{Findings, Pipeline, Provider, SourceOutcome};
use tripscout::{AttractionResolver, HotelResolver, PhotoResolver, TripScoutConfig};

/// Defaults with retries off so failing stubs answer immediately
pub fn test_config() -> TripScoutConfig {
    let mut config = TripScoutConfig::default();
    config.http.max_retries = 0;
    config.http.timeout_seconds = 2;
    config.pipeline.adapter_timeout_seconds = 3;
    config
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub server");
    });
    format!("http://{addr}")
}

/// Base URL nothing listens on
pub fn unreachable_url() -> String {
    "http://127.0.0.1:9".to_string()
}

type Respond<C> = Box<dyn Fn(&Query) -> SourceOutcome<C> + Send + Sync>;

/// Provider double that counts invocations
pub struct MockProvider<C> {
    tag: &'static str,
    respond: Respond<C>,
    calls: AtomicUsize,
}

impl<C: Candidate + Clone> MockProvider<C> {
    pub fn new(
        tag: &'static str,
        respond: impl Fn(&Query) -> SourceOutcome<C> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            tag,
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn found(tag: &'static str, items: Vec<C>) -> Arc<Self> {
        Self::new(tag, move |_| SourceOutcome::Found(Findings::new(items.clone())))
    }

    pub fn found_at(tag: &'static str, place: PlaceContext, items: Vec<C>) -> Arc<Self> {
        Self::new(tag, move |_| {
            SourceOutcome::Found(Findings::new(items.clone()).with_place(Some(place.clone())))
        })
    }

    pub fn not_found(tag: &'static str) -> Arc<Self> {
        Self::new(tag, |_| SourceOutcome::NotFound)
    }

    pub fn failing(tag: &'static str) -> Arc<Self> {
        Self::new(tag, |_| SourceOutcome::Failed("Provider responded with HTTP 503".into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<C: Candidate + Clone> Provider<C> for MockProvider<C> {
    fn source(&self) -> &'static str {
        self.tag
    }

    async fn search(&self, query: &Query) -> SourceOutcome<C> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(query)
    }
}

pub fn photos(tag: &str, count: usize) -> Vec<PhotoItem> {
    (0..count)
        .map(|i| {
            let url = format!("https://img.example.org/{}/{i}.jpg", tag.to_lowercase());
            PhotoItem::new(url, tag)
        })
        .collect()
}

pub fn pipeline<C: Candidate>(name: &'static str) -> Pipeline<C> {
    Pipeline::new(name, Duration::from_secs(3))
}

/// App state whose hotel and attraction pipelines find nothing
pub fn state_with_photos(config: &TripScoutConfig, photos: Pipeline<PhotoItem>) -> AppState {
    AppState::new(
        config,
        PhotoResolver::new(photos),
        HotelResolver::new(pipeline::<HotelItem>("hotels")),
        AttractionResolver::new(pipeline::<AttractionLink>("attraction_links")),
    )
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Run one request through the router and decode the JSON body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
