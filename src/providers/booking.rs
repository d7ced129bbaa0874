//! Booking.com search results scraper
//!
//! Fetches the public search results page for a destination and pulls hotel
//! cards out of the markup. The page layout is not an API, so every field
//! except the name is optional and a card without a name is dropped later by
//! normalization.

use std::sync::LazyLock;

use anyhow::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use crate::config::BookingConfig;
use crate::http::{BROWSER_USER_AGENT, HttpClient, fetch_text};
use crate::models::{HotelItem, Provenance, Query};
use crate::pipeline::{Findings, Provider, SourceOutcome};

pub const SOURCE: &str = "Booking.com";

static CARD: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="property-card"]"#));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="title"]"#));
static ADDRESS: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="address"]"#));
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[data-testid="price-and-discounted-price"]"#));
static SCORE: LazyLock<Selector> = LazyLock::new(|| selector(r#"[data-testid="review-score"]"#));
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"a[data-testid="title-link"][href]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

pub struct BookingProvider {
    client: HttpClient,
    config: BookingConfig,
}

impl BookingProvider {
    pub fn new(client: HttpClient, config: BookingConfig) -> Self {
        Self { client, config }
    }

    fn search_url(&self, query: &Query) -> String {
        let group = query.stay().map(|s| s.group()).unwrap_or_default();
        let mut url = format!(
            "{}/searchresults.html?ss={}&group_adults={}&group_children={}&no_rooms=1&lang=en-us&selected_currency=USD",
            self.config.base_url,
            urlencoding::encode(query.name()),
            group.adults(),
            group.children(),
        );
        if let Some(stay) = query.stay() {
            if let Some(check_in) = stay.check_in() {
                url.push_str(&format!("&checkin={}", check_in.format("%Y-%m-%d")));
            }
            if let Some(check_out) = stay.check_out() {
                url.push_str(&format!("&checkout={}", check_out.format("%Y-%m-%d")));
            }
        }
        url
    }

    async fn scrape(&self, query: &Query) -> Result<Findings<HotelItem>> {
        let html = fetch_text(
            self.client
                .get(self.search_url(query))
                .header("User-Agent", BROWSER_USER_AGENT)
                .header("Accept-Language", "en-US,en;q=0.9"),
        )
        .await?;

        let nights = query.stay().and_then(|s| s.nights());
        let hotels = parse_listing(&html, query.name(), &self.config.base_url, nights);
        debug!(cards = hotels.len(), "parsed search results");
        Ok(Findings::new(hotels))
    }
}

/// Extract hotel cards from a search results page.
///
/// `nights` converts the stay total Booking shows into a nightly price.
pub fn parse_listing(
    html: &str,
    destination: &str,
    base_url: &str,
    nights: Option<i64>,
) -> Vec<HotelItem> {
    let document = Html::parse_document(html);
    document
        .select(&CARD)
        .filter_map(|card| parse_card(card, destination, base_url, nights))
        .collect()
}

fn parse_card(
    card: ElementRef<'_>,
    destination: &str,
    base_url: &str,
    nights: Option<i64>,
) -> Option<HotelItem> {
    let name = text_of(card, &TITLE)?;
    let location = text_of(card, &ADDRESS).unwrap_or_else(|| destination.to_string());
    let price = text_of(card, &PRICE);
    let rating = card
        .select(&SCORE)
        .next()
        .and_then(|score| score.text().find_map(review_score));
    let link = card
        .select(&TITLE_LINK)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(|href| absolute_link(href, base_url));

    let per_night = price.as_deref().and_then(amount).map(|total| match nights {
        Some(n) if n > 1 => total / n as u32,
        _ => total,
    });

    Some(
        HotelItem::new(
            name,
            location,
            price.unwrap_or_else(|| "Price on request".to_string()),
            SOURCE,
            Provenance::Live,
        )
        .with_rating(rating)
        .with_price_per_night(per_night)
        .with_link(link),
    )
}

/// Decoded text of the first match, whitespace collapsed
fn text_of(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
}

/// `"9,1"` or `"Scored 9.1"` on a 0-10 scale
fn review_score(text: &str) -> Option<f32> {
    let text = text.trim();
    let text = text.strip_prefix("Scored").unwrap_or(text).trim();
    text.replace(',', ".")
        .parse::<f32>()
        .ok()
        .filter(|score| (0.0..=10.0).contains(score))
}

/// Whole units of a display price, `"US$1,234.50"` -> `1234`
fn amount(price: &str) -> Option<u32> {
    let start = price.find(|c: char| c.is_ascii_digit())?;
    let figure = price[start..]
        .split(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .next()?;
    // one or two trailing digits after a separator are cents
    let whole = match figure.rfind(['.', ',']) {
        Some(at) if figure.len() - at - 1 <= 2 => &figure[..at],
        _ => figure,
    };
    let digits: String = whole.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

fn absolute_link(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}

#[async_trait]
impl Provider<HotelItem> for BookingProvider {
    fn source(&self) -> &'static str {
        SOURCE
    }

    #[instrument(name = "booking_scrape", skip_all, fields(destination = query.name()))]
    async fn search(&self, query: &Query) -> SourceOutcome<HotelItem> {
        if !self.config.enabled {
            return SourceOutcome::skipped("booking scraping disabled");
        }
        SourceOutcome::from_result(SOURCE, self.scrape(query).await)
    }
}
