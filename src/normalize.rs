//! Normalization and deduplication of provider candidates
//!
//! Every candidate kind knows how to validate itself and which canonical key
//! identifies duplicates. [`normalize`] applies both and caps the list
//! without reordering: the first occurrence of a key wins.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AttractionLink, HotelItem, PhotoItem};

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://\S+\.(jpg|jpeg|png|gif|webp)(\?\S*)?$")
        .expect("image url pattern is valid")
});

/// A normalized unit of result data produced by an adapter.
pub trait Candidate: Send + Sync + 'static {
    /// Format and sanity check; invalid candidates are dropped.
    fn is_valid(&self) -> bool;

    /// Canonical identity used for deduplication.
    fn dedup_key(&self) -> String;
}

/// Trimmed, lower-cased form used for equality between candidates.
#[must_use]
pub fn canonical_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Image URL allow-list: jpg, jpeg, png, gif or webp, optionally followed by
/// a query string.
#[must_use]
pub fn is_allowed_image_url(url: &str) -> bool {
    IMAGE_URL.is_match(url.trim())
}

/// Drop invalid candidates, remove duplicates keeping the first occurrence,
/// and cap the result at `limit`.
#[must_use]
pub fn normalize<C: Candidate>(items: Vec<C>, limit: usize) -> Vec<C> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(Candidate::is_valid)
        .filter(|item| seen.insert(item.dedup_key()))
        .take(limit)
        .collect()
}

impl Candidate for PhotoItem {
    fn is_valid(&self) -> bool {
        is_allowed_image_url(&self.url)
    }

    fn dedup_key(&self) -> String {
        canonical_key(&self.url)
    }
}

impl Candidate for HotelItem {
    fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    fn dedup_key(&self) -> String {
        canonical_key(&self.name)
    }
}

impl Candidate for AttractionLink {
    fn is_valid(&self) -> bool {
        let url = self.url.trim();
        (url.starts_with("https://") || url.starts_with("http://")) && url.len() > "https://".len()
    }

    fn dedup_key(&self) -> String {
        canonical_key(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Provenance;
    use rstest::rstest;

    fn photo(url: &str) -> PhotoItem {
        PhotoItem::new(url, "test")
    }

    #[rstest]
    #[case("https://upload.wikimedia.org/a/ab/Narita.jpg", true)]
    #[case("https://images.pexels.com/photos/1/pexels-photo-1.jpeg?auto=compress&h=650", true)]
    #[case("http://example.org/terminal.PNG", true)]
    #[case("https://example.org/runway.webp", true)]
    #[case("https://example.org/loading.gif?v=2", true)]
    #[case("https://upload.wikimedia.org/a/ab/Commons-logo.svg", false)]
    #[case("https://example.org/photo.jpg/view", false)]
    #[case("https://images.unsplash.com/photo-1500?ixid=abc", false)]
    #[case("ftp://example.org/a.jpg", false)]
    #[case("", false)]
    fn test_image_allow_list(#[case] url: &str, #[case] allowed: bool) {
        assert_eq!(is_allowed_image_url(url), allowed, "{url}");
    }

    #[test]
    fn test_normalize_filters_dedups_and_caps() {
        let items = vec![
            photo("https://example.org/a.jpg"),
            photo("https://example.org/icon.svg"),
            photo("HTTPS://EXAMPLE.ORG/A.JPG"),
            photo("https://example.org/b.png"),
            photo("https://example.org/c.webp"),
        ];

        let result = normalize(items, 2);
        let urls: Vec<&str> = result.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.org/a.jpg", "https://example.org/b.png"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let items = vec![
            photo("https://example.org/a.jpg"),
            photo("https://example.org/a.jpg "),
            photo("https://example.org/b.jpg"),
        ];
        let once = normalize(items, 10);
        let twice = normalize(once.clone(), 10);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_hotels_dedup_by_name_case_insensitively() {
        let hotel = |name: &str| HotelItem::new(name, "Paris", "$$", "test", Provenance::Live);
        let items = vec![
            hotel("Hotel Lutetia"),
            hotel("  hotel lutetia"),
            hotel(""),
            hotel("Le Meurice"),
        ];
        let result = normalize(items, 10);
        let names: Vec<&str> = result.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Hotel Lutetia", "Le Meurice"]);
    }

    #[test]
    fn test_attraction_links_require_http_urls() {
        let items = vec![
            AttractionLink::new("Louvre", "/tours/Paris/Louvre"),
            AttractionLink::new(
                "Louvre",
                "https://www.viator.com/Paris-attractions/Louvre/d479-a73",
            ),
        ];
        let result = normalize(items, 1);
        assert_eq!(result.len(), 1);
        assert!(result[0].url.starts_with("https://"));
    }
}
