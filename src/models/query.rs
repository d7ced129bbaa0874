//! Resolution query built once per incoming request

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::TripScoutError;

/// What a photo request is about; drives keyword augmentation for generic
/// image search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSubject {
    Airport,
    Restaurant,
    Attraction,
    #[default]
    Place,
}

impl PhotoSubject {
    /// Terms appended to the subject name, one search per entry.
    #[must_use]
    pub fn search_terms(self) -> &'static [&'static str] {
        match self {
            PhotoSubject::Airport => {
                &["airport terminal building exterior", "airport signage runway"]
            }
            PhotoSubject::Restaurant => &["restaurant food", "restaurant exterior"],
            PhotoSubject::Attraction => &["landmark", "tourist attraction"],
            PhotoSubject::Place => &["landmark", "travel"],
        }
    }
}

impl FromStr for PhotoSubject {
    type Err = TripScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "airport" => Ok(PhotoSubject::Airport),
            "restaurant" => Ok(PhotoSubject::Restaurant),
            "attraction" => Ok(PhotoSubject::Attraction),
            "place" | "" => Ok(PhotoSubject::Place),
            other => Err(TripScoutError::validation(format!(
                "Unknown photo kind '{other}'. Must be one of: airport, restaurant, attraction, place"
            ))),
        }
    }
}

impl fmt::Display for PhotoSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhotoSubject::Airport => "airport",
            PhotoSubject::Restaurant => "restaurant",
            PhotoSubject::Attraction => "attraction",
            PhotoSubject::Place => "place",
        };
        f.write_str(name)
    }
}

/// Who is travelling; mapped onto room occupancy for hotel searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelGroup {
    Solo,
    #[default]
    Couple,
    Family,
    Friends,
}

impl TravelGroup {
    #[must_use]
    pub fn adults(self) -> u32 {
        match self {
            TravelGroup::Solo => 1,
            TravelGroup::Couple | TravelGroup::Family => 2,
            TravelGroup::Friends => 4,
        }
    }

    #[must_use]
    pub fn children(self) -> u32 {
        match self {
            TravelGroup::Family => 2,
            _ => 0,
        }
    }
}

impl FromStr for TravelGroup {
    type Err = TripScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "solo" | "single" => Ok(TravelGroup::Solo),
            "couple" | "" => Ok(TravelGroup::Couple),
            "family" => Ok(TravelGroup::Family),
            "friends" | "group" => Ok(TravelGroup::Friends),
            other => Err(TripScoutError::validation(format!(
                "Unknown travel group '{other}'. Must be one of: solo, couple, family, friends"
            ))),
        }
    }
}

/// Dates and occupancy of a hotel stay
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StayDetails {
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    group: TravelGroup,
}

impl StayDetails {
    /// Build stay details, rejecting a check-out that is not after check-in.
    pub fn new(
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
        group: TravelGroup,
    ) -> Result<Self, TripScoutError> {
        if let (Some(start), Some(end)) = (check_in, check_out) {
            if end <= start {
                return Err(TripScoutError::validation(
                    "endDate must be after startDate",
                ));
            }
        }
        Ok(Self {
            check_in,
            check_out,
            group,
        })
    }

    /// Parse `YYYY-MM-DD` strings as sent by the front end.
    pub fn parse(
        check_in: Option<&str>,
        check_out: Option<&str>,
        group: Option<&str>,
    ) -> Result<Self, TripScoutError> {
        let check_in = parse_date("startDate", check_in)?;
        let check_out = parse_date("endDate", check_out)?;
        let group = match group {
            Some(group) => group.parse()?,
            None => TravelGroup::default(),
        };
        Self::new(check_in, check_out, group)
    }

    #[must_use]
    pub fn check_in(&self) -> Option<NaiveDate> {
        self.check_in
    }

    #[must_use]
    pub fn check_out(&self) -> Option<NaiveDate> {
        self.check_out
    }

    #[must_use]
    pub fn group(&self) -> TravelGroup {
        self.group
    }

    /// Number of nights when both dates are known
    #[must_use]
    pub fn nights(&self) -> Option<i64> {
        match (self.check_in, self.check_out) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, TripScoutError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    // Accept full ISO timestamps by keeping the date part
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| TripScoutError::validation(format!("{field} must be a YYYY-MM-DD date")))
}

/// Immutable description of what to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    name: String,
    city: Option<String>,
    country: Option<String>,
    code: Option<String>,
    limit: usize,
    subject: PhotoSubject,
    stay: Option<StayDetails>,
}

impl Query {
    /// Create a query; `name` must be non-blank and `limit` positive.
    pub fn new(name: impl Into<String>, limit: usize) -> Result<Self, TripScoutError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(TripScoutError::validation("name must not be empty"));
        }
        if limit == 0 {
            return Err(TripScoutError::validation("limit must be greater than zero"));
        }
        Ok(Self {
            name,
            city: None,
            country: None,
            code: None,
            limit,
            subject: PhotoSubject::default(),
            stay: None,
        })
    }

    #[must_use]
    pub fn with_city(mut self, city: Option<impl Into<String>>) -> Self {
        self.city = non_blank(city);
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: Option<impl Into<String>>) -> Self {
        self.country = non_blank(country);
        self
    }

    /// Airport codes are compared upper-case
    #[must_use]
    pub fn with_code(mut self, code: Option<impl Into<String>>) -> Self {
        self.code = non_blank(code).map(|code| code.to_uppercase());
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: PhotoSubject) -> Self {
        self.subject = subject;
        self
    }

    #[must_use]
    pub fn with_stay(mut self, stay: StayDetails) -> Self {
        self.stay = Some(stay);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[must_use]
    pub fn subject(&self) -> PhotoSubject {
        self.subject
    }

    #[must_use]
    pub fn stay(&self) -> Option<&StayDetails> {
        self.stay.as_ref()
    }

    /// Name followed by the city when one is known, e.g. `"Louvre Paris"`.
    #[must_use]
    pub fn search_text(&self) -> String {
        match &self.city {
            Some(city) if !self.name.to_lowercase().contains(&city.to_lowercase()) => {
                format!("{} {}", self.name, city)
            }
            _ => self.name.clone(),
        }
    }
}

fn non_blank(value: Option<impl Into<String>>) -> Option<String> {
    value
        .map(|v| v.into().trim().to_string())
        .filter(|v| !v.is_empty())
}
