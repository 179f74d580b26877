//! Places search provider contract.

use super::ProviderResult;
use crate::model::place::{Coordinate, PlaceRecord};

/// Candidate place returned by a search query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaceSummary {
    /// Provider-stable place id.
    pub place_id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    /// 1.0 ..= 5.0 when present.
    pub rating: Option<f32>,
    /// 0 (free) ..= 4 (very expensive).
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    /// Human-readable weekday hours, one line per day.
    pub opening_hours: Vec<String>,
    pub editorial_summary: Option<String>,
}

impl PlaceSummary {
    pub fn new(place_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn to_record(&self) -> PlaceRecord {
        PlaceRecord {
            name: self.name.clone(),
            image_name: String::new(),
            coordinate: self.coordinate,
            address: self.address.clone().unwrap_or_default(),
            phone_number: self.phone_number.clone().unwrap_or_default(),
            place_id: Some(self.place_id.clone()),
        }
    }
}

/// Photo for one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacePhoto {
    /// Reference usable as a place image name.
    pub reference: String,
    pub attribution: Option<String>,
    pub bytes: Vec<u8>,
}

pub trait PlaceSearchProvider {
    fn provider_id(&self) -> &str;

    /// Returns at most `limit` candidates for `query`.
    fn search(&self, query: &str, limit: usize) -> ProviderResult<Vec<PlaceSummary>>;

    /// Returns the primary photo of `place_id`, if one exists.
    fn photo(&self, place_id: &str) -> ProviderResult<Option<PlacePhoto>>;
}
