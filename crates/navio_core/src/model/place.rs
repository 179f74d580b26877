//! Place value types.
//!
//! # Responsibility
//! - Define the plain records shared by live places, favorites and recents.
//! - Define the persisted snapshot shapes stored in the key-value store.
//!
//! # Invariants
//! - `PlaceRecord::name` is the business key for favorite state.
//! - Persisted field names (`imageName`, `address`, `number`, `rawValue`,
//!   `name`) must stay stable across releases.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation error for place value types.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceValidationError {
    EmptyName,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl Display for PlaceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "place name cannot be empty"),
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
        }
    }
}

impl Error for PlaceValidationError {}

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<(), PlaceValidationError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PlaceValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PlaceValidationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

/// Display record for one place.
///
/// Two records with the same `name` are treated as the same favorite subject.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    /// Asset or remote image reference.
    pub image_name: String,
    pub coordinate: Coordinate,
    pub address: String,
    pub phone_number: String,
    /// External place id from the search provider, when known.
    pub place_id: Option<String>,
}

impl PlaceRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image_name: impl Into<String>) -> Self {
        self.image_name = image_name.into();
        self
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = coordinate;
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = phone_number.into();
        self
    }

    pub fn with_place_id(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    /// Validates the fields the favorite/recent flows depend on.
    pub fn validate(&self) -> Result<(), PlaceValidationError> {
        if self.name.trim().is_empty() {
            return Err(PlaceValidationError::EmptyName);
        }
        self.coordinate.validate()
    }

    /// Returns the persisted favorite snapshot for this record.
    pub fn snapshot(&self) -> FavoriteSnapshot {
        FavoriteSnapshot {
            image_name: self.image_name.clone(),
            address: self.address.clone(),
            number: self.phone_number.clone(),
        }
    }

    /// Rebuilds a record from a persisted favorite snapshot.
    ///
    /// The coordinate is not part of the snapshot and stays at its default.
    pub fn from_snapshot(name: impl Into<String>, snapshot: &FavoriteSnapshot) -> Self {
        Self {
            name: name.into(),
            image_name: snapshot.image_name.clone(),
            coordinate: Coordinate::default(),
            address: snapshot.address.clone(),
            phone_number: snapshot.number.clone(),
            place_id: None,
        }
    }
}

/// Persisted value of one `LIKED_PLACES` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FavoriteSnapshot {
    #[serde(rename = "imageName", default)]
    pub image_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub number: String,
}

/// Persisted reference to a recently searched place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPlaceRef {
    /// External place id.
    #[serde(rename = "rawValue")]
    pub raw_value: String,
    pub name: String,
}

impl RecentPlaceRef {
    pub fn new(raw_value: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            raw_value: raw_value.into(),
            name: name.into(),
        }
    }
}
