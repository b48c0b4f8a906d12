//! Area domain module.
//!
//! Bookable dining areas. Exclusive areas (VIP rooms) host one party per
//! session; shared areas (the main hall) sum party sizes against capacity.
//! Areas are maintained by staff tooling and are read-only to bookings.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{AreaId, ValidationError};

/// How occupancy of an area is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    /// One booking per date and session.
    Exclusive,
    /// Many bookings whose pax sum is bounded by capacity.
    Shared,
}

impl AreaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaKind::Exclusive => "exclusive",
            AreaKind::Shared => "shared",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "exclusive" => Ok(AreaKind::Exclusive),
            "shared" => Ok(AreaKind::Shared),
            other => Err(ValidationError::invalid_format(
                "area_kind",
                format!("unknown area kind '{}'", other),
            )),
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Amenities shown to guests when choosing a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenities {
    pub has_ktv: bool,
    pub has_restroom: bool,
    pub has_tv: bool,
    pub has_couch: bool,
}

/// A bookable dining area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub kind: AreaKind,
    pub capacity: u32,
    pub min_pax: u32,
    pub description: String,
    pub amenities: Amenities,
    pub is_active: bool,
}

impl Area {
    /// Creates an active area with no amenities and `min_pax` of 1.
    pub fn new(
        name: impl Into<String>,
        kind: AreaKind,
        capacity: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if capacity == 0 {
            return Err(ValidationError::out_of_range(
                "capacity",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        Ok(Self {
            id: AreaId::new(),
            name,
            kind,
            capacity,
            min_pax: 1,
            description: String::new(),
            amenities: Amenities::default(),
            is_active: true,
        })
    }

    pub fn with_min_pax(mut self, min_pax: u32) -> Self {
        self.min_pax = min_pax.max(1);
        self
    }

    pub fn with_amenities(mut self, amenities: Amenities) -> Self {
        self.amenities = amenities;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn is_exclusive(&self) -> bool {
        self.kind == AreaKind::Exclusive
    }
}
