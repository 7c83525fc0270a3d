//! Great-circle geometry for the geo queries
//!
//! The Earth is treated as a sphere; distances are central angles scaled
//! by the radius in the requested unit.

use derive_more::Display;
use std::str::FromStr;

use crate::error::TourError;

pub const EARTH_RADIUS_MI: f64 = 3963.2;
pub const EARTH_RADIUS_KM: f64 = 6378.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DistanceUnit {
    #[display("mi")]
    Miles,
    #[display("km")]
    Kilometers,
}

impl DistanceUnit {
    /// `mi` selects miles; any other unit means kilometres
    pub fn parse(unit: &str) -> Self {
        if unit == "mi" {
            Self::Miles
        } else {
            Self::Kilometers
        }
    }

    pub const fn earth_radius(&self) -> f64 {
        match self {
            Self::Miles => EARTH_RADIUS_MI,
            Self::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

/// A point given as `lat,lng` in a path segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Central angle to `other`, in radians (haversine)
    pub fn central_angle(&self, other: &LatLng) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * h.sqrt().min(1.0).asin()
    }

    pub fn distance_to(&self, other: &LatLng, unit: DistanceUnit) -> f64 {
        self.central_angle(other) * unit.earth_radius()
    }
}

impl FromStr for LatLng {
    type Err = TourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s.split_once(',').ok_or(TourError::InvalidLatLng)?;
        let lat: f64 = lat.trim().parse().map_err(|_| TourError::InvalidLatLng)?;
        let lng: f64 = lng.trim().parse().map_err(|_| TourError::InvalidLatLng)?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(TourError::InvalidLatLng);
        }
        Ok(Self { lat, lng })
    }
}
