pub mod itinerary;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::defaults::default_airports;
use crate::catalog::schema::Coordinate;

pub use itinerary::{
    breakdown, legs, resolve, Itinerary, ItineraryError, ItineraryStatus, Leg,
};

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("unknown location code: {code}")]
    NotFound { code: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirportTable {
    airports: BTreeMap<String, Coordinate>,
}

impl AirportTable {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: AsRef<str>,
    {
        let airports = entries
            .into_iter()
            .map(|(code, coordinate)| (normalize_code(code.as_ref()), coordinate))
            .collect();
        Self { airports }
    }

    pub fn with_defaults() -> Self {
        Self::from_entries(default_airports())
    }

    pub fn get(&self, code: &str) -> Option<Coordinate> {
        self.airports.get(&normalize_code(code)).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Coordinate)> {
        self.airports.iter().map(|(code, c)| (code.as_str(), c))
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

pub fn haversine_miles(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

pub fn distance(airports: &AirportTable, from: &str, to: &str) -> Result<u32, GeoError> {
    let start = airports.get(from).ok_or_else(|| GeoError::NotFound {
        code: normalize_code(from),
    })?;
    let end = airports.get(to).ok_or_else(|| GeoError::NotFound {
        code: normalize_code(to),
    })?;
    Ok(haversine_miles(start, end).round() as u32)
}
