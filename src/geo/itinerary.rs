use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{distance, normalize_code, AirportTable, GeoError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub layovers: Vec<String>,
    #[serde(default)]
    pub destination: String,
}

impl Itinerary {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            layovers: Vec::new(),
            destination: destination.into(),
        }
    }

    pub fn with_layover(mut self, code: impl Into<String>) -> Self {
        self.layovers.push(code.into());
        self
    }

    pub fn codes(&self) -> Vec<&str> {
        std::iter::once(self.origin.as_str())
            .chain(self.layovers.iter().map(String::as_str))
            .chain(std::iter::once(self.destination.as_str()))
            .filter(|code| !code.trim().is_empty())
            .collect()
    }

    pub fn resolve(&self, airports: &AirportTable) -> ItineraryStatus {
        ItineraryStatus::from(resolve(airports, &self.codes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItineraryError {
    #[error("leg {leg} references unknown location code {code}")]
    Invalid { code: String, leg: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub miles: u32,
}

pub fn legs<S: AsRef<str>>(
    airports: &AirportTable,
    codes: &[S],
) -> Result<Vec<Leg>, ItineraryError> {
    let stops: Vec<&str> = codes
        .iter()
        .map(AsRef::as_ref)
        .filter(|code| !code.trim().is_empty())
        .collect();

    let mut out = Vec::with_capacity(stops.len().saturating_sub(1));
    for (leg, pair) in stops.windows(2).enumerate() {
        let miles = distance(airports, pair[0], pair[1])
            .map_err(|GeoError::NotFound { code }| ItineraryError::Invalid { code, leg })?;
        out.push(Leg {
            from: normalize_code(pair[0]),
            to: normalize_code(pair[1]),
            miles,
        });
    }
    Ok(out)
}

/// Total distance over the route. Fewer than two non-blank codes gives
/// `Ok(None)`; a single bad leg fails the whole route.
pub fn resolve<S: AsRef<str>>(
    airports: &AirportTable,
    codes: &[S],
) -> Result<Option<u32>, ItineraryError> {
    let legs = legs(airports, codes)?;
    if legs.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        legs.iter()
            .fold(0u32, |total, leg| total.saturating_add(leg.miles)),
    ))
}

pub fn breakdown<S: AsRef<str>>(
    airports: &AirportTable,
    codes: &[S],
) -> (Vec<Leg>, ItineraryStatus) {
    match legs(airports, codes) {
        Ok(legs) => {
            let status = match legs.iter().map(|leg| leg.miles).reduce(u32::saturating_add) {
                Some(miles) => ItineraryStatus::Resolved { miles },
                None => ItineraryStatus::Incomplete,
            };
            (legs, status)
        }
        Err(ItineraryError::Invalid { code, leg }) => {
            (Vec::new(), ItineraryStatus::Invalid { code, leg })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItineraryStatus {
    Incomplete,
    Resolved { miles: u32 },
    Invalid { code: String, leg: usize },
}

impl ItineraryStatus {
    pub fn miles(&self) -> Option<u32> {
        match self {
            Self::Resolved { miles } => Some(*miles),
            Self::Incomplete | Self::Invalid { .. } => None,
        }
    }
}

impl From<Result<Option<u32>, ItineraryError>> for ItineraryStatus {
    fn from(value: Result<Option<u32>, ItineraryError>) -> Self {
        match value {
            Ok(Some(miles)) => Self::Resolved { miles },
            Ok(None) => Self::Incomplete,
            Err(ItineraryError::Invalid { code, leg }) => Self::Invalid { code, leg },
        }
    }
}
