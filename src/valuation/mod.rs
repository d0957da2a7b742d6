pub mod currency;
pub mod engine;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use currency::CurrencyTable;
pub use engine::{cpp, distance_metrics, parse_quantity};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValuationResult {
    pub cpp: f64,
    pub cash_in_reference: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DistanceMetrics {
    pub total_distance: u32,
    pub cash_per_unit: f64,
    pub points_per_unit: Option<f64>,
}

impl DistanceMetrics {
    pub fn is_great_cash_deal(&self, threshold_per_mile: f64) -> bool {
        self.cash_per_unit < threshold_per_mile
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    MissingCash,
    MissingPoints,
    NonPositiveCash,
    NonPositivePoints,
    NonFinite,
    MissingDistance,
}

impl Display for UnavailableReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::MissingCash => "cash amount not supplied",
            Self::MissingPoints => "points amount not supplied",
            Self::NonPositiveCash => "cash amount must be positive",
            Self::NonPositivePoints => "points amount must be positive",
            Self::NonFinite => "input is not a finite number",
            Self::MissingDistance => "itinerary distance not available",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValuationError {
    #[error("result unavailable: {0}")]
    Unavailable(UnavailableReason),
}

impl ValuationError {
    pub fn reason(&self) -> UnavailableReason {
        match self {
            Self::Unavailable(reason) => *reason,
        }
    }
}
