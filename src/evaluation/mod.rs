use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::schema::Program;
use crate::catalog::Catalog;
use crate::geo::{Itinerary, ItineraryStatus};
use crate::valuation::{
    cpp, distance_metrics, parse_quantity, DistanceMetrics, UnavailableReason, ValuationError,
    ValuationResult,
};
use crate::verdict::{classify, Classification, Directionality};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_GREAT_CASH_DEAL_PER_MILE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub cash: Option<f64>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub program_id: Option<String>,
    #[serde(default)]
    pub itinerary: Itinerary,
}

impl EvaluationRequest {
    pub fn from_text(
        cash: &str,
        points: &str,
        currency: &str,
        program_id: Option<&str>,
        itinerary: Itinerary,
    ) -> Self {
        Self {
            cash: parse_quantity(cash),
            points: parse_quantity(points),
            currency: currency.trim().to_ascii_uppercase(),
            program_id: program_id.map(str::to_string),
            itinerary,
        }
    }
}

impl Default for EvaluationRequest {
    fn default() -> Self {
        Self {
            cash: None,
            points: None,
            currency: default_currency(),
            program_id: None,
            itinerary: Itinerary::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_great_cash_deal_per_mile")]
    pub great_cash_deal_per_mile: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            great_cash_deal_per_mile: default_great_cash_deal_per_mile(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Metric<T> {
    Available(T),
    Unavailable(UnavailableReason),
}

impl<T> Metric<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }
}

impl<T> From<Result<T, ValuationError>> for Metric<T> {
    fn from(value: Result<T, ValuationError>) -> Self {
        match value {
            Ok(value) => Self::Available(value),
            Err(err) => Self::Unavailable(err.reason()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub program: Option<Program>,
    pub currency: String,
    pub currency_recognized: bool,
    pub valuation: Metric<ValuationResult>,
    pub value_verdict: Option<Classification>,
    pub itinerary: ItineraryStatus,
    pub distance: Metric<DistanceMetrics>,
    pub great_cash_deal: bool,
    pub efficiency_verdict: Option<Classification>,
}

impl Evaluation {
    pub fn cpp(&self) -> Option<f64> {
        self.valuation.available().map(|v| v.cpp)
    }

    pub fn distance_metrics(&self) -> Option<&DistanceMetrics> {
        self.distance.available()
    }
}

pub fn evaluate(
    catalog: &Catalog,
    request: &EvaluationRequest,
    thresholds: &Thresholds,
) -> Evaluation {
    let program = catalog
        .programs
        .selected_or_first(request.program_id.as_deref())
        .cloned();
    if let (Some(wanted), Some(selected)) = (&request.program_id, &program) {
        if &selected.id != wanted {
            warn!("program {wanted} not in catalog, using {}", selected.id);
        }
    }

    let currency = request.currency.trim().to_ascii_uppercase();
    let currency_recognized = catalog.currencies.is_known(&currency);
    if !currency_recognized {
        warn!(
            "unrecognized currency {currency:?}, treating amount as {}",
            catalog.currencies.reference_code()
        );
    }

    let valuation = Metric::from(cpp(
        &catalog.currencies,
        request.cash,
        &currency,
        request.points,
    ));
    let value_verdict = match (valuation.available(), &program) {
        (Some(result), Some(program)) => Some(classify(
            result.cpp,
            program.value,
            Directionality::HigherIsBetter,
        )),
        _ => None,
    };

    let itinerary = request.itinerary.resolve(&catalog.airports);
    if let ItineraryStatus::Invalid { code, leg } = &itinerary {
        debug!("itinerary withheld: leg {leg} has unknown code {code}");
    }

    let distance = Metric::from(distance_metrics(
        &catalog.currencies,
        request.cash,
        &currency,
        request.points,
        itinerary.miles(),
    ));
    let great_cash_deal = distance
        .available()
        .is_some_and(|m| m.is_great_cash_deal(thresholds.great_cash_deal_per_mile));

    let efficiency_verdict = match (
        program.as_ref().and_then(Program::efficiency_benchmark),
        distance.available().and_then(|m| m.points_per_unit),
    ) {
        (Some(reference_ppm), Some(ppm)) => Some(classify(
            ppm,
            reference_ppm,
            Directionality::LowerIsBetter,
        )),
        _ => None,
    };

    Evaluation {
        program,
        currency,
        currency_recognized,
        valuation,
        value_verdict,
        itinerary,
        distance,
        great_cash_deal,
        efficiency_verdict,
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_great_cash_deal_per_mile() -> f64 {
    DEFAULT_GREAT_CASH_DEAL_PER_MILE
}
