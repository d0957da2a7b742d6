use crate::valuation::currency::CurrencyTable;
use crate::valuation::{DistanceMetrics, UnavailableReason, ValuationError, ValuationResult};

pub fn parse_quantity(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Cents-per-point for a redemption.
///
/// `cpp = cash * rate * 100 / points`, with cash converted through the
/// currency table (unknown codes convert 1:1).
pub fn cpp(
    currencies: &CurrencyTable,
    cash: Option<f64>,
    currency: &str,
    points: Option<f64>,
) -> Result<ValuationResult, ValuationError> {
    let cash = require_positive(
        cash,
        UnavailableReason::MissingCash,
        UnavailableReason::NonPositiveCash,
    )?;
    let points = require_positive(
        points,
        UnavailableReason::MissingPoints,
        UnavailableReason::NonPositivePoints,
    )?;

    let cash_in_reference = currencies.to_reference(cash, currency);
    let cpp = (cash_in_reference * 100.0) / points;
    if !cpp.is_finite() {
        return Err(ValuationError::Unavailable(UnavailableReason::NonFinite));
    }
    Ok(ValuationResult {
        cpp,
        cash_in_reference,
    })
}

pub fn distance_metrics(
    currencies: &CurrencyTable,
    cash: Option<f64>,
    currency: &str,
    points: Option<f64>,
    total_miles: Option<u32>,
) -> Result<DistanceMetrics, ValuationError> {
    let total_distance = match total_miles {
        Some(miles) if miles > 0 => miles,
        _ => return Err(ValuationError::Unavailable(UnavailableReason::MissingDistance)),
    };
    let cash = require_positive(
        cash,
        UnavailableReason::MissingCash,
        UnavailableReason::NonPositiveCash,
    )?;

    let miles = f64::from(total_distance);
    let cash_per_unit = currencies.to_reference(cash, currency) / miles;
    if !cash_per_unit.is_finite() {
        return Err(ValuationError::Unavailable(UnavailableReason::NonFinite));
    }
    let points_per_unit = points
        .filter(|p| p.is_finite() && *p > 0.0)
        .map(|p| p / miles);

    Ok(DistanceMetrics {
        total_distance,
        cash_per_unit,
        points_per_unit,
    })
}

fn require_positive(
    value: Option<f64>,
    missing: UnavailableReason,
    non_positive: UnavailableReason,
) -> Result<f64, ValuationError> {
    let Some(value) = value else {
        return Err(ValuationError::Unavailable(missing));
    };
    if !value.is_finite() {
        return Err(ValuationError::Unavailable(UnavailableReason::NonFinite));
    }
    if value <= 0.0 {
        return Err(ValuationError::Unavailable(non_positive));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use crate::valuation::currency::CurrencyTable;
    use crate::valuation::engine::{cpp, distance_metrics, parse_quantity};
    use crate::valuation::{UnavailableReason, ValuationError};

    fn unavailable(reason: UnavailableReason) -> ValuationError {
        ValuationError::Unavailable(reason)
    }

    #[test]
    fn computes_cents_per_point() {
        let table = CurrencyTable::with_defaults();
        let result = cpp(&table, Some(500.0), "USD", Some(25_000.0)).unwrap();
        assert_eq!(result.cpp, 2.0);
        assert_eq!(result.cash_in_reference, 500.0);
    }

    #[test]
    fn cpp_matches_closed_form_for_each_currency() {
        let table = CurrencyTable::with_defaults();
        for currency in table.currencies() {
            let cash = 1234.5;
            let points = 60_000.0;
            let result = cpp(&table, Some(cash), &currency.code, Some(points)).unwrap();
            assert_eq!(result.cpp, cash * currency.rate * 100.0 / points);
        }
    }

    #[test]
    fn unknown_currency_uses_unit_rate() {
        let table = CurrencyTable::with_defaults();
        let known = cpp(&table, Some(300.0), "USD", Some(20_000.0)).unwrap();
        let unknown = cpp(&table, Some(300.0), "XXX", Some(20_000.0)).unwrap();
        assert_eq!(known, unknown);
    }

    #[test]
    fn cpp_unavailable_for_bad_inputs() {
        let table = CurrencyTable::with_defaults();
        assert_eq!(
            cpp(&table, Some(500.0), "USD", Some(0.0)),
            Err(unavailable(UnavailableReason::NonPositivePoints))
        );
        assert_eq!(
            cpp(&table, Some(500.0), "USD", Some(-10.0)),
            Err(unavailable(UnavailableReason::NonPositivePoints))
        );
        assert_eq!(
            cpp(&table, None, "USD", Some(10_000.0)),
            Err(unavailable(UnavailableReason::MissingCash))
        );
        assert_eq!(
            cpp(&table, Some(500.0), "USD", None),
            Err(unavailable(UnavailableReason::MissingPoints))
        );
        assert_eq!(
            cpp(&table, Some(f64::NAN), "USD", Some(10_000.0)),
            Err(unavailable(UnavailableReason::NonFinite))
        );
        assert_eq!(
            cpp(&table, Some(100.0), "USD", Some(f64::INFINITY)),
            Err(unavailable(UnavailableReason::NonFinite))
        );
    }

    #[test]
    fn cpp_is_deterministic() {
        let table = CurrencyTable::with_defaults();
        let first = cpp(&table, Some(812.4), "GBP", Some(41_000.0));
        let second = cpp(&table, Some(812.4), "GBP", Some(41_000.0));
        assert_eq!(first, second);
    }

    #[test]
    fn distance_metrics_per_mile() {
        let table = CurrencyTable::with_defaults();
        let metrics = distance_metrics(&table, Some(500.0), "USD", Some(30_000.0), Some(2_500))
            .unwrap();
        assert_eq!(metrics.total_distance, 2_500);
        assert!((metrics.cash_per_unit - 0.2).abs() < 1e-12);
        assert_eq!(metrics.points_per_unit, Some(12.0));
        assert!(!metrics.is_great_cash_deal(0.05));
    }

    #[test]
    fn points_per_mile_absent_when_points_not_supplied() {
        let table = CurrencyTable::with_defaults();
        let metrics = distance_metrics(&table, Some(100.0), "EUR", None, Some(3_000)).unwrap();
        assert_eq!(metrics.points_per_unit, None);
        assert!((metrics.cash_per_unit - 0.035).abs() < 1e-12);
        assert!(metrics.is_great_cash_deal(0.05));
    }

    #[test]
    fn distance_metrics_unavailable_without_distance_or_cash() {
        let table = CurrencyTable::with_defaults();
        assert_eq!(
            distance_metrics(&table, Some(100.0), "USD", None, None),
            Err(unavailable(UnavailableReason::MissingDistance))
        );
        assert_eq!(
            distance_metrics(&table, Some(100.0), "USD", None, Some(0)),
            Err(unavailable(UnavailableReason::MissingDistance))
        );
        assert_eq!(
            distance_metrics(&table, None, "USD", Some(1_000.0), Some(500)),
            Err(unavailable(UnavailableReason::MissingCash))
        );
    }

    #[test]
    fn parses_user_quantities() {
        assert_eq!(parse_quantity(" 25000 "), Some(25_000.0));
        assert_eq!(parse_quantity("1,250.50"), Some(1_250.5));
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("   "), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity("inf"), None);
    }
}
