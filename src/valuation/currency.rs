use serde::{Deserialize, Serialize};

use crate::catalog::defaults::{default_currencies, REFERENCE_CURRENCY};
use crate::catalog::schema::Currency;
use crate::catalog::CatalogError;

/// Fallback rate for codes missing from the table. Unknown codes are treated
/// as already being in the reference currency.
pub const FALLBACK_RATE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTable {
    reference: String,
    currencies: Vec<Currency>,
}

impl CurrencyTable {
    pub fn new(reference: &str, currencies: Vec<Currency>) -> Result<Self, CatalogError> {
        for (idx, currency) in currencies.iter().enumerate() {
            if currencies[..idx]
                .iter()
                .any(|seen| seen.code.trim().eq_ignore_ascii_case(currency.code.trim()))
            {
                return Err(CatalogError::DuplicateCurrency(currency.code.clone()));
            }
            if !(currency.rate.is_finite() && currency.rate > 0.0) {
                return Err(CatalogError::InvalidValue {
                    field: format!("{}.rate", currency.code),
                    value: currency.rate,
                });
            }
        }
        let table = Self {
            reference: reference.trim().to_ascii_uppercase(),
            currencies,
        };
        match table.by_code(&table.reference) {
            Some(currency) if currency.rate == 1.0 => Ok(table),
            _ => Err(CatalogError::MissingReferenceCurrency(table.reference)),
        }
    }

    pub fn with_defaults() -> Self {
        Self {
            reference: REFERENCE_CURRENCY.to_string(),
            currencies: default_currencies(),
        }
    }

    pub fn reference_code(&self) -> &str {
        &self.reference
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn by_code(&self, code: &str) -> Option<&Currency> {
        let code = code.trim();
        self.currencies
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn is_known(&self, code: &str) -> bool {
        self.by_code(code).is_some()
    }

    pub fn rate(&self, code: &str) -> f64 {
        self.by_code(code).map_or(FALLBACK_RATE, |c| c.rate)
    }

    pub fn to_reference(&self, amount: f64, code: &str) -> f64 {
        amount * self.rate(code)
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::schema::Currency;
    use crate::catalog::CatalogError;
    use crate::valuation::currency::CurrencyTable;

    #[test]
    fn converts_with_static_rates() {
        let table = CurrencyTable::with_defaults();
        assert_eq!(table.to_reference(100.0, "USD"), 100.0);
        assert!((table.to_reference(100.0, "EUR") - 105.0).abs() < 1e-9);
        assert!((table.to_reference(10_000.0, "jpy") - 66.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_code_passes_amount_through() {
        let table = CurrencyTable::with_defaults();
        assert_eq!(table.to_reference(123.45, "XXX"), 123.45);
        assert_eq!(table.to_reference(123.45, ""), 123.45);
        assert!(!table.is_known("XXX"));
    }

    #[test]
    fn validates_reference_and_rates() {
        let ok = CurrencyTable::new(
            "eur",
            vec![
                Currency::new("EUR", "€", "Euro", 1.0),
                Currency::new("USD", "$", "US Dollar", 0.95),
            ],
        )
        .unwrap();
        assert_eq!(ok.reference_code(), "EUR");

        let missing = CurrencyTable::new("USD", vec![Currency::new("EUR", "€", "Euro", 1.0)]);
        assert!(matches!(
            missing,
            Err(CatalogError::MissingReferenceCurrency(code)) if code == "USD"
        ));

        let bad_rate = CurrencyTable::new(
            "USD",
            vec![
                Currency::new("USD", "$", "US Dollar", 1.0),
                Currency::new("EUR", "€", "Euro", -1.0),
            ],
        );
        assert!(matches!(bad_rate, Err(CatalogError::InvalidValue { .. })));
    }

    #[test]
    fn rejects_duplicate_codes_in_any_case() {
        let shadowed = CurrencyTable::new(
            "USD",
            vec![
                Currency::new("USD", "$", "US Dollar", 1.0),
                Currency::new("EUR", "€", "Euro", 1.05),
                Currency::new("eur", "€", "Euro", 2.0),
            ],
        );
        assert!(matches!(
            shadowed,
            Err(CatalogError::DuplicateCurrency(code)) if code == "eur"
        ));
    }
}
