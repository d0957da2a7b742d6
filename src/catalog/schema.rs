use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Airline,
    Hotel,
    Bank,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Airline, Category::Hotel, Category::Bank];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Airline => "airline",
            Self::Hotel => "hotel",
            Self::Bank => "bank",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Airline => "Airline",
            Self::Hotel => "Hotel",
            Self::Bank => "Bank",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown program category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "airline" | "airlines" | "air" => Ok(Self::Airline),
            "hotel" | "hotels" => Ok(Self::Hotel),
            "bank" | "banks" | "card" => Ok(Self::Bank),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Category::from_str(s).map(Self::Only)
    }
}

/// A loyalty program and its benchmark valuation.
///
/// `value` is the reference cents-per-point. `reference_ppm` is the expected
/// points spent per flown mile and is only meaningful for airlines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_ppm: Option<f64>,
}

impl Program {
    pub fn new(id: &str, name: &str, category: Category, value: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            value,
            reference_ppm: None,
        }
    }

    pub fn with_reference_ppm(mut self, ppm: f64) -> Self {
        self.reference_ppm = Some(ppm);
        self
    }

    pub fn efficiency_benchmark(&self) -> Option<f64> {
        if self.category != Category::Airline {
            return None;
        }
        self.reference_ppm.filter(|ppm| ppm.is_finite() && *ppm > 0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub rate: f64,
}

impl Currency {
    pub fn new(code: &str, symbol: &str, name: &str, rate: f64) -> Self {
        Self {
            code: code.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            rate,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeEntry {
    pub fragment: String,
    pub value: f64,
}

impl KnowledgeEntry {
    pub fn new(fragment: &str, value: f64) -> Self {
        Self {
            fragment: fragment.trim().to_lowercase(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Category, CategoryFilter, Coordinate, Program};

    #[test]
    fn parses_categories_case_insensitively() {
        assert_eq!(Category::from_str("Airline").unwrap(), Category::Airline);
        assert_eq!(Category::from_str(" HOTEL ").unwrap(), Category::Hotel);
        assert!(Category::from_str("cruise").is_err());
        assert_eq!(CategoryFilter::from_str("all").unwrap(), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_str("bank").unwrap(),
            CategoryFilter::Only(Category::Bank)
        );
    }

    #[test]
    fn efficiency_benchmark_only_for_airlines() {
        let airline = Program::new("ua", "United", Category::Airline, 1.3).with_reference_ppm(10.0);
        assert_eq!(airline.efficiency_benchmark(), Some(10.0));

        let hotel = Program::new("hy", "Hyatt", Category::Hotel, 1.8).with_reference_ppm(10.0);
        assert_eq!(hotel.efficiency_benchmark(), None);

        let bare = Program::new("xx", "Bare", Category::Airline, 1.0);
        assert_eq!(bare.efficiency_benchmark(), None);
    }

    #[test]
    fn coordinate_range_check() {
        assert!(Coordinate::new(51.47, -0.4543).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }
}
