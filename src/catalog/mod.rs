pub mod defaults;
pub mod programs;
pub mod schema;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::defaults::{default_knowledge_base, REFERENCE_CURRENCY};
use crate::geo::AirportTable;
use crate::valuation::CurrencyTable;

pub use programs::{NewProgram, ProgramCatalog};
pub use schema::{Category, CategoryFilter, Coordinate, Currency, KnowledgeEntry, Program};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed reading catalog file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed parsing catalog {origin}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value {value} for {field}")]
    InvalidValue { field: String, value: f64 },
    #[error("duplicate program id: {0}")]
    DuplicateId(String),
    #[error("duplicate currency code: {0}")]
    DuplicateCurrency(String),
    #[error("coordinate out of range for location {0}")]
    InvalidCoordinate(String),
    #[error("knowledge base fragment must not be empty")]
    EmptyFragment,
    #[error("program name must not be empty")]
    EmptyName,
    #[error("reference currency {0} missing or not at rate 1.0")]
    MissingReferenceCurrency(String),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub programs: ProgramCatalog,
    pub currencies: CurrencyTable,
    pub airports: AirportTable,
    pub knowledge_base: Vec<KnowledgeEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    reference_currency: Option<String>,
    #[serde(default)]
    programs: Vec<Program>,
    #[serde(default)]
    currencies: Vec<Currency>,
    #[serde(default)]
    airports: BTreeMap<String, Coordinate>,
    #[serde(default)]
    knowledge_base: Vec<KnowledgeEntry>,
}

impl Catalog {
    pub fn with_defaults() -> Self {
        Self {
            programs: ProgramCatalog::with_defaults(),
            currencies: CurrencyTable::with_defaults(),
            airports: AirportTable::with_defaults(),
            knowledge_base: default_knowledge_base(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&data, &path.display().to_string())
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::with_defaults()),
        }
    }

    pub fn from_toml_str(data: &str, origin: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(data).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_file(file)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let programs = if file.programs.is_empty() {
            ProgramCatalog::with_defaults()
        } else {
            ProgramCatalog::new(file.programs)?
        };

        let currencies = if file.currencies.is_empty() {
            CurrencyTable::with_defaults()
        } else {
            let reference = file
                .reference_currency
                .as_deref()
                .unwrap_or(REFERENCE_CURRENCY);
            CurrencyTable::new(reference, file.currencies)?
        };

        let airports = if file.airports.is_empty() {
            AirportTable::with_defaults()
        } else {
            for (code, coordinate) in &file.airports {
                if !coordinate.is_valid() {
                    return Err(CatalogError::InvalidCoordinate(code.clone()));
                }
            }
            AirportTable::from_entries(file.airports)
        };

        let knowledge_base = if file.knowledge_base.is_empty() {
            default_knowledge_base()
        } else {
            let mut entries = Vec::with_capacity(file.knowledge_base.len());
            for entry in file.knowledge_base {
                let entry = KnowledgeEntry::new(&entry.fragment, entry.value);
                if entry.fragment.is_empty() {
                    return Err(CatalogError::EmptyFragment);
                }
                if !(entry.value.is_finite() && entry.value > 0.0) {
                    return Err(CatalogError::InvalidValue {
                        field: format!("knowledge_base.{}", entry.fragment),
                        value: entry.value,
                    });
                }
                entries.push(entry);
            }
            entries
        };

        Ok(Self {
            programs,
            currencies,
            airports,
            knowledge_base,
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::catalog::{Catalog, CatalogError, Category};

    const SYNTHETIC: &str = r#"
reference_currency = "EUR"

[[programs]]
id = "bx"
name = "Blue Sky Miles"
category = "airline"
value = 1.1
reference_ppm = 7.5

[[programs]]
id = "inn"
name = "Inn Points"
category = "hotel"
value = 0.5

[[currencies]]
code = "EUR"
symbol = "€"
rate = 1.0

[[currencies]]
code = "SEK"
symbol = "kr"
rate = 0.09

[airports]
aaa = { lat = 0.0, lon = 0.0 }
BBB = { latitude = 0.0, longitude = 1.0 }

[[knowledge_base]]
fragment = "  Blue Sky "
value = 1.1
"#;

    #[test]
    fn parses_synthetic_catalog() {
        let catalog = Catalog::from_toml_str(SYNTHETIC, "inline").unwrap();
        assert_eq!(catalog.programs.len(), 2);
        assert_eq!(catalog.programs.by_id("inn").unwrap().category, Category::Hotel);
        assert_eq!(catalog.currencies.reference_code(), "EUR");
        assert_eq!(catalog.currencies.rate("sek"), 0.09);
        assert!(catalog.airports.contains("AAA"));
        assert_eq!(catalog.airports.len(), 2);
        assert_eq!(catalog.knowledge_base[0].fragment, "blue sky");
    }

    #[test]
    fn empty_file_uses_builtin_tables() {
        let catalog = Catalog::from_toml_str("", "empty").unwrap();
        let defaults = Catalog::with_defaults();
        assert_eq!(catalog.programs.len(), defaults.programs.len());
        assert_eq!(catalog.airports, defaults.airports);
        assert_eq!(catalog.knowledge_base, defaults.knowledge_base);
    }

    #[test]
    fn rejects_invalid_tables() {
        let bad_coordinate = "[airports]\nXXX = { lat = 120.0, lon = 0.0 }\n";
        assert!(matches!(
            Catalog::from_toml_str(bad_coordinate, "inline"),
            Err(CatalogError::InvalidCoordinate(code)) if code == "XXX"
        ));

        let bad_value = "[[knowledge_base]]\nfragment = \"x\"\nvalue = 0.0\n";
        assert!(matches!(
            Catalog::from_toml_str(bad_value, "inline"),
            Err(CatalogError::InvalidValue { .. })
        ));

        assert!(matches!(
            Catalog::from_toml_str("programs = 3", "inline"),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SYNTHETIC.as_bytes()).unwrap();
        let catalog = Catalog::load(file.path()).unwrap();
        assert!(catalog.programs.by_id("bx").is_some());

        let missing = Catalog::load(std::path::Path::new("/definitely/not/here.toml"));
        assert!(matches!(missing, Err(CatalogError::Read { .. })));
    }
}
