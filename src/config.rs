use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::evaluation::Thresholds;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_program")]
    pub program: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_lookup_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub currency: Option<String>,
    pub program: Option<String>,
    pub catalog_path: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/redemption-oracle/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(currency) = overrides.currency {
            self.defaults.currency = currency;
        }
        if let Some(program) = overrides.program {
            self.defaults.program = program;
        }
        if let Some(path) = overrides.catalog_path {
            self.catalog.path = path;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_catalog_path(&self) -> Option<PathBuf> {
        let trimmed = self.catalog.path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(expand_tilde(trimmed))
        }
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        let path = self.resolved_catalog_path();
        Catalog::load_or_default(path.as_deref()).with_context(|| match &path {
            Some(path) => format!("failed loading catalog: {}", path.display()),
            None => "failed loading built-in catalog".to_string(),
        })
    }

    pub fn lookup_delay(&self) -> Duration {
        Duration::from_millis(self.lookup.delay_ms)
    }

    pub fn default_template() -> String {
        let template = r#"[defaults]
currency = "USD"
program = "ua"

[catalog]
# TOML file with [[programs]], [[currencies]], [airports] and
# [[knowledge_base]] tables. Leave empty for the built-in data.
path = ""

[lookup]
delay_ms = 1500

[thresholds]
great_cash_deal_per_mile = 0.05
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            program: default_program(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_lookup_delay_ms(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_program() -> String {
    "ua".to_string()
}

fn default_lookup_delay_ms() -> u64 {
    1500
}
