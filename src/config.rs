// Runtime configuration, read from the environment (and `.env`, loaded in main).

use crate::core::economy::{BackendKind, Currency};
use anyhow::{anyhow, bail, Context};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CURRENCIES: &str = "coins:Coins";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the embedded store keeps its file.
    pub data_dir: PathBuf,
    /// Base directory searched for `totaleconomy/accounts.conf`.
    pub legacy_dir: PathBuf,
    /// The active player balance backend.
    pub backend: BackendKind,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub currencies: Vec<Currency>,
    pub default_currency: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = PathBuf::from(
            var("ECONOMY_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        let legacy_dir = var("ECONOMY_LEGACY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.clone());

        let backend = match var("ECONOMY_BACKEND") {
            Some(raw) => raw
                .parse::<BackendKind>()
                .map_err(|e| anyhow!(e))
                .context("Invalid ECONOMY_BACKEND")?,
            None => BackendKind::Embedded,
        };

        let database_url = var("DATABASE_URL");
        if backend == BackendKind::Sql && database_url.is_none() {
            bail!("DATABASE_URL must be set when ECONOMY_BACKEND is sql");
        }

        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive number")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let currencies = parse_currencies(
            &var("ECONOMY_CURRENCIES").unwrap_or_else(|| DEFAULT_CURRENCIES.to_string()),
        );
        let default_currency = match var("ECONOMY_DEFAULT_CURRENCY") {
            Some(id) => id.trim().to_string(),
            None => currencies
                .first()
                .map(|c| c.id.clone())
                .context("ECONOMY_CURRENCIES must list at least one currency")?,
        };

        Ok(Self {
            data_dir,
            legacy_dir,
            backend,
            database_url,
            max_connections,
            currencies,
            default_currency,
        })
    }

    pub fn embedded_store_path(&self) -> PathBuf {
        self.data_dir.join("balances.json")
    }
}

/// Parse `id` or `id:Display Name` entries separated by commas.
fn parse_currencies(raw: &str) -> Vec<Currency> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((id, name)) => Currency::new(id.trim(), name.trim()),
            None => Currency::new(entry, entry),
        })
        .collect()
}
