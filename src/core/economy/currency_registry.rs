use super::economy_models::Currency;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("At least one currency must be configured")]
    Empty,
    #[error("Default currency '{0}' is not in the configured currency list")]
    UnknownDefault(String),
    #[error("Currency id '{0}' must be non-empty and must not contain '%'")]
    InvalidId(String),
}

/// Read-only view of the currencies the economy knows about.
pub trait CurrencyRegistry: Send + Sync {
    fn currencies(&self) -> Vec<Currency>;
    fn default_currency(&self) -> Currency;
}

/// Currency list loaded once from configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredCurrencies {
    currencies: Vec<Currency>,
    default_index: usize,
}

impl ConfiguredCurrencies {
    pub fn new(currencies: Vec<Currency>, default_id: &str) -> Result<Self, CurrencyError> {
        if currencies.is_empty() {
            return Err(CurrencyError::Empty);
        }
        // Ids travel inside raw account records, which are split on `%-%`.
        if let Some(bad) = currencies
            .iter()
            .find(|c| c.id.is_empty() || c.id.contains('%'))
        {
            return Err(CurrencyError::InvalidId(bad.id.clone()));
        }

        let default_index = currencies
            .iter()
            .position(|c| c.id == default_id)
            .ok_or_else(|| CurrencyError::UnknownDefault(default_id.to_string()))?;

        Ok(Self {
            currencies,
            default_index,
        })
    }
}

impl CurrencyRegistry for ConfiguredCurrencies {
    fn currencies(&self) -> Vec<Currency> {
        self.currencies.clone()
    }

    fn default_currency(&self) -> Currency {
        self.currencies[self.default_index].clone()
    }
}
