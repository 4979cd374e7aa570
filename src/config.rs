use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{locale::format_price, search_store::Passengers};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// Display and form defaults for the booking core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoreConfig {
    pub locale: String,
    pub currency: String,
    pub search_debounce_ms: u64,
    pub default_passengers: Passengers,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            currency: "USD".to_string(),
            search_debounce_ms: 300,
            default_passengers: Passengers::default(),
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading core config");
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.locale.trim().is_empty() {
            return Err(ConfigError::Invalid("locale must not be empty".to_string()));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "currency must be a three letter code, got {:?}",
                self.currency
            )));
        }
        if self.search_debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "search_debounce_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn format_price(&self, amount: f64) -> String {
        format_price(amount, &self.currency, &self.locale)
    }
}
