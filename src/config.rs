use crate::domain::card::DEFAULT_DAILY_LIMIT;
use crate::domain::money::Money;
use crate::error::{AtmError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;

/// Largest single withdrawal.
pub const WITHDRAW_LIMIT: Money = 2_000_000;

/// Withdrawals must be a whole multiple of this.
pub const WITHDRAW_MULTIPLE: Money = 10_000;

/// Transfer fee charged to the sender.
pub const COMMISSION_RATE: Decimal = dec!(0.01);

/// Runtime settings for an ATM. Every field falls back to the built-in default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AtmConfig {
    pub withdraw_limit: Money,
    pub withdraw_multiple: Money,
    pub commission_rate: Decimal,
    /// Daily limit for cards whose fixture entry does not set one.
    pub daily_limit: Money,
    pub log_level: String,
}

impl Default for AtmConfig {
    fn default() -> Self {
        Self {
            withdraw_limit: WITHDRAW_LIMIT,
            withdraw_multiple: WITHDRAW_MULTIPLE,
            commission_rate: COMMISSION_RATE,
            daily_limit: DEFAULT_DAILY_LIMIT,
            log_level: "warn".to_string(),
        }
    }
}

impl AtmConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AtmConfig =
            serde_yaml::from_str(yaml).map_err(|e| AtmError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.withdraw_multiple <= 0 {
            return Err(AtmError::Config(
                "withdraw_multiple must be positive".to_string(),
            ));
        }
        if self.withdraw_limit <= 0 || self.daily_limit < 0 {
            return Err(AtmError::Config("limits must not be negative".to_string()));
        }
        if self.commission_rate < Decimal::ZERO || self.commission_rate >= Decimal::ONE {
            return Err(AtmError::Config(
                "commission_rate must be in [0, 1)".to_string(),
            ));
        }
        Ok(())
    }
}
