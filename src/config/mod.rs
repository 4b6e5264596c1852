use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    currency::{format_amount, CurrencyCode, LocaleConfig},
    errors::{LedgerError, Result},
    ledger::LoanTerms,
    storage::JsonStorage,
};

/// User preferences shared by the collection screens and the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default)]
    pub locale: LocaleConfig,
    /// Number of minor-unit digits stored in every amount (0 for whole rupees).
    #[serde(default)]
    pub amount_precision: u8,
    #[serde(default = "Config::default_loan_term_days")]
    pub default_loan_term_days: u32,
    #[serde(default = "Config::default_daily_amount")]
    pub default_daily_amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root for ledgers and backups. Defaults to the application data dir.
    pub data_root: Option<PathBuf>,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            locale: LocaleConfig::default(),
            amount_precision: 0,
            default_loan_term_days: Self::default_loan_term_days(),
            default_daily_amount: Self::default_daily_amount(),
            data_root: None,
            backup_retention: Self::default_backup_retention(),
        }
    }
}

impl Config {
    fn default_currency() -> String {
        "INR".into()
    }

    fn default_loan_term_days() -> u32 {
        60
    }

    fn default_daily_amount() -> u64 {
        200
    }

    fn default_backup_retention() -> usize {
        5
    }

    pub fn loan_terms(&self) -> LoanTerms {
        LoanTerms {
            term_days: self.default_loan_term_days,
            daily_amount: self.default_daily_amount,
        }
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.clone())
    }

    pub fn format_amount(&self, amount: u64) -> String {
        format_amount(
            amount,
            &self.currency_code(),
            &self.locale,
            self.amount_precision,
        )
    }

    pub fn open_storage(&self) -> Result<JsonStorage> {
        JsonStorage::new(self.data_root.clone(), Some(self.backup_retention))
    }

    fn validate(&self) -> Result<()> {
        if self.default_loan_term_days == 0 {
            return Err(LedgerError::ConfigError(
                "default_loan_term_days must be positive".into(),
            ));
        }
        if self.amount_precision > 4 {
            return Err(LedgerError::ConfigError(format!(
                "amount_precision {} is not supported",
                self.amount_precision
            )));
        }
        Ok(())
    }
}

/// Loads and saves [`Config`] as JSON under the application data root.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| LedgerError::ConfigError(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| LedgerError::ConfigError(err.to_string()))?;
        write_atomic(&self.path, &json)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
