//! Startup configuration, read once from the environment.

use std::net::SocketAddr;

use anyhow::Context;

use tally_ledger::{IbanPrefix, LedgerConfig};
use tally_observability::LogFormat;

pub const DEV_JWT_SECRET: &str = "dev-secret";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IBAN_COUNTRY: &str = "RO";
const DEFAULT_IBAN_BANK_CODE: &str = "TALY";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub log_format: LogFormat,
    pub ledger: LedgerConfig,
    pub iban_prefix: IbanPrefix,
}

impl ApiConfig {
    /// Defaults for everything except the signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> anyhow::Result<Self> {
        Self::from_lookup(|_| None).map(|config| Self {
            jwt_secret: jwt_secret.into(),
            ..config
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset and empty values fall
    /// back to defaults; malformed values are errors naming the variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("TALLY_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("TALLY_BIND_ADDR must be a socket address")?;

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string());

        let log_format = match var("TALLY_LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(anyhow::Error::msg)
                .context("TALLY_LOG_FORMAT")?,
            None => LogFormat::default(),
        };

        let seed_demo_transactions = match var("TALLY_SEED_DEMO_TRANSACTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .context("TALLY_SEED_DEMO_TRANSACTIONS must be true or false")?,
            None => LedgerConfig::default().seed_demo_transactions,
        };

        let country = var("TALLY_IBAN_COUNTRY").unwrap_or_else(|| DEFAULT_IBAN_COUNTRY.to_string());
        let bank_code = var("TALLY_IBAN_BANK_CODE").unwrap_or_else(|| DEFAULT_IBAN_BANK_CODE.to_string());
        let iban_prefix = IbanPrefix::new(&country, &bank_code)
            .context("TALLY_IBAN_COUNTRY / TALLY_IBAN_BANK_CODE")?;

        Ok(Self {
            bind_addr,
            jwt_secret,
            log_format,
            ledger: LedgerConfig { seed_demo_transactions },
            iban_prefix,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}
