//! Process configuration, read once at start

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::domain::value_objects::PostalCode;

pub const DEFAULT_CARRIER_API_URL: &str = "https://www.melhorenvio.com.br/api/v2/me/shipment/calculate";
pub const DEFAULT_USER_AGENT: &str = "storefront-shipping (contato@storefront.com.br)";
pub const DEFAULT_ORIGIN_POSTAL_CODE: &str = "89010100";
pub const DEFAULT_INSURANCE_VALUE: f64 = 50.0;
pub const DEFAULT_CARRIER_TIMEOUT_SECS: u64 = 15;

/// Everything the quote fetcher needs from the environment.
#[derive(Clone, Debug)]
pub struct ShippingConfig {
    /// Bearer token for the carrier aggregator. Quoting is disabled without it.
    pub carrier_token: Option<String>,
    pub carrier_api_url: String,
    pub user_agent: String,
    pub origin_postal_code: PostalCode,
    /// Declared value per package.
    pub insurance_value: f64,
    pub carrier_timeout: Duration,
}

impl ShippingConfig {
    /// Defaults everywhere and no credential.
    pub fn without_credential() -> Self {
        Self {
            carrier_token: None,
            carrier_api_url: DEFAULT_CARRIER_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            origin_postal_code: PostalCode::from_static(DEFAULT_ORIGIN_POSTAL_CODE),
            insurance_value: DEFAULT_INSURANCE_VALUE,
            carrier_timeout: Duration::from_secs(DEFAULT_CARRIER_TIMEOUT_SECS),
        }
    }

    pub fn with_credential(token: impl Into<String>) -> Self {
        Self { carrier_token: Some(token.into()), ..Self::without_credential() }
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Self::without_credential();
        let origin = env::var("SHIPPING_ORIGIN_CEP").unwrap_or_else(|_| DEFAULT_ORIGIN_POSTAL_CODE.to_string());
        let insurance_value = match env::var("SHIPPING_INSURANCE_VALUE") {
            Ok(v) => v.parse::<f64>().context("SHIPPING_INSURANCE_VALUE must be a number")?,
            Err(_) => defaults.insurance_value,
        };
        let timeout_secs = match env::var("CARRIER_TIMEOUT_SECS") {
            Ok(v) => v.parse::<u64>().context("CARRIER_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_CARRIER_TIMEOUT_SECS,
        };
        Ok(Self {
            carrier_token: env::var("CARRIER_API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            carrier_api_url: env::var("CARRIER_API_URL").unwrap_or(defaults.carrier_api_url),
            user_agent: env::var("CARRIER_USER_AGENT").unwrap_or(defaults.user_agent),
            origin_postal_code: PostalCode::parse(&origin).with_context(|| format!("SHIPPING_ORIGIN_CEP {:?} is not a postal code", origin))?,
            insurance_value,
            carrier_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Settings of the HTTP service around the fetcher.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub nats_url: Option<String>,
    pub whatsapp_number: Option<String>,
    pub port: u16,
    pub shipping: ShippingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            nats_url: env::var("NATS_URL").ok(),
            whatsapp_number: env::var("WHATSAPP_NUMBER").ok().filter(|n| !n.trim().is_empty()),
            port: env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8083),
            shipping: ShippingConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShippingConfig::without_credential();
        assert!(config.carrier_token.is_none());
        assert_eq!(config.origin_postal_code.digits(), DEFAULT_ORIGIN_POSTAL_CODE);
        assert_eq!(ShippingConfig::with_credential("t").carrier_token.as_deref(), Some("t"));
    }
}
