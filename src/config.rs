use std::{str::FromStr, time::Duration};

use fractic_server_error::ServerError;
use iso_currency::Currency;
use num_format::Locale;

use crate::errors::{InvalidConfiguration, MissingConfiguration};

pub const DEFAULT_LEDGER_API_BASE_URL: &str = "https://api.yeshinvoice.co.il/api/v1";
pub const DEFAULT_CHANNEL_BASE_URL: &str = "https://wa.me";
pub const DEFAULT_CHANNEL_OPENER: &str = "xdg-open";
pub const DEFAULT_COUNTRY_CALLING_CODE: &str = "972";
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_PACING_INTERVAL: Duration = Duration::from_millis(2000);

/// Selects how open invoices are fetched during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceLoadingMode {
    /// All per-customer queries issued at once, results published as a batch.
    Eager,
    /// Per-customer queries issued on first access and cached until the next
    /// reconciliation run.
    Lazy,
}

impl FromStr for InvoiceLoadingMode {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eager" => Ok(InvoiceLoadingMode::Eager),
            "lazy" => Ok(InvoiceLoadingMode::Lazy),
            _ => Err(InvalidConfiguration::new("INVOICE_LOADING", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LedgerApiConfig {
    pub base_url: String,
    pub secret: String,
    pub user_key: String,
    pub page_size: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub base_url: String,
    pub opener: String,
    /// Log the deep links instead of opening them.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct MessageConfig {
    pub template: Option<String>,
    pub sender: String,
    pub currency: Currency,
    pub locale: Locale,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub ledger: LedgerApiConfig,
    pub channel: ChannelConfig,
    pub message: MessageConfig,
    pub invoice_loading: InvoiceLoadingMode,
    pub country_calling_code: String,
    pub pacing_interval: Duration,
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup (the environment
    /// in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| MissingConfiguration::new(key));

        let page_size = parse_or("LEDGER_PAGE_SIZE", get("LEDGER_PAGE_SIZE"), DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(InvalidConfiguration::new("LEDGER_PAGE_SIZE", "0"));
        }
        let ledger = LedgerApiConfig {
            base_url: get("LEDGER_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LEDGER_API_BASE_URL.to_string()),
            secret: required("LEDGER_API_SECRET")?,
            user_key: required("LEDGER_API_USER_KEY")?,
            page_size,
            timeout: Duration::from_secs(parse_or(
                "LEDGER_TIMEOUT_SECS",
                get("LEDGER_TIMEOUT_SECS"),
                30,
            )?),
        };

        let channel = ChannelConfig {
            base_url: get("CHANNEL_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CHANNEL_BASE_URL.to_string()),
            opener: get("CHANNEL_OPENER").unwrap_or_else(|| DEFAULT_CHANNEL_OPENER.to_string()),
            dry_run: parse_or("CHANNEL_DRY_RUN", get("CHANNEL_DRY_RUN"), false)?,
        };

        let currency = match get("CURRENCY") {
            Some(code) => Currency::from_code(code.trim())
                .ok_or_else(|| InvalidConfiguration::new("CURRENCY", &code))?,
            None => Currency::ILS,
        };
        let locale = match get("LOCALE") {
            Some(name) => Locale::from_name(name.trim())
                .map_err(|e| InvalidConfiguration::with_debug("LOCALE", &name, &e))?,
            None => Locale::he,
        };
        let message = MessageConfig {
            template: get("MESSAGE_TEMPLATE").map(|t| t.replace("\\n", "\n")),
            sender: lookup("MESSAGE_SENDER").unwrap_or_default(),
            currency,
            locale,
        };

        let invoice_loading = match get("INVOICE_LOADING") {
            Some(mode) => mode.parse()?,
            None => InvoiceLoadingMode::Eager,
        };

        let country_calling_code = get("COUNTRY_CALLING_CODE")
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|| DEFAULT_COUNTRY_CALLING_CODE.to_string());
        // A leading zero would be taken for a trunk prefix by the normalizer.
        if country_calling_code.is_empty()
            || country_calling_code.starts_with('0')
            || !country_calling_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(InvalidConfiguration::new(
                "COUNTRY_CALLING_CODE",
                &country_calling_code,
            ));
        }

        let pacing_interval = match get("PACING_INTERVAL_MS") {
            Some(ms) => Duration::from_millis(parse_or("PACING_INTERVAL_MS", Some(ms), 0)?),
            None => DEFAULT_PACING_INTERVAL,
        };

        Ok(Config {
            ledger,
            channel,
            message,
            invoice_loading,
            country_calling_code,
            pacing_interval,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ServerError> {
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|_| InvalidConfiguration::new(key, &v)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied_when_only_credentials_given() {
        let config = Config::from_lookup(lookup_from(&[
            ("LEDGER_API_SECRET", "s"),
            ("LEDGER_API_USER_KEY", "u"),
        ]))
        .unwrap();

        assert_eq!(config.ledger.base_url, DEFAULT_LEDGER_API_BASE_URL);
        assert_eq!(config.ledger.page_size, 1000);
        assert_eq!(config.channel.base_url, "https://wa.me");
        assert!(!config.channel.dry_run);
        assert_eq!(config.invoice_loading, InvoiceLoadingMode::Eager);
        assert_eq!(config.country_calling_code, "972");
        assert_eq!(config.pacing_interval, Duration::from_millis(2000));
        assert_eq!(config.message.currency, Currency::ILS);
        assert!(config.message.template.is_none());
    }

    #[test]
    fn test_missing_credentials_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("LEDGER_API_SECRET", "s")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn test_overrides_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("LEDGER_API_SECRET", "s"),
            ("LEDGER_API_USER_KEY", "u"),
            ("INVOICE_LOADING", "Lazy"),
            ("PACING_INTERVAL_MS", "250"),
            ("CHANNEL_DRY_RUN", "true"),
            ("CURRENCY", "EUR"),
            ("LOCALE", "en"),
            ("MESSAGE_TEMPLATE", "Hi {{Name}}\\n{{Amount}}"),
        ]))
        .unwrap();

        assert_eq!(config.invoice_loading, InvoiceLoadingMode::Lazy);
        assert_eq!(config.pacing_interval, Duration::from_millis(250));
        assert!(config.channel.dry_run);
        assert_eq!(config.message.currency, Currency::EUR);
        assert_eq!(config.message.template.as_deref(), Some("Hi {{Name}}\n{{Amount}}"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let base = [("LEDGER_API_SECRET", "s"), ("LEDGER_API_USER_KEY", "u")];
        for bad in [
            ("INVOICE_LOADING", "sometimes"),
            ("PACING_INTERVAL_MS", "soon"),
            ("CURRENCY", "XXQ"),
            ("COUNTRY_CALLING_CODE", "+972"),
            ("COUNTRY_CALLING_CODE", "01"),
            ("LEDGER_PAGE_SIZE", "-1"),
            ("LEDGER_PAGE_SIZE", "0"),
        ] {
            let mut pairs = base.to_vec();
            pairs.push(bad);
            assert!(Config::from_lookup(lookup_from(&pairs)).is_err(), "{:?}", bad);
        }
    }
}
