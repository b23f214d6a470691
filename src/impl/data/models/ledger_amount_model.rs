use std::str::FromStr;

use fractic_server_error::ServerError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::LedgerInvalidResponse;

/// Monetary amount as sent by the ledger. Usually a JSON number, but some
/// endpoints send formatted strings ("1,234.50", or "(1,234.50)" for
/// negatives).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct LedgerAmountModel(pub f64);

impl FromStr for LedgerAmountModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.replace(",", "");
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(LedgerAmountModel(0.0));
        }
        let is_negative = raw.starts_with("(") && raw.ends_with(")");
        let numeric_part = raw.trim_matches(|c| c == '(' || c == ')');
        let amount = numeric_part
            .parse::<f64>()
            .map_err(|e| LedgerInvalidResponse::with_debug("amount", &e))?;
        Ok(LedgerAmountModel(if is_negative { -amount } else { amount }))
    }
}

impl<'de> Deserialize<'de> for LedgerAmountModel {
    fn deserialize<D>(deserializer: D) -> Result<LedgerAmountModel, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(LedgerAmountModel(n.as_f64().unwrap_or_default())),
            Value::String(s) => LedgerAmountModel::from_str(&s)
                .map_err(|_| serde::de::Error::custom(format!("invalid amount: '{}'", s))),
            Value::Null => Ok(LedgerAmountModel(0.0)),
            other => Err(serde::de::Error::custom(format!(
                "invalid amount: {}",
                other
            ))),
        }
    }
}

impl From<LedgerAmountModel> for f64 {
    fn from(model: LedgerAmountModel) -> f64 {
        model.0
    }
}
