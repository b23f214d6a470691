use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Issue date as sent by the ledger ("2024-03-01", "2024-03-01T10:22:00",
/// "2024-03-01 10:22" or "01/03/2024"). Anything else is kept as unknown
/// rather than failing the whole response.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct LedgerDateModel(pub Option<NaiveDate>);

impl LedgerDateModel {
    pub(crate) fn parse(s: &str) -> Self {
        let s = s.trim();
        let iso = s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
        LedgerDateModel(iso.or_else(|| NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()))
    }
}

impl<'de> Deserialize<'de> for LedgerDateModel {
    fn deserialize<D>(deserializer: D) -> Result<LedgerDateModel, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.map(|s| LedgerDateModel::parse(&s)).unwrap_or_default())
    }
}

impl From<LedgerDateModel> for Option<NaiveDate> {
    fn from(model: LedgerDateModel) -> Option<NaiveDate> {
        model.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(LedgerDateModel::parse("2024-03-01").0, expected);
        assert_eq!(LedgerDateModel::parse("2024-03-01T10:22:00").0, expected);
        assert_eq!(LedgerDateModel::parse("2024-03-01 10:22").0, expected);
        assert_eq!(LedgerDateModel::parse("01/03/2024").0, expected);
    }

    #[test]
    fn test_unknown_format_is_none() {
        assert_eq!(LedgerDateModel::parse("yesterday").0, None);
        assert_eq!(serde_json::from_str::<LedgerDateModel>("null").unwrap().0, None);
    }
}
