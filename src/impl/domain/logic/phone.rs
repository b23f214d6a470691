use fractic_server_error::ServerError;

use crate::{config::DEFAULT_COUNTRY_CALLING_CODE, entities::Customer, errors::NoUsablePhone};

/// Maps raw phone strings to international dialable digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNormalizer {
    country_calling_code: String,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_CALLING_CODE)
    }
}

impl PhoneNormalizer {
    pub fn new(country_calling_code: impl Into<String>) -> Self {
        Self {
            country_calling_code: country_calling_code.into(),
        }
    }

    /// Strips everything but digits, replaces a leading trunk '0' with the
    /// country calling code, and prepends the code if it is still missing.
    ///
    /// Idempotent. Blank input yields the bare country code, which
    /// `is_usable` rejects.
    pub fn normalize(&self, raw: &str) -> String {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let code = self.country_calling_code.as_str();
        let digits = match digits.strip_prefix('0') {
            Some(rest) => format!("{code}{rest}"),
            None => digits,
        };
        if digits.starts_with(code) {
            digits
        } else {
            format!("{code}{digits}")
        }
    }

    /// Whether a normalized number carries anything beyond the country code.
    pub fn is_usable(&self, normalized: &str) -> bool {
        normalized.len() > self.country_calling_code.len()
    }

    /// Normalized number to contact the customer at. The secondary phone wins
    /// when it is usable, otherwise the primary one is tried.
    pub fn resolve(&self, customer: &Customer) -> Result<String, ServerError> {
        customer
            .phone_candidates()
            .map(|raw| self.normalize(raw))
            .find(|normalized| self.is_usable(normalized))
            .ok_or_else(|| NoUsablePhone::new(&customer.name, customer.id))
    }
}
