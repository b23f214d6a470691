use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

/// Format a debt figure for display: absolute value, rounded to whole units,
/// grouped per `locale`, prefixed with the currency symbol.
///
/// The sign is dropped; messages phrase the context ("balance of
/// X") instead of printing a negative number.
pub(crate) fn format_debt(amount: f64, currency: Currency, locale: &Locale) -> String {
    let whole_units = (amount.abs().round() as i64).to_formatted_string(locale);
    format!("{}{}", currency.symbol(), whole_units)
}
