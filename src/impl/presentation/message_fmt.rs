use std::collections::HashMap;

use chrono::NaiveDate;
use fractic_server_error::ServerError;
use iso_currency::Currency;
use num_format::Locale;
use regex::Regex;

use crate::{
    entities::ReconciledCustomer, errors::UnreplacedPlaceholdersRemain,
    presentation::currency_fmt::format_debt,
};

pub const DEFAULT_MESSAGE_TEMPLATE: &str = "שלום {{Name}},
ברצוננו להזכיר כי קיימת יתרת חוב על סך {{Amount}}.
נודה להסדרת התשלום בהקדם.

בברכה,
{{Sender}}";

const KEY_NAME: &str = "Name";
const KEY_AMOUNT: &str = "Amount";
const KEY_AS_OF_DATE: &str = "AsOfDate";
const KEY_SENDER: &str = "Sender";

/// Renders reminder messages from a `{{Key}}` template.
#[derive(Debug, Clone)]
pub struct MessageComposer {
    template: String,
    sender: String,
    currency: Currency,
    locale: Locale,
    placeholder_pattern: Regex,
}

impl MessageComposer {
    /// Fails if the template references a placeholder other than `Name`,
    /// `Amount`, `AsOfDate` or `Sender`.
    pub fn new(
        template: impl Into<String>,
        sender: impl Into<String>,
        currency: Currency,
        locale: Locale,
    ) -> Result<Self, ServerError> {
        let composer = Self {
            template: template.into(),
            sender: sender.into(),
            currency,
            locale,
            placeholder_pattern: Regex::new(r"\{\{(\w+)\}\}")
                .expect("hardcoded regex should be valid"),
        };
        composer.render(&composer.placeholders("", 0.0, None))?;
        Ok(composer)
    }

    pub fn with_default_template(
        sender: impl Into<String>,
        currency: Currency,
        locale: Locale,
    ) -> Self {
        Self::new(DEFAULT_MESSAGE_TEMPLATE, sender, currency, locale)
            .expect("default template should only use known placeholders")
    }

    pub fn format_amount(&self, amount: f64) -> String {
        format_debt(amount, self.currency, &self.locale)
    }

    pub fn compose(
        &self,
        record: &ReconciledCustomer,
        as_of_date: Option<NaiveDate>,
    ) -> Result<String, ServerError> {
        self.render(&self.placeholders(
            &record.customer.name,
            record.effective_balance,
            as_of_date,
        ))
    }

    fn placeholders(
        &self,
        name: &str,
        balance: f64,
        as_of_date: Option<NaiveDate>,
    ) -> HashMap<&'static str, String> {
        HashMap::from([
            (KEY_NAME, name.to_string()),
            (KEY_AMOUNT, self.format_amount(balance)),
            (
                KEY_AS_OF_DATE,
                as_of_date
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_default(),
            ),
            (KEY_SENDER, self.sender.clone()),
        ])
    }

    fn render(&self, placeholders: &HashMap<&'static str, String>) -> Result<String, ServerError> {
        let mut unknown_keys = Vec::new();
        let rendered = self
            .placeholder_pattern
            .replace_all(&self.template, |caps: &regex::Captures| {
                let key = &caps[1];
                match placeholders.get(key) {
                    Some(value) => value.clone(),
                    None => {
                        unknown_keys.push(key.to_string());
                        caps[0].to_string()
                    }
                }
            })
            .into_owned();

        if !unknown_keys.is_empty() {
            return Err(UnreplacedPlaceholdersRemain::new(&unknown_keys.join(", ")));
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Customer;

    fn record(name: &str, effective_balance: f64) -> ReconciledCustomer {
        ReconciledCustomer {
            customer: Customer {
                id: 1,
                name: name.to_string(),
                primary_phone: Some("0501234567".to_string()),
                secondary_phone: None,
                ledger_balance: effective_balance,
            },
            effective_balance,
        }
    }

    #[test]
    fn test_default_template_substitutes_name_amount_and_sender() {
        let composer =
            MessageComposer::with_default_template("Acme Ltd", Currency::USD, Locale::en);
        let message = composer.compose(&record("Dana", -1300.0), None).unwrap();
        assert!(message.starts_with("שלום Dana,\n"));
        assert!(message.contains("יתרת חוב על סך $1,300."));
        assert!(message.ends_with("בברכה,\nAcme Ltd"));
        assert!(!message.contains("{{"));
    }

    #[test]
    fn test_as_of_date_optional() {
        let composer = MessageComposer::new(
            "{{Name}} owes {{Amount}} as of {{AsOfDate}}.",
            "",
            Currency::USD,
            Locale::en,
        )
        .unwrap();
        let r = record("Noa", -50.0);
        assert_eq!(
            composer
                .compose(&r, NaiveDate::from_ymd_opt(2024, 5, 9))
                .unwrap(),
            "Noa owes $50 as of 09/05/2024."
        );
        assert_eq!(composer.compose(&r, None).unwrap(), "Noa owes $50 as of .");
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        assert!(MessageComposer::new("Hi {{Nickname}}", "", Currency::USD, Locale::en).is_err());
    }
}
