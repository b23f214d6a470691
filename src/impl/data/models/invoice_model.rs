use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::entities::{CustomerId, Invoice};

use super::{ledger_amount_model::LedgerAmountModel, ledger_date_model::LedgerDateModel};

#[derive(Debug, serde_derive::Deserialize)]
pub struct InvoiceModel {
    #[serde(rename = "ID", alias = "id", default)]
    pub(crate) id: i64,
    #[serde(rename = "DocumentNumber", default)]
    pub(crate) document_number: DocumentNumberModel,
    #[serde(rename = "Date", default)]
    pub(crate) date: LedgerDateModel,
    #[serde(rename = "TotalPrice", default)]
    pub(crate) total_price: LedgerAmountModel,
}

/// Document numbers arrive either as strings or as plain numbers.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct DocumentNumberModel(pub String);

impl<'de> Deserialize<'de> for DocumentNumberModel {
    fn deserialize<D>(deserializer: D) -> Result<DocumentNumberModel, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(DocumentNumberModel(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        }))
    }
}

impl InvoiceModel {
    pub(crate) fn into_invoice(self, customer_id: CustomerId) -> Invoice {
        Invoice {
            id: self.id,
            document_number: self.document_number.0,
            issue_date: self.date.into(),
            total_price: self.total_price.into(),
            customer_id,
        }
    }
}
