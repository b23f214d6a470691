use crate::entities::Customer;

use super::ledger_amount_model::LedgerAmountModel;

#[derive(Debug, serde_derive::Deserialize)]
pub struct CustomerModel {
    pub(crate) id: i64,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) phone: Option<String>,
    #[serde(default)]
    pub(crate) phone2: Option<String>,
    #[serde(default)]
    pub(crate) balance: LedgerAmountModel,
}

impl From<CustomerModel> for Customer {
    fn from(model: CustomerModel) -> Customer {
        Customer {
            id: model.id,
            name: model.name.unwrap_or_default(),
            primary_phone: model.phone,
            secondary_phone: model.phone2,
            ledger_balance: model.balance.into(),
        }
    }
}
