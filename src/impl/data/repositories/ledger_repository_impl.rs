use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    config::LedgerApiConfig,
    data::datasources::ledger_api_datasource::{LedgerApiDatasource, LedgerApiDatasourceImpl},
    domain::repositories::ledger_repository::LedgerRepository,
    entities::{Customer, CustomerId, DateWindow, Invoice},
};

pub struct LedgerRepositoryImpl<DS = LedgerApiDatasourceImpl>
where
    DS: LedgerApiDatasource,
{
    datasource: DS,
}

#[async_trait]
impl<DS> LedgerRepository for LedgerRepositoryImpl<DS>
where
    DS: LedgerApiDatasource,
{
    async fn customers(&self, search_term: &str) -> Result<Vec<Customer>, ServerError> {
        Ok(self
            .datasource
            .get_all_customers(search_term)
            .await?
            .into_iter()
            .map(Customer::from)
            .collect())
    }

    async fn open_invoices(
        &self,
        customer_id: CustomerId,
        window: &DateWindow,
    ) -> Result<Vec<Invoice>, ServerError> {
        Ok(self
            .datasource
            .get_open_invoices(customer_id, window)
            .await?
            .into_iter()
            .map(|i| i.into_invoice(customer_id))
            .collect())
    }
}

impl LedgerRepositoryImpl<LedgerApiDatasourceImpl> {
    pub fn new(config: &LedgerApiConfig) -> Result<Self, ServerError> {
        Ok(LedgerRepositoryImpl {
            datasource: LedgerApiDatasourceImpl::new(config)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::models::{customer_model::CustomerModel, invoice_model::InvoiceModel};

    struct CannedDatasource;

    #[async_trait]
    impl LedgerApiDatasource for CannedDatasource {
        async fn get_all_customers(&self, _search: &str) -> Result<Vec<CustomerModel>, ServerError> {
            Ok(serde_json::from_str(
                r#"[{"id": 4, "name": "Dana", "phone": "050-1234567", "phone2": "054-7654321", "balance": -500}]"#,
            )
            .unwrap())
        }

        async fn get_open_invoices(
            &self,
            _customer_id: CustomerId,
            _window: &DateWindow,
        ) -> Result<Vec<InvoiceModel>, ServerError> {
            Ok(serde_json::from_str(
                r#"[{"ID": 1, "DocumentNumber": "A-1", "Date": "2024-01-05", "TotalPrice": 120.5}]"#,
            )
            .unwrap())
        }
    }

    #[tokio::test]
    async fn test_models_mapped_to_entities() {
        let repo = LedgerRepositoryImpl {
            datasource: CannedDatasource,
        };

        let customers = repo.customers("").await.unwrap();
        assert_eq!(
            customers,
            vec![Customer {
                id: 4,
                name: "Dana".to_string(),
                primary_phone: Some("050-1234567".to_string()),
                secondary_phone: Some("054-7654321".to_string()),
                ledger_balance: -500.0,
            }]
        );

        let window = DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let invoices = repo.open_invoices(4, &window).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].customer_id, 4);
        assert_eq!(invoices[0].document_number, "A-1");
        assert_eq!(invoices[0].total_price, 120.5);
    }
}
