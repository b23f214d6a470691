use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{Customer, CustomerId, DateWindow, Invoice};

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Candidate debtors matching `search_term`, ordered by ledger balance
    /// (descending) as returned by the ledger.
    async fn customers(&self, search_term: &str) -> Result<Vec<Customer>, ServerError>;

    /// Open invoices of the customer issued inside `window`.
    async fn open_invoices(
        &self,
        customer_id: CustomerId,
        window: &DateWindow,
    ) -> Result<Vec<Invoice>, ServerError>;
}
