use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;
use log::info;

use crate::{
    domain::{
        logic::{
            debt_filter::{candidates_in_debt, reconcile_debtors},
            invoice_loading::InvoiceLoadingStrategy,
        },
        repositories::ledger_repository::LedgerRepository,
    },
    entities::{Customer, DateWindow, WorkingSet},
};

#[async_trait]
pub trait ReconcileUsecase: Send + Sync {
    /// Debtors matching `search_term`, with balances adjusted by the open
    /// invoices issued between `from_date` and today.
    async fn reconcile(
        &self,
        search_term: &str,
        from_date: NaiveDate,
    ) -> Result<WorkingSet, ServerError>;

    async fn reconcile_window(
        &self,
        search_term: &str,
        window: &DateWindow,
    ) -> Result<WorkingSet, ServerError>;

    /// Open-invoice sum of one customer. Reuses what the last run loaded
    /// when the loading strategy keeps it.
    async fn open_invoice_sum(&self, customer: &Customer, window: &DateWindow) -> f64;
}

pub(crate) struct ReconcileUsecaseImpl<R, L>
where
    R: LedgerRepository,
    L: InvoiceLoadingStrategy,
{
    ledger_repository: R,
    invoice_loading: L,
}

impl<R, L> ReconcileUsecaseImpl<R, L>
where
    R: LedgerRepository,
    L: InvoiceLoadingStrategy,
{
    pub(crate) fn new(ledger_repository: R, invoice_loading: L) -> Self {
        Self {
            ledger_repository,
            invoice_loading,
        }
    }
}

#[async_trait]
impl<R, L> ReconcileUsecase for ReconcileUsecaseImpl<R, L>
where
    R: LedgerRepository,
    L: InvoiceLoadingStrategy,
{
    async fn reconcile(
        &self,
        search_term: &str,
        from_date: NaiveDate,
    ) -> Result<WorkingSet, ServerError> {
        self.reconcile_window(search_term, &DateWindow::until_today(from_date))
            .await
    }

    async fn reconcile_window(
        &self,
        search_term: &str,
        window: &DateWindow,
    ) -> Result<WorkingSet, ServerError> {
        // Candidate failures abort the run; nothing partial is returned.
        let customers = self.ledger_repository.customers(search_term).await?;
        let total = customers.len();
        let candidates = candidates_in_debt(customers);

        self.invoice_loading.invalidate();
        let invoice_sums = self
            .invoice_loading
            .invoice_sums(&self.ledger_repository, &candidates, window)
            .await;
        let debtors = reconcile_debtors(candidates, invoice_sums);

        info!(
            "Reconciled '{}' from {}: {} customer(s) fetched, {} in debt.",
            search_term,
            window.from,
            total,
            debtors.len()
        );
        Ok(WorkingSet::new(debtors))
    }

    async fn open_invoice_sum(&self, customer: &Customer, window: &DateWindow) -> f64 {
        self.invoice_loading
            .invoice_sum(&self.ledger_repository, customer, window)
            .await
    }
}
