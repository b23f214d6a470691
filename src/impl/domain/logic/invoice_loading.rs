use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use futures::future::join_all;
use log::warn;

use crate::{
    config::InvoiceLoadingMode,
    domain::repositories::ledger_repository::LedgerRepository,
    entities::{Customer, CustomerId, DateWindow, Invoice},
};

/// Resolves the open-invoice sum of each reconciliation candidate.
///
/// Failures are absorbed per customer: a failed query contributes a sum of
/// zero and is only logged.
#[async_trait]
pub trait InvoiceLoadingStrategy: Send + Sync {
    /// Returns one sum per customer, in the same order as `customers`.
    async fn invoice_sums(
        &self,
        ledger: &dyn LedgerRepository,
        customers: &[Customer],
        window: &DateWindow,
    ) -> Vec<f64>;

    /// Open-invoice sum of a single customer.
    async fn invoice_sum(
        &self,
        ledger: &dyn LedgerRepository,
        customer: &Customer,
        window: &DateWindow,
    ) -> f64;

    /// Drops anything remembered from previous runs. Called at the start of
    /// every reconciliation.
    fn invalidate(&self);
}

fn sum_invoices(invoices: &[Invoice]) -> f64 {
    invoices.iter().map(|i| i.total_price).sum()
}

async fn fetch_sum(ledger: &dyn LedgerRepository, customer: &Customer, window: &DateWindow) -> f64 {
    match ledger.open_invoices(customer.id, window).await {
        Ok(invoices) => sum_invoices(&invoices),
        Err(e) => {
            warn!(
                "Open invoices for customer {} ({}) could not be loaded, counting as 0: {:?}",
                customer.name, customer.id, e
            );
            0.0
        }
    }
}

// Eager.
// ---

/// Issues every per-customer query at once and waits for all of them. The
/// sums only become visible together, once the whole batch has resolved.
#[derive(Debug, Default)]
pub struct EagerBatchLoading;

#[async_trait]
impl InvoiceLoadingStrategy for EagerBatchLoading {
    async fn invoice_sums(
        &self,
        ledger: &dyn LedgerRepository,
        customers: &[Customer],
        window: &DateWindow,
    ) -> Vec<f64> {
        join_all(customers.iter().map(|c| fetch_sum(ledger, c, window))).await
    }

    async fn invoice_sum(
        &self,
        ledger: &dyn LedgerRepository,
        customer: &Customer,
        window: &DateWindow,
    ) -> f64 {
        fetch_sum(ledger, customer, window).await
    }

    fn invalidate(&self) {}
}

// Lazy.
// ---

/// Queries a customer's invoices on first access and remembers the sum for
/// the rest of the session. The session ends at the next reconciliation run.
///
/// Queries are issued one at a time. Per-customer lookups made after a run
/// (`invoice_sum`) are served from the cache filled by that run.
#[derive(Debug, Default)]
pub struct LazyCachedLoading {
    cache: Mutex<HashMap<(CustomerId, DateWindow), f64>>,
}

impl LazyCachedLoading {
    pub fn new() -> Self {
        Self::default()
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<(CustomerId, DateWindow), f64>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cached_len(&self) -> usize {
        self.cache().len()
    }
}

#[async_trait]
impl InvoiceLoadingStrategy for LazyCachedLoading {
    async fn invoice_sums(
        &self,
        ledger: &dyn LedgerRepository,
        customers: &[Customer],
        window: &DateWindow,
    ) -> Vec<f64> {
        let mut sums = Vec::with_capacity(customers.len());
        for customer in customers {
            sums.push(self.invoice_sum(ledger, customer, window).await);
        }
        sums
    }

    async fn invoice_sum(
        &self,
        ledger: &dyn LedgerRepository,
        customer: &Customer,
        window: &DateWindow,
    ) -> f64 {
        let key = (customer.id, *window);
        let cached = self.cache().get(&key).copied();
        if let Some(sum) = cached {
            return sum;
        }
        let sum = fetch_sum(ledger, customer, window).await;
        self.cache().insert(key, sum);
        sum
    }

    fn invalidate(&self) {
        self.cache().clear();
    }
}

// Configured.
// ---

/// Strategy picked from configuration.
#[derive(Debug)]
pub enum InvoiceLoading {
    Eager(EagerBatchLoading),
    Lazy(LazyCachedLoading),
}

impl From<InvoiceLoadingMode> for InvoiceLoading {
    fn from(mode: InvoiceLoadingMode) -> Self {
        match mode {
            InvoiceLoadingMode::Eager => InvoiceLoading::Eager(EagerBatchLoading),
            InvoiceLoadingMode::Lazy => InvoiceLoading::Lazy(LazyCachedLoading::new()),
        }
    }
}

#[async_trait]
impl InvoiceLoadingStrategy for InvoiceLoading {
    async fn invoice_sums(
        &self,
        ledger: &dyn LedgerRepository,
        customers: &[Customer],
        window: &DateWindow,
    ) -> Vec<f64> {
        match self {
            InvoiceLoading::Eager(s) => s.invoice_sums(ledger, customers, window).await,
            InvoiceLoading::Lazy(s) => s.invoice_sums(ledger, customers, window).await,
        }
    }

    async fn invoice_sum(
        &self,
        ledger: &dyn LedgerRepository,
        customer: &Customer,
        window: &DateWindow,
    ) -> f64 {
        match self {
            InvoiceLoading::Eager(s) => s.invoice_sum(ledger, customer, window).await,
            InvoiceLoading::Lazy(s) => s.invoice_sum(ledger, customer, window).await,
        }
    }

    fn invalidate(&self) {
        match self {
            InvoiceLoading::Eager(s) => s.invalidate(),
            InvoiceLoading::Lazy(s) => s.invalidate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;
    use fractic_server_error::ServerError;

    use super::*;
    use crate::errors::LedgerUpstreamFailure;

    struct FakeLedger {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LedgerRepository for FakeLedger {
        async fn customers(&self, _search_term: &str) -> Result<Vec<Customer>, ServerError> {
            Ok(vec![])
        }

        async fn open_invoices(
            &self,
            customer_id: CustomerId,
            _window: &DateWindow,
        ) -> Result<Vec<Invoice>, ServerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if customer_id == 13 {
                return Err(LedgerUpstreamFailure::new("getOpenInvoices", "boom"));
            }
            Ok(vec![invoice(customer_id, 10.0), invoice(customer_id, 5.5)])
        }
    }

    fn invoice(customer_id: CustomerId, total_price: f64) -> Invoice {
        Invoice {
            id: 1,
            document_number: "1001".to_string(),
            issue_date: None,
            total_price,
            customer_id,
        }
    }

    fn customer(id: CustomerId) -> Customer {
        Customer {
            id,
            name: format!("c{id}"),
            primary_phone: None,
            secondary_phone: None,
            ledger_balance: -100.0,
        }
    }

    fn window() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_eager_sums_in_order_and_absorbs_failures() {
        let ledger = FakeLedger {
            calls: AtomicUsize::new(0),
        };
        let sums = EagerBatchLoading
            .invoice_sums(&ledger, &[customer(1), customer(13), customer(2)], &window())
            .await;
        assert_eq!(sums, vec![15.5, 0.0, 15.5]);
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_lazy_caches_until_invalidated() {
        let ledger = FakeLedger {
            calls: AtomicUsize::new(0),
        };
        let lazy = LazyCachedLoading::new();
        let customers = [customer(1), customer(2)];

        let first = lazy.invoice_sums(&ledger, &customers, &window()).await;
        let second = lazy.invoice_sums(&ledger, &customers, &window()).await;
        assert_eq!(first, second);
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 2);
        assert_eq!(lazy.cached_len(), 2);

        lazy.invalidate();
        assert_eq!(lazy.cached_len(), 0);
        lazy.invoice_sums(&ledger, &customers, &window()).await;
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_lazy_lookup_served_from_batch() {
        let ledger = FakeLedger {
            calls: AtomicUsize::new(0),
        };
        let lazy = InvoiceLoading::from(InvoiceLoadingMode::Lazy);
        lazy.invoice_sums(&ledger, &[customer(1), customer(2)], &window())
            .await;
        assert_eq!(lazy.invoice_sum(&ledger, &customer(2), &window()).await, 15.5);
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 2);

        let eager = InvoiceLoading::from(InvoiceLoadingMode::Eager);
        assert_eq!(eager.invoice_sum(&ledger, &customer(2), &window()).await, 15.5);
        assert_eq!(ledger.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_lazy_absorbs_failures() {
        let ledger = FakeLedger {
            calls: AtomicUsize::new(0),
        };
        let lazy = LazyCachedLoading::new();
        assert_eq!(lazy.invoice_sum(&ledger, &customer(13), &window()).await, 0.0);
    }
}
