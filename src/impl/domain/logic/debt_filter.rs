use crate::entities::{Customer, ReconciledCustomer};

pub(crate) fn is_in_debt(balance: f64) -> bool {
    balance < 0.0
}

/// Cheap pre-filter on the raw ledger balance, applied before any invoice is
/// fetched.
pub(crate) fn candidates_in_debt(customers: Vec<Customer>) -> Vec<Customer> {
    customers
        .into_iter()
        .filter(|c| is_in_debt(c.ledger_balance))
        .collect()
}

/// Pairs candidates with their invoice sums and keeps those still in debt,
/// preserving the candidate order.
pub(crate) fn reconcile_debtors(
    candidates: Vec<Customer>,
    invoice_sums: Vec<f64>,
) -> Vec<ReconciledCustomer> {
    candidates
        .into_iter()
        .zip(invoice_sums)
        .map(|(customer, invoice_sum)| ReconciledCustomer {
            effective_balance: customer.ledger_balance + invoice_sum,
            customer,
        })
        .filter(|r| is_in_debt(r.effective_balance))
        .collect()
}
