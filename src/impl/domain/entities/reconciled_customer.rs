use super::customer::{Customer, CustomerId};

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledCustomer {
    pub customer: Customer,
    /// Ledger balance adjusted by the open invoices inside the queried window.
    pub effective_balance: f64,
}

impl ReconciledCustomer {
    pub fn id(&self) -> CustomerId {
        self.customer.id
    }

    /// Outstanding amount as a positive figure, for display and messages.
    pub fn debt(&self) -> f64 {
        self.effective_balance.abs()
    }
}

/// Debtors that survived the latest reconciliation run, in ledger order.
///
/// A working set is only ever replaced as a whole; nothing mutates the
/// records of a published set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    records: Vec<ReconciledCustomer>,
}

impl WorkingSet {
    pub fn new(records: Vec<ReconciledCustomer>) -> Self {
        Self { records }
    }

    pub fn get(&self, id: CustomerId) -> Option<&ReconciledCustomer> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: CustomerId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<CustomerId> {
        self.records.iter().map(ReconciledCustomer::id).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_debt(&self) -> f64 {
        self.records.iter().map(ReconciledCustomer::debt).sum()
    }
}

impl<'a> IntoIterator for &'a WorkingSet {
    type Item = &'a ReconciledCustomer;
    type IntoIter = std::slice::Iter<'a, ReconciledCustomer>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
