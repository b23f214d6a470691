use chrono::NaiveDate;

pub type CustomerId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub primary_phone: Option<String>,
    pub secondary_phone: Option<String>,
    /// Signed balance as reported by the ledger. Negative means the customer
    /// owes money.
    pub ledger_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: i64,
    pub document_number: String,
    pub issue_date: Option<NaiveDate>,
    pub total_price: f64,
    pub customer_id: CustomerId,
}

// --

impl Customer {
    /// Phone numbers in order of preference (secondary first), skipping blank
    /// entries.
    pub fn phone_candidates(&self) -> impl Iterator<Item = &str> {
        [self.secondary_phone.as_deref(), self.primary_phone.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// The phone shown next to the customer in listings.
    pub fn contact_phone(&self) -> Option<&str> {
        self.phone_candidates().next()
    }
}
