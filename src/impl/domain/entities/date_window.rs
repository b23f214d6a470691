use chrono::{Local, NaiveDate};

/// Inclusive range of issue dates used when querying open invoices. The lower
/// bound starts at 00:00 of `from`, the upper bound ends at 23:59 of `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn until_today(from: NaiveDate) -> Self {
        Self::new(from, Local::now().date_naive())
    }

    pub(crate) fn wire_from(&self) -> String {
        format!("{} 00:00", self.from.format("%Y-%m-%d"))
    }

    pub(crate) fn wire_to(&self) -> String {
        format!("{} 23:59", self.to.format("%Y-%m-%d"))
    }
}
