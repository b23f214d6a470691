use serde_json::Value;

/// Envelope shared by every ledger endpoint.
#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct LedgerEnvelopeModel {
    #[serde(rename = "Success", default)]
    pub(crate) success: bool,
    #[serde(rename = "ReturnValue", default)]
    pub(crate) return_value: Value,
    #[serde(rename = "ErrorMessage", default)]
    pub(crate) error_message: Option<String>,
}

#[derive(Debug, serde_derive::Serialize)]
pub(crate) struct OrderByModel {
    pub(crate) column: &'static str,
    /// Despite the name, carries the direction ("asc" / "desc").
    pub(crate) asc: &'static str,
}

#[derive(Debug, serde_derive::Serialize)]
pub(crate) struct CustomersRequestModel<'a> {
    #[serde(rename = "PageSize")]
    pub(crate) page_size: u32,
    #[serde(rename = "PageNumber")]
    pub(crate) page_number: u32,
    #[serde(rename = "Search")]
    pub(crate) search: &'a str,
    #[serde(rename = "PortfolioID")]
    pub(crate) portfolio_id: i64,
    pub(crate) orderby: OrderByModel,
}

#[derive(Debug, serde_derive::Serialize)]
pub(crate) struct OpenInvoicesRequestModel {
    #[serde(rename = "CustomerID")]
    pub(crate) customer_id: i64,
    #[serde(rename = "PageSize")]
    pub(crate) page_size: u32,
    #[serde(rename = "PageNumber")]
    pub(crate) page_number: u32,
    #[serde(rename = "docTypeID")]
    pub(crate) doc_type_id: i64,
    pub(crate) from: String,
    pub(crate) to: String,
}

impl<'a> CustomersRequestModel<'a> {
    pub(crate) fn by_balance_desc(search: &'a str, page_size: u32, page_number: u32) -> Self {
        Self {
            page_size,
            page_number,
            search,
            portfolio_id: 0,
            orderby: OrderByModel {
                column: "Balance",
                asc: "desc",
            },
        }
    }
}
