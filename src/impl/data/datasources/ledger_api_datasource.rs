use std::future::Future;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use log::warn;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    config::LedgerApiConfig,
    data::models::{
        customer_model::CustomerModel,
        invoice_model::InvoiceModel,
        ledger_envelope_model::{CustomersRequestModel, LedgerEnvelopeModel, OpenInvoicesRequestModel},
    },
    entities::{CustomerId, DateWindow},
    errors::{LedgerInvalidResponse, LedgerTransportError, LedgerUpstreamFailure},
};

const ENDPOINT_ALL_CUSTOMERS: &str = "getAllCustomers";
const ENDPOINT_OPEN_INVOICES: &str = "getOpenInvoices";

/// Upper bound on pages requested per query, in case the ledger ignores
/// `PageNumber` and keeps returning full pages.
const MAX_PAGES: u32 = 1000;

#[async_trait]
pub trait LedgerApiDatasource: Send + Sync {
    async fn get_all_customers(&self, search: &str) -> Result<Vec<CustomerModel>, ServerError>;

    async fn get_open_invoices(
        &self,
        customer_id: CustomerId,
        window: &DateWindow,
    ) -> Result<Vec<InvoiceModel>, ServerError>;
}

pub struct LedgerApiDatasourceImpl {
    client: reqwest::Client,
    base_url: String,
    authorization: String,
    page_size: u32,
}

impl LedgerApiDatasourceImpl {
    pub(crate) fn new(config: &LedgerApiConfig) -> Result<Self, ServerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LedgerTransportError::with_debug(&config.base_url, &e))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: serde_json::json!({
                "secret": config.secret,
                "userkey": config.user_key,
            })
            .to_string(),
            page_size: config.page_size,
        })
    }

    async fn post<B, T>(&self, endpoint: &str, body: B) -> Result<Vec<T>, ServerError>
    where
        B: serde::Serialize + Send,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, endpoint))
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerTransportError::with_debug(endpoint, &e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LedgerTransportError::with_debug(endpoint, &e))?;
        decode_response(endpoint, status, &bytes)
    }
}

/// Reads the envelope whatever the HTTP status, so that a failure reported by
/// the ledger keeps its message even on a non-2xx reply. The status only
/// decides the error when the body is not an envelope.
pub(crate) fn decode_response<T: DeserializeOwned>(
    endpoint: &str,
    status: StatusCode,
    body: &[u8],
) -> Result<Vec<T>, ServerError> {
    match serde_json::from_slice::<LedgerEnvelopeModel>(body) {
        Ok(envelope) if status.is_success() || !envelope.success => {
            unwrap_envelope(endpoint, envelope)
        }
        Ok(_) => Err(LedgerTransportError::with_debug(endpoint, &status)),
        Err(e) if status.is_success() => Err(LedgerInvalidResponse::with_debug(endpoint, &e)),
        Err(_) => Err(LedgerTransportError::with_debug(endpoint, &status)),
    }
}

/// Extracts the records of a successful response, or turns an explicit
/// failure flag into an error.
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(
    endpoint: &str,
    envelope: LedgerEnvelopeModel,
) -> Result<Vec<T>, ServerError> {
    if !envelope.success {
        return Err(LedgerUpstreamFailure::new(
            endpoint,
            envelope
                .error_message
                .as_deref()
                .unwrap_or("no error message provided"),
        ));
    }
    if envelope.return_value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(envelope.return_value)
        .map_err(|e| LedgerInvalidResponse::with_debug(endpoint, &e))
}

/// Requests pages 1, 2, ... and concatenates them, stopping at the first page
/// holding fewer than `page_size` records.
pub(crate) async fn collect_pages<T, F, Fut>(
    endpoint: &str,
    page_size: u32,
    mut fetch_page: F,
) -> Result<Vec<T>, ServerError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ServerError>>,
{
    let mut records = Vec::new();
    for page_number in 1..=MAX_PAGES {
        let page = fetch_page(page_number).await?;
        let is_last = page.len() < page_size as usize;
        records.extend(page);
        if is_last {
            return Ok(records);
        }
    }
    warn!(
        "'{}' still returned full pages after {} pages; keeping the {} records read so far.",
        endpoint,
        MAX_PAGES,
        records.len()
    );
    Ok(records)
}

#[async_trait]
impl LedgerApiDatasource for LedgerApiDatasourceImpl {
    async fn get_all_customers(&self, search: &str) -> Result<Vec<CustomerModel>, ServerError> {
        collect_pages(ENDPOINT_ALL_CUSTOMERS, self.page_size, move |page_number| {
            self.post(
                ENDPOINT_ALL_CUSTOMERS,
                CustomersRequestModel::by_balance_desc(search, self.page_size, page_number),
            )
        })
        .await
    }

    async fn get_open_invoices(
        &self,
        customer_id: CustomerId,
        window: &DateWindow,
    ) -> Result<Vec<InvoiceModel>, ServerError> {
        collect_pages(ENDPOINT_OPEN_INVOICES, self.page_size, move |page_number| {
            self.post(
                ENDPOINT_OPEN_INVOICES,
                OpenInvoicesRequestModel {
                    customer_id,
                    page_size: self.page_size,
                    page_number,
                    doc_type_id: 0,
                    from: window.wire_from(),
                    to: window.wire_to(),
                },
            )
        })
        .await
    }
}
