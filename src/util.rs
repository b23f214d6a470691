use chrono::NaiveDate;
use fractic_server_error::ServerError;

use crate::{
    config::Config,
    data::{
        datasources::deep_link_datasource::DeepLinkNotificationSink,
        repositories::ledger_repository_impl::LedgerRepositoryImpl,
    },
    domain::{
        logic::{
            dispatcher::{CancelHandle, Dispatcher},
            invoice_loading::{InvoiceLoading, InvoiceLoadingStrategy},
            pacing::{FixedInterval, PacingPolicy},
            phone::PhoneNormalizer,
            selection::SelectionManager,
        },
        repositories::{ledger_repository::LedgerRepository, notification_sink::NotificationSink},
        usecases::{
            dispatch_usecase::DispatchUsecaseImpl,
            reconcile_usecase::{ReconcileUsecase as _, ReconcileUsecaseImpl},
        },
    },
    entities::{CustomerId, DateWindow, DispatchEvent, DispatchSummary, WorkingSet},
    presentation::message_fmt::MessageComposer,
};

/// Reminder workflow over the production ledger API and deep-link channel.
pub type DefaultDebtReminderUtil =
    DebtReminderUtil<LedgerRepositoryImpl, InvoiceLoading, DeepLinkNotificationSink, FixedInterval>;

/// Holds the current working set and selection, and ties reconciliation to
/// dispatch. The working set is only ever replaced by a successful refresh.
pub struct DebtReminderUtil<R, L, S, P>
where
    R: LedgerRepository,
    L: InvoiceLoadingStrategy,
    S: NotificationSink,
    P: PacingPolicy,
{
    reconcile_usecase: ReconcileUsecaseImpl<R, L>,
    dispatch_usecase: DispatchUsecaseImpl<S, P>,
    working_set: WorkingSet,
    window: Option<DateWindow>,
    selection: SelectionManager,
}

impl<R, L, S, P> DebtReminderUtil<R, L, S, P>
where
    R: LedgerRepository,
    L: InvoiceLoadingStrategy,
    S: NotificationSink,
    P: PacingPolicy,
{
    pub fn new(
        ledger_repository: R,
        invoice_loading: L,
        sink: S,
        pacing: P,
        normalizer: PhoneNormalizer,
        composer: MessageComposer,
    ) -> Self {
        Self {
            reconcile_usecase: ReconcileUsecaseImpl::new(ledger_repository, invoice_loading),
            dispatch_usecase: DispatchUsecaseImpl::new(Dispatcher::new(
                sink, pacing, normalizer, composer,
            )),
            working_set: WorkingSet::default(),
            window: None,
            selection: SelectionManager::new(),
        }
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Reconciles debtors from `from_date` until today. On failure the
    /// previous working set is kept as is.
    pub async fn refresh(
        &mut self,
        search_term: &str,
        from_date: NaiveDate,
    ) -> Result<&WorkingSet, ServerError> {
        self.refresh_window(search_term, &DateWindow::until_today(from_date))
            .await
    }

    pub async fn refresh_window(
        &mut self,
        search_term: &str,
        window: &DateWindow,
    ) -> Result<&WorkingSet, ServerError> {
        let working_set = self
            .reconcile_usecase
            .reconcile_window(search_term, window)
            .await?;
        Ok(self.replace_working_set(working_set, *window))
    }

    fn replace_working_set(&mut self, working_set: WorkingSet, window: DateWindow) -> &WorkingSet {
        self.working_set = working_set;
        self.window = Some(window);
        self.selection.retain_present(&self.working_set);
        &self.working_set
    }

    /// Open-invoice sum of a listed customer, over the window of the last
    /// successful refresh. `None` if the customer is not listed.
    pub async fn open_invoice_sum(&self, id: CustomerId) -> Option<f64> {
        let window = self.window.as_ref()?;
        let record = self.working_set.get(id)?;
        Some(
            self.reconcile_usecase
                .open_invoice_sum(&record.customer, window)
                .await,
        )
    }

    pub fn toggle(&mut self, id: CustomerId) {
        self.selection.toggle(id);
    }

    /// Selects every customer of the current working set.
    pub fn select_all_displayed(&mut self) {
        self.selection.select_all(self.working_set.ids());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Debt amount formatted the same way as in outgoing messages.
    pub fn format_amount(&self, amount: f64) -> String {
        self.dispatch_usecase
            .dispatcher()
            .composer()
            .format_amount(amount)
    }

    pub async fn dispatch<F>(
        &self,
        targets: Vec<CustomerId>,
        as_of_date: Option<NaiveDate>,
        cancel: CancelHandle,
        on_event: F,
    ) -> DispatchSummary
    where
        F: FnMut(&DispatchEvent),
    {
        self.dispatch_usecase
            .dispatch_all(targets, &self.working_set, as_of_date, cancel, on_event)
            .await
    }

    /// Sends to the current selection, in working-set order.
    pub async fn dispatch_selected<F>(
        &self,
        as_of_date: Option<NaiveDate>,
        cancel: CancelHandle,
        on_event: F,
    ) -> DispatchSummary
    where
        F: FnMut(&DispatchEvent),
    {
        let targets = self.selection.selected_ids(&self.working_set);
        self.dispatch(targets, as_of_date, cancel, on_event).await
    }

    pub async fn dispatch_one<F>(
        &self,
        id: CustomerId,
        as_of_date: Option<NaiveDate>,
        on_event: F,
    ) -> DispatchSummary
    where
        F: FnMut(&DispatchEvent),
    {
        self.dispatch(vec![id], as_of_date, CancelHandle::new(), on_event)
            .await
    }
}

impl DefaultDebtReminderUtil {
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let composer = match &config.message.template {
            Some(template) => MessageComposer::new(
                template.clone(),
                config.message.sender.clone(),
                config.message.currency,
                config.message.locale,
            )?,
            None => MessageComposer::with_default_template(
                config.message.sender.clone(),
                config.message.currency,
                config.message.locale,
            ),
        };
        Ok(Self::new(
            LedgerRepositoryImpl::new(&config.ledger)?,
            InvoiceLoading::from(config.invoice_loading),
            DeepLinkNotificationSink::from_config(&config.channel),
            FixedInterval(config.pacing_interval),
            PhoneNormalizer::new(config.country_calling_code.clone()),
            composer,
        ))
    }
}
