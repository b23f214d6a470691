use chrono::NaiveDate;
use futures::StreamExt as _;

use crate::{
    domain::{
        logic::{
            dispatcher::{CancelHandle, Dispatcher},
            pacing::PacingPolicy,
        },
        repositories::notification_sink::NotificationSink,
    },
    entities::{CustomerId, DispatchEvent, DispatchSummary, WorkingSet},
};

pub(crate) struct DispatchUsecaseImpl<S, P>
where
    S: NotificationSink,
    P: PacingPolicy,
{
    dispatcher: Dispatcher<S, P>,
}

impl<S, P> DispatchUsecaseImpl<S, P>
where
    S: NotificationSink,
    P: PacingPolicy,
{
    pub(crate) fn new(dispatcher: Dispatcher<S, P>) -> Self {
        Self { dispatcher }
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher<S, P> {
        &self.dispatcher
    }

    /// Drives a dispatch run to completion, reporting every event to
    /// `on_event`, and returns the final tally.
    pub(crate) async fn dispatch_all<F>(
        &self,
        targets: Vec<CustomerId>,
        working_set: &WorkingSet,
        as_of_date: Option<NaiveDate>,
        cancel: CancelHandle,
        mut on_event: F,
    ) -> DispatchSummary
    where
        F: FnMut(&DispatchEvent),
    {
        let events = self
            .dispatcher
            .dispatch(targets, working_set, as_of_date, cancel);
        futures::pin_mut!(events);

        let mut summary = DispatchSummary::default();
        while let Some(event) = events.next().await {
            on_event(&event);
            if let DispatchEvent::Finished { summary: s, .. } = event {
                summary = s;
            }
        }
        summary
    }
}
