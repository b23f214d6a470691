use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::NaiveDate;
use futures::{stream, Stream};
use log::{debug, info, warn};

use crate::{
    domain::{
        logic::{pacing::PacingPolicy, phone::PhoneNormalizer},
        repositories::notification_sink::NotificationSink,
    },
    entities::{
        CustomerId, DispatchEvent, DispatchProgress, DispatchStatus, DispatchSummary,
        ReconciledCustomer, TargetOutcome, WorkingSet,
    },
    presentation::message_fmt::MessageComposer,
};

/// Stops an in-flight dispatch run. Checked before each target and after each
/// pacing delay; the target being handed off when `cancel` is called still
/// completes.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct Dispatcher<S, P>
where
    S: NotificationSink,
    P: PacingPolicy,
{
    sink: S,
    pacing: P,
    normalizer: PhoneNormalizer,
    composer: MessageComposer,
}

struct Run<'a> {
    targets: Arc<[CustomerId]>,
    working_set: &'a WorkingSet,
    as_of_date: Option<NaiveDate>,
    cancel: CancelHandle,
    next_index: usize,
    hand_offs: usize,
    summary: DispatchSummary,
}

enum Step {
    Target(CustomerId, TargetOutcome),
    Cancelled,
}

impl<S, P> Dispatcher<S, P>
where
    S: NotificationSink,
    P: PacingPolicy,
{
    pub fn new(sink: S, pacing: P, normalizer: PhoneNormalizer, composer: MessageComposer) -> Self {
        Self {
            sink,
            pacing,
            normalizer,
            composer,
        }
    }

    pub fn composer(&self) -> &MessageComposer {
        &self.composer
    }

    /// Walks `targets` in order, one at a time, and yields an event per
    /// target followed by a single `Finished` event.
    ///
    /// The stream is lazy: nothing is sent until it is polled. Consecutive
    /// hand-offs to the channel are separated by one pacing pause; there is no
    /// pause before the first or after the last one. Targets missing from
    /// `working_set` or without a usable phone are skipped, never retried.
    pub fn dispatch<'a>(
        &'a self,
        targets: Vec<CustomerId>,
        working_set: &'a WorkingSet,
        as_of_date: Option<NaiveDate>,
        cancel: CancelHandle,
    ) -> impl Stream<Item = DispatchEvent> + 'a {
        let run = Run {
            targets: targets.into(),
            working_set,
            as_of_date,
            cancel,
            next_index: 0,
            hand_offs: 0,
            summary: DispatchSummary::default(),
        };
        if !run.targets.is_empty() {
            info!("Dispatching reminders to {} customer(s).", run.targets.len());
        }

        stream::unfold(Some(run), move |run| async move {
            let mut run = match run {
                Some(run) => run,
                None => return None,
            };
            let step = if run.next_index < run.targets.len() && !run.cancel.is_cancelled() {
                Some(self.step(&mut run).await)
            } else {
                None
            };

            match step {
                Some(Step::Target(customer_id, outcome)) => {
                    run.summary.record(&outcome);
                    let event = DispatchEvent::Target {
                        progress: DispatchProgress {
                            target_list: run.targets.clone(),
                            current_index: run.next_index - 1,
                            status: DispatchStatus::Running,
                        },
                        customer_id,
                        outcome,
                    };
                    Some((event, Some(run)))
                }
                Some(Step::Cancelled) | None => {
                    let cancelled = run.next_index < run.targets.len();
                    if cancelled {
                        info!(
                            "Dispatch cancelled after {} of {} target(s).",
                            run.next_index,
                            run.targets.len()
                        );
                    } else if !run.targets.is_empty() {
                        info!(
                            "Dispatch finished: {} sent, {} failed, {} skipped.",
                            run.summary.sent, run.summary.failed, run.summary.skipped
                        );
                    }
                    let event = DispatchEvent::Finished {
                        progress: DispatchProgress {
                            current_index: run.next_index,
                            target_list: run.targets,
                            status: DispatchStatus::Idle,
                        },
                        summary: run.summary,
                        cancelled,
                    };
                    Some((event, None))
                }
            }
        })
    }

    async fn step(&self, run: &mut Run<'_>) -> Step {
        let customer_id = run.targets[run.next_index];
        let working_set = run.working_set;

        let Some(record) = working_set.get(customer_id) else {
            warn!("Customer {} is not in the working set, skipping.", customer_id);
            run.next_index += 1;
            return Step::Target(customer_id, TargetOutcome::NotFound);
        };

        let phone = match self.normalizer.resolve(&record.customer) {
            Ok(phone) => phone,
            Err(e) => {
                warn!("Skipping reminder: {:?}", e);
                run.next_index += 1;
                return Step::Target(customer_id, TargetOutcome::NoUsablePhone);
            }
        };

        if run.hand_offs > 0 {
            self.pacing.pause().await;
            if run.cancel.is_cancelled() {
                return Step::Cancelled;
            }
        }

        run.next_index += 1;
        run.hand_offs += 1;
        Step::Target(
            customer_id,
            self.hand_off(record, &phone, run.as_of_date).await,
        )
    }

    async fn hand_off(
        &self,
        record: &ReconciledCustomer,
        phone: &str,
        as_of_date: Option<NaiveDate>,
    ) -> TargetOutcome {
        let message = match self.composer.compose(record, as_of_date) {
            Ok(message) => message,
            Err(e) => {
                warn!("Could not compose reminder for customer {}: {:?}", record.id(), e);
                return TargetOutcome::Failed;
            }
        };
        match self.sink.send(phone, &message).await {
            Ok(()) => {
                debug!("Reminder handed off for customer {} ({}).", record.id(), phone);
                TargetOutcome::Sent
            }
            Err(e) => {
                warn!("Reminder for customer {} was not handed off: {:?}", record.id(), e);
                TargetOutcome::Failed
            }
        }
    }
}
