use std::sync::Arc;

use super::customer::CustomerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Idle,
    Running,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchProgress {
    pub target_list: Arc<[CustomerId]>,
    /// Index into `target_list` of the target the event refers to.
    pub current_index: usize,
    pub status: DispatchStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    /// Link handed off to the messaging channel.
    Sent,
    /// Channel hand-off (or message composition) failed. Not retried.
    Failed,
    NoUsablePhone,
    /// Target id is not part of the working set the run was started with.
    NotFound,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    Target {
        progress: DispatchProgress,
        customer_id: CustomerId,
        outcome: TargetOutcome,
    },
    /// Always the last event of a run. `progress.status` is back to `Idle`.
    Finished {
        progress: DispatchProgress,
        summary: DispatchSummary,
        cancelled: bool,
    },
}

// --

impl DispatchProgress {
    pub fn total(&self) -> usize {
        self.target_list.len()
    }
}

impl DispatchSummary {
    pub(crate) fn record(&mut self, outcome: &TargetOutcome) {
        match outcome {
            TargetOutcome::Sent => self.sent += 1,
            TargetOutcome::Failed => self.failed += 1,
            TargetOutcome::NoUsablePhone | TargetOutcome::NotFound => self.skipped += 1,
        }
    }
}
