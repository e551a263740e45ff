//! This module holds the session, which carries the outcome of a lookup from the step that submits
//! it to the step that displays it.

use tracing::warn;

use crate::lookup::Outcome;

/// This struct holds at most one outcome waiting to be displayed. Outcomes are popped when read, so
/// each one is displayed once at most.
#[derive(Default)]
pub(crate) struct Session {
    /// This field contains the outcome of the last submitted lookup, if it hasn't been displayed.
    pending: Option<Outcome>,
}

impl Session {
    /// This function stores the outcome of a lookup, replacing any outcome still pending.
    pub(crate) fn put(&mut self, outcome: Outcome) {
        if self.pending.replace(outcome).is_some() {
            warn!("discarding a lookup outcome that was never displayed");
        }
    }

    /// This function pops the pending outcome, leaving the session empty.
    pub(crate) fn take(&mut self) -> Option<Outcome> {
        self.pending.take()
    }
}
