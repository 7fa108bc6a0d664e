use std::sync::{Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;

/// Handle for one started request. Only the most recently issued ticket
/// may commit its result.
#[derive(Debug, Clone)]
pub(crate) struct Ticket {
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    token: Option<CancellationToken>,
}

impl Slot {
    fn supersede(&mut self) {
        if let Some(previous) = self.token.take() {
            previous.cancel();
        }
        self.generation += 1;
    }
}

/// Tracks the current request of a state container. Starting a new request
/// cancels the previous one. State transitions passed in as closures run
/// under the slot lock, so a stale commit can never interleave with a newer
/// start.
#[derive(Debug, Default)]
pub(crate) struct Inflight {
    slot: Mutex<Slot>,
}

impl Inflight {
    pub(crate) fn begin(&self, on_start: impl FnOnce()) -> Ticket {
        let mut slot = self.lock();
        slot.supersede();
        let token = CancellationToken::new();
        slot.token = Some(token.clone());
        on_start();
        Ticket {
            generation: slot.generation,
            token,
        }
    }

    /// Cancel whatever is running and invalidate all issued tickets.
    pub(crate) fn cancel(&self, on_cancel: impl FnOnce()) {
        let mut slot = self.lock();
        slot.supersede();
        on_cancel();
    }

    /// Run `apply` if `ticket` is still the latest. Returns whether it ran.
    pub(crate) fn commit(&self, ticket: &Ticket, apply: impl FnOnce()) -> bool {
        let mut slot = self.lock();
        if slot.generation != ticket.generation || ticket.token.is_cancelled() {
            return false;
        }
        slot.token = None;
        apply();
        true
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // Slot holds plain values, so a poisoned lock is still usable.
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ticket_supersedes_old() {
        let inflight = Inflight::default();
        let first = inflight.begin(|| {});
        let second = inflight.begin(|| {});
        assert!(first.token().is_cancelled());
        assert!(!second.token().is_cancelled());

        let mut applied = Vec::new();
        assert!(!inflight.commit(&first, || applied.push("first")));
        assert!(inflight.commit(&second, || applied.push("second")));
        assert_eq!(applied, vec!["second"]);
    }

    #[test]
    fn test_cancel_invalidates_ticket() {
        let inflight = Inflight::default();
        let ticket = inflight.begin(|| {});
        let mut cancelled = false;
        inflight.cancel(|| cancelled = true);
        assert!(cancelled);
        assert!(ticket.token().is_cancelled());
        assert!(!inflight.commit(&ticket, || panic!("stale commit applied")));
    }

    #[test]
    fn test_commit_runs_start_hook_once() {
        let inflight = Inflight::default();
        let mut starts = 0;
        let ticket = inflight.begin(|| starts += 1);
        assert_eq!(starts, 1);
        assert!(inflight.commit(&ticket, || {}));
    }
}
