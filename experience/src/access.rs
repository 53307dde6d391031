use {
    crate::{ExperienceLedger, LevelChangeResult},
    bevy::{ecs::system::SystemParam, prelude::*},
    progression_events::ProgressionNotification,
    progression_resources::ProgressionError,
    unlocks::UnlockResolver,
};

/// Write access to the ledger for systems and observers.
///
/// Changes go through `add_exp`, which commits the new progress and then
/// appends the whole notification batch to the outbound message queue.
/// Subscribers are served later by the dispatch system, never mid-change.
#[derive(SystemParam)]
pub struct LedgerAccess<'w> {
    ledger: ResMut<'w, ExperienceLedger>,
    resolver: Res<'w, UnlockResolver>,
    outbox: MessageWriter<'w, ProgressionNotification>,
}

impl LedgerAccess<'_> {
    pub fn ledger(&self) -> &ExperienceLedger {
        &self.ledger
    }

    pub fn resolver(&self) -> &UnlockResolver {
        &self.resolver
    }

    pub fn add_exp(&mut self, amount: i64) -> Result<LevelChangeResult, ProgressionError> {
        let change = self.ledger.add_exp(amount, &self.resolver)?;
        self.publish(&change);
        Ok(change)
    }

    /// Splits the borrow for callers that run their own validation against the
    /// resolver before touching the ledger. Pair with `publish`.
    pub fn parts_mut(&mut self) -> (&mut ExperienceLedger, &UnlockResolver) {
        (&mut *self.ledger, &*self.resolver)
    }

    pub fn publish(&mut self, change: &LevelChangeResult) {
        let batch = change.notifications();
        if batch.is_empty() {
            return;
        }
        debug!(count = batch.len(), "queueing progression notifications");
        for notification in batch {
            self.outbox.write(notification);
        }
    }
}
