use {
    bevy::prelude::*,
    experience::ExperienceLedger,
    notifications::{NotificationDispatcher, ProgressView, ProgressionSubscriber, SubscriberError},
    progression_events::{NotificationKind, ProgressionNotification},
    unlocks::UnlockResolver,
};

pub fn log_progress_summary(ledger: Res<ExperienceLedger>, resolver: Res<UnlockResolver>) {
    let view = ProgressView::new(&ledger, &resolver);
    info!(
        level = view.level(),
        current_exp = view.current_exp(),
        exp_required = view.exp_required_for_next_level(),
        starting_region = %view.starting_region().id,
        unlocked_regions = view.unlocked_regions().len(),
        "progression ready"
    );

    match view.next_region_to_unlock() {
        Some(next) => info!(region = %next.id, unlock_level = next.unlock_level, "next region"),
        None => info!("every region is unlocked"),
    }
}

/// Writes every notification to the log. Stand-in for the UI layer when the
/// engine runs headless.
pub struct LogSubscriber;

impl ProgressionSubscriber for LogSubscriber {
    fn on_notification(
        &mut self,
        notification: &ProgressionNotification,
        view: &ProgressView<'_>,
    ) -> Result<(), SubscriberError> {
        match notification {
            ProgressionNotification::ExpChanged {
                current_exp,
                exp_required,
            } => debug!("exp {}/{}", current_exp, exp_required),
            ProgressionNotification::LevelUp { levels } => {
                info!(?levels, level = view.level(), "level up")
            }
            ProgressionNotification::RegionUnlocked(unlock) => {
                info!(region = %unlock.region_id, unlock_level = unlock.unlock_level, "region unlocked")
            }
        }
        Ok(())
    }
}

pub fn register_log_subscriber(mut dispatcher: ResMut<NotificationDispatcher>) {
    dispatcher.subscribe(&NotificationKind::ALL, LogSubscriber);
}
