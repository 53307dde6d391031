//! Save system for persisting progression.
//!
//! This crate provides:
//! - `SaveProgress` observer event for explicit save points
//! - A save after every level-up, whichever path granted the EXP
//! - A save after every applied reward when consumed ids are persisted
//! - Automatic saves every 1 minute while running
//! - A final save when the app exits
//!
//! Saves are read once at startup by the loading crate. There is no mid-session
//! load: restoring an older save would lower the level, and levels never
//! decrease within a session.

mod snapshot;

pub use snapshot::*;

use {
    bevy::prelude::*,
    experience::ExperienceLedger,
    progression_events::{ProgressionNotification, RewardApplied},
    progression_resources::ConsumedRewards,
    states::GameState,
    std::path::PathBuf,
};

/// Event to write the current progress to disk.
#[derive(Event)]
pub struct SaveProgress;

/// Where and what to save.
#[derive(Resource, Debug, Clone)]
pub struct SaveSettings {
    pub path: PathBuf,
    /// Copied from the progression config once it is loaded.
    pub persist_consumed_rewards: bool,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("saves/progress.ron"),
            persist_consumed_rewards: false,
        }
    }
}

/// Timer resource for automatic saves.
#[derive(Resource)]
pub struct AutosaveTimer(Timer);

impl Default for AutosaveTimer {
    fn default() -> Self {
        // 1 minute autosave interval
        Self(Timer::from_seconds(60.0, TimerMode::Repeating))
    }
}

/// Set by save points during the frame, flushed once in `Last`.
#[derive(Resource, Default)]
pub struct PendingSave(bool);

pub struct SaveLoadPlugin;

impl Plugin for SaveLoadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveSettings>()
            .init_resource::<AutosaveTimer>()
            .init_resource::<PendingSave>()
            .add_systems(
                Update,
                tick_autosave.run_if(in_state(GameState::Running)),
            )
            .add_systems(PostUpdate, request_save_on_level_up)
            .add_systems(Last, flush_pending_save)
            .add_observer(request_save_after_reward)
            .add_observer(execute_save);
    }
}

fn tick_autosave(time: Res<Time>, mut timer: ResMut<AutosaveTimer>, mut pending: ResMut<PendingSave>) {
    if timer.0.tick(time.delta()).just_finished() {
        debug!("Autosave triggered");
        pending.0 = true;
    }
}

/// Level-ups are save points. Reads the ledger's own notifications so grants
/// that bypass the reward pipeline are covered too.
fn request_save_on_level_up(
    mut notifications: MessageReader<ProgressionNotification>,
    mut pending: ResMut<PendingSave>,
) {
    let leveled_up = notifications
        .read()
        .any(|n| matches!(n, ProgressionNotification::LevelUp { .. }));
    if leveled_up {
        pending.0 = true;
    }
}

/// A persisted consumed id must reach disk before the session can end,
/// otherwise the same reward could be granted again after a reload.
fn request_save_after_reward(
    _trigger: On<RewardApplied>,
    settings: Res<SaveSettings>,
    mut pending: ResMut<PendingSave>,
) {
    if settings.persist_consumed_rewards {
        pending.0 = true;
    }
}

fn flush_pending_save(
    mut pending: ResMut<PendingSave>,
    mut exits: MessageReader<AppExit>,
    mut commands: Commands,
) {
    let exiting = exits.read().count() > 0;
    if exiting {
        info!("App exiting, saving progress");
    }

    if pending.0 || exiting {
        pending.0 = false;
        commands.trigger(SaveProgress);
    }
}

/// Observer that handles the SaveProgress event.
fn execute_save(
    _trigger: On<SaveProgress>,
    ledger: Option<Res<ExperienceLedger>>,
    consumed: Res<ConsumedRewards>,
    settings: Res<SaveSettings>,
) {
    let Some(ledger) = ledger else {
        warn!("Nothing to save, progression is not loaded yet");
        return;
    };

    let save = ProgressSave::capture(&ledger, &consumed, settings.persist_consumed_rewards);
    match save.write_to(&settings.path) {
        Ok(()) => info!(
            path = %settings.path.display(),
            level = save.level,
            "Progress saved"
        ),
        Err(e) => error!("Failed to save progress: {}", e),
    }
}
