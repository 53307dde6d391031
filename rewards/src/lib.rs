//! Reward pipeline: validates reward events and applies each one at most once.
//!
//! UI call sites (quest completion, building placement) do not guarantee
//! exactly-once invocation, so every reward carries a `source_id` and the
//! pipeline refuses ids it has already consumed.

mod pipeline;

pub use pipeline::*;

use {
    bevy::prelude::*,
    progression_events::{RewardApplied, RewardRejected, SubmitReward},
    progression_resources::ConsumedRewards,
};

pub struct RewardsPlugin;

impl Plugin for RewardsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConsumedRewards>()
            .add_observer(on_submit_reward);
    }
}

/// Observer that runs `SubmitReward` commands through the pipeline and reports
/// the outcome as `RewardApplied` / `RewardRejected`.
pub fn on_submit_reward(
    trigger: On<SubmitReward>,
    mut pipeline: RewardPipeline,
    mut commands: Commands,
) {
    let event = trigger.event().0.clone();
    let source_id = event.source_id.clone();

    match pipeline.submit(event) {
        Ok(applied) => {
            info!(
                %source_id,
                exp = applied.change.exp_added,
                level = applied.change.ending_level,
                difficulty = ?applied.difficulty,
                "reward applied"
            );
            commands.trigger(RewardApplied {
                source_id,
                difficulty: applied.difficulty,
                exp_added: applied.change.exp_added,
                levels_gained: applied.change.levels_gained,
            });
        }
        Err(reason) => {
            if reason.is_duplicate() {
                debug!(%source_id, "ignoring duplicate reward");
            } else {
                warn!(%source_id, %reason, "reward rejected");
            }
            commands.trigger(RewardRejected { source_id, reason });
        }
    }
}
