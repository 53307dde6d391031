use {
    bevy::prelude::*,
    progression_resources::ProgressionError,
    serde::{Deserialize, Serialize},
};

pub struct ProgressionEventsPlugin;

impl Plugin for ProgressionEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ProgressionNotification>();
    }
}

// ============================================================================
// Notifications (outbound queue)
// ============================================================================

/// A state change committed by the experience ledger.
///
/// The ledger writes a whole batch of these after a grant has fully settled:
/// one `ExpChanged`, at most one `LevelUp` listing every crossed level, then
/// one `RegionUnlocked` per region in ascending unlock level. Readers therefore
/// never see an intermediate level.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum ProgressionNotification {
    ExpChanged {
        current_exp: u64,
        exp_required: u64,
    },
    LevelUp {
        /// Levels reached, in order. `[3, 4, 5]` for a jump from 2 to 5.
        levels: Vec<u32>,
    },
    RegionUnlocked(RegionUnlock),
}

impl ProgressionNotification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            ProgressionNotification::ExpChanged { .. } => NotificationKind::ExpChanged,
            ProgressionNotification::LevelUp { .. } => NotificationKind::LevelUp,
            ProgressionNotification::RegionUnlocked(_) => NotificationKind::RegionUnlocked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    ExpChanged,
    LevelUp,
    RegionUnlocked,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 3] = [
        NotificationKind::ExpChanged,
        NotificationKind::LevelUp,
        NotificationKind::RegionUnlocked,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionUnlock {
    pub region_id: String,
    pub unlock_level: u32,
}

// ============================================================================
// Rewards
// ============================================================================

/// Difficulty of the action that granted a reward. Presentation uses it to
/// color-code feedback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardSource {
    Quest,
    /// Placing a building grants EXP. The building must exist and be unlocked.
    BuildingPlaced {
        building_id: String,
    },
    /// Custom or manual grant (debug tools, promotions).
    Manual,
}

/// One occurrence of a reward-granting action, consumed at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardEvent {
    /// Unique per occurrence, e.g. a quest instance id or `daily:2024-01-01:walk`.
    pub source_id: String,
    /// Signed so that bad inputs can be represented and rejected.
    pub exp_amount: i64,
    pub difficulty: Difficulty,
    pub source: RewardSource,
}

impl RewardEvent {
    pub fn quest(source_id: impl Into<String>, exp_amount: i64, difficulty: Difficulty) -> Self {
        Self {
            source_id: source_id.into(),
            exp_amount,
            difficulty,
            source: RewardSource::Quest,
        }
    }

    pub fn building_placed(
        source_id: impl Into<String>,
        building_id: impl Into<String>,
        exp_amount: i64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            exp_amount,
            difficulty: Difficulty::default(),
            source: RewardSource::BuildingPlaced {
                building_id: building_id.into(),
            },
        }
    }

    pub fn manual(source_id: impl Into<String>, exp_amount: i64) -> Self {
        Self {
            source_id: source_id.into(),
            exp_amount,
            difficulty: Difficulty::default(),
            source: RewardSource::Manual,
        }
    }
}

/// Request to run a reward through the reward pipeline.
///
/// This **Observer** event is the command surface for UI call sites (quest
/// completion, building placement). They may fire it more than once for the
/// same occurrence; the pipeline deduplicates by `source_id`.
///
/// # Observers
/// - `rewards::on_submit_reward`: applies the reward and answers with
///   `RewardApplied` or `RewardRejected`.
#[derive(Event, Debug, Clone)]
pub struct SubmitReward(pub RewardEvent);

/// Fired after a reward has been applied to the ledger.
#[derive(Event, Debug, Clone)]
pub struct RewardApplied {
    pub source_id: String,
    pub difficulty: Difficulty,
    pub exp_added: u64,
    pub levels_gained: Vec<u32>,
}

/// Fired when the pipeline refuses a reward. Nothing changed.
#[derive(Event, Debug, Clone)]
pub struct RewardRejected {
    pub source_id: String,
    pub reason: ProgressionError,
}
