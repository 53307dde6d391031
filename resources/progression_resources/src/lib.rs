use {bevy::prelude::*, std::collections::HashSet, thiserror::Error};

pub struct ProgressionResourcesPlugin;

impl Plugin for ProgressionResourcesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConsumedRewards>()
            .register_type::<ConsumedRewards>();
    }
}

/// Errors produced by progression commands and queries.
///
/// All of them are local and recoverable: a rejected command leaves
/// `PlayerProgress` and the consumed reward set untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("reward amount must not be negative (got {amount})")]
    InvalidRewardAmount { amount: i64 },
    #[error("reward '{source_id}' has already been applied")]
    DuplicateReward { source_id: String },
    #[error("unknown building '{building_id}'")]
    UnknownBuilding { building_id: String },
    #[error("unknown region '{region_id}'")]
    UnknownRegion { region_id: String },
    #[error("building '{building_id}' unlocks at level {unlock_level}, player is level {level}")]
    BuildingLocked {
        building_id: String,
        unlock_level: u32,
        level: u32,
    },
    #[error("stored progress is inconsistent: level {level}, exp {current_exp}: {reason}")]
    InvalidProgress {
        level: u32,
        current_exp: u64,
        reason: &'static str,
    },
}

impl ProgressionError {
    /// Duplicates are expected from redundant UI triggers and are not a
    /// user-visible failure.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ProgressionError::DuplicateReward { .. })
    }
}

/// Reward source ids that have already granted their EXP.
///
/// Persisted in saves when sources can recur after a reload (e.g. daily quests
/// keyed by date), otherwise it lives for one session.
#[derive(Resource, Reflect, Default, Debug, Clone)]
#[reflect(Resource)]
pub struct ConsumedRewards {
    source_ids: HashSet<String>,
}

impl ConsumedRewards {
    pub fn contains(&self, source_id: &str) -> bool {
        self.source_ids.contains(source_id)
    }

    /// Records `source_id`. Returns `false` if it was already present.
    pub fn mark(&mut self, source_id: impl Into<String>) -> bool {
        self.source_ids.insert(source_id.into())
    }

    pub fn len(&self) -> usize {
        self.source_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.source_ids.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.source_ids.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for ConsumedRewards {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            source_ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_at_most_once() {
        let mut consumed = ConsumedRewards::default();
        assert!(consumed.mark("q1"));
        assert!(!consumed.mark("q1"));
        assert!(consumed.contains("q1"));
        assert_eq!(consumed.len(), 1);
    }

    #[test]
    fn test_consumed_rewards_are_reflected() {
        let mut app = App::new();
        app.add_plugins(ProgressionResourcesPlugin);

        let registry = app.world().resource::<AppTypeRegistry>().read();
        let registration = registry
            .get(std::any::TypeId::of::<ConsumedRewards>())
            .unwrap();
        assert!(registration.data::<ReflectResource>().is_some());
    }

    #[test]
    fn test_duplicate_classification() {
        let duplicate = ProgressionError::DuplicateReward {
            source_id: "q1".into(),
        };
        assert!(duplicate.is_duplicate());
        assert!(!ProgressionError::InvalidRewardAmount { amount: -1 }.is_duplicate());
        assert_eq!(
            duplicate.to_string(),
            "reward 'q1' has already been applied"
        );
    }
}
