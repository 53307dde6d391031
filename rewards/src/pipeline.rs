use {
    bevy::{ecs::system::SystemParam, prelude::*},
    experience::{ExperienceLedger, LedgerAccess, LevelChangeResult},
    progression_events::{Difficulty, RewardEvent, RewardSource},
    progression_resources::{ConsumedRewards, ProgressionError},
    unlocks::UnlockResolver,
};

/// A reward that made it through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub source_id: String,
    pub change: LevelChangeResult,
    /// Carried through for presentation (popup color keyed to difficulty).
    pub difficulty: Difficulty,
}

/// Checks a reward without changing anything.
pub fn validate_reward(
    event: &RewardEvent,
    ledger: &ExperienceLedger,
    resolver: &UnlockResolver,
    consumed: &ConsumedRewards,
) -> Result<(), ProgressionError> {
    if consumed.contains(&event.source_id) {
        return Err(ProgressionError::DuplicateReward {
            source_id: event.source_id.clone(),
        });
    }

    if event.exp_amount < 0 {
        return Err(ProgressionError::InvalidRewardAmount {
            amount: event.exp_amount,
        });
    }

    if let RewardSource::BuildingPlaced { building_id } = &event.source {
        let unlock_level = resolver.building_unlock_level(building_id)?;
        if unlock_level > ledger.level() {
            return Err(ProgressionError::BuildingLocked {
                building_id: building_id.clone(),
                unlock_level,
                level: ledger.level(),
            });
        }
    }

    Ok(())
}

/// Validates `event`, grants its EXP and records its source id.
///
/// Either all three happen or none does.
pub fn apply_reward(
    event: RewardEvent,
    ledger: &mut ExperienceLedger,
    resolver: &UnlockResolver,
    consumed: &mut ConsumedRewards,
) -> Result<ApplyResult, ProgressionError> {
    validate_reward(&event, ledger, resolver, consumed)?;

    let change = ledger.add_exp(event.exp_amount, resolver)?;
    consumed.mark(event.source_id.clone());

    Ok(ApplyResult {
        source_id: event.source_id,
        change,
        difficulty: event.difficulty,
    })
}

/// System parameter exposing the reward command surface.
///
/// ```ignore
/// fn on_quest_done(mut pipeline: RewardPipeline) {
///     let event = RewardEvent::quest("quest:42", 120, Difficulty::Hard);
///     match pipeline.submit(event) { .. }
/// }
/// ```
#[derive(SystemParam)]
pub struct RewardPipeline<'w> {
    ledger: LedgerAccess<'w>,
    consumed: ResMut<'w, ConsumedRewards>,
}

impl RewardPipeline<'_> {
    pub fn submit(&mut self, event: RewardEvent) -> Result<ApplyResult, ProgressionError> {
        let (ledger, resolver) = self.ledger.parts_mut();
        let applied = apply_reward(event, ledger, resolver, &mut self.consumed)?;
        self.ledger.publish(&applied.change);
        Ok(applied)
    }

    pub fn is_consumed(&self, source_id: &str) -> bool {
        self.consumed.contains(source_id)
    }

    pub fn ledger(&self) -> &ExperienceLedger {
        self.ledger.ledger()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        growth::{Growth, LinearGrowth},
        regions_assets::{BuildingDefinition, ProgressionConfig, RegionDefinition},
    };

    fn fixture() -> (ExperienceLedger, UnlockResolver, ConsumedRewards) {
        let curve = Growth::Linear(LinearGrowth::new(0, 100));
        let config = ProgressionConfig {
            max_level: 10,
            level_curve: curve.clone(),
            persist_consumed_rewards: false,
            regions: vec![RegionDefinition {
                id: "health_harbor".into(),
                display_name: "Health Harbor".into(),
                building_ids: vec!["clinic".into(), "gym".into()],
            }],
            buildings: vec![
                BuildingDefinition {
                    id: "clinic".into(),
                    region_id: "health_harbor".into(),
                    unlock_level: 1,
                    display_name: None,
                },
                BuildingDefinition {
                    id: "gym".into(),
                    region_id: "health_harbor".into(),
                    unlock_level: 3,
                    display_name: None,
                },
            ],
        };

        (
            ExperienceLedger::new(curve, 10),
            UnlockResolver::from_config(&config).unwrap(),
            ConsumedRewards::default(),
        )
    }

    #[test]
    fn test_quest_reward_levels_up() {
        let (mut ledger, resolver, mut consumed) = fixture();
        let event = RewardEvent::quest("q1", 250, Difficulty::Hard);

        let applied = apply_reward(event, &mut ledger, &resolver, &mut consumed).unwrap();
        assert_eq!(applied.difficulty, Difficulty::Hard);
        assert_eq!(applied.change.levels_gained, vec![2]);
        assert_eq!(ledger.level(), 2);
        assert_eq!(ledger.current_exp(), 150);
        assert_eq!(ledger.exp_required_for_next_level(), 200);
        assert!(consumed.contains("q1"));
    }

    #[test]
    fn test_duplicate_daily_quest_counts_once() {
        let (mut ledger, resolver, mut consumed) = fixture();
        let event = RewardEvent::quest("dq-2024-01-01", 20, Difficulty::Easy);

        apply_reward(event.clone(), &mut ledger, &resolver, &mut consumed).unwrap();
        let second = apply_reward(event, &mut ledger, &resolver, &mut consumed);

        assert_eq!(
            second,
            Err(ProgressionError::DuplicateReward {
                source_id: "dq-2024-01-01".into()
            })
        );
        assert_eq!(ledger.current_exp(), 20);
    }

    #[test]
    fn test_negative_reward_is_not_consumed() {
        let (mut ledger, resolver, mut consumed) = fixture();
        let result = apply_reward(
            RewardEvent::manual("grant-1", -10),
            &mut ledger,
            &resolver,
            &mut consumed,
        );

        assert_eq!(
            result,
            Err(ProgressionError::InvalidRewardAmount { amount: -10 })
        );
        assert!(!consumed.contains("grant-1"));
        assert_eq!(ledger.current_exp(), 0);

        // a corrected resubmission with the same id still goes through
        let applied = apply_reward(
            RewardEvent::manual("grant-1", 10),
            &mut ledger,
            &resolver,
            &mut consumed,
        );
        assert!(applied.is_ok());
    }

    #[test]
    fn test_building_placement_checks_catalogue() {
        let (mut ledger, resolver, mut consumed) = fixture();

        let unknown = apply_reward(
            RewardEvent::building_placed("place-1", "castle", 30),
            &mut ledger,
            &resolver,
            &mut consumed,
        );
        assert_eq!(
            unknown,
            Err(ProgressionError::UnknownBuilding {
                building_id: "castle".into()
            })
        );

        let locked = apply_reward(
            RewardEvent::building_placed("place-2", "gym", 30),
            &mut ledger,
            &resolver,
            &mut consumed,
        );
        assert_eq!(
            locked,
            Err(ProgressionError::BuildingLocked {
                building_id: "gym".into(),
                unlock_level: 3,
                level: 1
            })
        );

        let placed = apply_reward(
            RewardEvent::building_placed("place-3", "clinic", 30),
            &mut ledger,
            &resolver,
            &mut consumed,
        )
        .unwrap();
        assert_eq!(placed.change.exp_added, 30);
        assert_eq!(consumed.len(), 1);
    }
}
