use {
    bevy::prelude::*,
    growth::{Growth, GrowthStrategy},
    progression_events::{ProgressionNotification, RegionUnlock},
    progression_resources::ProgressionError,
    serde::{Deserialize, Serialize},
    unlocks::UnlockResolver,
};

/// What happens to EXP left over after crossing a level threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum RemainderPolicy {
    /// Excess EXP counts toward the next level. A single grant may cross
    /// several levels.
    #[default]
    CarryForward,
    /// Excess EXP is discarded after each level-up.
    ResetToZero,
}

/// Remainder policy used by the game. Changing it invalidates balance
/// assumptions baked into quest rewards.
pub const EXP_REMAINDER_POLICY: RemainderPolicy = RemainderPolicy::CarryForward;

/// Level and EXP inside the current level.
///
/// Only the `ExperienceLedger` can change it. The EXP required for the next
/// level is not stored; the ledger derives it from the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct PlayerProgress {
    level: u32,
    current_exp: u64,
}

impl PlayerProgress {
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_exp(&self) -> u64 {
        self.current_exp
    }
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            level: 1,
            current_exp: 0,
        }
    }
}

/// Outcome of a single `add_exp` call, computed in full before anything is
/// published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChangeResult {
    pub starting_level: u32,
    pub ending_level: u32,
    /// Every level reached, in order.
    pub levels_gained: Vec<u32>,
    pub starting_exp: u64,
    pub exp_added: u64,
    pub current_exp: u64,
    pub exp_required_for_next_level: u64,
    /// Sum of the thresholds crossed.
    pub exp_consumed: u64,
    /// EXP dropped by the level cap or by `RemainderPolicy::ResetToZero`.
    pub exp_discarded: u64,
    /// Regions with an unlock level in `(starting_level, ending_level]`.
    pub unlocked_regions: Vec<RegionUnlock>,
}

impl LevelChangeResult {
    pub fn leveled_up(&self) -> bool {
        !self.levels_gained.is_empty()
    }

    /// True when the call left level and EXP untouched.
    pub fn is_unchanged(&self) -> bool {
        self.ending_level == self.starting_level && self.current_exp == self.starting_exp
    }

    /// The notification batch for this change, in publication order.
    pub fn notifications(&self) -> Vec<ProgressionNotification> {
        if self.is_unchanged() {
            return Vec::new();
        }

        let mut batch = Vec::with_capacity(2 + self.unlocked_regions.len());
        batch.push(ProgressionNotification::ExpChanged {
            current_exp: self.current_exp,
            exp_required: self.exp_required_for_next_level,
        });
        if self.leveled_up() {
            batch.push(ProgressionNotification::LevelUp {
                levels: self.levels_gained.clone(),
            });
        }
        batch.extend(
            self.unlocked_regions
                .iter()
                .cloned()
                .map(ProgressionNotification::RegionUnlocked),
        );
        batch
    }
}

/// Sole owner of `PlayerProgress`.
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct ExperienceLedger {
    progress: PlayerProgress,
    #[reflect(ignore)]
    curve: Growth,
    max_level: u32,
    remainder_policy: RemainderPolicy,
}

impl ExperienceLedger {
    pub fn new(curve: Growth, max_level: u32) -> Self {
        Self {
            progress: PlayerProgress::default(),
            curve,
            max_level: max_level.max(1),
            remainder_policy: EXP_REMAINDER_POLICY,
        }
    }

    pub fn with_remainder_policy(mut self, remainder_policy: RemainderPolicy) -> Self {
        self.remainder_policy = remainder_policy;
        self
    }

    pub fn progress(&self) -> PlayerProgress {
        self.progress
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn current_exp(&self) -> u64 {
        self.progress.current_exp
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn is_max_level(&self) -> bool {
        self.progress.level >= self.max_level
    }

    pub fn curve(&self) -> &Growth {
        &self.curve
    }

    /// EXP needed to advance past `level`. Never zero.
    pub fn exp_required_for(&self, level: u32) -> u64 {
        self.curve.exp_required(level).max(1)
    }

    pub fn exp_required_for_next_level(&self) -> u64 {
        self.exp_required_for(self.progress.level)
    }

    /// Fill ratio of the current level's progress bar, `1.0` at max level.
    pub fn progress_fraction(&self) -> f32 {
        if self.is_max_level() {
            return 1.0;
        }
        (self.progress.current_exp as f64 / self.exp_required_for_next_level() as f64) as f32
    }

    /// EXP earned over the whole game, derived from level and current EXP.
    pub fn total_exp_earned(&self) -> u64 {
        (1..self.progress.level)
            .map(|level| self.exp_required_for(level))
            .fold(self.progress.current_exp, u64::saturating_add)
    }

    /// Replaces progress with values read from a save.
    pub fn restore(&mut self, level: u32, current_exp: u64) -> Result<(), ProgressionError> {
        let invalid = |reason| ProgressionError::InvalidProgress {
            level,
            current_exp,
            reason,
        };

        if level == 0 {
            return Err(invalid("level must be at least 1"));
        }
        if level > self.max_level {
            return Err(invalid("level is above the configured maximum"));
        }
        if level == self.max_level && current_exp > 0 {
            return Err(invalid("exp must be 0 at max level"));
        }
        if level < self.max_level && current_exp >= self.exp_required_for(level) {
            return Err(invalid("exp exceeds the level threshold"));
        }

        self.progress = PlayerProgress { level, current_exp };
        Ok(())
    }

    /// Adds EXP and settles every level-up it causes.
    ///
    /// The whole result is computed first and committed in one assignment, so
    /// a rejected call leaves progress untouched.
    pub fn add_exp(
        &mut self,
        amount: i64,
        resolver: &UnlockResolver,
    ) -> Result<LevelChangeResult, ProgressionError> {
        if amount < 0 {
            return Err(ProgressionError::InvalidRewardAmount { amount });
        }
        let amount = amount.unsigned_abs();

        let starting_level = self.progress.level;
        let starting_exp = self.progress.current_exp;

        // EXP past u64::MAX cannot be held and counts as discarded
        let (mut exp, mut exp_discarded) = match starting_exp.checked_add(amount) {
            Some(total) => (total, 0),
            None => (u64::MAX, amount - (u64::MAX - starting_exp)),
        };
        let mut level = starting_level;
        let mut levels_gained = Vec::new();
        let mut exp_consumed = 0u64;

        while level < self.max_level {
            let required = self.exp_required_for(level);
            if exp < required {
                break;
            }

            exp -= required;
            exp_consumed += required;
            level += 1;
            levels_gained.push(level);
            trace!(level, remainder = exp, "crossed level threshold");

            if self.remainder_policy == RemainderPolicy::ResetToZero {
                exp_discarded += exp;
                exp = 0;
            }
        }

        // capped progression
        if level >= self.max_level && exp > 0 {
            exp_discarded += exp;
            exp = 0;
        }

        self.progress = PlayerProgress {
            level,
            current_exp: exp,
        };

        let unlocked_regions = resolver.regions_unlocked_between(starting_level, level);

        if level > starting_level {
            info!(
                from = starting_level,
                to = level,
                regions = unlocked_regions.len(),
                "Level up!"
            );
        }
        if exp_discarded > 0 {
            debug!(exp_discarded, level, "discarded exp");
        }

        Ok(LevelChangeResult {
            starting_level,
            ending_level: level,
            levels_gained,
            starting_exp,
            exp_added: amount,
            current_exp: exp,
            exp_required_for_next_level: self.exp_required_for(level),
            exp_consumed,
            exp_discarded,
            unlocked_regions,
        })
    }
}
