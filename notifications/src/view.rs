use {
    experience::ExperienceLedger,
    progression_resources::ProgressionError,
    unlocks::{Region, UnlockResolver},
};

/// Read-only query surface handed to subscribers and UI code.
///
/// Always built from committed state; unlock information is recomputed from
/// the current level on every call.
#[derive(Clone, Copy)]
pub struct ProgressView<'a> {
    ledger: &'a ExperienceLedger,
    resolver: &'a UnlockResolver,
}

impl<'a> ProgressView<'a> {
    pub fn new(ledger: &'a ExperienceLedger, resolver: &'a UnlockResolver) -> Self {
        Self { ledger, resolver }
    }

    pub fn level(&self) -> u32 {
        self.ledger.level()
    }

    pub fn current_exp(&self) -> u64 {
        self.ledger.current_exp()
    }

    pub fn exp_required_for_next_level(&self) -> u64 {
        self.ledger.exp_required_for_next_level()
    }

    pub fn progress_fraction(&self) -> f32 {
        self.ledger.progress_fraction()
    }

    pub fn is_max_level(&self) -> bool {
        self.ledger.is_max_level()
    }

    pub fn unlocked_regions(&self) -> &'a [Region] {
        self.resolver.unlocked_regions(self.level())
    }

    pub fn next_region_to_unlock(&self) -> Option<&'a Region> {
        self.resolver.next_region_to_unlock(self.level())
    }

    pub fn starting_region(&self) -> &'a Region {
        self.resolver.starting_region()
    }

    pub fn building_unlock_level(&self, building_id: &str) -> Result<u32, ProgressionError> {
        self.resolver.building_unlock_level(building_id)
    }

    pub fn region_unlock_level(&self, region_id: &str) -> Result<u32, ProgressionError> {
        self.resolver.region_unlock_level(region_id)
    }

    pub fn is_building_unlocked(&self, building_id: &str) -> Result<bool, ProgressionError> {
        self.resolver.is_building_unlocked(building_id, self.level())
    }

    pub fn is_region_unlocked(&self, region_id: &str) -> Result<bool, ProgressionError> {
        self.resolver.is_region_unlocked(region_id, self.level())
    }
}
