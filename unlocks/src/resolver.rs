use {
    bevy::prelude::*,
    progression_events::RegionUnlock,
    progression_resources::ProgressionError,
    regions_assets::{ConfigError, ProgressionConfig},
    std::collections::HashMap,
};

/// A region with its derived unlock level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    pub display_name: String,
    /// Sorted by unlock level (enforced when the configuration is validated).
    pub building_ids: Vec<String>,
    /// Unlock level of the first building.
    pub unlock_level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    pub id: String,
    pub region_id: String,
    pub unlock_level: u32,
    pub display_name: Option<String>,
}

/// Read-only index over the region/building catalogue.
///
/// Built once at startup from a validated `ProgressionConfig` and inserted as
/// a resource. Regions are stored sorted by unlock level (declaration order
/// breaks ties), so the regions unlocked at any level form a prefix.
#[derive(Resource, Debug, Clone)]
pub struct UnlockResolver {
    regions: Vec<Region>,
    region_index: HashMap<String, usize>,
    buildings: HashMap<String, Building>,
}

impl UnlockResolver {
    pub fn from_config(config: &ProgressionConfig) -> Result<Self, Vec<ConfigError>> {
        config.validate()?;

        let buildings: HashMap<String, Building> = config
            .buildings
            .iter()
            .map(|def| {
                let building = Building {
                    id: def.id.clone(),
                    region_id: def.region_id.clone(),
                    unlock_level: def.unlock_level,
                    display_name: def.display_name.clone(),
                };
                (def.id.clone(), building)
            })
            .collect();

        let mut regions: Vec<Region> = config
            .regions
            .iter()
            .map(|def| {
                // validation guarantees a non-empty, sorted, resolvable list
                let unlock_level = def
                    .building_ids
                    .first()
                    .and_then(|id| buildings.get(id))
                    .map(|b| b.unlock_level)
                    .unwrap_or(1);

                Region {
                    id: def.id.clone(),
                    display_name: def.display_name.clone(),
                    building_ids: def.building_ids.clone(),
                    unlock_level,
                }
            })
            .collect();
        regions.sort_by_key(|r| r.unlock_level);

        let region_index = regions
            .iter()
            .enumerate()
            .map(|(index, region)| (region.id.clone(), index))
            .collect();

        debug!(
            regions = regions.len(),
            buildings = buildings.len(),
            "unlock resolver built"
        );

        Ok(Self {
            regions,
            region_index,
            buildings,
        })
    }

    /// All regions, ascending by unlock level.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, region_id: &str) -> Result<&Region, ProgressionError> {
        self.region_index
            .get(region_id)
            .map(|&index| &self.regions[index])
            .ok_or_else(|| ProgressionError::UnknownRegion {
                region_id: region_id.to_string(),
            })
    }

    pub fn building(&self, building_id: &str) -> Result<&Building, ProgressionError> {
        self.buildings
            .get(building_id)
            .ok_or_else(|| ProgressionError::UnknownBuilding {
                building_id: building_id.to_string(),
            })
    }

    /// Regions whose unlock level is at most `level`, ascending by unlock level.
    pub fn unlocked_regions(&self, level: u32) -> &[Region] {
        &self.regions[..self.unlocked_count(level)]
    }

    /// The lowest-level region still locked at `level`, if any.
    pub fn next_region_to_unlock(&self, level: u32) -> Option<&Region> {
        self.regions.get(self.unlocked_count(level))
    }

    /// The region with the lowest unlock level.
    pub fn starting_region(&self) -> &Region {
        // `from_config` rejects configurations without regions
        &self.regions[0]
    }

    pub fn building_unlock_level(&self, building_id: &str) -> Result<u32, ProgressionError> {
        self.building(building_id).map(|b| b.unlock_level)
    }

    pub fn region_unlock_level(&self, region_id: &str) -> Result<u32, ProgressionError> {
        self.region(region_id).map(|r| r.unlock_level)
    }

    pub fn is_region_unlocked(&self, region_id: &str, level: u32) -> Result<bool, ProgressionError> {
        self.region_unlock_level(region_id)
            .map(|unlock_level| unlock_level <= level)
    }

    pub fn is_building_unlocked(
        &self,
        building_id: &str,
        level: u32,
    ) -> Result<bool, ProgressionError> {
        self.building_unlock_level(building_id)
            .map(|unlock_level| unlock_level <= level)
    }

    /// Buildings available at `level`, grouped by region in unlock order.
    pub fn unlocked_buildings(&self, level: u32) -> Vec<&Building> {
        self.unlocked_regions(level)
            .iter()
            .flat_map(|region| region.building_ids.iter())
            .filter_map(|id| self.buildings.get(id))
            .filter(|building| building.unlock_level <= level)
            .collect()
    }

    /// Regions that become available when going from level `from` to `to`,
    /// i.e. with an unlock level in `(from, to]`, ascending.
    pub fn regions_unlocked_between(&self, from: u32, to: u32) -> Vec<RegionUnlock> {
        if to <= from {
            return Vec::new();
        }

        self.regions[self.unlocked_count(from)..self.unlocked_count(to)]
            .iter()
            .map(|region| RegionUnlock {
                region_id: region.id.clone(),
                unlock_level: region.unlock_level,
            })
            .collect()
    }

    /// Levels still missing before the next region unlocks.
    pub fn levels_until_next_region(&self, level: u32) -> Option<u32> {
        self.next_region_to_unlock(level)
            .map(|region| region.unlock_level - level)
    }

    fn unlocked_count(&self, level: u32) -> usize {
        self.regions.partition_point(|r| r.unlock_level <= level)
    }
}
