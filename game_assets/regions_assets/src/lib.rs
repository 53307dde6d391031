mod validation;

pub use validation::{ConfigError, MAX_LEVEL_LIMIT};

use {
    bevy::prelude::*,
    bevy_common_assets::ron::RonAssetPlugin,
    growth::Growth,
    serde::{Deserialize, Serialize},
};

pub struct RegionsAssetsPlugin;

impl Plugin for RegionsAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<ProgressionConfig>::new(&["progression.ron"]));
    }
}

/// Static progression configuration: the level curve and the region/building
/// catalogue. Immutable at runtime.
#[derive(Asset, TypePath, Debug, Clone, Deserialize, Serialize)]
pub struct ProgressionConfig {
    /// Highest reachable level. EXP granted at this level is ignored.
    pub max_level: u32,
    pub level_curve: Growth,
    /// Keep consumed reward ids in the save file. Needed when reward sources
    /// can recur after a reload (daily quests keyed by date).
    #[serde(default)]
    pub persist_consumed_rewards: bool,
    pub regions: Vec<RegionDefinition>,
    pub buildings: Vec<BuildingDefinition>,
}

/// A themed cluster of buildings.
///
/// `building_ids` must be sorted by unlock level: the region unlocks together
/// with its first building.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegionDefinition {
    pub id: String,
    pub display_name: String,
    pub building_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuildingDefinition {
    pub id: String,
    pub region_id: String,
    pub unlock_level: u32,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl ProgressionConfig {
    pub fn building(&self, id: &str) -> Option<&BuildingDefinition> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn region(&self, id: &str) -> Option<&RegionDefinition> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Checks every invariant the unlock resolver relies on.
    /// Returns all problems found, not just the first one.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let errors = validation::validate_config(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
