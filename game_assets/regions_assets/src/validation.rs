//! Load-time validation of the region/building catalogue.

use {
    super::ProgressionConfig,
    std::collections::{HashMap, HashSet},
    thiserror::Error,
};

/// Upper bound for `max_level`. The curve is checked level by level, so the
/// bound also caps load time.
pub const MAX_LEVEL_LIMIT: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("max_level must be at least 1")]
    MaxLevelZero,
    #[error("max_level {max_level} is above the limit of {limit}")]
    MaxLevelTooHigh { max_level: u32, limit: u32 },
    #[error("level curve requires 0 EXP at level {level}")]
    ZeroExpRequirement { level: u32 },
    #[error("no regions configured")]
    NoRegions,
    #[error("region '{region_id}' is declared more than once")]
    DuplicateRegion { region_id: String },
    #[error("building '{building_id}' is declared more than once")]
    DuplicateBuilding { building_id: String },
    #[error("region '{region_id}' has no buildings")]
    EmptyRegion { region_id: String },
    #[error("region '{region_id}' lists missing building '{building_id}'")]
    MissingBuilding {
        region_id: String,
        building_id: String,
    },
    #[error("region '{region_id}' lists building '{building_id}' owned by '{owner}'")]
    OwnerMismatch {
        region_id: String,
        building_id: String,
        owner: String,
    },
    #[error("building '{building_id}' references missing region '{region_id}'")]
    UnknownOwner {
        building_id: String,
        region_id: String,
    },
    #[error("building '{building_id}' is not listed by its region")]
    UnlistedBuilding { building_id: String },
    #[error("building '{building_id}' is listed more than once")]
    ListedTwice { building_id: String },
    #[error("building '{building_id}' has unlock level 0")]
    ZeroUnlockLevel { building_id: String },
    #[error("building '{building_id}' unlocks at {unlock_level}, above max level {max_level}")]
    UnreachableUnlockLevel {
        building_id: String,
        unlock_level: u32,
        max_level: u32,
    },
    #[error("region '{region_id}' lists '{building_id}' before a building with a lower unlock level")]
    UnsortedBuildings {
        region_id: String,
        building_id: String,
    },
}

pub fn validate_config(config: &ProgressionConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.max_level == 0 {
        errors.push(ConfigError::MaxLevelZero);
    } else if config.max_level > MAX_LEVEL_LIMIT {
        errors.push(ConfigError::MaxLevelTooHigh {
            max_level: config.max_level,
            limit: MAX_LEVEL_LIMIT,
        });
    } else if let Some(level) = config.level_curve.first_zero_requirement(config.max_level) {
        errors.push(ConfigError::ZeroExpRequirement { level });
    }

    if config.regions.is_empty() {
        errors.push(ConfigError::NoRegions);
    }

    let mut region_ids = HashSet::new();
    for region in &config.regions {
        if !region_ids.insert(region.id.as_str()) {
            errors.push(ConfigError::DuplicateRegion {
                region_id: region.id.clone(),
            });
        }
    }

    let mut buildings = HashMap::new();
    for building in &config.buildings {
        if buildings.insert(building.id.as_str(), building).is_some() {
            errors.push(ConfigError::DuplicateBuilding {
                building_id: building.id.clone(),
            });
        }
        if building.unlock_level == 0 {
            errors.push(ConfigError::ZeroUnlockLevel {
                building_id: building.id.clone(),
            });
        }
        if config.max_level > 0 && building.unlock_level > config.max_level {
            errors.push(ConfigError::UnreachableUnlockLevel {
                building_id: building.id.clone(),
                unlock_level: building.unlock_level,
                max_level: config.max_level,
            });
        }
        if !region_ids.contains(building.region_id.as_str()) {
            errors.push(ConfigError::UnknownOwner {
                building_id: building.id.clone(),
                region_id: building.region_id.clone(),
            });
        }
    }

    let mut listed = HashSet::new();
    for region in &config.regions {
        if region.building_ids.is_empty() {
            errors.push(ConfigError::EmptyRegion {
                region_id: region.id.clone(),
            });
        }

        let mut previous_level = 0;
        for building_id in &region.building_ids {
            if !listed.insert(building_id.as_str()) {
                errors.push(ConfigError::ListedTwice {
                    building_id: building_id.clone(),
                });
            }

            let Some(building) = buildings.get(building_id.as_str()) else {
                errors.push(ConfigError::MissingBuilding {
                    region_id: region.id.clone(),
                    building_id: building_id.clone(),
                });
                continue;
            };

            if building.region_id != region.id {
                errors.push(ConfigError::OwnerMismatch {
                    region_id: region.id.clone(),
                    building_id: building_id.clone(),
                    owner: building.region_id.clone(),
                });
            }

            if building.unlock_level < previous_level {
                errors.push(ConfigError::UnsortedBuildings {
                    region_id: region.id.clone(),
                    building_id: building_id.clone(),
                });
            }
            previous_level = previous_level.max(building.unlock_level);
        }
    }

    for building in &config.buildings {
        // owner problems are already reported above
        if region_ids.contains(building.region_id.as_str())
            && !listed.contains(building.id.as_str())
        {
            errors.push(ConfigError::UnlistedBuilding {
                building_id: building.id.clone(),
            });
        }
    }

    errors
}
