use {
    bevy::prelude::*,
    experience::ExperienceLedger,
    progression_resources::ConsumedRewards,
    regions_assets::{ConfigError, ProgressionConfig},
    save_load::ProgressSave,
    unlocks::UnlockResolver,
};

/// The resources a running session needs, built from the config and an
/// optional save.
pub struct Engine {
    pub ledger: ExperienceLedger,
    pub resolver: UnlockResolver,
    pub consumed: ConsumedRewards,
    /// A save was given but did not fit the config. The caller should move it
    /// aside before the fresh progress is written over it.
    pub save_rejected: bool,
}

/// Fails only on an invalid config. A save that does not fit the config is
/// logged, flagged in `save_rejected` and replaced by a fresh start.
pub fn build_engine(
    config: &ProgressionConfig,
    save: Option<ProgressSave>,
) -> Result<Engine, Vec<ConfigError>> {
    let resolver = UnlockResolver::from_config(config)?;
    let mut ledger = ExperienceLedger::new(config.level_curve.clone(), config.max_level);
    let mut consumed = ConsumedRewards::default();
    let mut save_rejected = false;

    if let Some(save) = save {
        match save.restore(&mut ledger, &mut consumed) {
            Ok(()) => info!(
                level = ledger.level(),
                current_exp = ledger.current_exp(),
                consumed = consumed.len(),
                "restored progress from save"
            ),
            Err(e) => {
                warn!("ignoring save that does not match the config: {}", e);
                save_rejected = true;
            }
        }
    } else {
        debug!("no save found, starting at level 1");
    }

    if !config.persist_consumed_rewards {
        consumed.clear();
    }

    Ok(Engine {
        ledger,
        resolver,
        consumed,
        save_rejected,
    })
}
