//! Startup sequence: load the progression config, validate it, restore the
//! save and hand over to `GameState::Running`.

mod engine;

pub use engine::*;

use {
    bevy::{asset::LoadState, prelude::*},
    regions_assets::ProgressionConfig,
    save_load::{ProgressSave, SaveSettings},
    states::GameState,
    std::path::Path,
};

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadingManager>()
            .init_resource::<ConfigPath>()
            .add_systems(Startup, start_loading)
            .add_systems(
                Update,
                check_config_loaded.run_if(in_state(GameState::Loading)),
            )
            .add_systems(OnEnter(GameState::ConfigError), report_config_error);
    }
}

/// Asset path of the progression config, relative to the assets folder.
#[derive(Resource, Debug, Clone)]
pub struct ConfigPath(pub String);

impl Default for ConfigPath {
    fn default() -> Self {
        Self("config/default.progression.ron".into())
    }
}

#[derive(Resource, Default)]
pub struct LoadingManager {
    pub config: Handle<ProgressionConfig>,
}

fn start_loading(
    mut manager: ResMut<LoadingManager>,
    path: Res<ConfigPath>,
    asset_server: Res<AssetServer>,
) {
    info!(path = %path.0, "started loading progression config");
    manager.config = asset_server.load(path.0.clone());
}

fn check_config_loaded(
    mut commands: Commands,
    manager: Res<LoadingManager>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<ProgressionConfig>>,
    mut settings: ResMut<SaveSettings>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(config) = configs.get(&manager.config) else {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&manager.config) {
            error!("failed to load progression config: {}", err);
            next_state.set(GameState::ConfigError);
        }
        return;
    };

    let mut unreadable = false;
    let save = match ProgressSave::read_from(&settings.path) {
        Ok(save) => save,
        Err(e) => {
            warn!("could not read save, starting fresh: {}", e);
            unreadable = true;
            None
        }
    };

    match build_engine(config, save) {
        Ok(engine) => {
            if unreadable || engine.save_rejected {
                set_aside_rejected_save(&settings.path);
            }
            settings.persist_consumed_rewards = config.persist_consumed_rewards;
            commands.insert_resource(engine.ledger);
            commands.insert_resource(engine.resolver);
            commands.insert_resource(engine.consumed);

            info!("Loading complete, transitioning to Running");
            next_state.set(GameState::Running);
        }
        Err(errors) => {
            for e in &errors {
                error!("invalid progression config: {}", e);
            }
            next_state.set(GameState::ConfigError);
        }
    }
}

/// Keeps the player's old progress out of the way of the next save.
fn set_aside_rejected_save(path: &Path) {
    match save_load::set_aside(path) {
        Ok(backup) => warn!(backup = %backup.display(), "rejected save kept as backup"),
        Err(e) => error!("failed to back up rejected save, it will be overwritten: {}", e),
    }
}

fn report_config_error() {
    error!("progression is unavailable until the config is fixed");
}
