use {
    bevy::prelude::*,
    experience::ExperiencePlugin,
    loading::LoadingPlugin,
    notifications::NotificationsPlugin,
    progression_events::ProgressionEventsPlugin,
    progression_resources::ProgressionResourcesPlugin,
    regions_assets::RegionsAssetsPlugin,
    rewards::RewardsPlugin,
    save_load::SaveLoadPlugin,
    states::GameState,
};

mod systems;

pub use systems::LogSubscriber;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((
                ProgressionEventsPlugin,
                ProgressionResourcesPlugin,
                ExperiencePlugin,
                RegionsAssetsPlugin,
                RewardsPlugin,
                NotificationsPlugin,
                SaveLoadPlugin,
                LoadingPlugin,
            ))
            .add_systems(
                OnEnter(GameState::Running),
                (systems::log_progress_summary, systems::register_log_subscriber),
            );
    }
}
