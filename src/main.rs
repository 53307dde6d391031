use {
    bevy::{
        app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*, state::app::StatesPlugin,
    },
    core::CorePlugin,
    std::time::Duration,
};

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 30.0,
            ))),
        )
        .add_plugins((
            AssetPlugin::default(),
            StatesPlugin,
            LogPlugin {
                filter: "error,loading=trace,\
                    experience=debug,\
                    rewards=debug,\
                    unlocks=info,\
                    notifications=debug,\
                    core=info,\
                    save_load=trace"
                    .into(),
                level: bevy::log::Level::TRACE,
                ..Default::default()
            },
        ))
        .add_plugins(CorePlugin)
        .run();
}
