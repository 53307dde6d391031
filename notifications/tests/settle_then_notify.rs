use {
    bevy::prelude::*,
    experience::ExperienceLedger,
    growth::{Growth, LinearGrowth},
    notifications::{NotificationDispatcher, NotificationsPlugin},
    progression_events::*,
    regions_assets::{BuildingDefinition, ProgressionConfig, RegionDefinition},
    rewards::RewardsPlugin,
    std::sync::{Arc, Mutex},
    unlocks::UnlockResolver,
};

/// (notification, level seen through the view, unlocked region count)
type Log = Arc<Mutex<Vec<(ProgressionNotification, u32, usize)>>>;

fn test_app(log: Log) -> App {
    let curve = Growth::Linear(LinearGrowth::new(0, 100));
    let region = |id: &str, building: &str| RegionDefinition {
        id: id.into(),
        display_name: id.into(),
        building_ids: vec![building.into()],
    };
    let building = |id: &str, region_id: &str, unlock_level| BuildingDefinition {
        id: id.into(),
        region_id: region_id.into(),
        unlock_level,
        display_name: None,
    };
    let config = ProgressionConfig {
        max_level: 20,
        level_curve: curve.clone(),
        persist_consumed_rewards: false,
        regions: vec![
            region("health_harbor", "clinic"),
            region("wellness_woods", "cabin"),
            region("mindful_meadows", "pavilion"),
            region("focus_fjord", "library"),
        ],
        buildings: vec![
            building("clinic", "health_harbor", 1),
            building("cabin", "wellness_woods", 2),
            building("pavilion", "mindful_meadows", 4),
            building("library", "focus_fjord", 9),
        ],
    };

    let mut app = App::new();
    app.add_plugins((ProgressionEventsPlugin, RewardsPlugin, NotificationsPlugin))
        .insert_resource(ExperienceLedger::new(curve, config.max_level))
        .insert_resource(UnlockResolver::from_config(&config).unwrap());

    app.world_mut()
        .resource_mut::<NotificationDispatcher>()
        .subscribe_fn(&NotificationKind::ALL, move |notification, view| {
            log.lock().unwrap().push((
                notification.clone(),
                view.level(),
                view.unlocked_regions().len(),
            ));
            Ok(())
        });

    app
}

#[test]
fn test_multi_level_grant_is_one_batch() {
    let log = Log::default();
    let mut app = test_app(log.clone());

    // 100 + 200 + 300 crosses three thresholds
    app.world_mut()
        .trigger(SubmitReward(RewardEvent::quest("q1", 620, Difficulty::Hard)));
    app.update();

    let log = log.lock().unwrap();
    let notifications: Vec<_> = log.iter().map(|(n, _, _)| n.clone()).collect();
    assert_eq!(
        notifications,
        vec![
            ProgressionNotification::ExpChanged {
                current_exp: 20,
                exp_required: 400
            },
            ProgressionNotification::LevelUp {
                levels: vec![2, 3, 4]
            },
            ProgressionNotification::RegionUnlocked(RegionUnlock {
                region_id: "wellness_woods".into(),
                unlock_level: 2
            }),
            ProgressionNotification::RegionUnlocked(RegionUnlock {
                region_id: "mindful_meadows".into(),
                unlock_level: 4
            }),
        ]
    );

    // every delivery observes the settled state
    assert!(log.iter().all(|(_, level, unlocked)| *level == 4 && *unlocked == 3));
}

#[test]
fn test_duplicate_and_noop_grants_are_silent() {
    let log = Log::default();
    let mut app = test_app(log.clone());

    app.world_mut()
        .trigger(SubmitReward(RewardEvent::quest("q1", 50, Difficulty::Easy)));
    app.update();
    assert_eq!(log.lock().unwrap().len(), 1);

    app.world_mut()
        .trigger(SubmitReward(RewardEvent::quest("q1", 50, Difficulty::Easy)));
    app.world_mut()
        .trigger(SubmitReward(RewardEvent::manual("nothing", 0)));
    app.update();
    app.update();

    assert_eq!(log.lock().unwrap().len(), 1);
    assert_eq!(app.world().resource::<ExperienceLedger>().current_exp(), 50);
}
