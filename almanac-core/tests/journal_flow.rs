//! End-to-end journal flow: build tasks through the parameter protocol,
//! persist and reload them, migrate a legacy batch, dispatch events, and
//! walk the calendar through a renewal cycle.

use almanac_core::{
    CompletionCue, GameDataTables, ItemEntry, KindId, ParameterValue, RenewPeriod, Season,
    SilentCue, Task, TaskDataMigrator, TaskEvent, TaskManager, ToolInfo, WorldDate, builder_for,
    names,
};
use serde_json::json;

fn game_data() -> GameDataTables {
    let mut tables = GameDataTables::new();
    tables.items.insert(
        "(O)388".into(),
        ItemEntry {
            display_name: "Wood".into(),
            category: Some("-16".into()),
            price: 2,
            craftable: false,
            object: true,
            tool: None,
        },
    );
    tables.items.insert(
        "(O)709".into(),
        ItemEntry {
            display_name: "Hardwood".into(),
            category: Some("-16".into()),
            price: 15,
            craftable: false,
            object: true,
            tool: None,
        },
    );
    tables.items.insert(
        "(T)SteelPickaxe".into(),
        ItemEntry {
            display_name: "Pickaxe".into(),
            category: None,
            price: 5000,
            craftable: false,
            object: false,
            tool: Some(ToolInfo {
                class_name: "Pickaxe".into(),
                upgrade_level: 2,
            }),
        },
    );
    tables
}

struct RecordingCue(Vec<String>);

impl CompletionCue for RecordingCue {
    fn task_completed(&mut self, task: &Task) {
        self.0.push(task.name.clone());
    }
}

#[test]
fn test_build_persist_reload_dispatch_and_renew() {
    let data = game_data();
    let today = WorldDate::new(1, Season::Spring, 8);

    // Construct through the generic editing surface.
    let mut builder = builder_for(KindId::Collect);
    assert!(!builder.is_ready(&data));
    builder
        .set_value(names::ITEM, ParameterValue::List(vec!["(O)388".into()]))
        .unwrap();
    builder
        .set_value(names::COUNT, ParameterValue::Int(20))
        .unwrap();
    assert!(builder.is_ready(&data));

    let mut task = builder.create("Gather wood", 1, &data).unwrap();
    task.renew_period = RenewPeriod::Weekly;
    task.renew_date = today;

    // Persist and reload the journal as JSON records.
    let saved = serde_json::to_string(&vec![task]).unwrap();
    let reloaded: Vec<Task> = serde_json::from_str(&saved).unwrap();

    let mut manager = TaskManager::new();
    for task in reloaded {
        manager.add_task(task);
    }

    // Progress through events; the cue fires once at the goal.
    let mut cue = RecordingCue(Vec::new());
    for _ in 0..2 {
        manager.dispatch(
            &TaskEvent::ItemCollected {
                player_id: 1,
                item_id: "(O)388".into(),
                category: Some("-16".into()),
                count: 10,
                quality: 0,
            },
            &mut cue,
        );
    }
    assert_eq!(cue.0, vec!["Gather wood".to_string()]);

    // The next morning it goes dormant, then comes back a week later.
    manager.start_day(today.add_days(1));
    assert!(!manager.sorted_tasks(today.add_days(1))[0].active());

    manager.start_day(today.add_days(7));
    let renewed = manager.sorted_tasks(today.add_days(7))[0];
    assert!(renewed.active());
    assert!(!renewed.complete());
    assert_eq!(renewed.count(), 0);
}

#[test]
fn test_legacy_batch_migration_outcomes() {
    let data = game_data();
    let migrator = TaskDataMigrator::new(&data);

    let batch = vec![
        (KindId::Smith, json!({
            "Name": "Upgrade the pickaxe",
            "TargetDisplayName": "Pickaxe",
            "TargetName": "",
            "TargetIndex": 0,
        })),
        (KindId::Collect, json!({
            "Name": "Stockpile hardwood",
            "MaxCount": 30,
            "TargetDisplayName": "Hardwood",
            "TargetName": "",
            "TargetIndex": 0,
        })),
        // Renamed between versions: expected drift, not an error.
        (KindId::Collect, json!({
            "Name": "Old content",
            "TargetDisplayName": "Petrified Slime",
            "TargetName": "",
            "TargetIndex": 0,
        })),
    ];

    let mut migrated = Vec::new();
    let mut skipped = 0;
    for (kind, record) in &batch {
        match migrator.migrate_1_0(record, *kind).unwrap() {
            Some(task) => migrated.push(task),
            None => skipped += 1,
        }
    }

    assert_eq!(migrated.len(), 2);
    assert_eq!(skipped, 1);

    // Migrated tasks drop straight into a live journal.
    let mut manager = TaskManager::new();
    for task in migrated {
        manager.add_task(task);
    }
    manager.dispatch(
        &TaskEvent::ItemCollected {
            player_id: 0,
            item_id: "(T)SteelPickaxe".into(),
            category: None,
            count: 1,
            quality: 0,
        },
        &mut SilentCue,
    );

    let today = WorldDate::default();
    let tasks = manager.sorted_tasks(today);
    assert_eq!(tasks[0].name, "Stockpile hardwood");
    assert!(tasks[1].complete());
}
