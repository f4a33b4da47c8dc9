use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use almanac_core::{BuildingEntry, GameDataTables, ItemEntry, Task, ToolInfo, WorldDate};

pub fn almanac_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".almanac"))
}

pub fn ensure_almanac_home() -> Result<PathBuf> {
    let dir = almanac_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn journal_path() -> Result<PathBuf> {
    Ok(ensure_almanac_home()?.join("journal.json"))
}

/// On-disk journal: the world date plus every task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub saved_at_utc: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date: WorldDate,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Default for Journal {
    fn default() -> Self {
        Journal {
            saved_at_utc: None,
            date: WorldDate::default(),
            tasks: Vec::new(),
        }
    }
}

pub fn read_journal(path: &Path) -> Result<Journal> {
    if !path.exists() {
        return Ok(Journal::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_journal(path: &Path, journal: &mut Journal) -> Result<()> {
    journal.saved_at_utc = Some(Utc::now());
    let json = serde_json::to_string_pretty(journal)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Lookup tables for builder validation and migration. A file on disk
/// overrides the small built-in set.
pub fn read_game_data(path: Option<&Path>) -> Result<GameDataTables> {
    let Some(path) = path else {
        return Ok(builtin_game_data());
    };
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

fn object(display_name: &str, category: &str, price: i32) -> ItemEntry {
    ItemEntry {
        display_name: display_name.into(),
        category: Some(category.into()),
        price,
        craftable: false,
        object: true,
        tool: None,
    }
}

fn builtin_game_data() -> GameDataTables {
    let mut t = GameDataTables::new();

    t.items.insert("(O)388".into(), object("Wood", "-16", 2));
    t.items.insert("(O)390".into(), object("Stone", "-16", 2));
    t.items.insert("(O)709".into(), object("Hardwood", "-16", 15));
    t.items.insert("(O)174".into(), object("Large Egg", "-5", 95));
    t.items.insert("(O)176".into(), object("Egg", "-5", 50));
    t.items.insert("(O)180".into(), object("Egg", "-5", 50));
    t.items.insert("(O)24".into(), object("Parsnip", "-75", 35));
    t.items.insert(
        "(BC)13".into(),
        ItemEntry {
            display_name: "Furnace".into(),
            category: None,
            price: 150,
            craftable: true,
            object: false,
            tool: None,
        },
    );
    t.items.insert(
        "(T)SteelPickaxe".into(),
        ItemEntry {
            display_name: "Steel Pickaxe".into(),
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
    t.items.insert(
        "(T)SteelAxe".into(),
        ItemEntry {
            display_name: "Steel Axe".into(),
            category: None,
            price: 5000,
            craftable: false,
            object: false,
            tool: Some(ToolInfo {
                class_name: "Axe".into(),
                upgrade_level: 2,
            }),
        },
    );

    t.buildings.insert(
        "Barn".into(),
        BuildingEntry {
            display_name: "Barn".into(),
            build_cost: 6000,
        },
    );
    t.buildings.insert(
        "Coop".into(),
        BuildingEntry {
            display_name: "Coop".into(),
            build_cost: 4000,
        },
    );
    t.buildings.insert(
        "Silo".into(),
        BuildingEntry {
            display_name: "Silo".into(),
            build_cost: 100,
        },
    );

    t.npcs.insert("Abigail".into(), "Abigail".into());
    t.npcs.insert("Linus".into(), "Linus".into());
    t.npcs.insert("Willy".into(), "Willy".into());

    t
}
