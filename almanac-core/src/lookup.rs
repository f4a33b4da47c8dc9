//! Host game-data lookups.
//!
//! The engine never owns item/building/NPC databases; it consults them
//! through `GameData`. `GameDataTables` is the map-backed implementation
//! hosts load from localized data files. The reverse display-name maps are
//! what migration resolves legacy records against, so they must come from
//! the same locale the records were written in.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Tool metadata attached to an upgradeable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ToolInfo {
    pub class_name: String,
    pub upgrade_level: i32,
}

/// Narrow lookup interface consumed by constraint checks, builders, and the
/// migrator.
pub trait GameData {
    fn is_item_id(&self, id: &str) -> bool;
    fn is_category_id(&self, id: &str) -> bool;
    /// Plain object ids (the subset of items placeable/collectable as
    /// standard objects).
    fn is_object_id(&self, id: &str) -> bool;
    fn is_craftable(&self, id: &str) -> bool;

    fn item_price(&self, id: &str) -> Option<i32>;
    fn building_cost(&self, building_type: &str) -> Option<i32>;
    fn tool_info(&self, item_id: &str) -> Option<ToolInfo>;

    /// Resolve a localized display name to a single stable id.
    fn resolve_item(&self, display_name: &str) -> Option<String>;
    /// Display names are not unique; resolve to every matching id.
    fn resolve_items(&self, display_name: &str) -> Option<Vec<String>>;
    fn resolve_building(&self, display_name: &str) -> Option<String>;
    fn resolve_npc(&self, display_name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemEntry {
    pub display_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: i32,
    #[serde(default)]
    pub craftable: bool,
    #[serde(default)]
    pub object: bool,
    #[serde(default)]
    pub tool: Option<ToolInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BuildingEntry {
    pub display_name: String,
    #[serde(default)]
    pub build_cost: i32,
}

/// Localized game-data maps: stable id -> entry, plus NPC internal-name ->
/// display-name. Serde-loadable so hosts can ship them as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameDataTables {
    #[serde(default)]
    pub items: HashMap<String, ItemEntry>,
    #[serde(default)]
    pub buildings: HashMap<String, BuildingEntry>,
    #[serde(default)]
    pub npcs: HashMap<String, String>,
}

impl GameDataTables {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameData for GameDataTables {
    fn is_item_id(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    fn is_category_id(&self, id: &str) -> bool {
        self.items
            .values()
            .any(|entry| entry.category.as_deref() == Some(id))
    }

    fn is_object_id(&self, id: &str) -> bool {
        self.items.get(id).is_some_and(|entry| entry.object)
    }

    fn is_craftable(&self, id: &str) -> bool {
        self.items.get(id).is_some_and(|entry| entry.craftable)
    }

    fn item_price(&self, id: &str) -> Option<i32> {
        self.items.get(id).map(|entry| entry.price)
    }

    fn building_cost(&self, building_type: &str) -> Option<i32> {
        self.buildings.get(building_type).map(|entry| entry.build_cost)
    }

    fn tool_info(&self, item_id: &str) -> Option<ToolInfo> {
        self.items.get(item_id).and_then(|entry| entry.tool.clone())
    }

    fn resolve_item(&self, display_name: &str) -> Option<String> {
        self.resolve_items(display_name)
            .and_then(|ids| ids.into_iter().next())
    }

    fn resolve_items(&self, display_name: &str) -> Option<Vec<String>> {
        // BTreeSet keeps resolution deterministic across locales/loads.
        let ids: BTreeSet<&String> = self
            .items
            .iter()
            .filter(|(_, entry)| entry.display_name == display_name)
            .map(|(id, _)| id)
            .collect();

        if ids.is_empty() {
            None
        } else {
            Some(ids.into_iter().cloned().collect())
        }
    }

    fn resolve_building(&self, display_name: &str) -> Option<String> {
        let types: BTreeSet<&String> = self
            .buildings
            .iter()
            .filter(|(_, entry)| entry.display_name == display_name)
            .map(|(id, _)| id)
            .collect();
        types.into_iter().next().cloned()
    }

    fn resolve_npc(&self, display_name: &str) -> Option<String> {
        let names: BTreeSet<&String> = self
            .npcs
            .iter()
            .filter(|(_, display)| display.as_str() == display_name)
            .map(|(internal, _)| internal)
            .collect();
        names.into_iter().next().cloned()
    }
}
