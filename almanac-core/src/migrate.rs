//! Legacy record migration.
//!
//! Version 1.0.x journals identified targets by localized display name
//! (`TargetDisplayName`/`TargetName`/`TargetIndex`) instead of stable ids.
//! Migration resolves those names through the current locale's lookup
//! tables, injects the stable fields, and deserializes the record through
//! the normal `Task` derive.
//!
//! Two failure modes, deliberately distinct: a name that no longer resolves
//! (content renamed or removed between versions) is expected drift and
//! yields `Ok(None)`; a record that resolves but will not deserialize is
//! schema corruption and yields an error the caller must surface.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::kind::KindId;
use crate::lookup::GameData;
use crate::task::Task;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("legacy task record is not a JSON object")]
    NotAnObject,
    #[error("migrated task record failed to deserialize: {0}")]
    Corrupt(#[source] serde_json::Error),
}

pub struct TaskDataMigrator<'a> {
    data: &'a dyn GameData,
}

impl<'a> TaskDataMigrator<'a> {
    pub fn new(data: &'a dyn GameData) -> Self {
        TaskDataMigrator { data }
    }

    /// Migrate a 1.0.x record into a `kind` task. `Ok(None)` means the
    /// record could not be resolved in the current locale; drop or flag
    /// it, but keep going.
    pub fn migrate_1_0(&self, record: &Value, kind: KindId) -> Result<Option<Task>, MigrateError> {
        let mut map = record
            .as_object()
            .cloned()
            .ok_or(MigrateError::NotAnObject)?;

        let Some(display_name) = string_field(&map, "TargetDisplayName") else {
            return Ok(None);
        };
        let Some(target_name) = string_field(&map, "TargetName") else {
            return Ok(None);
        };
        let Some(target_index) = map.get("TargetIndex").and_then(Value::as_i64) else {
            return Ok(None);
        };

        match kind {
            KindId::Basic => {}
            KindId::Smith => {
                let Some(item_id) = self.data.resolve_item(&display_name) else {
                    return Ok(None);
                };
                map.insert("ItemId".into(), Value::from(item_id.clone()));
                if let Some(tool) = self.data.tool_info(&item_id) {
                    map.insert("ToolType".into(), Value::from(tool.class_name));
                    map.insert("UpgradeLevel".into(), Value::from(tool.upgrade_level));
                }
            }
            KindId::Build => {
                let Some(building_type) = self.data.resolve_building(&display_name) else {
                    return Ok(None);
                };
                map.insert("BuildingType".into(), Value::from(building_type));
            }
            KindId::Buy | KindId::Sell | KindId::Collect | KindId::Craft => {
                let Some(item_ids) = self.data.resolve_items(&display_name) else {
                    return Ok(None);
                };
                map.insert("ItemIds".into(), Value::from(item_ids));
            }
            KindId::Gift => {
                // Gift records keyed the NPC by internal target name.
                let Some(npc_name) = self.data.resolve_npc(&target_name) else {
                    return Ok(None);
                };
                if target_index > 0 {
                    map.insert(
                        "ItemIds".into(),
                        Value::from(vec![format!("(O){target_index}")]),
                    );
                }
                map.insert("NpcName".into(), Value::from(npc_name));
            }
        }

        map.insert("ID".into(), Value::from(kind.as_str()));

        serde_json::from_value::<Task>(Value::Object(map))
            .map(Some)
            .map_err(MigrateError::Corrupt)
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_owned)
}
