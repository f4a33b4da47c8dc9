//! Task kinds as a closed variant set.
//!
//! Each kind carries its construction payload and declares which event
//! channel it listens on. Keeping the set closed lets the ordering, manager,
//! and migration code match exhaustively instead of downcasting.

use serde::{Deserialize, Serialize};

use crate::events::EventChannel;

/// Kind payload, flattened into the persisted task record and discriminated
/// by the `ID` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ID")]
pub enum TaskKind {
    /// Free-form checklist entry; never updated by events.
    Basic,
    #[serde(rename_all = "PascalCase")]
    Collect {
        item_ids: Vec<String>,
        #[serde(default)]
        quality: i32,
    },
    #[serde(rename_all = "PascalCase")]
    Craft { item_ids: Vec<String> },
    #[serde(rename_all = "PascalCase")]
    Buy { item_ids: Vec<String> },
    #[serde(rename_all = "PascalCase")]
    Sell { item_ids: Vec<String> },
    #[serde(rename_all = "PascalCase")]
    Build { building_type: String },
    #[serde(rename_all = "PascalCase")]
    Smith {
        item_id: String,
        #[serde(default)]
        tool_type: String,
        #[serde(default)]
        upgrade_level: i32,
    },
    #[serde(rename_all = "PascalCase")]
    Gift {
        npc_name: String,
        #[serde(default)]
        item_ids: Vec<String>,
    },
}

impl TaskKind {
    pub fn id(&self) -> KindId {
        match self {
            TaskKind::Basic => KindId::Basic,
            TaskKind::Collect { .. } => KindId::Collect,
            TaskKind::Craft { .. } => KindId::Craft,
            TaskKind::Buy { .. } => KindId::Buy,
            TaskKind::Sell { .. } => KindId::Sell,
            TaskKind::Build { .. } => KindId::Build,
            TaskKind::Smith { .. } => KindId::Smith,
            TaskKind::Gift { .. } => KindId::Gift,
        }
    }

    /// Channel this kind subscribes to for progress updates, if any.
    pub fn channel(&self) -> Option<EventChannel> {
        match self {
            TaskKind::Basic => None,
            TaskKind::Collect { .. } => Some(EventChannel::ItemCollected),
            TaskKind::Craft { .. } => Some(EventChannel::ItemCrafted),
            TaskKind::Buy { .. } => Some(EventChannel::ItemPurchased),
            TaskKind::Sell { .. } => Some(EventChannel::ItemSold),
            TaskKind::Build { .. } => Some(EventChannel::BuildingConstructed),
            // A finished tool comes back through the collection channel.
            TaskKind::Smith { .. } => Some(EventChannel::ItemCollected),
            TaskKind::Gift { .. } => Some(EventChannel::ItemGifted),
        }
    }

    pub fn should_show_progress(&self, max_count: i32) -> bool {
        match self {
            TaskKind::Basic | TaskKind::Smith { .. } => false,
            TaskKind::Build { .. } => max_count > 1,
            TaskKind::Collect { .. }
            | TaskKind::Craft { .. }
            | TaskKind::Buy { .. }
            | TaskKind::Sell { .. }
            | TaskKind::Gift { .. } => true,
        }
    }
}

/// Fieldless kind discriminator, used to key builders and migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindId {
    Basic,
    Collect,
    Craft,
    Buy,
    Sell,
    Build,
    Smith,
    Gift,
}

impl KindId {
    pub const ALL: [KindId; 8] = [
        KindId::Basic,
        KindId::Collect,
        KindId::Craft,
        KindId::Buy,
        KindId::Sell,
        KindId::Build,
        KindId::Smith,
        KindId::Gift,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KindId::Basic => "Basic",
            KindId::Collect => "Collect",
            KindId::Craft => "Craft",
            KindId::Buy => "Buy",
            KindId::Sell => "Sell",
            KindId::Build => "Build",
            KindId::Smith => "Smith",
            KindId::Gift => "Gift",
        }
    }
}

impl std::str::FromStr for KindId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(KindId::Basic),
            "collect" => Ok(KindId::Collect),
            "craft" => Ok(KindId::Craft),
            "buy" => Ok(KindId::Buy),
            "sell" => Ok(KindId::Sell),
            "build" => Ok(KindId::Build),
            "smith" | "blacksmith" => Ok(KindId::Smith),
            "gift" => Ok(KindId::Gift),
            other => Err(format!("unknown task kind: {other}")),
        }
    }
}

impl std::fmt::Display for KindId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
