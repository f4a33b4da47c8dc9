//! Domain events and the subscription registry.
//!
//! Events are dispatched synchronously on the host's update pass, one at a
//! time. The bus only records who listens to what; the manager owns the
//! tasks and performs the actual delivery.

use std::collections::{BTreeSet, HashMap};

use crate::calendar::WorldDate;

/// External happenings a task can react to.
///
/// `category` carries the host item database's category id (e.g. `"-4"`)
/// alongside the concrete item id, so tasks targeting a whole category can
/// match without a database lookup in the dispatch path.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    ItemCollected {
        player_id: i64,
        item_id: String,
        category: Option<String>,
        count: i32,
        quality: i32,
    },
    ItemCrafted {
        player_id: i64,
        item_id: String,
        count: i32,
    },
    ItemPurchased {
        player_id: i64,
        item_id: String,
        category: Option<String>,
        count: i32,
    },
    ItemSold {
        player_id: i64,
        item_id: String,
        category: Option<String>,
        count: i32,
    },
    ItemGifted {
        player_id: i64,
        npc_name: String,
        item_id: String,
        category: Option<String>,
    },
    BuildingConstructed {
        player_id: i64,
        building_type: String,
    },
    DayStarted {
        date: WorldDate,
    },
}

impl TaskEvent {
    pub fn channel(&self) -> EventChannel {
        match self {
            TaskEvent::ItemCollected { .. } => EventChannel::ItemCollected,
            TaskEvent::ItemCrafted { .. } => EventChannel::ItemCrafted,
            TaskEvent::ItemPurchased { .. } => EventChannel::ItemPurchased,
            TaskEvent::ItemSold { .. } => EventChannel::ItemSold,
            TaskEvent::ItemGifted { .. } => EventChannel::ItemGifted,
            TaskEvent::BuildingConstructed { .. } => EventChannel::BuildingConstructed,
            TaskEvent::DayStarted { .. } => EventChannel::DayStarted,
        }
    }

    /// Player the event is attributed to, if any. Day ticks are global.
    pub fn player_id(&self) -> Option<i64> {
        match self {
            TaskEvent::ItemCollected { player_id, .. }
            | TaskEvent::ItemCrafted { player_id, .. }
            | TaskEvent::ItemPurchased { player_id, .. }
            | TaskEvent::ItemSold { player_id, .. }
            | TaskEvent::ItemGifted { player_id, .. }
            | TaskEvent::BuildingConstructed { player_id, .. } => Some(*player_id),
            TaskEvent::DayStarted { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventChannel {
    ItemCollected,
    ItemCrafted,
    ItemPurchased,
    ItemSold,
    ItemGifted,
    BuildingConstructed,
    DayStarted,
}

/// Stable handle the manager assigns to each task it owns.
pub type TaskId = u64;

/// Subscription registry: channel -> ordered set of task ids.
///
/// Sets make subscribe/unsubscribe idempotent by construction; ids are
/// assigned monotonically, so iteration order is subscription order.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: HashMap<EventChannel, BTreeSet<TaskId>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, channel: EventChannel, id: TaskId) {
        self.subscribers.entry(channel).or_default().insert(id);
    }

    pub fn unsubscribe(&mut self, channel: EventChannel, id: TaskId) {
        if let Some(set) = self.subscribers.get_mut(&channel) {
            set.remove(&id);
        }
    }

    /// Drop a task from every channel (task removal).
    pub fn unsubscribe_all(&mut self, id: TaskId) {
        for set in self.subscribers.values_mut() {
            set.remove(&id);
        }
    }

    pub fn subscribers(&self, channel: EventChannel) -> Vec<TaskId> {
        self.subscribers
            .get(&channel)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self, channel: EventChannel, id: TaskId) -> bool {
        self.subscribers
            .get(&channel)
            .is_some_and(|set| set.contains(&id))
    }
}
