//! Task collection ownership and event delivery.
//!
//! The manager exclusively owns its tasks (tasks never reference the
//! collection back) and is mutated only from the host's main update pass.
//! It wires subscriptions on insert/remove so each task is registered
//! exactly once, and runs the renewal day pass.

use std::collections::BTreeMap;

use crate::calendar::WorldDate;
use crate::events::{EventBus, TaskEvent, TaskId};
use crate::ordering::TaskOrdering;
use crate::task::{CompletionCue, RenewPeriod, Task};

#[derive(Debug, Default)]
pub struct TaskManager {
    tasks: BTreeMap<TaskId, Task>,
    bus: EventBus,
    next_id: TaskId,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a task and register its event interest.
    pub fn add_task(&mut self, task: Task) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;

        if let Some(channel) = task.kind().channel() {
            self.bus.subscribe(channel, id);
        }
        self.tasks.insert(id, task);
        id
    }

    pub fn remove_task(&mut self, id: TaskId) -> Option<Task> {
        let task = self.tasks.remove(&id)?;
        self.bus.unsubscribe_all(id);
        Some(task)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in insertion (id) order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &Task)> {
        self.tasks.iter().map(|(id, task)| (*id, task))
    }

    /// Release ownership of every task, in insertion order (persistence).
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks.into_values().collect()
    }

    pub fn iter_owned_by(&self, owner_id: i64) -> impl Iterator<Item = (TaskId, &Task)> {
        self.iter().filter(move |(_, task)| task.is_owner(owner_id))
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Deliver one event. Day ticks run the renewal pass; everything else
    /// goes to that channel's subscribers in subscription order. Handlers
    /// are independent: none may rely on another having already run.
    pub fn dispatch(&mut self, event: &TaskEvent, cue: &mut dyn CompletionCue) {
        if let TaskEvent::DayStarted { date } = event {
            self.start_day(*date);
            return;
        }

        for id in self.bus.subscribers(event.channel()) {
            if let Some(task) = self.tasks.get_mut(&id) {
                task.handle_event(event, cue);
            }
        }
    }

    /// Renewal pass. A completed renewing task goes inactive and starts
    /// its countdown; a task that entered the day inactive and whose
    /// countdown has run out comes back with progress reset. The two arms
    /// are exclusive per task per day, so nothing cycles within one tick.
    pub fn start_day(&mut self, today: WorldDate) {
        for task in self.tasks.values_mut() {
            if task.renew_period == RenewPeriod::Never {
                continue;
            }

            if task.active() && task.complete() {
                task.set_active(false, today);
            } else if !task.active() && task.days_remaining(today) <= 0 {
                task.set_complete(false);
                task.set_active(true, today);
            }
        }
    }

    /// Ids in display order for the given date.
    pub fn sorted_ids(&self, today: WorldDate) -> Vec<TaskId> {
        let ordering = TaskOrdering::new(today);
        let mut ids: Vec<TaskId> = self.tasks.keys().copied().collect();
        ids.sort_by(|a, b| ordering.compare(&self.tasks[a], &self.tasks[b]));
        ids
    }

    pub fn sorted_tasks(&self, today: WorldDate) -> Vec<&Task> {
        self.sorted_ids(today)
            .into_iter()
            .filter_map(|id| self.tasks.get(&id))
            .collect()
    }
}
