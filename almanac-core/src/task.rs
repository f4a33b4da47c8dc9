//! Task lifecycle state machine.
//!
//! A task is Active/Inactive crossed with Complete/Incomplete, with a
//! viewed flag on the complete axis and a renewal countdown that drives
//! recurring tasks back to active. All mutation happens through the methods
//! here so the count/complete invariants hold no matter who calls.

use serde::{Deserialize, Serialize};

use crate::calendar::{DAYS_PER_SEASON, DAYS_PER_YEAR, WorldDate};
use crate::events::TaskEvent;
use crate::kind::TaskKind;

const DAYS_PER_WEEK: i32 = 7;

/// Recurrence policy for inactive tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenewPeriod {
    #[default]
    Never,
    Weekly,
    Monthly,
    Annually,
    Custom,
}

/// Host-provided completion side effect (sound cue, HUD ping, log line).
///
/// Injected at the call sites that can complete a task; the engine itself
/// never performs I/O.
pub trait CompletionCue {
    fn task_completed(&mut self, task: &Task);
}

/// Cue that does nothing. Useful for headless mutation and tests.
pub struct SilentCue;

impl CompletionCue for SilentCue {
    fn task_completed(&mut self, _task: &Task) {}
}

/// A journal objective. Persisted as a PascalCase record with the kind
/// payload flattened in and discriminated by `ID`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(flatten)]
    kind: TaskKind,
    pub name: String,
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default)]
    complete: bool,
    #[serde(default = "default_true")]
    viewed: bool,
    #[serde(default)]
    count: i32,
    #[serde(default = "default_max_count")]
    pub max_count: i32,
    #[serde(default)]
    pub base_price: i32,
    #[serde(default)]
    pub renew_period: RenewPeriod,
    #[serde(default)]
    pub renew_date: WorldDate,
    #[serde(default = "default_custom_interval")]
    pub renew_custom_interval: i32,
    #[serde(default)]
    sort_index: i32,
    #[serde(default)]
    pub color_index: i32,
}

fn default_true() -> bool {
    true
}

fn default_max_count() -> i32 {
    1
}

fn default_custom_interval() -> i32 {
    1
}

impl Task {
    pub fn new(kind: TaskKind, name: impl Into<String>) -> Self {
        Task {
            kind,
            name: name.into(),
            owner_id: 0,
            active: true,
            complete: false,
            viewed: true,
            count: 0,
            max_count: 1,
            base_price: 0,
            renew_period: RenewPeriod::Never,
            renew_date: WorldDate::default(),
            renew_custom_interval: default_custom_interval(),
            sort_index: 0,
            color_index: 0,
        }
    }

    pub fn with_owner(mut self, owner_id: i64) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn with_max_count(mut self, max_count: i32) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_base_price(mut self, base_price: i32) -> Self {
        self.base_price = base_price;
        self
    }

    pub fn with_renewal(mut self, period: RenewPeriod, anchor: WorldDate, interval: i32) -> Self {
        self.renew_period = period;
        self.renew_date = anchor;
        self.renew_custom_interval = interval.max(1);
        self
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn complete(&self) -> bool {
        self.complete
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn sort_index(&self) -> i32 {
        self.sort_index
    }

    pub fn set_sort_index(&mut self, index: i32) {
        self.sort_index = index;
    }

    pub fn is_owner(&self, player_id: i64) -> bool {
        self.owner_id == player_id
    }

    /// Remaining cost of the unfinished portion.
    pub fn price(&self) -> i32 {
        self.base_price * (self.max_count - self.count)
    }

    pub fn should_show_progress(&self) -> bool {
        self.kind.should_show_progress(self.max_count)
    }

    /// Ready to receive update events?
    pub fn can_update(&self) -> bool {
        self.active && !self.complete
    }

    /// Deactivating a Custom-period task snapshots the renewal date; the
    /// other periods derive their countdown on demand from the anchor.
    pub fn set_active(&mut self, active: bool, today: WorldDate) {
        if !active && self.renew_period == RenewPeriod::Custom {
            self.renew_date = today.add_days(self.renew_custom_interval);
        }
        self.active = active;
    }

    /// Completing hides the task from the unviewed set until acknowledged;
    /// un-completing a task that reached its goal restarts progress so a
    /// renewed task is never born already complete.
    pub fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
        self.viewed = !complete;

        if !complete && self.count >= self.max_count {
            self.count = 0;
        }
    }

    /// Mark complete and fire the completion cue. Idempotent: a task that
    /// is already complete neither changes state nor re-triggers the cue.
    pub fn mark_as_completed(&mut self, cue: &mut dyn CompletionCue) {
        if !self.complete {
            self.set_complete(true);
            cue.task_completed(self);
        }
    }

    /// Add progress, clamped into `[0, max_count]`. Reaching the ceiling
    /// with `auto_complete` marks the task completed.
    pub fn increment_count(&mut self, amount: i32, auto_complete: bool, cue: &mut dyn CompletionCue) {
        self.count = (self.count + amount).max(0);

        if self.count >= self.max_count {
            self.count = self.max_count;

            if auto_complete {
                self.mark_as_completed(cue);
            }
        }
    }

    pub fn mark_as_viewed(&mut self) {
        self.viewed = true;
    }

    pub fn has_been_viewed(&self) -> bool {
        self.viewed
    }

    /// Days until this task renews, relative to the supplied date.
    ///
    /// Weekly/Monthly/Annually are cyclic and always land in `[0, period)`,
    /// even when the anchor is in the past. Custom is linear and may be
    /// negative when overdue; the day pass treats that as "renew now".
    pub fn days_remaining(&self, today: WorldDate) -> i32 {
        match self.renew_period {
            RenewPeriod::Never => 0,
            RenewPeriod::Weekly => {
                (self.renew_date.day as i32 - today.day as i32).rem_euclid(DAYS_PER_WEEK)
            }
            RenewPeriod::Monthly => {
                (self.renew_date.day as i32 - today.day as i32).rem_euclid(DAYS_PER_SEASON)
            }
            RenewPeriod::Annually => {
                (self.renew_date.day_of_year() - today.day_of_year()).rem_euclid(DAYS_PER_YEAR)
            }
            RenewPeriod::Custom => self.renew_date.total_days() - today.total_days(),
        }
    }

    /// Apply a domain event. Gated on `can_update` and ownership; only the
    /// matching kind/channel combination makes progress.
    pub fn handle_event(&mut self, event: &TaskEvent, cue: &mut dyn CompletionCue) {
        if !self.can_update() {
            return;
        }
        if let Some(player_id) = event.player_id() {
            if !self.is_owner(player_id) {
                return;
            }
        }

        let progress = match (&self.kind, event) {
            (
                TaskKind::Collect { item_ids, quality },
                TaskEvent::ItemCollected { item_id, category, count, quality: got, .. },
            ) if *got >= *quality && item_filter_matches(item_ids, item_id, category.as_deref()) => {
                Some(*count)
            }
            (TaskKind::Craft { item_ids }, TaskEvent::ItemCrafted { item_id, count, .. })
                if item_ids.iter().any(|id| id == item_id) =>
            {
                Some(*count)
            }
            (
                TaskKind::Buy { item_ids },
                TaskEvent::ItemPurchased { item_id, category, count, .. },
            ) if item_filter_matches(item_ids, item_id, category.as_deref()) => Some(*count),
            (
                TaskKind::Sell { item_ids },
                TaskEvent::ItemSold { item_id, category, count, .. },
            ) if item_filter_matches(item_ids, item_id, category.as_deref()) => Some(*count),
            (
                TaskKind::Build { building_type },
                TaskEvent::BuildingConstructed { building_type: built, .. },
            ) if built == building_type => Some(1),
            // Receiving the upgraded tool finishes the commission outright.
            (TaskKind::Smith { item_id, .. }, TaskEvent::ItemCollected { item_id: got, .. })
                if got == item_id =>
            {
                Some(self.max_count)
            }
            (
                TaskKind::Gift { npc_name, item_ids },
                TaskEvent::ItemGifted { npc_name: npc, item_id, category, .. },
            ) if npc == npc_name
                && (item_ids.is_empty()
                    || item_filter_matches(item_ids, item_id, category.as_deref())) =>
            {
                Some(1)
            }
            _ => None,
        };

        if let Some(amount) = progress {
            self.increment_count(amount, true, cue);
        }
    }
}

/// An id list matches a concrete item either directly or through the item's
/// category id (lists may mix both).
fn item_filter_matches(item_ids: &[String], item_id: &str, category: Option<&str>) -> bool {
    item_ids.iter().any(|id| {
        id == item_id || category.is_some_and(|c| id == c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Season;

    /// Counts cue firings so idempotency is observable.
    pub(crate) struct CountingCue(pub i32);

    impl CompletionCue for CountingCue {
        fn task_completed(&mut self, _task: &Task) {
            self.0 += 1;
        }
    }

    fn collect_task() -> Task {
        Task::new(
            TaskKind::Collect {
                item_ids: vec!["(O)388".into()],
                quality: 0,
            },
            "Gather wood",
        )
        .with_max_count(10)
    }

    #[test]
    fn test_increment_clamps_to_bounds() {
        let mut task = collect_task();
        let mut cue = SilentCue;

        task.increment_count(25, false, &mut cue);
        assert_eq!(task.count(), 10);

        task.set_complete(false);
        task.increment_count(-100, false, &mut cue);
        assert_eq!(task.count(), 0);
    }

    #[test]
    fn test_uncomplete_resets_count_only_at_goal() {
        let mut task = collect_task();
        let mut cue = SilentCue;

        task.increment_count(10, true, &mut cue);
        assert!(task.complete());
        task.set_complete(false);
        assert_eq!(task.count(), 0);
        assert!(task.has_been_viewed());

        task.increment_count(4, true, &mut cue);
        task.set_complete(true);
        task.set_complete(false);
        assert_eq!(task.count(), 4);
    }

    #[test]
    fn test_mark_as_completed_is_idempotent() {
        let mut task = collect_task();
        let mut cue = CountingCue(0);

        task.mark_as_completed(&mut cue);
        let snapshot = task.clone();
        task.mark_as_completed(&mut cue);

        assert_eq!(task, snapshot);
        assert_eq!(cue.0, 1);
        assert!(!task.has_been_viewed());
    }

    #[test]
    fn test_auto_complete_fires_cue_once_at_ceiling() {
        let mut task = collect_task();
        let mut cue = CountingCue(0);

        task.increment_count(9, true, &mut cue);
        assert_eq!(cue.0, 0);
        task.increment_count(5, true, &mut cue);
        assert_eq!(task.count(), 10);
        assert_eq!(cue.0, 1);
    }

    #[test]
    fn test_deactivating_custom_snapshots_renew_date() {
        let today = WorldDate::new(1, Season::Summer, 10);
        let mut task = collect_task().with_renewal(RenewPeriod::Custom, today, 5);

        task.set_active(false, today);
        assert_eq!(task.renew_date, WorldDate::new(1, Season::Summer, 15));

        // Non-custom periods leave the anchor alone.
        let mut weekly = collect_task().with_renewal(
            RenewPeriod::Weekly,
            WorldDate::new(1, Season::Spring, 3),
            1,
        );
        weekly.set_active(false, today);
        assert_eq!(weekly.renew_date, WorldDate::new(1, Season::Spring, 3));
    }

    #[test]
    fn test_days_remaining_cyclic_periods_wrap_non_negative() {
        let today = WorldDate::new(2, Season::Fall, 20);
        // Anchor day-of-month is in the past relative to today.
        let anchor = WorldDate::new(1, Season::Spring, 5);

        let weekly = collect_task().with_renewal(RenewPeriod::Weekly, anchor, 1);
        let monthly = collect_task().with_renewal(RenewPeriod::Monthly, anchor, 1);
        let annually = collect_task().with_renewal(RenewPeriod::Annually, anchor, 1);

        let w = weekly.days_remaining(today);
        let m = monthly.days_remaining(today);
        let a = annually.days_remaining(today);
        assert!((0..7).contains(&w), "weekly out of range: {w}");
        assert!((0..28).contains(&m), "monthly out of range: {m}");
        assert!((0..112).contains(&a), "annually out of range: {a}");

        // (5 - 20) mod 7 = 6, mod 28 = 13; day-of-year 5 vs 76 mod 112 = 41.
        assert_eq!(w, 6);
        assert_eq!(m, 13);
        assert_eq!(a, 41);
    }

    #[test]
    fn test_days_remaining_custom_goes_negative_when_overdue() {
        let today = WorldDate::new(1, Season::Summer, 10);
        let task = collect_task().with_renewal(
            RenewPeriod::Custom,
            WorldDate::new(1, Season::Summer, 7),
            3,
        );
        assert_eq!(task.days_remaining(today), -3);
    }

    #[test]
    fn test_never_has_no_countdown() {
        let task = collect_task();
        assert_eq!(task.days_remaining(WorldDate::new(3, Season::Winter, 28)), 0);
    }

    #[test]
    fn test_price_tracks_remaining_count() {
        let mut task = collect_task().with_base_price(50);
        let mut cue = SilentCue;
        assert_eq!(task.price(), 500);
        task.increment_count(4, false, &mut cue);
        assert_eq!(task.price(), 300);
    }

    #[test]
    fn test_handle_event_respects_update_gate_and_owner() {
        let mut cue = SilentCue;
        let event = TaskEvent::ItemCollected {
            player_id: 1,
            item_id: "(O)388".into(),
            category: None,
            count: 3,
            quality: 0,
        };

        let mut task = collect_task().with_owner(1);
        task.set_active(false, WorldDate::default());
        task.handle_event(&event, &mut cue);
        assert_eq!(task.count(), 0);

        let mut other_owner = collect_task().with_owner(2);
        other_owner.handle_event(&event, &mut cue);
        assert_eq!(other_owner.count(), 0);

        let mut mine = collect_task().with_owner(1);
        mine.handle_event(&event, &mut cue);
        assert_eq!(mine.count(), 3);
    }

    #[test]
    fn test_collect_quality_floor_and_category_match() {
        let mut cue = SilentCue;
        let mut task = Task::new(
            TaskKind::Collect {
                item_ids: vec!["-4".into()],
                quality: 2,
            },
            "Fine fish",
        )
        .with_max_count(5);

        task.handle_event(
            &TaskEvent::ItemCollected {
                player_id: 0,
                item_id: "(O)145".into(),
                category: Some("-4".into()),
                count: 1,
                quality: 1,
            },
            &mut cue,
        );
        assert_eq!(task.count(), 0);

        task.handle_event(
            &TaskEvent::ItemCollected {
                player_id: 0,
                item_id: "(O)145".into(),
                category: Some("-4".into()),
                count: 2,
                quality: 2,
            },
            &mut cue,
        );
        assert_eq!(task.count(), 2);
    }

    #[test]
    fn test_smith_completes_in_one_step() {
        let mut cue = CountingCue(0);
        let mut task = Task::new(
            TaskKind::Smith {
                item_id: "(T)SteelPickaxe".into(),
                tool_type: "Pickaxe".into(),
                upgrade_level: 2,
            },
            "Upgrade the pickaxe",
        );

        task.handle_event(
            &TaskEvent::ItemCollected {
                player_id: 0,
                item_id: "(T)SteelPickaxe".into(),
                category: None,
                count: 1,
                quality: 0,
            },
            &mut cue,
        );
        assert!(task.complete());
        assert_eq!(cue.0, 1);
    }

    #[test]
    fn test_gift_matches_npc_with_optional_item_filter() {
        let mut cue = SilentCue;
        let mut any_gift = Task::new(
            TaskKind::Gift {
                npc_name: "Abigail".into(),
                item_ids: vec![],
            },
            "Gift Abigail",
        )
        .with_max_count(2);

        any_gift.handle_event(
            &TaskEvent::ItemGifted {
                player_id: 0,
                npc_name: "Abigail".into(),
                item_id: "(O)66".into(),
                category: None,
            },
            &mut cue,
        );
        assert_eq!(any_gift.count(), 1);

        any_gift.handle_event(
            &TaskEvent::ItemGifted {
                player_id: 0,
                npc_name: "Pierre".into(),
                item_id: "(O)66".into(),
                category: None,
            },
            &mut cue,
        );
        assert_eq!(any_gift.count(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut task = collect_task().with_renewal(
            RenewPeriod::Custom,
            WorldDate::new(1, Season::Spring, 5),
            4,
        );
        let mut copy = task.clone();

        copy.set_active(false, WorldDate::new(1, Season::Summer, 1));
        if let TaskKind::Collect { item_ids, .. } = &mut copy.kind {
            item_ids.push("(O)390".into());
        }

        assert_eq!(task.renew_date, WorldDate::new(1, Season::Spring, 5));
        assert!(task.active());
        if let TaskKind::Collect { item_ids, .. } = task.kind() {
            assert_eq!(item_ids.len(), 1);
        }
        task.set_sort_index(3);
        assert_eq!(copy.sort_index(), 0);
    }

    #[test]
    fn test_record_round_trip_and_sparse_defaults() {
        let task = collect_task().with_owner(42);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["ID"], "Collect");
        assert_eq!(json["Name"], "Gather wood");
        assert_eq!(json["MaxCount"], 10);
        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);

        // Sparse current-schema record: lifecycle fields fall back to defaults.
        let sparse: Task = serde_json::from_value(serde_json::json!({
            "ID": "Basic",
            "Name": "Water the crops",
        }))
        .unwrap();
        assert!(sparse.active());
        assert!(!sparse.complete());
        assert!(sparse.has_been_viewed());
        assert_eq!(sparse.max_count, 1);
        assert_eq!(sparse.renew_period, RenewPeriod::Never);
    }
}
